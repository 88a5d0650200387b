//! Turning one spoken or recorded diary entry into text.

use std::time::Duration;

use tokio::sync::broadcast;

use mindful_core::config::ListenConfig;
use mindful_core::events::StatusEvent;

use crate::error::CaptureError;
use crate::listener::{AudioSource, Listener, PcmSource};
use crate::recognizer::RecognitionService;
use crate::wav::decode_wav;
use crate::AudioData;

/// Where the audio for one attempt comes from.
pub enum AudioInput<'a, S> {
    /// Listen live on an open source until one phrase is captured.
    Microphone(&'a mut S),
    /// A complete WAV recording.
    Recording(&'a [u8]),
}

impl<'a> AudioInput<'a, PcmSource> {
    /// Recording input with no live source type to name.
    pub fn recording(bytes: &'a [u8]) -> Self {
        AudioInput::Recording(bytes)
    }
}

/// Runs a single capture-and-recognize attempt and reports progress.
///
/// Each attempt either yields text or ends with a [`CaptureError`]; nothing
/// is retried. Progress and failures are published as [`StatusEvent`]s on
/// the optional broadcast channel.
#[derive(Debug, Clone)]
pub struct InputAcquisition<R> {
    recognizer: R,
    listen: ListenConfig,
    status: Option<broadcast::Sender<StatusEvent>>,
}

impl<R: RecognitionService> InputAcquisition<R> {
    pub fn new(recognizer: R, listen: ListenConfig) -> Self {
        Self {
            recognizer,
            listen,
            status: None,
        }
    }

    /// Publish status notifications on `sender`.
    pub fn with_status(mut self, sender: broadcast::Sender<StatusEvent>) -> Self {
        self.status = Some(sender);
        self
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    fn notify(&self, event: StatusEvent) {
        tracing::debug!(kind = ?event, "{}", event.message());
        if let Some(sender) = &self.status {
            // No subscribers is fine.
            let _ = sender.send(event);
        }
    }

    /// Capture one entry from `input` and return its text.
    ///
    /// An empty recording yields empty text without contacting the
    /// recognition service.
    pub async fn acquire<S: AudioSource>(
        &self,
        input: AudioInput<'_, S>,
    ) -> Result<String, CaptureError> {
        let result = match input {
            AudioInput::Microphone(source) => self.capture_live(source).await,
            AudioInput::Recording(bytes) => self.capture_recording(bytes).await,
        };

        match &result {
            Ok(text) if !text.is_empty() => self.notify(StatusEvent::Recognized {
                chars: text.chars().count(),
            }),
            Ok(_) => {}
            Err(e) => self.notify(e.status_event()),
        }
        result
    }

    async fn capture_live<S: AudioSource>(&self, source: &mut S) -> Result<String, CaptureError> {
        self.notify(StatusEvent::Listening);

        let mut listener = Listener::new(self.listen.clone());
        listener
            .adjust_for_ambient_noise(source, Duration::from_millis(self.listen.calibration_ms))
            .await?;
        let audio = listener
            .listen(
                source,
                Some(Duration::from_secs(self.listen.timeout_secs)),
                Some(Duration::from_secs(self.listen.phrase_limit_secs)),
            )
            .await?;

        self.transcribe(audio).await
    }

    async fn capture_recording(&self, bytes: &[u8]) -> Result<String, CaptureError> {
        if bytes.is_empty() {
            tracing::debug!("Empty recording, nothing to recognize");
            return Ok(String::new());
        }
        let audio = decode_wav(bytes)?;
        self.transcribe(audio).await
    }

    async fn transcribe(&self, audio: AudioData) -> Result<String, CaptureError> {
        if audio.is_empty() {
            return Err(CaptureError::Unrecognized);
        }

        self.notify(StatusEvent::Recognizing);
        let text = self.recognizer.recognize(&audio).await?;
        if text.is_empty() {
            return Err(CaptureError::Unrecognized);
        }
        Ok(text)
    }
}

/// Collapse an attempt into the text shown to the user; failures become
/// empty text once their status has been reported.
pub fn text_or_empty(result: Result<String, CaptureError>) -> String {
    result.unwrap_or_default()
}
