use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::RecognitionError;
use crate::google::GoogleSpeechRecognizer;
use crate::AudioData;

// =============================================================================
// Traits
// =============================================================================

/// Remote speech-to-text service.
///
/// Implementations receive mono 16-bit PCM and return the best transcript,
/// or [`RecognitionError::NoMatch`] when the service heard nothing usable.
pub trait RecognitionService: Send + Sync {
    fn recognize(
        &self,
        audio: &AudioData,
    ) -> impl Future<Output = Result<String, RecognitionError>> + Send;
}

// =============================================================================
// Mock implementation
// =============================================================================

/// Scripted recognizer for tests and offline runs.
///
/// Scripted replies are returned in order; once they run out every call
/// gets the fallback reply. Clones share the script and the call counter.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    script: Arc<Mutex<VecDeque<Result<String, RecognitionError>>>>,
    fallback: Result<String, RecognitionError>,
    calls: Arc<AtomicUsize>,
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::failing(RecognitionError::NoMatch)
    }
}

impl MockRecognizer {
    /// Always answer with `transcript`.
    pub fn new(transcript: impl Into<String>) -> Self {
        Self::with_fallback(Ok(transcript.into()))
    }

    /// Always fail with `error`.
    pub fn failing(error: RecognitionError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<String, RecognitionError>) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Queue a one-off reply ahead of the fallback.
    pub fn then(self, reply: Result<String, RecognitionError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
        self
    }

    /// Number of recognition requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RecognitionService for MockRecognizer {
    async fn recognize(&self, audio: &AudioData) -> Result<String, RecognitionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        tracing::debug!(
            samples = audio.samples.len(),
            scripted = scripted.is_some(),
            "Mock recognition"
        );
        scripted.unwrap_or_else(|| self.fallback.clone())
    }
}

// =============================================================================
// Runtime selection
// =============================================================================

/// Recognizer chosen at startup.
#[derive(Debug, Clone)]
pub enum Recognizer {
    Google(GoogleSpeechRecognizer),
    Mock(MockRecognizer),
}

impl RecognitionService for Recognizer {
    async fn recognize(&self, audio: &AudioData) -> Result<String, RecognitionError> {
        match self {
            Recognizer::Google(inner) => inner.recognize(audio).await,
            Recognizer::Mock(inner) => inner.recognize(audio).await,
        }
    }
}
