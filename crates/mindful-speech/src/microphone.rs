//! Live microphone source backed by cpal.
//!
//! cpal streams are not `Send` on every platform, so the stream lives on a
//! dedicated thread and hands frames over a channel. Dropping the
//! [`Microphone`] stops the thread and closes the device.

use std::sync::mpsc as std_mpsc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, SupportedStreamConfig};
use tokio::sync::mpsc;

use mindful_core::config::ListenConfig;

use crate::error::CaptureError;
use crate::listener::AudioSource;

const FRAME_QUEUE: usize = 256;

type Frame = Result<Vec<i16>, String>;

/// Default input device, opened for one or more listening attempts.
pub struct Microphone {
    frames: mpsc::Receiver<Frame>,
    sample_rate: u32,
    _stop: std_mpsc::Sender<()>,
}

impl Microphone {
    /// Open the default input device.
    ///
    /// Prefers `config.sample_rate` when the device supports it. A missing or
    /// unusable device is reported as [`CaptureError::ServiceUnavailable`].
    pub fn open(config: &ListenConfig) -> Result<Self, CaptureError> {
        let (frame_tx, frame_rx) = mpsc::channel::<Frame>(FRAME_QUEUE);
        let (ready_tx, ready_rx) = std_mpsc::channel::<Result<u32, String>>();
        let (stop_tx, stop_rx) = std_mpsc::channel::<()>();
        let wanted_rate = config.sample_rate;
        let frame_ms = config.frame_ms;

        std::thread::Builder::new()
            .name("mindful-microphone".to_string())
            .spawn(move || {
                let stream = match start_stream(wanted_rate, frame_ms, frame_tx) {
                    Ok((stream, rate)) => {
                        let _ = ready_tx.send(Ok(rate));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                // Blocks until the Microphone is dropped.
                let _ = stop_rx.recv();
                drop(stream);
                tracing::debug!("Microphone stream closed");
            })
            .map_err(|e| CaptureError::ServiceUnavailable(e.to_string()))?;

        let sample_rate = ready_rx
            .recv()
            .map_err(|_| CaptureError::ServiceUnavailable("microphone thread exited".to_string()))?
            .map_err(CaptureError::ServiceUnavailable)?;

        tracing::info!(sample_rate, "Microphone opened");
        Ok(Self {
            frames: frame_rx,
            sample_rate,
            _stop: stop_tx,
        })
    }
}

impl AudioSource for Microphone {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    async fn next_frame(&mut self) -> Result<Option<Vec<i16>>, CaptureError> {
        match self.frames.recv().await {
            Some(Ok(frame)) => Ok(Some(frame)),
            Some(Err(e)) => Err(CaptureError::ServiceUnavailable(e)),
            None => Err(CaptureError::ServiceUnavailable(
                "microphone stream ended".to_string(),
            )),
        }
    }
}

fn pick_config(device: &cpal::Device, wanted: u32) -> Result<SupportedStreamConfig, String> {
    let wanted = SampleRate(wanted);
    if let Ok(ranges) = device.supported_input_configs() {
        for range in ranges {
            let usable = matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32);
            if usable && range.min_sample_rate() <= wanted && wanted <= range.max_sample_rate() {
                return Ok(range.with_sample_rate(wanted));
            }
        }
    }
    device.default_input_config().map_err(|e| e.to_string())
}

fn start_stream(
    wanted_rate: u32,
    frame_ms: u64,
    frames: mpsc::Sender<Frame>,
) -> Result<(cpal::Stream, u32), String> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| "no input device available".to_string())?;
    let supported = pick_config(&device, wanted_rate)?;

    let sample_rate = supported.sample_rate().0;
    let channels = supported.channels() as usize;
    let frame_len = ((sample_rate as u64 * frame_ms) / 1000).max(1) as usize;
    let stream_config = supported.config();

    let errors = frames.clone();
    let on_error = move |e: cpal::StreamError| {
        tracing::warn!("Microphone stream error: {}", e);
        let _ = errors.try_send(Err(e.to_string()));
    };

    let stream = match supported.sample_format() {
        SampleFormat::I16 => {
            let mut framer = Framer::new(channels, frame_len, frames);
            device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    framer.push(data.iter().copied())
                },
                on_error,
                None,
            )
        }
        SampleFormat::F32 => {
            let mut framer = Framer::new(channels, frame_len, frames);
            device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    framer.push(
                        data.iter()
                            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16),
                    )
                },
                on_error,
                None,
            )
        }
        other => return Err(format!("unsupported sample format {:?}", other)),
    }
    .map_err(|e| e.to_string())?;

    stream.play().map_err(|e| e.to_string())?;
    Ok((stream, sample_rate))
}

/// Downmixes interleaved samples and cuts them into fixed-length frames.
struct Framer {
    channels: usize,
    frame_len: usize,
    partial: Vec<i32>,
    pending: Vec<i16>,
    out: mpsc::Sender<Frame>,
}

impl Framer {
    fn new(channels: usize, frame_len: usize, out: mpsc::Sender<Frame>) -> Self {
        Self {
            channels: channels.max(1),
            frame_len,
            partial: Vec::with_capacity(channels.max(1)),
            pending: Vec::with_capacity(frame_len),
            out,
        }
    }

    fn push(&mut self, interleaved: impl Iterator<Item = i16>) {
        for sample in interleaved {
            self.partial.push(sample as i32);
            if self.partial.len() < self.channels {
                continue;
            }
            let mono = self.partial.iter().sum::<i32>() / self.channels as i32;
            self.partial.clear();
            self.pending.push(mono as i16);

            if self.pending.len() == self.frame_len {
                let frame = std::mem::replace(&mut self.pending, Vec::with_capacity(self.frame_len));
                // A full queue means nobody is listening; drop the frame.
                let _ = self.out.try_send(Ok(frame));
            }
        }
    }
}
