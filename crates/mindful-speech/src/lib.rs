//! Mindful Speech crate - turning spoken diary entries into text.
//!
//! Audio arrives either live from a microphone, where an energy-threshold
//! listener decides when speech starts and stops, or as a recorded WAV blob.
//! Both paths end at the same remote recognition service and share one error
//! taxonomy: [`CaptureError`].

pub mod acquisition;
pub mod error;
pub mod google;
pub mod listener;
#[cfg(feature = "microphone")]
pub mod microphone;
pub mod recognizer;
pub mod wav;

pub use acquisition::{text_or_empty, AudioInput, InputAcquisition};
pub use error::{CaptureError, RecognitionError};
pub use google::GoogleSpeechRecognizer;
pub use listener::{AudioSource, Listener, PcmSource};
#[cfg(feature = "microphone")]
pub use microphone::Microphone;
pub use recognizer::{MockRecognizer, RecognitionService, Recognizer};

// =============================================================================
// Audio buffer
// =============================================================================

/// Mono 16-bit PCM audio ready for recognition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioData {
    pub samples: Vec<i16>,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl AudioData {
    pub fn new(samples: Vec<i16>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Raw big-endian bytes, the byte order of `audio/l16`.
    pub fn to_l16_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_be_bytes()).collect()
    }
}
