use thiserror::Error;

use mindful_core::error::MindfulError;
use mindful_core::events::StatusEvent;

/// Why an input-acquisition attempt produced no text.
///
/// Every variant ends the attempt; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No speech started within the listen window (live capture only).
    #[error("listening timed out before speech started")]
    Timeout,
    /// Audio was present but could not be turned into text.
    #[error("speech could not be understood")]
    Unrecognized,
    /// The recognition service or the capture device could not be used.
    #[error("recognition service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl CaptureError {
    /// Status notification announcing this failure to the user.
    pub fn status_event(&self) -> StatusEvent {
        match self {
            CaptureError::Timeout => StatusEvent::TimedOut,
            CaptureError::Unrecognized => StatusEvent::NotUnderstood,
            CaptureError::ServiceUnavailable(reason) => StatusEvent::ServiceUnavailable {
                reason: reason.clone(),
            },
        }
    }
}

/// Outcome of a failed call to the remote recognition service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognitionError {
    /// The service answered but found no transcript.
    #[error("no transcript matched the audio")]
    NoMatch,
    /// Network, auth, quota, or protocol failure.
    #[error("recognition request failed: {0}")]
    Service(String),
}

impl From<RecognitionError> for CaptureError {
    fn from(err: RecognitionError) -> Self {
        match err {
            RecognitionError::NoMatch => CaptureError::Unrecognized,
            RecognitionError::Service(reason) => CaptureError::ServiceUnavailable(reason),
        }
    }
}

impl From<CaptureError> for MindfulError {
    fn from(err: CaptureError) -> Self {
        MindfulError::Recognition(err.to_string())
    }
}
