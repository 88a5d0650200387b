use serde::{Deserialize, Serialize};

/// Severity of a status notification, mirroring how the presentation layer
/// styles it (info banner, warning banner, error banner).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Observational notifications emitted while acquiring input.
///
/// These are side-channel only: downstream logic never branches on them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum StatusEvent {
    /// Waiting for the user to speak.
    Listening,
    /// Audio captured, waiting on the recognition service.
    Recognizing,
    /// Recognized text is available.
    Recognized { chars: usize },
    /// No speech started within the listen window.
    TimedOut,
    /// Speech was heard but could not be turned into text.
    NotUnderstood,
    /// The recognition service could not be reached.
    ServiceUnavailable { reason: String },
}

impl StatusEvent {
    pub fn level(&self) -> StatusLevel {
        match self {
            StatusEvent::Listening
            | StatusEvent::Recognizing
            | StatusEvent::Recognized { .. } => StatusLevel::Info,
            StatusEvent::TimedOut => StatusLevel::Warning,
            StatusEvent::NotUnderstood | StatusEvent::ServiceUnavailable { .. } => {
                StatusLevel::Error
            }
        }
    }

    /// User-facing text for the notification.
    pub fn message(&self) -> String {
        match self {
            StatusEvent::Listening => "Listening... Please say something.".to_string(),
            StatusEvent::Recognizing => "Recognizing...".to_string(),
            StatusEvent::Recognized { .. } => "Got it.".to_string(),
            StatusEvent::TimedOut => "Listening timed out. Please try again.".to_string(),
            StatusEvent::NotUnderstood => {
                "Sorry, I could not understand what you said.".to_string()
            }
            StatusEvent::ServiceUnavailable { reason } => {
                format!("Could not connect to speech services; {}", reason)
            }
        }
    }
}
