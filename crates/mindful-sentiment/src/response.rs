//! Polarity bands and the canned messages shown for each.

use serde::Serialize;

use mindful_core::types::DiaryEntry;

use crate::classifier::SentimentClassifier;

/// Polarity strictly above this selects the positive band.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Polarity strictly below this selects the supportive band.
pub const SUPPORTIVE_THRESHOLD: f64 = -0.2;

const POSITIVE_MESSAGE: &str =
    "That sounds wonderful! It's lovely to hear such positivity. Keep embracing that joy.";
const SUPPORTIVE_MESSAGE: &str = "It sounds like you're going through a tough moment. \
Remember to be kind to yourself. A quiet cup of tea can be a comforting friend.";
const NEUTRAL_MESSAGE: &str =
    "Thank you for sharing. Taking a moment to reflect is a gift to yourself.";

/// Response category selected from a polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    /// Affirm the user's positive mood.
    Positive,
    /// Acknowledge without judgement.
    Neutral,
    /// Offer comfort and a coping suggestion.
    Supportive,
}

impl Band {
    /// Band for a polarity. Both thresholds are exclusive, so exactly 0.2
    /// and exactly -0.2 are neutral. NaN is neutral as well.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            Band::Positive
        } else if polarity < SUPPORTIVE_THRESHOLD {
            Band::Supportive
        } else {
            Band::Neutral
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Band::Positive => POSITIVE_MESSAGE,
            Band::Neutral => NEUTRAL_MESSAGE,
            Band::Supportive => SUPPORTIVE_MESSAGE,
        }
    }
}

/// A message ready for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Message {
    pub band: Band,
    pub text: &'static str,
}

/// Map a polarity to its display message.
pub fn select(polarity: f64) -> Message {
    let band = Band::from_polarity(polarity);
    Message {
        band,
        text: band.message(),
    }
}

/// Outcome of running a diary entry through classification and selection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Reflection {
    pub entry: DiaryEntry,
    pub message: Message,
}

/// Score `text` and pick its message.
///
/// Returns `None` for empty text: there is nothing to reflect on and the
/// classifier is not consulted.
pub fn reflect<C: SentimentClassifier + ?Sized>(classifier: &C, text: &str) -> Option<Reflection> {
    if text.is_empty() {
        return None;
    }

    let polarity = classifier.polarity(text);
    let message = select(polarity);
    tracing::debug!(polarity, band = ?message.band, "Diary entry reflected");

    Some(Reflection {
        entry: DiaryEntry {
            text: text.to_string(),
            polarity,
        },
        message,
    })
}
