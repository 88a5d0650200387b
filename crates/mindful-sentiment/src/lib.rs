//! Mindful Sentiment crate - lexicon polarity scoring and supportive responses.
//!
//! Diary text is scored by a fixed, versioned lexicon model into a polarity in
//! [-1.0, 1.0], which is then mapped to one of three canned messages.

pub mod classifier;
pub mod lexicon;
pub mod response;

pub use classifier::{LexiconClassifier, SentimentClassifier};
pub use lexicon::LEXICON_VERSION;
pub use response::{reflect, select, Band, Message, Reflection};
