//! Lexicon-based polarity scoring.

use std::collections::HashMap;

use regex::Regex;

use crate::lexicon::{self, INTENSIFIERS, NEGATION_FACTOR, NEGATION_WINDOW, POLARITY};

/// Scores free text on a [-1.0, 1.0] polarity scale.
///
/// Implementations must be deterministic: the same text always yields the
/// same score. Empty text scores 0.0.
pub trait SentimentClassifier: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

/// Classifier over the fixed word lists in [`crate::lexicon`].
///
/// Each lexicon hit is one assessment. A directly preceding intensifier
/// scales it, a negation within [`NEGATION_WINDOW`] tokens multiplies it by
/// [`NEGATION_FACTOR`]. The polarity is the mean of all assessments.
pub struct LexiconClassifier {
    tokenizer: Regex,
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    /// Build the classifier, compiling the tokenizer and indexing the lexicon.
    pub fn new() -> Self {
        Self {
            tokenizer: Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("Invalid tokenizer regex"),
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        let normalized = text.to_lowercase().replace('\u{2019}', "'");
        self.tokenizer
            .find_iter(&normalized)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    /// Per-word assessments in text order. Exposed for diagnostics.
    pub fn assessments(&self, text: &str) -> Vec<(String, f64)> {
        let tokens = self.tokens(text);
        let mut out = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.polarity.get(token.as_str()) else {
                continue;
            };

            let mut score = base;
            if let Some(prev) = i.checked_sub(1).map(|j| tokens[j].as_str()) {
                if let Some(&factor) = self.intensifiers.get(prev) {
                    score = (score * factor).clamp(-1.0, 1.0);
                }
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| lexicon::is_negation(t)) {
                score *= NEGATION_FACTOR;
            }

            out.push((token.clone(), score));
        }

        out
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn polarity(&self, text: &str) -> f64 {
        let scores = self.assessments(text);
        if scores.is_empty() {
            return 0.0;
        }

        let sum: f64 = scores.iter().map(|(_, s)| s).sum();
        let polarity = (sum / scores.len() as f64).clamp(-1.0, 1.0);
        tracing::trace!(
            assessments = scores.len(),
            polarity,
            "Diary text scored"
        );
        polarity
    }
}
