//! Fixed word lists backing the lexicon classifier.
//!
//! Changing any value here changes classifier output, so bump
//! [`LEXICON_VERSION`] with it.

/// Version tag of the word lists below.
pub const LEXICON_VERSION: &str = "1";

/// Multiplier applied to an assessment preceded by a negation.
pub const NEGATION_FACTOR: f64 = -0.5;

/// How many tokens before an assessed word are searched for a negation.
pub const NEGATION_WINDOW: usize = 2;

/// Sentiment-bearing words and their polarity.
pub const POLARITY: &[(&str, f64)] = &[
    // =====================================================================
    // Positive
    // =====================================================================
    ("wonderful", 1.0),
    ("excellent", 1.0),
    ("perfect", 1.0),
    ("fantastic", 0.9),
    ("amazing", 0.9),
    ("marvelous", 0.9),
    ("delighted", 0.9),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("great", 0.8),
    ("happy", 0.8),
    ("love", 0.8),
    ("loved", 0.8),
    ("lovely", 0.75),
    ("beautiful", 0.75),
    ("grateful", 0.7),
    ("thankful", 0.7),
    ("blessed", 0.7),
    ("glad", 0.7),
    ("good", 0.7),
    ("enjoyed", 0.6),
    ("enjoy", 0.6),
    ("fun", 0.6),
    ("pleasant", 0.6),
    ("cheerful", 0.6),
    ("nice", 0.6),
    ("proud", 0.6),
    ("excited", 0.6),
    ("peaceful", 0.5),
    ("relaxed", 0.5),
    ("better", 0.5),
    ("hopeful", 0.5),
    ("kind", 0.5),
    ("warm", 0.4),
    ("comfortable", 0.4),
    ("sunny", 0.4),
    ("fine", 0.4),
    ("well", 0.4),
    ("calm", 0.3),
    ("content", 0.3),
    ("rested", 0.3),
    ("alright", 0.2),
    // =====================================================================
    // Negative
    // =====================================================================
    ("awful", -1.0),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("miserable", -1.0),
    ("worst", -1.0),
    ("hate", -0.8),
    ("hopeless", -0.8),
    ("scared", -0.7),
    ("afraid", -0.7),
    ("frightened", -0.7),
    ("bad", -0.7),
    ("angry", -0.6),
    ("upset", -0.6),
    ("depressed", -0.6),
    ("painful", -0.6),
    ("pain", -0.5),
    ("sad", -0.5),
    ("unhappy", -0.5),
    ("hurt", -0.5),
    ("sick", -0.5),
    ("ill", -0.5),
    ("worried", -0.5),
    ("anxious", -0.5),
    ("lonely", -0.5),
    ("alone", -0.4),
    ("worse", -0.4),
    ("dizzy", -0.4),
    ("weak", -0.4),
    ("confused", -0.4),
    ("frustrated", -0.4),
    ("difficult", -0.4),
    ("hard", -0.3),
    ("bored", -0.3),
    ("sore", -0.3),
    ("forgot", -0.3),
    ("grey", -0.3),
    ("gray", -0.3),
    ("tired", -0.2),
];

/// Words that scale the assessment directly following them.
pub const INTENSIFIERS: &[(&str, f64)] = &[
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("terribly", 1.4),
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("truly", 1.3),
    ("quite", 1.1),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("little", 0.7),
];

/// Words that flip an assessment that follows within the negation window.
pub const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "neither", "nor", "hardly", "cannot",
];

/// Whether a token negates what follows it.
pub fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}
