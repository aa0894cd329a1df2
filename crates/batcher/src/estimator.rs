use once_cell::sync::Lazy;
use tiktoken_rs::CoreBPE;

// Loaded once per process; None when the encoder data cannot be initialized,
// which flips every estimate onto the word-count fallback.
static CL100K: Lazy<Option<CoreBPE>> = Lazy::new(|| tiktoken_rs::cl100k_base().ok());

/// Estimates the processing-cost weight of a piece of text in tokens
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenEstimator;

impl TokenEstimator {
    /// Create a new token estimator
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Estimated token count for `text`, always at least 1.
    ///
    /// Uses the cl100k reference tokenizer when available; otherwise falls
    /// back to counting whitespace-delimited words with a floor of 1.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        match CL100K.as_ref() {
            Some(bpe) => bpe.encode_with_special_tokens(text).len().max(1),
            None => Self::fallback_count(text),
        }
    }

    /// Whitespace word count with a floor of 1; never 0, never negative
    #[must_use]
    pub fn fallback_count(text: &str) -> usize {
        text.split_whitespace().count().max(1)
    }
}
