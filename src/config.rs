//! Detector configuration
//!
//! An immutable record validated eagerly at construction — the only failure
//! mode the engine propagates. Per-comparison outcomes are always numeric,
//! never errors.

use crate::language::Language;
use crate::{TesseraError, TesseraResult};
use serde::{Deserialize, Serialize};

/// Engine configuration. Not mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Language to tokenize as; `None` means auto-detect from source A.
    pub language: Option<Language>,
    /// Minimum run length for a tile to be extracted (≥ 1).
    pub minimum_token_match: usize,
    /// Similarity floor below which matched spans are suppressed (0.0–1.0).
    pub minimum_similarity: f64,
    /// Case-fold lexical token text before comparison.
    pub ignore_case: bool,
    /// Drop comment tokens during lexical tokenization.
    pub ignore_comments: bool,
    /// Collapse whitespace before exact-match span classification.
    pub normalize_whitespace: bool,
    /// Compare program shape (structural tokens) instead of surface text.
    pub structural_only: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            language: None,
            minimum_token_match: 9,
            minimum_similarity: 0.0,
            ignore_case: false,
            ignore_comments: true,
            normalize_whitespace: true,
            structural_only: true,
        }
    }
}

impl DetectorConfig {
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_minimum_token_match(mut self, minimum: usize) -> Self {
        self.minimum_token_match = minimum;
        self
    }

    pub fn with_minimum_similarity(mut self, minimum: f64) -> Self {
        self.minimum_similarity = minimum;
        self
    }

    pub fn lexical(mut self) -> Self {
        self.structural_only = false;
        self
    }

    /// Reject malformed configuration before any comparison runs.
    pub fn validate(&self) -> TesseraResult<()> {
        if self.minimum_token_match < 1 {
            return Err(TesseraError::InvalidConfig(
                "minimum_token_match must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.minimum_similarity) || self.minimum_similarity.is_nan() {
            return Err(TesseraError::InvalidConfig(format!(
                "minimum_similarity must be within [0, 1], got {}",
                self.minimum_similarity
            )));
        }
        Ok(())
    }

    /// Fingerprint of the options that affect tokenizer construction.
    /// Keys the engine's analyzer cache together with the language.
    pub(crate) fn tokenizer_fingerprint(&self) -> u8 {
        (self.ignore_case as u8)
            | (self.ignore_comments as u8) << 1
            | (self.structural_only as u8) << 2
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
