//! Similarity engine — orchestration, analyzer cache, line mapping
//!
//! Wires tokenizer selection and the tiling matcher together: resolves the
//! language (hint, then configuration, then detector), pulls a cached
//! tokenizer for that `(language, options)` pair, tokenizes both sides, runs
//! the matcher, and projects each tile back onto 1-based line ranges with
//! extracted text fragments.
//!
//! The cache is an explicit object owned by the engine — a read-through
//! `Mutex<HashMap>` that is append-only for the engine's lifetime — not a
//! hidden process-global. Comparisons themselves are synchronous and share
//! no other state.

use crate::config::DetectorConfig;
use crate::ensemble::{self, EnsembleResult, MatchType};
use crate::language::Language;
use crate::tiling::{self, ComparisonResult, Tile};
use crate::token::TokenSequence;
use crate::tokenize::Tokenizer;
use crate::TesseraResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ─── Line-Mapped Evidence ──────────────────────────────────────────

/// A tile projected onto the original sources: 1-based line ranges, the
/// covered text fragments, and the classified match type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarityDetail {
    pub start_line_a: usize,
    pub end_line_a: usize,
    pub start_line_b: usize,
    pub end_line_b: usize,
    pub fragment_a: String,
    pub fragment_b: String,
    pub match_type: MatchType,
    /// Tile length in tokens.
    pub token_length: usize,
}

/// Orchestrator output: the raw comparison plus its line-mapped details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub language: Language,
    pub comparison: ComparisonResult,
    /// Empty when the similarity fell below `minimum_similarity`; the
    /// numeric score is still reported and callers decide what to surface.
    pub details: Vec<SimilarityDetail>,
}

// ─── The Engine ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    language: Language,
    options: u8,
}

#[derive(Default)]
struct AnalyzerCache {
    tokenizers: HashMap<CacheKey, Arc<Tokenizer>>,
    hits: usize,
    misses: usize,
}

/// The similarity engine. Construction validates the configuration — the
/// only failure the engine ever propagates; comparisons always complete
/// with numeric outcomes.
pub struct SimilarityEngine {
    config: DetectorConfig,
    cache: Mutex<AnalyzerCache>,
}

impl SimilarityEngine {
    pub fn new(config: DetectorConfig) -> TesseraResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cache: Mutex::new(AnalyzerCache::default()),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Cache accounting: `(hits, misses)` since construction.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.lock().expect("analyzer cache poisoned");
        (cache.hits, cache.misses)
    }

    /// Compare two sources and map the resulting tiles to line ranges.
    /// Language resolution order: explicit hint, configured language,
    /// detection on source A.
    pub fn evaluate(
        &self,
        source_a: &str,
        source_b: &str,
        language_hint: Option<Language>,
    ) -> Evaluation {
        let language = language_hint
            .or(self.config.language)
            .unwrap_or_else(|| Language::detect(source_a));
        let tokenizer = self.tokenizer_for(language);

        let seq_a = tokenizer.tokenize(source_a);
        let seq_b = tokenizer.tokenize(source_b);
        tracing::debug!(
            language = %language,
            tokens_a = seq_a.len(),
            tokens_b = seq_b.len(),
            "tokenized comparison pair"
        );

        let comparison = tiling::compare(&seq_a, &seq_b, &self.config);

        let details = if comparison.similarity < self.config.minimum_similarity {
            Vec::new()
        } else {
            comparison
                .tiles
                .iter()
                .map(|tile| self.map_tile(tile, &seq_a, &seq_b, source_a, source_b))
                .collect()
        };

        tracing::debug!(
            similarity = comparison.similarity,
            tiles = comparison.tiles.len(),
            details = details.len(),
            "comparison complete"
        );

        Evaluation {
            language,
            comparison,
            details,
        }
    }

    /// Full pipeline: evaluate, compute the legacy whole-text signal, and
    /// blend both into an ensemble score with confidence and classification.
    pub fn analyze(
        &self,
        source_a: &str,
        source_b: &str,
        language_hint: Option<Language>,
    ) -> EnsembleResult {
        let evaluation = self.evaluate(source_a, source_b, language_hint);
        let legacy = ensemble::legacy_score(source_a, source_b);
        ensemble::combine(&evaluation, legacy, self.config.minimum_token_match)
    }

    // ── Internals ──────────────────────────────────────────────────

    fn tokenizer_for(&self, language: Language) -> Arc<Tokenizer> {
        let key = CacheKey {
            language,
            options: self.config.tokenizer_fingerprint(),
        };
        let mut cache = self.cache.lock().expect("analyzer cache poisoned");
        if let Some(tokenizer) = cache.tokenizers.get(&key).map(Arc::clone) {
            cache.hits += 1;
            return tokenizer;
        }
        cache.misses += 1;
        let tokenizer = Arc::new(Tokenizer::new(language, &self.config));
        cache.tokenizers.insert(key, Arc::clone(&tokenizer));
        tokenizer
    }

    /// Project a tile onto 1-based line ranges — the line of the first and
    /// last covered token on each side — and extract those line ranges as
    /// text fragments.
    fn map_tile(
        &self,
        tile: &Tile,
        seq_a: &TokenSequence,
        seq_b: &TokenSequence,
        source_a: &str,
        source_b: &str,
    ) -> SimilarityDetail {
        let (start_line_a, end_line_a) = tile_lines(seq_a, tile.start_a, tile.length);
        let (start_line_b, end_line_b) = tile_lines(seq_b, tile.start_b, tile.length);
        let fragment_a = extract_lines(source_a, start_line_a, end_line_a);
        let fragment_b = extract_lines(source_b, start_line_b, end_line_b);
        let match_type = ensemble::classify_match(
            &fragment_a,
            &fragment_b,
            self.config.normalize_whitespace,
        );

        SimilarityDetail {
            start_line_a,
            end_line_a,
            start_line_b,
            end_line_b,
            fragment_a,
            fragment_b,
            match_type,
            token_length: tile.length,
        }
    }
}

fn tile_lines(seq: &TokenSequence, start: usize, length: usize) -> (usize, usize) {
    let first = seq[start].line;
    let last = seq[start + length - 1].line;
    (first, last)
}

/// Extract an inclusive 1-based line range from a source string.
fn extract_lines(source: &str, start: usize, end: usize) -> String {
    source
        .lines()
        .skip(start.saturating_sub(1))
        .take(end.saturating_sub(start) + 1)
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Tests ─────────────────────────────────────────────────────────
