//! Ensemble scorer & classifier — blending two similarity channels
//!
//! Two independent signals over the same comparison pair:
//!
//! 1. **Structural** — the token-tiling similarity from the matcher.
//!    Survives renaming, whitespace changes, and literal substitution.
//! 2. **Legacy** — whole-text similarity over whitespace-collapsed source,
//!    edit-distance based with a line-frequency cosine fallback for large
//!    inputs. Catches near-verbatim copies the structural channel dilutes
//!    when sources share boilerplate.
//!
//! The combined score leans toward the structural channel as matched-span
//! evidence grows, and a confidence figure reports how much the two
//! channels agree and how much of the input the evidence covers. Each
//! matched span is classified as Exact, Structural (rename-equivalent),
//! or Semantic.

use crate::engine::{Evaluation, SimilarityDetail};
use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Inputs longer than this (whitespace-collapsed) skip the quadratic edit
/// distance in favor of the frequency fallback.
const SEQUENCE_CUTOFF: usize = 500;

// ─── Classification Types ──────────────────────────────────────────

/// How a matched span relates its two fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Fragments identical up to whitespace
    Exact,
    /// Identical after normalizing identifiers and numeric literals
    Structural,
    /// Same token structure, different surface text
    Semantic,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "EXACT"),
            Self::Structural => write!(f, "STRUCTURAL"),
            Self::Semantic => write!(f, "SEMANTIC"),
        }
    }
}

/// Which channel the combined score effectively reflects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    Legacy,
    Structural,
    Hybrid,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "LEGACY"),
            Self::Structural => write!(f, "STRUCTURAL"),
            Self::Hybrid => write!(f, "HYBRID"),
        }
    }
}

/// The blended verdict for one comparison pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub language: Language,
    pub legacy_similarity: f64,
    pub structural_similarity: f64,
    pub combined_similarity: f64,
    /// Agreement/coverage-weighted confidence in `[0, 1]`
    pub confidence: f64,
    pub algorithm: Algorithm,
    pub details: Vec<SimilarityDetail>,
    pub total_tokens_a: usize,
    pub total_tokens_b: usize,
    pub matched_token_count: usize,
    pub minimum_token_match: usize,
}

impl EnsembleResult {
    /// Plagiarism suspicion heuristic: a strong confident combined score,
    /// or a swarm of tiny matched spans (scatter-copying barely above the
    /// match threshold).
    pub fn is_suspicious(&self) -> bool {
        if self.combined_similarity >= 0.8 && self.confidence >= 0.6 {
            return true;
        }
        if self.details.len() >= 5 {
            let tiny_limit = (self.minimum_token_match as f64 * 1.5).ceil() as usize;
            let tiny = self
                .details
                .iter()
                .filter(|d| d.token_length < tiny_limit)
                .count();
            return tiny as f64 > self.details.len() as f64 * 0.8;
        }
        false
    }

    /// Count of spans with the given classification.
    pub fn span_count(&self, kind: MatchType) -> usize {
        self.details.iter().filter(|d| d.match_type == kind).count()
    }
}

// ─── Combination ───────────────────────────────────────────────────

/// Blend the structural evaluation with the legacy whole-text score.
pub fn combine(
    evaluation: &Evaluation,
    legacy: f64,
    minimum_token_match: usize,
) -> EnsembleResult {
    let structural = evaluation.comparison.similarity;
    let span_count = evaluation.details.len();

    // More matched spans means more independent structural evidence, so
    // the structural channel earns more weight, capped at 0.85.
    let weight = (0.5 + 0.08 * span_count as f64).min(0.85);
    let combined = weight * structural + (1.0 - weight) * legacy;

    let total_a = evaluation.comparison.total_tokens_a;
    let total_b = evaluation.comparison.total_tokens_b;
    let matched = evaluation.comparison.matched_token_count;

    let agreement = 1.0 - (legacy - structural).abs();
    let coverage = if total_a + total_b > 0 {
        2.0 * matched as f64 / (total_a + total_b) as f64
    } else {
        1.0
    };
    let total = (total_a + total_b) as f64;
    let length_factor = total / (total + 100.0);
    let confidence =
        (0.5 * agreement + 0.3 * coverage + 0.2 * length_factor).clamp(0.0, 1.0);

    let algorithm = if confidence >= 0.7 || (legacy - structural).abs() <= 0.1 {
        Algorithm::Hybrid
    } else if structural >= legacy {
        Algorithm::Structural
    } else {
        Algorithm::Legacy
    };

    tracing::debug!(
        structural,
        legacy,
        combined,
        confidence,
        algorithm = %algorithm,
        "ensemble scored"
    );

    EnsembleResult {
        language: evaluation.language,
        legacy_similarity: legacy,
        structural_similarity: structural,
        combined_similarity: combined,
        confidence,
        algorithm,
        details: evaluation.details.clone(),
        total_tokens_a: total_a,
        total_tokens_b: total_b,
        matched_token_count: matched,
        minimum_token_match,
    }
}

// ─── Span Classification ───────────────────────────────────────────

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern"));
static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d[\w.]*").expect("number pattern"));
static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Classify a matched span by comparing its two text fragments.
pub fn classify_match(
    fragment_a: &str,
    fragment_b: &str,
    normalize_whitespace: bool,
) -> MatchType {
    let exact = if normalize_whitespace {
        collapse_whitespace(fragment_a) == collapse_whitespace(fragment_b)
    } else {
        fragment_a == fragment_b
    };
    if exact {
        return MatchType::Exact;
    }
    if placeholder_normalize(fragment_a) == placeholder_normalize(fragment_b) {
        return MatchType::Structural;
    }
    MatchType::Semantic
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

/// Replace every numeric literal with `0` and every identifier with `_`,
/// then collapse whitespace. Rename-equivalent fragments converge.
fn placeholder_normalize(text: &str) -> String {
    let text = NUMBER.replace_all(text, "0");
    let text = IDENTIFIER.replace_all(&text, "_");
    collapse_whitespace(&text)
}

// ─── Legacy Channel ────────────────────────────────────────────────

/// Whole-text similarity on whitespace-collapsed sources. Quadratic edit
/// distance below the cutoff, line-frequency cosine above it.
pub fn legacy_score(source_a: &str, source_b: &str) -> f64 {
    let a = collapse_whitespace(source_a);
    let b = collapse_whitespace(source_b);
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        _ => {}
    }
    if a.len().max(b.len()) > SEQUENCE_CUTOFF {
        frequency_similarity(source_a, source_b)
    } else {
        sequence_similarity(&a, &b)
    }
}

fn sequence_similarity(a: &str, b: &str) -> f64 {
    let distance = edit_distance(a, b);
    let longest = a.chars().count().max(b.chars().count());
    1.0 - distance as f64 / longest as f64
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Cosine similarity over trimmed-line frequency vectors.
fn frequency_similarity(source_a: &str, source_b: &str) -> f64 {
    use std::collections::HashMap;

    let count = |source: &str| {
        let mut freq: HashMap<String, f64> = HashMap::new();
        for line in source.lines() {
            let line = collapse_whitespace(line);
            if !line.is_empty() {
                *freq.entry(line).or_insert(0.0) += 1.0;
            }
        }
        freq
    };
    let freq_a = count(source_a);
    let freq_b = count(source_b);
    if freq_a.is_empty() || freq_b.is_empty() {
        return 0.0;
    }

    let dot: f64 = freq_a
        .iter()
        .filter_map(|(line, &na)| freq_b.get(line).map(|&nb| na * nb))
        .sum();
    let norm = |freq: &HashMap<String, f64>| {
        freq.values().map(|n| n * n).sum::<f64>().sqrt()
    };
    let denominator = norm(&freq_a) * norm(&freq_b);
    if denominator == 0.0 {
        0.0
    } else {
        dot / denominator
    }
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::engine::SimilarityEngine;

    fn analyze(a: &str, b: &str, minimum: usize) -> EnsembleResult {
        let config = DetectorConfig::default()
            .with_language(Language::Cpp)
            .with_minimum_token_match(minimum);
        SimilarityEngine::new(config)
            .expect("valid config")
            .analyze(a, b, None)
    }

    #[test]
    fn test_legacy_score_identity_and_empty_laws() {
        assert_eq!(legacy_score("int x = 1;", "int x = 1;"), 1.0);
        assert_eq!(legacy_score("", ""), 1.0);
        assert_eq!(legacy_score("int x;", ""), 0.0);
        assert_eq!(legacy_score("   \n\t", ""), 1.0);
    }

    #[test]
    fn test_legacy_score_partial_overlap() {
        let score = legacy_score("int alpha = 1;", "int alpha = 2;");
        assert!(score > 0.8 && score < 1.0, "one-char edit, got {score}");
    }

    #[test]
    fn test_frequency_fallback_on_large_inputs() {
        let a = "int value = compute();\n".repeat(60);
        let mut b = a.clone();
        b.push_str("int extra = other();\n");
        let score = legacy_score(&a, &b);
        assert!(score > 0.9, "mostly shared lines, got {score}");
    }

    #[test]
    fn test_classify_exact_ignores_whitespace() {
        assert_eq!(
            classify_match("int  x = 1;", "int x = 1;", true),
            MatchType::Exact
        );
        assert_eq!(
            classify_match("int  x = 1;", "int x = 1;", false),
            MatchType::Structural
        );
    }

    #[test]
    fn test_classify_structural_on_rename() {
        assert_eq!(
            classify_match("int total = 42;", "int count = 7;", true),
            MatchType::Structural
        );
    }

    #[test]
    fn test_classify_semantic_on_shape_change() {
        assert_eq!(
            classify_match("a += b;", "a = a * b;", true),
            MatchType::Semantic
        );
    }

    #[test]
    fn test_identical_sources_score_high_with_hybrid_label() {
        let src = "int add(int a,int b){return a+b;}";
        let result = analyze(src, src, 3);
        assert_eq!(result.combined_similarity, 1.0);
        assert_eq!(result.algorithm, Algorithm::Hybrid);
        assert!(result.is_suspicious());
    }

    #[test]
    fn test_renamed_code_classified_structural_channel() {
        // Same statement shape, different names: the structural channel
        // sees identity while the legacy channel drops well below it.
        let a = "int add(int a,int b){return a+b;}";
        let b = "int sum(int first,int second){return first+second;}";
        let result = analyze(a, b, 3);
        assert_eq!(result.structural_similarity, 1.0);
        assert!(result.legacy_similarity < 0.9);
        assert!(result.combined_similarity > result.legacy_similarity);
        assert_eq!(result.span_count(MatchType::Structural), 1);
    }

    #[test]
    fn test_disjoint_sources_not_suspicious() {
        let a = "int add(int a,int b){return a+b;}";
        let b = "while(queue_ready()){drain(queue);}";
        let result = analyze(a, b, 5);
        assert_eq!(result.structural_similarity, 0.0);
        assert!(result.combined_similarity < 0.8);
        assert!(!result.is_suspicious());
    }

    #[test]
    fn test_confidence_rises_with_agreement() {
        let src = "int add(int a,int b){return a+b;}";
        let same = analyze(src, src, 3);
        let renamed = analyze(
            src,
            "int sum(int first,int second){return first+second;}",
            3,
        );
        assert!(
            same.confidence > renamed.confidence,
            "channel agreement must raise confidence: {} vs {}",
            same.confidence,
            renamed.confidence
        );
    }
}
