//! Report rendering — text summaries and JSON views of an ensemble verdict
//!
//! Pure views over `EnsembleResult`: a one-paragraph text summary, a
//! structured `DetailedReport` with quality tier and recommendations, and a
//! JSON rendering for machine consumers. No state, no side effects.

use crate::config::DetectorConfig;
use crate::ensemble::{EnsembleResult, MatchType};
use crate::TesseraResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Evidence quality, derived from ensemble confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    High,
    Medium,
    Low,
}

impl QualityTier {
    fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.75 {
            Self::High
        } else if confidence >= 0.5 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// One matched span, flattened for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpanEntry {
    pub lines_a: (usize, usize),
    pub lines_b: (usize, usize),
    pub match_type: MatchType,
    pub token_length: usize,
}

/// A full structured report for one comparison pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedReport {
    pub generated_at: DateTime<Utc>,
    pub language: String,
    pub legacy_similarity: f64,
    pub structural_similarity: f64,
    pub combined_similarity: f64,
    pub confidence: f64,
    pub algorithm: String,
    pub quality: QualityTier,
    pub suspicious: bool,
    pub minimum_token_match: usize,
    pub spans: Vec<SpanEntry>,
    pub recommendations: Vec<String>,
}

/// One-paragraph text summary of a verdict.
pub fn summary(result: &EnsembleResult) -> String {
    let verdict = if result.is_suspicious() {
        "SUSPICIOUS"
    } else {
        "UNREMARKABLE"
    };
    format!(
        "{verdict}: {:.1}% combined similarity ({} channel, {:.0}% confidence) \
         across {} matched span(s) of {} — structural {:.1}%, whole-text {:.1}%.",
        result.combined_similarity * 100.0,
        result.algorithm,
        result.confidence * 100.0,
        result.details.len(),
        result.language,
        result.structural_similarity * 100.0,
        result.legacy_similarity * 100.0,
    )
}

/// Build the structured report for a verdict.
pub fn detailed(result: &EnsembleResult, config: &DetectorConfig) -> DetailedReport {
    let spans = result
        .details
        .iter()
        .map(|d| SpanEntry {
            lines_a: (d.start_line_a, d.end_line_a),
            lines_b: (d.start_line_b, d.end_line_b),
            match_type: d.match_type,
            token_length: d.token_length,
        })
        .collect();

    DetailedReport {
        generated_at: Utc::now(),
        language: result.language.to_string(),
        legacy_similarity: result.legacy_similarity,
        structural_similarity: result.structural_similarity,
        combined_similarity: result.combined_similarity,
        confidence: result.confidence,
        algorithm: result.algorithm.to_string(),
        quality: QualityTier::from_confidence(result.confidence),
        suspicious: result.is_suspicious(),
        minimum_token_match: config.minimum_token_match,
        spans,
        recommendations: recommendations(result),
    }
}

/// Render a detailed report as pretty JSON.
pub fn render_json(report: &DetailedReport) -> TesseraResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn recommendations(result: &EnsembleResult) -> Vec<String> {
    let mut out = Vec::new();

    if result.is_suspicious() {
        out.push(
            "Significant overlap detected; manual review of the matched spans is warranted."
                .to_string(),
        );
    }
    if result.span_count(MatchType::Exact) > 0 {
        out.push(format!(
            "{} span(s) are verbatim copies up to whitespace.",
            result.span_count(MatchType::Exact)
        ));
    }
    let renamed = result.span_count(MatchType::Structural);
    if renamed > 0 {
        out.push(format!(
            "{renamed} span(s) match after identifier renaming, a common obfuscation step."
        ));
    }
    if result.confidence < 0.5 {
        out.push(
            "Low confidence: the two similarity channels disagree or the inputs are short; \
             treat the score as indicative only."
                .to_string(),
        );
    }
    if out.is_empty() {
        out.push("No notable overlap; no action required.".to_string());
    }
    out
}

// ─── Tests ─────────────────────────────────────────────────────────
