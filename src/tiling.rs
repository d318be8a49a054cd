//! Greedy tiling matcher — iterative longest-common-run extraction
//!
//! The core algorithm. Each pass scans every unconsumed index pair, extends
//! the longest run of equal tokens it can find, records it as a tile and
//! marks its tokens consumed on both sides; passes repeat until no run
//! reaches the configured minimum length. No token is reused across tiles.
//!
//! Token equality depends on mode: structural mode compares kinds only
//! (which is what lets renamed or refactored code still match), lexical
//! mode compares kind and text.
//!
//! Worst case is O(n·m·L). That is inherent to the approach — callers with
//! very large inputs pre-filter at the orchestration layer. Termination is
//! guaranteed because every extraction strictly shrinks the unconsumed sets.

use crate::config::DetectorConfig;
use crate::token::{Token, TokenSequence};
use serde::{Deserialize, Serialize};

// ─── Types ─────────────────────────────────────────────────────────

/// A maximal run of positionally contiguous equal tokens, consumed
/// atomically in one matcher pass. Ranges are disjoint across tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Start index in sequence A.
    pub start_a: usize,
    /// Start index in sequence B.
    pub start_b: usize,
    /// Run length in tokens; always ≥ the configured minimum.
    pub length: usize,
}

/// Outcome of comparing one token sequence pair. Immutable once computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Dice-coefficient similarity in [0, 1].
    pub similarity: f64,
    /// Extracted tiles, sorted by `start_a`.
    pub tiles: Vec<Tile>,
    pub total_tokens_a: usize,
    pub total_tokens_b: usize,
    pub matched_token_count: usize,
}

impl ComparisonResult {
    fn unmatched(similarity: f64, total_a: usize, total_b: usize) -> Self {
        Self {
            similarity,
            tiles: Vec::new(),
            total_tokens_a: total_a,
            total_tokens_b: total_b,
            matched_token_count: 0,
        }
    }
}

// ─── The Matcher ───────────────────────────────────────────────────

/// Compare two token sequences. Never fails; every edge case resolves to a
/// defined numeric outcome:
///
/// - both sequences empty → similarity 1.0, zero tiles
/// - exactly one empty → similarity 0.0
/// - either side shorter than `minimum_token_match` → 0.0 without scanning
pub fn compare(
    seq_a: &TokenSequence,
    seq_b: &TokenSequence,
    config: &DetectorConfig,
) -> ComparisonResult {
    let n = seq_a.len();
    let m = seq_b.len();

    if n == 0 && m == 0 {
        return ComparisonResult::unmatched(1.0, 0, 0);
    }
    if n == 0 || m == 0 {
        return ComparisonResult::unmatched(0.0, n, m);
    }
    let minimum = config.minimum_token_match;
    if n < minimum || m < minimum {
        return ComparisonResult::unmatched(0.0, n, m);
    }

    let kind_only = config.structural_only;
    let equal = |a: &Token, b: &Token| {
        if kind_only {
            a.kind == b.kind
        } else {
            a.kind == b.kind && a.text == b.text
        }
    };

    let mut consumed_a = vec![false; n];
    let mut consumed_b = vec![false; m];
    let mut tiles: Vec<Tile> = Vec::new();

    loop {
        // One pass: find the longest run over all unconsumed index pairs.
        // Ties resolve to the first run found under this ascending scan
        // order; the final score is order-independent.
        let mut best: Option<Tile> = None;
        let mut best_len = 0usize;

        for i in 0..n {
            if consumed_a[i] {
                continue;
            }
            for j in 0..m {
                if consumed_b[j] {
                    continue;
                }
                let mut len = 0usize;
                while i + len < n
                    && j + len < m
                    && !consumed_a[i + len]
                    && !consumed_b[j + len]
                    && equal(&seq_a[i + len], &seq_b[j + len])
                {
                    len += 1;
                }
                if len > best_len {
                    best_len = len;
                    best = Some(Tile {
                        start_a: i,
                        start_b: j,
                        length: len,
                    });
                }
            }
        }

        match best {
            Some(tile) if tile.length >= minimum => {
                for k in 0..tile.length {
                    consumed_a[tile.start_a + k] = true;
                    consumed_b[tile.start_b + k] = true;
                }
                tiles.push(tile);
            }
            _ => break,
        }
    }

    tiles.sort_by_key(|t| t.start_a);
    let matched: usize = tiles.iter().map(|t| t.length).sum();
    let similarity = 2.0 * matched as f64 / (n + m) as f64;

    ComparisonResult {
        similarity,
        tiles,
        total_tokens_a: n,
        total_tokens_b: m,
        matched_token_count: matched,
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
