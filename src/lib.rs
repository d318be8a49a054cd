//! # tessera — Source-Code Similarity & Plagiarism Detection Engine
//!
//! Detects copied and lightly-disguised code between pairs of source files.
//! Renaming every variable, reflowing whitespace, and swapping literals all
//! leave the structural skeleton of a program intact, and that skeleton is
//! what this engine compares.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     SimilarityEngine                       │
//! │  ┌───────────┐  ┌───────────────────────────────────────┐  │
//! │  │ Language  │  │ Tokenizer cache (language × options)  │  │
//! │  │ detector  │  │   lexical  │  structural              │  │
//! │  └─────┬─────┘  └─────────┬─────────────────────────────┘  │
//! │        │                  │                                │
//! │  ┌─────▼──────────────────▼─────────────────────────────┐  │
//! │  │ Greedy tiling matcher (longest repeated common runs) │  │
//! │  └──────────────────────────┬───────────────────────────┘  │
//! │                             │                              │
//! │  ┌──────────────────────────▼───────────────────────────┐  │
//! │  │ Line mapping → Ensemble blend → Classification       │  │
//! │  │        (Exact / Structural / Semantic spans)         │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Capabilities
//!
//! - **Language Detection**: Regex indicator batteries for C, C++, Java,
//!   Python, and JavaScript
//! - **Lexical Tokenization**: Ordered anchored-pattern scanning with
//!   keyword/identifier precedence and literal preservation
//! - **Structural Tokenization**: Line-oriented statement collapse into a
//!   rename-invariant construct skeleton
//! - **Greedy Tiling**: Repeated longest-common-run extraction with
//!   non-reusable token masks and Dice-coefficient scoring
//! - **Ensemble Scoring**: Structural + whole-text channels blended with
//!   agreement/coverage confidence
//! - **Span Classification**: Exact, rename-equivalent, or semantic, per
//!   matched region
//! - **Reporting**: Text summaries and JSON detail views

pub mod config;
pub mod engine;
pub mod ensemble;
pub mod language;
pub mod report;
pub mod tiling;
pub mod token;
pub mod tokenize;

// Re-exports for convenience
pub use config::DetectorConfig;
pub use engine::{Evaluation, SimilarityDetail, SimilarityEngine};
pub use ensemble::{Algorithm, EnsembleResult, MatchType};
pub use language::Language;
pub use report::{DetailedReport, QualityTier};
pub use tiling::{ComparisonResult, Tile};
pub use token::{Token, TokenKind, TokenSequence};
pub use tokenize::Tokenizer;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TesseraError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type TesseraResult<T> = Result<T, TesseraError>;
