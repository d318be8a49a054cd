//! Tokenization — raw source text to token sequences
//!
//! Two modes behind one front door:
//!
//! - [`lexical`] scans left-to-right with an ordered per-language pattern
//!   table and keeps surface text.
//! - [`structural`] folds over lines with an explicit nesting stack and
//!   erases identifiers and literals, keeping only program shape.
//!
//! Both modes are lenient: malformed input degrades token coverage, it never
//! fails a scan. The scan position strictly increases every step.

pub mod lexical;
pub mod structural;

use crate::config::DetectorConfig;
use crate::language::Language;
use crate::token::TokenSequence;

/// A tokenizer constructed for one `(language, options)` pair. Pattern
/// tables are built once here and reused across comparisons via the
/// engine's analyzer cache.
#[derive(Debug)]
pub struct Tokenizer {
    language: Language,
    ignore_case: bool,
    ignore_comments: bool,
    structural_only: bool,
}

impl Tokenizer {
    pub fn new(language: Language, config: &DetectorConfig) -> Self {
        Self {
            language,
            ignore_case: config.ignore_case,
            ignore_comments: config.ignore_comments,
            structural_only: config.structural_only,
        }
    }

    /// Tokenize one source string in the configured mode.
    pub fn tokenize(&self, source: &str) -> TokenSequence {
        if self.structural_only {
            structural::tokenize(source, self.language)
        } else {
            lexical::tokenize(source, self.language, self.ignore_case, self.ignore_comments)
        }
    }
}

// ─── Shared Preprocessing ──────────────────────────────────────────

/// Strip `//`, `/* */` and full-line `#` comments while preserving line
/// structure (newlines survive so line numbers stay stable). String and
/// char literals are left intact, including their comment-looking contents.
/// Unterminated block comments consume to end of input.
pub(crate) fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut in_string = false;
    let mut string_delim = '"';

    while i < len {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < len {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == string_delim {
                in_string = false;
            }
            i += 1;
        } else if c == '/' && i + 1 < len && chars[i + 1] == '/' {
            while i < len && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && i + 1 < len && chars[i + 1] == '*' {
            i += 2;
            while i < len {
                if chars[i] == '\n' {
                    out.push('\n');
                }
                if chars[i] == '*' && i + 1 < len && chars[i + 1] == '/' {
                    i += 2;
                    break;
                }
                i += 1;
            }
        } else if c == '#' && line_start(&chars, i) && !is_directive(&chars, i) {
            // Script-style comment line; directives are handled downstream.
            while i < len && chars[i] != '\n' {
                i += 1;
            }
        } else {
            if c == '"' || c == '\'' {
                in_string = true;
                string_delim = c;
            }
            out.push(c);
            i += 1;
        }
    }

    out
}

fn line_start(chars: &[char], i: usize) -> bool {
    chars[..i].iter().rev().take_while(|c| **c != '\n').all(|c| c.is_whitespace())
}

fn is_directive(chars: &[char], i: usize) -> bool {
    let rest: String = chars[i..].iter().take(12).collect();
    rest.starts_with("#include") || rest.starts_with("#define") || rest.starts_with("#pragma")
        || rest.starts_with("#if") || rest.starts_with("#endif") || rest.starts_with("#else")
}

// ─── Tests ─────────────────────────────────────────────────────────
