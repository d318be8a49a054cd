//! Token vocabulary — the unit of comparison for the tiling matcher
//!
//! Two token families share one vocabulary:
//!
//! 1. **Lexical tokens** — classified surface text (keyword, identifier,
//!    number, string, operator, ...). Equality means kind *and* text.
//!
//! 2. **Structural markers** — program shape with names and values erased
//!    (`FOR_BEGIN`, `VARDEF`, `FUNCTION_END`, ...). Equality means kind only,
//!    which is what lets variable-renamed code still match.
//!
//! Tokens are created by a tokenizer and never mutated afterwards. The
//! matcher addresses tokens by sequence index, not byte offset.

use serde::{Deserialize, Serialize};

// ─── Structural Constructs ─────────────────────────────────────────

/// A nesting construct whose begin/end markers are paired via the brace stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Construct {
    Class,
    Struct,
    Enum,
    Union,
    Function,
    If,
    For,
    While,
    Switch,
    Try,
    Catch,
}

impl Construct {
    fn name(&self) -> &'static str {
        match self {
            Self::Class => "CLASS",
            Self::Struct => "STRUCT",
            Self::Enum => "ENUM",
            Self::Union => "UNION",
            Self::Function => "FUNCTION",
            Self::If => "IF",
            Self::For => "FOR",
            Self::While => "WHILE",
            Self::Switch => "SWITCH",
            Self::Try => "TRY",
            Self::Catch => "CATCH",
        }
    }
}

/// A flow token emitted without stack interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
    Else,
    Case,
    Default,
    Return,
    Break,
    Continue,
    Goto,
    Throw,
}

impl FlowKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Else => "ELSE",
            Self::Case => "CASE",
            Self::Default => "DEFAULT",
            Self::Return => "RETURN",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Goto => "GOTO",
            Self::Throw => "THROW",
        }
    }
}

// ─── Token Kind ────────────────────────────────────────────────────

/// The fixed vocabulary of token classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // ── Lexical ──
    Keyword,
    Identifier,
    Number,
    Str,
    Char,
    Operator,
    Punct,
    Comment,

    // ── Structural ──
    Begin(Construct),
    End(Construct),
    Flow(FlowKind),
    /// Assignment, including compound and increment/decrement forms.
    Assign,
    /// Function or method invocation.
    Call,
    /// Object construction (`new`).
    New,
    /// Variable or parameter definition; the identifier is deliberately lost.
    VarDef,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Keyword => write!(f, "KEYWORD"),
            Self::Identifier => write!(f, "IDENTIFIER"),
            Self::Number => write!(f, "NUMBER"),
            Self::Str => write!(f, "STRING"),
            Self::Char => write!(f, "CHAR"),
            Self::Operator => write!(f, "OPERATOR"),
            Self::Punct => write!(f, "PUNCTUATION"),
            Self::Comment => write!(f, "COMMENT"),
            Self::Begin(c) => write!(f, "{}_BEGIN", c.name()),
            Self::End(c) => write!(f, "{}_END", c.name()),
            Self::Flow(k) => write!(f, "{}", k.name()),
            Self::Assign => write!(f, "ASSIGN"),
            Self::Call => write!(f, "CALL"),
            Self::New => write!(f, "NEW"),
            Self::VarDef => write!(f, "VARDEF"),
        }
    }
}

/// Coarse semantic annotation on structural tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticTag {
    ControlFlow,
    Declaration,
    Operation,
}

// ─── Token ─────────────────────────────────────────────────────────

/// A classified unit of source text. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// Surface text; empty for structural markers (the erasure is the point).
    pub text: String,
    /// 1-based source line.
    pub line: usize,
    /// 0-based column within the line.
    pub column: usize,
    pub semantic: Option<SemanticTag>,
}

impl Token {
    pub fn lexical(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
            semantic: None,
        }
    }

    pub fn structural(kind: TokenKind, line: usize) -> Self {
        let semantic = match kind {
            TokenKind::Begin(_) | TokenKind::End(_) | TokenKind::Flow(_) => {
                Some(SemanticTag::ControlFlow)
            }
            TokenKind::VarDef => Some(SemanticTag::Declaration),
            TokenKind::Assign | TokenKind::Call | TokenKind::New => Some(SemanticTag::Operation),
            _ => None,
        };
        Self {
            kind,
            text: String::new(),
            line,
            column: 0,
            semantic,
        }
    }
}

// ─── Token Sequence ────────────────────────────────────────────────

/// An ordered token list; index is the matcher's unit of position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }
}

impl std::ops::Index<usize> for TokenSequence {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
