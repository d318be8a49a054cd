//! Structural tokenizer — program shape with names and values erased
//!
//! A line-oriented state machine: comments and directive lines are stripped,
//! then each line is folded through an explicit nesting stack. Opening a
//! recognized construct emits `<TAG>_BEGIN` and arms the stack; `{` pushes;
//! `}` pops and emits `<TAG>_END` (underflow is a no-op, never a crash).
//! Flow keywords emit without stack interaction. Statement-shaped content
//! collapses to a single generic op token — `VARDEF`, `ASSIGN`, `CALL` or
//! `NEW` — with the identifier name and literal value deliberately lost.
//! That information loss is what makes this mode compare program shape
//! rather than surface text.
//!
//! C-family rules are the fully specified set; Java and JavaScript share the
//! brace machinery with their own keyword tables; Python has reduced
//! coverage (no brace pairing, so no `_END` markers). A language may emit an
//! empty sequence without erroring.

use crate::language::Language;
use crate::token::{Construct, FlowKind, Token, TokenKind, TokenSequence};
use once_cell::sync::Lazy;
use regex::Regex;

/// Tokenize `source` into structural markers for `language`.
pub fn tokenize(source: &str, language: Language) -> TokenSequence {
    let cleaned = super::strip_comments(source);
    let rules = RuleSet::for_language(language);
    let mut machine = Machine::new(rules);

    for (idx, line) in cleaned.lines().enumerate() {
        machine.process_line(line, idx + 1);
    }
    machine.finish()
}

// ─── Per-Language Rules ────────────────────────────────────────────

struct RuleSet {
    braces: bool,
    type_keywords: &'static [&'static str],
    modifiers: &'static [&'static str],
    language: Language,
}

impl RuleSet {
    fn for_language(language: Language) -> Self {
        match language {
            Language::C => Self {
                braces: true,
                type_keywords: &[
                    "int", "long", "short", "char", "float", "double", "void", "unsigned",
                    "signed", "size_t", "bool",
                ],
                modifiers: &["const", "static", "extern", "register", "volatile", "inline"],
                language,
            },
            Language::Cpp => Self {
                braces: true,
                type_keywords: &[
                    "int", "long", "short", "char", "float", "double", "void", "unsigned",
                    "signed", "size_t", "bool", "auto", "string",
                ],
                modifiers: &[
                    "const", "static", "extern", "register", "volatile", "inline", "constexpr",
                    "virtual", "public", "private", "protected",
                ],
                language,
            },
            Language::Java => Self {
                braces: true,
                type_keywords: &[
                    "int", "long", "short", "char", "float", "double", "void", "boolean", "byte",
                    "String", "var",
                ],
                modifiers: &[
                    "public", "private", "protected", "static", "final", "abstract",
                    "synchronized", "native", "transient",
                ],
                language,
            },
            Language::JavaScript => Self {
                braces: true,
                type_keywords: &["var", "let", "const"],
                modifiers: &["async", "static", "export"],
                language,
            },
            Language::Python => Self {
                braces: false,
                type_keywords: &[],
                modifiers: &["async", "global", "nonlocal"],
                language,
            },
        }
    }

    fn construct(&self, word: &str) -> Option<Construct> {
        let c = match word {
            "class" => Construct::Class,
            "struct" if self.language != Language::Python => Construct::Struct,
            "enum" if self.language != Language::Python => Construct::Enum,
            "union" if matches!(self.language, Language::C | Language::Cpp) => Construct::Union,
            "if" => Construct::If,
            "for" => Construct::For,
            "while" => Construct::While,
            "switch" if self.language != Language::Python => Construct::Switch,
            "try" => Construct::Try,
            "catch" if self.language != Language::Python => Construct::Catch,
            "except" if self.language == Language::Python => Construct::Catch,
            "def" if self.language == Language::Python => Construct::Function,
            "function" if self.language == Language::JavaScript => Construct::Function,
            _ => return None,
        };
        Some(c)
    }

    /// Control constructs announce themselves at the keyword; class-like and
    /// function constructs defer their `BEGIN` until the opening brace so
    /// that forward declarations emit nothing.
    fn announces_immediately(&self, c: Construct) -> bool {
        !self.braces
            || matches!(
                c,
                Construct::If
                    | Construct::For
                    | Construct::While
                    | Construct::Switch
                    | Construct::Try
                    | Construct::Catch
            )
    }

    fn flow(&self, word: &str) -> Option<FlowKind> {
        let f = match word {
            "else" => FlowKind::Else,
            "elif" if self.language == Language::Python => FlowKind::Else,
            "case" if self.language != Language::Python => FlowKind::Case,
            "default" if self.language != Language::Python => FlowKind::Default,
            "return" => FlowKind::Return,
            "break" => FlowKind::Break,
            "continue" => FlowKind::Continue,
            "goto" if matches!(self.language, Language::C | Language::Cpp) => FlowKind::Goto,
            "throw" if self.language != Language::Python => FlowKind::Throw,
            "raise" if self.language == Language::Python => FlowKind::Throw,
            _ => return None,
        };
        Some(f)
    }

    fn is_type_keyword(&self, word: &str) -> bool {
        self.type_keywords.contains(&word)
    }

    fn is_modifier(&self, word: &str) -> bool {
        self.modifiers.contains(&word)
    }

    fn is_directive(&self, trimmed: &str) -> bool {
        trimmed.starts_with('#')
            || trimmed.starts_with("import ")
            || trimmed.starts_with("using ")
            || trimmed.starts_with("package ")
            || (trimmed.starts_with("from ") && trimmed.contains(" import "))
    }
}

// ─── Statement State ───────────────────────────────────────────────

/// Evidence gathered for the statement currently being scanned. Collapsed
/// into at most one generic op token when the statement ends.
#[derive(Default)]
struct StmtState {
    start_line: usize,
    saw_type: bool,
    saw_assign: bool,
    saw_new: bool,
    saw_call: bool,
    idents: usize,
    last_was_ident: bool,
    /// Set for class/function headers: their parameter lists are not
    /// statements and must not emit op tokens.
    suppress_ops: bool,
}

// ─── The Machine ───────────────────────────────────────────────────

struct Machine {
    rules: RuleSet,
    stack: Vec<Option<Construct>>,
    pending: Option<Construct>,
    pending_emitted: bool,
    paren_depth: usize,
    stmt: StmtState,
    tokens: Vec<Token>,
}

/// One linear pass worth of lexemes: identifiers, literals and the symbols
/// the machine reacts to. Strings match as a unit so brace-looking contents
/// cannot desynchronize the stack.
static LEXEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"[A-Za-z_][A-Za-z0-9_]*|"(?:\\.|[^"\\])*"|'(?:\\.|[^'\\])*'|\d+(?:\.\d+)?|\+\+|--|(?:<<|>>|[+\-*/%&|^!=<>])=|&&|\|\||::|->|[{}()\[\];,:=<>+\-*/%!&|^~?.]"#,
    )
    .expect("static lexeme pattern")
});

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "++", "--",
];

impl Machine {
    fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            stack: Vec::new(),
            pending: None,
            pending_emitted: false,
            paren_depth: 0,
            stmt: StmtState::default(),
            tokens: Vec::new(),
        }
    }

    fn process_line(&mut self, line: &str, line_no: usize) {
        let trimmed = line.trim();
        if trimmed.is_empty() || self.rules.is_directive(trimmed) {
            return;
        }

        for m in LEXEME.find_iter(trimmed) {
            self.process_lexeme(m.as_str(), line_no);
        }

        // Python statements end with the line; brace languages flush at
        // `;` / `{` / `}` instead.
        if !self.rules.braces {
            self.flush_statement();
        }
    }

    fn process_lexeme(&mut self, lexeme: &str, line: usize) {
        if self.stmt.start_line == 0 {
            self.stmt.start_line = line;
        }

        let first = lexeme.chars().next().unwrap_or('\0');
        if first.is_ascii_alphabetic() || first == '_' {
            self.process_word(lexeme, line);
            return;
        }
        if first.is_ascii_digit() || first == '"' || first == '\'' {
            self.stmt.last_was_ident = false;
            return;
        }

        match lexeme {
            "(" => {
                if self.stmt.last_was_ident {
                    let is_function_header = self.rules.braces
                        && self.stmt.saw_type
                        && !self.stmt.saw_assign
                        && self.stmt.idents == 1
                        && self.paren_depth == 0
                        && self.pending.is_none();
                    if is_function_header {
                        self.pending = Some(Construct::Function);
                        self.pending_emitted = false;
                        self.stmt.suppress_ops = true;
                    } else {
                        self.stmt.saw_call = true;
                    }
                }
                self.paren_depth += 1;
                self.stmt.last_was_ident = false;
            }
            ")" => {
                self.paren_depth = self.paren_depth.saturating_sub(1);
                self.stmt.last_was_ident = false;
            }
            "{" if self.rules.braces => {
                self.flush_statement();
                if let Some(c) = self.pending {
                    if !self.pending_emitted {
                        self.emit(TokenKind::Begin(c), line);
                    }
                }
                self.stack.push(self.pending.take());
                self.pending_emitted = false;
            }
            "}" if self.rules.braces => {
                self.flush_statement();
                // Unmatched closing brace: no-op, not a crash.
                if let Some(Some(c)) = self.stack.pop() {
                    self.emit(TokenKind::End(c), line);
                }
                self.pending = None;
                self.pending_emitted = false;
            }
            ";" => {
                self.flush_statement();
                if self.paren_depth == 0 {
                    // Braceless control body or forward declaration; either
                    // way the announced construct never opens.
                    self.pending = None;
                    self.pending_emitted = false;
                }
            }
            op if ASSIGN_OPS.contains(&op) => {
                self.stmt.saw_assign = true;
                self.stmt.last_was_ident = false;
            }
            _ => {
                self.stmt.last_was_ident = false;
            }
        }
    }

    fn process_word(&mut self, word: &str, line: usize) {
        if let Some(c) = self.rules.construct(word) {
            if self.rules.announces_immediately(c) {
                self.emit(TokenKind::Begin(c), line);
                self.pending = Some(c);
                self.pending_emitted = true;
                if !self.rules.braces {
                    // Python headers (`def f(x):`) are not statements.
                    self.stmt.suppress_ops = true;
                }
            } else {
                self.pending = Some(c);
                self.pending_emitted = false;
                self.stmt.suppress_ops = true;
            }
            self.stmt.last_was_ident = false;
            return;
        }
        if let Some(f) = self.rules.flow(word) {
            self.emit(TokenKind::Flow(f), line);
            self.stmt.last_was_ident = false;
            return;
        }
        if word == "new" && self.rules.language != Language::Python {
            self.stmt.saw_new = true;
            self.stmt.last_was_ident = false;
            return;
        }
        if self.rules.is_modifier(word) {
            self.stmt.last_was_ident = false;
            return;
        }
        if self.rules.is_type_keyword(word) {
            self.stmt.saw_type = true;
            self.stmt.last_was_ident = false;
            return;
        }
        self.stmt.idents += 1;
        self.stmt.last_was_ident = true;
    }

    /// Collapse the gathered statement evidence into at most one op token.
    fn flush_statement(&mut self) {
        let stmt = std::mem::take(&mut self.stmt);
        if stmt.suppress_ops {
            return;
        }
        let line = stmt.start_line.max(1);
        if stmt.saw_type && stmt.idents > 0 {
            self.emit(TokenKind::VarDef, line);
        } else if stmt.saw_assign {
            self.emit(TokenKind::Assign, line);
        } else if stmt.saw_new {
            self.emit(TokenKind::New, line);
        } else if stmt.saw_call {
            self.emit(TokenKind::Call, line);
        }
    }

    fn emit(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token::structural(kind, line));
    }

    fn finish(mut self) -> TokenSequence {
        self.flush_statement();
        TokenSequence::new(self.tokens)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
