//! Lexical tokenizer — ordered pattern dispatch over raw text
//!
//! At each scan position an ordered list of anchored patterns is tried and
//! the first match commits. The ordering is part of the contract, not an
//! implementation detail: keywords must be tried before the general
//! identifier pattern, otherwise `for` would tokenize as an identifier and
//! matching equality (kind + text) would drift. Unmatched characters are
//! skipped one at a time — lenient recovery, never a failed scan.

use crate::language::Language;
use crate::token::{Token, TokenKind, TokenSequence};
use once_cell::sync::Lazy;
use regex::Regex;

/// Scan `source` into a flat lexical token sequence. Whitespace tokens are
/// always dropped; comments are dropped when `ignore_comments` is set; token
/// text is case-folded when `ignore_case` is set.
pub fn tokenize(
    source: &str,
    language: Language,
    ignore_case: bool,
    ignore_comments: bool,
) -> TokenSequence {
    let rules = rules_for(language);
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line = 1usize;
    let mut column = 0usize;

    while pos < source.len() {
        let rest = &source[pos..];
        let mut matched = None;

        for (pattern, kind) in rules {
            if let Some(m) = pattern.find(rest) {
                matched = Some((m.as_str(), *kind));
                break;
            }
        }

        let (text, kind) = match matched {
            Some(hit) => hit,
            None => {
                // No rule applies; skip a single character and keep going.
                let c = rest.chars().next().unwrap_or('\0');
                advance_position(&mut line, &mut column, &c.to_string());
                pos += c.len_utf8().max(1);
                continue;
            }
        };

        let token_line = line;
        let token_column = column;
        advance_position(&mut line, &mut column, text);
        pos += text.len();

        let kind = match kind {
            Some(k) => k,
            None => continue, // whitespace
        };
        if kind == TokenKind::Comment && ignore_comments {
            continue;
        }

        let text = if ignore_case {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        tokens.push(Token::lexical(kind, text, token_line, token_column));
    }

    TokenSequence::new(tokens)
}

fn advance_position(line: &mut usize, column: &mut usize, text: &str) {
    for c in text.chars() {
        if c == '\n' {
            *line += 1;
            *column = 0;
        } else {
            *column += 1;
        }
    }
}

// ─── Pattern Tables ────────────────────────────────────────────────

/// An ordered rule: anchored pattern plus the kind it classifies as.
/// `None` marks text to elide (whitespace).
type Rule = (Regex, Option<TokenKind>);

fn rules_for(language: Language) -> &'static [Rule] {
    match language {
        Language::C => &C_RULES,
        Language::Cpp => &CPP_RULES,
        Language::Java => &JAVA_RULES,
        Language::Python => &PYTHON_RULES,
        Language::JavaScript => &JS_RULES,
    }
}

/// Build a C-family rule table around a language-specific keyword set.
/// Order is load-bearing: comments, then keywords, then the general
/// identifier, then literals, operators, punctuation, whitespace.
fn c_family_rules(keywords: &str) -> Vec<Rule> {
    let re = |p: &str| Regex::new(p).expect("static lexical pattern");
    vec![
        (re(r"^//[^\n]*"), Some(TokenKind::Comment)),
        (re(r"^/\*(?s:.*?)(?:\*/|\z)"), Some(TokenKind::Comment)),
        (re(&format!(r"^(?:{keywords})\b")), Some(TokenKind::Keyword)),
        (re(r"^[A-Za-z_][A-Za-z0-9_]*"), Some(TokenKind::Identifier)),
        (
            re(r"^(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?)[uUlLfF]*"),
            Some(TokenKind::Number),
        ),
        (re(r#"^"(?:\\(?s:.)|[^"\\])*(?:"|\z)"#), Some(TokenKind::Str)),
        (re(r"^'(?:\\(?s:.)|[^'\\])*(?:'|\z)"), Some(TokenKind::Char)),
        (
            re(r"^(?:<<=|>>=|->|\+\+|--|&&|\|\||<=|>=|==|!=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|::|[-+*/%<>=!&|^~?])"),
            Some(TokenKind::Operator),
        ),
        (re(r"^[{}()\[\];,.:#@]"), Some(TokenKind::Punct)),
        (re(r"^\s+"), None),
    ]
}

static C_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    c_family_rules(
        "auto|break|case|char|const|continue|default|do|double|else|enum|extern|float|for|goto|\
         if|inline|int|long|register|return|short|signed|sizeof|static|struct|switch|typedef|\
         union|unsigned|void|volatile|while",
    )
});

static CPP_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    c_family_rules(
        "auto|bool|break|case|catch|char|class|const|constexpr|continue|default|delete|do|double|\
         else|enum|explicit|extern|false|float|for|friend|goto|if|inline|int|long|mutable|\
         namespace|new|nullptr|operator|private|protected|public|register|return|short|signed|\
         sizeof|static|struct|switch|template|this|throw|true|try|typedef|typename|union|\
         unsigned|using|virtual|void|volatile|while",
    )
});

static JAVA_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    c_family_rules(
        "abstract|assert|boolean|break|byte|case|catch|char|class|const|continue|default|do|\
         double|else|enum|extends|final|finally|float|for|goto|if|implements|import|instanceof|\
         int|interface|long|native|new|package|private|protected|public|return|short|static|\
         strictfp|super|switch|synchronized|this|throw|throws|transient|try|void|volatile|while",
    )
});

static JS_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let re = |p: &str| Regex::new(p).expect("static lexical pattern");
    let mut rules = c_family_rules(
        "async|await|break|case|catch|class|const|continue|debugger|default|delete|do|else|\
         export|extends|false|finally|for|function|if|import|in|instanceof|let|new|null|of|\
         return|static|super|switch|this|throw|true|try|typeof|undefined|var|void|while|with|\
         yield",
    );
    // Template literals sit with the string rules, before operators.
    rules.insert(6, (re(r"^`(?:\\(?s:.)|[^`\\])*(?:`|\z)"), Some(TokenKind::Str)));
    rules
});

static PYTHON_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let re = |p: &str| Regex::new(p).expect("static lexical pattern");
    vec![
        (re(r"^#[^\n]*"), Some(TokenKind::Comment)),
        (
            re(r#"^(?:"""(?s:.*?)(?:"""|\z)|'''(?s:.*?)(?:'''|\z))"#),
            Some(TokenKind::Str),
        ),
        (
            re(
                "^(?:False|None|True|and|as|assert|async|await|break|class|continue|def|del|\
                 elif|else|except|finally|for|from|global|if|import|in|is|lambda|nonlocal|not|\
                 or|pass|raise|return|try|while|with|yield)\\b",
            ),
            Some(TokenKind::Keyword),
        ),
        (re(r"^[A-Za-z_][A-Za-z0-9_]*"), Some(TokenKind::Identifier)),
        (
            re(r"^(?:0[xX][0-9a-fA-F]+|\d+(?:\.\d+)?(?:[eE][+-]?\d+)?[jJ]?)"),
            Some(TokenKind::Number),
        ),
        (re(r#"^"(?:\\(?s:.)|[^"\\])*(?:"|\z)"#), Some(TokenKind::Str)),
        (re(r"^'(?:\\(?s:.)|[^'\\])*(?:'|\z)"), Some(TokenKind::Str)),
        (
            re(r"^(?:\*\*=|//=|<<=|>>=|\*\*|//|<=|>=|==|!=|\+=|-=|\*=|/=|%=|&=|\|=|\^=|<<|>>|->|:=|[-+*/%<>=!&|^~@])"),
            Some(TokenKind::Operator),
        ),
        (re(r"^[{}()\[\];,.:]"), Some(TokenKind::Punct)),
        (re(r"^\s+"), None),
    ]
});

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(seq: &TokenSequence) -> Vec<TokenKind> {
        seq.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_beat_identifiers() {
        let seq = tokenize("for format", Language::Cpp, false, true);
        assert_eq!(
            kinds(&seq),
            vec![TokenKind::Keyword, TokenKind::Identifier],
            "'for' is a keyword, 'format' is not"
        );
    }

    #[test]
    fn test_for_loop_tokens() {
        let seq = tokenize("for(int i=0;i<n;i++)", Language::Cpp, false, true);
        let texts: Vec<&str> = seq.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["for", "(", "int", "i", "=", "0", ";", "i", "<", "n", ";", "i", "++", ")"]
        );
        assert_eq!(seq[0].kind, TokenKind::Keyword);
        assert_eq!(seq[1].kind, TokenKind::Punct);
        assert_eq!(seq[5].kind, TokenKind::Number);
        assert_eq!(seq[12].kind, TokenKind::Operator);
    }

    #[test]
    fn test_comments_dropped_when_ignored() {
        let seq = tokenize("x; // note\n/* block */ y;", Language::Cpp, false, true);
        assert!(seq.iter().all(|t| t.kind != TokenKind::Comment));
        let seq = tokenize("x; // note", Language::Cpp, false, false);
        assert!(seq.iter().any(|t| t.kind == TokenKind::Comment));
    }

    #[test]
    fn test_case_folding() {
        let seq = tokenize("Total = COUNT;", Language::Cpp, true, true);
        assert_eq!(seq[0].text, "total");
        assert_eq!(seq[2].text, "count");
    }

    #[test]
    fn test_unterminated_string_consumes_to_end() {
        let seq = tokenize("s = \"never closed\nmore text", Language::Cpp, false, true);
        let last = &seq[seq.len() - 1];
        assert_eq!(last.kind, TokenKind::Str);
        assert!(last.text.contains("more text"));
    }

    #[test]
    fn test_unmatched_characters_skipped() {
        // '$' has no C++ rule; the scan must keep going.
        let seq = tokenize("a $ b", Language::Cpp, false, true);
        let texts: Vec<&str> = seq.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_line_and_column_tracking() {
        let seq = tokenize("int x;\n  y = 1;", Language::Cpp, false, true);
        let y = seq.iter().find(|t| t.text == "y").expect("y token");
        assert_eq!(y.line, 2);
        assert_eq!(y.column, 2);
    }

    #[test]
    fn test_python_triple_quoted_string() {
        let seq = tokenize("s = \"\"\"multi\nline\"\"\"\nx = 1", Language::Python, false, true);
        assert!(seq.iter().any(|t| t.kind == TokenKind::Str && t.text.contains("multi")));
        assert!(seq.iter().any(|t| t.text == "x"));
    }

    #[test]
    fn test_empty_source() {
        assert!(tokenize("", Language::Cpp, false, true).is_empty());
    }
}
