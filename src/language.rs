//! Language detection — indicator batteries over raw source text
//!
//! Each candidate language carries a fixed set of regex indicators. The
//! detector counts how many fire and picks the language with the highest
//! count; ties and all-zero batteries resolve to the default rather than an
//! error. Pure, stateless, total.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Languages the tokenizers have rule sets for. C-family coverage is the
/// fully specified one; others have reduced structural coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
    JavaScript,
}

impl Language {
    /// Fallback when detection is inconclusive or a hint is unrecognized.
    pub const DEFAULT: Language = Language::Cpp;

    /// Parse a caller-supplied tag. Unknown tags fall back to the default —
    /// degraded coverage, not failure.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "c" => Self::C,
            "cpp" | "c++" | "cxx" => Self::Cpp,
            "java" => Self::Java,
            "python" | "py" => Self::Python,
            "javascript" | "js" | "typescript" | "ts" => Self::JavaScript,
            _ => Self::DEFAULT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Python => "python",
            Self::JavaScript => "javascript",
        }
    }

    /// Heuristically classify a source snippet. Runs every language's
    /// indicator battery and returns the highest-scoring language; ties and
    /// all-zero scores resolve to [`Language::DEFAULT`].
    pub fn detect(source: &str) -> Self {
        let mut best = Self::DEFAULT;
        let mut best_score = 0usize;
        let mut tied = false;

        for (language, indicators) in INDICATORS.iter() {
            let score = indicators.iter().filter(|re| re.is_match(source)).count();
            if score > best_score {
                best_score = score;
                best = *language;
                tied = false;
            } else if score == best_score && score > 0 {
                tied = true;
            }
        }

        // A shared top count is inconclusive; fall back rather than let
        // battery iteration order pick a winner.
        if tied {
            Self::DEFAULT
        } else {
            best
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ─── Indicator Batteries ───────────────────────────────────────────

static INDICATORS: Lazy<Vec<(Language, Vec<Regex>)>> = Lazy::new(|| {
    let battery = |patterns: &[&str]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("static indicator pattern"))
            .collect()
    };

    vec![
        (
            Language::C,
            battery(&[
                r"#include\s*<[a-z_/]+\.h>",
                r"\bprintf\s*\(",
                r"\bscanf\s*\(",
                r"\bmalloc\s*\(",
                r"\bstruct\s+\w+\s*\{",
                r"\bint\s+main\s*\(",
            ]),
        ),
        (
            Language::Cpp,
            battery(&[
                r"#include\s*<(iostream|vector|string|algorithm|map|set|queue)>",
                r"\bstd::",
                r"\busing\s+namespace\s+std\b",
                r"\bcout\s*<<",
                r"\bcin\s*>>",
                r"\btemplate\s*<",
                r"\bclass\s+\w+",
            ]),
        ),
        (
            Language::Java,
            battery(&[
                r"\bpublic\s+(static\s+)?(final\s+)?class\b",
                r"\bpublic\s+static\s+void\s+main\b",
                r"\bSystem\.out\.print",
                r"\bimport\s+java\.",
                r"\bextends\s+\w+|\bimplements\s+\w+",
                r"\bnew\s+\w+\s*\(",
            ]),
        ),
        (
            Language::Python,
            battery(&[
                r"\bdef\s+\w+\s*\(",
                r"^\s*import\s+\w+|^\s*from\s+\w+\s+import\b",
                r":\s*(\n|$)",
                r"\bself\b",
                r"\bprint\s*\(",
                r"\belif\b",
            ]),
        ),
        (
            Language::JavaScript,
            battery(&[
                r"\bfunction\s+\w*\s*\(",
                r"\b(const|let)\s+\w+\s*=",
                r"=>",
                r"\bconsole\.log\s*\(",
                r"\brequire\s*\(|\bmodule\.exports\b",
                r"===|!==",
            ]),
        ),
    ]
});

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_cpp() {
        let src = "#include <iostream>\nusing namespace std;\nint main(){ cout << 1; }";
        assert_eq!(Language::detect(src), Language::Cpp);
    }

    #[test]
    fn test_detects_python() {
        let src = "import sys\n\ndef main():\n    print(len(sys.argv))\n";
        assert_eq!(Language::detect(src), Language::Python);
    }

    #[test]
    fn test_detects_java() {
        let src = "import java.util.*;\npublic class Main {\n  public static void main(String[] a) { System.out.println(1); }\n}";
        assert_eq!(Language::detect(src), Language::Java);
    }

    #[test]
    fn test_detects_javascript() {
        let src = "const add = (a, b) => a + b;\nconsole.log(add(1, 2));";
        assert_eq!(Language::detect(src), Language::JavaScript);
    }

    #[test]
    fn test_empty_input_resolves_to_default() {
        assert_eq!(Language::detect(""), Language::DEFAULT);
        assert_eq!(Language::detect("???"), Language::DEFAULT);
    }

    #[test]
    fn test_tied_top_score_resolves_to_default() {
        // Fires exactly one C indicator (printf call) and one Java
        // indicator (new-expression); every other battery scores zero.
        let src = "printf( new Foo(";
        assert_eq!(
            Language::detect(src),
            Language::DEFAULT,
            "a shared top count must fall back, not follow battery order"
        );
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(Language::from_tag("cobol"), Language::DEFAULT);
        assert_eq!(Language::from_tag("C++"), Language::Cpp);
        assert_eq!(Language::from_tag(" js "), Language::JavaScript);
    }
}
