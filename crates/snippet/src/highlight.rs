//! Syntax highlighting for Go snippets.
//!
//! The widget receives its highlighter explicitly; there is no process-wide
//! language registry. Any `Fn(&str) -> Vec<Span>` can be used as one.

use letsgo_config::theme::HighlightTheme;
use letsgo_config::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    /// Predeclared types, constants and functions
    Builtin,
    String,
    Comment,
    Number,
    /// Identifier directly followed by `(`
    Function,
    Operator,
    Punctuation,
    Identifier,
    Whitespace,
}

/// A run of source text with one token kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: TokenKind,
    pub text: String,
}

impl Span {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Pure, synchronous highlighter. Spans must concatenate back to `code`.
pub trait Highlighter {
    fn highlight(&self, code: &str) -> Vec<Span>;
}

impl<F> Highlighter for F
where
    F: Fn(&str) -> Vec<Span>,
{
    fn highlight(&self, code: &str) -> Vec<Span> {
        self(code)
    }
}

/// Highlighter for Go source.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoHighlighter;

impl Highlighter for GoHighlighter {
    fn highlight(&self, code: &str) -> Vec<Span> {
        tokenize(code)
    }
}

/// Color of a token kind under a theme
pub fn token_color(theme: &HighlightTheme, kind: TokenKind) -> Color {
    match kind {
        TokenKind::Keyword => theme.keyword,
        TokenKind::Builtin => theme.builtin,
        TokenKind::String => theme.string,
        TokenKind::Comment => theme.comment,
        TokenKind::Number => theme.number,
        TokenKind::Function => theme.function,
        TokenKind::Operator => theme.operator,
        TokenKind::Punctuation => theme.punctuation,
        TokenKind::Identifier | TokenKind::Whitespace => theme.text,
    }
}

const KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else",
    "fallthrough", "for", "func", "go", "goto", "if", "import", "interface",
    "map", "package", "range", "return", "select", "struct", "switch", "type", "var",
];

const BUILTINS: &[&str] = &[
    // types
    "any", "bool", "byte", "comparable", "complex64", "complex128", "error",
    "float32", "float64", "int", "int8", "int16", "int32", "int64", "rune",
    "string", "uint", "uint8", "uint16", "uint32", "uint64", "uintptr",
    // constants
    "true", "false", "iota", "nil",
    // functions
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag",
    "len", "make", "max", "min", "new", "panic", "print", "println", "real", "recover",
];

/// Longest first, so `<<=` wins over `<<` and `<`.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...",
    ":=", "==", "!=", "<=", ">=", "&&", "||", "<-", "++", "--",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^",
    "+", "-", "*", "/", "%", "&", "|", "^", "<", ">", "=", "!", "~",
];

/// Split Go source into highlight spans
fn tokenize(input: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let start = i;

        let kind = if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            TokenKind::Whitespace
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            // Line comment runs up to (not including) the newline
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
            TokenKind::Comment
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i < chars.len() && !(chars[i] == '*' && chars.get(i + 1) == Some(&'/')) {
                i += 1;
            }
            i = (i + 2).min(chars.len());
            TokenKind::Comment
        } else if c == '"' || c == '\'' {
            i = scan_quoted(&chars, i, c);
            TokenKind::String
        } else if c == '`' {
            // Raw strings may span lines and have no escapes
            i += 1;
            while i < chars.len() && chars[i] != '`' {
                i += 1;
            }
            i = (i + 1).min(chars.len());
            TokenKind::String
        } else if c.is_ascii_digit()
            || (c == '.' && chars.get(i + 1).map_or(false, |n| n.is_ascii_digit()))
        {
            i = scan_number(&chars, i);
            TokenKind::Number
        } else if c.is_alphabetic() || c == '_' {
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect();
            classify_word(&word, &chars[i..])
        } else if let Some(op) = match_operator(&chars[i..]) {
            i += op;
            TokenKind::Operator
        } else {
            i += 1;
            if "{}()[];,.:".contains(c) {
                TokenKind::Punctuation
            } else {
                TokenKind::Identifier
            }
        };

        spans.push(Span {
            kind,
            text: chars[start..i].iter().collect(),
        });
    }

    spans
}

fn classify_word(word: &str, rest: &[char]) -> TokenKind {
    if KEYWORDS.contains(&word) {
        return TokenKind::Keyword;
    }
    let called = rest.iter().find(|c| **c != ' ' && **c != '\t') == Some(&'(');
    if BUILTINS.contains(&word) {
        TokenKind::Builtin
    } else if called {
        TokenKind::Function
    } else {
        TokenKind::Identifier
    }
}

/// End index of an interpreted string or rune literal starting at `start`.
/// Unterminated literals stop before the end of the line.
fn scan_quoted(chars: &[char], start: usize, quote: char) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\n' => return i,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

fn scan_number(chars: &[char], start: usize) -> usize {
    let hex = chars[start] == '0' && matches!(chars.get(start + 1), Some('x') | Some('X'));
    let mut i = start;
    while i < chars.len() {
        let c = chars[i];
        let exponent_sign = (c == '+' || c == '-')
            && i > start
            && if hex {
                matches!(chars[i - 1], 'p' | 'P')
            } else {
                matches!(chars[i - 1], 'e' | 'E')
            };
        if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
            i += 1;
        } else {
            break;
        }
    }
    i
}

fn match_operator(rest: &[char]) -> Option<usize> {
    OPERATORS.iter().find_map(|op| {
        let len = op.chars().count();
        let matches = rest.len() >= len && op.chars().zip(rest.iter()).all(|(a, b)| a == *b);
        matches.then_some(len)
    })
}
