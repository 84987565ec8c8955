//! Lexer for Caddyfile directive syntax
//!
//! Tokenizes the whitespace-delimited Caddyfile format into position-aware
//! tokens.
//!
//! Key features:
//! - Tokens are separated by whitespace; newlines only advance the line count
//! - `{ } [ ]` are structural only when they stand alone as a token
//! - "..." for quoted strings, `...` for raw strings, `<<EOF` for heredocs
//! - # for comments (skipped), but only at the start of a token

use logos::{Logos, Span};
use std::fmt;

/// Source location for error reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for Location {
    fn from(span: Span) -> Self {
        Self {
            start: span.start,
            end: span.end,
        }
    }
}

impl From<Location> for std::ops::Range<usize> {
    fn from(loc: Location) -> Self {
        loc.start..loc.end
    }
}

/// How a token was quoted in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// Bare word
    None,
    /// "double quoted"
    Double,
    /// `backtick quoted`
    Backtick,
    /// <<MARKER heredoc
    Heredoc,
}

/// A lexed token with its interpreted text and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Interpreted text (quotes removed, escapes resolved)
    pub text: String,

    /// The token exactly as written in the source
    pub raw: String,

    pub quote: Quote,

    /// 1-based line the token starts on
    pub line: usize,

    /// Number of newlines inside the token
    pub line_breaks: usize,

    pub span: Location,
}

impl Token {
    pub fn is_quoted(&self) -> bool {
        self.quote != Quote::None
    }

    /// Line the token ends on
    pub fn end_line(&self) -> usize {
        self.line + self.line_breaks
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Token patterns for Caddyfile syntax
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
enum Lexeme {
    // Newlines carry no token of their own; lines are recovered from spans
    #[regex(r"[ \t\f\r\n]+", logos::skip)]
    Whitespace,

    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    /// Quoted string literal: "..."
    #[regex(r#""([^"\\]|\\(.|\n))*""#, |lex| {
        let s = lex.slice();
        unescape_string(&s[1..s.len()-1])
    })]
    QuotedString(String),

    /// Raw string literal: `...`
    #[regex(r"`[^`]*`", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    RawString(String),

    /// Heredoc: <<MARKER, newline, body, MARKER
    #[regex(r"<<[A-Za-z0-9_-]+", heredoc, priority = 10)]
    Heredoc(String),

    /// Generic Word (unquoted string, numbers, paths, inline JSON, braces)
    #[regex(r#"[^ \t\r\n\f"`#][^ \t\r\n\f]*"#, |lex| lex.slice().to_string())]
    Word(String),
}

/// Unescape a string literal
fn unescape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(c) => {
                    result.push('\\');
                    result.push(c);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(c);
        }
    }

    result
}

/// Consume a heredoc body up to and including its closing marker.
///
/// The closing line's indentation is stripped from every body line.
fn heredoc(lex: &mut logos::Lexer<Lexeme>) -> Result<String, LexErrorKind> {
    let marker = lex.slice()[2..].to_string();
    let rest = lex.remainder();
    let body_start = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') {
        1
    } else {
        return Err(LexErrorKind::HeredocMarker);
    };

    let mut offset = body_start;
    let mut lines = Vec::new();
    for line in rest[body_start..].split_inclusive('\n') {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.trim() == marker {
            let indent = &content[..content.len() - content.trim_start().len()];
            let text = lines
                .iter()
                .map(|l: &&str| l.strip_prefix(indent).unwrap_or(l))
                .collect::<Vec<_>>()
                .join("\n");
            lex.bump(offset + content.len());
            return Ok(text);
        }
        lines.push(content);
        offset += line.len();
    }

    Err(LexErrorKind::UnterminatedHeredoc)
}

/// What went wrong while lexing
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedChar,

    #[error("unterminated quoted string")]
    UnterminatedString,

    #[error("unterminated heredoc")]
    UnterminatedHeredoc,

    #[error("heredoc marker must be followed by a newline")]
    HeredocMarker,
}

/// Lexer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {line}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub line: usize,
    pub span: Location,
}

/// Lexer result type
pub type LexResult = Result<Vec<Token>, LexError>;

/// Byte offsets of every line start, for offset -> line lookups
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 1-based line containing `offset`
    fn line(&self, offset: usize) -> usize {
        self.starts.partition_point(|&start| start <= offset)
    }
}

/// Tokenize a Caddyfile source string
pub fn tokenize(source: &str) -> LexResult {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();

    for (result, span) in Lexeme::lexer(source).spanned() {
        let line = lines.line(span.start);
        let (text, quote) = match result {
            Ok(Lexeme::Word(s)) => (s, Quote::None),
            Ok(Lexeme::QuotedString(s)) => (s, Quote::Double),
            Ok(Lexeme::RawString(s)) => (s, Quote::Backtick),
            Ok(Lexeme::Heredoc(s)) => (s, Quote::Heredoc),
            Ok(Lexeme::Whitespace) | Ok(Lexeme::Comment) => continue,
            Err(kind) => {
                // An opening quote with no partner fails to match as a whole
                let kind = match source[span.start..].chars().next() {
                    Some('"') | Some('`') if kind == LexErrorKind::UnexpectedChar => {
                        LexErrorKind::UnterminatedString
                    }
                    _ => kind,
                };
                return Err(LexError {
                    kind,
                    line,
                    span: span.into(),
                });
            }
        };

        let raw = &source[span.clone()];
        tokens.push(Token {
            text,
            raw: raw.to_string(),
            quote,
            line,
            line_breaks: raw.matches('\n').count(),
            span: span.into(),
        });
    }

    Ok(tokens)
}
