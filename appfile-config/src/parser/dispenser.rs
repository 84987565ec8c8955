//! Token cursor over a lexed directive
//!
//! A forward-moving stream with one token of lookback, so that a speculative
//! advance can be undone without losing the token for the caller.

use crate::parser::error::{DirectiveError, ErrorKind};
use crate::parser::lexer::{tokenize, LexError, Location, Token};
use serde_json::{Number, Value};

/// Largest magnitude below which every integer is exactly an `f64`
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Token cursor handed to directive callbacks
#[derive(Debug, Clone)]
pub struct Dispenser {
    tokens: Vec<Token>,
    /// `None` until the first `next()`
    cursor: Option<usize>,
}

impl Dispenser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            cursor: None,
        }
    }

    /// Tokenize `source` and wrap it in a cursor
    pub fn from_source(source: &str) -> Result<Self, LexError> {
        Ok(Self::new(tokenize(source)?))
    }

    /// Move to the next token. Returns `false` at the end of the stream,
    /// leaving the cursor where it was.
    pub fn next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |i| i + 1);
        if next < self.tokens.len() {
            self.cursor = Some(next);
            true
        } else {
            false
        }
    }

    /// Undo the last `next()`. Returns `false` if already before the first
    /// token.
    pub fn prev(&mut self) -> bool {
        match self.cursor {
            Some(i) => {
                self.cursor = i.checked_sub(1);
                true
            }
            None => false,
        }
    }

    /// Advance only if the next token is on the line the current one ends on
    pub fn next_arg(&mut self) -> bool {
        let Some(current) = self.token() else {
            return false;
        };
        let line = current.end_line();
        let same_line = self.peek().is_some_and(|next| next.line == line);
        same_line && self.next()
    }

    /// Advance if the next token continues the current logical line.
    ///
    /// A structural `}` never continues a line, it closes the enclosing block.
    /// On a negative answer the advance is undone.
    pub fn next_on_current_line(&mut self) -> bool {
        let line = self.token().map_or(0, Token::end_line);
        if !self.next() {
            return false;
        }
        if self.line() == line && !self.is_close_brace() {
            return true;
        }
        !self.prev()
    }

    /// Whether another token follows on the current logical line, without
    /// consuming it
    pub fn has_next_on_line(&mut self) -> bool {
        self.next_on_current_line() && self.prev()
    }

    pub fn token(&self) -> Option<&Token> {
        self.cursor.and_then(|i| self.tokens.get(i))
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor.map_or(0, |i| i + 1))
    }

    /// 1-based line of the current token, 0 before the first token
    pub fn line(&self) -> usize {
        self.token().map_or(0, |t| t.line)
    }

    /// Interpreted text of the current token
    pub fn val(&self) -> &str {
        self.token().map_or("", |t| t.text.as_str())
    }

    /// The current token as written in the source
    pub fn val_raw(&self) -> &str {
        self.token().map_or("", |t| t.raw.as_str())
    }

    pub fn is_open_brace(&self) -> bool {
        self.val_raw() == "{"
    }

    pub fn is_close_brace(&self) -> bool {
        self.val_raw() == "}"
    }

    pub fn is_open_bracket(&self) -> bool {
        self.val_raw() == "["
    }

    pub fn is_close_bracket(&self) -> bool {
        self.val_raw() == "]"
    }

    /// Coerce the current token to its natural scalar type
    pub fn scalar_val(&self) -> Value {
        let Some(token) = self.token() else {
            return Value::Null;
        };
        if token.is_quoted() {
            return Value::String(token.text.clone());
        }
        scalar_from_word(&token.text)
    }

    /// Build an error annotated with the current token's position
    pub fn err(&self, kind: ErrorKind) -> DirectiveError {
        let token = self.token().or_else(|| self.tokens.first());
        DirectiveError {
            kind,
            line: token.map_or(0, |t| t.line),
            span: token.map_or(Location::default(), |t| t.span),
        }
    }
}

fn scalar_from_word(text: &str) -> Value {
    match text {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = text.parse::<f64>() {
        if f.fract() == 0.0 && f.abs() < EXACT_INTEGER_LIMIT {
            return Value::Number((f as i64).into());
        }
        if let Some(n) = Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(source: &str) -> Value {
        let mut d = Dispenser::from_source(source).unwrap();
        assert!(d.next());
        d.scalar_val()
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(scalar("true"), json!(true));
        assert_eq!(scalar("false"), json!(false));
        assert_eq!(scalar("True"), json!("True"));
        assert_eq!(scalar("123"), json!(123));
        assert_eq!(scalar("-4.5"), json!(-4.5));
        assert_eq!(scalar("1e3"), json!(1000));
        assert_eq!(scalar("\"false\""), json!("false"));
        assert_eq!(scalar("`12`"), json!("12"));
        assert_eq!(scalar(":1081"), json!(":1081"));
        assert_eq!(scalar("inf"), json!("inf"));
        assert_eq!(scalar("NaN"), json!("NaN"));
    }

    #[test]
    fn test_large_and_small_floats() {
        // Kept as f64; serde_json picks the textual form on output
        assert_eq!(scalar("1e20").as_f64(), Some(1e20));
        assert!(scalar("1e20").is_f64());
        assert_eq!(scalar("0.000001").as_f64(), Some(0.000001));
        assert_eq!(scalar("9007199254740991"), json!(9_007_199_254_740_991_i64));
        assert!(scalar("9007199254740993.0").is_f64());
    }

    #[test]
    fn test_next_prev() {
        let mut d = Dispenser::from_source("a b").unwrap();
        assert_eq!(d.val(), "");
        assert!(!d.prev());
        assert!(d.next());
        assert_eq!(d.val(), "a");
        assert!(d.next());
        assert!(!d.next());
        assert_eq!(d.val(), "b");
        assert!(d.prev());
        assert_eq!(d.val(), "a");
        assert!(d.prev());
        assert_eq!(d.line(), 0);
    }

    #[test]
    fn test_next_on_current_line_rewinds() {
        let mut d = Dispenser::from_source("a b\nc").unwrap();
        d.next();
        assert!(d.next_on_current_line());
        assert_eq!(d.val(), "b");
        assert!(!d.next_on_current_line());
        assert_eq!(d.val(), "b");
        assert!(d.next());
        assert_eq!(d.val(), "c");
    }

    #[test]
    fn test_close_brace_does_not_continue_line() {
        let mut d = Dispenser::from_source("a 1 }").unwrap();
        d.next();
        d.next();
        assert!(!d.has_next_on_line());
        assert_eq!(d.val(), "1");

        let mut d = Dispenser::from_source("a 1 \"}\"").unwrap();
        d.next();
        d.next();
        assert!(d.has_next_on_line());
        assert_eq!(d.val(), "1");
    }

    #[test]
    fn test_next_arg() {
        let mut d = Dispenser::from_source("app1\nname").unwrap();
        d.next();
        assert!(!d.next_arg());
        assert_eq!(d.val(), "app1");

        let mut d = Dispenser::from_source("app1 name").unwrap();
        assert!(!d.next_arg());
        d.next();
        assert!(d.next_arg());
        assert_eq!(d.val(), "name");
    }

    #[test]
    fn test_err_position() {
        let mut d = Dispenser::from_source("a\n  b").unwrap();
        d.next();
        d.next();
        let err = d.err(ErrorKind::DuplicateKey { key: "b".to_string() });
        assert_eq!(err.line, 2);
        assert_eq!(err.span, Location { start: 4, end: 5 });
    }
}
