//! Directive parse errors

use crate::parser::lexer::Location;
use std::fmt;
use thiserror::Error;

/// Error raised while translating a directive into a value.
///
/// Every error aborts the whole directive.
#[derive(Debug, Error)]
#[error("{kind}, at line {line}")]
pub struct DirectiveError {
    pub kind: ErrorKind,
    pub line: usize,
    pub span: Location,
}

/// What a closed construct was
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    Braces,
    Brackets,
    Json,
}

impl fmt::Display for Closed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Closed::Braces => write!(f, "braces"),
            Closed::Brackets => write!(f, "brackets"),
            Closed::Json => write!(f, "JSON"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("value for `{key}` is missing")]
    MissingValue { key: String },

    #[error("invalid JSON for `{key}`: {reason}")]
    InvalidJson {
        key: String,
        reason: serde_json::Error,
    },

    #[error("unexpected arguments after {after} for `{key}`")]
    UnexpectedTrailingArgs { key: String, after: Closed },

    #[error("value for `{key}` is not an object")]
    NotAnObject { key: String },

    #[error("value for `{key}` is not an array")]
    NotAnArray { key: String },

    #[error("duplicate value for key `{key}`")]
    DuplicateKey { key: String },

    #[error("unclosed `{open}` for `{key}`")]
    Unclosed { key: String, open: char },

    #[error("app name is absent for `{directive}`")]
    MissingDirectiveName { directive: String },

    #[error("body of app `{name}` is absent for `{directive}`")]
    MissingDirectiveBody { directive: String, name: String },

    #[error("duplicate app directive `{directive}`")]
    DuplicateDirective { directive: String },
}

pub type DirectiveResult<T> = Result<T, DirectiveError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_message_is_not_repeated_in_chain() {
        let reason = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = DirectiveError {
            kind: ErrorKind::InvalidJson {
                key: "events".to_string(),
                reason,
            },
            line: 3,
            span: Location { start: 10, end: 11 },
        };
        assert!(err.source().is_none());
        assert!(err.kind.source().is_none());

        let message = err.to_string();
        assert!(message.starts_with("invalid JSON for `events`: "));
        assert!(message.ends_with(", at line 3"));
        assert_eq!(message.matches("invalid JSON").count(), 1);
    }
}
