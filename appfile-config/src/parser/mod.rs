//! Parser module for Caddyfile app directives
//!
//! This module provides the lexer, the token cursor, and the recursive
//! value parser that turns one directive into a JSON value tree.

pub mod dispenser;
pub mod env;
pub mod error;
pub mod key;
pub mod lexer;
pub mod value;

pub use dispenser::Dispenser;
pub use error::{Closed, DirectiveError, DirectiveResult, ErrorKind};
pub use key::Key;
pub use lexer::{tokenize, LexError, LexErrorKind, Location, Quote, Token};
pub use value::{parse_body, ValueParser};
