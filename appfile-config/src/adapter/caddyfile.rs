//! Caddyfile adapter
//!
//! Reads the global options block of a Caddyfile, hands every app directive
//! to its registered callback and assembles the resulting JSON document:
//!
//! ```text
//! {
//!     app1 layer4 listen :1081        =>  {"apps":{"layer4":{"listen":":1081"}}}
//! }
//! ```

use crate::adapter::registry::{App, DirectiveRegistry};
use crate::parser::{self, env, tokenize, DirectiveError, Dispenser, LexError, Location, Token};
use appfile_core::AdapterConfig;
use serde_json::{Map, Value};
use thiserror::Error;

/// Adapter errors
#[derive(Debug, Error)]
pub enum AdaptError {
    #[error("Lexer error: {0}")]
    Lex(#[from] LexError),

    #[error(transparent)]
    Directive(#[from] DirectiveError),

    #[error("unrecognized global option `{name}`, at line {line}")]
    UnknownDirective {
        name: String,
        line: usize,
        span: Location,
    },

    #[error("unexpected `{found}` at line {line}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        line: usize,
        span: Location,
    },

    #[error("global options block opened at line {line} is never closed")]
    UnclosedBlock { line: usize, span: Location },

    #[error("app `{name}` is configured more than once, at line {line}")]
    DuplicateApp {
        name: String,
        line: usize,
        span: Location,
    },

    #[error("JSON encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AdaptError {
    /// Source span the error points at, if it has one
    pub fn span(&self) -> Option<Location> {
        match self {
            AdaptError::Lex(e) => Some(e.span),
            AdaptError::Directive(e) => Some(e.span),
            AdaptError::UnknownDirective { span, .. }
            | AdaptError::UnexpectedToken { span, .. }
            | AdaptError::UnclosedBlock { span, .. }
            | AdaptError::DuplicateApp { span, .. } => Some(*span),
            AdaptError::Encode(_) => None,
        }
    }

    fn unexpected(token: &Token, expected: &'static str) -> Self {
        AdaptError::UnexpectedToken {
            found: token.raw.clone(),
            expected,
            line: token.line,
            span: token.span,
        }
    }
}

type AdaptResult<T> = Result<T, AdaptError>;

/// Caddyfile to JSON adapter
#[derive(Debug, Clone)]
pub struct CaddyfileAdapter {
    registry: DirectiveRegistry,
    config: AdapterConfig,
}

impl CaddyfileAdapter {
    /// Adapter with the default `app1..app16` directives
    pub fn new() -> Self {
        Self::with_config(AdapterConfig::default())
    }

    pub fn with_config(config: AdapterConfig) -> Self {
        Self {
            registry: DirectiveRegistry::with_apps(&config),
            config,
        }
    }

    /// Registry access for extra directives
    pub fn registry_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.registry
    }

    /// Adapt a Caddyfile, expanding placeholders from the process environment
    pub fn adapt(&self, source: &str) -> AdaptResult<Value> {
        self.adapt_with_env(source, env::process_env)
    }

    /// Adapt a Caddyfile and serialize the result
    pub fn adapt_to_string(&self, source: &str) -> AdaptResult<String> {
        let value = self.adapt(source)?;
        let json = if self.config.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(json)
    }

    /// Adapt a Caddyfile with a custom placeholder lookup
    pub fn adapt_with_env<F>(&self, source: &str, lookup: F) -> AdaptResult<Value>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut tokens = tokenize(source)?;
        if self.config.expand_env {
            env::expand_tokens(&mut tokens, lookup);
        }

        // (directive, app) in order of first appearance
        let mut adapted: Vec<(String, App)> = Vec::new();

        for segment in global_segments(&tokens)? {
            let head = &segment[0];
            let directive = head.text.clone();
            let callback = self.registry.get(&directive).ok_or_else(|| {
                AdaptError::UnknownDirective {
                    name: directive.clone(),
                    line: head.line,
                    span: head.span,
                }
            })?;

            tracing::debug!("Adapting directive {} at line {}", directive, head.line);

            let slot = adapted.iter().position(|(name, _)| *name == directive);
            let prev = slot.map(|i| adapted[i].1.clone());
            let mut d = Dispenser::new(segment.to_vec());
            let app = callback(&mut d, prev)?;
            if d.next() {
                if let Some(token) = d.token() {
                    return Err(AdaptError::unexpected(token, "end of directive"));
                }
            }

            let clash = adapted
                .iter()
                .any(|(name, other)| *name != directive && other.name == app.name);
            if clash {
                return Err(AdaptError::DuplicateApp {
                    name: app.name,
                    line: head.line,
                    span: head.span,
                });
            }

            match slot {
                Some(i) => adapted[i].1 = app,
                None => adapted.push((directive, app)),
            }
        }

        let mut root = Map::new();
        if !adapted.is_empty() {
            let apps: Map<String, Value> = adapted
                .into_iter()
                .map(|(_, app)| (app.name, app.value))
                .collect();
            root.insert(self.config.output_key.clone(), Value::Object(apps));
        }
        Ok(Value::Object(root))
    }
}

impl Default for CaddyfileAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split the global options block into one token run per directive.
///
/// A directive runs to the end of its line, extended over any `{ }` block or
/// `[ ]` array opened on it. Inside an array braces are plain values, except
/// that a `}` ends the run so the callback reports the unclosed array. A `}`
/// at depth zero closes the global block.
fn global_segments(tokens: &[Token]) -> AdaptResult<Vec<&[Token]>> {
    let Some(open) = tokens.first() else {
        return Ok(Vec::new());
    };
    if open.raw != "{" {
        return Err(AdaptError::unexpected(open, "a global options block"));
    }

    let mut segments = Vec::new();
    let mut i = 1;
    loop {
        let Some(head) = tokens.get(i) else {
            return Err(AdaptError::UnclosedBlock {
                line: open.line,
                span: open.span,
            });
        };
        if head.raw == "}" {
            i += 1;
            break;
        }

        let start = i;
        let mut depth = 0usize;
        let mut brackets = 0usize;
        let mut line = head.end_line();
        i += 1;
        while let Some(token) = tokens.get(i) {
            if depth == 0 && brackets == 0 && token.line != line {
                break;
            }
            match token.raw.as_str() {
                "[" => brackets += 1,
                "]" if brackets > 0 => brackets -= 1,
                "}" if depth == 0 || brackets > 0 => break,
                "}" => depth -= 1,
                "{" if brackets == 0 => depth += 1,
                _ => {}
            }
            line = token.end_line();
            i += 1;
        }
        segments.push(&tokens[start..i]);
    }

    if let Some(extra) = tokens.get(i) {
        return Err(AdaptError::unexpected(extra, "end of input after the global options block"));
    }
    Ok(segments)
}

/// Parse a bare directive body into a value, the way a directive callback
/// would see it. The whole input must be consumed.
pub fn parse_str(source: &str) -> AdaptResult<Value> {
    let mut d = Dispenser::from_source(source)?;
    let value = parser::parse_body(&mut d)?;
    if d.next() {
        if let Some(token) = d.token() {
            return Err(AdaptError::unexpected(token, "end of input"));
        }
    }
    Ok(value)
}
