//! Environment placeholder expansion
//!
//! Replaces `{$NAME}` and `{$NAME:default}` inside token text at parse time.
//! Unknown variables without a default expand to the empty string.

use crate::parser::lexer::Token;

/// Expand placeholders in every token's interpreted text.
///
/// The raw form is left untouched, so a placeholder never turns into a
/// structural brace.
pub fn expand_tokens<F>(tokens: &mut [Token], lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    for token in tokens.iter_mut() {
        if token.text.contains("{$") {
            token.text = expand(&token.text, &lookup);
        }
    }
}

/// Lookup backed by the process environment
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Expand placeholders in a single string
pub fn expand<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find("{$") {
        let after = &rest[open + 2..];
        let Some(close) = after.find('}') else {
            break;
        };
        let body = &after[..close];
        let (name, default) = match body.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };

        result.push_str(&rest[..open]);
        if name.is_empty() || name.contains(char::is_whitespace) {
            // Not a placeholder; keep it verbatim
            result.push_str(&rest[open..open + 2 + close + 1]);
        } else {
            let value = lookup(name).or_else(|| default.map(str::to_string));
            result.push_str(&value.unwrap_or_default());
        }
        rest = &after[close + 1..];
    }

    result.push_str(rest);
    result
}
