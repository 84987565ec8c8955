//! Path segment keys
//!
//! A segment token carries its own write mode in leading markers:
//! - `+` (repeatable) appends to an array, each extra `+` nests one level
//! - `=` takes the next token as a raw JSON document
//! - `:` is a no-op, so a name can start with a marker character

/// One parsed path segment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Key {
    pub plus: usize,
    pub raw: bool,
    pub name: String,
}

impl Key {
    pub fn parse(token: &str) -> Self {
        let rest = token.trim_start_matches('+');
        let plus = token.len() - rest.len();
        let (raw, rest) = match rest.strip_prefix('=') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };
        let name = rest.strip_prefix(':').unwrap_or(rest);

        Self {
            plus,
            raw,
            name: name.to_string(),
        }
    }

    pub fn is_append(&self) -> bool {
        self.plus > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(plus: usize, raw: bool, name: &str) -> Key {
        Key {
            plus,
            raw,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_plain() {
        assert_eq!(Key::parse("listen"), key(0, false, "listen"));
    }

    #[test]
    fn test_markers() {
        assert_eq!(Key::parse("+handle"), key(1, false, "handle"));
        assert_eq!(Key::parse("++routes"), key(2, false, "routes"));
        assert_eq!(Key::parse("=config"), key(0, true, "config"));
        assert_eq!(Key::parse("+=config"), key(1, true, "config"));
    }

    #[test]
    fn test_colon_escape() {
        assert_eq!(Key::parse(":+literal"), key(0, false, "+literal"));
        assert_eq!(Key::parse(":=x"), key(0, false, "=x"));
        assert_eq!(Key::parse("+::a"), key(1, false, ":a"));
        assert_eq!(Key::parse(":1081"), key(0, false, "1081"));
    }

    #[test]
    fn test_markers_only() {
        assert_eq!(Key::parse("+"), key(1, false, ""));
        assert_eq!(Key::parse(""), key(0, false, ""));
    }
}
