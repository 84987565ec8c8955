//! Directive registry
//!
//! Maps global option names to the callbacks that translate them. The
//! numbered `appN` directives all share [`parse_app`].

use crate::parser::{DirectiveResult, Dispenser, ErrorKind, Key, ValueParser};
use appfile_core::AdapterConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A configured app: its name and the value parsed from its body
#[derive(Debug, Clone, PartialEq)]
pub struct App {
    pub name: String,
    pub value: Value,
}

/// Directive callback.
///
/// Receives a cursor positioned before the directive name and the result of
/// the previous occurrence of the same directive, if any.
pub type DirectiveFn = dyn Fn(&mut Dispenser, Option<App>) -> DirectiveResult<App> + Send + Sync;

/// Directive registry
#[derive(Clone)]
pub struct DirectiveRegistry {
    directives: HashMap<String, Arc<DirectiveFn>>,
}

impl DirectiveRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            directives: HashMap::new(),
        }
    }

    /// Registry with `<prefix>1 ..= <prefix><count>` bound to [`parse_app`]
    pub fn with_apps(config: &AdapterConfig) -> Self {
        let mut registry = Self::new();
        for name in config.directive_names() {
            registry.register(name, parse_app);
        }
        registry
    }

    /// Register a directive, replacing any previous callback of that name
    pub fn register<F>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn(&mut Dispenser, Option<App>) -> DirectiveResult<App> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!("Registering directive: {}", name);
        self.directives.insert(name, Arc::new(callback));
    }

    /// Get a directive callback by name
    pub fn get(&self, name: &str) -> Option<Arc<DirectiveFn>> {
        self.directives.get(name).cloned()
    }

    /// List all registered directive names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::with_apps(&AdapterConfig::default())
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectiveRegistry")
            .field("directives", &self.names())
            .finish()
    }
}

/// Set up a third-party app from Caddyfile syntax:
///
/// ```text
/// appN <name> {
///     number 123
///     boolean true
///     string abc
///     object {
///         ...
///     }
///     +array 1
/// }
/// ```
pub fn parse_app(d: &mut Dispenser, prev: Option<App>) -> DirectiveResult<App> {
    d.next();
    let directive = d.val().to_string();
    if prev.is_some() {
        return Err(d.err(ErrorKind::DuplicateDirective { directive }));
    }
    if !d.next_arg() {
        return Err(d.err(ErrorKind::MissingDirectiveName { directive }));
    }

    let key = Key::parse(d.val());
    if !d.next_on_current_line() {
        return Err(d.err(ErrorKind::MissingDirectiveBody {
            directive,
            name: key.name,
        }));
    }

    let value = ValueParser::new(d).parse_value(&key, None)?;
    Ok(App {
        name: key.name,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn app(source: &str, prev: Option<App>) -> DirectiveResult<App> {
        let mut d = Dispenser::from_source(source).unwrap();
        parse_app(&mut d, prev)
    }

    #[test]
    fn test_parse_app() {
        let parsed = app("app1 layer4 listen :1081", None).unwrap();
        assert_eq!(parsed.name, "layer4");
        assert_eq!(parsed.value, json!({"listen": ":1081"}));
    }

    #[test]
    fn test_parse_app_block() {
        let parsed = app("app2 dynamic_dns {\n  check_interval 5m\n  +domains example.com\n}", None).unwrap();
        assert_eq!(parsed.name, "dynamic_dns");
        assert_eq!(
            parsed.value,
            json!({"check_interval": "5m", "domains": ["example.com"]})
        );
    }

    #[test]
    fn test_parse_app_raw_json() {
        let parsed = app(r#"app1 =events {"subscriptions":[]}"#, None).unwrap();
        assert_eq!(parsed.name, "events");
        assert_eq!(parsed.value, json!({"subscriptions": []}));
    }

    #[test]
    fn test_duplicate_directive() {
        let prev = App {
            name: "layer4".to_string(),
            value: Value::Null,
        };
        let err = app("app1 layer4 listen :1081", Some(prev)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::DuplicateDirective { ref directive } if directive == "app1"));
    }

    #[test]
    fn test_missing_name_and_body() {
        let err = app("app1", None).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MissingDirectiveName { .. }));

        let err = app("app1 layer4", None).unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::MissingDirectiveBody { ref name, .. } if name == "layer4"
        ));
    }

    #[test]
    fn test_with_apps() {
        let config = AdapterConfig {
            directive_prefix: "ext".to_string(),
            directive_count: 3,
            ..AdapterConfig::default()
        };
        let registry = DirectiveRegistry::with_apps(&config);
        assert_eq!(registry.names(), vec!["ext1", "ext2", "ext3"]);
        assert!(registry.get("ext4").is_none());
        assert_eq!(DirectiveRegistry::default().names().len(), 16);
    }

    #[test]
    fn test_register_custom() {
        let mut registry = DirectiveRegistry::new();
        registry.register("static", |d: &mut Dispenser, _prev: Option<App>| {
            d.next();
            Ok(App {
                name: d.val().to_string(),
                value: json!(true),
            })
        });
        let callback = registry.get("static").unwrap();
        let mut d = Dispenser::from_source("static").unwrap();
        let parsed = callback(&mut d, None).unwrap();
        assert_eq!(parsed.value, json!(true));
    }
}
