//! Configuration type definitions
//!
//! These types represent the settings the Caddyfile adapter runs with.

use serde::{Deserialize, Serialize};

/// Root configuration for the adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Prefix of the numbered app directives (`app` gives `app1`, `app2`, ...)
    #[serde(default = "default_directive_prefix")]
    pub directive_prefix: String,

    /// Number of app directives to register
    #[serde(default = "default_directive_count")]
    pub directive_count: u32,

    /// Key the apps are collected under in the output document
    #[serde(default = "default_output_key")]
    pub output_key: String,

    /// Replace `{$VAR}` placeholders with environment values before parsing
    #[serde(default = "default_bool_true")]
    pub expand_env: bool,

    /// Pretty-print the generated JSON
    #[serde(default)]
    pub pretty: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            directive_prefix: default_directive_prefix(),
            directive_count: default_directive_count(),
            output_key: default_output_key(),
            expand_env: default_bool_true(),
            pretty: false,
        }
    }
}

impl AdapterConfig {
    /// Names of every app directive this configuration registers, in order
    pub fn directive_names(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.directive_count).map(move |i| format!("{}{}", self.directive_prefix, i))
    }
}

fn default_directive_prefix() -> String {
    "app".to_string()
}

fn default_directive_count() -> u32 {
    16
}

fn default_output_key() -> String {
    "apps".to_string()
}

fn default_bool_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_names() {
        let config = AdapterConfig::default();
        let names: Vec<String> = config.directive_names().collect();
        assert_eq!(names.len(), 16);
        assert_eq!(names[0], "app1");
        assert_eq!(names[15], "app16");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AdapterConfig = serde_json::from_str(r#"{"directive_count": 2}"#).unwrap();
        assert_eq!(config.directive_count, 2);
        assert_eq!(config.directive_prefix, "app");
        assert_eq!(config.output_key, "apps");
        assert!(config.expand_env);
        assert!(!config.pretty);
    }
}
