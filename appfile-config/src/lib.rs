//! Appfile Caddyfile Adapter
//!
//! This crate translates the `appN` global options of a Caddyfile into the
//! JSON configuration of third-party apps.
//!
//! # Example
//!
//! ```rust,ignore
//! use appfile_config::CaddyfileAdapter;
//!
//! let source = r#"
//!     {
//!         app1 layer4 {
//!             +servers {
//!                 listen :443
//!             }
//!         }
//!     }
//! "#;
//!
//! let json = CaddyfileAdapter::new().adapt_to_string(source).unwrap();
//! assert_eq!(json, r#"{"apps":{"layer4":{"servers":[{"listen":":443"}]}}}"#);
//! ```

pub mod adapter;
pub mod parser;
pub mod report;

pub use adapter::{parse_app, parse_str, AdaptError, App, CaddyfileAdapter, DirectiveRegistry};
pub use parser::{
    tokenize, DirectiveError, Dispenser, ErrorKind, Key, LexError, Token, ValueParser,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_adapt() {
        let source = r#"
            {
                app1 layer4 {
                    +servers {
                        listen :443
                        +routes {
                            +handle {
                                handler proxy
                                +upstreams dial localhost:8080
                            }
                        }
                    }
                }
                app2 =pki {"certificate_authorities":{"local":{"install_trust":false}}}
            }
        "#;

        let value = CaddyfileAdapter::new()
            .adapt_with_env(source, |_| None)
            .unwrap();
        assert_eq!(
            value,
            json!({
                "apps": {
                    "layer4": {
                        "servers": [{
                            "listen": ":443",
                            "routes": [{
                                "handle": [{
                                    "handler": "proxy",
                                    "upstreams": [{"dial": "localhost:8080"}]
                                }]
                            }]
                        }]
                    },
                    "pki": {"certificate_authorities": {"local": {"install_trust": false}}}
                }
            })
        );
    }
}
