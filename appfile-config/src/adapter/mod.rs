//! Caddyfile adaptation: directive registry and the global options adapter

mod caddyfile;
mod registry;

pub use caddyfile::{parse_str, AdaptError, CaddyfileAdapter};
pub use registry::{parse_app, App, DirectiveFn, DirectiveRegistry};
