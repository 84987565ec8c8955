//! Appfile - Caddyfile app directives to JSON
//!
//! This is the main entry point for the Appfile CLI.

use anyhow::Context;
use appfile_config::{parse_str, report, AdaptError, CaddyfileAdapter};
use appfile_core::{AdapterConfig, ConfigLoader};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Appfile - translate the appN global options of a Caddyfile into JSON
#[derive(Parser)]
#[command(name = "appfile")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Adapt a Caddyfile and print the JSON configuration
    Adapt {
        /// Path to the Caddyfile
        #[arg(default_value = "Caddyfile")]
        config: PathBuf,

        /// Adapter settings (.json or .toml)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,

        /// Write the JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate a Caddyfile without printing the result
    Validate {
        /// Path to the Caddyfile
        #[arg(default_value = "Caddyfile")]
        config: PathBuf,

        /// Adapter settings (.json or .toml)
        #[arg(long)]
        settings: Option<PathBuf>,
    },

    /// Parse a bare directive body and print its JSON value
    Parse {
        /// File holding the directive body
        file: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for JSON
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Adapt {
            config,
            settings,
            pretty,
            output,
        } => {
            let mut adapter_config = load_settings(settings.as_deref())?;
            adapter_config.pretty |= pretty;
            let source = read_source(&config)?;

            let json = CaddyfileAdapter::with_config(adapter_config)
                .adapt_to_string(&source)
                .unwrap_or_else(|e| fail(&config, &source, &e));

            match output {
                Some(path) => {
                    std::fs::write(&path, format!("{}\n", json))
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        Commands::Validate { config, settings } => {
            let adapter_config = load_settings(settings.as_deref())?;
            let source = read_source(&config)?;

            let value = CaddyfileAdapter::with_config(adapter_config)
                .adapt(&source)
                .unwrap_or_else(|e| fail(&config, &source, &e));
            let apps = value
                .as_object()
                .and_then(|root| root.values().next())
                .and_then(|apps| apps.as_object())
                .map_or(0, |apps| apps.len());
            println!("✅ Valid configuration: {} ({} app(s))", config.display(), apps);
        }

        Commands::Parse { file } => {
            let source = read_source(&file)?;
            let value = parse_str(&source).unwrap_or_else(|e| fail(&file, &source, &e));
            println!("{}", serde_json::to_string(&value)?);
        }

        Commands::Version => {
            println!("appfile {}", appfile_core::VERSION);
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<AdapterConfig> {
    match path {
        Some(path) => {
            let config = ConfigLoader::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
            tracing::debug!("Loaded settings: {:?}", config);
            Ok(config)
        }
        None => Ok(AdapterConfig::default()),
    }
}

fn read_source(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Print a source-annotated report and exit
fn fail(path: &Path, source: &str, err: &AdaptError) -> ! {
    tracing::error!("❌ Failed to adapt {}: {}", path.display(), err);
    eprint!("{}", report::render(&path.display().to_string(), source, err));
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
