//! Command-line interface for ctmpl.
//!
//! The tool is a thin inspection front end over [`crate::templating`]:
//!
//! - `ctmpl deps <TEMPLATE>` lists the data a template needs
//! - `ctmpl render <TEMPLATE> --data <SNAPSHOT>` renders it against a data
//!   snapshot and writes the result to stdout
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - engine configuration file (default `~/.ctmpl/config.toml`)
//!
//! `RUST_LOG` overrides both logging flags.

mod deps;
mod render;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::core::CtmplError;
use crate::templating::{Template, TemplateError};

pub use deps::{DepsCommand, OutputFormat};
pub use render::RenderCommand;

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(
    name = "ctmpl",
    about = "Inspect and render templates that read service and key/value data",
    version,
    long_about = "ctmpl extracts the external data a template depends on and renders the template \
                  once a snapshot of that data is available."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the engine configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the dependencies a template declares
    Deps(DepsCommand),

    /// Render a template against a data snapshot
    Render(RenderCommand),
}

impl Cli {
    /// Log level implied by `--verbose` / `--quiet`.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Install the global tracing subscriber on stderr.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ctmpl={}", self.log_level())));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Load configuration and run the selected command.
    pub async fn execute(self) -> Result<()> {
        let config = EngineConfig::load_with_optional(self.config).await.map_err(|e| {
            CtmplError::ConfigError {
                message: format!("{e:#}"),
            }
        })?;
        tracing::debug!("Using engine config: {config:?}");

        match self.command {
            Commands::Deps(cmd) => cmd.execute(&config).await,
            Commands::Render(cmd) => cmd.execute(&config).await,
        }
    }
}

/// Read and parse the template at `path`.
async fn load_template(path: &Path, config: &EngineConfig) -> Result<Template> {
    let source = tokio::fs::read_to_string(path).await.map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let template = Template::parse(path, &source, config)?;
    tracing::info!(
        "Parsed {} with {} dependencies",
        path.display(),
        template.dependencies().len()
    );
    Ok(template)
}
