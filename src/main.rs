//! ctmpl CLI entry point
//!
//! Parses arguments, installs logging, runs the command and prints any
//! failure as a colored error with details and a suggestion.
//!
//! - `deps` - list the data a template depends on
//! - `render` - render a template against a data snapshot

use anyhow::Result;
use clap::Parser;
use ctmpl::cli;
use ctmpl::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.init_logging();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
