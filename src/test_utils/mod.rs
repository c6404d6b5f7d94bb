//! Test utilities shared by unit and integration tests.
//!
//! Compiled for `cfg(test)` and for the `test-utils` feature, which the
//! integration suite enables through the self dev-dependency.

use std::path::{Path, PathBuf};
use std::sync::Once;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::models::Service;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, otherwise `RUST_LOG`; with neither, tests stay
/// silent.
///
/// ```bash
/// RUST_LOG=ctmpl=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Write a template file named `name` under `dir` and return its path.
pub fn write_template(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write template fixture {}", path.display()))?;
    Ok(path)
}

/// A service instance with the fields templates usually print.
pub fn service(node: &str, id: &str, address: &str, port: u16) -> Service {
    Service {
        node: node.to_string(),
        address: address.to_string(),
        id: id.to_string(),
        name: id.to_string(),
        port,
        tags: Vec::new(),
    }
}
