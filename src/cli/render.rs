//! `ctmpl render`: render a template against a data snapshot.
//!
//! The snapshot is a serialized [`TemplateContext`]; JSON by default, TOML
//! when the file name ends in `.toml`:
//!
//! ```json
//! {
//!   "services": { "web": [{ "Node": "n1", "Address": "10.0.0.1", "ID": "web1", "Name": "web", "Port": 80 }] },
//!   "keys": { "service/redis/maxconns": "11" },
//!   "key_prefixes": { "service/redis/config": [{ "Key": "minconns", "Value": "2" }] }
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tokio::io::AsyncWriteExt;

use crate::config::EngineConfig;
use crate::core::CtmplError;
use crate::templating::TemplateContext;

/// Arguments for `ctmpl render`.
#[derive(Args, Debug)]
pub struct RenderCommand {
    /// Template file to render
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Data snapshot (JSON, or TOML with a .toml extension)
    #[arg(short, long, value_name = "SNAPSHOT")]
    pub data: PathBuf,
}

impl RenderCommand {
    /// Render the template and write the bytes to stdout unchanged.
    pub async fn execute(self, config: &EngineConfig) -> Result<()> {
        let template = super::load_template(&self.template, config).await?;
        let context = load_snapshot(&self.data).await?;

        let rendered = template.execute(Some(&context))?;
        tracing::info!("Rendered {} ({} bytes)", self.template.display(), rendered.len());

        let mut stdout = tokio::io::stdout();
        stdout.write_all(&rendered).await.context("Failed to write rendered output")?;
        stdout.flush().await.context("Failed to flush stdout")?;
        Ok(())
    }
}

/// Read a [`TemplateContext`] from `path`.
pub(crate) async fn load_snapshot(path: &Path) -> Result<TemplateContext> {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(CtmplError::SnapshotNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    let parse_error = |reason: String| CtmplError::SnapshotParseError {
        file: path.display().to_string(),
        reason,
    };

    let context: TemplateContext = if is_toml(path) {
        toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    } else {
        serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?
    };

    tracing::debug!("Loaded snapshot {}", path.display());
    Ok(context)
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
