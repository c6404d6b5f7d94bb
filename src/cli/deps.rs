//! `ctmpl deps`: list the dependencies a template declares.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::dependency::{Dependency, DependencyKind};

/// Output format for `ctmpl deps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `<kind>\t<spec>` line per dependency
    Text,
    /// JSON array of `{ "kind", "key" }` objects
    Json,
}

/// Arguments for `ctmpl deps`.
#[derive(Args, Debug)]
pub struct DepsCommand {
    /// Template file to inspect
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DependencyEntry<'a> {
    kind: DependencyKind,
    key: &'a str,
}

impl DepsCommand {
    /// Parse the template and print its dependencies to stdout.
    pub async fn execute(self, config: &EngineConfig) -> Result<()> {
        let template = super::load_template(&self.template, config).await?;
        let output = format_dependencies(template.dependencies(), self.format)?;
        if !output.is_empty() {
            println!("{output}");
        }
        Ok(())
    }
}

/// Render `dependencies` in `format`, without a trailing newline.
fn format_dependencies(dependencies: &[Dependency], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(dependencies
            .iter()
            .map(|dep| format!("{}\t{}", dep.kind(), dep.key()))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            let entries: Vec<DependencyEntry<'_>> = dependencies
                .iter()
                .map(|dep| DependencyEntry {
                    kind: dep.kind(),
                    key: dep.key(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Dependency> {
        vec![
            Dependency::parse(DependencyKind::Service, "release.webapp").unwrap(),
            Dependency::parse(DependencyKind::Key, "service/redis/maxconns").unwrap(),
            Dependency::parse(DependencyKind::KeyPrefix, "service/redis/config").unwrap(),
        ]
    }

    #[test]
    fn test_format_text() {
        let output = format_dependencies(&sample(), OutputFormat::Text).unwrap();
        assert_eq!(
            output,
            "service\trelease.webapp\nkey\tservice/redis/maxconns\nkeyPrefix\tservice/redis/config"
        );
    }

    #[test]
    fn test_format_json() {
        let output = format_dependencies(&sample(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                { "kind": "service", "key": "release.webapp" },
                { "kind": "key", "key": "service/redis/maxconns" },
                { "kind": "keyPrefix", "key": "service/redis/config" },
            ])
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_dependencies(&[], OutputFormat::Text).unwrap(), "");
        assert_eq!(format_dependencies(&[], OutputFormat::Json).unwrap(), "[]");
    }
}
