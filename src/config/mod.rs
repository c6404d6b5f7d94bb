//! Configuration for the template engine.
//!
//! ctmpl reads a single optional TOML file, `~/.ctmpl/config.toml` by default
//! or the path passed with `--config`. See [`EngineConfig`] for the keys.

mod engine;

pub use engine::EngineConfig;
