//! ctmpl: template dependency extraction and validated rendering
//!
//! A template is a text file that reads external data (service instances,
//! key/value entries, key/value listings under a prefix) through function
//! calls. ctmpl parses a template once, works out statically which pieces of
//! data it needs, and later renders it against a caller-supplied snapshot of
//! that data, refusing to render while anything is missing.
//!
//! Fetching the data is someone else's job; this crate only says what is
//! needed and produces bytes once it is there.
//!
//! # Modules
//!
//! - [`templating`] - parsing, extraction, context and rendering
//! - [`dependency`] - the three dependency kinds and their identifiers
//! - [`models`] - service instances and key/value pairs
//! - [`config`] - engine configuration (`~/.ctmpl/config.toml`)
//! - [`core`] - application errors and their presentation
//! - [`cli`] - the `ctmpl` command-line tool
//!
//! # Example
//!
//! ```rust
//! use ctmpl::config::EngineConfig;
//! use ctmpl::dependency::DependencyKind;
//! use ctmpl::templating::{Template, TemplateContext};
//!
//! let template = Template::parse(
//!     "redis.ctmpl",
//!     r#"maxconns={{ key(path="service/redis/maxconns") }}"#,
//!     &EngineConfig::default(),
//! )?;
//! let deps = template.dependencies();
//! assert_eq!(deps[0].kind(), DependencyKind::Key);
//!
//! let context = TemplateContext::new().with_key("service/redis/maxconns", "15");
//! assert_eq!(template.execute(Some(&context))?, b"maxconns=15");
//! # Ok::<(), ctmpl::templating::TemplateError>(())
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod dependency;
pub mod models;
pub mod templating;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
