//! Template parsing, dependency extraction and validated rendering.
//!
//! Templates are written in Tera syntax. Besides ordinary Tera expressions
//! and tags, a template body reads external data through three functions:
//!
//! | Function                 | Yields                    | Typical use                                    |
//! |--------------------------|---------------------------|------------------------------------------------|
//! | `service(name="spec")`   | list of service instances | `{% for s in service(name="web") %}`           |
//! | `key(path="path")`       | string                    | `{{ key(path="service/redis/maxconns") }}`     |
//! | `keyPrefix(path="path")` | list of key/value pairs   | `{% for p in keyPrefix(path="service/redis") %}` |
//!
//! Service instances expose `Node`, `Address`, `ID`, `Name`, `Port` and
//! `Tags`; key/value pairs expose `Key` and `Value`.
//!
//! # Lifecycle
//!
//! 1. [`Template::new`] parses the file and statically extracts its
//!    [`Dependency`](crate::dependency::Dependency) list. Calls inside
//!    branches that may never run are included.
//! 2. Something outside this crate fetches that data and fills a
//!    [`TemplateContext`].
//! 3. [`Template::execute`] verifies the context has an entry for every
//!    dependency and only then renders.
//!
//! # Example
//!
//! ```rust
//! use ctmpl::config::EngineConfig;
//! use ctmpl::models::{KeyPair, Service};
//! use ctmpl::templating::{Template, TemplateContext};
//!
//! let source = r#"{% for s in service(name="release.webapp") %}
//! server {{ s.Name }} {{ s.Address }}:{{ s.Port }}{% endfor %}
//! {% for p in keyPrefix(path="service/redis/config") %}
//! {{ p.Key }} {{ p.Value }}{% endfor %}"#;
//! let template = Template::parse("haproxy.ctmpl", source, &EngineConfig::default())?;
//! assert_eq!(template.dependencies().len(), 2);
//!
//! let context = TemplateContext::new()
//!     .with_services("release.webapp", vec![Service {
//!         node: "nyc-worker-1".to_string(),
//!         address: "10.0.0.1".to_string(),
//!         id: "web1".to_string(),
//!         name: "web1".to_string(),
//!         port: 8080,
//!         tags: vec![],
//!     }])
//!     .with_key_prefix("service/redis/config", vec![KeyPair::new("maxconns", "11")]);
//!
//! let rendered = String::from_utf8(template.execute(Some(&context))?).unwrap();
//! assert!(rendered.contains("server web1 10.0.0.1:8080"));
//! assert!(rendered.contains("maxconns 11"));
//! # Ok::<(), ctmpl::templating::TemplateError>(())
//! ```
//!
//! # Restrictions
//!
//! - `{% extends %}`, `{% include %}` and `{% import %}` are rejected; one
//!   template is one file.
//! - Only the three functions above and the Tera built-ins listed in
//!   [`EngineConfig::builtin_functions`](crate::config::EngineConfig) may be
//!   called. Anything else fails at construction, not at render time.
//! - Data-access arguments must be string literals so they can be known
//!   without rendering.

mod context;
mod error;
mod extractor;
mod renderer;
mod template;


pub use context::TemplateContext;
pub use error::{ErrorLocation, TemplateError};
pub use template::Template;
