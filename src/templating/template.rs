//! A parsed template and its dependencies.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use tera::Tera;

use super::context::TemplateContext;
use super::error::{ErrorLocation, TemplateError, extract_line_from_tera_error, format_tera_error};
use super::extractor::DependencyExtractor;
use super::renderer;
use crate::config::EngineConfig;
use crate::constants::{TEMPLATE_HASH_DELIMITER, TEMPLATE_HASH_TAG};
use crate::dependency::Dependency;

/// One template source file, parsed once.
///
/// Construction parses the source and extracts its dependencies; after that
/// the value never changes. [`dependencies`](Self::dependencies) and
/// [`execute`](Self::execute) take `&self` and may be called from any number
/// of threads at once.
///
/// # Examples
///
/// ```rust
/// use ctmpl::config::EngineConfig;
/// use ctmpl::templating::{Template, TemplateContext};
///
/// let template = Template::parse(
///     "/etc/app/limits.ctmpl",
///     r#"maxconns: {{ key(path="service/redis/maxconns") }}"#,
///     &EngineConfig::default(),
/// )?;
/// assert_eq!(template.dependencies()[0].key(), "service/redis/maxconns");
///
/// let context = TemplateContext::new().with_key("service/redis/maxconns", "11");
/// assert_eq!(template.execute(Some(&context))?, b"maxconns: 11");
/// # Ok::<(), ctmpl::templating::TemplateError>(())
/// ```
pub struct Template {
    path: PathBuf,
    /// Name the source is registered under in `engine`
    name: String,
    engine: Tera,
    dependencies: Vec<Dependency>,
}

impl Template {
    /// Read and parse the file at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, the syntax is invalid, an unknown
    /// function is called, or a data-access call has an invalid argument.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        Self::with_config(path, &EngineConfig::default())
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// See [`Template::new`].
    pub fn with_config(path: impl AsRef<Path>, config: &EngineConfig) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &source, config)
    }

    /// Parse `source`, using `path` as the template's identity.
    ///
    /// # Errors
    ///
    /// See [`Template::new`]; reading is skipped.
    pub fn parse(
        path: impl Into<PathBuf>,
        source: &str,
        config: &EngineConfig,
    ) -> Result<Self, TemplateError> {
        let path = path.into();
        let name = path.display().to_string();
        tracing::debug!("Parsing template {name}");

        let parsed = tera::Template::new(&name, Some(name.clone()), source)
            .map_err(|e| syntax_error(&path, &e))?;
        let dependencies =
            DependencyExtractor::new(&path, source, config).extract(&parsed.ast)?;

        let mut engine = Tera::default();
        // An empty suffix matches every template name.
        engine.autoescape_on(if config.autoescape { vec![""] } else { vec![] });
        engine.add_raw_template(&name, source).map_err(|e| syntax_error(&path, &e))?;

        Ok(Self {
            path,
            name,
            engine,
            dependencies,
        })
    }

    /// Source path this template was built from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data this template needs, deduplicated, in order of first use.
    #[must_use]
    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    /// Render against `context`.
    ///
    /// The context must hold an entry for every dependency; the first one it
    /// lacks is reported and nothing is rendered. The output is returned
    /// exactly as produced, without trimming.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::MissingContext`] when `context` is `None`
    /// - [`TemplateError::MissingDependency`] when an entry is absent
    /// - [`TemplateError::Render`] when substitution fails
    pub fn execute(&self, context: Option<&TemplateContext>) -> Result<Vec<u8>, TemplateError> {
        renderer::render(&self.engine, &self.name, &self.path, &self.dependencies, context)
    }

    /// Identity for caches and registries: `Template|<path>`.
    ///
    /// Depends on the path only, never on the file's content.
    #[must_use]
    pub fn hash_code(&self) -> String {
        format!("{TEMPLATE_HASH_TAG}{TEMPLATE_HASH_DELIMITER}{}", self.path.display())
    }
}

fn syntax_error(path: &Path, error: &tera::Error) -> TemplateError {
    TemplateError::Syntax {
        location: ErrorLocation::new(path, extract_line_from_tera_error(error)),
        message: format_tera_error(error),
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("path", &self.path)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.hash_code() == other.hash_code()
    }
}

impl Eq for Template {}

impl Hash for Template {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash_code().hash(state);
    }
}
