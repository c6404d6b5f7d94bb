//! Template error types.
//!
//! Every failure the engine can report is a [`TemplateError`]. Construction
//! failures (unreadable file, bad syntax, unknown function, invalid call
//! argument) mean no [`Template`](super::Template) is produced; execution
//! failures (no context, incomplete context, engine error) discard the whole
//! render. There is no partial output.

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::dependency::DependencyKind;

/// Source file and, when known, line an error points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLocation {
    pub path: PathBuf,
    /// 1-based line number
    pub line: Option<usize>,
}

impl ErrorLocation {
    pub fn new(path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template file could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The template source is not valid template syntax.
    #[error("template: {location}: {message}")]
    Syntax {
        location: ErrorLocation,
        message: String,
    },

    /// The template calls a function the engine does not provide.
    #[error("template: {location}: function \"{name}\" not defined")]
    UndefinedFunction {
        location: ErrorLocation,
        name: String,
        /// Closest known function name, if any is near enough
        suggestion: Option<String>,
    },

    /// The template applies a filter the engine does not provide.
    #[error("template: {location}: filter \"{name}\" not defined")]
    UndefinedFilter {
        location: ErrorLocation,
        name: String,
        /// Closest known filter name, if any is near enough
        suggestion: Option<String>,
    },

    /// The template uses a tag that pulls in other files.
    #[error("template: {location}: `{tag}` is not supported, a template is a single file")]
    UnsupportedTag {
        location: ErrorLocation,
        tag: &'static str,
    },

    /// A data-access call has an argument that cannot become a dependency.
    #[error("error calling {function}: {message}")]
    InvalidArgument {
        function: DependencyKind,
        message: String,
    },

    /// `execute` was called without any context.
    #[error("a template context must be given")]
    MissingContext,

    /// The context has no entry for a dependency the template requires.
    #[error("template context missing {kind} `{spec}`")]
    MissingDependency {
        kind: DependencyKind,
        spec: String,
    },

    /// The engine failed while substituting values.
    #[error("template: {location}: {message}")]
    Render {
        location: ErrorLocation,
        message: String,
    },
}

impl TemplateError {
    /// Actionable hint for a person reading the error, where one exists.
    #[must_use]
    pub fn suggestion(&self) -> Option<String> {
        match self {
            TemplateError::UndefinedFunction {
                suggestion: Some(name),
                ..
            } => Some(format!("Did you mean `{name}`?")),
            TemplateError::UndefinedFunction {
                ..
            } => Some(
                "Templates may call `service(name=...)`, `key(path=...)` and `keyPrefix(path=...)`"
                    .to_string(),
            ),
            TemplateError::UndefinedFilter {
                suggestion: Some(name),
                ..
            } => Some(format!("Did you mean `{name}`?")),
            TemplateError::UndefinedFilter {
                ..
            } => Some("Allowed filters are listed in `builtin_filters` in the config".to_string()),
            TemplateError::InvalidArgument {
                function: DependencyKind::Service,
                ..
            } => Some("Service identifiers look like `[tag.]name[@datacenter][:port]`".to_string()),
            TemplateError::MissingDependency {
                ..
            } => Some(
                "Resolve every dependency listed by `ctmpl deps` before rendering".to_string(),
            ),
            _ => None,
        }
    }
}

/// Pull the line number out of a Tera parse error (`--> 3:7`).
pub(crate) fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
    static LINE: OnceLock<Regex> = OnceLock::new();
    let re = LINE.get_or_init(|| Regex::new(r"-->\s*(\d+):(\d+)").expect("line pattern is valid"));

    let message = format_tera_error(error);
    re.captures(&message)?.get(1)?.as_str().parse().ok()
}

/// Flatten a Tera error and its sources into one message.
///
/// The outermost "Failed to parse/render '<name>'" wrappers are dropped since
/// the caller already reports the template location.
pub(crate) fn format_tera_error(error: &tera::Error) -> String {
    use std::error::Error;

    let mut messages = Vec::new();
    let mut current: Option<&dyn Error> = Some(error);
    while let Some(err) = current {
        let message = err.to_string();
        let message = message.trim();
        if !message.is_empty()
            && !message.starts_with("Failed to parse '")
            && !message.starts_with("Failed to render '")
        {
            messages.push(message.to_string());
        }
        current = err.source();
    }

    if messages.is_empty() {
        error.to_string()
    } else {
        messages.join(" -> ")
    }
}
