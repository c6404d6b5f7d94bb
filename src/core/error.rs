//! Application-level errors and their user-facing presentation.
//!
//! Library code returns precise errors ([`TemplateError`],
//! [`DependencyError`](crate::dependency::DependencyError)); the command-line
//! layer works in `anyhow::Result` and, at the very end, turns whatever failed
//! into an [`ErrorContext`] with [`user_friendly_error`]:
//!
//! ```rust,no_run
//! use ctmpl::core::error::user_friendly_error;
//!
//! # fn run() -> anyhow::Result<()> { Ok(()) }
//! if let Err(e) = run() {
//!     let ctx = user_friendly_error(e);
//!     ctx.display(); // colored error, details and suggestion on stderr
//!     std::process::exit(1);
//! }
//! ```

use std::fmt;

use colored::Colorize;
use thiserror::Error;

use crate::templating::TemplateError;

/// Failures of the `ctmpl` tool.
#[derive(Error, Debug)]
pub enum CtmplError {
    /// Parsing or rendering a template failed
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The data snapshot passed with `--data` does not exist
    #[error("Snapshot file not found: {path}")]
    SnapshotNotFound {
        /// Path that was looked up
        path: String,
    },

    /// The data snapshot is not valid JSON/TOML or has the wrong shape
    #[error("Invalid snapshot {file}: {reason}")]
    SnapshotParseError {
        /// Snapshot file
        file: String,
        /// Parser message
        reason: String,
    },

    /// The configuration file could not be loaded
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// Standard I/O failure
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Anything without a dedicated variant
    #[error("{message}")]
    Other {
        /// Full error chain
        message: String,
    },
}

/// An error together with optional details and a suggested fix.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CtmplError,
    /// What the user can do about it
    pub suggestion: Option<String>,
    /// Extra background
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: CtmplError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] fit for printing.
///
/// Known error types get details and a suggestion; anything else is shown
/// with its full context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let error = match error.downcast::<CtmplError>() {
        Ok(e) => return create_error_context(e),
        Err(error) => error,
    };

    let error = match error.downcast::<TemplateError>() {
        Ok(e) => return create_error_context(CtmplError::Template(e)),
        Err(error) => error,
    };

    let error = match error.downcast::<std::io::Error>() {
        Ok(e) => return create_error_context(CtmplError::IoError(e)),
        Err(error) => error,
    };

    ErrorContext::new(CtmplError::Other {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: CtmplError) -> ErrorContext {
    match &error {
        CtmplError::Template(template_error) => {
            let details = template_details(template_error);
            let suggestion = template_error.suggestion();
            let mut ctx = ErrorContext::new(error);
            if let Some(details) = details {
                ctx = ctx.with_details(details);
            }
            if let Some(suggestion) = suggestion {
                ctx = ctx.with_suggestion(suggestion);
            }
            ctx
        }
        CtmplError::SnapshotNotFound {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check the path passed with --data"),
        CtmplError::SnapshotParseError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Snapshots are JSON, or TOML when the file name ends in .toml")
            .with_details("Expected top-level tables: services, keys, key_prefixes"),
        CtmplError::ConfigError {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check ~/.ctmpl/config.toml or the file passed with --config"),
        CtmplError::IoError(io_error) => match io_error.kind() {
            std::io::ErrorKind::NotFound => ErrorContext::new(error)
                .with_suggestion("Check that the file exists and the path is correct"),
            std::io::ErrorKind::PermissionDenied => ErrorContext::new(error)
                .with_suggestion("Check the file's permissions"),
            _ => ErrorContext::new(error),
        },
        CtmplError::Other {
            ..
        } => ErrorContext::new(error),
    }
}

fn template_details(error: &TemplateError) -> Option<&'static str> {
    match error {
        TemplateError::MissingDependency {
            ..
        } => Some("Every dependency must have an entry in the data, even an empty one"),
        TemplateError::InvalidArgument {
            ..
        } => Some("Arguments to service, key and keyPrefix must be string literals"),
        TemplateError::UnsupportedTag {
            ..
        } => Some("Dependencies are extracted from one file without resolving others"),
        _ => None,
    }
}
