//! Validated rendering with Tera.
//!
//! Each call to [`render`] checks the context against the template's
//! dependencies, builds a fresh function table from the context, registers it
//! on a clone of the parsed engine, and renders. Nothing is registered
//! globally, so concurrent renders of one template with different contexts
//! never observe each other's data.

use std::collections::HashMap;
use std::path::Path;

use tera::{Context as TeraContext, Tera, Value};

use super::context::TemplateContext;
use super::error::{ErrorLocation, TemplateError, format_tera_error};
use super::extractor::argument_name;
use crate::dependency::{Dependency, DependencyKind};

/// Data bound to the three data-access functions for a single render.
#[derive(Debug, Default)]
pub(crate) struct Bindings {
    services: HashMap<String, Value>,
    keys: HashMap<String, Value>,
    key_prefixes: HashMap<String, Value>,
}

impl Bindings {
    /// Bind every dependency from `context`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingDependency`] for the first dependency the
    /// context has no entry for, as reported by [`TemplateContext::first_missing`].
    pub(crate) fn resolve(
        path: &Path,
        dependencies: &[Dependency],
        context: &TemplateContext,
    ) -> Result<Self, TemplateError> {
        if let Some(missing) = context.first_missing(dependencies) {
            return Err(TemplateError::MissingDependency {
                kind: missing.kind(),
                spec: missing.key().to_string(),
            });
        }

        let mut bindings = Self::default();
        for dependency in dependencies {
            let spec = dependency.key();
            let (table, value) = match dependency.kind() {
                DependencyKind::Service => (
                    &mut bindings.services,
                    context.services(spec).map(|services| to_value(path, services)).transpose()?,
                ),
                DependencyKind::Key => (
                    &mut bindings.keys,
                    context.key(spec).map(|value| Value::String(value.to_string())),
                ),
                DependencyKind::KeyPrefix => (
                    &mut bindings.key_prefixes,
                    context.key_prefix(spec).map(|pairs| to_value(path, pairs)).transpose()?,
                ),
            };
            if let Some(value) = value {
                table.insert(spec.to_string(), value);
            }
        }

        Ok(bindings)
    }

    /// Register the bound data on `tera` as `service`, `key` and `keyPrefix`.
    pub(crate) fn register(self, tera: &mut Tera) {
        tera.register_function(
            DependencyKind::Service.function_name(),
            lookup_function(DependencyKind::Service, self.services),
        );
        tera.register_function(
            DependencyKind::Key.function_name(),
            lookup_function(DependencyKind::Key, self.keys),
        );
        tera.register_function(
            DependencyKind::KeyPrefix.function_name(),
            lookup_function(DependencyKind::KeyPrefix, self.key_prefixes),
        );
    }
}

fn to_value<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<Value, TemplateError> {
    tera::to_value(value).map_err(|e| TemplateError::Render {
        location: ErrorLocation::new(path, None),
        message: format!("failed to bind context data: {e}"),
    })
}

/// Build the Tera function answering `kind` lookups from `bound`.
pub(crate) fn lookup_function(
    kind: DependencyKind,
    bound: HashMap<String, Value>,
) -> impl tera::Function + 'static {
    let argument = argument_name(kind);
    move |args: &HashMap<String, Value>| -> tera::Result<Value> {
        let spec = args.get(argument).and_then(Value::as_str).ok_or_else(|| {
            tera::Error::msg(format!("{kind} requires a string `{argument}` argument"))
        })?;

        bound
            .get(spec)
            .cloned()
            .ok_or_else(|| tera::Error::msg(format!("template context missing {kind} `{spec}`")))
    }
}

/// Render the template registered as `name` on `engine`.
///
/// # Errors
///
/// - [`TemplateError::MissingContext`] when `context` is `None`
/// - [`TemplateError::MissingDependency`] for the first unresolved dependency
/// - [`TemplateError::Render`] when Tera fails during substitution
pub(crate) fn render(
    engine: &Tera,
    name: &str,
    path: &Path,
    dependencies: &[Dependency],
    context: Option<&TemplateContext>,
) -> Result<Vec<u8>, TemplateError> {
    let context = context.ok_or(TemplateError::MissingContext)?;

    tracing::debug!(
        "Rendering {} against {} dependencies",
        path.display(),
        dependencies.len()
    );
    let bindings = Bindings::resolve(path, dependencies, context)?;

    // Fresh function table per render; the parsed templates are shared.
    let mut tera = engine.clone();
    bindings.register(&mut tera);

    let rendered = tera.render(name, &TeraContext::new()).map_err(|e| TemplateError::Render {
        location: ErrorLocation::new(path, None),
        message: format_tera_error(&e),
    })?;

    tracing::debug!("Rendered {} ({} bytes)", path.display(), rendered.len());
    Ok(rendered.into_bytes())
}
