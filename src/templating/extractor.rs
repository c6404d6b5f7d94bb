//! Static dependency extraction over Tera's parsed node tree.
//!
//! Extraction never evaluates the template. It walks every node, including
//! both arms of conditionals, loop bodies and their `{% else %}` bodies,
//! filter sections, `set` values and macro bodies, and collects each function
//! call and filter application in document order. Two passes then run:
//!
//! 1. every function must be a data-access function or an allowed Tera
//!    built-in, and every filter an allowed Tera filter, otherwise
//!    construction fails with the line of the first use;
//! 2. each data-access call turns its literal argument into a [`Dependency`],
//!    deduplicated by kind and key with the first occurrence kept.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use strsim::levenshtein;
use tera::ast::{Expr, ExprVal, FunctionCall, Node};

use super::error::{ErrorLocation, TemplateError};
use crate::config::EngineConfig;
use crate::constants::{MAX_SUGGESTION_DISTANCE, PATH_ARGUMENT, SERVICE_ARGUMENT};
use crate::dependency::{Dependency, DependencyKind, DependencySet};

/// Keyword argument that carries the specification for `kind`.
pub(crate) const fn argument_name(kind: DependencyKind) -> &'static str {
    match kind {
        DependencyKind::Service => SERVICE_ARGUMENT,
        DependencyKind::Key | DependencyKind::KeyPrefix => PATH_ARGUMENT,
    }
}

/// Function calls and filter applications, each in document order.
#[derive(Default)]
struct Calls<'n> {
    functions: Vec<&'n FunctionCall>,
    filters: Vec<&'n FunctionCall>,
}

impl<'n> Calls<'n> {
    fn filter(&mut self, filter: &'n FunctionCall) {
        self.filters.push(filter);
        collect_args(&filter.args, self);
    }
}

/// Extracts the dependencies of one parsed template.
pub(crate) struct DependencyExtractor<'a> {
    path: &'a Path,
    source: &'a str,
    config: &'a EngineConfig,
}

impl<'a> DependencyExtractor<'a> {
    pub(crate) fn new(path: &'a Path, source: &'a str, config: &'a EngineConfig) -> Self {
        Self {
            path,
            source,
            config,
        }
    }

    /// Run both passes over `ast`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnsupportedTag`] for `extends`/`include`/`import`,
    /// [`TemplateError::UndefinedFunction`] / [`TemplateError::UndefinedFilter`]
    /// for unknown names, and [`TemplateError::InvalidArgument`] when a
    /// data-access call's argument is not a valid literal specification.
    pub(crate) fn extract(&self, ast: &[Node]) -> Result<Vec<Dependency>, TemplateError> {
        let mut calls = Calls::default();
        self.collect_nodes(ast, &mut calls)?;

        for call in &calls.functions {
            self.check_function(call)?;
        }
        for filter in &calls.filters {
            self.check_filter(filter)?;
        }

        let mut dependencies = DependencySet::new();
        for call in calls.functions {
            let Some(kind) = DependencyKind::from_function_name(&call.name) else {
                continue;
            };
            let dependency = Self::dependency_from_call(kind, call)?;
            tracing::trace!("{}: found {}", self.path.display(), dependency);
            dependencies.insert(dependency);
        }

        tracing::debug!(
            "Extracted {} dependencies from {}",
            dependencies.len(),
            self.path.display()
        );
        Ok(dependencies.into_vec())
    }

    fn collect_nodes<'n>(&self, nodes: &'n [Node], calls: &mut Calls<'n>) -> Result<(), TemplateError> {
        for node in nodes {
            self.collect_node(node, calls)?;
        }
        Ok(())
    }

    fn collect_node<'n>(&self, node: &'n Node, calls: &mut Calls<'n>) -> Result<(), TemplateError> {
        match node {
            Node::VariableBlock(_, expr) => collect_expr(expr, calls),
            Node::Set(_, set) => collect_expr(&set.value, calls),
            Node::FilterSection(_, section, _) => {
                calls.filter(&section.filter);
                self.collect_nodes(&section.body, calls)?;
            }
            Node::Block(_, block, _) => self.collect_nodes(&block.body, calls)?,
            Node::MacroDefinition(_, definition, _) => {
                let mut names: Vec<_> = definition.args.keys().collect();
                names.sort();
                for name in names {
                    if let Some(Some(default)) = definition.args.get(name) {
                        collect_expr(default, calls);
                    }
                }
                self.collect_nodes(&definition.body, calls)?;
            }
            Node::Forloop(_, forloop, _) => {
                collect_expr(&forloop.container, calls);
                self.collect_nodes(&forloop.body, calls)?;
                if let Some(empty_body) = &forloop.empty_body {
                    self.collect_nodes(empty_body, calls)?;
                }
            }
            Node::If(if_node, _) => {
                for (_, condition, body) in &if_node.conditions {
                    collect_expr(condition, calls);
                    self.collect_nodes(body, calls)?;
                }
                if let Some((_, otherwise)) = &if_node.otherwise {
                    self.collect_nodes(otherwise, calls)?;
                }
            }
            Node::Extends(..) => return Err(self.unsupported("extends")),
            Node::Include(..) => return Err(self.unsupported("include")),
            Node::ImportMacro(..) => return Err(self.unsupported("import")),
            _ => {}
        }
        Ok(())
    }

    fn unsupported(&self, tag: &'static str) -> TemplateError {
        let pattern = format!(r"^\{{%-?\s*{tag}\b");
        TemplateError::UnsupportedTag {
            location: ErrorLocation::new(self.path, line_of(self.source, &pattern)),
            tag,
        }
    }

    fn check_function(&self, call: &FunctionCall) -> Result<(), TemplateError> {
        let name = call.name.as_str();
        let builtins = &self.config.builtin_functions;
        if DependencyKind::from_function_name(name).is_some()
            || builtins.iter().any(|builtin| builtin == name)
        {
            return Ok(());
        }

        let candidates = DependencyKind::ALL
            .into_iter()
            .map(|kind| -> &str { kind.function_name() })
            .chain(builtins.iter().map(String::as_str));
        let pattern = format!(r"\b{}\s*\(", regex::escape(name));
        Err(TemplateError::UndefinedFunction {
            location: ErrorLocation::new(self.path, line_of(self.source, &pattern)),
            name: name.to_string(),
            suggestion: closest(name, candidates),
        })
    }

    fn check_filter(&self, filter: &FunctionCall) -> Result<(), TemplateError> {
        let name = filter.name.as_str();
        let builtins = &self.config.builtin_filters;
        if builtins.iter().any(|builtin| builtin == name) {
            return Ok(());
        }

        let pattern = format!(r"(?:\|\s*|\{{%-?\s*filter\s+){}\b", regex::escape(name));
        Err(TemplateError::UndefinedFilter {
            location: ErrorLocation::new(self.path, line_of(self.source, &pattern)),
            name: name.to_string(),
            suggestion: closest(name, builtins.iter().map(String::as_str)),
        })
    }

    fn dependency_from_call(
        kind: DependencyKind,
        call: &FunctionCall,
    ) -> Result<Dependency, TemplateError> {
        let argument = argument_name(kind);
        let invalid = |message: String| TemplateError::InvalidArgument {
            function: kind,
            message,
        };

        let expr = match call.args.get(argument) {
            Some(expr) if call.args.len() == 1 => expr,
            _ => return Err(invalid(format!("expected a single `{argument}` argument"))),
        };

        let spec = match &expr.val {
            ExprVal::String(spec) if expr.filters.is_empty() && !expr.negated => spec,
            _ => return Err(invalid(format!("`{argument}` must be a string literal"))),
        };

        Dependency::parse(kind, spec).map_err(|e| invalid(e.to_string()))
    }
}

fn collect_expr<'n>(expr: &'n Expr, calls: &mut Calls<'n>) {
    collect_expr_val(&expr.val, calls);
    for filter in &expr.filters {
        calls.filter(filter);
    }
}

fn collect_expr_val<'n>(val: &'n ExprVal, calls: &mut Calls<'n>) {
    match val {
        ExprVal::FunctionCall(call) => {
            calls.functions.push(call);
            collect_args(&call.args, calls);
        }
        ExprVal::MacroCall(call) => collect_args(&call.args, calls),
        ExprVal::Math(math) => {
            collect_expr(&math.lhs, calls);
            collect_expr(&math.rhs, calls);
        }
        ExprVal::Logic(logic) => {
            collect_expr(&logic.lhs, calls);
            collect_expr(&logic.rhs, calls);
        }
        ExprVal::In(in_expr) => {
            collect_expr(&in_expr.lhs, calls);
            collect_expr(&in_expr.rhs, calls);
        }
        ExprVal::Test(test) => {
            for arg in &test.args {
                collect_expr(arg, calls);
            }
        }
        ExprVal::Array(items) => {
            for item in items {
                collect_expr(item, calls);
            }
        }
        ExprVal::StringConcat(concat) => {
            for value in &concat.values {
                collect_expr_val(value, calls);
            }
        }
        _ => {}
    }
}

/// Keyword arguments live in a `HashMap`; visit them by name for a stable order.
fn collect_args<'n>(args: &'n HashMap<String, Expr>, calls: &mut Calls<'n>) {
    let mut named: Vec<_> = args.iter().collect();
    named.sort_by(|(a, _), (b, _)| a.cmp(b));
    for (_, expr) in named {
        collect_expr(expr, calls);
    }
}

/// Closest candidate within [`MAX_SUGGESTION_DISTANCE`] edits of `name`.
fn closest<'c>(name: &str, candidates: impl Iterator<Item = &'c str>) -> Option<String> {
    candidates
        .map(|candidate| (levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_string())
}

/// `{{ }}` and `{% %}` tags; comments and raw blocks match `skip` instead.
fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?s)(?P<skip>\{#.*?#\}|\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\})|(?P<tag>\{\{.*?\}\}|\{%.*?%\})",
        )
        .expect("tag pattern is valid")
    })
}

/// Byte ranges of the template tags in `source`, in order.
fn tag_spans(source: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    tag_pattern().captures_iter(source).filter_map(|captures| captures.name("tag")).map(|m| m.range())
}

/// 1-based line of the first match of `pattern` inside a template tag.
fn line_of(source: &str, pattern: &str) -> Option<usize> {
    let re = Regex::new(pattern).ok()?;
    let start = tag_spans(source)
        .find_map(|span| re.find(&source[span.clone()]).map(|m| span.start + m.start()))?;
    Some(source[..start].matches('\n').count() + 1)
}
