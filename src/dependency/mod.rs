//! External data requirements discovered in template bodies.
//!
//! A [`Dependency`] names one piece of data a template needs before it can be
//! rendered: the instances of a discovered service, a single key from the
//! configuration store, or every pair under a key prefix. Dependencies are
//! produced by static extraction (see [`crate::templating`]) and are consumed
//! by whatever watches the store on the template's behalf.
//!
//! # Identity
//!
//! [`Dependency::key`] returns the raw specification string exactly as written
//! at the call site. That string is the lookup key into a
//! [`TemplateContext`](crate::templating::TemplateContext) and, together with
//! the [`DependencyKind`], the deduplication key. `service("a")` and `key("a")`
//! are two different dependencies.
//!
//! # Examples
//!
//! ```rust
//! use ctmpl::dependency::{Dependency, DependencyKind};
//!
//! let dep = Dependency::parse(DependencyKind::Service, "release.webapp@dc1")?;
//! assert_eq!(dep.key(), "release.webapp@dc1");
//! assert_eq!(dep.to_string(), "service(release.webapp@dc1)");
//! # Ok::<(), ctmpl::dependency::DependencyError>(())
//! ```

mod key;
mod service;

pub use key::{KeyDependency, KeyPrefixDependency};
pub use service::ServiceDependency;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{KEY_FUNCTION, KEY_PREFIX_FUNCTION, SERVICE_FUNCTION};

/// Errors raised while parsing a dependency specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DependencyError {
    /// The service identifier does not match `[tag.]name[@datacenter][:port]`.
    #[error("invalid service dependency format {spec:?}")]
    InvalidService {
        /// The rejected specification
        spec: String,
    },

    /// The service identifier carries a port that does not fit in a `u16`.
    #[error("invalid port {port:?} in service dependency {spec:?}")]
    InvalidPort {
        /// The rejected specification
        spec: String,
        /// The port text that failed to parse
        port: String,
    },
}

/// The three kinds of external data a template can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyKind {
    /// Instances of a discovered service
    Service,
    /// A single key/value lookup
    Key,
    /// Every key/value pair below a prefix
    KeyPrefix,
}

impl DependencyKind {
    /// All kinds, in the order their tables appear in a template context.
    pub const ALL: [DependencyKind; 3] =
        [DependencyKind::Service, DependencyKind::Key, DependencyKind::KeyPrefix];

    /// Name of the template function that produces this kind of dependency.
    #[must_use]
    pub const fn function_name(self) -> &'static str {
        match self {
            DependencyKind::Service => SERVICE_FUNCTION,
            DependencyKind::Key => KEY_FUNCTION,
            DependencyKind::KeyPrefix => KEY_PREFIX_FUNCTION,
        }
    }

    /// Map a template function name back to its dependency kind.
    #[must_use]
    pub fn from_function_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.function_name() == name)
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// One statically discovered requirement for external data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// `service(name="...")`
    Service(ServiceDependency),
    /// `key(path="...")`
    Key(KeyDependency),
    /// `keyPrefix(path="...")`
    KeyPrefix(KeyPrefixDependency),
}

impl Dependency {
    /// Parse the literal argument of a data-access call into a dependency of `kind`.
    ///
    /// # Errors
    ///
    /// Returns a [`DependencyError`] when `spec` does not satisfy the grammar of
    /// the requested kind.
    pub fn parse(kind: DependencyKind, spec: &str) -> Result<Self, DependencyError> {
        Ok(match kind {
            DependencyKind::Service => Dependency::Service(spec.parse()?),
            DependencyKind::Key => Dependency::Key(spec.parse()?),
            DependencyKind::KeyPrefix => Dependency::KeyPrefix(spec.parse()?),
        })
    }

    /// Canonical identity: the raw specification string from the call site.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Dependency::Service(dep) => dep.key(),
            Dependency::Key(dep) => dep.key(),
            Dependency::KeyPrefix(dep) => dep.key(),
        }
    }

    /// Which table of the template context satisfies this dependency.
    #[must_use]
    pub const fn kind(&self) -> DependencyKind {
        match self {
            Dependency::Service(_) => DependencyKind::Service,
            Dependency::Key(_) => DependencyKind::Key,
            Dependency::KeyPrefix(_) => DependencyKind::KeyPrefix,
        }
    }

    /// Datacenter the data should be read from, when one was given.
    #[must_use]
    pub fn datacenter(&self) -> Option<&str> {
        match self {
            Dependency::Service(dep) => dep.datacenter(),
            Dependency::Key(dep) => dep.datacenter(),
            Dependency::KeyPrefix(dep) => dep.datacenter(),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind(), self.key())
    }
}

/// Insertion-ordered set of dependencies, unique by kind and key.
///
/// The first occurrence of a dependency wins; later duplicates are dropped and
/// the relative order of first occurrences is preserved.
#[derive(Debug, Default, Clone)]
pub struct DependencySet {
    ordered: Vec<Dependency>,
    seen: HashSet<(DependencyKind, String)>,
}

impl DependencySet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `dependency` unless an equal kind/key pair is already present.
    ///
    /// Returns `true` if the dependency was added.
    pub fn insert(&mut self, dependency: Dependency) -> bool {
        let identity = (dependency.kind(), dependency.key().to_string());
        if self.seen.insert(identity) {
            self.ordered.push(dependency);
            true
        } else {
            false
        }
    }

    /// Whether a dependency of `kind` with identity `key` has been added.
    #[must_use]
    pub fn contains(&self, kind: DependencyKind, key: &str) -> bool {
        self.seen.contains(&(kind, key.to_string()))
    }

    /// Number of unique dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the set holds no dependencies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Iterate in first-occurrence order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dependency> {
        self.ordered.iter()
    }

    /// Consume the set, yielding dependencies in first-occurrence order.
    #[must_use]
    pub fn into_vec(self) -> Vec<Dependency> {
        self.ordered
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a Dependency;
    type IntoIter = std::slice::Iter<'a, Dependency>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
