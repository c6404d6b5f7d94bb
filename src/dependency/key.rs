use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use super::DependencyError;

/// `path@datacenter`, where the datacenter is the last `@` segment.
fn datacenter_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<path>.*)@(?P<datacenter>[[:word:].\-]+)$")
            .expect("datacenter suffix pattern is valid")
    })
}

/// Split off a trailing `@datacenter`.
///
/// Never fails: a spec without a well-formed suffix (`"foo@"`, `"a@b c"`) is
/// a path in its own right.
fn split_datacenter(spec: &str) -> (&str, Option<&str>) {
    match datacenter_pattern().captures(spec) {
        Some(captures) => {
            let path = captures.name("path").map_or("", |m| m.as_str());
            (path, captures.name("datacenter").map(|m| m.as_str()))
        }
        None => (spec, None),
    }
}

/// A request for the value stored at a single key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyDependency {
    raw: String,
    path: String,
    datacenter: Option<String>,
}

impl KeyDependency {
    /// The specification exactly as written in the template.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.raw
    }

    /// Store path without the datacenter suffix.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }
}

impl FromStr for KeyDependency {
    type Err = DependencyError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (path, datacenter) = split_datacenter(spec);

        Ok(Self {
            raw: spec.to_string(),
            path: path.to_string(),
            datacenter: datacenter.map(str::to_string),
        })
    }
}

/// A request for every key/value pair nested under a prefix.
///
/// An empty prefix addresses the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPrefixDependency {
    raw: String,
    prefix: String,
    datacenter: Option<String>,
}

impl KeyPrefixDependency {
    /// The specification exactly as written in the template.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.raw
    }

    /// Store prefix without the datacenter suffix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }
}

impl FromStr for KeyPrefixDependency {
    type Err = DependencyError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (prefix, datacenter) = split_datacenter(spec);

        Ok(Self {
            raw: spec.to_string(),
            prefix: prefix.to_string(),
            datacenter: datacenter.map(str::to_string),
        })
    }
}
