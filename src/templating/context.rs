//! Resolved external data handed to a render.
//!
//! A [`TemplateContext`] is the snapshot a watcher assembled for a template:
//! one table per [`DependencyKind`], each keyed by [`Dependency::key`]. The
//! engine only ever reads it.
//!
//! An entry holding an empty list is a real answer ("this service has no
//! instances right now"); a missing entry means the data has not been fetched
//! and rendering must not proceed.
//!
//! # Snapshot format
//!
//! The context (de)serializes with serde, which is how the CLI loads it:
//!
//! ```json
//! {
//!   "services": { "release.webapp": [ { "Node": "n1", "Address": "10.0.0.1", "ID": "web1", "Name": "webapp", "Port": 80 } ] },
//!   "keys": { "service/redis/maxconns": "11" },
//!   "key_prefixes": { "service/redis/config": [ { "Key": "minconns", "Value": "2" } ] }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, DependencyKind};
use crate::models::{KeyPair, Service, ServiceList};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContext {
    /// Service spec -> instances in canonical order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    services: BTreeMap<String, ServiceList>,
    /// Key path -> value
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    keys: BTreeMap<String, String>,
    /// Prefix path -> pairs in caller order
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    key_prefixes: BTreeMap<String, Vec<KeyPair>>,
}

impl TemplateContext {
    /// Create a context with all three tables empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the instances of `spec`, sorting them into canonical order.
    pub fn insert_services(&mut self, spec: impl Into<String>, services: Vec<Service>) {
        self.services.insert(spec.into(), ServiceList::from(services));
    }

    /// Record the value stored at `path`.
    pub fn insert_key(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.keys.insert(path.into(), value.into());
    }

    /// Record the pairs under `prefix`; their order is kept as given.
    pub fn insert_key_prefix(&mut self, prefix: impl Into<String>, pairs: Vec<KeyPair>) {
        self.key_prefixes.insert(prefix.into(), pairs);
    }

    /// Builder form of [`insert_services`](Self::insert_services).
    #[must_use]
    pub fn with_services(mut self, spec: impl Into<String>, services: Vec<Service>) -> Self {
        self.insert_services(spec, services);
        self
    }

    /// Builder form of [`insert_key`](Self::insert_key).
    #[must_use]
    pub fn with_key(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_key(path, value);
        self
    }

    /// Builder form of [`insert_key_prefix`](Self::insert_key_prefix).
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>, pairs: Vec<KeyPair>) -> Self {
        self.insert_key_prefix(prefix, pairs);
        self
    }

    #[must_use]
    pub fn services(&self, spec: &str) -> Option<&ServiceList> {
        self.services.get(spec)
    }

    #[must_use]
    pub fn key(&self, path: &str) -> Option<&str> {
        self.keys.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn key_prefix(&self, prefix: &str) -> Option<&[KeyPair]> {
        self.key_prefixes.get(prefix).map(Vec::as_slice)
    }

    /// Whether the table for `dependency`'s kind has an entry for its key.
    #[must_use]
    pub fn contains(&self, dependency: &Dependency) -> bool {
        self.contains_key(dependency.kind(), dependency.key())
    }

    /// Whether the table for `kind` has an entry for `key`.
    #[must_use]
    pub fn contains_key(&self, kind: DependencyKind, key: &str) -> bool {
        match kind {
            DependencyKind::Service => self.services.contains_key(key),
            DependencyKind::Key => self.keys.contains_key(key),
            DependencyKind::KeyPrefix => self.key_prefixes.contains_key(key),
        }
    }

    /// First dependency in `dependencies` the context cannot satisfy.
    #[must_use]
    pub fn first_missing<'a>(&self, dependencies: &'a [Dependency]) -> Option<&'a Dependency> {
        dependencies.iter().find(|dependency| !self.contains(dependency))
    }

    /// Whether all three tables are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.keys.is_empty() && self.key_prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(node: &str, id: &str) -> Service {
        Service {
            node: node.to_string(),
            id: id.to_string(),
            ..Service::default()
        }
    }

    #[test]
    fn test_empty_list_counts_as_resolved() {
        let context = TemplateContext::new().with_services("release.webapp", vec![]);
        let resolved = Dependency::parse(DependencyKind::Service, "release.webapp").unwrap();
        let unresolved = Dependency::parse(DependencyKind::Service, "production.webapp").unwrap();

        assert!(context.contains(&resolved));
        assert!(!context.contains(&unresolved));
        assert!(context.services("release.webapp").is_some_and(|list| list.is_empty()));
    }

    #[test]
    fn test_tables_are_separate_per_kind() {
        let context = TemplateContext::new().with_key("app", "1");
        assert!(context.contains_key(DependencyKind::Key, "app"));
        assert!(!context.contains_key(DependencyKind::KeyPrefix, "app"));
        assert!(!context.contains_key(DependencyKind::Service, "app"));
    }

    #[test]
    fn test_first_missing_is_in_dependency_order() {
        let deps = vec![
            Dependency::parse(DependencyKind::Key, "a").unwrap(),
            Dependency::parse(DependencyKind::Key, "b").unwrap(),
            Dependency::parse(DependencyKind::Key, "c").unwrap(),
        ];
        let context = TemplateContext::new().with_key("a", "1");
        assert_eq!(context.first_missing(&deps).map(Dependency::key), Some("b"));

        let complete = context.with_key("b", "2").with_key("c", "3");
        assert_eq!(complete.first_missing(&deps), None);
    }

    #[test]
    fn test_services_are_sorted_on_insert() {
        let context = TemplateContext::new()
            .with_services("web", vec![service("frontend02", "1"), service("frontend01", "1")]);
        let nodes: Vec<_> = context.services("web").unwrap().iter().map(|s| s.node.as_str()).collect();
        assert_eq!(nodes, vec!["frontend01", "frontend02"]);
    }

    #[test]
    fn test_key_prefix_order_is_preserved() {
        let context = TemplateContext::new().with_key_prefix(
            "service/redis/config",
            vec![KeyPair::new("minconns", "2"), KeyPair::new("maxconns", "11")],
        );
        let keys: Vec<_> =
            context.key_prefix("service/redis/config").unwrap().iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["minconns", "maxconns"]);
    }

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "services": {
                "web": [
                    {"Node": "b", "ID": "1", "Address": "10.0.0.2", "Port": 80},
                    {"Node": "a", "ID": "1", "Address": "10.0.0.1", "Port": 80}
                ]
            },
            "keys": {"service/redis/maxconns": "11"}
        }"#;
        let context: TemplateContext = serde_json::from_str(json).unwrap();

        assert_eq!(context.services("web").unwrap()[0].address, "10.0.0.1");
        assert_eq!(context.key("service/redis/maxconns"), Some("11"));
        assert!(context.key_prefix("anything").is_none());
        assert!(!context.is_empty());
    }

    #[test]
    fn test_deserialize_toml_snapshot() {
        let toml_src = r#"
[keys]
"service/redis/online" = "true"

[[key_prefixes."service/redis/config"]]
Key = "minconns"
Value = "2"
"#;
        let context: TemplateContext = toml::from_str(toml_src).unwrap();
        assert_eq!(context.key("service/redis/online"), Some("true"));
        assert_eq!(context.key_prefix("service/redis/config").unwrap()[0], KeyPair::new("minconns", "2"));
    }
}
