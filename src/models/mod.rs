//! Records exposed to template bodies.
//!
//! [`Service`] and [`KeyPair`] are what `service(...)` and `keyPrefix(...)`
//! yield inside a template. Their serialized field names (`Node`, `Address`,
//! `ID`, `Name`, `Port`, `Tags`, `Key`, `Value`) are the names template authors
//! write, e.g. `{{ s.Address }}:{{ s.Port }}`.
//!
//! Discovery backends do not promise any particular instance order, so a
//! [`ServiceList`] always holds its services sorted by node and then by ID.
//! Rendering identical data twice therefore yields identical bytes.

use std::cmp::Ordering;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// One discovered instance of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    /// Name of the node the instance runs on
    #[serde(default)]
    pub node: String,
    /// Address the instance is reachable at
    #[serde(default)]
    pub address: String,
    /// Instance ID, unique per node
    #[serde(rename = "ID", default)]
    pub id: String,
    /// Logical service name
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port: u16,
    /// Discovery tags attached to the instance
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Service {
    /// Canonical ordering: node name, then instance ID, both lexicographic.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.node.cmp(&other.node).then_with(|| self.id.cmp(&other.id))
    }
}

/// Services in canonical order.
///
/// Built from any `Vec<Service>` with a stable sort on (node, ID); records
/// equal on both keep their input order. Deserializing a list applies the same
/// sort, so snapshots loaded from disk are canonical as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Service>")]
pub struct ServiceList(Vec<Service>);

impl ServiceList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the list, yielding the sorted services.
    #[must_use]
    pub fn into_inner(self) -> Vec<Service> {
        self.0
    }
}

impl From<Vec<Service>> for ServiceList {
    fn from(mut services: Vec<Service>) -> Self {
        services.sort_by(Service::canonical_cmp);
        Self(services)
    }
}

impl FromIterator<Service> for ServiceList {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        iter.into_iter().collect::<Vec<_>>().into()
    }
}

impl Deref for ServiceList {
    type Target = [Service];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ServiceList {
    type Item = &'a Service;
    type IntoIter = std::slice::Iter<'a, Service>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One key/value pair found under a key prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyPair {
    /// Key relative to the requested prefix
    pub key: String,
    pub value: String,
}

impl KeyPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
