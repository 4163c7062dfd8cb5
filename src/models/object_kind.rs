//! Cluster object kind definitions
//!
//! Only two kinds get special treatment while building a resource graph:
//! pods are pooled into per-controller groups and replica sets may be skipped.
//! Every other kind is handled uniformly, so the dispatch stays a closed enum.

use std::fmt;

use kube::core::{DynamicObject, GroupVersionKind};

/// Kinds the collector branches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `v1/Pod` - the poolable leaf kind
    Pod,
    /// `apps/*/ReplicaSet` or `extensions/*/ReplicaSet`
    ReplicaSet,
    /// Anything else
    Other,
}

impl ObjectKind {
    /// Classify a group/version/kind
    pub fn from_gvk(gvk: &GroupVersionKind) -> Self {
        match (gvk.group.as_str(), gvk.version.as_str(), gvk.kind.as_str()) {
            ("", "v1", "Pod") => ObjectKind::Pod,
            ("apps" | "extensions", _, "ReplicaSet") => ObjectKind::ReplicaSet,
            _ => ObjectKind::Other,
        }
    }

    /// Classify a dynamic object by its type metadata
    pub fn of(object: &DynamicObject) -> Self {
        Self::from_gvk(&gvk_of(object))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Pod => "Pod",
            ObjectKind::ReplicaSet => "ReplicaSet",
            ObjectKind::Other => "Other",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read the group/version/kind from an object's type metadata
///
/// Objects without type metadata yield an empty descriptor, which classifies
/// as [`ObjectKind::Other`].
pub fn gvk_of(object: &DynamicObject) -> GroupVersionKind {
    let (api_version, kind) = object
        .types
        .as_ref()
        .map(|t| (t.api_version.as_str(), t.kind.as_str()))
        .unwrap_or(("", ""));

    let (group, version) = split_api_version(api_version);
    GroupVersionKind::gvk(group, version, kind)
}

/// Split an apiVersion into (group, version). Core objects have no group.
pub fn split_api_version(api_version: &str) -> (&str, &str) {
    match api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", api_version),
    }
}

/// Format an apiVersion for a group/version pair
pub fn api_version_of(gvk: &GroupVersionKind) -> String {
    if gvk.group.is_empty() {
        gvk.version.clone()
    } else {
        format!("{}/{}", gvk.group, gvk.version)
    }
}

/// Human-readable descriptor used in error messages, e.g. `apps/v1, Kind=ReplicaSet`
pub fn describe_gvk(gvk: &GroupVersionKind) -> String {
    format!("{}, Kind={}", api_version_of(gvk), gvk.kind)
}

/// Lowercase plural resource name for a kind (used for link paths)
pub fn plural_of(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if lower.ends_with('s') {
        format!("{}es", lower)
    } else if let Some(stem) = lower.strip_suffix('y') {
        format!("{}ies", stem)
    } else {
        format!("{}s", lower)
    }
}
