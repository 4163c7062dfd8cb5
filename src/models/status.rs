//! Health status model for graph nodes
//!
//! A status resolver classifies an object into a [`NodeStatus`] and attaches
//! display fragments ([`Detail`]). Pod groups accumulate one summary per member
//! in a [`PodStatus`] whose overall status is the worst member status seen.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Health classification of a node
///
/// Ordered from best to worst: `Ok < Unknown < Warning < Error`.
/// Aggregates use the maximum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Ok,
    Unknown,
    Warning,
    Error,
}

impl NodeStatus {
    /// The worse of two statuses
    pub fn worst(self, other: NodeStatus) -> NodeStatus {
        self.max(other)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Ok => "ok",
            NodeStatus::Unknown => "unknown",
            NodeStatus::Warning => "warning",
            NodeStatus::Error => "error",
        }
    }
}

/// A display fragment attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Detail {
    Text(String),
    Pods(PodStatus),
}

impl Detail {
    pub fn text(text: impl Into<String>) -> Self {
        Detail::Text(text.into())
    }
}

/// Result of resolving an object's health
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectStatus {
    pub status: NodeStatus,
    pub details: Vec<Detail>,
}

impl ObjectStatus {
    pub fn new(status: NodeStatus, details: Vec<Detail>) -> Self {
        Self { status, details }
    }

    pub fn ok() -> Self {
        Self::default()
    }

    /// Add a detail and raise the status to at least `status`
    pub fn add(&mut self, status: NodeStatus, detail: Detail) {
        self.status = self.status.worst(status);
        self.details.push(detail);
    }
}

/// Per-member entry of a pod group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodSummary {
    pub details: Vec<Detail>,
    pub status: NodeStatus,
}

/// Aggregated status of a pod group
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PodStatus {
    /// Member summaries keyed by pod name
    pub summaries: BTreeMap<String, PodSummary>,
    status: NodeStatus,
}

impl PodStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a member's summary. Re-adding a member replaces its entry but
    /// never improves the overall status.
    pub fn add_summary(
        &mut self,
        name: impl Into<String>,
        details: Vec<Detail>,
        status: NodeStatus,
    ) {
        self.summaries.insert(name.into(), PodSummary { details, status });
        self.status = self.status.worst(status);
    }

    /// Overall status: the worst member status recorded so far
    pub fn status(&self) -> NodeStatus {
        self.status
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
