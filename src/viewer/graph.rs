//! Graph view produced by the collector
//!
//! A [`ResourceViewer`] is plain data: nodes keyed by id, edges from parent id
//! to child ids, and the selected node. The rendering layer consumes its JSON form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{Detail, NodeStatus};

/// A node in the resource graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Object name, or the group name for pod groups
    pub name: String,
    pub api_version: String,
    pub kind: String,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Detail>,
    /// Navigable path for the object (pod groups have none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Type of edge between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// Relationship reported by the traversal
    Explicit,
}

/// An outgoing edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub node: String,
    pub edge_type: EdgeType,
}

/// Assembled resource graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceViewer {
    pub title: String,
    pub nodes: BTreeMap<String, Node>,
    pub edges: BTreeMap<String, Vec<Edge>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
}

impl ResourceViewer {
    /// Create an empty viewer
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            selected: None,
        }
    }

    pub fn add_node(&mut self, id: impl Into<String>, node: Node) {
        self.nodes.insert(id.into(), node);
    }

    /// Add an edge. A repeated edge is ignored.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        edge_type: EdgeType,
    ) {
        let to = to.into();
        let edges = self.edges.entry(from.into()).or_default();
        if !edges.iter().any(|edge| edge.node == to) {
            edges.push(Edge { node: to, edge_type });
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected = Some(id.into());
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Child ids of a node, in edge order
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.edges
            .get(id)
            .map(|edges| edges.iter().map(|edge| edge.node.as_str()).collect())
            .unwrap_or_default()
    }

    /// All edges as (from, to) pairs, parents in id order
    pub fn edge_pairs(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, edges)| {
                edges
                    .iter()
                    .map(move |edge| (from.as_str(), edge.node.as_str()))
            })
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }
}
