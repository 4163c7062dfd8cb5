//! Resource viewer library
//!
//! Builds a dependency graph of cluster objects for visual inspection.
//! A traversal reports objects and parent/child relationships to a
//! [`Collector`](viewer::Collector), which assembles a health-annotated
//! [`ResourceViewer`](viewer::ResourceViewer) graph.

pub mod config;
pub mod kube;
pub mod models;
pub mod services;
pub mod viewer;

// Re-export commonly used types for convenience
pub use models::{Detail, NodeStatus, ObjectStatus, PodStatus};
pub use services::{LinkResolver, StatusResolver};
pub use viewer::{Collector, CollectorError, Processed, ResourceViewer};
