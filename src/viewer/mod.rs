//! Resource viewer graph
//!
//! Builds a dependency graph of cluster objects for visual inspection.
//! The [`Collector`] accumulates nodes and edges reported by a traversal,
//! pooling pods per controller, and assembles them into a [`ResourceViewer`].

mod collector;
mod error;
mod graph;
mod pod_group;
mod walk;

pub use collector::{Collector, CollectorBuilder, Processed, VIEWER_TITLE};
pub use error::{CollectorError, CollectorResult};
pub use graph::{Edge, EdgeType, Node, ResourceViewer};
pub use pod_group::{
    POD_GROUP_PREFIX, PodGroup, controller_of, controller_uid_of, group_id_for, is_poolable,
    pod_group_of,
};
pub use walk::{WalkReport, find_object, related_objects, walk};
