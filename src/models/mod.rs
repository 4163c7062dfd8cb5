//! Model layer for the resource viewer
//!
//! - `object_kind.rs` - Kind dispatch for cluster objects
//! - `status.rs` - Health status and display fragments

pub mod object_kind;
pub mod status;

pub use object_kind::{ObjectKind, api_version_of, describe_gvk, gvk_of, plural_of};
pub use status::{Detail, NodeStatus, ObjectStatus, PodStatus, PodSummary};
