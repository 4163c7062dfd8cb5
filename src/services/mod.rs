//! Collaborators of the collector
//!
//! Status and link resolution sit behind traits so callers can plug in their
//! own cluster-backed implementations. The defaults here work from the
//! object payload alone.

pub mod link;
pub mod status;

pub use link::{LinkResolver, PathLinker};
pub use status::{ConditionStatusResolver, StatusResolver, status_from_value};
