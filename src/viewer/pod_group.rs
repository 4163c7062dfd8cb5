//! Pod grouping
//!
//! Pods that share a controller collapse into one graph node. The group id and
//! name are pure functions of the pod's own metadata, so every pod of a
//! controller lands in the same group no matter which one is seen first.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::ResourceExt;
use kube::core::DynamicObject;

use super::error::{CollectorError, CollectorResult};
use crate::models::{ObjectKind, gvk_of};

/// Prefix of every controller-backed pod group id
pub const POD_GROUP_PREFIX: &str = "pods-";

/// Identity of the group a pod belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PodGroup {
    pub id: String,
    pub name: String,
}

/// True when the object is a `v1/Pod`
pub fn is_poolable(object: &DynamicObject) -> bool {
    ObjectKind::of(object) == ObjectKind::Pod
}

/// The owner reference flagged as controller, if any
pub fn controller_of(object: &DynamicObject) -> Option<&OwnerReference> {
    object
        .owner_references()
        .iter()
        .find(|reference| reference.controller == Some(true))
}

/// Group id for a controller uid
pub fn group_id_for(controller_uid: &str) -> String {
    format!("{}{}", POD_GROUP_PREFIX, controller_uid)
}

/// Controller uid encoded in a group id, if the id names a controller-backed group
pub fn controller_uid_of(group_id: &str) -> Option<&str> {
    group_id.strip_prefix(POD_GROUP_PREFIX)
}

/// Resolve the group a pod belongs to
///
/// Controlled pods map to `pods-<controller uid>` / `<controller name> pods`.
/// A pod without a controller is its own singleton group.
pub fn pod_group_of(object: &DynamicObject) -> CollectorResult<PodGroup> {
    if let Some(reference) = controller_of(object) {
        return Ok(PodGroup {
            id: group_id_for(&reference.uid),
            name: format!("{} pods", reference.name),
        });
    }

    Ok(PodGroup {
        id: uid_of(object)?,
        name: name_of(object)?,
    })
}

/// Object uid, required for graph identity
pub fn uid_of(object: &DynamicObject) -> CollectorResult<String> {
    object
        .metadata
        .uid
        .clone()
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| CollectorError::MissingIdentity {
            kind: gvk_of(object).kind,
            field: "uid",
        })
}

/// Object name, required for display
pub fn name_of(object: &DynamicObject) -> CollectorResult<String> {
    object
        .metadata
        .name
        .clone()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| CollectorError::MissingIdentity {
            kind: gvk_of(object).kind,
            field: "name",
        })
}
