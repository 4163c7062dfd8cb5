//! Object status resolution
//!
//! The collector asks a [`StatusResolver`] for every object it turns into a
//! node. Resolvers may query the cluster or a cache, so the call is async and
//! fallible; the collector decides how to treat a failure.

use anyhow::Result;
use async_trait::async_trait;
use kube::core::DynamicObject;
use serde_json::Value;

use crate::models::{Detail, NodeStatus, ObjectKind, ObjectStatus};

/// Resolves an object's health classification and display details
#[async_trait]
pub trait StatusResolver: Send + Sync {
    async fn status(&self, object: &DynamicObject) -> Result<ObjectStatus>;
}

/// Status resolver that reads the object's own `status` block
///
/// Works on the object as delivered, without further API calls:
/// - Pods: `status.phase` and waiting container reasons
/// - Workloads: desired `spec.replicas` against `status.availableReplicas`
/// - Everything: `Ready` / `Available` conditions
#[derive(Debug, Clone, Default)]
pub struct ConditionStatusResolver;

impl ConditionStatusResolver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatusResolver for ConditionStatusResolver {
    async fn status(&self, object: &DynamicObject) -> Result<ObjectStatus> {
        Ok(status_from_value(ObjectKind::of(object), &object.data))
    }
}

/// Classify an object from its `spec`/`status` payload
pub fn status_from_value(kind: ObjectKind, data: &Value) -> ObjectStatus {
    let mut result = ObjectStatus::ok();

    if kind == ObjectKind::Pod {
        pod_phase(data, &mut result);
        waiting_containers(data, &mut result);
    } else {
        replica_availability(data, &mut result);
    }

    conditions(data, &mut result);
    result
}

fn pod_phase(data: &Value, result: &mut ObjectStatus) {
    let phase = data
        .get("status")
        .and_then(|s| s.get("phase"))
        .and_then(|p| p.as_str());

    let (status, text) = match phase {
        Some("Running") => (NodeStatus::Ok, "Pod is running".to_string()),
        Some("Succeeded") => (NodeStatus::Ok, "Pod has completed".to_string()),
        Some("Pending") => (NodeStatus::Warning, "Pod is pending".to_string()),
        Some("Failed") => (NodeStatus::Error, "Pod has failed".to_string()),
        Some(other) => (NodeStatus::Unknown, format!("Pod phase is {}", other)),
        None => (NodeStatus::Unknown, "Pod phase is not reported".to_string()),
    };

    result.add(status, Detail::Text(text));
}

fn waiting_containers(data: &Value, result: &mut ObjectStatus) {
    let Some(container_statuses) = data
        .get("status")
        .and_then(|s| s.get("containerStatuses"))
        .and_then(|c| c.as_array())
    else {
        return;
    };

    for container in container_statuses {
        let name = container
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("container");
        if let Some(reason) = container
            .get("state")
            .and_then(|s| s.get("waiting"))
            .and_then(|w| w.get("reason"))
            .and_then(|r| r.as_str())
        {
            result.add(
                NodeStatus::Error,
                Detail::Text(format!("Container {} is waiting: {}", name, reason)),
            );
        }
    }
}

fn replica_availability(data: &Value, result: &mut ObjectStatus) {
    let Some(desired) = data
        .get("spec")
        .and_then(|s| s.get("replicas"))
        .and_then(|r| r.as_i64())
    else {
        return;
    };

    let available = data
        .get("status")
        .and_then(|s| s.get("availableReplicas"))
        .and_then(|r| r.as_i64())
        .unwrap_or(0);

    if available < desired {
        result.add(
            NodeStatus::Warning,
            Detail::Text(format!(
                "Expected {} replicas, but {} are available",
                desired, available
            )),
        );
    }
}

fn conditions(data: &Value, result: &mut ObjectStatus) {
    let Some(conditions) = data
        .get("status")
        .and_then(|s| s.get("conditions"))
        .and_then(|c| c.as_array())
    else {
        return;
    };

    for condition in conditions {
        let type_val = condition.get("type").and_then(|t| t.as_str());
        if !matches!(type_val, Some("Ready") | Some("Available")) {
            continue;
        }

        let status_val = condition.get("status").and_then(|s| s.as_str());
        let message = condition
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| condition.get("reason").and_then(|r| r.as_str()));

        let status = match status_val {
            Some("True") => continue,
            Some("False") => NodeStatus::Error,
            _ => NodeStatus::Unknown,
        };

        let label = format!(
            "{} is {}",
            type_val.unwrap_or_default(),
            status_val.unwrap_or("Unknown")
        );
        let text = match message {
            Some(msg) => format!("{}: {}", label, msg),
            None => label,
        };
        result.add(status, Detail::Text(text));
    }
}
