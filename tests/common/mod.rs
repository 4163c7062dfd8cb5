//! Shared fixtures for collector tests
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::core::{ApiResource, DynamicObject, GroupVersionKind};
use serde_json::json;

use resource_viewer::models::object_kind::split_api_version;
use resource_viewer::services::{ConditionStatusResolver, PathLinker};
use resource_viewer::{Collector, Detail, NodeStatus, ObjectStatus, StatusResolver};

pub const NAMESPACE: &str = "default";

/// Bare object with type metadata, name, namespace and uid
pub fn object(api_version: &str, kind: &str, name: &str, uid: &str) -> DynamicObject {
    let (group, version) = split_api_version(api_version);
    let resource = ApiResource::from_gvk(&GroupVersionKind::gvk(group, version, kind));
    let mut obj = DynamicObject::new(name, &resource).within(NAMESPACE);
    obj.metadata.uid = Some(uid.to_string());
    obj
}

/// Add an owner reference to `owner`, flagged as controller
pub fn controlled_by(mut obj: DynamicObject, owner: &DynamicObject) -> DynamicObject {
    let (api_version, kind) = owner
        .types
        .as_ref()
        .map(|t| (t.api_version.clone(), t.kind.clone()))
        .unwrap_or_default();
    let reference = OwnerReference {
        api_version,
        kind,
        name: owner.metadata.name.clone().unwrap_or_default(),
        uid: owner.metadata.uid.clone().unwrap_or_default(),
        controller: Some(true),
        ..Default::default()
    };
    obj.metadata
        .owner_references
        .get_or_insert_with(Vec::new)
        .push(reference);
    obj
}

pub fn deployment(name: &str, uid: &str) -> DynamicObject {
    let mut obj = object("apps/v1", "Deployment", name, uid);
    obj.data = json!({
        "spec": {
            "replicas": 2,
            "selector": { "matchLabels": { "app": name } }
        },
        "status": { "availableReplicas": 2 }
    });
    obj
}

pub fn replica_set(name: &str, uid: &str, replicas: Option<i32>) -> DynamicObject {
    let mut obj = object("apps/v1", "ReplicaSet", name, uid);
    let mut spec = json!({ "selector": { "matchLabels": { "app": name } } });
    if let Some(replicas) = replicas {
        spec["replicas"] = json!(replicas);
    }
    obj.data = json!({
        "spec": spec,
        "status": {
            "replicas": replicas.unwrap_or(0),
            "availableReplicas": replicas.unwrap_or(0)
        }
    });
    obj
}

pub fn pod(name: &str, uid: &str) -> DynamicObject {
    pod_in_phase(name, uid, "Running")
}

pub fn pod_in_phase(name: &str, uid: &str, phase: &str) -> DynamicObject {
    let mut obj = object("v1", "Pod", name, uid);
    obj.data = json!({ "status": { "phase": phase } });
    obj
}

/// Collector backed by the payload-only status resolver
pub fn collector(group_pods: bool) -> Collector {
    Collector::builder(
        Arc::new(ConditionStatusResolver::new()),
        Arc::new(PathLinker::default()),
    )
    .group_pods(group_pods)
    .build()
}

/// Status resolver that reports which call it is answering
#[derive(Default)]
pub struct CountingStatus {
    calls: AtomicUsize,
}

impl CountingStatus {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusResolver for CountingStatus {
    async fn status(&self, _object: &DynamicObject) -> anyhow::Result<ObjectStatus> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ObjectStatus::new(
            NodeStatus::Ok,
            vec![Detail::text(format!("call {}", call))],
        ))
    }
}

/// Deployment d1 -> ReplicaSet r1 -> Pods p1, p2
pub struct Scenario {
    pub deployment: DynamicObject,
    pub replica_set: DynamicObject,
    pub pods: Vec<DynamicObject>,
}

pub fn scenario() -> Scenario {
    let deployment = deployment("web", "d1");
    let replica_set = controlled_by(replica_set("web-7d4b9", "r1", Some(2)), &deployment);
    let pods = vec![
        controlled_by(pod("web-7d4b9-abcde", "p1"), &replica_set),
        controlled_by(pod("web-7d4b9-fghij", "p2"), &replica_set),
    ];
    Scenario {
        deployment,
        replica_set,
        pods,
    }
}
