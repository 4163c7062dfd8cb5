//! Object sources
//!
//! A graph is built from a flat set of [`DynamicObject`]s, read either from a
//! manifest file or listed from a live namespace.

use std::path::Path;

use anyhow::{Context, Result};
use k8s_openapi::api::apps::v1::{DaemonSet, Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::batch::v1::{CronJob, Job};
use k8s_openapi::api::core::v1::Pod;
use kube::Api;
use kube::api::ListParams;
use kube::core::{ApiResource, DynamicObject, TypeMeta};
use serde::Deserialize;

/// Parse a multi-document YAML (or JSON) manifest into objects
///
/// Empty documents are ignored. `List` documents are flattened into their items.
pub fn parse_manifests(contents: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();

    for (idx, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let value = serde_yaml::Value::deserialize(document)
            .with_context(|| format!("Failed to parse manifest document {}", idx))?;
        if value.is_null() {
            continue;
        }

        let is_list = value
            .get("kind")
            .and_then(|k| k.as_str())
            .is_some_and(|kind| kind == "List" || kind.ends_with("List"));

        if is_list {
            let items = value
                .get("items")
                .and_then(|i| i.as_sequence())
                .cloned()
                .unwrap_or_default();
            for item in items {
                objects.push(to_object(item, idx)?);
            }
        } else {
            objects.push(to_object(value, idx)?);
        }
    }

    tracing::debug!("Parsed {} objects from manifest", objects.len());
    Ok(objects)
}

fn to_object(value: serde_yaml::Value, idx: usize) -> Result<DynamicObject> {
    serde_yaml::from_value(value)
        .with_context(|| format!("Manifest document {} is not a Kubernetes object", idx))
}

/// Read and parse a manifest file
pub fn load_manifest_file(path: &Path) -> Result<Vec<DynamicObject>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;
    parse_manifests(&contents)
        .with_context(|| format!("Failed to parse manifest file: {}", path.display()))
}

/// List workloads and pods of a namespace
///
/// List responses omit per-item type metadata, so it is filled in from the
/// resource the items were listed with.
pub async fn list_namespace_objects(
    client: &kube::Client,
    namespace: &str,
) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();

    macro_rules! list_kind {
        ($type:ty) => {{
            let resource = ApiResource::erase::<$type>(&());
            let api: Api<DynamicObject> =
                Api::namespaced_with(client.clone(), namespace, &resource);
            let list = api
                .list(&ListParams::default())
                .await
                .with_context(|| format!("Failed to list {} in {}", resource.plural, namespace))?;
            tracing::debug!("Listed {} {}", list.items.len(), resource.plural);
            for mut obj in list.items {
                obj.types = Some(TypeMeta {
                    api_version: resource.api_version.clone(),
                    kind: resource.kind.clone(),
                });
                objects.push(obj);
            }
        }};
    }

    list_kind!(Deployment);
    list_kind!(ReplicaSet);
    list_kind!(StatefulSet);
    list_kind!(DaemonSet);
    list_kind!(CronJob);
    list_kind!(Job);
    list_kind!(Pod);

    Ok(objects)
}
