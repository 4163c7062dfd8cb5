//! Resource graph collector
//!
//! The traversal engine calls [`Collector::process`] once per discovered object
//! and [`Collector::add_child`] once per discovered parent/children relationship,
//! in any order and from any number of tasks. When the traversal is done,
//! [`Collector::component`] assembles the nodes and edges into a [`ResourceViewer`].
//!
//! Pods are pooled into one node per controller when grouping is enabled.
//! Each group keeps a [`PodStatus`] with one summary per member pod.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use k8s_openapi::api::apps::v1::ReplicaSet;
use kube::core::DynamicObject;
use tokio::sync::Mutex;

use super::error::{CollectorError, CollectorResult};
use super::graph::{EdgeType, Node, ResourceViewer};
use super::pod_group::{
    controller_of, controller_uid_of, is_poolable, name_of, pod_group_of, uid_of,
};
use crate::config::ViewerConfig;
use crate::models::{
    Detail, NodeStatus, ObjectKind, PodStatus, api_version_of, describe_gvk, gvk_of,
};
use crate::services::{LinkResolver, StatusResolver};

/// Title of the assembled graph
pub const VIEWER_TITLE: &str = "Resource Viewer";

/// Outcome of a successful [`Collector::process`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processed {
    /// The object is represented by the node with this id
    /// (a pod group id for pooled pods)
    Registered(String),
    /// The object is intentionally left out of the graph
    Skipped,
}

/// Node built for a single object, before it is merged into the working set
enum NodeOutcome {
    Object { id: String, node: Node },
    Group { id: String, node: Node },
    Skip,
}

/// Working set of one collection pass
#[derive(Debug, Default)]
struct CollectorState {
    nodes: HashMap<String, Node>,
    /// Parent id to child ids, in insertion order, without repeats
    edges: HashMap<String, Vec<String>>,
    /// Pod uid to the group id it was pooled into
    pod_group_ids: HashMap<String, String>,
    /// Controller uid to the number of controlled pods processed
    pod_stats: HashMap<String, usize>,
    /// Group id to the accumulated member statuses
    pod_nodes: HashMap<String, PodStatus>,
}

/// Collects cluster objects into a resource graph
///
/// All mutation happens behind a single lock held for the whole of each
/// `process`/`add_child` call, including the awaits on the status resolver.
pub struct Collector {
    status: Arc<dyn StatusResolver>,
    link: Arc<dyn LinkResolver>,
    group_pods: bool,
    state: Mutex<CollectorState>,
}

/// Builder for [`Collector`]
pub struct CollectorBuilder {
    status: Arc<dyn StatusResolver>,
    link: Arc<dyn LinkResolver>,
    group_pods: bool,
}

impl CollectorBuilder {
    /// Pool pods into one node per controller (default: enabled)
    pub fn group_pods(mut self, enabled: bool) -> Self {
        self.group_pods = enabled;
        self
    }

    pub fn build(self) -> Collector {
        Collector {
            status: self.status,
            link: self.link,
            group_pods: self.group_pods,
            state: Mutex::new(CollectorState::default()),
        }
    }
}

impl Collector {
    /// Create a collector with pod grouping enabled
    pub fn new(status: Arc<dyn StatusResolver>, link: Arc<dyn LinkResolver>) -> Self {
        Self::builder(status, link).build()
    }

    pub fn builder(
        status: Arc<dyn StatusResolver>,
        link: Arc<dyn LinkResolver>,
    ) -> CollectorBuilder {
        CollectorBuilder {
            status,
            link,
            group_pods: true,
        }
    }

    /// Create a collector from the `viewer` configuration section
    pub fn from_config(
        config: &ViewerConfig,
        status: Arc<dyn StatusResolver>,
        link: Arc<dyn LinkResolver>,
    ) -> Self {
        Self::builder(status, link)
            .group_pods(config.group_pods)
            .build()
    }

    /// Whether pods are pooled into groups
    pub fn groups_pods(&self) -> bool {
        self.group_pods
    }

    /// Discard all nodes, edges and pod group state
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        *state = CollectorState::default();
    }

    /// Register a node for an object
    ///
    /// The first node registered for an id wins; later observations of the
    /// same object leave it untouched. Pod group nodes are the exception: every
    /// member pod refreshes its group's node with the current aggregate.
    pub async fn process(&self, object: &DynamicObject) -> CollectorResult<Processed> {
        let mut state = self.state.lock().await;

        let outcome = if self.group_pods && is_poolable(object) {
            if let Some(reference) = controller_of(object) {
                *state.pod_stats.entry(reference.uid.clone()).or_default() += 1;
            }
            self.pod_group_node(&mut state, object).await
        } else {
            self.object_node(object).await
        };

        let outcome = outcome.map_err(|source| CollectorError::Processing {
            gvk: describe_gvk(&gvk_of(object)),
            name: object.metadata.name.clone(),
            source: Box::new(source),
        })?;

        match outcome {
            NodeOutcome::Skip => {
                tracing::debug!(
                    "Skipping {} {}",
                    gvk_of(object).kind,
                    object.metadata.name.as_deref().unwrap_or_default()
                );
                Ok(Processed::Skipped)
            }
            NodeOutcome::Group { id, node } => {
                state.nodes.insert(id.clone(), node);
                Ok(Processed::Registered(id))
            }
            NodeOutcome::Object { id, node } => {
                if !state.nodes.contains_key(&id) {
                    tracing::debug!("Registered node {} ({} {})", id, node.kind, node.name);
                    state.nodes.insert(id.clone(), node);
                }
                Ok(Processed::Registered(id))
            }
        }
    }

    async fn pod_group_node(
        &self,
        state: &mut CollectorState,
        object: &DynamicObject,
    ) -> CollectorResult<NodeOutcome> {
        let group = pod_group_of(object)?;
        let uid = uid_of(object)?;
        let name = name_of(object)?;

        // Grouped pods must not hide a member's real health, so this is fatal
        let status = self
            .status
            .status(object)
            .await
            .map_err(|source| CollectorError::Status {
                name: name.clone(),
                source,
            })?;

        let pod_status = state.pod_nodes.entry(group.id.clone()).or_default();
        pod_status.add_summary(name, status.details, status.status);

        let gvk = gvk_of(object);
        let node = Node {
            name: group.name,
            api_version: api_version_of(&gvk),
            kind: gvk.kind,
            status: pod_status.status(),
            details: vec![Detail::Pods(pod_status.clone())],
            path: None,
        };

        state.pod_group_ids.insert(uid, group.id.clone());

        Ok(NodeOutcome::Group { id: group.id, node })
    }

    async fn object_node(&self, object: &DynamicObject) -> CollectorResult<NodeOutcome> {
        let gvk = gvk_of(object);

        if ObjectKind::from_gvk(&gvk) == ObjectKind::ReplicaSet {
            match desired_replicas(object)? {
                Some(replicas) if replicas >= 1 => {}
                _ => return Ok(NodeOutcome::Skip),
            }
        }

        let uid = uid_of(object)?;
        let name = name_of(object)?;

        let (status, details) = match self.status.status(object).await {
            Ok(status) => (status.status, status.details),
            Err(err) => {
                tracing::error!("error retrieving object status for {}: {:#}", name, err);
                (NodeStatus::Ok, Vec::new())
            }
        };

        let path = self
            .link
            .path_for(object, &name, &[])
            .map_err(|source| CollectorError::Link {
                name: name.clone(),
                source,
            })?;

        let node = Node {
            name,
            api_version: api_version_of(&gvk),
            kind: gvk.kind,
            status,
            details,
            path: Some(path),
        };

        Ok(NodeOutcome::Object { id: uid, node })
    }

    /// Record edges from `parent` to each child
    ///
    /// Pods are replaced by their group when grouping is enabled. Edges are
    /// appended one child at a time; if a child's identity cannot be read the
    /// call fails and edges added for earlier children remain.
    pub async fn add_child<'a, I>(
        &self,
        parent: &DynamicObject,
        children: I,
    ) -> CollectorResult<()>
    where
        I: IntoIterator<Item = &'a DynamicObject>,
    {
        let mut state = self.state.lock().await;

        let parent_id = uid_of(parent)?;

        for child in children {
            let child_id = if self.group_pods && is_poolable(child) {
                pod_group_of(child)?.id
            } else {
                uid_of(child)?
            };

            let edges = state.edges.entry(parent_id.clone()).or_default();
            if !edges.contains(&child_id) {
                edges.push(child_id);
            }
        }

        Ok(())
    }

    /// Assemble the collected nodes and edges into a graph
    ///
    /// Edges touching ids that never became nodes are dropped. A selected
    /// pod that was pooled into a group selects the group instead.
    pub async fn component(&self, selected: &str) -> ResourceViewer {
        let (mut nodes, edges, pod_stats, selected) = {
            let state = self.state.lock().await;
            let selected = state
                .pod_group_ids
                .get(selected)
                .cloned()
                .unwrap_or_else(|| selected.to_string());
            (
                state.nodes.clone(),
                state.edges.clone(),
                state.pod_stats.clone(),
                selected,
            )
        };

        for (id, node) in nodes.iter_mut() {
            if let Some(owner_uid) = controller_uid_of(id) {
                let count = pod_stats.get(owner_uid).copied().unwrap_or(0);
                node.details.push(Detail::Text(format!("Pod count: {}", count)));
            }
        }

        let mut viewer = ResourceViewer::new(VIEWER_TITLE);
        let nodes: BTreeMap<String, Node> = nodes.into_iter().collect();

        for (parent, mut children) in edges {
            if !nodes.contains_key(&parent) {
                continue;
            }
            children.sort();
            for child in children {
                if nodes.contains_key(&child) {
                    viewer.add_edge(parent.as_str(), child, EdgeType::Explicit);
                }
            }
        }

        viewer.nodes = nodes;
        viewer.select(selected);
        viewer
    }
}

/// Desired replica count of a replica set
fn desired_replicas(object: &DynamicObject) -> CollectorResult<Option<i32>> {
    let mut value = serde_json::to_value(object).map_err(|source| CollectorError::Conversion {
        target: "ReplicaSet",
        source,
    })?;

    // extensions/v1beta1 replica sets share the apps/v1 shape
    if let Some(map) = value.as_object_mut() {
        map.insert(
            "apiVersion".to_string(),
            serde_json::Value::String("apps/v1".to_string()),
        );
    }

    let replica_set: ReplicaSet =
        serde_json::from_value(value).map_err(|source| CollectorError::Conversion {
            target: "ReplicaSet",
            source,
        })?;

    Ok(replica_set.spec.and_then(|spec| spec.replicas))
}
