//! Owner-reference walker
//!
//! A minimal traversal that feeds a [`Collector`] from a flat set of objects:
//! every object is processed, and every owner gets an edge to each object that
//! references it. Objects are processed concurrently; the collector serializes
//! the actual mutation.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use futures::future::join_all;
use kube::ResourceExt;
use kube::core::DynamicObject;

use super::collector::{Collector, Processed};

/// Summary of a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkReport {
    pub registered: usize,
    pub skipped: usize,
    /// Objects or relationships that returned an error
    pub failed: usize,
}

/// Objects connected to `root` through owner references, in either direction
///
/// The root itself is included. Returns an empty set if no object has that uid.
pub fn related_objects<'a>(
    objects: &'a [DynamicObject],
    root: &str,
) -> Vec<&'a DynamicObject> {
    let by_uid: HashMap<&str, &DynamicObject> = objects
        .iter()
        .filter_map(|obj| obj.metadata.uid.as_deref().map(|uid| (uid, obj)))
        .collect();

    if !by_uid.contains_key(root) {
        return Vec::new();
    }

    // Undirected adjacency over owner references
    let mut adjacent: HashMap<&str, Vec<&str>> = HashMap::new();
    for obj in objects {
        let Some(uid) = obj.metadata.uid.as_deref() else {
            continue;
        };
        for owner in obj.owner_references() {
            if by_uid.contains_key(owner.uid.as_str()) {
                adjacent.entry(uid).or_default().push(owner.uid.as_str());
                adjacent.entry(owner.uid.as_str()).or_default().push(uid);
            }
        }
    }

    let mut seen: HashSet<&str> = HashSet::from([root]);
    let mut queue: VecDeque<&str> = VecDeque::from([root]);
    while let Some(uid) = queue.pop_front() {
        for &next in adjacent.get(uid).into_iter().flatten() {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }

    objects
        .iter()
        .filter(|obj| {
            obj.metadata
                .uid
                .as_deref()
                .is_some_and(|uid| seen.contains(uid))
        })
        .collect()
}

/// Find an object by uid, falling back to name
pub fn find_object<'a>(
    objects: &'a [DynamicObject],
    selector: &str,
) -> Option<&'a DynamicObject> {
    objects
        .iter()
        .find(|obj| obj.metadata.uid.as_deref() == Some(selector))
        .or_else(|| {
            objects
                .iter()
                .find(|obj| obj.metadata.name.as_deref() == Some(selector))
        })
}

/// Feed objects and their owner relationships into a collector
///
/// Errors are logged and counted; the walk continues with the other objects.
pub async fn walk(collector: &Collector, objects: &[&DynamicObject]) -> WalkReport {
    let mut report = WalkReport::default();

    let results = join_all(objects.iter().map(|obj| collector.process(obj))).await;
    for (obj, result) in objects.iter().zip(results) {
        match result {
            Ok(Processed::Registered(_)) => report.registered += 1,
            Ok(Processed::Skipped) => report.skipped += 1,
            Err(err) => {
                tracing::warn!(
                    "Failed to process {}: {:#}",
                    obj.name_any(),
                    anyhow::Error::new(err)
                );
                report.failed += 1;
            }
        }
    }

    let by_uid: HashMap<&str, &DynamicObject> = objects
        .iter()
        .filter_map(|obj| obj.metadata.uid.as_deref().map(|uid| (uid, *obj)))
        .collect();

    let mut children: BTreeMap<&str, Vec<&DynamicObject>> = BTreeMap::new();
    for obj in objects {
        for owner in obj.owner_references() {
            if by_uid.contains_key(owner.uid.as_str()) {
                children.entry(owner.uid.as_str()).or_default().push(*obj);
            }
        }
    }

    let edge_results = join_all(
        children
            .iter()
            .map(|(owner, kids)| collector.add_child(by_uid[owner], kids.iter().copied())),
    )
    .await;
    for ((owner, _), result) in children.iter().zip(edge_results) {
        if let Err(err) = result {
            tracing::warn!(
                "Failed to add children of {}: {:#}",
                owner,
                anyhow::Error::new(err)
            );
            report.failed += 1;
        }
    }

    report
}
