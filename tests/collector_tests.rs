//! Collector tests
//!
//! Node registration, pod grouping, edge recording and resets.

mod common;

use std::sync::Arc;

use common::{
    CountingStatus, collector, controlled_by, deployment, object, pod, pod_in_phase, replica_set,
};
use resource_viewer::services::PathLinker;
use resource_viewer::viewer::CollectorError;
use resource_viewer::{Collector, Detail, NodeStatus, Processed};

#[tokio::test]
async fn test_duplicate_object_keeps_first_node() {
    let status = Arc::new(CountingStatus::default());
    let collector = Collector::new(status.clone(), Arc::new(PathLinker::default()));
    let web = deployment("web", "d1");

    assert_eq!(
        collector.process(&web).await.unwrap(),
        Processed::Registered("d1".to_string())
    );
    assert_eq!(
        collector.process(&web).await.unwrap(),
        Processed::Registered("d1".to_string())
    );

    let viewer = collector.component("d1").await;
    assert_eq!(viewer.nodes.len(), 1);
    let node = viewer.node("d1").unwrap();
    assert_eq!(node.details, vec![Detail::text("call 1")]);
    assert_eq!(node.name, "web");
    assert_eq!(node.api_version, "apps/v1");
    assert_eq!(node.kind, "Deployment");
    assert_eq!(
        node.path.as_deref(),
        Some("/overview/namespace/default/deployments/web")
    );
    assert_eq!(status.calls(), 2);
}

#[tokio::test]
async fn test_pods_collapse_into_one_group_node() {
    let collector = collector(true);
    let rs = replica_set("web-7d4b9", "r1", Some(3));
    let pods: Vec<_> = (0..3)
        .map(|i| controlled_by(pod(&format!("web-7d4b9-{}", i), &format!("p{}", i)), &rs))
        .collect();

    for p in &pods {
        assert_eq!(
            collector.process(p).await.unwrap(),
            Processed::Registered("pods-r1".to_string())
        );
    }

    let viewer = collector.component("").await;
    assert_eq!(viewer.nodes.len(), 1);

    let group = viewer.node("pods-r1").unwrap();
    assert_eq!(group.name, "web-7d4b9 pods");
    assert_eq!(group.kind, "Pod");
    assert_eq!(group.path, None);

    let Detail::Pods(members) = &group.details[0] else {
        panic!("expected pod summary, got {:?}", group.details[0]);
    };
    assert_eq!(members.len(), 3);
    assert!(members.summaries.contains_key("web-7d4b9-0"));
    assert_eq!(group.details.last(), Some(&Detail::text("Pod count: 3")));
}

#[tokio::test]
async fn test_group_status_is_worst_member() {
    let collector = collector(true);
    let rs = replica_set("web-7d4b9", "r1", Some(3));

    collector
        .process(&controlled_by(pod_in_phase("a", "p1", "Running"), &rs))
        .await
        .unwrap();
    collector
        .process(&controlled_by(pod_in_phase("b", "p2", "Failed"), &rs))
        .await
        .unwrap();
    collector
        .process(&controlled_by(pod_in_phase("c", "p3", "Pending"), &rs))
        .await
        .unwrap();

    let viewer = collector.component("").await;
    let group = viewer.node("pods-r1").unwrap();
    assert_eq!(group.status, NodeStatus::Error);

    let Detail::Pods(members) = &group.details[0] else {
        panic!("expected pod summary");
    };
    assert_eq!(members.summaries["a"].status, NodeStatus::Ok);
    assert_eq!(members.summaries["b"].status, NodeStatus::Error);
    assert_eq!(members.summaries["c"].status, NodeStatus::Warning);
}

#[tokio::test]
async fn test_pod_count_counts_repeated_observations() {
    let collector = collector(true);
    let rs = replica_set("web-7d4b9", "r1", Some(1));
    let member = controlled_by(pod("web-7d4b9-a", "p1"), &rs);

    collector.process(&member).await.unwrap();
    collector.process(&member).await.unwrap();

    let viewer = collector.component("").await;
    let group = viewer.node("pods-r1").unwrap();
    let Detail::Pods(members) = &group.details[0] else {
        panic!("expected pod summary");
    };
    assert_eq!(members.len(), 1);
    assert_eq!(group.details.last(), Some(&Detail::text("Pod count: 2")));
}

#[tokio::test]
async fn test_grouping_disabled_keeps_pods_separate() {
    let collector = collector(false);
    let rs = replica_set("web-7d4b9", "r1", Some(2));
    let a = controlled_by(pod("web-7d4b9-a", "p1"), &rs);
    let b = controlled_by(pod("web-7d4b9-b", "p2"), &rs);

    collector.process(&rs).await.unwrap();
    collector.process(&a).await.unwrap();
    collector.process(&b).await.unwrap();
    collector.add_child(&rs, [&a, &b]).await.unwrap();

    let viewer = collector.component("p1").await;
    assert_eq!(viewer.nodes.len(), 3);
    assert_eq!(viewer.children("r1"), vec!["p1", "p2"]);
    assert_eq!(viewer.selected.as_deref(), Some("p1"));
    assert_eq!(
        viewer.node("p1").unwrap().path.as_deref(),
        Some("/overview/namespace/default/pods/web-7d4b9-a")
    );
}

#[tokio::test]
async fn test_ownerless_pod_is_its_own_group() {
    let collector = collector(true);
    let standalone = pod("debug-shell", "p9");

    assert_eq!(
        collector.process(&standalone).await.unwrap(),
        Processed::Registered("p9".to_string())
    );

    let viewer = collector.component("p9").await;
    let node = viewer.node("p9").unwrap();
    assert_eq!(node.name, "debug-shell");
    assert_eq!(node.details.len(), 1);
    assert!(matches!(node.details[0], Detail::Pods(_)));
    assert_eq!(viewer.selected.as_deref(), Some("p9"));
}

#[tokio::test]
async fn test_replica_set_without_replicas_is_skipped() {
    let collector = collector(true);

    let zero = replica_set("web-old", "r0", Some(0));
    let unset = replica_set("web-unset", "r9", None);

    assert_eq!(collector.process(&zero).await.unwrap(), Processed::Skipped);
    assert_eq!(collector.process(&unset).await.unwrap(), Processed::Skipped);

    let viewer = collector.component("").await;
    assert!(viewer.nodes.is_empty());
}

#[tokio::test]
async fn test_extensions_replica_set_is_checked() {
    let collector = collector(true);
    let mut legacy = replica_set("web-legacy", "r2", Some(0));
    if let Some(types) = legacy.types.as_mut() {
        types.api_version = "extensions/v1beta1".to_string();
    }

    assert_eq!(collector.process(&legacy).await.unwrap(), Processed::Skipped);
}

#[tokio::test]
async fn test_unconvertible_replica_set_fails() {
    let collector = collector(true);
    let mut broken = replica_set("web-broken", "r3", Some(1));
    broken.data["spec"]["replicas"] = serde_json::json!("two");

    let err = collector.process(&broken).await.unwrap_err();
    assert!(matches!(
        err.root(),
        CollectorError::Conversion {
            target: "ReplicaSet",
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "processing apps/v1, Kind=ReplicaSet web-broken"
    );
}

#[tokio::test]
async fn test_object_without_uid_fails() {
    let collector = collector(true);
    let mut nameless = object("v1", "ConfigMap", "settings", "c1");
    nameless.metadata.uid = None;

    let err = collector.process(&nameless).await.unwrap_err();
    assert!(matches!(
        err.root(),
        CollectorError::MissingIdentity { field: "uid", .. }
    ));
}

#[tokio::test]
async fn test_add_child_collapses_duplicates() {
    let collector = collector(true);
    let parent = deployment("web", "d1");
    let c1 = object("v1", "ConfigMap", "settings", "c1");
    let c2 = object("v1", "Secret", "credentials", "c2");

    for obj in [&parent, &c1, &c2] {
        collector.process(obj).await.unwrap();
    }
    collector.add_child(&parent, [&c1, &c2, &c1]).await.unwrap();
    collector.add_child(&parent, [&c2]).await.unwrap();

    let viewer = collector.component("d1").await;
    assert_eq!(viewer.edge_count(), 2);
    assert_eq!(viewer.children("d1"), vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_add_child_keeps_edges_before_failing_child() {
    let collector = collector(true);
    let parent = deployment("web", "d1");
    let good = object("v1", "ConfigMap", "settings", "c1");
    let mut bad = object("v1", "Secret", "credentials", "c2");
    bad.metadata.uid = None;
    let after = object("v1", "Service", "web", "s1");

    for obj in [&parent, &good, &after] {
        collector.process(obj).await.unwrap();
    }

    let err = collector
        .add_child(&parent, [&good, &bad, &after])
        .await
        .unwrap_err();
    assert!(matches!(err, CollectorError::MissingIdentity { .. }));

    let viewer = collector.component("d1").await;
    assert_eq!(viewer.children("d1"), vec!["c1"]);
}

#[tokio::test]
async fn test_add_child_with_unreadable_parent_adds_nothing() {
    let collector = collector(true);
    let mut parent = deployment("web", "d1");
    parent.metadata.uid = None;
    let child = object("v1", "ConfigMap", "settings", "c1");

    assert!(collector.add_child(&parent, [&child]).await.is_err());
    collector.process(&child).await.unwrap();

    let viewer = collector.component("").await;
    assert_eq!(viewer.edge_count(), 0);
}

#[tokio::test]
async fn test_reset_discards_everything() {
    let collector = collector(true);
    let rs = replica_set("web-7d4b9", "r1", Some(1));
    let member = controlled_by(pod("web-7d4b9-a", "p1"), &rs);

    collector.process(&rs).await.unwrap();
    collector.process(&member).await.unwrap();
    collector.add_child(&rs, [&member]).await.unwrap();

    collector.reset().await;

    let viewer = collector.component("p1").await;
    assert!(viewer.nodes.is_empty());
    assert!(viewer.edges.is_empty());
    assert_eq!(viewer.selected.as_deref(), Some("p1"));

    // Group state starts over as well
    collector.process(&member).await.unwrap();
    let viewer = collector.component("").await;
    let group = viewer.node("pods-r1").unwrap();
    let Detail::Pods(members) = &group.details[0] else {
        panic!("expected pod summary");
    };
    assert_eq!(members.len(), 1);
    assert_eq!(group.details.last(), Some(&Detail::text("Pod count: 1")));
}

#[tokio::test]
async fn test_concurrent_processing_converges() {
    let collector = Arc::new(collector(true));
    let rs = replica_set("web-7d4b9", "r1", Some(40));
    let pods: Vec<_> = (0..40)
        .map(|i| controlled_by(pod(&format!("web-7d4b9-{}", i), &format!("p{}", i)), &rs))
        .collect();

    let mut handles = Vec::new();
    for p in pods.clone() {
        let collector = collector.clone();
        let rs = rs.clone();
        handles.push(tokio::spawn(async move {
            collector.process(&p).await.unwrap();
            collector.process(&rs).await.unwrap();
            collector.add_child(&rs, [&p]).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let viewer = collector.component("p7").await;
    assert_eq!(viewer.nodes.len(), 2);
    assert_eq!(viewer.children("r1"), vec!["pods-r1"]);
    assert_eq!(viewer.selected.as_deref(), Some("pods-r1"));

    let group = viewer.node("pods-r1").unwrap();
    let Detail::Pods(members) = &group.details[0] else {
        panic!("expected pod summary");
    };
    assert_eq!(members.len(), 40);
    assert_eq!(group.details.last(), Some(&Detail::text("Pod count: 40")));
}
