#![allow(dead_code)]

use kubetopo_api::{
    consts::LABEL_KUSTOMIZE_NAMESPACE,
    graph::{Position, TopologyGraph},
    resource::{
        ConfigMap, Container, Deployment, DeploymentReplicas, HorizontalAutoscaler, Pod,
        ScaleTargetRef, Secret,
    },
};
use maplit::btreemap;

pub const NAMESPACE: &str = "default";

pub fn deployment(name: &str, config_maps: &[&str], secrets: &[&str]) -> Deployment {
    Deployment {
        name: name.into(),
        namespace: NAMESPACE.into(),
        status: "Available".into(),
        replicas: DeploymentReplicas {
            desired: 2,
            ready: 2,
            available: 2,
            unavailable: 0,
        },
        strategy: "RollingUpdate".into(),
        labels: btreemap! { "app".into() => name.into() },
        selector: btreemap! { "app".into() => name.into() },
        config_maps: config_maps.iter().map(|&name| name.into()).collect(),
        secrets: secrets.iter().map(|&name| name.into()).collect(),
    }
}

pub fn pod(name: &str, app: &str, status: &str) -> Pod {
    Pod {
        name: name.into(),
        namespace: NAMESPACE.into(),
        status: status.into(),
        restart_count: 1,
        node_name: "worker-1".into(),
        ip: "10.0.0.7".into(),
        labels: btreemap! { "app".into() => app.into() },
        ..Default::default()
    }
}

pub fn container(name: &str, ready: bool) -> Container {
    Container {
        name: name.into(),
        image: format!("registry.local/{name}:latest"),
        ready,
        restart_count: 0,
    }
}

pub fn config_map(name: &str, scope: Option<&str>) -> ConfigMap {
    ConfigMap {
        name: name.into(),
        namespace: NAMESPACE.into(),
        data: btreemap! {
            "LOG_LEVEL".into() => "info".into(),
            "PORT".into() => "8080".into(),
        },
        labels: scope
            .map(|scope| btreemap! { LABEL_KUSTOMIZE_NAMESPACE.into() => scope.into() })
            .unwrap_or_default(),
    }
}

pub fn secret(name: &str, scope: Option<&str>) -> Secret {
    Secret {
        name: name.into(),
        namespace: NAMESPACE.into(),
        type_: "Opaque".into(),
        keys: vec!["password".into()],
        labels: scope
            .map(|scope| btreemap! { LABEL_KUSTOMIZE_NAMESPACE.into() => scope.into() })
            .unwrap_or_default(),
    }
}

pub fn hpa(name: &str, kind: &str, target: &str) -> HorizontalAutoscaler {
    HorizontalAutoscaler {
        name: name.into(),
        namespace: NAMESPACE.into(),
        target_ref: ScaleTargetRef {
            kind: kind.into(),
            name: target.into(),
        },
        min_replicas: 2,
        max_replicas: 10,
        current_replicas: 3,
        desired_replicas: 3,
        ..Default::default()
    }
}

pub fn position_of(graph: &TopologyGraph, id: &str) -> Position {
    graph
        .node(id)
        .unwrap_or_else(|| panic!("missing node: {id}"))
        .position
}

pub fn node_ids(graph: &TopologyGraph) -> Vec<&str> {
    graph.nodes.iter().map(|node| node.id.as_str()).collect()
}

pub fn edge_ids(graph: &TopologyGraph) -> Vec<&str> {
    graph.edges.iter().map(|edge| edge.id.as_str()).collect()
}

pub fn assert_anchored(graph: &TopologyGraph) {
    let dangling: Vec<_> = graph.dangling_edges().collect();
    assert!(dangling.is_empty(), "dangling edges: {dangling:?}");
}
