use kubetopo_api::{
    graph::{TopologyEdge, TopologyGraph, TopologyNode, TopologyNodeData},
    resource::{ConfigMap, Pod, ResourceType, Secret},
};
use tracing::{debug, instrument, Level};

use crate::layout::PodLayout;

/// Builds the graph of a single pod, its configuration and its containers.
pub fn build_pod_topology(
    pod: &Pod,
    config_maps: &[ConfigMap],
    secrets: &[Secret],
) -> TopologyGraph {
    build_pod_topology_with_layout(&PodLayout::default(), pod, config_maps, secrets)
}

#[instrument(level = Level::DEBUG, skip_all, fields(pod = %pod.name))]
pub fn build_pod_topology_with_layout(
    layout: &PodLayout,
    pod: &Pod,
    config_maps: &[ConfigMap],
    secrets: &[Secret],
) -> TopologyGraph {
    let mut graph = TopologyGraph::default();

    let pod_node = TopologyNode::from_resource(pod, layout.pod).with_details([
        ("node", pod.node_name.clone()),
        ("ip", pod.ip.clone()),
        ("restarts", pod.restart_count.to_string()),
    ]);
    let pod_id = pod_node.id.clone();
    graph.add_node(pod_node);

    for (index, config_map) in config_maps.iter().enumerate() {
        let node = TopologyNode::from_resource(config_map, layout.configs.place(index));
        let edge = TopologyEdge::new(&node.id, &pod_id, false);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    for (index, secret) in secrets.iter().enumerate() {
        let position = layout.configs.place(config_maps.len() + index);
        let node = TopologyNode::from_resource(secret, position);
        let edge = TopologyEdge::new(&node.id, &pod_id, false);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    // containers are drawn as pods carrying their own readiness
    for (index, container) in pod.containers.iter().enumerate() {
        let node = TopologyNode {
            id: pod.container_node_id(container),
            position: layout.containers.place(index),
            data: TopologyNodeData {
                label: container.name.clone(),
                resource_type: ResourceType::Pod,
                status: container.status(),
                namespace: pod.namespace.clone(),
                details: None,
            },
        }
        .with_details([
            ("image", container.image.clone()),
            ("restarts", container.restart_count.to_string()),
        ]);
        let edge = TopologyEdge::new(&pod_id, &node.id, container.ready);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built pod topology",
    );
    graph
}
