use kubetopo_api::{
    graph::{EdgeHandle, TopologyEdge, TopologyGraph, TopologyNode},
    resource::{ConfigMap, Deployment, HorizontalAutoscaler, Pod, Secret, TopologyResource},
};
use tracing::{debug, instrument, Level};

use crate::layout::DeploymentLayout;

/// Builds the graph of a deployment and everything around it.
///
/// Autoscalers targeting the deployment sit above it, config maps and
/// secrets on its left and its pods on its right.
pub fn build_deployment_topology(
    deployment: &Deployment,
    pods: &[Pod],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
    hpas: &[HorizontalAutoscaler],
) -> TopologyGraph {
    build_deployment_topology_with_layout(
        &DeploymentLayout::default(),
        deployment,
        pods,
        config_maps,
        secrets,
        hpas,
    )
}

#[instrument(level = Level::DEBUG, skip_all, fields(deployment = %deployment.name))]
pub fn build_deployment_topology_with_layout(
    layout: &DeploymentLayout,
    deployment: &Deployment,
    pods: &[Pod],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
    hpas: &[HorizontalAutoscaler],
) -> TopologyGraph {
    let mut graph = TopologyGraph::default();

    let deployment_id = deployment.node_id();
    let center = layout.center(config_maps.len() + secrets.len());

    let related_hpas = hpas.iter().filter(|hpa| hpa.targets(deployment));
    for (index, hpa) in related_hpas.enumerate() {
        let node = TopologyNode::from_resource(hpa, layout.hpa(center, index)).with_details([
            ("min", hpa.min_replicas.to_string()),
            ("max", hpa.max_replicas.to_string()),
            ("current", hpa.current_replicas.to_string()),
        ]);
        let edge = TopologyEdge::new(&node.id, &deployment_id, true)
            .with_handles(EdgeHandle::Bottom, EdgeHandle::Top);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    graph.add_node(
        TopologyNode::from_resource(deployment, center).with_details([
            ("replicas", deployment.replicas.to_string()),
            ("strategy", deployment.strategy.clone()),
        ]),
    );

    for (index, config_map) in config_maps.iter().enumerate() {
        let node = TopologyNode::from_resource(config_map, layout.configs.place(index))
            .with_details([("keys", format!("{} keys", config_map.data.len()))]);
        let edge = TopologyEdge::new(&node.id, &deployment_id, false);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    for (index, secret) in secrets.iter().enumerate() {
        let position = layout.configs.place(config_maps.len() + index);
        let node = TopologyNode::from_resource(secret, position).with_details([
            ("type", secret.type_.clone()),
            ("keys", format!("{} keys", secret.keys.len())),
        ]);
        let edge = TopologyEdge::new(&node.id, &deployment_id, false);

        graph.add_node(node);
        graph.add_edge(edge);
    }

    for (index, pod) in pods.iter().enumerate() {
        let node = TopologyNode::from_resource(pod, layout.pods.place(index)).with_details([
            ("node", pod.node_name.clone()),
            ("restarts", pod.restart_count.to_string()),
        ]);
        let edge = TopologyEdge::new(&deployment_id, &node.id, pod.is_running());

        graph.add_node(node);
        graph.add_edge(edge);
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built deployment topology",
    );
    graph
}
