use kubetopo_api::{
    consts::LABEL_APP,
    graph::{TopologyEdge, TopologyGraph, TopologyNode},
    resource::{ConfigMap, Deployment, Pod, Secret},
};
use tracing::{debug, instrument, Level};

use crate::layout::NamespaceLayout;

/// Builds the namespace-wide overview.
///
/// Deployments form the top row with their pods hanging below them. Config
/// maps and secrets are listed on the left without any edges.
pub fn build_namespace_topology(
    deployments: &[Deployment],
    pods: &[Pod],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
) -> TopologyGraph {
    build_namespace_topology_with_layout(
        &NamespaceLayout::default(),
        deployments,
        pods,
        config_maps,
        secrets,
    )
}

#[instrument(level = Level::DEBUG, skip_all)]
pub fn build_namespace_topology_with_layout(
    layout: &NamespaceLayout,
    deployments: &[Deployment],
    pods: &[Pod],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
) -> TopologyGraph {
    let mut graph = TopologyGraph::default();

    for (index, deployment) in deployments.iter().enumerate() {
        let position = layout.deployments.place(index);
        let node = TopologyNode::from_resource(deployment, position)
            .with_details([("replicas", deployment.replicas.to_string())]);
        let deployment_id = node.id.clone();
        graph.add_node(node);

        let column = layout.pods_below(position);
        let deployment_pods = pods
            .iter()
            .filter(|pod| pod.labels.get(LABEL_APP) == Some(&deployment.name));
        for (index, pod) in deployment_pods.enumerate() {
            let node = TopologyNode::from_resource(pod, column.place(index));
            let edge = TopologyEdge::new(&deployment_id, &node.id, pod.is_running());

            graph.add_node(node);
            graph.add_edge(edge);
        }
    }

    for (index, config_map) in config_maps.iter().enumerate() {
        graph.add_node(TopologyNode::from_resource(
            config_map,
            layout.configs.place(index),
        ));
    }

    for (index, secret) in secrets.iter().enumerate() {
        let position = layout.configs.place(config_maps.len() + index);
        graph.add_node(TopologyNode::from_resource(secret, position));
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built namespace topology",
    );
    graph
}
