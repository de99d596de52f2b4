use kubetopo_api::{
    consts::LABEL_KUSTOMIZE_NAMESPACE,
    graph::{TopologyEdge, TopologyGraph, TopologyNode},
    resource::{ConfigMap, Deployment, Secret, TopologyResource},
};
use tracing::{debug, instrument, Level};

use crate::layout::ConfigSecretsLayout;

/// Builds the graph of which deployments consume the config maps and
/// secrets a GitOps namespace ships.
///
/// Config maps and secrets are scoped by the kustomize namespace label
/// rather than by their Kubernetes namespace. A deployment is linked only
/// to config maps and secrets of its own Kubernetes namespace, and only
/// deployments linked to at least one of them are placed.
pub fn build_config_secrets_topology(
    deployments: &[Deployment],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
    namespace: &str,
) -> TopologyGraph {
    build_config_secrets_topology_with_layout(
        &ConfigSecretsLayout::default(),
        LABEL_KUSTOMIZE_NAMESPACE,
        deployments,
        config_maps,
        secrets,
        namespace,
    )
}

#[instrument(level = Level::DEBUG, skip_all, fields(%label_key, %namespace))]
pub fn build_config_secrets_topology_with_layout(
    layout: &ConfigSecretsLayout,
    label_key: &str,
    deployments: &[Deployment],
    config_maps: &[ConfigMap],
    secrets: &[Secret],
    namespace: &str,
) -> TopologyGraph {
    let config_maps = scoped(config_maps, label_key, namespace);
    let secrets = scoped(secrets, label_key, namespace);

    if config_maps.is_empty() && secrets.is_empty() {
        debug!("no config maps or secrets in scope");
        return TopologyGraph::default();
    }

    let mut graph = TopologyGraph::default();
    let mut connected = Vec::default();

    for (index, config_map) in config_maps.iter().enumerate() {
        let node = TopologyNode::from_resource(*config_map, layout.configs.place(index));
        for deployment in deployments {
            if deployment.namespace == config_map.namespace
                && deployment.uses_config_map(&config_map.name)
            {
                connect(&mut graph, &mut connected, &node.id, deployment);
            }
        }
        graph.add_node(node);
    }

    for (index, secret) in secrets.iter().enumerate() {
        let position = layout.configs.place(config_maps.len() + index);
        let node = TopologyNode::from_resource(*secret, position);
        for deployment in deployments {
            if deployment.namespace == secret.namespace && deployment.uses_secret(&secret.name) {
                connect(&mut graph, &mut connected, &node.id, deployment);
            }
        }
        graph.add_node(node);
    }

    for (index, deployment) in connected.into_iter().enumerate() {
        graph.add_node(TopologyNode::from_resource(
            deployment,
            layout.deployments.place(index),
        ));
    }

    debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "built config/secrets topology",
    );
    graph
}

fn scoped<'a, R>(resources: &'a [R], label_key: &str, namespace: &str) -> Vec<&'a R>
where
    R: TopologyResource,
{
    resources
        .iter()
        .filter(|resource| {
            resource.labels().get(label_key).map(String::as_str) == Some(namespace)
        })
        .collect()
}

/// Links a config source to a consuming deployment, remembering the
/// deployment in first-seen order.
///
/// Deployments sharing a name share a node, so only the first one is kept.
fn connect<'a>(
    graph: &mut TopologyGraph,
    connected: &mut Vec<&'a Deployment>,
    source: &str,
    deployment: &'a Deployment,
) {
    graph.add_edge(TopologyEdge::new(source, deployment.node_id(), false));
    if !connected.iter().any(|known| known.name == deployment.name) {
        connected.push(deployment);
    }
}
