use kubetopo_api::{
    consts::LABEL_KUSTOMIZE_NAMESPACE,
    graph::TopologyGraph,
    resource::{ConfigMap, Deployment, HorizontalAutoscaler, Pod, ResourceType, Secret},
};
use tracing::{debug, instrument, Level};

use crate::{ResourceStore, StoreError};

/// The inputs of a single topology, ready to be laid out.
pub trait TopologyView {
    fn build(&self) -> TopologyGraph;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentView {
    pub deployment: Deployment,
    pub pods: Vec<Pod>,
    pub config_maps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
    pub hpas: Vec<HorizontalAutoscaler>,
}

impl TopologyView for DeploymentView {
    fn build(&self) -> TopologyGraph {
        let Self {
            deployment,
            pods,
            config_maps,
            secrets,
            hpas,
        } = self;
        ::kubetopo_builder::build_deployment_topology(deployment, pods, config_maps, secrets, hpas)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodView {
    pub pod: Pod,
    pub config_maps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
}

impl TopologyView for PodView {
    fn build(&self) -> TopologyGraph {
        let Self {
            pod,
            config_maps,
            secrets,
        } = self;
        ::kubetopo_builder::build_pod_topology(pod, config_maps, secrets)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceView {
    pub deployments: Vec<Deployment>,
    pub pods: Vec<Pod>,
    pub config_maps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
}

impl TopologyView for NamespaceView {
    fn build(&self) -> TopologyGraph {
        let Self {
            deployments,
            pods,
            config_maps,
            secrets,
        } = self;
        ::kubetopo_builder::build_namespace_topology(deployments, pods, config_maps, secrets)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigSecretsView {
    pub label_key: String,
    pub namespace: String,
    pub deployments: Vec<Deployment>,
    pub config_maps: Vec<ConfigMap>,
    pub secrets: Vec<Secret>,
}

impl TopologyView for ConfigSecretsView {
    fn build(&self) -> TopologyGraph {
        let Self {
            label_key,
            namespace,
            deployments,
            config_maps,
            secrets,
        } = self;
        ::kubetopo_builder::build_config_secrets_topology_with_layout(
            &Default::default(),
            label_key,
            deployments,
            config_maps,
            secrets,
            namespace,
        )
    }
}

impl ResourceStore {
    /// Collects a deployment with its pods, referenced configuration and
    /// the autoscalers of its namespace.
    ///
    /// Pods are matched by the deployment's label selector.
    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn deployment_view(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<DeploymentView, StoreError> {
        let deployment = self
            .deployment(namespace, name)
            .ok_or_else(|| not_found(ResourceType::Deployment, namespace, name))?;

        let view = DeploymentView {
            deployment: deployment.clone(),
            pods: self
                .pods(Some(namespace))
                .filter(|pod| deployment.selects(pod))
                .cloned()
                .collect(),
            config_maps: self
                .config_maps(Some(namespace))
                .filter(|config_map| deployment.uses_config_map(&config_map.name))
                .cloned()
                .collect(),
            secrets: self
                .secrets(Some(namespace))
                .filter(|secret| deployment.uses_secret(&secret.name))
                .cloned()
                .collect(),
            hpas: self.hpas(Some(namespace)).cloned().collect(),
        };
        debug!(
            pods = view.pods.len(),
            config_maps = view.config_maps.len(),
            secrets = view.secrets.len(),
            "collected deployment view",
        );
        Ok(view)
    }

    #[instrument(level = Level::DEBUG, skip(self))]
    pub fn pod_view(&self, namespace: &str, name: &str) -> Result<PodView, StoreError> {
        let pod = self
            .pod(namespace, name)
            .ok_or_else(|| not_found(ResourceType::Pod, namespace, name))?;

        Ok(PodView {
            pod: pod.clone(),
            config_maps: self
                .config_maps(Some(namespace))
                .filter(|config_map| pod.uses_config_map(&config_map.name))
                .cloned()
                .collect(),
            secrets: self
                .secrets(Some(namespace))
                .filter(|secret| pod.uses_secret(&secret.name))
                .cloned()
                .collect(),
        })
    }

    pub fn namespace_view(&self, namespace: &str) -> NamespaceView {
        let namespace = Some(namespace);
        NamespaceView {
            deployments: self.deployments(namespace).cloned().collect(),
            pods: self.pods(namespace).cloned().collect(),
            config_maps: self.config_maps(namespace).cloned().collect(),
            secrets: self.secrets(namespace).cloned().collect(),
        }
    }

    /// Collects every deployment, config map and secret of the store.
    ///
    /// The scope is applied by label when the view is built, so resources
    /// of any Kubernetes namespace may take part. Links never cross a
    /// Kubernetes namespace.
    pub fn config_secrets_view(
        &self,
        namespace: &str,
        label_key: Option<&str>,
    ) -> ConfigSecretsView {
        ConfigSecretsView {
            label_key: label_key.unwrap_or(LABEL_KUSTOMIZE_NAMESPACE).into(),
            namespace: namespace.into(),
            deployments: self.deployments(None).cloned().collect(),
            config_maps: self.config_maps(None).cloned().collect(),
            secrets: self.secrets(None).cloned().collect(),
        }
    }
}

fn not_found(kind: ResourceType, namespace: &str, name: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        namespace: namespace.into(),
        name: name.into(),
    }
}
