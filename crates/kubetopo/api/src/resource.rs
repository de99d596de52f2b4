use std::{collections::BTreeMap, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::status::ResourceStatus;

pub type Labels = BTreeMap<String, String>;

#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
pub enum ResourceType {
    Deployment,
    Pod,
    ConfigMap,
    Secret,
    #[serde(rename = "HPA")]
    #[strum(serialize = "HPA")]
    Hpa,
}

impl ResourceType {
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Pod => "pod",
            Self::ConfigMap => "configmap",
            Self::Secret => "secret",
            Self::Hpa => "hpa",
        }
    }

    pub fn node_id(&self, name: &str) -> String {
        let prefix = self.id_prefix();
        format!("{prefix}-{name}")
    }

    /// Returns the collection segment of the detail page, if any.
    pub const fn route_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Deployment => Some("/deployments"),
            Self::Pod => Some("/pods"),
            Self::ConfigMap => Some("/configmaps"),
            Self::Secret => Some("/secrets"),
            Self::Hpa => None,
        }
    }
}

/// A typed snapshot of a cluster object that can be placed on a topology.
pub trait TopologyResource {
    const TYPE: ResourceType;

    fn name(&self) -> &str;

    fn namespace(&self) -> &str;

    fn labels(&self) -> &Labels;

    fn status(&self) -> ResourceStatus;

    fn node_id(&self) -> String {
        <Self as TopologyResource>::TYPE.node_id(self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub replicas: DeploymentReplicas,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub selector: Labels,
    #[serde(default)]
    pub config_maps: Vec<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
}

impl TopologyResource for Deployment {
    const TYPE: ResourceType = ResourceType::Deployment;

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn status(&self) -> ResourceStatus {
        ResourceStatus::from_deployment_status(&self.status)
    }
}

impl Deployment {
    pub fn uses_config_map(&self, name: &str) -> bool {
        self.config_maps.iter().any(|config_map| config_map == name)
    }

    pub fn uses_secret(&self, name: &str) -> bool {
        self.secrets.iter().any(|secret| secret == name)
    }

    /// Tests whether the pod carries every `matchLabels` pair.
    ///
    /// An empty selector selects nothing.
    pub fn selects(&self, pod: &Pod) -> bool {
        !self.selector.is_empty()
            && self
                .selector
                .iter()
                .all(|(key, value)| pod.labels.get(key) == Some(value))
    }
}

#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReplicas {
    #[serde(default)]
    pub desired: i32,
    #[serde(default)]
    pub ready: i32,
    #[serde(default)]
    pub available: i32,
    #[serde(default)]
    pub unavailable: i32,
}

impl fmt::Display for DeploymentReplicas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { desired, ready, .. } = self;
        write!(f, "{ready}/{desired}")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub restart_count: i32,
    #[serde(default)]
    pub node_name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub containers: Vec<Container>,
    #[serde(default)]
    pub labels: Labels,
    #[serde(default)]
    pub owner_references: Vec<OwnerReference>,
    #[serde(default)]
    pub config_maps: Vec<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
}

impl TopologyResource for Pod {
    const TYPE: ResourceType = ResourceType::Pod;

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn status(&self) -> ResourceStatus {
        ResourceStatus::from_pod_status(&self.status)
    }
}

impl Pod {
    pub const STATUS_RUNNING: &'static str = "Running";

    pub fn is_running(&self) -> bool {
        self.status == Self::STATUS_RUNNING
    }

    pub fn uses_config_map(&self, name: &str) -> bool {
        self.config_maps.iter().any(|config_map| config_map == name)
    }

    pub fn uses_secret(&self, name: &str) -> bool {
        self.secrets.iter().any(|secret| secret == name)
    }

    pub fn container_node_id(&self, container: &Container) -> String {
        let Self { name, .. } = self;
        let Container {
            name: container, ..
        } = container;
        format!("container-{name}-{container}")
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub restart_count: i32,
}

impl Container {
    pub const fn status(&self) -> ResourceStatus {
        if self.ready {
            ResourceStatus::Healthy
        } else {
            ResourceStatus::Error
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
    #[serde(default)]
    pub uid: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMap {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    #[serde(default)]
    pub labels: Labels,
}

impl TopologyResource for ConfigMap {
    const TYPE: ResourceType = ResourceType::ConfigMap;

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn status(&self) -> ResourceStatus {
        ResourceStatus::Healthy
    }
}

/// Only the key names are kept; secret values never leave the source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub name: String,
    pub namespace: String,
    #[serde(default, rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(default)]
    pub labels: Labels,
}

impl TopologyResource for Secret {
    const TYPE: ResourceType = ResourceType::Secret;

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn status(&self) -> ResourceStatus {
        ResourceStatus::Healthy
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalAutoscaler {
    pub name: String,
    pub namespace: String,
    pub target_ref: ScaleTargetRef,
    #[serde(default)]
    pub min_replicas: i32,
    #[serde(default)]
    pub max_replicas: i32,
    #[serde(default)]
    pub current_replicas: i32,
    #[serde(default)]
    pub desired_replicas: i32,
    #[serde(default)]
    pub labels: Labels,
}

impl TopologyResource for HorizontalAutoscaler {
    const TYPE: ResourceType = ResourceType::Hpa;

    fn name(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    fn labels(&self) -> &Labels {
        &self.labels
    }

    fn status(&self) -> ResourceStatus {
        ResourceStatus::Healthy
    }
}

impl HorizontalAutoscaler {
    pub fn targets(&self, deployment: &Deployment) -> bool {
        let ScaleTargetRef { kind, name } = &self.target_ref;
        kind == "Deployment" && name == &deployment.name
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScaleTargetRef {
    pub kind: String,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind")]
pub enum ResourceRecord {
    Deployment(Deployment),
    Pod(Pod),
    ConfigMap(ConfigMap),
    Secret(Secret),
    #[serde(rename = "HorizontalPodAutoscaler")]
    Hpa(HorizontalAutoscaler),
}

impl ResourceRecord {
    pub const fn kind(&self) -> ResourceType {
        match self {
            Self::Deployment(_) => ResourceType::Deployment,
            Self::Pod(_) => ResourceType::Pod,
            Self::ConfigMap(_) => ResourceType::ConfigMap,
            Self::Secret(_) => ResourceType::Secret,
            Self::Hpa(_) => ResourceType::Hpa,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Deployment(record) => record.name(),
            Self::Pod(record) => record.name(),
            Self::ConfigMap(record) => record.name(),
            Self::Secret(record) => record.name(),
            Self::Hpa(record) => record.name(),
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            Self::Deployment(record) => record.namespace(),
            Self::Pod(record) => record.namespace(),
            Self::ConfigMap(record) => record.namespace(),
            Self::Secret(record) => record.namespace(),
            Self::Hpa(record) => record.namespace(),
        }
    }

    pub fn labels(&self) -> &Labels {
        match self {
            Self::Deployment(record) => record.labels(),
            Self::Pod(record) => record.labels(),
            Self::ConfigMap(record) => record.labels(),
            Self::Secret(record) => record.labels(),
            Self::Hpa(record) => record.labels(),
        }
    }

    pub fn node_id(&self) -> String {
        self.kind().node_id(self.name())
    }
}

impl From<Deployment> for ResourceRecord {
    fn from(value: Deployment) -> Self {
        Self::Deployment(value)
    }
}

impl From<Pod> for ResourceRecord {
    fn from(value: Pod) -> Self {
        Self::Pod(value)
    }
}

impl From<ConfigMap> for ResourceRecord {
    fn from(value: ConfigMap) -> Self {
        Self::ConfigMap(value)
    }
}

impl From<Secret> for ResourceRecord {
    fn from(value: Secret) -> Self {
        Self::Secret(value)
    }
}

impl From<HorizontalAutoscaler> for ResourceRecord {
    fn from(value: HorizontalAutoscaler) -> Self {
        Self::Hpa(value)
    }
}
