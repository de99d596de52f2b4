use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::resource::{ResourceRecord, TopologyResource};

/// The abstracted health shown for every node on a topology.
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
    Display,
    EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ResourceStatus {
    Healthy,
    Warning,
    Error,
    #[default]
    Unknown,
}

impl ResourceStatus {
    pub fn from_deployment_status(status: &str) -> Self {
        match status {
            "Available" => Self::Healthy,
            "Progressing" => Self::Warning,
            "Degraded" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn from_pod_status(status: &str) -> Self {
        match status {
            "Running" => Self::Healthy,
            "Pending" => Self::Warning,
            "Failed" | "CrashLoopBackOff" => Self::Error,
            _ => Self::Unknown,
        }
    }
}

/// Maps a resource record onto its health category.
///
/// Config maps, secrets and autoscalers have no failure states and are
/// always healthy.
pub fn map_status(record: &ResourceRecord) -> ResourceStatus {
    match record {
        ResourceRecord::Deployment(record) => record.status(),
        ResourceRecord::Pod(record) => record.status(),
        ResourceRecord::ConfigMap(record) => record.status(),
        ResourceRecord::Secret(record) => record.status(),
        ResourceRecord::Hpa(record) => record.status(),
    }
}
