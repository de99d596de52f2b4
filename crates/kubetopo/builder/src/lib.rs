mod config_secrets;
mod deployment;
pub mod layout;
mod namespace;
mod pod;

pub use self::{
    config_secrets::{build_config_secrets_topology, build_config_secrets_topology_with_layout},
    deployment::{build_deployment_topology, build_deployment_topology_with_layout},
    namespace::{build_namespace_topology, build_namespace_topology_with_layout},
    pod::{build_pod_topology, build_pod_topology_with_layout},
};
