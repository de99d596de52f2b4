mod snapshot;
mod store;
mod view;

pub use self::{
    snapshot::{load_snapshot, parse_snapshot},
    store::{ResourceStore, ResourceStoreBuilder},
    view::{ConfigSecretsView, DeploymentView, NamespaceView, PodView, TopologyView},
};

use kubetopo_api::resource::ResourceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {namespace}/{name}")]
    NotFound {
        kind: ResourceType,
        namespace: String,
        name: String,
    },
}
