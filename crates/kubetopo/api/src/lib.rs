pub mod graph;
#[cfg(feature = "k8s")]
pub mod k8s;
pub mod resource;
pub mod status;

pub mod consts {
    pub const DEFAULT_NAMESPACE: &str = "default";

    pub const LABEL_APP: &str = "app";
    pub const LABEL_KUSTOMIZE_NAMESPACE: &str = "kustomize.toolkit.fluxcd.io/namespace";
}
