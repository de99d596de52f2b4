use anyhow::Result;
use clap::{Parser, Subcommand};
use kubetopo_api::{consts::DEFAULT_NAMESPACE, graph::TopologyGraph};
use kubetopo_store::{ResourceStore, TopologyView};
use tracing::{instrument, Level};

#[derive(Clone, Debug, Subcommand)]
pub(crate) enum Command {
    /// Show a deployment with its pods, configuration and autoscalers
    Deployment {
        /// Name of the deployment
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        namespace: NamespaceArgs,
    },

    /// Show a pod with its configuration and containers
    Pod {
        /// Name of the pod
        #[arg(value_name = "NAME")]
        name: String,

        #[command(flatten)]
        namespace: NamespaceArgs,
    },

    /// Show every deployment of a namespace with its pods
    Namespace {
        #[command(flatten)]
        namespace: NamespaceArgs,
    },

    /// Show which deployments consume the config maps and secrets of a
    /// GitOps namespace
    ConfigSecrets {
        #[command(flatten)]
        namespace: NamespaceArgs,

        /// Label carrying the GitOps namespace of config maps and secrets
        #[arg(long, env = "KUBETOPO_LABEL_KEY", value_name = "KEY")]
        label_key: Option<String>,
    },
}

impl Command {
    #[instrument(level = Level::INFO, skip(store), err(Display))]
    pub(crate) fn run(self, store: &ResourceStore) -> Result<TopologyGraph> {
        match self {
            Self::Deployment {
                name,
                namespace: NamespaceArgs { namespace },
            } => Ok(store.deployment_view(&namespace, &name)?.build()),
            Self::Pod {
                name,
                namespace: NamespaceArgs { namespace },
            } => Ok(store.pod_view(&namespace, &name)?.build()),
            Self::Namespace {
                namespace: NamespaceArgs { namespace },
            } => Ok(store.namespace_view(&namespace).build()),
            Self::ConfigSecrets {
                namespace: NamespaceArgs { namespace },
                label_key,
            } => Ok(store
                .config_secrets_view(&namespace, label_key.as_deref())
                .build()),
        }
    }
}

#[derive(Clone, Debug, Parser)]
pub(crate) struct NamespaceArgs {
    /// Namespace of the resources
    #[arg(
        short,
        long,
        env = "KUBETOPO_NAMESPACE",
        value_name = "NAMESPACE",
        default_value = DEFAULT_NAMESPACE,
    )]
    namespace: String,
}
