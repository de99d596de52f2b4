use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{value_parser, ArgAction, Parser};
use kubetopo_api::graph::TopologyGraph;
use kubetopo_store::ResourceStore;
use strum::{Display, EnumString};
use tracing::{instrument, warn, Level};

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// Turn debugging information on
    #[arg(short, long, global = true, env = "KUBETOPO_DEBUG", action = ArgAction::Count)]
    #[arg(value_parser = value_parser!(u8).range(..=3))]
    debug: u8,

    /// Format of the rendered graph
    #[arg(
        short,
        long,
        global = true,
        env = "KUBETOPO_OUTPUT",
        value_name = "FORMAT",
        default_value_t = OutputFormat::Json,
    )]
    output: OutputFormat,

    /// Indent the JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// A `kubectl get -o json|yaml` dump to read the resources from
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: crate::commands::Command,
}

impl Args {
    pub(crate) fn init_logger(&self) {
        ::kubetopo_core::tracer::init_once_with_level_int(self.debug)
    }

    #[instrument(level = Level::INFO, skip_all, err(Display))]
    pub(crate) async fn run(self) -> Result<()> {
        let Self {
            debug: _,
            output,
            pretty,
            snapshot,
            command,
        } = self;

        let store: ResourceStore = ::kubetopo_store::load_snapshot(&snapshot)
            .await?
            .into_iter()
            .collect();

        let graph = command.run(&store)?;
        if graph.is_empty() {
            warn!("no topology data available for the given resources");
        }

        let rendered = output.render(&graph, pretty)?;
        println!("{}", rendered.trim_end());
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    fn render(&self, graph: &TopologyGraph, pretty: bool) -> Result<String> {
        match self {
            Self::Json if pretty => ::serde_json::to_string_pretty(graph)
                .map_err(|error| anyhow!("failed to serialize graph to JSON format: {error}")),
            Self::Json => ::serde_json::to_string(graph)
                .map_err(|error| anyhow!("failed to serialize graph to JSON format: {error}")),
            Self::Yaml => ::serde_yaml::to_string(graph)
                .map_err(|error| anyhow!("failed to serialize graph to YAML format: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "kubetopo",
            "cluster.yaml",
            "deployment",
            "web-app",
            "--output",
            "yaml",
            "-dd",
        ])
        .expect("failed to parse args");

        assert_eq!(args.snapshot, PathBuf::from("cluster.yaml"));
        assert_eq!(args.output, OutputFormat::Yaml);
        assert_eq!(args.debug, 2);
        assert!(!args.pretty);
    }

    #[test]
    fn reject_unknown_output_format() {
        let result =
            Args::try_parse_from(["kubetopo", "cluster.yaml", "namespace", "--output", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn render_empty_graph() {
        let graph = TopologyGraph::default();

        let json = OutputFormat::Json
            .render(&graph, false)
            .expect("failed to render JSON");
        assert_eq!(json, r#"{"nodes":[],"edges":[]}"#);

        let yaml = OutputFormat::Yaml
            .render(&graph, true)
            .expect("failed to render YAML");
        assert_eq!(yaml, "nodes: []\nedges: []\n");
    }
}
