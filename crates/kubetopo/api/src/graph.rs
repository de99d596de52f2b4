use std::{collections::BTreeMap, fmt, ops};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::{
    resource::{ResourceType, TopologyResource},
    status::ResourceStatus,
};

/// A node position on the canvas, in integer pixels.
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
pub struct Position {
    pub x: i64,
    pub y: i64,
}

impl Position {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

impl ops::Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl ops::Mul<i64> for Position {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { x, y } = self;
        write!(f, "({x}, {y})")
    }
}

pub type NodeDetails = BTreeMap<String, String>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopologyNode {
    pub id: String,
    pub position: Position,
    pub data: TopologyNodeData,
}

impl TopologyNode {
    pub fn from_resource<R>(resource: &R, position: Position) -> Self
    where
        R: TopologyResource,
    {
        Self {
            id: resource.node_id(),
            position,
            data: TopologyNodeData {
                label: resource.name().into(),
                resource_type: <R as TopologyResource>::TYPE,
                status: resource.status(),
                namespace: resource.namespace().into(),
                details: None,
            },
        }
    }

    pub fn with_details<I, K, V>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.data.details = Some(
            details
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        );
        self
    }

    /// Returns the detail page the renderer navigates to on click.
    pub fn route(&self) -> Option<String> {
        let TopologyNodeData {
            label,
            resource_type,
            ..
        } = &self.data;

        let prefix = resource_type.route_prefix()?;
        let label = ::url::form_urlencoded::byte_serialize(label.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        Some(format!("{prefix}/{label}"))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopologyNodeData {
    pub label: String,
    pub resource_type: ResourceType,
    pub status: ResourceStatus,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<NodeDetails>,
}

/// The side of a node an edge is anchored to.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EdgeHandle {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopologyEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<EdgeHandle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<EdgeHandle>,
    #[serde(default)]
    pub animated: bool,
}

impl TopologyEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, animated: bool) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
            source_handle: None,
            target_handle: None,
            animated,
        }
    }

    pub fn with_handles(mut self, source: EdgeHandle, target: EdgeHandle) -> Self {
        self.source_handle = Some(source);
        self.target_handle = Some(target);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopologyGraph {
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    #[serde(default)]
    pub edges: Vec<TopologyEdge>,
}

impl TopologyGraph {
    pub fn add_node(&mut self, node: TopologyNode) {
        self.nodes.push(node)
    }

    pub fn add_edge(&mut self, edge: TopologyEdge) {
        self.edges.push(edge)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&TopologyNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&TopologyEdge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    /// Returns the edges whose endpoints are missing from the node list.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &TopologyEdge> {
        self.edges.iter().filter(move |edge| {
            self.node(&edge.source).is_none() || self.node(&edge.target).is_none()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Deployment, HorizontalAutoscaler};

    #[test]
    fn edge_id_joins_endpoints() {
        let edge = TopologyEdge::new("hpa-web", "deployment-web", true)
            .with_handles(EdgeHandle::Bottom, EdgeHandle::Top);

        assert_eq!(edge.id, "hpa-web-deployment-web");
        assert_eq!(
            ::serde_json::to_value(&edge).expect("failed to serialize edge"),
            ::serde_json::json!({
                "id": "hpa-web-deployment-web",
                "source": "hpa-web",
                "target": "deployment-web",
                "sourceHandle": "bottom",
                "targetHandle": "top",
                "animated": true,
            }),
        );
    }

    #[test]
    fn node_without_details_omits_field() {
        let deployment = Deployment {
            name: "web".into(),
            namespace: "default".into(),
            status: "Available".into(),
            ..Default::default()
        };
        let node = TopologyNode::from_resource(&deployment, Position::new(500, 300));

        assert_eq!(
            ::serde_json::to_value(&node).expect("failed to serialize node"),
            ::serde_json::json!({
                "id": "deployment-web",
                "position": { "x": 500, "y": 300 },
                "data": {
                    "label": "web",
                    "resourceType": "Deployment",
                    "status": "healthy",
                    "namespace": "default",
                },
            }),
        );
    }

    #[test]
    fn route_follows_resource_type() {
        let deployment = Deployment {
            name: "web app".into(),
            ..Default::default()
        };
        let node = TopologyNode::from_resource(&deployment, Position::default());
        assert_eq!(node.route().as_deref(), Some("/deployments/web%20app"));

        let hpa = HorizontalAutoscaler {
            name: "web".into(),
            ..Default::default()
        };
        let node = TopologyNode::from_resource(&hpa, Position::default());
        assert_eq!(node.data.resource_type.to_string(), "HPA");
        assert_eq!(node.route(), None);
    }

    #[test]
    fn detect_dangling_edges() {
        let deployment = Deployment {
            name: "web".into(),
            ..Default::default()
        };

        let mut graph = TopologyGraph::default();
        graph.add_node(TopologyNode::from_resource(&deployment, Position::default()));
        graph.add_edge(TopologyEdge::new("configmap-missing", "deployment-web", false));

        let dangling: Vec<_> = graph.dangling_edges().map(|edge| edge.id.as_str()).collect();
        assert_eq!(dangling, ["configmap-missing-deployment-web"]);
    }
}
