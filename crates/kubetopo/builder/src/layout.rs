//! Fixed-grid placement for each topology view.
//!
//! Every view places its nodes on [`Lane`]s: evenly spaced columns or rows.
//! Edge construction never reads these values, so a view can be re-laid out
//! by swapping its layout struct.

use std::cmp::max;

use kubetopo_api::graph::Position;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A column or row of evenly spaced positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lane {
    pub origin: Position,
    pub step: Position,
}

impl Lane {
    pub const fn column(x: i64, y: i64, step: i64) -> Self {
        Self {
            origin: Position::new(x, y),
            step: Position::new(0, step),
        }
    }

    pub const fn row(x: i64, y: i64, step: i64) -> Self {
        Self {
            origin: Position::new(x, y),
            step: Position::new(step, 0),
        }
    }

    pub fn place(&self, index: usize) -> Position {
        self.origin + self.step * index as i64
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentLayout {
    pub center_x: i64,
    pub center_min_y: i64,
    /// Vertical room reserved per config map or secret on the left.
    pub center_step: i64,
    pub hpa_step: i64,
    pub configs: Lane,
    pub pods: Lane,
}

impl Default for DeploymentLayout {
    fn default() -> Self {
        Self {
            center_x: 500,
            center_min_y: 300,
            center_step: 125,
            hpa_step: 250,
            configs: Lane::column(50, 50, 250),
            pods: Lane::column(950, 50, 250),
        }
    }
}

impl DeploymentLayout {
    /// Keeps the deployment vertically centered against its config column.
    pub fn center(&self, num_configs: usize) -> Position {
        let y = max(self.center_min_y, num_configs as i64 * self.center_step);
        Position::new(self.center_x, y)
    }

    /// Stacks autoscalers upwards, starting one step above the deployment.
    pub fn hpa(&self, center: Position, index: usize) -> Position {
        let lane = Lane {
            origin: center,
            step: Position::new(0, -self.hpa_step),
        };
        lane.place(index + 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PodLayout {
    pub pod: Position,
    pub configs: Lane,
    pub containers: Lane,
}

impl Default for PodLayout {
    fn default() -> Self {
        Self {
            pod: Position::new(400, 200),
            configs: Lane::column(50, 100, 120),
            containers: Lane::column(750, 100, 120),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceLayout {
    pub deployments: Lane,
    pub pods_y: i64,
    pub pods_step: i64,
    pub configs: Lane,
}

impl Default for NamespaceLayout {
    fn default() -> Self {
        Self {
            deployments: Lane::row(200, 50, 250),
            pods_y: 200,
            pods_step: 100,
            configs: Lane::column(50, 50, 100),
        }
    }
}

impl NamespaceLayout {
    /// Returns the column of pods hanging below a deployment.
    pub fn pods_below(&self, deployment: Position) -> Lane {
        Lane::column(deployment.x, self.pods_y, self.pods_step)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSecretsLayout {
    pub configs: Lane,
    pub deployments: Lane,
}

impl Default for ConfigSecretsLayout {
    fn default() -> Self {
        Self {
            configs: Lane::column(100, 50, 120),
            deployments: Lane::column(800, 50, 120),
        }
    }
}
