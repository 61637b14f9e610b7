//! The layout file written after a run.

use serde::{Deserialize, Serialize};

use procflow::{LayoutConfig, positioned::Positioned};

use crate::{diagram::ProcessNode, error::CliError};

/// Final positions of every diagram node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutFile {
    /// Whether layout moved any node.
    pub changed: bool,

    /// One entry per node, in declaration order.
    #[serde(default, rename = "node")]
    pub nodes: Vec<PlacedNode>,
}

/// The gravity point of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

impl LayoutFile {
    /// Collects the positions of laid out nodes, snapped to the configured grid.
    pub fn from_nodes<'a>(
        changed: bool,
        nodes: impl IntoIterator<Item = &'a ProcessNode>,
        config: &LayoutConfig,
    ) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|node| {
                let position = node.position();
                PlacedNode {
                    id: node.id().to_string(),
                    x: config.snap_to_grid(position.x()),
                    y: config.snap_to_grid(position.y()),
                }
            })
            .collect();
        Self { changed, nodes }
    }

    /// Renders the file as TOML.
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string(self)?)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
