//! Process diagram files.
//!
//! A diagram file lists its nodes as `[[node]]` tables and its connections as
//! `[[edge]]` tables:
//!
//! ```toml
//! [[node]]
//! id = "receive"
//! kind = "start"
//!
//! [[node]]
//! id = "check"
//! kind = "activity"
//! x = 120.0
//! y = 40.0
//!
//! [[edge]]
//! from = "receive"
//! to = "check"
//! ```
//!
//! A node keeps its position only when both `x` and `y` are given. `width`
//! and `height` override the size implied by the node's kind; a node without
//! a kind gets the configured default size.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;

use procflow::{
    LayoutConfig, LayoutGraph, NodeId,
    geometry::{Extents, Point, Size},
    kind::NodeKind,
    positioned::Positioned,
};

use crate::error::CliError;

/// A parsed diagram file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiagramFile {
    #[serde(default, rename = "node")]
    nodes: Vec<NodeSpec>,

    #[serde(default, rename = "edge")]
    edges: Vec<EdgeSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeSpec {
    id: String,
    kind: Option<NodeKind>,
    x: Option<f64>,
    y: Option<f64>,
    width: Option<f64>,
    height: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeSpec {
    from: String,
    to: String,
}

/// A diagram node as the layout solver sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessNode {
    id: String,
    kind: Option<NodeKind>,
    extents: Extents,
    position: Point,
}

impl ProcessNode {
    /// The node's identifier in the diagram file.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The node's kind, if the file named one.
    pub fn kind(&self) -> Option<NodeKind> {
        self.kind
    }
}

impl Positioned for ProcessNode {
    fn position(&self) -> Point {
        self.position
    }

    fn extents(&self) -> Extents {
        self.extents
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }
}

impl DiagramFile {
    /// Parses a diagram from TOML source.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Format`] carrying the source span of the problem.
    pub fn parse(src: &str) -> Result<Self, CliError> {
        toml::from_str(src).map_err(|err| CliError::new_format_error(err, src))
    }

    /// Number of nodes declared in the file.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Builds the layout graph, one layout node per diagram node.
    ///
    /// Layout node ids follow declaration order. Every edge makes `to` a right
    /// neighbour of `from`.
    ///
    /// # Errors
    ///
    /// Returns an error for repeated node ids, edges naming undeclared nodes
    /// and edges the layout graph rejects, such as self loops.
    pub fn into_graph(self, config: &LayoutConfig) -> Result<LayoutGraph<ProcessNode>, CliError> {
        let mut lookup = HashMap::with_capacity(self.nodes.len());
        for (index, spec) in self.nodes.iter().enumerate() {
            if lookup.insert(spec.id.clone(), index).is_some() {
                return Err(CliError::DuplicateId(spec.id.clone()));
            }
        }

        let targets = self
            .nodes
            .into_iter()
            .map(|spec| spec.into_process_node(config));
        let mut graph = LayoutGraph::from_targets(targets);
        let ids: Vec<NodeId> = graph.node_ids().collect();

        for edge in &self.edges {
            let resolve = |name: &str| {
                lookup
                    .get(name)
                    .map(|&index| ids[index])
                    .ok_or_else(|| CliError::UnknownNode {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: name.to_string(),
                    })
            };
            let from = resolve(&edge.from)?;
            let to = resolve(&edge.to)?;
            graph
                .connect(from, to)
                .map_err(|source| CliError::InvalidEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    source,
                })?;
        }

        debug!(nodes = graph.len(), edges = self.edges.len(); "Built layout graph");
        Ok(graph)
    }
}

impl NodeSpec {
    fn into_process_node(self, config: &LayoutConfig) -> ProcessNode {
        let base = self
            .kind
            .map_or_else(|| config.default_node_size(), NodeKind::size);
        let size = Size::new(
            self.width.unwrap_or(base.width()),
            self.height.unwrap_or(base.height()),
        );
        let position = match (self.x, self.y) {
            (Some(x), Some(y)) => Point::new(x, y),
            _ => Point::unset(),
        };

        ProcessNode {
            id: self.id,
            kind: self.kind,
            extents: Extents::centered(size),
            position,
        }
    }
}
