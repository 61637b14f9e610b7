//! Error types for layout operations.
//!
//! Every error is caller-induced: malformed adjacency, invalid extents, or a
//! stepping setup that would deadlock. Layout of a well-formed graph never
//! fails.

use thiserror::Error;

use procflow_core::geometry::Extents;

use crate::node::NodeId;

/// The error type returned by [`LayoutGraph`](crate::LayoutGraph) and
/// [`LayoutAlgorithm`](crate::LayoutAlgorithm).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("node {node} lists itself as a neighbour")]
    SelfAdjacent { node: NodeId },

    #[error("node {node} has {other} both as left and as right neighbour")]
    ConflictingAdjacency { node: NodeId, other: NodeId },

    #[error("node {node} refers to unknown node {missing}")]
    UnknownNode { node: NodeId, missing: NodeId },

    #[error("node {node} has invalid extents {extents:?}")]
    InvalidExtents { node: NodeId, extents: Extents },

    #[error("node {node} ended layout at a non-finite position ({x}, {y})")]
    NonFiniteCoordinate { node: NodeId, x: f64, y: f64 },

    #[error("a blocking stepper cannot run on the thread that controls it")]
    SteppingOnControllerThread,
}
