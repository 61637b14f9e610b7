//! procflow - automatic layout for process and workflow diagrams.
//!
//! The crate arranges the nodes of a directed diagram so that they do not
//! overlap, keep a minimum separation, and branch points stay centered
//! relative to their branches. It is an incremental solver: nodes that
//! already carry a position are adjusted rather than placed from scratch, and
//! the caller decides when to run it.
//!
//! # Usage
//!
//! ```rust
//! use procflow::{LayoutAlgorithm, LayoutGraph, geometry::Extents};
//!
//! let mut graph = LayoutGraph::new();
//! let start = graph.add_node("start", Extents::uniform(10.0));
//! let task = graph.add_node("task", Extents::uniform(10.0));
//! graph.connect(start, task).expect("both nodes exist");
//!
//! let mut algorithm = LayoutAlgorithm::default();
//! let changed = algorithm.layout(&mut graph).expect("valid adjacency");
//!
//! assert!(changed);
//! assert_eq!(graph.node(start).x(), 10.0);
//! assert_eq!(graph.node(task).x(), 70.0);
//! ```

pub mod config;
pub mod stepper;

mod error;
mod graph;
mod layout;
mod node;

pub use procflow_core::{geometry, kind, positioned};

pub use config::LayoutConfig;
pub use error::LayoutError;
pub use graph::LayoutGraph;
pub use layout::{LayoutAlgorithm, PASS_COUNT, TOLERANCE};
pub use node::{DiagramNode, NodeId};
