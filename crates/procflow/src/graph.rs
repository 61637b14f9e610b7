//! The node arena handed to the layout solver.
//!
//! [`LayoutGraph`] owns every [`DiagramNode`] of one layout call. Adjacency is
//! stored as lists of [`NodeId`]s, so traversal order is simply the order in
//! which the caller added nodes and neighbours.

use log::debug;
use petgraph::{algo::is_cyclic_directed, graph::DiGraph};

use procflow_core::{
    geometry::{Extents, Point},
    positioned::Positioned,
};

use crate::{
    error::LayoutError,
    node::{DiagramNode, NodeId},
};

/// Arena of layout nodes addressed by [`NodeId`].
#[derive(Debug, Clone)]
pub struct LayoutGraph<T> {
    nodes: Vec<DiagramNode<T>>,
}

impl<T> Default for LayoutGraph<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<T> LayoutGraph<T> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node that has no position yet.
    pub fn add_node(&mut self, target: T, extents: Extents) -> NodeId {
        self.add_node_at(target, extents, Point::unset())
    }

    /// Adds a node at a known position.
    pub fn add_node_at(&mut self, target: T, extents: Extents, position: Point) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(DiagramNode::new(target, extents, position));
        id
    }

    /// Records that `to` follows `from` in the layout.
    ///
    /// `to` is appended to `from`'s right nodes and `from` to `to`'s left
    /// nodes. Repeated connections are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::UnknownNode`] if either id is not part of this
    /// graph and [`LayoutError::SelfAdjacent`] if both ids are the same.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> Result<(), LayoutError> {
        self.check_id(from, to)?;
        self.check_id(to, from)?;
        if from == to {
            return Err(LayoutError::SelfAdjacent { node: from });
        }

        let successors = self.nodes[from.index()].right_nodes_mut();
        if !successors.contains(&to) {
            successors.push(to);
        }
        let predecessors = self.nodes[to.index()].left_nodes_mut();
        if !predecessors.contains(&from) {
            predecessors.push(from);
        }
        Ok(())
    }

    /// Replaces a node's left nodes with a caller-built list.
    ///
    /// The list is checked by [`LayoutGraph::validate`] when layout starts.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph. Ids inside the list are
    /// not checked here.
    pub fn set_left_nodes(&mut self, id: NodeId, left_nodes: Vec<NodeId>) {
        *self.nodes[id.index()].left_nodes_mut() = left_nodes;
    }

    /// Replaces a node's right nodes with a caller-built list.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph, like
    /// [`LayoutGraph::set_left_nodes`].
    pub fn set_right_nodes(&mut self, id: NodeId, right_nodes: Vec<NodeId>) {
        *self.nodes[id.index()].right_nodes_mut() = right_nodes;
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &DiagramNode<T> {
        &self.nodes[id.index()]
    }

    /// Returns the node with the given id, if it exists.
    pub fn get(&self, id: NodeId) -> Option<&DiagramNode<T>> {
        self.nodes.get(id.index())
    }

    /// Returns the node with the given id for target access.
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn node_mut(&mut self, id: NodeId) -> &mut DiagramNode<T> {
        &mut self.nodes[id.index()]
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &DiagramNode<T>> {
        self.nodes.iter()
    }

    /// Iterates over all node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + use<T> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the working position of a node.
    pub fn position(&self, id: NodeId) -> Point {
        self.nodes[id.index()].position()
    }

    pub(crate) fn set_position(&mut self, id: NodeId, position: Point) {
        self.nodes[id.index()].set_position(position);
    }

    /// Marks every node as unplaced so the next layout starts from scratch.
    pub fn clear_positions(&mut self) {
        for node in &mut self.nodes {
            node.set_position(Point::unset());
        }
    }

    /// Checks the caller-supplied adjacency and extents.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::UnknownNode`] for a neighbour id outside this graph
    /// - [`LayoutError::SelfAdjacent`] for a node listing itself
    /// - [`LayoutError::ConflictingAdjacency`] for a neighbour listed both
    ///   left and right of the same node
    /// - [`LayoutError::InvalidExtents`] for negative or non-finite extents
    pub fn validate(&self) -> Result<(), LayoutError> {
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId::new(index);

            if !node.extents().is_valid() {
                return Err(LayoutError::InvalidExtents {
                    node: id,
                    extents: node.extents(),
                });
            }

            for &neighbour in node.left_nodes().iter().chain(node.right_nodes()) {
                self.check_id(id, neighbour)?;
                if neighbour == id {
                    return Err(LayoutError::SelfAdjacent { node: id });
                }
            }

            if let Some(&other) = node
                .left_nodes()
                .iter()
                .find(|left| node.right_nodes().contains(left))
            {
                return Err(LayoutError::ConflictingAdjacency { node: id, other });
            }
        }
        Ok(())
    }

    /// Returns true if following right nodes (or reversed left nodes) can
    /// lead back to where it started.
    ///
    /// Cycles are accepted by the solver but void its convergence guarantees.
    pub fn has_cycle(&self) -> bool {
        let mut digraph = DiGraph::<(), ()>::with_capacity(self.nodes.len(), 0);
        let indices: Vec<_> = self.nodes.iter().map(|_| digraph.add_node(())).collect();

        for (index, node) in self.nodes.iter().enumerate() {
            for right in node.right_nodes() {
                if let Some(&target) = indices.get(right.index()) {
                    digraph.update_edge(indices[index], target, ());
                }
            }
            for left in node.left_nodes() {
                if let Some(&source) = indices.get(left.index()) {
                    digraph.update_edge(source, indices[index], ());
                }
            }
        }

        let cyclic = is_cyclic_directed(&digraph);
        debug!(nodes = self.nodes.len(), cyclic; "Checked layout adjacency for cycles");
        cyclic
    }

    /// Consumes the graph and returns the targets in insertion order.
    pub fn into_targets(self) -> Vec<T> {
        self.nodes.into_iter().map(DiagramNode::into_target).collect()
    }

    fn check_id(&self, node: NodeId, neighbour: NodeId) -> Result<(), LayoutError> {
        if neighbour.index() < self.nodes.len() {
            Ok(())
        } else {
            Err(LayoutError::UnknownNode {
                node,
                missing: neighbour,
            })
        }
    }
}

impl<T: Positioned> LayoutGraph<T> {
    /// Wraps caller objects into layout nodes, reading position and extents.
    ///
    /// The resulting graph has no adjacency; add it with
    /// [`LayoutGraph::connect`] or the `set_*_nodes` methods.
    pub fn from_targets(targets: impl IntoIterator<Item = T>) -> Self {
        let mut graph = Self::new();
        for target in targets {
            let extents = target.extents();
            let position = target.position();
            graph.add_node_at(target, extents, position);
        }
        graph
    }

    /// Copies every working position back onto its target.
    pub fn write_back(&mut self) {
        for node in &mut self.nodes {
            let position = node.position();
            node.target_mut().set_position(position);
        }
    }
}
