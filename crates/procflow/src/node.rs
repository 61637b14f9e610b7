//! Layout nodes and their handles.
//!
//! A [`DiagramNode`] wraps one caller object (its *target*) together with the
//! working position the solver mutates and the node's layout adjacency. Nodes
//! live in a [`LayoutGraph`](crate::LayoutGraph) and refer to each other by
//! [`NodeId`].

use std::fmt;

use procflow_core::geometry::{Bounds, Extents, Point};

/// Handle of a node inside a [`LayoutGraph`](crate::LayoutGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the node in its graph's insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node taking part in layout.
///
/// The working position starts out as the target's position and is copied
/// back only when the caller asks for it. `NaN` coordinates mean the node has
/// not been placed yet.
#[derive(Debug, Clone)]
pub struct DiagramNode<T> {
    target: T,
    extents: Extents,
    x: f64,
    y: f64,
    left_nodes: Vec<NodeId>,
    right_nodes: Vec<NodeId>,
}

impl<T> DiagramNode<T> {
    pub(crate) fn new(target: T, extents: Extents, position: Point) -> Self {
        Self {
            target,
            extents,
            x: position.x(),
            y: position.y(),
            left_nodes: Vec::new(),
            right_nodes: Vec::new(),
        }
    }

    /// The caller object this node stands for.
    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub(crate) fn into_target(self) -> T {
        self.target
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Working gravity point of the node.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// X-coordinate of the left edge of the node's box.
    pub fn left(&self) -> f64 {
        self.x - self.extents.left()
    }

    /// X-coordinate of the right edge of the node's box.
    pub fn right(&self) -> f64 {
        self.x + self.extents.right()
    }

    /// Y-coordinate of the top edge of the node's box.
    pub fn top(&self) -> f64 {
        self.y - self.extents.top()
    }

    /// Y-coordinate of the bottom edge of the node's box.
    pub fn bottom(&self) -> f64 {
        self.y + self.extents.bottom()
    }

    /// Box of the node at its working position.
    pub fn bounds(&self) -> Bounds {
        Bounds::around(self.position(), self.extents)
    }

    /// Returns true once both coordinates have been set.
    pub fn has_pos(&self) -> bool {
        !self.x.is_nan() && !self.y.is_nan()
    }

    /// Layout predecessors, in the order supplied by the caller.
    pub fn left_nodes(&self) -> &[NodeId] {
        &self.left_nodes
    }

    /// Layout successors, in the order supplied by the caller.
    pub fn right_nodes(&self) -> &[NodeId] {
        &self.right_nodes
    }

    pub(crate) fn left_nodes_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.left_nodes
    }

    pub(crate) fn right_nodes_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.right_nodes
    }

    pub(crate) fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    pub(crate) fn set_y(&mut self, y: f64) {
        self.y = y;
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.set_x(position.x());
        self.set_y(position.y());
    }

    /// Returns true if the two boxes come closer than the given separation.
    ///
    /// Touching at exactly the separation distance is not an overlap.
    pub fn overlaps<U>(&self, other: &DiagramNode<U>, x_sep: f64, y_sep: f64) -> bool {
        self.padded(x_sep, x_sep, y_sep, y_sep)
            .intersects(&other.bounds())
    }

    /// Returns true if `other` lies to the left and within the separation of this node.
    ///
    /// This node's box is grown by `x_sep` to the left and `y_sep` above and
    /// below before testing against `other`'s box.
    pub fn left_overlaps<U>(&self, other: &DiagramNode<U>, x_sep: f64, y_sep: f64) -> bool {
        other.x < self.x
            && self
                .padded(x_sep, 0.0, y_sep, y_sep)
                .intersects(&other.bounds())
    }

    /// Mirror of [`DiagramNode::left_overlaps`] towards the right.
    pub fn right_overlaps<U>(&self, other: &DiagramNode<U>, x_sep: f64, y_sep: f64) -> bool {
        other.x > self.x
            && self
                .padded(0.0, x_sep, y_sep, y_sep)
                .intersects(&other.bounds())
    }

    /// Returns true if `other` lies above and within the separation of this node.
    pub fn up_overlaps<U>(&self, other: &DiagramNode<U>, x_sep: f64, y_sep: f64) -> bool {
        other.y < self.y
            && self
                .padded(x_sep, x_sep, y_sep, 0.0)
                .intersects(&other.bounds())
    }

    /// Mirror of [`DiagramNode::up_overlaps`] downwards.
    pub fn down_overlaps<U>(&self, other: &DiagramNode<U>, x_sep: f64, y_sep: f64) -> bool {
        other.y > self.y
            && self
                .padded(x_sep, x_sep, 0.0, y_sep)
                .intersects(&other.bounds())
    }

    fn padded(&self, left: f64, right: f64, top: f64, bottom: f64) -> Bounds {
        self.bounds()
            .add_padding(Extents::new(left, right, top, bottom))
    }
}

impl<T: Clone> DiagramNode<T> {
    /// Returns a copy of this node moved to a new x-coordinate.
    pub fn with_x(&self, x: f64) -> Self {
        Self { x, ..self.clone() }
    }

    /// Returns a copy of this node moved to a new y-coordinate.
    pub fn with_y(&self, y: f64) -> Self {
        Self { y, ..self.clone() }
    }
}
