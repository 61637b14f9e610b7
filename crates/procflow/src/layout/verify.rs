//! Overlap resolution.

use log::trace;

use procflow_core::geometry::Point;

use crate::node::NodeId;

use super::{Solver, TOLERANCE};

impl<T> Solver<'_, T> {
    /// Moves nodes right or down until no two members come closer than the
    /// configured separation.
    ///
    /// Nodes are resolved top to bottom, then left to right. Each one is
    /// pushed past every already resolved node it overlaps, taking whichever
    /// of the right or down move is shorter. Overlaps are detected on all
    /// sides, since a resolved node may reach below the node's center. The
    /// right move is only open past a blocker that also
    /// [left-overlaps](crate::node::DiagramNode::left_overlaps) the node;
    /// everything else, ties included, goes down. Resolved nodes never move
    /// again, so one push per resolved node is enough.
    pub(super) fn verify(&mut self, members: &[NodeId]) -> bool {
        let hsep = self.hsep();
        let vsep = self.vsep();
        let (x_sep, y_sep) = (hsep - TOLERANCE, vsep - TOLERANCE);

        let mut order = members.to_vec();
        order.sort_by(|&a, &b| {
            let (a_node, b_node) = (self.node(a), self.node(b));
            a_node
                .top()
                .total_cmp(&b_node.top())
                .then(a_node.left().total_cmp(&b_node.left()))
                .then(a.cmp(&b))
        });

        let mut changed = false;
        let mut resolved: Vec<NodeId> = Vec::with_capacity(order.len());
        for id in order {
            for _ in 0..=resolved.len() {
                let node = self.node(id);
                let Some(&blocker) = resolved.iter().find(|&&other| {
                    node.overlaps(self.node(other), x_sep, y_sep)
                }) else {
                    break;
                };

                let other = self.node(blocker);
                let min_x = other.right() + hsep + node.extents().left();
                let min_y = other.bottom() + vsep + node.extents().top();
                let from_left = node.left_overlaps(other, x_sep, y_sep);
                let position = node.position();

                let offset = if from_left && min_x - position.x() < min_y - position.y() {
                    self.stepper.report_min_x(id, &[blocker], min_x);
                    Point::new(min_x - position.x(), 0.0)
                } else {
                    self.stepper.report_min_y(id, &[blocker], min_y);
                    Point::new(0.0, min_y - position.y())
                };
                trace!(node:% = id, blocker:% = blocker, offset:?; "Resolving overlap");
                self.shift(id, offset);
                changed = true;
            }
            resolved.push(id);
        }
        changed
    }
}
