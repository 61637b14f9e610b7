//! Horizontal compaction.

use log::debug;

use procflow_core::geometry::Point;

use crate::node::NodeId;

use super::{
    Solver, TOLERANCE,
    traversal::{self, Direction},
};

impl<T> Solver<'_, T> {
    /// Pulls a partition together horizontally.
    ///
    /// The leftmost source stays where it is. Every node gets the smallest x
    /// its left neighbours allow, measured from that anchor, and the largest
    /// x that still leaves room for the farthest node. Nodes outside that
    /// range are clamped into it; y is untouched.
    pub(super) fn tighten(&mut self, members: &[NodeId]) -> bool {
        let Some(anchor) = members
            .iter()
            .copied()
            .filter(|&id| self.node(id).left_nodes().is_empty())
            .min_by(|&a, &b| {
                self.node(a)
                    .x()
                    .total_cmp(&self.node(b).x())
                    .then(a.cmp(&b))
            })
        else {
            return false;
        };

        let hsep = self.hsep();
        let order = traversal::sweep_order(self.graph, members, Direction::Right);

        let mut min_x = vec![f64::NEG_INFINITY; self.graph.len()];
        min_x[anchor.index()] = self.node(anchor).x();
        for &id in &order {
            let from = min_x[id.index()];
            if !from.is_finite() {
                continue;
            }
            let node = self.node(id);
            let reach = from + node.extents().right() + hsep;
            for &right in node.right_nodes() {
                let bound = reach + self.node(right).extents().left();
                if bound > min_x[right.index()] {
                    min_x[right.index()] = bound;
                }
            }
        }

        let mut max_x = vec![f64::INFINITY; self.graph.len()];
        if let Some(end) = members
            .iter()
            .copied()
            .filter(|id| min_x[id.index()].is_finite())
            .max_by(|&a, &b| {
                min_x[a.index()]
                    .total_cmp(&min_x[b.index()])
                    .then(b.cmp(&a))
            })
        {
            max_x[end.index()] = min_x[end.index()];
            debug!(
                anchor:% = anchor,
                end:% = end,
                width = min_x[end.index()] - min_x[anchor.index()];
                "Tightening partition"
            );
        }
        for &id in order.iter().rev() {
            let from = max_x[id.index()];
            if !from.is_finite() {
                continue;
            }
            let node = self.node(id);
            let reach = from - node.extents().left() - hsep;
            for &left in node.left_nodes() {
                let bound = reach - self.node(left).extents().right();
                if bound < max_x[left.index()] {
                    max_x[left.index()] = bound;
                }
            }
        }

        let mut changed = false;
        for &id in members {
            let node = self.node(id);
            let mut x = node.x();
            let (low, high) = (min_x[id.index()], max_x[id.index()]);
            if x > high {
                x = high;
            }
            if x < low {
                x = low;
            }
            if (x - node.x()).abs() > TOLERANCE {
                let y = node.y();
                self.move_to(id, Point::new(x, y));
                changed = true;
            }
        }
        changed
    }
}
