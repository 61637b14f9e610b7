//! Directional relaxation passes.
//!
//! A sweep visits every node after its upstream neighbours and moves it
//! inside the room left by its neighbours and siblings, centering branch
//! points between their branches. Rightward sweeps treat left neighbours as
//! upstream; leftward sweeps mirror every rule.

use std::collections::BTreeSet;

use log::trace;

use procflow_core::geometry::{Extents, Point};

use crate::node::NodeId;

use super::{
    Solver, TOLERANCE,
    traversal::{self, Direction},
};

impl<T> Solver<'_, T> {
    /// Runs one sweep over a partition and returns true if anything moved.
    ///
    /// With `push_fan_out` set, every branch point whose branches sit above
    /// it pushes them down. Otherwise only branch points that moved
    /// vertically during this sweep do.
    pub(super) fn sweep(
        &mut self,
        members: &[NodeId],
        direction: Direction,
        push_fan_out: bool,
    ) -> bool {
        let order = traversal::sweep_order(self.graph, members, direction);
        let mut changed = false;
        for id in order {
            changed |= self.relax(id, direction, push_fan_out);
        }
        changed
    }

    fn relax(&mut self, id: NodeId, direction: Direction, push_fan_out: bool) -> bool {
        self.stepper.report_layout_node(id);

        let hsep = self.hsep();
        let node = self.node(id);
        let extents = node.extents();
        let start = node.position();
        let left_nodes = node.left_nodes().to_vec();
        let right_nodes = node.right_nodes().to_vec();
        let forward = direction.forward(node).to_vec();
        let backward = direction.backward(node).to_vec();

        let (preceding, following) = self.siblings_around(id);
        if !preceding.is_empty() {
            self.stepper.report_siblings(id, &preceding, true);
        }
        if !following.is_empty() {
            self.stepper.report_siblings(id, &following, false);
        }

        let min_y = self.min_y(id, &preceding, direction);
        let max_y = self.max_y(id, &following, direction);

        let mut min_x = left_nodes
            .iter()
            .map(|&left| self.node(left).right() + hsep + extents.left())
            .fold(f64::NEG_INFINITY, f64::max);
        let mut max_x = right_nodes
            .iter()
            .map(|&right| self.node(right).left() - hsep - extents.right())
            .fold(f64::INFINITY, f64::min);
        if !left_nodes.is_empty() {
            self.stepper.report_min_x(id, &left_nodes, min_x);
        }
        if !right_nodes.is_empty() {
            self.stepper.report_max_x(id, &right_nodes, max_x);
        }

        let mut changed = false;
        let mut x = start.x();
        let mut y = start.y();

        // Not enough room between the neighbours: make room downstream
        if min_x > max_x + TOLERANCE {
            let shortfall = min_x - max_x;
            let downstream = traversal::closure(self.graph, id, direction);
            match direction {
                Direction::Right => {
                    x = min_x;
                    max_x += shortfall;
                    self.shift_all(&downstream, id, Point::new(shortfall, 0.0));
                }
                Direction::Left => {
                    x = max_x;
                    min_x -= shortfall;
                    self.shift_all(&downstream, id, Point::new(-shortfall, 0.0));
                }
            }
            trace!(node:% = id, shortfall, direction:?; "Made room downstream");
            changed = true;
        }

        if !left_nodes.is_empty() && !right_nodes.is_empty() {
            x = (min_x + max_x) / 2.0;
        }

        if let (Some(&above), Some(&below)) = (preceding.last(), following.first()) {
            y = (self.node(above).y() + self.node(below).y()) / 2.0;
        } else if forward.len() >= 2 {
            let (low, high) = self.y_range(&forward);
            y = (low + high) / 2.0;
        } else if forward.len() == 1 && backward.len() <= 1 {
            y = self.node(forward[0]).y();
        }

        // Lower bounds win over upper bounds
        if x > max_x {
            x = max_x;
        }
        if x < min_x {
            x = min_x;
        }
        if y > max_y {
            y = max_y;
        }
        if y < min_y {
            y = min_y;
        }

        let moved_y = (y - start.y()).abs() > TOLERANCE;
        changed |= self.commit(id, Point::new(x, y));

        if forward.len() >= 2 && (push_fan_out || moved_y) {
            let (low, high) = self.y_range(&forward);
            let center = (low + high) / 2.0;
            let current = self.node(id).y();
            if center < current - TOLERANCE {
                let offset = Point::new(0.0, current - center);
                for &next in &forward {
                    self.shift(next, offset);
                }
                trace!(node:% = id, offset = offset.y(); "Pushed fan-out down");
                changed = true;
            }
        }

        changed
    }

    /// Splits the siblings of a node into those above and below it.
    ///
    /// Siblings share a left neighbour, or a right neighbour for nodes
    /// without left neighbours, and are neither ancestors nor descendants of
    /// the node. Both halves are ordered top to bottom with ties broken by
    /// index.
    fn siblings_around(&self, id: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let lineage = traversal::lineage(self.graph, id);
        let node = self.node(id);
        let by_left = !node.left_nodes().is_empty();
        let shared = if by_left {
            node.left_nodes()
        } else {
            node.right_nodes()
        };

        let mut group = BTreeSet::from([id]);
        for &neighbour in shared {
            let other = self.node(neighbour);
            let list = if by_left {
                other.right_nodes()
            } else {
                other.left_nodes()
            };
            group.extend(list.iter().copied().filter(|sibling| !lineage.contains(sibling)));
        }

        let mut group: Vec<NodeId> = group.into_iter().collect();
        group.sort_by(|&a, &b| {
            self.node(a)
                .y()
                .total_cmp(&self.node(b).y())
                .then(a.cmp(&b))
        });

        match group.iter().position(|&member| member == id) {
            Some(at) => (group[..at].to_vec(), group[at + 1..].to_vec()),
            None => (Vec::new(), Vec::new()),
        }
    }

    /// Nodes occupied by siblings' branches that the node's own branch does
    /// not share, restricted to those horizontally closer to the node than
    /// the separation.
    fn sibling_region(
        &self,
        id: NodeId,
        siblings: &[NodeId],
        direction: Direction,
    ) -> Vec<NodeId> {
        let hsep = self.hsep();
        let own: BTreeSet<NodeId> = traversal::closure(self.graph, id, direction)
            .into_iter()
            .chain([id])
            .collect();

        let mut region = BTreeSet::new();
        for &sibling in siblings {
            region.insert(sibling);
            region.extend(traversal::closure(self.graph, sibling, direction));
        }

        let reach = hsep - TOLERANCE;
        let span = self
            .node(id)
            .bounds()
            .add_padding(Extents::new(reach, reach, 0.0, 0.0));
        region
            .into_iter()
            .filter(|member| !own.contains(member))
            .filter(|&member| span.overlaps_horizontally(&self.node(member).bounds()))
            .collect()
    }

    fn min_y(&mut self, id: NodeId, preceding: &[NodeId], direction: Direction) -> f64 {
        let vsep = self.vsep();
        let node = self.node(id);
        let (y, top) = (node.y(), node.extents().top());

        let bounding: Vec<NodeId> = self
            .sibling_region(id, preceding, direction)
            .into_iter()
            .filter(|&member| self.node(member).y() <= y)
            .collect();
        let min_y = bounding
            .iter()
            .map(|&member| self.node(member).bottom() + vsep + top)
            .fold(f64::NEG_INFINITY, f64::max);

        if !bounding.is_empty() {
            self.stepper.report_min_y(id, &bounding, min_y);
        }
        min_y
    }

    fn max_y(&mut self, id: NodeId, following: &[NodeId], direction: Direction) -> f64 {
        let vsep = self.vsep();
        let node = self.node(id);
        let (y, bottom) = (node.y(), node.extents().bottom());

        let bounding: Vec<NodeId> = self
            .sibling_region(id, following, direction)
            .into_iter()
            .filter(|&member| self.node(member).y() >= y)
            .collect();
        let max_y = bounding
            .iter()
            .map(|&member| self.node(member).top() - vsep - bottom)
            .fold(f64::INFINITY, f64::min);

        if !bounding.is_empty() {
            self.stepper.report_max_y(id, &bounding, max_y);
        }
        max_y
    }

    fn y_range(&self, ids: &[NodeId]) -> (f64, f64) {
        ids.iter()
            .map(|&id| self.node(id).y())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), y| {
                (low.min(y), high.max(y))
            })
    }

    fn shift_all(&mut self, ids: &[NodeId], except: NodeId, offset: Point) {
        for &id in ids {
            if id != except {
                self.shift(id, offset);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{config::LayoutConfig, graph::LayoutGraph, stepper::NoopStepper};

    fn graph_at(
        positions: &[(f64, f64)],
        edges: &[(usize, usize)],
    ) -> (LayoutGraph<()>, Vec<NodeId>) {
        let mut graph = LayoutGraph::new();
        let ids: Vec<_> = positions
            .iter()
            .map(|&(x, y)| graph.add_node_at((), Extents::uniform(10.0), Point::new(x, y)))
            .collect();
        for &(from, to) in edges {
            graph.connect(ids[from], ids[to]).unwrap();
        }
        (graph, ids)
    }

    fn sweep_once(
        graph: &mut LayoutGraph<()>,
        direction: Direction,
        push_fan_out: bool,
    ) -> bool {
        let config = LayoutConfig::default();
        let mut stepper = NoopStepper;
        let members: Vec<_> = graph.node_ids().collect();
        let mut solver = Solver {
            graph,
            config: &config,
            stepper: &mut stepper,
        };
        solver.sweep(&members, direction, push_fan_out)
    }

    #[test]
    fn test_branch_point_is_centered() {
        let (mut graph, ids) = graph_at(
            &[(10.0, 10.0), (70.0, 10.0), (70.0, 60.0)],
            &[(0, 1), (0, 2)],
        );

        assert!(sweep_once(&mut graph, Direction::Right, true));
        assert_approx_eq!(f64, graph.node(ids[0]).y(), 35.0);
        assert_approx_eq!(f64, graph.node(ids[1]).y(), 10.0);
        assert_approx_eq!(f64, graph.node(ids[2]).y(), 60.0);

        // Converged in both directions
        assert!(!sweep_once(&mut graph, Direction::Left, true));
        assert!(!sweep_once(&mut graph, Direction::Right, false));
    }

    #[test]
    fn test_crowded_node_pushes_downstream_right() {
        let (mut graph, ids) = graph_at(
            &[(10.0, 10.0), (50.0, 10.0), (90.0, 10.0), (200.0, 10.0)],
            &[(0, 1), (1, 2), (2, 3)],
        );

        assert!(sweep_once(&mut graph, Direction::Right, true));
        for pair in ids.windows(2) {
            let gap = graph.node(pair[1]).x() - graph.node(pair[0]).x();
            assert!(gap >= 60.0 - TOLERANCE, "gap {gap} between {} and {}", pair[0], pair[1]);
        }
        // The tail was shifted by the shortfall
        assert_approx_eq!(f64, graph.node(ids[3]).x(), 220.0);
    }

    #[test]
    fn test_crowded_node_pushes_upstream_left() {
        let (mut graph, ids) = graph_at(
            &[(10.0, 10.0), (50.0, 10.0), (110.0, 10.0)],
            &[(0, 1), (1, 2)],
        );

        assert!(sweep_once(&mut graph, Direction::Left, true));
        // B keeps its distance to C, A gives way by the same shortfall
        assert_approx_eq!(f64, graph.node(ids[2]).x(), 110.0);
        assert_approx_eq!(f64, graph.node(ids[1]).x(), 50.0);
        assert_approx_eq!(f64, graph.node(ids[0]).x(), -10.0);
    }

    #[test]
    fn test_middle_node_is_centered_horizontally() {
        let (mut graph, ids) = graph_at(
            &[(10.0, 10.0), (100.0, 10.0), (250.0, 10.0)],
            &[(0, 1), (1, 2)],
        );

        sweep_once(&mut graph, Direction::Right, true);
        // Room is [70, 190]
        assert_approx_eq!(f64, graph.node(ids[1]).x(), 130.0);
    }

    #[test]
    fn test_sibling_bounds() {
        let (mut graph, ids) = graph_at(
            &[(10.0, 35.0), (70.0, 40.0), (70.0, 80.0), (130.0, -50.0)],
            &[(0, 1), (0, 2), (1, 3)],
        );
        let config = LayoutConfig::default();
        let mut stepper = NoopStepper;
        let mut solver = Solver {
            graph: &mut graph,
            config: &config,
            stepper: &mut stepper,
        };

        let (above, below) = solver.siblings_around(ids[1]);
        assert!(above.is_empty());
        assert_eq!(below, vec![ids[2]]);
        assert_approx_eq!(f64, solver.max_y(ids[1], &below, Direction::Right), 30.0);

        // The branch of node 1 continues at node 3, which is not beside node 2
        assert_approx_eq!(f64, solver.min_y(ids[2], &[ids[1]], Direction::Right), 90.0);
    }

    #[test]
    fn test_skip_edge_target_is_not_a_sibling() {
        // Node 0 lists node 2 next to node 1, but node 2 follows node 1
        let (mut graph, ids) = graph_at(
            &[(10.0, 10.0), (70.0, 10.0), (130.0, 10.0)],
            &[(0, 1), (1, 2), (0, 2)],
        );
        let config = LayoutConfig::default();
        let mut stepper = NoopStepper;
        let solver = Solver {
            graph: &mut graph,
            config: &config,
            stepper: &mut stepper,
        };

        assert_eq!(solver.siblings_around(ids[1]), (Vec::new(), Vec::new()));
        assert_eq!(solver.siblings_around(ids[2]), (Vec::new(), Vec::new()));

        // A straight line is already balanced
        assert!(!sweep_once(&mut graph, Direction::Right, true));
        assert!(!sweep_once(&mut graph, Direction::Left, true));
    }

    #[test]
    fn test_fan_out_is_pushed_below_pinned_node() {
        // Node 2 cannot rise past node 1, so its branches move down instead
        let positions = [
            (10.0, 35.0),
            (70.0, 10.0),
            (70.0, 60.0),
            (130.0, 10.0),
            (130.0, 60.0),
        ];
        let edges = [(0, 1), (0, 2), (2, 3), (2, 4)];

        let (mut graph, ids) = graph_at(&positions, &edges);
        assert!(sweep_once(&mut graph, Direction::Right, true));
        assert_approx_eq!(f64, graph.node(ids[2]).y(), 60.0);
        assert_approx_eq!(f64, graph.node(ids[3]).y(), 35.0);
        assert_approx_eq!(f64, graph.node(ids[4]).y(), 85.0);

        // Without the flag, only a branch point that moved pushes
        let (mut graph, ids) = graph_at(&positions, &edges);
        sweep_once(&mut graph, Direction::Right, false);
        assert_approx_eq!(f64, graph.node(ids[3]).y(), 10.0);
        assert_approx_eq!(f64, graph.node(ids[4]).y(), 60.0);
    }
}
