//! Initial placement of nodes without a position.

use log::trace;

use procflow_core::geometry::Point;

use crate::node::NodeId;

use super::{Solver, traversal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    Active,
    Done,
}

impl<T> Solver<'_, T> {
    /// Places every unset member of a partition.
    ///
    /// A node is placed only after its left neighbours and its preceding
    /// siblings, walking an explicit stack. Nodes already on the stack are
    /// skipped, so cycles cannot recurse forever; their placement then simply
    /// ignores the still-unset dependency.
    pub(super) fn place_unset(&mut self, members: &[NodeId], floor: f64) -> bool {
        let mut state = vec![Visit::Pending; self.graph.len()];
        let mut changed = false;

        for &root in members {
            if state[root.index()] != Visit::Pending || self.node(root).has_pos() {
                continue;
            }

            let mut stack = vec![(root, false)];
            while let Some((id, expanded)) = stack.pop() {
                if expanded {
                    changed |= self.place(id, floor);
                    state[id.index()] = Visit::Done;
                    continue;
                }
                if state[id.index()] != Visit::Pending {
                    continue;
                }

                state[id.index()] = Visit::Active;
                stack.push((id, true));
                for dependency in self.dependencies(id).into_iter().rev() {
                    if state[dependency.index()] == Visit::Pending
                        && !self.node(dependency).has_pos()
                    {
                        stack.push((dependency, false));
                    }
                }
            }
        }

        changed
    }

    /// Left neighbours followed by preceding siblings.
    fn dependencies(&self, id: NodeId) -> Vec<NodeId> {
        let mut dependencies = self.node(id).left_nodes().to_vec();
        for sibling in self.preceding_siblings(id) {
            if !dependencies.contains(&sibling) {
                dependencies.push(sibling);
            }
        }
        dependencies
    }

    /// Nodes listed before `id` by a shared neighbour.
    ///
    /// Left neighbours' right lists are used; a node without left neighbours
    /// looks at its right neighbours' left lists instead. Ancestors and
    /// descendants of `id` are skipped even when a neighbour lists them.
    fn preceding_siblings(&self, id: NodeId) -> Vec<NodeId> {
        let lineage = traversal::lineage(self.graph, id);
        let node = self.node(id);
        let by_left = !node.left_nodes().is_empty();
        let shared = if by_left {
            node.left_nodes()
        } else {
            node.right_nodes()
        };

        let mut siblings = Vec::new();
        for &neighbour in shared {
            let other = self.node(neighbour);
            let list = if by_left {
                other.right_nodes()
            } else {
                other.left_nodes()
            };
            for &sibling in list.iter().take_while(|&&sibling| sibling != id) {
                if !lineage.contains(&sibling) && !siblings.contains(&sibling) {
                    siblings.push(sibling);
                }
            }
        }
        siblings
    }

    /// Computes the first position of one node from its placed dependencies.
    fn place(&mut self, id: NodeId, floor: f64) -> bool {
        let hsep = self.hsep();
        let vsep = self.vsep();
        let node = self.node(id);
        let extents = node.extents();

        let lefts: Vec<NodeId> = node
            .left_nodes()
            .iter()
            .copied()
            .filter(|&left| self.node(left).has_pos())
            .collect();
        let siblings: Vec<NodeId> = self
            .preceding_siblings(id)
            .into_iter()
            .filter(|&sibling| self.node(sibling).has_pos())
            .collect();

        let below_siblings = siblings
            .iter()
            .map(|&sibling| self.node(sibling).bottom() + vsep + extents.top())
            .fold(f64::NEG_INFINITY, f64::max);

        let position = if lefts.is_empty() {
            let top = floor + extents.top();
            if siblings.is_empty() {
                Point::new(extents.left(), top)
            } else {
                let x = average(siblings.iter().map(|&sibling| self.node(sibling).x()));
                Point::new(x, below_siblings.max(top))
            }
        } else {
            let x = lefts
                .iter()
                .map(|&left| self.node(left).right())
                .fold(f64::NEG_INFINITY, f64::max)
                + hsep
                + extents.left();
            let y = average(lefts.iter().map(|&left| self.node(left).y()));
            Point::new(x, below_siblings.max(y))
        };

        trace!(node:% = id, x = position.x(), y = position.y(); "Initial placement");
        self.commit(id, position)
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    sum / count as f64
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use procflow_core::geometry::Extents;

    use super::*;
    use crate::{config::LayoutConfig, graph::LayoutGraph, stepper::NoopStepper};

    fn place_all(graph: &mut LayoutGraph<()>, floor: f64) -> bool {
        let config = LayoutConfig::default();
        let mut stepper = NoopStepper;
        let members: Vec<_> = graph.node_ids().collect();
        let mut solver = Solver {
            graph,
            config: &config,
            stepper: &mut stepper,
        };
        solver.place_unset(&members, floor)
    }

    fn graph_with(count: usize, edges: &[(usize, usize)]) -> (LayoutGraph<()>, Vec<NodeId>) {
        let mut graph = LayoutGraph::new();
        let ids: Vec<_> = (0..count)
            .map(|_| graph.add_node((), Extents::uniform(10.0)))
            .collect();
        for &(from, to) in edges {
            graph.connect(ids[from], ids[to]).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn test_chain_is_placed_left_to_right() {
        let (mut graph, ids) = graph_with(3, &[(0, 1), (1, 2)]);
        assert!(place_all(&mut graph, 0.0));

        assert_eq!(graph.position(ids[0]), Point::new(10.0, 10.0));
        assert_eq!(graph.position(ids[1]), Point::new(70.0, 10.0));
        assert_eq!(graph.position(ids[2]), Point::new(130.0, 10.0));
    }

    #[test]
    fn test_branches_stack_below_each_other() {
        let (mut graph, ids) = graph_with(4, &[(0, 1), (0, 2), (0, 3)]);
        place_all(&mut graph, 0.0);

        assert_eq!(graph.position(ids[1]), Point::new(70.0, 10.0));
        assert_eq!(graph.position(ids[2]), Point::new(70.0, 60.0));
        assert_eq!(graph.position(ids[3]), Point::new(70.0, 110.0));
    }

    #[test]
    fn test_siblings_are_placed_first_regardless_of_index() {
        // Node 0 is listed second by node 2, so node 1 must go above it
        let (mut graph, ids) = graph_with(3, &[(2, 1), (2, 0)]);
        place_all(&mut graph, 0.0);

        assert_approx_eq!(f64, graph.node(ids[1]).y(), 10.0);
        assert_approx_eq!(f64, graph.node(ids[0]).y(), 60.0);
    }

    #[test]
    fn test_skip_edge_stays_on_one_line() {
        // Node 0 lists node 2 after node 1, but node 2 depends on node 1
        let (mut graph, ids) = graph_with(3, &[(0, 1), (1, 2), (0, 2)]);
        place_all(&mut graph, 0.0);

        assert_eq!(graph.position(ids[0]), Point::new(10.0, 10.0));
        assert_eq!(graph.position(ids[1]), Point::new(70.0, 10.0));
        assert_eq!(graph.position(ids[2]), Point::new(130.0, 10.0));
    }

    #[test]
    fn test_join_inputs_stack_on_floor() {
        let (mut graph, ids) = graph_with(3, &[(0, 2), (1, 2)]);
        place_all(&mut graph, 100.0);

        assert_eq!(graph.position(ids[0]), Point::new(10.0, 110.0));
        // Same column as the sibling above, one separation below it
        assert_eq!(graph.position(ids[1]), Point::new(10.0, 160.0));
        // Average of both inputs
        assert_eq!(graph.position(ids[2]), Point::new(70.0, 135.0));
    }

    #[test]
    fn test_placed_nodes_are_kept() {
        let (mut graph, ids) = graph_with(2, &[(0, 1)]);
        graph.set_position(ids[0], Point::new(300.0, 40.0));

        assert!(place_all(&mut graph, 0.0));
        assert_eq!(graph.position(ids[0]), Point::new(300.0, 40.0));
        assert_eq!(graph.position(ids[1]), Point::new(360.0, 40.0));

        // Nothing left to place
        assert!(!place_all(&mut graph, 0.0));
    }

    #[test]
    fn test_cycle_is_placed_without_looping() {
        let (mut graph, ids) = graph_with(3, &[(0, 1), (1, 2), (2, 0)]);
        assert!(place_all(&mut graph, 0.0));

        for &id in &ids {
            assert!(graph.node(id).has_pos());
            assert!(graph.position(id).is_finite());
        }
    }

    #[test]
    fn test_average() {
        assert_approx_eq!(f64, average([1.0, 2.0, 6.0].into_iter()), 3.0);
    }
}
