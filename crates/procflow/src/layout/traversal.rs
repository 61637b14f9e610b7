//! Directional traversal helpers shared by the passes.

use std::collections::{BTreeSet, VecDeque};

use crate::{
    graph::LayoutGraph,
    node::{DiagramNode, NodeId},
};

/// Direction of a sweep pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Direction {
    /// From nodes without left neighbours towards the right.
    Right,
    /// From nodes without right neighbours towards the left.
    Left,
}

impl Direction {
    /// Even passes sweep right, odd passes sweep left.
    pub(super) fn for_pass(pass: usize) -> Self {
        if pass % 2 == 0 {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Neighbours the sweep moves towards.
    pub(super) fn forward<T>(self, node: &DiagramNode<T>) -> &[NodeId] {
        match self {
            Self::Right => node.right_nodes(),
            Self::Left => node.left_nodes(),
        }
    }

    /// Neighbours the sweep comes from.
    pub(super) fn backward<T>(self, node: &DiagramNode<T>) -> &[NodeId] {
        match self {
            Self::Right => node.left_nodes(),
            Self::Left => node.right_nodes(),
        }
    }
}

/// Orders the members so that every node comes after its backward neighbours.
///
/// Sources (members without backward neighbours) start in index order. When
/// only cycle members remain, the lowest index among them is forced next.
pub(super) fn sweep_order<T>(
    graph: &LayoutGraph<T>,
    members: &[NodeId],
    direction: Direction,
) -> Vec<NodeId> {
    let mut remaining = vec![0usize; graph.len()];
    for &id in members {
        remaining[id.index()] = direction.backward(graph.node(id)).len();
    }

    let mut done = vec![false; graph.len()];
    let mut order = Vec::with_capacity(members.len());
    let mut queue: VecDeque<NodeId> = members
        .iter()
        .copied()
        .filter(|id| remaining[id.index()] == 0)
        .collect();

    loop {
        while let Some(id) = queue.pop_front() {
            if done[id.index()] {
                continue;
            }
            done[id.index()] = true;
            order.push(id);

            for &next in direction.forward(graph.node(id)) {
                if done[next.index()] {
                    continue;
                }
                let count = &mut remaining[next.index()];
                *count = count.saturating_sub(1);
                if *count == 0 {
                    queue.push_back(next);
                }
            }
        }

        match members.iter().find(|id| !done[id.index()]) {
            Some(&forced) => queue.push_back(forced),
            None => break,
        }
    }

    order
}

/// Returns every node reachable from `start` through forward neighbours,
/// excluding `start` itself, sorted by index.
pub(super) fn closure<T>(
    graph: &LayoutGraph<T>,
    start: NodeId,
    direction: Direction,
) -> Vec<NodeId> {
    let mut visited = vec![false; graph.len()];
    visited[start.index()] = true;

    let mut reached = Vec::new();
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        for &next in direction.forward(graph.node(id)) {
            if !visited[next.index()] {
                visited[next.index()] = true;
                reached.push(next);
                stack.push(next);
            }
        }
    }

    reached.sort_unstable();
    reached
}

/// Ancestors and descendants of `start`, which never count as its siblings.
pub(super) fn lineage<T>(graph: &LayoutGraph<T>, start: NodeId) -> BTreeSet<NodeId> {
    closure(graph, start, Direction::Right)
        .into_iter()
        .chain(closure(graph, start, Direction::Left))
        .collect()
}

#[cfg(test)]
mod tests {
    use procflow_core::geometry::Extents;

    use super::*;

    fn graph_with(count: usize, edges: &[(usize, usize)]) -> (LayoutGraph<()>, Vec<NodeId>) {
        let mut graph = LayoutGraph::new();
        let ids: Vec<_> = (0..count)
            .map(|_| graph.add_node((), Extents::uniform(5.0)))
            .collect();
        for &(from, to) in edges {
            graph.connect(ids[from], ids[to]).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn test_direction_alternates() {
        assert_eq!(Direction::for_pass(0), Direction::Right);
        assert_eq!(Direction::for_pass(1), Direction::Left);
        assert_eq!(Direction::for_pass(8), Direction::Right);
    }

    #[test]
    fn test_sweep_order_waits_for_all_upstream() {
        // 3 joins 1 and 2, 2 is only reachable through 0
        let (graph, ids) = graph_with(4, &[(0, 2), (1, 3), (2, 3)]);

        let rightward = sweep_order(&graph, &ids, Direction::Right);
        assert_eq!(rightward, vec![ids[0], ids[1], ids[2], ids[3]]);

        let leftward = sweep_order(&graph, &ids, Direction::Left);
        assert_eq!(leftward, vec![ids[3], ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_sweep_order_diamond() {
        let (graph, ids) = graph_with(4, &[(0, 2), (0, 1), (2, 3), (1, 3)]);
        let order = sweep_order(&graph, &ids, Direction::Right);
        // Caller order of right nodes is kept
        assert_eq!(order, vec![ids[0], ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn test_sweep_order_terminates_on_cycles() {
        let (graph, ids) = graph_with(3, &[(0, 1), (1, 2), (2, 0)]);
        let order = sweep_order(&graph, &ids, Direction::Right);
        assert_eq!(order, vec![ids[0], ids[1], ids[2]]);
    }

    #[test]
    fn test_closure() {
        let (graph, ids) = graph_with(5, &[(0, 1), (1, 2), (0, 3), (4, 2)]);

        assert_eq!(
            closure(&graph, ids[0], Direction::Right),
            vec![ids[1], ids[2], ids[3]]
        );
        assert_eq!(
            closure(&graph, ids[2], Direction::Left),
            vec![ids[0], ids[1], ids[4]]
        );
        assert!(closure(&graph, ids[3], Direction::Right).is_empty());
    }

    #[test]
    fn test_lineage_spans_both_directions() {
        let (graph, ids) = graph_with(5, &[(0, 1), (1, 2), (0, 2), (3, 2)]);

        let related: Vec<_> = lineage(&graph, ids[1]).into_iter().collect();
        assert_eq!(related, vec![ids[0], ids[2]]);
        // Node 3 shares a right neighbour with node 1 but is not related to it
        assert!(!lineage(&graph, ids[3]).contains(&ids[1]));
    }

    #[test]
    fn test_closure_of_cycle_excludes_start() {
        let (mut graph, ids) = graph_with(2, &[(0, 1)]);
        graph.set_right_nodes(ids[1], vec![ids[0]]);

        assert_eq!(closure(&graph, ids[0], Direction::Right), vec![ids[1]]);
    }
}
