//! Splitting the graph into connected partitions.

use std::collections::VecDeque;

use crate::{graph::LayoutGraph, node::NodeId};

/// Groups the nodes into maximal connected components.
///
/// Components are found by flood fill through both adjacency lists, starting
/// from the lowest unvisited index. Links are followed both ways, so a node
/// listed only by its neighbour still joins that neighbour's partition.
/// Members of each partition are sorted by index, and partitions are ordered
/// by their lowest member.
pub(super) fn partitions<T>(graph: &LayoutGraph<T>) -> Vec<Vec<NodeId>> {
    let mut links = vec![Vec::new(); graph.len()];
    for id in graph.node_ids() {
        let node = graph.node(id);
        for &neighbour in node.left_nodes().iter().chain(node.right_nodes()) {
            links[id.index()].push(neighbour);
            links[neighbour.index()].push(id);
        }
    }

    let mut visited = vec![false; graph.len()];
    let mut partitions = Vec::new();

    for start in graph.node_ids() {
        if visited[start.index()] {
            continue;
        }
        visited[start.index()] = true;

        let mut members = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            members.push(id);
            for &neighbour in &links[id.index()] {
                if !visited[neighbour.index()] {
                    visited[neighbour.index()] = true;
                    queue.push_back(neighbour);
                }
            }
        }

        members.sort_unstable();
        partitions.push(members);
    }

    partitions
}
