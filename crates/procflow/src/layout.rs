//! The incremental layout solver.
//!
//! [`LayoutAlgorithm::layout`] arranges every node of a [`LayoutGraph`]:
//!
//! 1. the graph is split into connected partitions,
//! 2. unset nodes of each partition get an initial position,
//! 3. the partition is either compacted ("tighten") or checked for overlaps,
//! 4. up to [`PASS_COUNT`] directional sweeps relax positions until one pass
//!    in each direction moves nothing, each followed by an overlap check,
//! 5. the partition is translated to the origin, below the previous one.
//!
//! The solver works on the graph's working positions only; copying them back
//! to the caller's objects is up to the caller.

mod normalize;
mod partition;
mod placement;
mod sweep;
mod tighten;
mod traversal;
mod verify;

use std::fmt;

use log::{debug, info, warn};

use procflow_core::geometry::Point;

use crate::{
    config::LayoutConfig,
    error::LayoutError,
    graph::LayoutGraph,
    node::{DiagramNode, NodeId},
    stepper::{LayoutStepper, NoopStepper},
};

use traversal::Direction;

/// Coordinates closer than this are considered equal.
pub const TOLERANCE: f64 = 0.1;

/// Maximum number of sweep passes per partition.
pub const PASS_COUNT: usize = 9;

/// The layout solver, configured once and reusable across calls.
pub struct LayoutAlgorithm {
    config: LayoutConfig,
    stepper: Box<dyn LayoutStepper + Send>,
}

impl Default for LayoutAlgorithm {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl fmt::Debug for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutAlgorithm")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LayoutAlgorithm {
    /// Creates a solver that reports to no one.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            stepper: Box::new(NoopStepper),
        }
    }

    /// Replaces the stepper notified by [`LayoutAlgorithm::layout`].
    pub fn with_stepper(mut self, stepper: impl LayoutStepper + Send + 'static) -> Self {
        self.stepper = Box::new(stepper);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out every node of the graph.
    ///
    /// Returns true if any working position ends up more than [`TOLERANCE`]
    /// away from where it was before the call. Moves that cancel out, such as
    /// a sweep followed by normalization back to the origin, do not count.
    ///
    /// # Errors
    ///
    /// Fails before touching any coordinate if the graph does not pass
    /// [`LayoutGraph::validate`] or the configured stepper refuses to run on
    /// the current thread. Fails with [`LayoutError::NonFiniteCoordinate`] if a
    /// node ends up at an infinite position.
    pub fn layout<T>(&mut self, graph: &mut LayoutGraph<T>) -> Result<bool, LayoutError> {
        run(&self.config, self.stepper.as_mut(), graph)
    }

    /// Like [`LayoutAlgorithm::layout`], reporting to a borrowed stepper
    /// instead of the configured one.
    ///
    /// # Errors
    ///
    /// See [`LayoutAlgorithm::layout`].
    pub fn layout_with<T>(
        &self,
        graph: &mut LayoutGraph<T>,
        stepper: &mut dyn LayoutStepper,
    ) -> Result<bool, LayoutError> {
        run(&self.config, stepper, graph)
    }
}

fn run<T>(
    config: &LayoutConfig,
    stepper: &mut dyn LayoutStepper,
    graph: &mut LayoutGraph<T>,
) -> Result<bool, LayoutError> {
    stepper.check_thread()?;
    graph.validate()?;

    if graph.has_cycle() {
        warn!(nodes = graph.len(); "Layout adjacency contains a cycle, result may not converge");
    }

    let partitions = partition::partitions(graph);
    info!(
        nodes = graph.len(),
        partitions = partitions.len(),
        tighten = config.tighten();
        "Starting layout"
    );

    let mut solver = Solver {
        graph,
        config,
        stepper,
    };

    let mut changed = false;
    let mut floor = 0.0;
    for (index, members) in partitions.iter().enumerate() {
        let partition_changed = solver.layout_partition(members, floor)?;
        debug!(partition = index, nodes = members.len(), floor, changed = partition_changed; "Partition laid out");
        changed |= partition_changed;
        floor = solver.max_bottom(members) + config.vertical_separation();
    }

    info!(changed; "Layout finished");
    Ok(changed)
}

/// Mutable state of one layout call.
struct Solver<'a, T> {
    graph: &'a mut LayoutGraph<T>,
    config: &'a LayoutConfig,
    stepper: &'a mut dyn LayoutStepper,
}

impl<T> Solver<'_, T> {
    /// Lays out one partition and returns true if any member ended up more
    /// than [`TOLERANCE`] away from where it started.
    ///
    /// Sweeps stop once a rightward and a leftward pass in a row leave
    /// everything in place, so a converged partition is stable in both
    /// directions and a repeated call finds nothing to do.
    fn layout_partition(&mut self, members: &[NodeId], floor: f64) -> Result<bool, LayoutError> {
        let start: Vec<Point> = members.iter().map(|&id| self.graph.position(id)).collect();

        let placed = self.place_unset(members, floor);
        if self.config.tighten() {
            self.tighten(members);
        } else if !placed {
            self.verify(members);
        }

        let mut settled = 0;
        for pass in 0..PASS_COUNT {
            self.stepper.report_pass(pass);
            let direction = Direction::for_pass(pass);
            // Only fresh placements push every fan-out, and only twice
            let swept = self.sweep(members, direction, placed && pass < 2);
            let verified = self.verify(members);
            debug!(pass, direction:?, swept, verified; "Sweep pass finished");

            if swept || verified {
                settled = 0;
            } else {
                settled += 1;
                if settled == 2 {
                    break;
                }
            }
        }
        if settled < 2 {
            debug!(nodes = members.len(); "Partition did not settle within the pass limit");
        }

        self.normalize(members, floor)?;
        Ok(members.iter().zip(&start).any(|(&id, from)| {
            let to = self.graph.position(id);
            differs(from.x(), to.x()) || differs(from.y(), to.y())
        }))
    }

    fn node(&self, id: NodeId) -> &DiagramNode<T> {
        self.graph.node(id)
    }

    fn hsep(&self) -> f64 {
        self.config.horizontal_separation()
    }

    fn vsep(&self) -> f64 {
        self.config.vertical_separation()
    }

    fn max_bottom(&self, members: &[NodeId]) -> f64 {
        members
            .iter()
            .map(|&id| self.node(id).bottom())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Moves a node, reporting the move first.
    fn move_to(&mut self, id: NodeId, to: Point) {
        let from = self.graph.position(id);
        self.stepper.report_move(id, from, to);
        self.graph.set_position(id, to);
    }

    /// Moves a node by an offset.
    fn shift(&mut self, id: NodeId, offset: Point) {
        let to = self.graph.position(id).add_point(offset);
        self.move_to(id, to);
    }

    /// Moves a node to `to`, keeping every coordinate that moves no further
    /// than [`TOLERANCE`]. Returns true if the node moved.
    fn commit(&mut self, id: NodeId, to: Point) -> bool {
        let from = self.graph.position(id);
        let move_x = differs(from.x(), to.x());
        let move_y = differs(from.y(), to.y());
        if !move_x && !move_y {
            return false;
        }

        let x = if move_x { to.x() } else { from.x() };
        let y = if move_y { to.y() } else { from.y() };
        self.move_to(id, Point::new(x, y));
        true
    }
}

/// Returns true if `new` replaces an unset `old` or moves away from it by
/// more than [`TOLERANCE`].
fn differs(old: f64, new: f64) -> bool {
    old.is_nan() || (new - old).abs() > TOLERANCE
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use procflow_core::geometry::Extents;

    use super::*;
    use crate::stepper::StepEvent;

    fn chain(count: usize) -> (LayoutGraph<()>, Vec<NodeId>) {
        let mut graph = LayoutGraph::new();
        let ids: Vec<_> = (0..count)
            .map(|_| graph.add_node((), Extents::uniform(10.0)))
            .collect();
        for pair in ids.windows(2) {
            graph.connect(pair[0], pair[1]).unwrap();
        }
        (graph, ids)
    }

    #[test]
    fn test_differs() {
        assert!(differs(f64::NAN, 0.0));
        assert!(differs(0.0, 0.2));
        assert!(!differs(0.0, 0.05));
        assert!(!differs(3.0, 3.0));
    }

    #[test]
    fn test_chain_layout() {
        let (mut graph, ids) = chain(3);
        let changed = LayoutAlgorithm::default().layout(&mut graph).unwrap();

        assert!(changed);
        assert_approx_eq!(f64, graph.node(ids[0]).x(), 10.0);
        assert_approx_eq!(f64, graph.node(ids[1]).x(), 70.0);
        assert_approx_eq!(f64, graph.node(ids[2]).x(), 130.0);
        for &id in &ids {
            assert_approx_eq!(f64, graph.node(id).y(), 10.0);
        }
    }

    #[test]
    fn test_empty_graph_is_unchanged() {
        let mut graph = LayoutGraph::<()>::new();
        assert_eq!(LayoutAlgorithm::default().layout(&mut graph), Ok(false));
    }

    #[test]
    fn test_invalid_graph_is_untouched() {
        let (mut graph, ids) = chain(2);
        graph.set_left_nodes(ids[1], vec![ids[1]]);

        let result = LayoutAlgorithm::default().layout(&mut graph);
        assert_eq!(result, Err(LayoutError::SelfAdjacent { node: ids[1] }));
        assert!(!graph.node(ids[0]).has_pos());
    }

    #[test]
    fn test_commit_ignores_small_moves() {
        let (mut graph, ids) = chain(1);
        graph.set_position(ids[0], Point::new(5.0, 5.0));
        let config = LayoutConfig::default();
        let mut stepper = NoopStepper;
        let mut solver = Solver {
            graph: &mut graph,
            config: &config,
            stepper: &mut stepper,
        };

        assert!(!solver.commit(ids[0], Point::new(5.05, 4.95)));
        assert!(solver.commit(ids[0], Point::new(5.05, 9.0)));
        assert_eq!(solver.graph.position(ids[0]), Point::new(5.0, 9.0));
    }

    #[derive(Default)]
    struct Passes(Vec<usize>);

    impl LayoutStepper for Passes {
        fn report_pass(&mut self, pass: usize) {
            self.0.push(pass);
        }
    }

    #[test]
    fn test_converged_partition_runs_one_pass_each_way() {
        let (mut graph, _) = chain(3);
        let algorithm = LayoutAlgorithm::default();
        algorithm.layout_with(&mut graph, &mut NoopStepper).unwrap();

        let mut passes = Passes::default();
        let changed = algorithm.layout_with(&mut graph, &mut passes).unwrap();
        assert!(!changed);
        assert_eq!(passes.0, vec![0, 1]);
    }

    #[test]
    fn test_moves_that_cancel_out_are_not_reported_as_change() {
        // A converged layout whose sweeps would still push a fan-out down
        // and normalization pull it back up
        let mut graph = LayoutGraph::new();
        let ids: Vec<_> = (0..7)
            .map(|_| graph.add_node((), Extents::uniform(10.0)))
            .collect();
        for (from, to) in [(2, 6), (0, 1), (0, 6)] {
            graph.connect(ids[from], ids[to]).unwrap();
        }

        let mut algorithm = LayoutAlgorithm::default();
        assert_eq!(algorithm.layout(&mut graph), Ok(true));
        let first: Vec<_> = ids.iter().map(|&id| graph.position(id)).collect();

        assert_eq!(algorithm.layout(&mut graph), Ok(false));
        for (&id, before) in ids.iter().zip(&first) {
            assert!(!differs(before.x(), graph.node(id).x()));
            assert!(!differs(before.y(), graph.node(id).y()));
        }
    }

    #[derive(Default)]
    struct Moves(Vec<StepEvent>);

    impl LayoutStepper for Moves {
        fn report_move(&mut self, node: NodeId, from: Point, to: Point) {
            self.0.push(StepEvent::Move { node, from, to });
        }
    }

    #[test]
    fn test_every_placement_is_reported() {
        let (mut graph, ids) = chain(2);
        let mut moves = Moves::default();
        LayoutAlgorithm::default()
            .layout_with(&mut graph, &mut moves)
            .unwrap();

        let moved: Vec<_> = moves
            .0
            .iter()
            .filter_map(|event| match event {
                StepEvent::Move { node, .. } => Some(*node),
                _ => None,
            })
            .collect();
        assert!(moved.contains(&ids[0]));
        assert!(moved.contains(&ids[1]));
    }
}
