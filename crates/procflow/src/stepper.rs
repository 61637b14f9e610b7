//! Observer hooks for tracing and animating the layout solver.
//!
//! The solver reports each decision to a [`LayoutStepper`]. Every hook has a
//! no-op default, and hooks only receive node ids and plain values, so an
//! observer can never change the outcome of a layout.
//!
//! Three observers are provided:
//!
//! - [`NoopStepper`]: the default, ignores everything.
//! - [`LoggingStepper`]: forwards every event to the `log` facade at trace level.
//! - [`BlockingStepper`]: hands every event to a [`StepController`] and waits
//!   until the controller releases it. This lets a UI show intermediate
//!   states one step at a time while the solver runs on a worker thread.
//!
//! # Example
//!
//! ```rust
//! use std::thread;
//!
//! use procflow::{LayoutAlgorithm, LayoutGraph, geometry::Extents, stepper::step_channel};
//!
//! let (stepper, controller) = step_channel();
//!
//! let worker = thread::spawn(move || {
//!     let mut graph = LayoutGraph::new();
//!     let a = graph.add_node((), Extents::uniform(10.0));
//!     let b = graph.add_node((), Extents::uniform(10.0));
//!     graph.connect(a, b).expect("both nodes exist");
//!
//!     let mut algorithm = LayoutAlgorithm::default().with_stepper(stepper);
//!     algorithm.layout(&mut graph).expect("valid graph")
//! });
//!
//! let mut steps = 0;
//! while let Some(_event) = controller.next_event() {
//!     steps += 1;
//!     controller.resume();
//! }
//!
//! assert!(worker.join().expect("worker finished"));
//! assert!(steps > 0);
//! ```

use std::{
    sync::mpsc::{self, Receiver, SyncSender},
    thread::{self, ThreadId},
};

use log::trace;

use procflow_core::geometry::Point;

use crate::{error::LayoutError, node::NodeId};

/// Receives a callback at every decision point of the solver.
pub trait LayoutStepper {
    /// Checked once before layout starts.
    ///
    /// # Errors
    ///
    /// Returns an error if running the solver on the current thread would
    /// deadlock this stepper.
    fn check_thread(&self) -> Result<(), LayoutError> {
        Ok(())
    }

    /// A new convergence pass begins.
    fn report_pass(&mut self, _pass: usize) {}

    /// The solver starts considering a node.
    fn report_layout_node(&mut self, _node: NodeId) {}

    /// A node is about to move.
    fn report_move(&mut self, _node: NodeId, _from: Point, _to: Point) {}

    /// `bounding` nodes impose a minimum x on `node`.
    fn report_min_x(&mut self, _node: NodeId, _bounding: &[NodeId], _x: f64) {}

    /// `bounding` nodes impose a maximum x on `node`.
    fn report_max_x(&mut self, _node: NodeId, _bounding: &[NodeId], _x: f64) {}

    /// `bounding` nodes impose a minimum y on `node`.
    fn report_min_y(&mut self, _node: NodeId, _bounding: &[NodeId], _y: f64) {}

    /// `bounding` nodes impose a maximum y on `node`.
    fn report_max_y(&mut self, _node: NodeId, _bounding: &[NodeId], _y: f64) {}

    /// `siblings` share a neighbour with `node` and lie above (or below) it.
    fn report_siblings(&mut self, _node: NodeId, _siblings: &[NodeId], _above: bool) {}
}

/// A stepper that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStepper;

impl LayoutStepper for NoopStepper {}

/// One solver decision, as delivered by [`StepEvent`]-based steppers.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Pass(usize),
    LayoutNode(NodeId),
    Move {
        node: NodeId,
        from: Point,
        to: Point,
    },
    MinX {
        node: NodeId,
        bounding: Vec<NodeId>,
        x: f64,
    },
    MaxX {
        node: NodeId,
        bounding: Vec<NodeId>,
        x: f64,
    },
    MinY {
        node: NodeId,
        bounding: Vec<NodeId>,
        y: f64,
    },
    MaxY {
        node: NodeId,
        bounding: Vec<NodeId>,
        y: f64,
    },
    Siblings {
        node: NodeId,
        siblings: Vec<NodeId>,
        above: bool,
    },
}

/// Implements [`LayoutStepper`] for a type with inherent `deliver` and
/// `thread_check` methods, turning every hook into a [`StepEvent`].
macro_rules! deliver_events {
    ($stepper:ty) => {
        impl LayoutStepper for $stepper {
            fn check_thread(&self) -> Result<(), LayoutError> {
                self.thread_check()
            }

            fn report_pass(&mut self, pass: usize) {
                self.deliver(StepEvent::Pass(pass));
            }

            fn report_layout_node(&mut self, node: NodeId) {
                self.deliver(StepEvent::LayoutNode(node));
            }

            fn report_move(&mut self, node: NodeId, from: Point, to: Point) {
                self.deliver(StepEvent::Move { node, from, to });
            }

            fn report_min_x(&mut self, node: NodeId, bounding: &[NodeId], x: f64) {
                self.deliver(StepEvent::MinX {
                    node,
                    bounding: bounding.to_vec(),
                    x,
                });
            }

            fn report_max_x(&mut self, node: NodeId, bounding: &[NodeId], x: f64) {
                self.deliver(StepEvent::MaxX {
                    node,
                    bounding: bounding.to_vec(),
                    x,
                });
            }

            fn report_min_y(&mut self, node: NodeId, bounding: &[NodeId], y: f64) {
                self.deliver(StepEvent::MinY {
                    node,
                    bounding: bounding.to_vec(),
                    y,
                });
            }

            fn report_max_y(&mut self, node: NodeId, bounding: &[NodeId], y: f64) {
                self.deliver(StepEvent::MaxY {
                    node,
                    bounding: bounding.to_vec(),
                    y,
                });
            }

            fn report_siblings(&mut self, node: NodeId, siblings: &[NodeId], above: bool) {
                self.deliver(StepEvent::Siblings {
                    node,
                    siblings: siblings.to_vec(),
                    above,
                });
            }
        }
    };
}

/// A stepper that writes every event to the log at trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStepper;

impl LoggingStepper {
    fn deliver(&mut self, event: StepEvent) {
        trace!(event:?; "Layout step");
    }

    fn thread_check(&self) -> Result<(), LayoutError> {
        Ok(())
    }
}

deliver_events!(LoggingStepper);

/// A stepper that blocks the solver until its [`StepController`] lets it continue.
///
/// Created together with its controller by [`step_channel`]. Each event is
/// handed over through a rendezvous channel; the solver thread then waits for
/// [`StepController::resume`]. Once the controller is dropped the stepper
/// stops blocking and the solver runs to completion.
#[derive(Debug)]
pub struct BlockingStepper {
    events: SyncSender<StepEvent>,
    resume: Receiver<()>,
    controller_thread: ThreadId,
    detached: bool,
}

/// The controlling end of a [`BlockingStepper`].
#[derive(Debug)]
pub struct StepController {
    events: Receiver<StepEvent>,
    resume: SyncSender<()>,
}

/// Creates a connected [`BlockingStepper`] and [`StepController`].
///
/// The calling thread becomes the controller thread: running the solver with
/// this stepper on the same thread is refused with
/// [`LayoutError::SteppingOnControllerThread`], since nobody could ever
/// release it.
pub fn step_channel() -> (BlockingStepper, StepController) {
    let (event_tx, event_rx) = mpsc::sync_channel(0);
    let (resume_tx, resume_rx) = mpsc::sync_channel(0);

    let stepper = BlockingStepper {
        events: event_tx,
        resume: resume_rx,
        controller_thread: thread::current().id(),
        detached: false,
    };
    let controller = StepController {
        events: event_rx,
        resume: resume_tx,
    };
    (stepper, controller)
}

impl BlockingStepper {
    fn deliver(&mut self, event: StepEvent) {
        if self.detached {
            return;
        }
        if self.events.send(event).is_err() || self.resume.recv().is_err() {
            trace!("Step controller went away, continuing without stepping");
            self.detached = true;
        }
    }

    fn thread_check(&self) -> Result<(), LayoutError> {
        if thread::current().id() == self.controller_thread {
            Err(LayoutError::SteppingOnControllerThread)
        } else {
            Ok(())
        }
    }
}

deliver_events!(BlockingStepper);

impl StepController {
    /// Waits for the next event of the solver.
    ///
    /// Returns `None` once the stepper has been dropped, i.e. the solver that
    /// owned it is gone.
    pub fn next_event(&self) -> Option<StepEvent> {
        self.events.recv().ok()
    }

    /// Lets the solver continue after the last received event.
    ///
    /// Returns false if the stepper has already been dropped.
    pub fn resume(&self) -> bool {
        self.resume.send(()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<StepEvent>);

    impl Collect {
        fn deliver(&mut self, event: StepEvent) {
            self.0.push(event);
        }

        fn thread_check(&self) -> Result<(), LayoutError> {
            Ok(())
        }
    }

    deliver_events!(Collect);

    #[test]
    fn test_hooks_become_events() {
        let mut collect = Collect::default();
        let node = NodeId::new(1);
        let other = NodeId::new(2);

        collect.report_pass(3);
        collect.report_layout_node(node);
        collect.report_move(node, Point::new(0.0, 0.0), Point::new(1.0, 2.0));
        collect.report_min_x(node, &[other], 5.0);
        collect.report_siblings(node, &[other], true);

        assert_eq!(
            collect.0,
            vec![
                StepEvent::Pass(3),
                StepEvent::LayoutNode(node),
                StepEvent::Move {
                    node,
                    from: Point::new(0.0, 0.0),
                    to: Point::new(1.0, 2.0)
                },
                StepEvent::MinX {
                    node,
                    bounding: vec![other],
                    x: 5.0
                },
                StepEvent::Siblings {
                    node,
                    siblings: vec![other],
                    above: true
                },
            ]
        );
    }

    #[test]
    fn test_blocking_stepper_refuses_controller_thread() {
        let (stepper, _controller) = step_channel();
        assert_eq!(
            stepper.check_thread(),
            Err(LayoutError::SteppingOnControllerThread)
        );
    }

    #[test]
    fn test_blocking_stepper_accepts_worker_thread() {
        let (stepper, _controller) = step_channel();
        let result = thread::spawn(move || stepper.check_thread())
            .join()
            .expect("worker finished");
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_blocking_stepper_detaches_without_controller() {
        let (mut stepper, controller) = step_channel();
        drop(controller);

        // Must not block
        stepper.report_pass(0);
        stepper.report_pass(1);
        assert!(stepper.detached);
    }

    #[test]
    fn test_blocking_stepper_hands_over_events() {
        let (mut stepper, controller) = step_channel();

        let worker = thread::spawn(move || {
            stepper.report_pass(0);
            stepper.report_layout_node(NodeId::new(4));
        });

        assert_eq!(controller.next_event(), Some(StepEvent::Pass(0)));
        assert!(controller.resume());
        assert_eq!(
            controller.next_event(),
            Some(StepEvent::LayoutNode(NodeId::new(4)))
        );
        assert!(controller.resume());

        worker.join().expect("worker finished");
        assert_eq!(controller.next_event(), None);
    }
}
