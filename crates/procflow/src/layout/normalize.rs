//! Translating a finished partition into place.

use log::debug;

use procflow_core::geometry::Point;

use crate::{error::LayoutError, node::NodeId};

use super::{Solver, TOLERANCE};

impl<T> Solver<'_, T> {
    /// Moves the partition so its leftmost edge sits at x = 0 and its topmost
    /// edge at `floor`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::NonFiniteCoordinate`] if any member ends up at a
    /// non-finite position.
    pub(super) fn normalize(
        &mut self,
        members: &[NodeId],
        floor: f64,
    ) -> Result<bool, LayoutError> {
        let (left, top) = members
            .iter()
            .fold((f64::INFINITY, f64::INFINITY), |(left, top), &id| {
                let node = self.node(id);
                (left.min(node.left()), top.min(node.top()))
            });

        let offset = Point::new(-left, floor - top);
        let changed = offset.is_finite()
            && (offset.x().abs() > TOLERANCE || offset.y().abs() > TOLERANCE);
        if changed {
            debug!(dx = offset.x(), dy = offset.y(); "Normalizing partition");
            for &id in members {
                self.shift(id, offset);
            }
        }

        for &id in members {
            let position = self.graph.position(id);
            if !position.is_finite() {
                return Err(LayoutError::NonFiniteCoordinate {
                    node: id,
                    x: position.x(),
                    y: position.y(),
                });
            }
        }
        Ok(changed)
    }
}
