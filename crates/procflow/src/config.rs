//! Configuration of the layout solver.
//!
//! [`LayoutConfig`] implements [`serde::Deserialize`] so callers can load it
//! from a configuration file; every field falls back to its default when
//! missing.
//!
//! # Example
//!
//! ```
//! # use procflow::LayoutConfig;
//! let config = LayoutConfig::default().with_tighten(true);
//! assert_eq!(config.horizontal_separation(), 40.0);
//! assert!(config.tighten());
//! ```

use serde::Deserialize;

use procflow_core::{
    geometry::{Extents, Size},
    kind::NodeKind,
};

/// Default horizontal gap between neighbouring node boxes.
pub const DEFAULT_HORIZONTAL_SEPARATION: f64 = 40.0;

/// Default vertical gap between neighbouring node boxes.
pub const DEFAULT_VERTICAL_SEPARATION: f64 = 30.0;

/// Settings that control separation and compaction of the layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Minimum horizontal gap between node boxes.
    horizontal_separation: f64,

    /// Minimum vertical gap between node boxes.
    vertical_separation: f64,

    /// Width assumed for nodes created without explicit extents.
    default_node_width: f64,

    /// Height assumed for nodes created without explicit extents.
    default_node_height: f64,

    /// Grid spacing callers may snap final coordinates to. `None` disables it.
    grid_size: Option<f64>,

    /// Compact the diagram horizontally before relaxing it.
    tighten: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let default_size = NodeKind::max_size();
        Self {
            horizontal_separation: DEFAULT_HORIZONTAL_SEPARATION,
            vertical_separation: DEFAULT_VERTICAL_SEPARATION,
            default_node_width: default_size.width(),
            default_node_height: default_size.height(),
            grid_size: None,
            tighten: false,
        }
    }
}

impl LayoutConfig {
    /// Returns the minimum horizontal gap between node boxes.
    pub fn horizontal_separation(&self) -> f64 {
        self.horizontal_separation
    }

    /// Returns the minimum vertical gap between node boxes.
    pub fn vertical_separation(&self) -> f64 {
        self.vertical_separation
    }

    /// Returns the default node size.
    pub fn default_node_size(&self) -> Size {
        Size::new(self.default_node_width, self.default_node_height)
    }

    /// Returns extents for a node of the default size, centered on its gravity point.
    pub fn default_extents(&self) -> Extents {
        Extents::centered(self.default_node_size())
    }

    /// Returns the configured grid spacing, if any.
    pub fn grid_size(&self) -> Option<f64> {
        self.grid_size.filter(|size| size.is_finite() && *size > 0.0)
    }

    /// Returns true if horizontal compaction is enabled.
    pub fn tighten(&self) -> bool {
        self.tighten
    }

    /// Sets the horizontal separation.
    pub fn with_horizontal_separation(mut self, separation: f64) -> Self {
        self.horizontal_separation = separation;
        self
    }

    /// Sets the vertical separation.
    pub fn with_vertical_separation(mut self, separation: f64) -> Self {
        self.vertical_separation = separation;
        self
    }

    /// Sets the default node size.
    pub fn with_default_node_size(mut self, size: Size) -> Self {
        self.default_node_width = size.width();
        self.default_node_height = size.height();
        self
    }

    /// Sets the grid spacing.
    pub fn with_grid_size(mut self, grid_size: Option<f64>) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Enables or disables horizontal compaction.
    pub fn with_tighten(mut self, tighten: bool) -> Self {
        self.tighten = tighten;
        self
    }

    /// Rounds a coordinate to the nearest grid line.
    ///
    /// Layout itself never snaps; callers apply this to the final coordinates
    /// they copy back. Without a grid the value is returned unchanged.
    pub fn snap_to_grid(&self, value: f64) -> f64 {
        match self.grid_size() {
            Some(grid) => (value / grid).round() * grid,
            None => value,
        }
    }
}
