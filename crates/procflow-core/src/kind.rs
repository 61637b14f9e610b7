//! Process node kinds and their fixed shapes.
//!
//! Every node of a process diagram has one of a small set of kinds. The kind
//! fixes the size of the node's box, which never changes during layout.

use std::fmt;

use serde::Deserialize;

use crate::geometry::{Extents, Size};

/// The kind of a process diagram node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Entry point of a process, drawn as a small filled circle.
    Start,
    /// Exit point of a process, drawn as a ringed circle.
    End,
    /// A unit of work, drawn as a rounded box.
    Activity,
    /// Fan-out into parallel or alternative branches.
    Split,
    /// Fan-in of branches.
    Join,
}

impl NodeKind {
    /// All node kinds, in declaration order.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::End,
        NodeKind::Activity,
        NodeKind::Split,
        NodeKind::Join,
    ];

    /// Returns the size of the box drawn for this kind.
    pub fn size(self) -> Size {
        match self {
            NodeKind::Start => Size::new(20.0, 20.0),
            NodeKind::End => Size::new(24.0, 24.0),
            NodeKind::Activity => Size::new(64.0, 40.0),
            NodeKind::Split | NodeKind::Join => Size::new(40.0, 40.0),
        }
    }

    /// Returns the extents of this kind; the gravity point is the box center.
    pub fn extents(self) -> Extents {
        Extents::centered(self.size())
    }

    /// Returns the largest width and the largest height over all kinds.
    ///
    /// This is the default node size used when nothing more specific is known.
    pub fn max_size() -> Size {
        Self::ALL
            .iter()
            .fold(Size::default(), |acc, kind| acc.max(kind.size()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::Activity => "activity",
            NodeKind::Split => "split",
            NodeKind::Join => "join",
        };
        f.write_str(name)
    }
}
