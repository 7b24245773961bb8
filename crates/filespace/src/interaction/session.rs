use crate::input::DragId;
use filespace_layout::{NodeId, ScreenPoint, WorldVector};

/// Per-gesture state owned by the controller between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Session {
    /// `offset` is the pointer's world position at drag start minus the node's, frozen for the
    /// whole gesture.
    NodeDrag {
        drag: DragId,
        node: NodeId,
        offset: WorldVector,
    },
    CameraPan {
        drag: DragId,
        last: ScreenPoint,
    },
    Pinch {
        anchor: ScreenPoint,
        scale: f64,
    },
    /// The dragged node disappeared; the drag stays claimed until it ends.
    Detached { drag: DragId },
}

impl Session {
    pub(crate) fn drag_id(&self) -> Option<DragId> {
        match *self {
            Session::NodeDrag { drag, .. }
            | Session::CameraPan { drag, .. }
            | Session::Detached { drag } => Some(drag),
            Session::Pinch { .. } => None,
        }
    }
}
