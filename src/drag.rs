//! Drag-and-drop query surface.
//!
//! The registry never drives drags itself. It only asks an optional
//! [`DragAndDrop`] capability two questions: is a drag in progress, and is a
//! node armed for one. The capability is injected once when the registry is
//! built; a registry built without one answers `false` to both.

#[cfg(feature = "drag-and-drop")]
use std::cell::Cell;

#[cfg(feature = "drag-and-drop")]
use crate::registry::NodeId;

/// Read-only view of a drag-and-drop capability.
pub trait DragAndDrop {
    /// Returns `true` while an operation is mid-drag.
    fn is_dragging(&self) -> bool;

    /// Returns `true` while a candidate node is held, whether or not the drag
    /// threshold has been exceeded yet.
    fn has_node(&self) -> bool;
}

/// Interior-mutable drag state shared between the pointer handling code and
/// the registry.
#[cfg(feature = "drag-and-drop")]
#[derive(Debug, Default)]
pub struct DragState {
    dragging: Cell<bool>,
    node: Cell<Option<NodeId>>,
}

#[cfg(feature = "drag-and-drop")]
impl DragState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds `node` as the drag candidate.
    pub fn arm(&self, node: NodeId) {
        self.node.set(Some(node));
    }

    /// Marks the armed drag as started.
    ///
    /// Does nothing if no node is armed.
    pub fn start(&self) {
        if self.node.get().is_some() {
            self.dragging.set(true);
        } else {
            log::warn!("DragState::start called with no armed node");
        }
    }

    /// Ends the current drag and releases the candidate.
    pub fn end(&self) {
        self.dragging.set(false);
        self.node.set(None);
    }

    /// The armed candidate, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.node.get()
    }
}

#[cfg(feature = "drag-and-drop")]
impl DragAndDrop for DragState {
    fn is_dragging(&self) -> bool {
        self.dragging.get()
    }

    fn has_node(&self) -> bool {
        self.node.get().is_some()
    }
}
