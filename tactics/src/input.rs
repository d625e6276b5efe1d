//! Input model: tools, pointer identity, mouse buttons, and the gesture state machine.
//!
//! This module defines the types consumed by the input engine. `Tool` and
//! `UiState` capture what the user has selected in the toolbar. `InputState`
//! is the active gesture being tracked between pointer-down and pointer-up,
//! carrying the context needed to apply each move and finish on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::scene::{AnnotationId, AnnotationKind, Side, TokenId};

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag tokens around the pitch (default).
    #[default]
    Move,
    /// Draw a freehand stroke.
    Freehand,
    /// Draw a straight arrow.
    Arrow,
}

impl Tool {
    /// The annotation this tool draws, or `None` for the move tool.
    #[must_use]
    pub fn annotation_kind(self) -> Option<AnnotationKind> {
        match self {
            Self::Move => None,
            Self::Freehand => Some(AnnotationKind::Freehand),
            Self::Arrow => Some(AnnotationKind::Arrow),
        }
    }

    /// CSS cursor the host should show while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Move => "default",
            Self::Freehand | Self::Arrow => "crosshair",
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger touch).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
}

/// The browser's `PointerEvent.pointerId`.
pub type PointerId = i32;

/// Toolbar state visible to the renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    /// Side the "add player" button creates tokens for.
    pub side_to_add: Side,
}

/// Internal state for the input state machine.
///
/// Every active variant records the pointer that started it; events from any
/// other pointer are ignored until that gesture ends.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// A token is being dragged with the move tool.
    DraggingToken {
        /// Id of the token being dragged.
        id: TokenId,
        /// Pointer that owns the drag.
        pointer: PointerId,
        /// Token centre minus pointer position at grab time, in board units.
        grab_offset: Point,
    },
    /// An annotation is being drawn.
    Drawing {
        /// Id of the open annotation.
        id: AnnotationId,
        /// Freehand or arrow.
        kind: AnnotationKind,
        /// Pointer that owns the stroke.
        pointer: PointerId,
    },
}

impl InputState {
    /// The pointer owning the active gesture, if any.
    #[must_use]
    pub fn pointer(&self) -> Option<PointerId> {
        match self {
            Self::Idle => None,
            Self::DraggingToken { pointer, .. } | Self::Drawing { pointer, .. } => Some(*pointer),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
