//! Pointer interaction: drag-to-select gestures and cross-chart hover.

mod gesture;
mod hover;
mod observer;
mod overlay;

pub use gesture::GestureController;
pub use hover::{HoverForwarder, HoverOutcome, HoverRegistry};
pub use observer::{GestureEvent, GestureObserver, SelectionCallbacks, SelectionHandler};
pub use overlay::{OverlayAttachment, OverlayPair};

use serde::{Deserialize, Serialize};

use crate::core::{EntityId, Point, PointerModifiers, TimeRange};
use crate::zoom::ZoomDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Per-event hit-test report from the charting layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureFrame {
    /// Domain value (timestamp or sequence slot) of the sample under the pointer.
    pub active_label: Option<f64>,
    /// Exact pointer position. `None` when the pointer is off the plot area.
    pub pointer: Option<Point>,
    /// Pixel x of the nearest sample.
    pub snapped_x: Option<f64>,
    /// Sample under the pointer, for cross-chart hover.
    pub active_entity: Option<EntityId>,
    pub modifiers: PointerModifiers,
    pub button: PointerButton,
}

impl GestureFrame {
    /// A frame over plotted data.
    #[must_use]
    pub fn over(active_label: f64, pointer: Point, snapped_x: f64) -> Self {
        Self {
            active_label: Some(active_label),
            pointer: Some(pointer),
            snapped_x: Some(snapped_x),
            ..Self::default()
        }
    }

    /// A frame with nothing under the pointer.
    #[must_use]
    pub fn outside() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<EntityId>) -> Self {
        self.active_entity = Some(entity.into());
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: PointerModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub(crate) fn finite_label(&self) -> Option<f64> {
        self.active_label.filter(|label| label.is_finite())
    }

    pub(crate) fn finite_pointer(&self) -> Option<Point> {
        self.pointer.filter(|pointer| pointer.is_finite())
    }

    pub(crate) fn finite_snapped_x(&self) -> Option<f64> {
        self.snapped_x.filter(|x| x.is_finite())
    }
}

/// Gesture state that survives between press and release.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DragState {
    pub is_dragging: bool,
    pub start_pixel: Option<f64>,
    pub start_snapped: Option<f64>,
    pub start_label: Option<f64>,
    pub current_pixel: Option<f64>,
    pub current_snapped: Option<f64>,
    pub current_label: Option<f64>,
    pub modifiers: PointerModifiers,
}

impl DragState {
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        if self.is_dragging {
            InteractionMode::Dragging
        } else {
            InteractionMode::Idle
        }
    }
}

/// A completed, non-degenerate drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Real instants, always ascending.
    pub range: TimeRange,
    /// Raw pointer positions at press and release as fractions of plot width,
    /// in gesture order.
    pub pixel_fractions: (f64, f64),
    pub modifiers: PointerModifiers,
}

impl Selection {
    #[must_use]
    pub fn direction(&self) -> ZoomDirection {
        ZoomDirection::from_modifiers(self.modifiers)
    }
}
