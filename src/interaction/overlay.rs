use crate::core::PlotBounds;
use crate::render::{OverlayStyle, SelectionRect};

use super::DragState;

/// The two drag rectangles of one surface.
///
/// `raw` follows the pointer pixel for pixel; `snapped` follows the nearest
/// sample, which is what the selection actually resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPair {
    pub raw: SelectionRect,
    pub snapped: SelectionRect,
    bounds: PlotBounds,
}

impl OverlayPair {
    #[must_use]
    pub fn new(bounds: PlotBounds, raw_style: OverlayStyle, snapped_style: OverlayStyle) -> Self {
        Self {
            raw: SelectionRect::hidden(bounds, raw_style),
            snapped: SelectionRect::hidden(bounds, snapped_style),
            bounds,
        }
    }

    #[must_use]
    pub fn bounds(&self) -> PlotBounds {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: PlotBounds) {
        self.bounds = bounds;
        self.raw.y = bounds.y;
        self.raw.height = bounds.height;
        self.snapped.y = bounds.y;
        self.snapped.height = bounds.height;
    }

    pub fn show(&mut self) {
        self.raw.show();
        self.snapped.show();
    }

    pub fn hide(&mut self) {
        self.raw.hide();
        self.snapped.hide();
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.raw.is_visible() || self.snapped.is_visible()
    }

    /// Re-spans both rectangles from the drag anchor to the current position.
    pub fn update(&mut self, drag: &DragState) {
        if let (Some(start), Some(current)) = (drag.start_pixel, drag.current_pixel) {
            self.raw.span(start, current, self.bounds);
        }
        if let (Some(start), Some(current)) = (drag.start_snapped, drag.current_snapped) {
            self.snapped.span(start, current, self.bounds);
        }
    }
}

/// Overlays exist only once the surface geometry is known.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OverlayAttachment {
    #[default]
    Unattached,
    Attached(OverlayPair),
}

impl OverlayAttachment {
    /// Creates the overlay pair on first use; later calls reuse it.
    ///
    /// Returns `false` while the geometry is unknown or invalid.
    pub fn ensure_attached(
        &mut self,
        geometry: Option<PlotBounds>,
        raw_style: OverlayStyle,
        snapped_style: OverlayStyle,
    ) -> bool {
        match self {
            Self::Attached(pair) => {
                if let Some(bounds) = geometry.filter(|b| b.is_valid()) {
                    pair.set_bounds(bounds);
                }
                true
            }
            Self::Unattached => match geometry.filter(|b| b.is_valid()) {
                Some(bounds) => {
                    *self = Self::Attached(OverlayPair::new(bounds, raw_style, snapped_style));
                    true
                }
                None => false,
            },
        }
    }

    pub fn detach(&mut self) {
        *self = Self::Unattached;
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }

    #[must_use]
    pub fn pair(&self) -> Option<&OverlayPair> {
        match self {
            Self::Attached(pair) => Some(pair),
            Self::Unattached => None,
        }
    }

    pub fn pair_mut(&mut self) -> Option<&mut OverlayPair> {
        match self {
            Self::Attached(pair) => Some(pair),
            Self::Unattached => None,
        }
    }
}
