//! Retained-mode boundary to the charting layer.
//!
//! Overlay rectangles and hover indicators are long-lived elements addressed
//! by surface id and mutated in place, outside the normal render pass, so a
//! pointer move costs one element update instead of a chart redraw.

mod elements;
mod scene;

pub use elements::{Color, HoverIndicator, OverlayStyle, SelectionRect};
pub use scene::{HoverScene, RetainedScene, RetainedSurface};
