//! Drag-selection zoom arithmetic.
//!
//! Value axes zoom in normalized fraction space: a [`ZoomDomain`] names the
//! visible part of an auto-fitted domain that may itself change as data loads,
//! so storing fractions keeps repeated zooms free of drift. The time axis
//! zooms directly in timestamps because its full range (the selected dayobs
//! window) is a stable external bound.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LinearScale, PointerModifiers, TimeRange};
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomDirection {
    /// The selection becomes the new visible range.
    In,
    /// The current visible range is squeezed into the selection.
    Out,
}

impl ZoomDirection {
    /// Ctrl (or meta) turns a drag into a zoom-out.
    #[must_use]
    pub fn from_modifiers(modifiers: PointerModifiers) -> Self {
        if modifiers.ctrl { Self::Out } else { Self::In }
    }
}

/// Visible sub-range of the auto domain, as fractions `0 <= min < max <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomDomain {
    min: f64,
    max: f64,
}

impl Default for ZoomDomain {
    fn default() -> Self {
        Self::FULL
    }
}

impl ZoomDomain {
    pub const FULL: Self = Self { min: 0.0, max: 1.0 };

    pub fn new(min: f64, max: f64) -> ChartResult<Self> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || max > 1.0 || min >= max {
            return Err(ChartError::InvalidData(format!(
                "zoom domain must satisfy 0 <= min < max <= 1, got [{min}, {max}]"
            )));
        }
        Ok(Self { min, max })
    }

    /// Expresses a visible value range as fractions of `auto_domain`.
    pub fn from_values(visible: (f64, f64), auto_domain: (f64, f64)) -> ChartResult<Self> {
        let scale = LinearScale::new(auto_domain.0, auto_domain.1)?;
        let a = scale.value_to_fraction(visible.0).clamp(0.0, 1.0);
        let b = scale.value_to_fraction(visible.1).clamp(0.0, 1.0);
        Self::new(a.min(b), a.max(b))
    }

    #[must_use]
    pub fn min(self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_full(self) -> bool {
        self == Self::FULL
    }

    /// Resolves the fractions against the current auto domain.
    #[must_use]
    pub fn resolve(self, auto_domain: (f64, f64)) -> (f64, f64) {
        let span = auto_domain.1 - auto_domain.0;
        (
            auto_domain.0 + self.min * span,
            auto_domain.0 + self.max * span,
        )
    }
}

/// Zooms into a selection given as fractions of the current view.
#[must_use]
pub fn zoom_in(selection: (f64, f64), current: ZoomDomain, min_width: f64) -> Option<ZoomDomain> {
    zoom(selection, ZoomDirection::In, current, min_width)
}

/// Zooms out so the current view fits inside the selection.
#[must_use]
pub fn zoom_out(selection: (f64, f64), current: ZoomDomain) -> Option<ZoomDomain> {
    zoom(selection, ZoomDirection::Out, current, 0.0)
}

#[must_use]
pub fn zoom(
    selection: (f64, f64),
    direction: ZoomDirection,
    current: ZoomDomain,
    min_width: f64,
) -> Option<ZoomDomain> {
    let (min, max) = zoom_absolute(
        selection,
        direction,
        (current.min, current.max),
        (0.0, 1.0),
        min_width.clamp(0.0, 1.0),
    )?;
    ZoomDomain::new(min, max).ok()
}

/// Time-axis zoom in absolute timestamps, clamped to `full`.
#[must_use]
pub fn zoom_time_range(
    selection: (f64, f64),
    direction: ZoomDirection,
    current: TimeRange,
    full: TimeRange,
    min_span_ms: f64,
) -> Option<TimeRange> {
    let min_span = min_span_ms.clamp(0.0, full.span());
    let (start, end) = zoom_absolute(
        selection,
        direction,
        (current.start(), current.end()),
        (full.start(), full.end()),
        min_span,
    )?;
    TimeRange::new(start, end).ok()
}

fn zoom_absolute(
    selection: (f64, f64),
    direction: ZoomDirection,
    current: (f64, f64),
    bound: (f64, f64),
    min_span: f64,
) -> Option<(f64, f64)> {
    let finite = [selection.0, selection.1, current.0, current.1, bound.0, bound.1, min_span]
        .iter()
        .all(|value| value.is_finite());
    if !finite {
        debug!(?selection, ?current, "zoom aborted: non-finite input");
        return None;
    }

    let (current_min, current_max) = current;
    let current_range = current_max - current_min;
    if current_range <= 0.0 {
        debug!(?current, "zoom aborted: empty current domain");
        return None;
    }

    let selection_min = current_min + selection.0.min(selection.1) * current_range;
    let selection_max = current_min + selection.0.max(selection.1) * current_range;

    let (new_min, new_max) = match direction {
        ZoomDirection::In => {
            let min = selection_min.max(bound.0);
            let max = selection_max.min(bound.1);
            if min > max {
                debug!(?selection, "zoom aborted: selection outside bound");
                return None;
            }
            widen_to_min_span(min, max, min_span, bound)
        }
        ZoomDirection::Out => {
            let selection_range = selection_max - selection_min;
            if selection_range <= 0.0 {
                debug!(?selection, "zoom-out aborted: zero-width selection");
                return None;
            }
            let selection_center = (selection_min + selection_max) / 2.0;
            let factor = current_range / selection_range;
            let new_range = current_range * factor;
            (
                (selection_center - new_range / 2.0).max(bound.0),
                (selection_center + new_range / 2.0).min(bound.1),
            )
        }
    };

    if !new_min.is_finite() || !new_max.is_finite() || new_min >= new_max {
        return None;
    }
    Some((new_min, new_max))
}

/// Grows `[min, max]` around its center to `min_span`, then slides it back
/// inside `bound`.
fn widen_to_min_span(min: f64, max: f64, min_span: f64, bound: (f64, f64)) -> (f64, f64) {
    if max - min >= min_span {
        return (min, max);
    }
    let center = (min + max) / 2.0;
    let mut lo = center - min_span / 2.0;
    let mut hi = center + min_span / 2.0;
    if lo < bound.0 {
        hi += bound.0 - lo;
        lo = bound.0;
    }
    if hi > bound.1 {
        lo -= hi - bound.1;
        hi = bound.1;
    }
    (lo.max(bound.0), hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accidental_click_is_widened_to_min_width() {
        let domain = zoom_in((0.5, 0.5), ZoomDomain::FULL, 0.01).expect("zoom");
        assert!((domain.width() - 0.01).abs() <= 1e-12);
        assert!((domain.min() - 0.495).abs() <= 1e-12);
    }

    #[test]
    fn min_width_slides_back_inside_bounds_at_edges() {
        let domain = zoom_in((0.0, 0.0), ZoomDomain::FULL, 0.1).expect("zoom");
        assert_eq!(domain.min(), 0.0);
        assert!((domain.max() - 0.1).abs() <= 1e-12);
    }

    #[test]
    fn non_finite_selection_aborts() {
        assert!(zoom_in((f64::NAN, 0.5), ZoomDomain::FULL, 0.01).is_none());
        assert!(zoom_out((0.2, f64::INFINITY), ZoomDomain::FULL).is_none());
    }

    #[test]
    fn modifiers_choose_direction() {
        let plain = PointerModifiers::default();
        let ctrl = PointerModifiers {
            ctrl: true,
            ..PointerModifiers::default()
        };
        assert_eq!(ZoomDirection::from_modifiers(plain), ZoomDirection::In);
        assert_eq!(ZoomDirection::from_modifiers(ctrl), ZoomDirection::Out);
    }
}
