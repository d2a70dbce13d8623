use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::time::{datetime_to_millis, millis_to_datetime};
use crate::error::{ChartError, ChartResult};

/// Pixel position inside a chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Plotted data area of a surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotBounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> ChartResult<Self> {
        let bounds = Self {
            x,
            y,
            width,
            height,
        };
        if !bounds.is_valid() {
            return Err(ChartError::InvalidPlotBounds { width, height });
        }
        Ok(bounds)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }

    #[must_use]
    pub fn left(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn top(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Inclusive containment test. Non-finite points are never inside.
    #[must_use]
    pub fn contains(self, point: Point) -> bool {
        point.is_finite()
            && point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    /// Horizontal position as a fraction of the plot width.
    #[must_use]
    pub fn fraction_x(self, pixel_x: f64) -> f64 {
        (pixel_x - self.x) / self.width
    }
}

/// Closed instant range in TAI milliseconds.
///
/// `start <= end` always holds. Ranges are replaced wholesale; there is no
/// API for moving one edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    start: f64,
    end: f64,
}

impl TimeRange {
    /// Builds a range from two instants given in either order.
    pub fn new(a: f64, b: f64) -> ChartResult<Self> {
        if !a.is_finite() || !b.is_finite() {
            return Err(ChartError::InvalidData(
                "time range bounds must be finite".to_owned(),
            ));
        }
        Ok(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    pub fn from_datetimes(start: DateTime<Utc>, end: DateTime<Utc>) -> ChartResult<Self> {
        Self::new(datetime_to_millis(start), datetime_to_millis(end))
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn contains(self, instant: f64) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Intersects with `bound`. A range entirely outside collapses onto the
    /// nearest edge of `bound`.
    #[must_use]
    pub fn clamped_to(self, bound: TimeRange) -> Self {
        let start = self.start.clamp(bound.start, bound.end);
        let end = self.end.clamp(bound.start, bound.end);
        Self { start, end }
    }

    #[must_use]
    pub fn to_datetimes(self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((
            millis_to_datetime(self.start)?,
            millis_to_datetime(self.end)?,
        ))
    }
}

/// Keyboard modifiers held while a pointer event fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerModifiers {
    pub shift: bool,
    /// Control, or the platform meta key.
    pub ctrl: bool,
}

/// Stable identity of one sample across every chart (e.g. an exposure id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one mounted chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub u32);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}
