use serde::{Deserialize, Serialize};

use crate::core::{PlotBounds, Point};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Look of one drag-selection rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub visible: bool,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    /// Fill opacity while a drag is in progress; hidden rects use 0.
    pub active_fill_opacity: f64,
}

impl OverlayStyle {
    #[must_use]
    pub fn raw_default() -> Self {
        let grey = Color::rgb(0.533, 0.533, 0.533);
        Self {
            visible: true,
            fill: grey,
            stroke: grey,
            stroke_width: 1.0,
            active_fill_opacity: 0.4,
        }
    }

    #[must_use]
    pub fn snapped_default() -> Self {
        let grey = Color::rgb(0.4, 0.4, 0.4);
        Self {
            visible: true,
            fill: grey,
            stroke: grey,
            stroke_width: 1.0,
            active_fill_opacity: 0.4,
        }
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.fill.validate()?;
        self.stroke.validate()?;
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidConfig(
                "overlay stroke width must be finite and >= 0".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.active_fill_opacity) {
            return Err(ChartError::InvalidConfig(
                "overlay fill opacity must be in [0, 1]".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Retained drag-selection rectangle, mutated in place by the gesture
/// controller and read by the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_opacity: f64,
    pub style: OverlayStyle,
}

impl SelectionRect {
    /// A zero-width, transparent rect spanning the plot height.
    #[must_use]
    pub fn hidden(bounds: PlotBounds, style: OverlayStyle) -> Self {
        Self {
            x: bounds.x,
            y: bounds.y,
            width: 0.0,
            height: bounds.height,
            fill_opacity: 0.0,
            style,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.style.visible && self.fill_opacity > 0.0
    }

    pub fn show(&mut self) {
        if self.style.visible {
            self.fill_opacity = self.style.active_fill_opacity;
        }
    }

    pub fn hide(&mut self) {
        self.fill_opacity = 0.0;
        self.width = 0.0;
    }

    /// Spans the rect horizontally between two pixels, full plot height.
    pub fn span(&mut self, a: f64, b: f64, bounds: PlotBounds) {
        self.x = a.min(b);
        self.width = (b - a).abs();
        self.y = bounds.y;
        self.height = bounds.height;
    }
}

/// The single hover marker each surface owns.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoverIndicator {
    pub center: Option<Point>,
    pub visible: bool,
}

impl HoverIndicator {
    pub fn move_to(&mut self, center: Point) {
        self.center = Some(center);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
