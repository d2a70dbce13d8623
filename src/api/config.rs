use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::projection::{AxisMode, ProjectionConfig, SpacingConfig, TickConfig};
use crate::render::OverlayStyle;

/// Limits on how far a drag may zoom in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    /// Narrowest visible slice of a value axis, as a fraction of its auto domain.
    pub min_fraction_width: f64,
    /// Narrowest selectable time window.
    pub min_time_span_ms: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_fraction_width: 0.01,
            min_time_span_ms: 1_000.0,
        }
    }
}

/// Session bootstrap configuration.
///
/// Serializable so hosts can persist chart setup next to their own settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_axis_mode")]
    pub axis_mode: AxisMode,
    #[serde(default)]
    pub zoom: ZoomConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default = "default_raw_overlay")]
    pub raw_overlay: OverlayStyle,
    #[serde(default = "default_snapped_overlay")]
    pub snapped_overlay: OverlayStyle,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            axis_mode: default_axis_mode(),
            zoom: ZoomConfig::default(),
            projection: ProjectionConfig::default(),
            raw_overlay: default_raw_overlay(),
            snapped_overlay: default_snapped_overlay(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_axis_mode(mut self, mode: AxisMode) -> Self {
        self.axis_mode = mode;
        self
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: ZoomConfig) -> Self {
        self.zoom = zoom;
        self
    }

    /// Sets sequence-axis gap sizing.
    #[must_use]
    pub fn with_spacing(mut self, spacing: SpacingConfig) -> Self {
        self.projection.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_ticks(mut self, ticks: TickConfig) -> Self {
        self.projection.ticks = ticks;
        self
    }

    /// Sets raw and snapped overlay styles.
    #[must_use]
    pub fn with_overlay_styles(mut self, raw: OverlayStyle, snapped: OverlayStyle) -> Self {
        self.raw_overlay = raw;
        self.snapped_overlay = snapped;
        self
    }

    pub fn validate(self) -> ChartResult<Self> {
        let zoom = self.zoom;
        if !zoom.min_fraction_width.is_finite() || !(0.0..1.0).contains(&zoom.min_fraction_width) {
            return Err(ChartError::InvalidConfig(
                "zoom min fraction width must be in [0, 1)".to_owned(),
            ));
        }
        if !zoom.min_time_span_ms.is_finite() || zoom.min_time_span_ms < 0.0 {
            return Err(ChartError::InvalidConfig(
                "zoom min time span must be finite and >= 0".to_owned(),
            ));
        }
        self.projection.validate()?;
        self.raw_overlay.validate()?;
        self.snapped_overlay.validate()?;
        Ok(self)
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()
    }
}

fn default_axis_mode() -> AxisMode {
    AxisMode::Time
}

fn default_raw_overlay() -> OverlayStyle {
    OverlayStyle::raw_default()
}

fn default_snapped_overlay() -> OverlayStyle {
    OverlayStyle::snapped_default()
}
