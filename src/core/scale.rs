use crate::core::types::PlotBounds;
use crate::error::{ChartError, ChartResult};

/// Linear map between a value domain and `[0, 1]` fractions of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    #[must_use]
    pub fn fraction_to_value(self, fraction: f64) -> f64 {
        self.domain_start + fraction * self.span()
    }

    #[must_use]
    pub fn value_to_fraction(self, value: f64) -> f64 {
        (value - self.domain_start) / self.span()
    }

    /// Maps a domain value onto the horizontal extent of `bounds`.
    pub fn value_to_pixel(self, value: f64, bounds: PlotBounds) -> ChartResult<f64> {
        if !bounds.is_valid() {
            return Err(ChartError::InvalidPlotBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        Ok(bounds.x + self.value_to_fraction(value) * bounds.width)
    }

    pub fn pixel_to_value(self, pixel: f64, bounds: PlotBounds) -> ChartResult<f64> {
        if !bounds.is_valid() {
            return Err(ChartError::InvalidPlotBounds {
                width: bounds.width,
                height: bounds.height,
            });
        }

        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        Ok(self.fraction_to_value(bounds.fraction_x(pixel)))
    }
}
