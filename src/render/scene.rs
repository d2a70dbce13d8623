use indexmap::IndexMap;
use tracing::trace;

use crate::core::{EntityId, LinearScale, PlotBounds, Point, SurfaceId, TimelineEvent};
use crate::error::ChartResult;
use crate::projection::Projection;
use crate::render::HoverIndicator;

/// What the hover fan-out may read and touch on the rendering side.
///
/// Implementations only reposition or hide the indicator element; they must
/// not relayout anything else. Unknown surfaces are no-ops.
pub trait HoverScene {
    fn plot_bounds(&self, surface: SurfaceId) -> Option<PlotBounds>;
    fn sample_position(&self, surface: SurfaceId, entity: &EntityId) -> Option<Point>;
    fn show_indicator(&mut self, surface: SurfaceId, center: Point);
    fn hide_indicator(&mut self, surface: SurfaceId);
}

/// Retained render state of one chart surface.
#[derive(Debug, Clone, Default)]
pub struct RetainedSurface {
    bounds: Option<PlotBounds>,
    samples: IndexMap<EntityId, Point>,
    indicator: HoverIndicator,
    layout_generation: u64,
}

impl RetainedSurface {
    #[must_use]
    pub fn new(bounds: Option<PlotBounds>) -> Self {
        Self {
            bounds,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn bounds(&self) -> Option<PlotBounds> {
        self.bounds
    }

    #[must_use]
    pub fn indicator(&self) -> HoverIndicator {
        self.indicator
    }

    #[must_use]
    pub fn sample(&self, entity: &EntityId) -> Option<Point> {
        self.samples.get(entity).copied()
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Bumped by every layout change; hover updates leave it alone.
    #[must_use]
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn set_bounds(&mut self, bounds: Option<PlotBounds>) {
        self.bounds = bounds;
        self.layout_generation += 1;
    }

    pub fn set_samples(&mut self, samples: impl IntoIterator<Item = (EntityId, Point)>) {
        self.samples = samples.into_iter().collect();
        self.layout_generation += 1;
    }

    /// Lays out every projected event against the visible x/y ranges.
    ///
    /// Events whose value is `None` are not rendered. Positions outside the
    /// plot bounds are kept; hover treats them as clipped.
    pub fn layout_projection(
        &mut self,
        projection: &Projection,
        visible_x: (f64, f64),
        visible_y: (f64, f64),
        value_of: impl Fn(&TimelineEvent) -> Option<f64>,
    ) -> ChartResult<usize> {
        let Some(bounds) = self.bounds else {
            return Ok(0);
        };
        let x_scale = LinearScale::new(visible_x.0, visible_x.1)?;
        let y_scale = LinearScale::new(visible_y.0, visible_y.1)?;

        let mut samples = IndexMap::with_capacity(projection.events.len());
        for projected in &projection.events {
            let Some(value) = value_of(&projected.event).filter(|v| v.is_finite()) else {
                continue;
            };
            let x = x_scale.value_to_pixel(projected.coordinate, bounds)?;
            let y = bounds.bottom() - y_scale.value_to_fraction(value) * bounds.height;
            samples.insert(projected.event.id.clone(), Point::new(x, y));
        }
        let count = samples.len();
        self.samples = samples;
        self.layout_generation += 1;
        trace!(count, "surface layout");
        Ok(count)
    }
}

/// All mounted surfaces, addressed by id.
#[derive(Debug, Clone, Default)]
pub struct RetainedScene {
    surfaces: IndexMap<SurfaceId, RetainedSurface>,
}

impl RetainedScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_surface(&mut self, id: SurfaceId, surface: RetainedSurface) {
        self.surfaces.insert(id, surface);
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> Option<RetainedSurface> {
        self.surfaces.shift_remove(&id)
    }

    #[must_use]
    pub fn surface(&self, id: SurfaceId) -> Option<&RetainedSurface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut RetainedSurface> {
        self.surfaces.get_mut(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl HoverScene for RetainedScene {
    fn plot_bounds(&self, surface: SurfaceId) -> Option<PlotBounds> {
        self.surfaces.get(&surface).and_then(RetainedSurface::bounds)
    }

    fn sample_position(&self, surface: SurfaceId, entity: &EntityId) -> Option<Point> {
        self.surfaces.get(&surface)?.sample(entity)
    }

    fn show_indicator(&mut self, surface: SurfaceId, center: Point) {
        if let Some(surface) = self.surfaces.get_mut(&surface) {
            surface.indicator.move_to(center);
        }
    }

    fn hide_indicator(&mut self, surface: SurfaceId) {
        if let Some(surface) = self.surfaces.get_mut(&surface) {
            surface.indicator.hide();
        }
    }
}
