use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::{DayObs, IntervalMarker, PlotBounds, SurfaceId, TimeRange, TimelineEvent};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    GestureController, HoverForwarder, HoverRegistry, Selection, SelectionHandler,
};
use crate::projection::{AxisMode, CoordinateMapping, Projection, ProjectionInput, project};
use crate::render::{RetainedScene, RetainedSurface};
use crate::zoom::{ZoomDirection, ZoomDomain, zoom, zoom_time_range};

use super::EngineConfig;

/// Gesture outcome waiting for the session to apply it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    Select(Selection),
    Reset,
}

/// Selection handler installed on mounted surfaces. Commands queue up until
/// [`ObservingSession::apply_pending`] drains them.
#[derive(Debug, Clone, Default)]
struct CommandQueue {
    pending: Rc<RefCell<VecDeque<SessionCommand>>>,
}

impl SelectionHandler for CommandQueue {
    fn on_select(&mut self, selection: Selection) {
        self.pending
            .borrow_mut()
            .push_back(SessionCommand::Select(selection));
    }

    fn on_reset(&mut self) {
        self.pending.borrow_mut().push_back(SessionCommand::Reset);
    }
}

/// One observing-night page: a dayobs range, the time window the user has
/// zoomed to, and every chart surface sharing hover and selection.
#[derive(Debug)]
pub struct ObservingSession {
    config: EngineConfig,
    day_range: (DayObs, DayObs),
    full_range: TimeRange,
    selected: TimeRange,
    axis_mode: AxisMode,
    mapping: CoordinateMapping,
    hover: Rc<HoverRegistry>,
    scene: Rc<RefCell<RetainedScene>>,
    /// Value-axis zoom per surface; absent means the full auto domain.
    value_zoom: IndexMap<SurfaceId, ZoomDomain>,
    commands: CommandQueue,
}

impl ObservingSession {
    pub fn new(start: DayObs, end: DayObs, config: EngineConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        let full_range = DayObs::window(start, end)?;
        Ok(Self {
            config,
            day_range: (start, end),
            full_range,
            selected: full_range,
            axis_mode: config.axis_mode,
            mapping: CoordinateMapping::Identity,
            hover: HoverRegistry::shared(),
            scene: Rc::new(RefCell::new(RetainedScene::new())),
            value_zoom: IndexMap::new(),
            commands: CommandQueue::default(),
        })
    }

    #[must_use]
    pub fn config(&self) -> EngineConfig {
        self.config
    }

    #[must_use]
    pub fn day_range(&self) -> (DayObs, DayObs) {
        self.day_range
    }

    /// The whole dayobs range; selections never leave it.
    #[must_use]
    pub fn full_range(&self) -> TimeRange {
        self.full_range
    }

    #[must_use]
    pub fn selected_range(&self) -> TimeRange {
        self.selected
    }

    #[must_use]
    pub fn axis_mode(&self) -> AxisMode {
        self.axis_mode
    }

    /// Mapping of the latest projection; hand it to every gesture controller.
    #[must_use]
    pub fn mapping(&self) -> &CoordinateMapping {
        &self.mapping
    }

    #[must_use]
    pub fn hover_registry(&self) -> Rc<HoverRegistry> {
        Rc::clone(&self.hover)
    }

    #[must_use]
    pub fn scene(&self) -> Rc<RefCell<RetainedScene>> {
        Rc::clone(&self.scene)
    }

    pub fn set_axis_mode(&mut self, mode: AxisMode) {
        self.axis_mode = mode;
    }

    /// Switches to another dayobs range; the selection resets to all of it.
    pub fn set_day_range(&mut self, start: DayObs, end: DayObs) -> ChartResult<()> {
        let full_range = DayObs::window(start, end)?;
        self.day_range = (start, end);
        self.full_range = full_range;
        self.selected = full_range;
        debug!(start = %start, end = %end, "day range changed");
        Ok(())
    }

    /// Applies a completed drag to the selected time window.
    ///
    /// Zoom-in narrows to the selection; ctrl zooms out around it. Either way
    /// the result stays inside the full range and respects the minimum span.
    /// Returns the new window, or `None` when the zoom was rejected.
    pub fn apply_selection(&mut self, selection: Selection) -> Option<TimeRange> {
        let current = self.selected;
        let span = current.span();
        if span <= 0.0 {
            return None;
        }
        let fractions = (
            (selection.range.start() - current.start()) / span,
            (selection.range.end() - current.start()) / span,
        );
        let direction = selection.direction();
        let next = zoom_time_range(
            fractions,
            direction,
            current,
            self.full_range,
            self.config.zoom.min_time_span_ms,
        )?;
        self.selected = next;
        debug!(
            ?direction,
            start = next.start(),
            end = next.end(),
            "time window zoomed"
        );
        Some(next)
    }

    /// Back to the full dayobs range.
    pub fn reset(&mut self) {
        self.selected = self.full_range;
        debug!("time window reset");
    }

    /// Visible fraction of `surface`'s value axis.
    #[must_use]
    pub fn value_domain(&self, surface: SurfaceId) -> ZoomDomain {
        self.value_zoom
            .get(&surface)
            .copied()
            .unwrap_or(ZoomDomain::FULL)
    }

    /// Zooms the value axis of a mounted surface.
    ///
    /// `selection` holds fractions of the surface's current view. Returns the
    /// new domain, or `None` when the surface is not mounted or the zoom was
    /// rejected.
    pub fn apply_value_zoom(
        &mut self,
        surface: SurfaceId,
        selection: (f64, f64),
        direction: ZoomDirection,
    ) -> Option<ZoomDomain> {
        if self.scene.borrow().surface(surface).is_none() {
            return None;
        }
        let current = self.value_domain(surface);
        let next = zoom(
            selection,
            direction,
            current,
            self.config.zoom.min_fraction_width,
        )?;
        if next.is_full() {
            self.value_zoom.shift_remove(&surface);
        } else {
            self.value_zoom.insert(surface, next);
        }
        debug!(
            surface = %surface,
            ?direction,
            min = next.min(),
            max = next.max(),
            "value axis zoomed"
        );
        Some(next)
    }

    /// Back to the full auto domain on `surface`'s value axis.
    pub fn reset_value_zoom(&mut self, surface: SurfaceId) -> bool {
        self.value_zoom.shift_remove(&surface).is_some()
    }

    /// Restores a window from raw millisecond bounds (e.g. a saved view).
    ///
    /// Anything unusable falls back to the full range: non-finite or
    /// reversed bounds, an empty window, or one reaching outside the range.
    pub fn set_time_range_from_millis(&mut self, start_ms: f64, end_ms: f64) -> TimeRange {
        let valid = start_ms.is_finite()
            && end_ms.is_finite()
            && start_ms < end_ms
            && start_ms >= self.full_range.start()
            && end_ms <= self.full_range.end();
        self.selected = if valid {
            TimeRange::new(start_ms, end_ms).unwrap_or(self.full_range)
        } else {
            warn!(start_ms, end_ms, "time window rejected; using full range");
            self.full_range
        };
        self.selected
    }

    /// Applies gesture outcomes queued by mounted surfaces, in order.
    ///
    /// Returns `true` when the selected window changed.
    pub fn apply_pending(&mut self) -> bool {
        let before = self.selected;
        let drained: Vec<SessionCommand> = self.commands.pending.borrow_mut().drain(..).collect();
        for command in drained {
            match command {
                SessionCommand::Select(selection) => {
                    self.apply_selection(selection);
                }
                SessionCommand::Reset => self.reset(),
            }
        }
        self.selected != before
    }

    #[must_use]
    pub fn pending_commands(&self) -> usize {
        self.commands.pending.borrow().len()
    }

    /// Projects events for the selected window on the current axis.
    ///
    /// The new mapping is kept for [`Self::mapping`]; controllers pick it up
    /// through [`GestureController::set_mapping`].
    pub fn project(
        &mut self,
        events: &[TimelineEvent],
        day_keys: &[DayObs],
        intervals: &[IntervalMarker],
    ) -> ChartResult<Projection> {
        let projection = project(
            self.axis_mode,
            ProjectionInput {
                events,
                day_keys,
                window: self.selected,
                intervals,
            },
            self.config.projection,
        )?;
        self.mapping = projection.mapping.clone();
        Ok(projection)
    }

    /// Re-applies the hovered sample after surfaces were laid out again.
    pub fn refresh_hover(&self) {
        match self.scene.try_borrow_mut() {
            Ok(mut scene) => {
                self.hover.refresh(&mut *scene);
            }
            Err(_) => warn!("scene busy; hover refresh skipped"),
        }
    }

    /// Adds a surface to the scene and hover registry and returns its
    /// gesture controller, already wired to this session.
    pub fn mount_surface(
        &mut self,
        id: SurfaceId,
        bounds: Option<PlotBounds>,
    ) -> ChartResult<GestureController> {
        {
            let mut scene = self.scene.borrow_mut();
            if scene.surface(id).is_some() {
                return Err(ChartError::InvalidData(format!("{id} is already mounted")));
            }
            scene.insert_surface(id, RetainedSurface::new(bounds));
        }
        self.hover.register(id);

        let mut controller =
            GestureController::new(id, self.mapping.clone(), self.commands.clone())
                .with_overlay_styles(self.config.raw_overlay, self.config.snapped_overlay);
        controller.register_observer(Box::new(HoverForwarder::new(
            id,
            Rc::clone(&self.hover),
            Rc::clone(&self.scene),
        )))?;
        debug!(surface = %id, "surface mounted");
        Ok(controller)
    }

    /// Removes a surface from hover fan-out and the scene.
    pub fn unmount_surface(&mut self, id: SurfaceId) -> bool {
        self.value_zoom.shift_remove(&id);
        let unregistered = self.hover.unregister(id);
        let removed = self.scene.borrow_mut().remove_surface(id).is_some();
        if removed {
            debug!(surface = %id, "surface unmounted");
        }
        unregistered || removed
    }
}
