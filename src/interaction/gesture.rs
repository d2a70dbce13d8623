use tracing::{debug, trace};

use crate::core::{PlotBounds, SurfaceId, TimeRange};
use crate::error::{ChartError, ChartResult};
use crate::projection::CoordinateMapping;
use crate::render::OverlayStyle;

use super::{
    DragState, GestureEvent, GestureFrame, GestureObserver, InteractionMode, OverlayAttachment,
    OverlayPair, PointerButton, Selection, SelectionHandler,
};

/// Drag-to-select state machine for one chart surface.
///
/// A press over data anchors the drag, moves stretch both overlays, and a
/// release over a different instant reports a [`Selection`] in real time,
/// whatever the x axis currently shows. Double click asks for a reset.
pub struct GestureController {
    surface: SurfaceId,
    mapping: CoordinateMapping,
    drag: DragState,
    overlays: OverlayAttachment,
    raw_style: OverlayStyle,
    snapped_style: OverlayStyle,
    handler: Box<dyn SelectionHandler>,
    observers: Vec<Box<dyn GestureObserver>>,
}

impl GestureController {
    pub fn new(
        surface: SurfaceId,
        mapping: CoordinateMapping,
        handler: impl SelectionHandler + 'static,
    ) -> Self {
        Self {
            surface,
            mapping,
            drag: DragState::idle(),
            overlays: OverlayAttachment::Unattached,
            raw_style: OverlayStyle::raw_default(),
            snapped_style: OverlayStyle::snapped_default(),
            handler: Box::new(handler),
            observers: Vec::new(),
        }
    }

    /// Overrides overlay styles. Takes effect the next time overlays attach.
    #[must_use]
    pub fn with_overlay_styles(mut self, raw: OverlayStyle, snapped: OverlayStyle) -> Self {
        self.raw_style = raw;
        self.snapped_style = snapped;
        self
    }

    #[must_use]
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.drag.mode()
    }

    #[must_use]
    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    #[must_use]
    pub fn overlays(&self) -> Option<&OverlayPair> {
        self.overlays.pair()
    }

    #[must_use]
    pub fn mapping(&self) -> &CoordinateMapping {
        &self.mapping
    }

    /// Installs the mapping of a fresh projection. A drag in flight was
    /// anchored on the old axis, so it is dropped.
    pub fn set_mapping(&mut self, mapping: CoordinateMapping) {
        if self.drag.is_dragging {
            debug!(surface = %self.surface, "mapping replaced mid-drag; drag dropped");
            self.end_drag();
        }
        self.mapping = mapping;
    }

    pub fn register_observer(&mut self, observer: Box<dyn GestureObserver>) -> ChartResult<()> {
        let id = observer.id().to_owned();
        if id.is_empty() {
            return Err(ChartError::InvalidData(
                "gesture observer id must not be empty".to_owned(),
            ));
        }
        if self.observers.iter().any(|existing| existing.id() == id) {
            return Err(ChartError::InvalidData(format!(
                "gesture observer with id `{id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    pub fn unregister_observer(&mut self, id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id() != id);
        before != self.observers.len()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Starts a drag when the press lands on data.
    ///
    /// `geometry` is the current plot area; overlays are created from it on
    /// the first press that has one.
    pub fn press(&mut self, frame: &GestureFrame, geometry: Option<PlotBounds>) {
        self.begin_drag(frame, geometry);
        Self::emit(
            &mut self.observers,
            &GestureEvent::Pressed { frame },
            &self.drag,
        );
    }

    fn begin_drag(&mut self, frame: &GestureFrame, geometry: Option<PlotBounds>) {
        if frame.button != PointerButton::Primary {
            trace!(surface = %self.surface, button = ?frame.button, "press ignored: button");
            return;
        }
        let (Some(label), Some(pointer)) = (frame.finite_label(), frame.finite_pointer()) else {
            trace!(surface = %self.surface, "press ignored: nothing under pointer");
            return;
        };
        if !self
            .overlays
            .ensure_attached(geometry, self.raw_style, self.snapped_style)
        {
            debug!(surface = %self.surface, "press ignored: plot geometry unavailable");
            return;
        }
        let snapped = frame.finite_snapped_x().unwrap_or(pointer.x);

        self.drag = DragState {
            is_dragging: true,
            start_pixel: Some(pointer.x),
            start_snapped: Some(snapped),
            start_label: Some(label),
            current_pixel: Some(pointer.x),
            current_snapped: Some(snapped),
            current_label: Some(label),
            modifiers: frame.modifiers,
        };
        if let Some(pair) = self.overlays.pair_mut() {
            pair.update(&self.drag);
            pair.show();
        }
        trace!(surface = %self.surface, label, "drag started");
    }

    /// Stretches the overlays. Frames without a finite pointer leave the
    /// drag where it was.
    pub fn pointer_move(&mut self, frame: &GestureFrame) {
        if self.drag.is_dragging {
            if let Some(pointer) = frame.finite_pointer() {
                self.drag.current_pixel = Some(pointer.x);
                if let Some(snapped) = frame.finite_snapped_x() {
                    self.drag.current_snapped = Some(snapped);
                }
                if let Some(label) = frame.finite_label() {
                    self.drag.current_label = Some(label);
                }
                self.drag.modifiers = frame.modifiers;
                if let Some(pair) = self.overlays.pair_mut() {
                    pair.update(&self.drag);
                }
            }
        }
        Self::emit(
            &mut self.observers,
            &GestureEvent::PointerMoved { frame },
            &self.drag,
        );
    }

    /// Ends the drag and reports the selection, if any.
    ///
    /// The handler fires only when both ends map to real instants that
    /// differ; a plain click is a no-op. State is cleared either way.
    pub fn release(&mut self, frame: &GestureFrame) -> Option<Selection> {
        if frame.button != PointerButton::Primary {
            Self::emit(
                &mut self.observers,
                &GestureEvent::Released {
                    frame,
                    selection: None,
                },
                &self.drag,
            );
            return None;
        }

        let selection = self.resolve_selection(frame);
        self.end_drag();
        if let Some(selection) = selection {
            debug!(
                surface = %self.surface,
                start = selection.range.start(),
                end = selection.range.end(),
                direction = ?selection.direction(),
                "selection"
            );
            self.handler.on_select(selection);
        }
        Self::emit(
            &mut self.observers,
            &GestureEvent::Released { frame, selection },
            &self.drag,
        );
        selection
    }

    fn resolve_selection(&self, frame: &GestureFrame) -> Option<Selection> {
        if !self.drag.is_dragging {
            return None;
        }
        let start_label = self.drag.start_label?;
        let end_label = frame.finite_label().or(self.drag.current_label)?;

        let (Some(start), Some(end)) = (
            self.mapping.to_timestamp(start_label),
            self.mapping.to_timestamp(end_label),
        ) else {
            debug!(surface = %self.surface, start_label, end_label, "selection unmapped");
            return None;
        };
        if start == end {
            trace!(surface = %self.surface, "release on anchor; no selection");
            return None;
        }
        let range = TimeRange::new(start, end).ok()?;

        let end_pixel = frame
            .finite_pointer()
            .map(|pointer| pointer.x)
            .or(self.drag.current_pixel)?;
        let start_pixel = self.drag.start_pixel?;
        let bounds = self.overlays.pair()?.bounds();
        let modifiers = if frame.pointer.is_some() {
            frame.modifiers
        } else {
            self.drag.modifiers
        };

        Some(Selection {
            range,
            pixel_fractions: (bounds.fraction_x(start_pixel), bounds.fraction_x(end_pixel)),
            modifiers,
        })
    }

    /// Reset request: cancels any drag and asks the handler for the full range.
    pub fn double_click(&mut self) {
        self.end_drag();
        self.handler.on_reset();
        debug!(surface = %self.surface, "reset requested");
        Self::emit(&mut self.observers, &GestureEvent::DoubleClicked, &self.drag);
    }

    /// Pointer left the surface: the drag ends without a selection.
    pub fn pointer_leave(&mut self) {
        self.end_drag();
        Self::emit(&mut self.observers, &GestureEvent::PointerLeft, &self.drag);
    }

    /// Escape: abandons the drag without a selection.
    pub fn cancel(&mut self) {
        let was_dragging = self.drag.is_dragging;
        self.end_drag();
        if was_dragging {
            debug!(surface = %self.surface, "drag cancelled");
        }
        Self::emit(&mut self.observers, &GestureEvent::Cancelled, &self.drag);
    }

    /// Drops overlays and drag state. The next press with geometry
    /// re-creates the overlays.
    pub fn detach(&mut self) {
        self.drag = DragState::idle();
        self.overlays.detach();
        trace!(surface = %self.surface, "overlays detached");
    }

    fn end_drag(&mut self) {
        self.drag = DragState::idle();
        if let Some(pair) = self.overlays.pair_mut() {
            pair.hide();
        }
    }

    fn emit(
        observers: &mut [Box<dyn GestureObserver>],
        event: &GestureEvent<'_>,
        drag: &DragState,
    ) {
        for observer in observers {
            observer.on_event(event, drag);
        }
    }
}

impl std::fmt::Debug for GestureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureController")
            .field("surface", &self.surface)
            .field("mapping", &self.mapping)
            .field("drag", &self.drag)
            .field("overlays", &self.overlays)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}
