use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexSet;
use smallvec::SmallVec;
use tracing::{trace, warn};

use crate::core::{EntityId, SurfaceId};
use crate::render::HoverScene;

use super::{DragState, GestureEvent, GestureObserver};

/// Counts from one hover fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoverOutcome {
    pub shown: usize,
    pub hidden: usize,
}

/// Shares the hovered sample across every registered surface.
///
/// Methods take `&self` so surfaces (and scene callbacks in the middle of a
/// fan-out) can register and unregister through a shared handle. Fan-out
/// walks a snapshot of the registrations and re-checks membership before
/// touching each surface, so a surface removed mid-fan-out is skipped.
#[derive(Debug, Default)]
pub struct HoverRegistry {
    surfaces: RefCell<IndexSet<SurfaceId>>,
    hovered: RefCell<Option<EntityId>>,
}

impl HoverRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Returns `false` when the surface was already registered.
    pub fn register(&self, surface: SurfaceId) -> bool {
        let inserted = self.surfaces.borrow_mut().insert(surface);
        if inserted {
            trace!(%surface, "hover surface registered");
        }
        inserted
    }

    /// Returns `false` when the surface was not registered.
    pub fn unregister(&self, surface: SurfaceId) -> bool {
        let removed = self.surfaces.borrow_mut().shift_remove(&surface);
        if removed {
            trace!(%surface, "hover surface unregistered");
        }
        removed
    }

    #[must_use]
    pub fn is_registered(&self, surface: SurfaceId) -> bool {
        self.surfaces.borrow().contains(&surface)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.borrow().is_empty()
    }

    /// Registered surfaces in registration order.
    #[must_use]
    pub fn surfaces(&self) -> Vec<SurfaceId> {
        self.surfaces.borrow().iter().copied().collect()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered.borrow().clone()
    }

    /// Records the hovered sample and updates every surface's indicator.
    ///
    /// A surface shows its indicator only when it plots the sample inside
    /// its plot area; otherwise the indicator is hidden. `None` hides all.
    pub fn set_hover(&self, entity: Option<EntityId>, scene: &mut dyn HoverScene) -> HoverOutcome {
        *self.hovered.borrow_mut() = entity;
        self.fan_out(scene)
    }

    /// Re-applies the current hover, e.g. after a surface was laid out again.
    pub fn refresh(&self, scene: &mut dyn HoverScene) -> HoverOutcome {
        self.fan_out(scene)
    }

    fn fan_out(&self, scene: &mut dyn HoverScene) -> HoverOutcome {
        let hovered = self.hovered();
        let snapshot: SmallVec<[SurfaceId; 8]> = self.surfaces.borrow().iter().copied().collect();

        let mut outcome = HoverOutcome::default();
        for surface in snapshot {
            if !self.is_registered(surface) {
                trace!(%surface, "surface unregistered during fan-out; skipped");
                continue;
            }
            let target = hovered.as_ref().and_then(|entity| {
                let position = scene.sample_position(surface, entity)?;
                let bounds = scene.plot_bounds(surface)?;
                bounds.contains(position).then_some(position)
            });
            match target {
                Some(center) => {
                    scene.show_indicator(surface, center);
                    outcome.shown += 1;
                }
                None => {
                    scene.hide_indicator(surface);
                    outcome.hidden += 1;
                }
            }
        }
        trace!(
            hovered = hovered.as_ref().map(EntityId::as_str),
            shown = outcome.shown,
            hidden = outcome.hidden,
            "hover fan-out"
        );
        outcome
    }
}

/// Feeds a surface's pointer moves into the shared hover registry.
///
/// While the surface is dragging, hover is cleared so indicators do not
/// compete with the selection overlays.
pub struct HoverForwarder<S: HoverScene> {
    id: String,
    registry: Rc<HoverRegistry>,
    scene: Rc<RefCell<S>>,
}

impl<S: HoverScene> HoverForwarder<S> {
    pub fn new(surface: SurfaceId, registry: Rc<HoverRegistry>, scene: Rc<RefCell<S>>) -> Self {
        Self {
            id: format!("hover-forwarder/{surface}"),
            registry,
            scene,
        }
    }

    fn apply(&self, entity: Option<EntityId>) {
        // A scene already borrowed means we are inside its own callback.
        let Ok(mut scene) = self.scene.try_borrow_mut() else {
            warn!(id = %self.id, "scene busy; hover update dropped");
            return;
        };
        self.registry.set_hover(entity, &mut *scene);
    }
}

impl<S: HoverScene> GestureObserver for HoverForwarder<S> {
    fn id(&self) -> &str {
        &self.id
    }

    fn on_event(&mut self, event: &GestureEvent<'_>, drag: &DragState) {
        match event {
            GestureEvent::PointerMoved { frame } => {
                let entity = if drag.is_dragging {
                    None
                } else {
                    frame.active_entity.clone()
                };
                if entity != self.registry.hovered() {
                    self.apply(entity);
                }
            }
            GestureEvent::Pressed { .. } | GestureEvent::PointerLeft => {
                if self.registry.hovered().is_some() {
                    self.apply(None);
                }
            }
            GestureEvent::Released { .. }
            | GestureEvent::DoubleClicked
            | GestureEvent::Cancelled => {}
        }
    }
}
