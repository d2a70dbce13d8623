use std::cell::RefCell;
use std::rc::Rc;

use nightchart::core::{DayObs, EntityId, PlotBounds, Point, SurfaceId, TimelineEvent};
use nightchart::interaction::{
    GestureController, GestureFrame, HoverForwarder, HoverOutcome, HoverRegistry,
    SelectionCallbacks,
};
use nightchart::projection::{AxisMode, CoordinateMapping, ProjectionConfig, ProjectionInput, project};
use nightchart::render::{HoverScene, RetainedScene, RetainedSurface};

fn bounds() -> PlotBounds {
    PlotBounds::new(0.0, 0.0, 200.0, 100.0).expect("bounds")
}

fn surface_with(samples: &[(&str, Point)]) -> RetainedSurface {
    let mut surface = RetainedSurface::new(Some(bounds()));
    surface.set_samples(
        samples
            .iter()
            .map(|(id, point)| (EntityId::from(*id), *point)),
    );
    surface
}

/// Three surfaces; `E123` is plotted on the first two only.
fn three_surface_scene() -> (RetainedScene, HoverRegistry) {
    let mut scene = RetainedScene::new();
    scene.insert_surface(SurfaceId(1), surface_with(&[("E123", Point::new(10.0, 20.0))]));
    scene.insert_surface(
        SurfaceId(2),
        surface_with(&[("E123", Point::new(50.0, 60.0)), ("E9", Point::new(1.0, 1.0))]),
    );
    scene.insert_surface(SurfaceId(3), surface_with(&[("E9", Point::new(5.0, 5.0))]));

    let registry = HoverRegistry::new();
    for id in 1..=3 {
        registry.register(SurfaceId(id));
    }
    (scene, registry)
}

fn indicator_center(scene: &RetainedScene, id: u32) -> Option<Point> {
    let indicator = scene.surface(SurfaceId(id)).expect("surface").indicator();
    indicator.visible.then_some(indicator.center).flatten()
}

#[test]
fn hover_shows_indicator_only_where_entity_is_plotted() {
    let (mut scene, registry) = three_surface_scene();

    let outcome = registry.set_hover(Some(EntityId::from("E123")), &mut scene);

    assert_eq!(outcome, HoverOutcome { shown: 2, hidden: 1 });
    assert_eq!(indicator_center(&scene, 1), Some(Point::new(10.0, 20.0)));
    assert_eq!(indicator_center(&scene, 2), Some(Point::new(50.0, 60.0)));
    assert_eq!(indicator_center(&scene, 3), None);
    assert_eq!(registry.hovered(), Some(EntityId::from("E123")));
}

#[test]
fn hover_never_triggers_layout() {
    let (mut scene, registry) = three_surface_scene();
    let before: Vec<u64> = (1..=3)
        .map(|id| scene.surface(SurfaceId(id)).expect("surface").layout_generation())
        .collect();

    registry.set_hover(Some(EntityId::from("E123")), &mut scene);
    registry.set_hover(Some(EntityId::from("E9")), &mut scene);
    registry.set_hover(None, &mut scene);

    let after: Vec<u64> = (1..=3)
        .map(|id| scene.surface(SurfaceId(id)).expect("surface").layout_generation())
        .collect();
    assert_eq!(before, after);
}

#[test]
fn clearing_hover_hides_everything_and_is_idempotent() {
    let (mut scene, registry) = three_surface_scene();
    registry.set_hover(Some(EntityId::from("E123")), &mut scene);

    let first = registry.set_hover(None, &mut scene);
    let second = registry.set_hover(None, &mut scene);

    assert_eq!(first, HoverOutcome { shown: 0, hidden: 3 });
    assert_eq!(first, second);
    for id in 1..=3 {
        assert_eq!(indicator_center(&scene, id), None);
    }
    assert_eq!(registry.hovered(), None);
}

#[test]
fn samples_outside_plot_area_are_hidden() {
    let mut scene = RetainedScene::new();
    scene.insert_surface(SurfaceId(1), surface_with(&[("E1", Point::new(250.0, 20.0))]));
    scene.insert_surface(SurfaceId(2), surface_with(&[("E1", Point::new(f64::NAN, 20.0))]));
    scene.insert_surface(SurfaceId(3), RetainedSurface::new(None));
    let registry = HoverRegistry::new();
    for id in 1..=3 {
        registry.register(SurfaceId(id));
    }

    let outcome = registry.set_hover(Some(EntityId::from("E1")), &mut scene);
    assert_eq!(outcome, HoverOutcome { shown: 0, hidden: 3 });
}

#[test]
fn registration_is_idempotent() {
    let registry = HoverRegistry::new();
    assert!(registry.register(SurfaceId(7)));
    assert!(!registry.register(SurfaceId(7)));
    assert_eq!(registry.len(), 1);

    assert!(registry.unregister(SurfaceId(7)));
    assert!(!registry.unregister(SurfaceId(7)));
    assert!(registry.is_empty());
}

#[test]
fn unregistered_surfaces_are_left_alone() {
    let (mut scene, registry) = three_surface_scene();
    registry.set_hover(Some(EntityId::from("E123")), &mut scene);
    registry.unregister(SurfaceId(2));

    registry.set_hover(None, &mut scene);
    assert_eq!(indicator_center(&scene, 1), None);
    assert_eq!(indicator_center(&scene, 2), Some(Point::new(50.0, 60.0)));
}

/// Scene wrapper whose first indicator update unmounts another surface, the
/// way a chart torn down by a hover side effect would.
struct UnmountingScene {
    inner: RetainedScene,
    registry: Rc<HoverRegistry>,
    victim: SurfaceId,
    touched: Vec<SurfaceId>,
}

impl HoverScene for UnmountingScene {
    fn plot_bounds(&self, surface: SurfaceId) -> Option<PlotBounds> {
        self.inner.plot_bounds(surface)
    }

    fn sample_position(&self, surface: SurfaceId, entity: &EntityId) -> Option<Point> {
        self.inner.sample_position(surface, entity)
    }

    fn show_indicator(&mut self, surface: SurfaceId, center: Point) {
        self.touched.push(surface);
        self.registry.unregister(self.victim);
        self.inner.show_indicator(surface, center);
    }

    fn hide_indicator(&mut self, surface: SurfaceId) {
        self.touched.push(surface);
        self.registry.unregister(self.victim);
        self.inner.hide_indicator(surface);
    }
}

#[test]
fn surface_unregistered_mid_fan_out_is_skipped() {
    let (inner, _) = three_surface_scene();
    let registry = HoverRegistry::shared();
    for id in 1..=3 {
        registry.register(SurfaceId(id));
    }
    let mut scene = UnmountingScene {
        inner,
        registry: Rc::clone(&registry),
        victim: SurfaceId(2),
        touched: Vec::new(),
    };

    let outcome = registry.set_hover(Some(EntityId::from("E123")), &mut scene);

    assert_eq!(scene.touched, vec![SurfaceId(1), SurfaceId(3)]);
    assert_eq!(outcome, HoverOutcome { shown: 1, hidden: 1 });
    assert!(!registry.is_registered(SurfaceId(2)));
}

#[test]
fn refresh_follows_relayout() {
    let (mut scene, registry) = three_surface_scene();
    registry.set_hover(Some(EntityId::from("E123")), &mut scene);

    scene
        .surface_mut(SurfaceId(1))
        .expect("surface")
        .set_samples([(EntityId::from("E123"), Point::new(90.0, 30.0))]);
    registry.refresh(&mut scene);

    assert_eq!(indicator_center(&scene, 1), Some(Point::new(90.0, 30.0)));
}

#[test]
fn forwarder_feeds_pointer_moves_into_registry() {
    let registry = HoverRegistry::shared();
    let scene = Rc::new(RefCell::new(three_surface_scene().0));
    for id in 1..=3 {
        registry.register(SurfaceId(id));
    }

    let mut controller = GestureController::new(
        SurfaceId(1),
        CoordinateMapping::Identity,
        SelectionCallbacks::new(|_| {}, || {}),
    );
    controller
        .register_observer(Box::new(HoverForwarder::new(
            SurfaceId(1),
            Rc::clone(&registry),
            Rc::clone(&scene),
        )))
        .expect("register forwarder");

    let over_e123 = GestureFrame::over(5.0, Point::new(10.0, 20.0), 10.0).with_entity("E123");
    controller.pointer_move(&over_e123);
    assert_eq!(registry.hovered(), Some(EntityId::from("E123")));
    assert_eq!(indicator_center(&scene.borrow(), 2), Some(Point::new(50.0, 60.0)));

    controller.press(&over_e123, Some(bounds()));
    assert_eq!(registry.hovered(), None);
    controller.pointer_move(&over_e123);
    assert_eq!(registry.hovered(), None);

    controller.release(&over_e123);
    controller.pointer_move(&over_e123);
    assert_eq!(registry.hovered(), Some(EntityId::from("E123")));

    controller.pointer_leave();
    assert_eq!(registry.hovered(), None);
    assert_eq!(indicator_center(&scene.borrow(), 1), None);
}

#[test]
fn layout_projection_places_samples_in_plot_pixels() {
    let d1 = DayObs::new(20240601).expect("day");
    let events = vec![
        TimelineEvent::new("a", d1, d1.start_tai_millis() + 3_600_000.0, 1).expect("event"),
        TimelineEvent::new("b", d1, d1.start_tai_millis() + 7_200_000.0, 2).expect("event"),
    ];
    let projection = project(
        AxisMode::Sequence,
        ProjectionInput {
            events: &events,
            day_keys: &[d1],
            window: DayObs::window(d1, d1).expect("window"),
            intervals: &[],
        },
        ProjectionConfig::default(),
    )
    .expect("projection");

    let mut surface = RetainedSurface::new(Some(bounds()));
    let generation = surface.layout_generation();
    let values = |event: &TimelineEvent| match event.id.as_str() {
        "a" => Some(0.0),
        _ => Some(10.0),
    };
    let laid_out = surface
        .layout_projection(&projection, projection.domain, (0.0, 10.0), values)
        .expect("layout");

    assert_eq!(laid_out, 2);
    assert!(surface.layout_generation() > generation);
    // Domain (0, 3) over 200 px: coordinates 1 and 2 land at 66.67 and 133.33.
    let a = surface.sample(&EntityId::from("a")).expect("a");
    let b = surface.sample(&EntityId::from("b")).expect("b");
    assert!((a.x - 200.0 / 3.0).abs() <= 1e-9);
    assert!((a.y - 100.0).abs() <= 1e-9);
    assert!((b.x - 400.0 / 3.0).abs() <= 1e-9);
    assert!(b.y.abs() <= 1e-9);
}
