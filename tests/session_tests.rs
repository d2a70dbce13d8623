use nightchart::api::{EngineConfig, ObservingSession, ZoomConfig};
use nightchart::core::{
    DayObs, EntityId, PlotBounds, Point, PointerModifiers, SurfaceId, TimeRange, TimelineEvent,
};
use nightchart::interaction::{GestureFrame, InteractionMode, Selection};
use nightchart::projection::{AxisMode, CoordinateMapping};
use nightchart::zoom::{ZoomDirection, ZoomDomain};

const HOUR_MS: f64 = 3_600_000.0;

fn day(value: u32) -> DayObs {
    DayObs::new(value).expect("valid dayobs")
}

fn session() -> ObservingSession {
    ObservingSession::new(day(20240601), day(20240603), EngineConfig::default()).expect("session")
}

fn selection(start: f64, end: f64, ctrl: bool) -> Selection {
    Selection {
        range: TimeRange::new(start, end).expect("range"),
        pixel_fractions: (0.0, 1.0),
        modifiers: PointerModifiers {
            ctrl,
            ..PointerModifiers::default()
        },
    }
}

fn bounds() -> PlotBounds {
    PlotBounds::new(0.0, 0.0, 100.0, 50.0).expect("bounds")
}

#[test]
fn session_starts_on_full_dayobs_range() {
    let session = session();
    let full = DayObs::window(day(20240601), day(20240603)).expect("window");
    assert_eq!(session.full_range(), full);
    assert_eq!(session.selected_range(), full);
    assert_eq!(session.axis_mode(), AxisMode::Time);
}

#[test]
fn reversed_day_range_is_rejected() {
    let err = ObservingSession::new(day(20240603), day(20240601), EngineConfig::default());
    assert!(err.is_err());
}

#[test]
fn zoom_in_selection_replaces_window() {
    let mut session = session();
    let start = session.full_range().start() + 2.0 * HOUR_MS;
    let end = start + 3.0 * HOUR_MS;

    let next = session
        .apply_selection(selection(start, end, false))
        .expect("zoomed");
    assert!((next.start() - start).abs() <= 1e-2);
    assert!((next.end() - end).abs() <= 1e-2);
    assert_eq!(session.selected_range(), next);
}

#[test]
fn tiny_selection_is_widened_to_min_span() {
    let mut session = session();
    let start = session.full_range().start() + 5.0 * HOUR_MS;

    let next = session
        .apply_selection(selection(start, start + 10.0, false))
        .expect("zoomed");
    assert!((next.span() - 1_000.0).abs() <= 1e-2);
}

#[test]
fn zoom_out_never_leaves_full_range() {
    let mut session = session();
    let full = session.full_range();
    let start = full.start() + HOUR_MS;
    session.apply_selection(selection(start, start + 2.0 * HOUR_MS, false));

    let inner = session.selected_range().start() + 0.9 * HOUR_MS;
    let next = session
        .apply_selection(selection(inner, inner + 0.2 * HOUR_MS, true))
        .expect("zoomed out");
    assert_eq!(next.start(), full.start());
    assert!(next.end() <= full.end());
    assert!(next.span() > 2.0 * HOUR_MS);
}

#[test]
fn reset_restores_full_range() {
    let mut session = session();
    let start = session.full_range().start() + HOUR_MS;
    session.apply_selection(selection(start, start + HOUR_MS, false));
    assert_ne!(session.selected_range(), session.full_range());

    session.reset();
    assert_eq!(session.selected_range(), session.full_range());
}

#[test]
fn saved_window_is_validated_against_full_range() {
    let mut session = session();
    let full = session.full_range();

    let start = full.start() + HOUR_MS;
    let restored = session.set_time_range_from_millis(start, start + HOUR_MS);
    assert_eq!((restored.start(), restored.end()), (start, start + HOUR_MS));

    assert_eq!(session.set_time_range_from_millis(f64::NAN, start), full);
    assert_eq!(session.set_time_range_from_millis(start + HOUR_MS, start), full);
    assert_eq!(session.set_time_range_from_millis(start, start), full);
    assert_eq!(
        session.set_time_range_from_millis(full.start() - 1.0, start),
        full
    );
    assert_eq!(
        session.set_time_range_from_millis(start, full.end() + 1.0),
        full
    );
}

#[test]
fn changing_day_range_resets_selection() {
    let mut session = session();
    let start = session.full_range().start() + HOUR_MS;
    session.apply_selection(selection(start, start + HOUR_MS, false));

    session
        .set_day_range(day(20240610), day(20240611))
        .expect("day range");
    let full = DayObs::window(day(20240610), day(20240611)).expect("window");
    assert_eq!(session.full_range(), full);
    assert_eq!(session.selected_range(), full);
    assert!(session.set_day_range(day(20240611), day(20240610)).is_err());
}

#[test]
fn mounted_surface_gestures_drive_the_session() {
    let mut session = session();
    let mut controller = session
        .mount_surface(SurfaceId(1), Some(bounds()))
        .expect("mount");
    let full = session.full_range();
    let a = full.start() + 2.0 * HOUR_MS;
    let b = full.start() + 4.0 * HOUR_MS;

    controller.press(
        &GestureFrame::over(a, Point::new(10.0, 10.0), 10.0),
        Some(bounds()),
    );
    assert_eq!(controller.mode(), InteractionMode::Dragging);
    controller.release(&GestureFrame::over(b, Point::new(30.0, 10.0), 30.0));
    assert_eq!(session.pending_commands(), 1);

    assert!(session.apply_pending());
    let selected = session.selected_range();
    assert!((selected.start() - a).abs() <= 1e-2);
    assert!((selected.end() - b).abs() <= 1e-2);

    controller.double_click();
    assert!(session.apply_pending());
    assert_eq!(session.selected_range(), full);
    assert!(!session.apply_pending());
}

#[test]
fn surfaces_mount_once_and_unmount_cleanly() {
    let mut session = session();
    session.mount_surface(SurfaceId(1), Some(bounds())).expect("mount");
    assert!(session.mount_surface(SurfaceId(1), Some(bounds())).is_err());
    assert!(session.hover_registry().is_registered(SurfaceId(1)));

    assert!(session.unmount_surface(SurfaceId(1)));
    assert!(!session.hover_registry().is_registered(SurfaceId(1)));
    assert!(session.scene().borrow().surface(SurfaceId(1)).is_none());
    assert!(!session.unmount_surface(SurfaceId(1)));
}

#[test]
fn hover_on_one_surface_shows_on_the_others() {
    let mut session = session();
    let mut first = session.mount_surface(SurfaceId(1), Some(bounds())).expect("mount");
    session.mount_surface(SurfaceId(2), Some(bounds())).expect("mount");

    {
        let scene = session.scene();
        let mut scene = scene.borrow_mut();
        for (id, point) in [(1, Point::new(10.0, 10.0)), (2, Point::new(40.0, 25.0))] {
            scene
                .surface_mut(SurfaceId(id))
                .expect("surface")
                .set_samples([(EntityId::from("exp-1"), point)]);
        }
    }

    first.pointer_move(&GestureFrame::over(1.0, Point::new(10.0, 10.0), 10.0).with_entity("exp-1"));
    let scene = session.scene();
    let indicator = scene
        .borrow()
        .surface(SurfaceId(2))
        .expect("surface")
        .indicator();
    assert!(indicator.visible);
    assert_eq!(indicator.center, Some(Point::new(40.0, 25.0)));
}

#[test]
fn projection_mapping_is_kept_for_controllers() {
    let mut session = ObservingSession::new(
        day(20240601),
        day(20240602),
        EngineConfig::default().with_axis_mode(AxisMode::Sequence),
    )
    .expect("session");
    let d1 = day(20240601);
    let events = vec![
        TimelineEvent::new("a", d1, d1.start_tai_millis() + HOUR_MS, 1).expect("event"),
        TimelineEvent::new("b", d1, d1.start_tai_millis() + 2.0 * HOUR_MS, 2).expect("event"),
    ];
    assert_eq!(session.mapping(), &CoordinateMapping::Identity);

    let projection = session
        .project(&events, &[d1, day(20240602)], &[])
        .expect("projection");
    assert_eq!(session.mapping(), &projection.mapping);
    assert_eq!(session.mapping().to_timestamp(2.0), Some(events[1].time));

    let mut controller = session.mount_surface(SurfaceId(3), Some(bounds())).expect("mount");
    assert_eq!(controller.mapping(), &projection.mapping);
    controller.set_mapping(CoordinateMapping::Identity);
    assert_eq!(controller.mapping(), &CoordinateMapping::Identity);
}

#[test]
fn invalid_config_is_rejected_at_session_start() {
    let config = EngineConfig::default().with_zoom(ZoomConfig {
        min_fraction_width: 2.0,
        min_time_span_ms: 1_000.0,
    });
    assert!(ObservingSession::new(day(20240601), day(20240601), config).is_err());
}

#[test]
fn value_axis_zoom_is_kept_per_surface() {
    let mut session = session();
    let _first = session.mount_surface(SurfaceId(1), Some(bounds())).expect("mount");
    let _second = session.mount_surface(SurfaceId(2), Some(bounds())).expect("mount");

    let zoomed = session
        .apply_value_zoom(SurfaceId(1), (0.2, 0.4), ZoomDirection::In)
        .expect("zoom in");
    let (min, max) = zoomed.resolve((0.0, 10.0));
    assert!((min - 2.0).abs() <= 1e-9);
    assert!((max - 4.0).abs() <= 1e-9);
    assert_eq!(session.value_domain(SurfaceId(1)), zoomed);
    assert_eq!(session.value_domain(SurfaceId(2)), ZoomDomain::FULL);

    let restored = session
        .apply_value_zoom(SurfaceId(1), (0.45, 0.55), ZoomDirection::Out)
        .expect("zoom out");
    assert_eq!(restored, ZoomDomain::FULL);
    assert_eq!(session.value_domain(SurfaceId(1)), ZoomDomain::FULL);
}

#[test]
fn value_axis_zoom_respects_configured_min_width() {
    let config = EngineConfig::default().with_zoom(ZoomConfig {
        min_fraction_width: 0.1,
        min_time_span_ms: 1_000.0,
    });
    let mut session =
        ObservingSession::new(day(20240601), day(20240603), config).expect("session");
    let _controller = session.mount_surface(SurfaceId(1), Some(bounds())).expect("mount");

    let zoomed = session
        .apply_value_zoom(SurfaceId(1), (0.5, 0.51), ZoomDirection::In)
        .expect("zoom in");
    assert!((zoomed.width() - 0.1).abs() <= 1e-9);
}

#[test]
fn value_axis_zoom_needs_a_mounted_surface() {
    let mut session = session();
    assert!(
        session
            .apply_value_zoom(SurfaceId(9), (0.2, 0.4), ZoomDirection::In)
            .is_none()
    );

    let _controller = session.mount_surface(SurfaceId(1), Some(bounds())).expect("mount");
    assert!(
        session
            .apply_value_zoom(SurfaceId(1), (0.3, 0.3), ZoomDirection::Out)
            .is_none()
    );
    session
        .apply_value_zoom(SurfaceId(1), (0.2, 0.4), ZoomDirection::In)
        .expect("zoom in");
    assert!(session.reset_value_zoom(SurfaceId(1)));
    assert!(!session.reset_value_zoom(SurfaceId(1)));

    session
        .apply_value_zoom(SurfaceId(1), (0.2, 0.4), ZoomDirection::In)
        .expect("zoom in");
    assert!(session.unmount_surface(SurfaceId(1)));
    assert_eq!(session.value_domain(SurfaceId(1)), ZoomDomain::FULL);
}
