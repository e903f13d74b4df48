use sentiment_chart::api::{ChartEngineConfig, ChartOrchestrator, MountPhase, OverlayKind};
use sentiment_chart::coordinators::{
    ContainerSize, ManualResizeObserver, ResizeCallback, ResizeObserver,
};
use sentiment_chart::core::{ChartEvent, ChartPoint, EventCategory, Viewport};
use sentiment_chart::error::{ChartError, ChartResult, LifecycleError};
use sentiment_chart::render::NullRenderer;
use sentiment_chart::series::{EventMarkersManager, PriceSeriesManager, SeriesManager};
use sentiment_chart::surface::{SurfaceHandle, SurfaceOptions};

const DAY: f64 = 86_400.0;

fn points(count: usize) -> Vec<ChartPoint> {
    (0..count)
        .map(|i| {
            let base = 100.0 + i as f64;
            ChartPoint::new(i as f64 * DAY, base, base + 2.0, base - 2.0, base + 1.0, 0.1)
                .with_confidence(0.8)
                .with_momentum(0.05 * i as f64 - 0.1)
                .with_volume(1_000.0 + i as f64)
        })
        .collect()
}

fn engine() -> ChartOrchestrator<NullRenderer> {
    ChartOrchestrator::new(ChartEngineConfig::new("BTC"), NullRenderer::default())
        .expect("engine")
}

struct FailingObserver;

impl ResizeObserver for FailingObserver {
    fn observe(&mut self, _callback: ResizeCallback) -> ChartResult<()> {
        Err(ChartError::InvalidData("container is gone".to_owned()))
    }

    fn disconnect(&mut self) {}
}

#[test]
fn init_mounts_every_series_and_coordinator() {
    let mut engine = engine();
    let observer = ManualResizeObserver::new();
    engine
        .init(ContainerSize::new(800.0, 400.0), Box::new(observer.clone()))
        .expect("init");

    assert_eq!(engine.phase(), MountPhase::Mounted);
    let handles = engine.series_handles();
    assert!(handles.price.is_some());
    assert!(handles.sentiment.is_some());
    assert!(handles.confidence.is_some());
    assert!(handles.histogram.is_some());
    assert!(handles.momentum.is_some());
    assert!(handles.patterns.is_some());
    assert!(handles.markers.is_some());
    assert!(engine.is_crosshair_bound());
    assert!(engine.is_resize_connected());
    assert!(observer.is_observing());

    let surface = engine.surface().expect("surface");
    assert_eq!(surface.borrow().series_count(), 7);
    // Container height is ignored in favor of the configured height.
    assert_eq!(surface.borrow().viewport(), Viewport::new(800, 600));
}

#[test]
fn second_init_is_rejected_while_mounted() {
    let mut engine = engine();
    engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");
    let err = engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect_err("already mounted");
    assert_eq!(err.lifecycle(), Some(&LifecycleError::AlreadyMounted));
    assert!(engine.is_mounted());
}

#[test]
fn zero_width_container_fails_init_without_leaking_a_surface() {
    let mut engine = engine();
    let err = engine
        .init(
            ContainerSize::new(0.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect_err("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
    assert!(!engine.is_mounted());
    assert!(engine.surface().is_none());
}

#[test]
fn dispose_is_idempotent_and_keeps_stats_readable() {
    let mut engine = engine();
    let observer = ManualResizeObserver::new();
    engine
        .init(ContainerSize::new(800.0, 400.0), Box::new(observer.clone()))
        .expect("init");
    engine.set_data(points(5)).expect("data");

    engine.dispose();
    let after_first = engine.surface_stats().expect("stats survive dispose");
    engine.dispose();
    engine.dispose();

    assert_eq!(engine.phase(), MountPhase::Disposed);
    assert_eq!(engine.surface_stats(), Some(after_first));
    assert_eq!(after_first.series_removed, 7);
    assert_eq!(after_first.removals, 1);
    assert!(engine.surface().expect("surface").is_removed());
    assert_eq!(engine.series_handles(), Default::default());
    assert!(!engine.is_crosshair_bound());
    assert!(!engine.is_resize_connected());
    assert!(!observer.is_observing());
    assert_eq!(observer.disconnect_calls(), 1);
}

#[test]
fn dispose_before_init_is_a_no_op() {
    let mut engine = engine();
    engine.dispose();
    assert_eq!(engine.phase(), MountPhase::Unmounted);
    assert!(engine.surface_stats().is_none());
}

#[test]
fn failed_observer_disposes_the_partial_mount() {
    let mut engine = engine();
    engine.set_data(points(3)).expect("stored");
    let err = engine
        .init(ContainerSize::new(800.0, 400.0), Box::new(FailingObserver))
        .expect_err("observer failure");
    assert!(matches!(err, ChartError::InvalidData(_)));

    assert_eq!(engine.phase(), MountPhase::Disposed);
    let surface = engine.surface().expect("partial surface kept");
    assert!(surface.is_removed());
    assert_eq!(surface.borrow().series_count(), 0);
    assert_eq!(surface.borrow().crosshair_subscriber_count(), 0);
    assert!(!engine.is_crosshair_bound());

    engine.dispose();
    assert_eq!(engine.phase(), MountPhase::Disposed);
}

#[test]
fn remount_after_dispose_uses_a_fresh_surface() {
    let mut engine = engine();
    engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");
    engine.set_data(points(4)).expect("data");
    let first = engine.surface().cloned().expect("surface");
    engine.dispose();

    engine
        .init(
            ContainerSize::new(640.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("re-init");
    let second = engine.surface().expect("surface");
    assert!(!second.ptr_eq(&first));
    assert!(first.is_removed());
    assert_eq!(second.borrow().viewport().width, 640);
    // Stored data is pushed again on the new surface.
    let price = engine.series_handles().price.expect("price");
    assert_eq!(
        second.borrow().series_data(price).map(|data| data.len()),
        Some(4)
    );
}

#[test]
fn data_and_events_given_before_init_are_applied_on_mount() {
    let mut engine = engine();
    engine.set_data(points(5)).expect("stored");
    engine
        .set_events(vec![ChartEvent::new(
            "e1",
            2.0 * DAY,
            EventCategory::News,
            "Listing",
        )])
        .expect("stored");
    engine
        .set_overlay_visible(OverlayKind::Momentum, false)
        .expect("stored toggle");
    assert!(engine.surface().is_none());

    engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");

    let surface = engine.surface().expect("surface");
    let handles = engine.series_handles();
    let markers = handles.markers.expect("markers");
    assert_eq!(
        surface.borrow().series_data(markers).map(|data| data.len()),
        Some(1)
    );
    assert_eq!(
        surface
            .borrow()
            .is_series_visible(handles.momentum.expect("momentum")),
        Some(false)
    );
    assert_eq!(surface.stats().fit_content_calls, 1);
}

#[test]
fn markers_cannot_initialize_before_the_price_series() {
    let surface =
        SurfaceHandle::create(SurfaceOptions::new(Viewport::new(800, 400))).expect("surface");
    let mut markers = EventMarkersManager::new();
    let err = markers.initialize(&surface).expect_err("no price series");
    assert_eq!(
        err.lifecycle(),
        Some(&LifecycleError::PriceSeriesRequired {
            component: EventMarkersManager::NAME,
        })
    );

    let mut price = PriceSeriesManager::new();
    let price_id = price.initialize(&surface).expect("price");
    markers.attach_to_price(price_id);
    markers.initialize(&surface).expect("markers after price");
    assert_eq!(surface.borrow().series_count(), 2);
}

#[test]
fn operations_on_an_unmounted_engine_report_not_mounted() {
    let mut engine = engine();
    let err = engine.pointer_move(10.0, 10.0).expect_err("unmounted");
    assert_eq!(err.lifecycle(), Some(&LifecycleError::NotMounted));
    let err = engine.render().expect_err("unmounted");
    assert_eq!(err.lifecycle(), Some(&LifecycleError::NotMounted));
}

#[test]
fn render_draws_a_frame_through_the_renderer() {
    let mut engine = engine();
    engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");
    engine.set_data(points(6)).expect("data");
    engine.render().expect("render");
    engine.render().expect("render");

    let renderer = engine.renderer();
    assert_eq!(renderer.frames_rendered, 2);
    assert!(renderer.last_summary.rects > 0);
    assert!(renderer.last_had_background);

    let renderer = engine.into_renderer();
    assert_eq!(renderer.frames_rendered, 2);
}
