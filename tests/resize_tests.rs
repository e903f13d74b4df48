use sentiment_chart::api::{ChartEngineConfig, ChartOrchestrator, ToolbarAction};
use sentiment_chart::coordinators::{ContainerSize, ManualResizeObserver};
use sentiment_chart::core::ChartPoint;
use sentiment_chart::render::NullRenderer;

fn points() -> Vec<ChartPoint> {
    (0..48)
        .map(|i| {
            let base = 20.0 + (i as f64).sin();
            ChartPoint::new(i as f64 * 900.0, base, base + 0.5, base - 0.5, base + 0.2, 0.0)
        })
        .collect()
}

fn mounted(observer: &ManualResizeObserver) -> ChartOrchestrator<NullRenderer> {
    let config = ChartEngineConfig::new("AAPL").with_height(420);
    let mut engine = ChartOrchestrator::new(config, NullRenderer::default()).expect("engine");
    engine
        .init(ContainerSize::new(800.0, 300.0), Box::new(observer.clone()))
        .expect("init");
    engine.set_data(points()).expect("data");
    engine
}

fn visible_range(engine: &ChartOrchestrator<NullRenderer>) -> (f64, f64) {
    engine
        .surface()
        .expect("surface")
        .borrow()
        .time_scale()
        .visible_range()
}

#[test]
fn width_change_keeps_the_visible_window() {
    let observer = ManualResizeObserver::new();
    let mut engine = mounted(&observer);
    engine
        .handle_toolbar_action(ToolbarAction::ZoomIn)
        .expect("user zoom");
    let range = visible_range(&engine);
    let fits = engine.surface_stats().expect("stats").fit_content_calls;

    assert!(observer.notify(ContainerSize::new(1_234.4, 900.0)));

    let surface = engine.surface().expect("surface");
    let viewport = surface.borrow().viewport();
    assert_eq!(viewport.width, 1_234);
    assert_eq!(viewport.height, 420);
    assert_eq!(visible_range(&engine), range);
    assert_eq!(surface.stats().fit_content_calls, fits);
    assert_eq!(engine.resize_counts(), (1, 0));
}

#[test]
fn unusable_widths_are_skipped() {
    let observer = ManualResizeObserver::new();
    let engine = mounted(&observer);
    let applied_before = engine.surface_stats().expect("stats").apply_options_calls;

    observer.notify(ContainerSize::new(0.0, 300.0));
    observer.notify(ContainerSize::new(0.4, 300.0));
    observer.notify(ContainerSize::new(f64::NAN, 300.0));

    assert_eq!(engine.resize_counts(), (0, 3));
    assert_eq!(
        engine.surface_stats().expect("stats").apply_options_calls,
        applied_before
    );
    assert_eq!(engine.surface().expect("surface").borrow().viewport().width, 800);
}

#[test]
fn notifications_after_dispose_are_ignored() {
    let observer = ManualResizeObserver::new();
    let mut engine = mounted(&observer);
    engine.dispose();

    assert!(!observer.notify(ContainerSize::new(1_000.0, 300.0)));
    assert_eq!(engine.resize_counts(), (0, 0));
    assert_eq!(engine.surface().expect("surface").borrow().viewport().width, 800);
}
