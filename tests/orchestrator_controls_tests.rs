use std::cell::RefCell;
use std::rc::Rc;

use approx::assert_relative_eq;
use sentiment_chart::api::{
    ChartEngineConfig, ChartOrchestrator, OverlayKind, ToggleChange, ToolbarAction,
};
use sentiment_chart::coordinators::{ContainerSize, ManualResizeObserver};
use sentiment_chart::core::{ChartPoint, Timeframe};
use sentiment_chart::render::NullRenderer;

const HOUR: f64 = 3_600.0;

fn points(count: usize) -> Vec<ChartPoint> {
    (0..count)
        .map(|i| {
            let base = 50.0 + (i % 7) as f64;
            ChartPoint::new(i as f64 * HOUR, base, base + 1.5, base - 1.5, base + 0.5, -0.2)
                .with_confidence(0.6)
                .with_momentum(0.1)
                .with_volume(10.0)
        })
        .collect()
}

fn mounted() -> ChartOrchestrator<NullRenderer> {
    let config = ChartEngineConfig::new("ETH").with_interval(Timeframe::OneHour);
    let mut engine = ChartOrchestrator::new(config, NullRenderer::default()).expect("engine");
    engine
        .init(
            ContainerSize::new(900.0, 500.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");
    engine.set_data(points(24)).expect("data");
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
fn toggles_touch_one_series_without_resending_data() {
    let mut engine = mounted();
    let before = engine.surface_stats().expect("stats");
    let range = visible_range(&engine);

    for kind in OverlayKind::ALL {
        engine.set_overlay_visible(kind, false).expect("hide");
        engine.set_overlay_visible(kind, true).expect("show");
    }

    let after = engine.surface_stats().expect("stats");
    assert_eq!(after.set_data_calls, before.set_data_calls);
    assert_eq!(after.fit_content_calls, before.fit_content_calls);
    // Six series overlays flip twice each; the crosshair has no series.
    assert_eq!(after.visibility_changes - before.visibility_changes, 12);
    assert_eq!(visible_range(&engine), range);
}

#[test]
fn hidden_overlay_stays_hidden_across_data_replacement() {
    let mut engine = mounted();
    engine
        .set_overlay_visible(OverlayKind::Sentiment, false)
        .expect("hide");
    engine.set_data(points(30)).expect("replace");

    let id = engine.series_handles().sentiment.expect("sentiment");
    let surface = engine.surface().expect("surface");
    assert_eq!(surface.borrow().is_series_visible(id), Some(false));
    assert_eq!(surface.borrow().series_data(id).map(|data| data.len()), Some(30));
    assert!(!engine.toggles().sentiment);
}

#[test]
fn toggle_listeners_hear_actual_changes_only() {
    let mut engine = mounted();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_toggle_change(move |change: &ToggleChange| sink.borrow_mut().push(*change));

    engine
        .set_overlay_visible(OverlayKind::Events, true)
        .expect("unchanged");
    engine.toggle_overlay(OverlayKind::Events).expect("flip");
    engine
        .handle_toolbar_action(ToolbarAction::Toggle(OverlayKind::Events))
        .expect("flip back");

    assert_eq!(
        *seen.borrow(),
        vec![
            ToggleChange {
                kind: OverlayKind::Events,
                visible: false
            },
            ToggleChange {
                kind: OverlayKind::Events,
                visible: true
            },
        ]
    );
}

#[test]
fn removed_listener_is_not_called_again() {
    let mut engine = mounted();
    let calls = Rc::new(RefCell::new(0_usize));
    let sink = Rc::clone(&calls);
    let id = engine.on_timeframe_change(move |_| *sink.borrow_mut() += 1);

    engine.set_timeframe(Timeframe::SixHours);
    assert!(engine.remove_listener(id));
    assert!(!engine.remove_listener(id));
    engine.set_timeframe(Timeframe::OneDay);

    assert_eq!(*calls.borrow(), 1);
}

#[test]
fn timeframe_action_updates_the_asset_badge() {
    let mut engine = mounted();
    assert_eq!(engine.asset_label(), "ETH · 1h");

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_timeframe_change(move |timeframe: &Timeframe| sink.borrow_mut().push(*timeframe));

    engine
        .handle_toolbar_action(ToolbarAction::SetTimeframe(Timeframe::SevenDays))
        .expect("timeframe");
    engine
        .handle_toolbar_action(ToolbarAction::SetTimeframe(Timeframe::SevenDays))
        .expect("same timeframe");

    assert_eq!(engine.timeframe(), Timeframe::SevenDays);
    assert_eq!(engine.asset_label(), "ETH · 7d");
    assert_eq!(*seen.borrow(), vec![Timeframe::SevenDays]);
}

#[test]
fn zoom_actions_inset_the_visible_range() {
    let mut engine = mounted();
    let (start, end) = visible_range(&engine);
    let span = end - start;

    engine
        .handle_toolbar_action(ToolbarAction::ZoomIn)
        .expect("zoom in");
    let (zoomed_start, zoomed_end) = visible_range(&engine);
    assert_relative_eq!(zoomed_start, start + span * 0.2, epsilon = 1e-6);
    assert_relative_eq!(zoomed_end, end - span * 0.2, epsilon = 1e-6);

    engine
        .handle_toolbar_action(ToolbarAction::ZoomOut)
        .expect("zoom out");
    let (out_start, out_end) = visible_range(&engine);
    assert!(out_end - out_start > zoomed_end - zoomed_start);
}

#[test]
fn auto_fit_restores_the_fitted_window() {
    let mut engine = mounted();
    let fitted = visible_range(&engine);
    let fits = engine.surface_stats().expect("stats").fit_content_calls;

    engine
        .handle_toolbar_action(ToolbarAction::ZoomIn)
        .expect("zoom in");
    assert_ne!(visible_range(&engine), fitted);
    engine
        .handle_toolbar_action(ToolbarAction::AutoFit)
        .expect("auto fit");

    let (start, end) = visible_range(&engine);
    assert_relative_eq!(start, fitted.0, epsilon = 1e-6);
    assert_relative_eq!(end, fitted.1, epsilon = 1e-6);
    assert_eq!(
        engine.surface_stats().expect("stats").fit_content_calls,
        fits + 1
    );
}

#[test]
fn compare_action_is_accepted_and_changes_nothing() {
    let mut engine = mounted();
    let stats = engine.surface_stats();
    let range = visible_range(&engine);
    engine
        .handle_toolbar_action(ToolbarAction::Compare)
        .expect("compare");
    assert_eq!(engine.surface_stats(), stats);
    assert_eq!(visible_range(&engine), range);
}

#[test]
fn momentum_stats_follow_the_dataset() {
    let engine = mounted();
    let stats = engine.momentum_stats();
    assert_relative_eq!(stats.min, 0.1, epsilon = 1e-12);
    assert_relative_eq!(stats.max, 0.1, epsilon = 1e-12);
    assert_relative_eq!(stats.avg, 0.1, epsilon = 1e-12);
}

#[test]
fn failed_toggle_leaves_the_flag_and_listeners_untouched() {
    let mut engine = mounted();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.on_toggle_change(move |change: &ToggleChange| sink.borrow_mut().push(*change));

    engine.surface().expect("surface").remove();
    engine
        .set_overlay_visible(OverlayKind::Sentiment, false)
        .expect_err("surface is gone");

    assert!(engine.toggles().get(OverlayKind::Sentiment));
    assert!(seen.borrow().is_empty());
}
