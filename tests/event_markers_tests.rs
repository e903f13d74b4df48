use sentiment_chart::api::{ChartEngineConfig, ChartOrchestrator};
use sentiment_chart::coordinators::{ContainerSize, ManualResizeObserver};
use sentiment_chart::core::{ChartEvent, ChartPattern, ChartPoint, EventCategory, EventSeverity};
use sentiment_chart::extensions::{MarkerPosition, MarkerShape, SeriesMarker};
use sentiment_chart::render::NullRenderer;
use sentiment_chart::series::EventTiePolicy;
use sentiment_chart::surface::SeriesData;

const DAY: f64 = 86_400.0;

fn points() -> Vec<ChartPoint> {
    (0..6)
        .map(|i| {
            let base = 300.0 + 5.0 * i as f64;
            ChartPoint::new(i as f64 * DAY, base, base + 6.0, base - 6.0, base + 2.0, 0.3)
        })
        .collect()
}

fn mounted(policy: EventTiePolicy) -> ChartOrchestrator<NullRenderer> {
    let config = ChartEngineConfig::new("TSLA").with_event_tie_policy(policy);
    let mut engine = ChartOrchestrator::new(config, NullRenderer::default()).expect("engine");
    engine
        .init(
            ContainerSize::new(800.0, 400.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("init");
    engine.set_data(points()).expect("data");
    engine
}

fn markers(engine: &ChartOrchestrator<NullRenderer>) -> Vec<SeriesMarker> {
    let id = engine.series_handles().markers.expect("markers");
    match engine.surface().expect("surface").borrow().series_data(id) {
        Some(SeriesData::Markers(markers)) => markers.clone(),
        other => panic!("unexpected marker payload: {other:?}"),
    }
}

fn tied_events() -> Vec<ChartEvent> {
    vec![
        ChartEvent::new("earn", 2.0 * DAY, EventCategory::Earnings, "Q3 earnings")
            .with_severity(EventSeverity::High),
        ChartEvent::new("launch", 2.0 * DAY, EventCategory::Product, "Launch"),
        ChartEvent::new("cpi", 4.0 * DAY, EventCategory::Macro, "CPI print"),
    ]
}

#[test]
fn events_without_a_sample_are_skipped_and_counted() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    engine
        .set_events(vec![
            ChartEvent::new("hit", DAY, EventCategory::News, "Headline"),
            ChartEvent::new("miss", DAY + 1.0, EventCategory::News, "Off grid"),
        ])
        .expect("events");

    let markers = markers(&engine);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].id, "hit");
    assert_eq!(markers[0].shape, MarkerShape::Circle);
    assert_eq!(engine.skipped_events(), 1);
}

#[test]
fn render_all_keeps_every_tied_event() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    engine.set_events(tied_events()).expect("events");

    let markers = markers(&engine);
    let ids: Vec<&str> = markers.iter().map(|marker| marker.id.as_str()).collect();
    assert_eq!(ids, ["earn", "launch", "cpi"]);
    assert!(
        markers
            .iter()
            .all(|marker| marker.position == MarkerPosition::AboveBar)
    );
    assert_eq!(markers[0].shape, MarkerShape::Square);
    assert_eq!(markers[0].priority, 2);
    assert_eq!(markers[1].shape, MarkerShape::ArrowUp);
}

#[test]
fn latest_wins_drops_earlier_ties() {
    let mut engine = mounted(EventTiePolicy::LatestWins);
    engine.set_events(tied_events()).expect("events");

    let ids: Vec<String> = markers(&engine).into_iter().map(|marker| marker.id).collect();
    assert_eq!(ids, ["launch", "cpi"]);
}

#[test]
fn stack_puts_later_ties_below_the_bar() {
    let mut engine = mounted(EventTiePolicy::Stack);
    engine.set_events(tied_events()).expect("events");

    let positions: Vec<MarkerPosition> = markers(&engine)
        .iter()
        .map(|marker| marker.position)
        .collect();
    assert_eq!(
        positions,
        [
            MarkerPosition::AboveBar,
            MarkerPosition::BelowBar,
            MarkerPosition::AboveBar
        ]
    );
}

#[test]
fn events_follow_a_dataset_replacement() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    engine.set_events(tied_events()).expect("events");
    assert_eq!(engine.skipped_events(), 0);

    engine.set_data(points()[..3].to_vec()).expect("shorter data");
    assert_eq!(markers(&engine).len(), 2);
    assert_eq!(engine.skipped_events(), 1);
}

#[test]
fn set_events_does_not_refit() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    let fits = engine.surface_stats().expect("stats").fit_content_calls;
    engine.set_events(tied_events()).expect("events");
    engine.set_events(Vec::new()).expect("clear");
    assert_eq!(engine.surface_stats().expect("stats").fit_content_calls, fits);
    assert!(markers(&engine).is_empty());
}

#[test]
fn patterns_replace_the_box_overlay() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    let pattern = ChartPattern::new("p1", "bull-flag", "Bull flag", DAY, 3.0 * DAY).with_confidence(72.0);
    engine.set_patterns(vec![pattern.clone()]).expect("patterns");

    let id = engine.series_handles().patterns.expect("patterns");
    let surface = engine.surface().expect("surface");
    assert_eq!(
        surface.borrow().series_data(id),
        Some(&SeriesData::Boxes(vec![pattern]))
    );
    assert_eq!(engine.patterns().len(), 1);
}

#[test]
fn pattern_with_an_unbounded_span_is_skipped_at_render() {
    let mut engine = mounted(EventTiePolicy::RenderAll);
    let valid = ChartPattern::new("p1", "bull-flag", "Bull flag", DAY, 3.0 * DAY);
    engine.set_patterns(vec![valid.clone()]).expect("patterns");
    let rects_with_valid_only = engine.build_render_frame().expect("frame").rects.len();

    let mut broken = ChartPattern::new("p2", "wedge", "Wedge", DAY, 2.0 * DAY);
    broken.start_time = f64::NEG_INFINITY;
    engine.set_patterns(vec![valid, broken]).expect("patterns");

    let frame = engine.build_render_frame().expect("malformed pattern degrades");
    assert_eq!(frame.rects.len(), rects_with_valid_only);
    engine.render().expect("render");
}
