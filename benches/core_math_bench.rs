use criterion::{Criterion, criterion_group, criterion_main};
use sentiment_chart::api::{ChartEngineConfig, ChartOrchestrator};
use sentiment_chart::coordinators::{ContainerSize, ManualResizeObserver};
use sentiment_chart::core::{ChartPoint, TimeScale};
use sentiment_chart::render::NullRenderer;
use sentiment_chart::surface::{CrosshairMoveEvent, PointerPosition};
use std::hint::black_box;

fn generated_points(count: usize) -> Vec<ChartPoint> {
    (0..count)
        .map(|i| {
            let t = i as f64 * 60.0;
            let base = 100.0 + (i as f64 * 0.01).sin() * 10.0;
            let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
            ChartPoint::new(
                t,
                base,
                base.max(close) + 0.75,
                base.min(close) - 0.75,
                close,
                (i as f64 * 0.05).sin(),
            )
            .with_confidence(0.7)
            .with_momentum((i as f64 * 0.03).cos() * 0.2)
            .with_volume(1_000.0 + i as f64)
        })
        .collect()
}

fn mounted(count: usize) -> ChartOrchestrator<NullRenderer> {
    let mut engine = ChartOrchestrator::new(ChartEngineConfig::new("BTC"), NullRenderer::default())
        .expect("engine init");
    engine
        .init(
            ContainerSize::new(1_920.0, 1_080.0),
            Box::new(ManualResizeObserver::new()),
        )
        .expect("mount");
    engine.set_data(generated_points(count)).expect("data");
    engine
}

fn bench_time_scale_round_trip(c: &mut Criterion) {
    let scale = TimeScale::new(0.0, 600_000.0).expect("valid time scale");

    c.bench_function("time_scale_round_trip", |b| {
        b.iter(|| {
            let px = scale
                .time_to_pixel(black_box(432_112.5), 1_920)
                .expect("to pixel");
            let _ = scale.pixel_to_time(px, 1_920).expect("from pixel");
        })
    });
}

fn bench_crosshair_lookup_10k(c: &mut Criterion) {
    let engine = mounted(10_000);
    let surface = engine.surface().cloned().expect("surface");
    let pointer = PointerPosition { x: 10.0, y: 10.0 };

    c.bench_function("crosshair_lookup_10k", |b| {
        let mut i = 0_usize;
        b.iter(|| {
            i = (i + 7_919) % 10_000;
            surface
                .dispatch_crosshair_move(CrosshairMoveEvent::at(black_box(i as f64 * 60.0), pointer))
                .expect("dispatch");
        })
    });
}

fn bench_set_data_2k(c: &mut Criterion) {
    let mut engine = mounted(0);
    let points = generated_points(2_000);

    c.bench_function("set_data_2k", |b| {
        b.iter(|| {
            engine
                .set_data(black_box(points.clone()))
                .expect("set data");
        })
    });
}

fn bench_render_frame_2k(c: &mut Criterion) {
    let engine = mounted(2_000);

    c.bench_function("render_frame_2k", |b| {
        b.iter(|| {
            let _ = engine.build_render_frame().expect("frame");
        })
    });
}

criterion_group!(
    benches,
    bench_time_scale_round_trip,
    bench_crosshair_lookup_10k,
    bench_set_data_2k,
    bench_render_frame_2k
);
criterion_main!(benches);
