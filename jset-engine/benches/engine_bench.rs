use criterion::{criterion_group, criterion_main, Criterion};

use jset_core::gradient::{build, default_gradient};
use jset_core::{IteratorKind, IteratorSpec, PolarCoefficient};
use jset_engine::CpuEngine;
use jset_render::{Engine, EngineHost};

struct NullHost;

impl EngineHost for NullHost {
    fn debug_byte(&mut self, _byte: u8) {}
    fn fault(&mut self) {}
}

fn loaded_engine(host: &mut NullHost) -> CpuEngine {
    let mut engine = CpuEngine::new();
    let arrays = build(&default_gradient()).unwrap();
    for (n, step) in arrays.steps().enumerate() {
        engine.set_gradient_step(host, n, step.start, step.end, step.shades);
    }
    engine.commit_gradient_step_count(host, arrays.step_count);
    engine.recompute_color_table(host);
    engine
}

fn bench_reiterate(c: &mut Criterion) {
    let mut host = NullHost;
    let mut engine = loaded_engine(&mut host);

    c.bench_function("reiterate_640x480_mandelbrot", |b| {
        b.iter(|| {
            engine.reiterate_and_render(
                &mut host,
                640,
                480,
                -2.0,
                1.125,
                3.0,
                IteratorKind::Mandelbrot,
            )
        });
    });
}

fn bench_reiterate_polynomial(c: &mut Criterion) {
    let mut host = NullHost;
    let mut engine = loaded_engine(&mut host);
    let spec = IteratorSpec::polynomial(vec![
        PolarCoefficient::new(0.8151, 0.9387),
        PolarCoefficient::new(0.0, 0.0),
        PolarCoefficient::new(1.0, 0.0),
    ])
    .unwrap();
    for (n, coeff) in spec.engine_coefficients().iter().enumerate() {
        engine.set_polynomial_coefficient(&mut host, n, coeff.re, coeff.im);
    }
    engine.commit_coefficient_count(&mut host, 3);

    c.bench_function("reiterate_640x480_cubic_polynomial", |b| {
        b.iter(|| {
            engine.reiterate_and_render(
                &mut host,
                640,
                480,
                -1.5,
                1.0,
                3.0,
                IteratorKind::Polynomial,
            )
        });
    });
}

fn bench_recolor(c: &mut Criterion) {
    let mut host = NullHost;
    let mut engine = loaded_engine(&mut host);
    engine.reiterate_and_render(&mut host, 640, 480, -2.0, 1.125, 3.0, IteratorKind::Mandelbrot);

    c.bench_function("recolor_640x480", |b| {
        b.iter(|| engine.recolor(&mut host, 640, 480));
    });
}

fn bench_recolor_smoothed(c: &mut Criterion) {
    let mut host = NullHost;
    let mut engine = loaded_engine(&mut host).with_smoothing(0.8);
    engine.reiterate_and_render(&mut host, 640, 480, -2.0, 1.125, 3.0, IteratorKind::Mandelbrot);

    c.bench_function("recolor_640x480_smoothed", |b| {
        b.iter(|| engine.recolor(&mut host, 640, 480));
    });
}

criterion_group!(
    benches,
    bench_reiterate,
    bench_reiterate_polynomial,
    bench_recolor,
    bench_recolor_smoothed
);
criterion_main!(benches);
