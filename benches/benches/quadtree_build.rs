// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Circle, Point};
use understory_quadtree::{Builder, NodeBuffer, Region, Scene, SceneConfig, Square};

fn cut_region() -> Region {
    Region::new(
        Circle::new(Point::new(0.5, -0.25), 3.75),
        Circle::new(Point::new(1.5, 1.0), 1.25),
    )
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_depth");
    let root = Square::from_center(Point::ORIGIN, 8.0);
    let region = cut_region();
    let mut builder = Builder::new();
    let mut out = NodeBuffer::with_default_capacity();
    for &depth in &[3_u32, 5, 7] {
        let accepted = builder.build(root, &region, depth, &mut out).accepted;
        group.throughput(Throughput::Elements(accepted as u64));
        group.bench_function(format!("reused_d{}", depth), |b| {
            b.iter(|| {
                let stats = builder.build(root, black_box(&region), depth, &mut out);
                black_box(stats.accepted);
            });
        });
        group.bench_function(format!("fresh_d{}", depth), |b| {
            b.iter_batched(
                || (Builder::new(), NodeBuffer::with_default_capacity()),
                |(mut builder, mut out)| {
                    let stats = builder.build(root, black_box(&region), depth, &mut out);
                    black_box(stats.accepted);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_cap(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_cap");
    let root = Square::from_center(Point::ORIGIN, 8.0);
    let region = cut_region();
    let mut builder = Builder::new();
    for &cap in &[64_usize, 512, 4096] {
        let mut out = NodeBuffer::new(cap);
        group.bench_function(format!("d8_cap{}", cap), |b| {
            b.iter(|| {
                let stats = builder.build(root, black_box(&region), 8, &mut out);
                black_box(stats.truncated);
            });
        });
    }
    group.finish();
}

fn bench_scene_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    let mut scene = Scene::new(SceneConfig::default());
    scene.set_exclude_diameter(0.2);
    let mut t = 0.0_f64;
    group.bench_function("drag_exclude_recompute", |b| {
        b.iter(|| {
            t += 0.01;
            let target = Point::new(4.0 * t.sin(), 4.0 * t.cos());
            scene
                .move_toward(understory_quadtree::Handle::Exclude, target)
                .unwrap();
            black_box(scene.recompute().stats.accepted);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_depth, bench_cap, bench_scene_frames);
criterion_main!(benches);
