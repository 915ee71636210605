mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::DVec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use token_placer::prelude::{Disk, Polygon, RejectionSampler};

fn intersection_area_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/intersection_area");

    let target = common::square(1000.0);
    for &radius in &[10.0f64, 45.0, 90.0] {
        let inside = Disk::new(DVec2::new(500.0, 500.0), radius).to_polygon();
        group.bench_with_input(BenchmarkId::new("disk_inside_square", radius), &radius, |b, _| {
            b.iter(|| black_box(inside.intersection_area(black_box(&target))));
        });

        let edge = Disk::new(DVec2::new(0.0, 500.0), radius).to_polygon();
        group.bench_with_input(BenchmarkId::new("disk_on_edge", radius), &radius, |b, _| {
            b.iter(|| black_box(edge.intersection_area(black_box(&target))));
        });
    }

    let far = Disk::new(DVec2::new(5000.0, 5000.0), 45.0).to_polygon();
    group.bench_function("disjoint_bounds", |b| {
        b.iter(|| black_box(far.intersection_area(black_box(&target))));
    });

    for &spikes in &[8usize, 32, 128] {
        let star = common::star(spikes, 300.0, 500.0);
        let disk = Disk::new(DVec2::new(500.0, 500.0), 120.0).to_polygon();
        group.throughput(common::elements_throughput(spikes * 2));
        group.bench_with_input(BenchmarkId::new("disk_in_star", spikes), &spikes, |b, _| {
            b.iter(|| black_box(disk.intersection_area(black_box(&star))));
        });
    }

    group.finish();
}

fn disk_polygon_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry/disk");
    group.bench_function("to_polygon", |b| {
        let disk = Disk::new(DVec2::new(12.0, 34.0), 23.0);
        b.iter(|| black_box(black_box(disk).to_polygon()));
    });
    group.bench_function("polygon_disk", |b| {
        b.iter(|| black_box(Polygon::disk(black_box([12.0, 34.0]), 23.0)));
    });
    group.finish();
}

fn sampling_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling/rejection");
    let sampler = RejectionSampler::default();

    let square = common::square(100.0);
    group.bench_function("square", |b| {
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        b.iter(|| black_box(sampler.sample_inside(&square, &mut rng)));
    });

    let star = common::star(16, 40.0, 500.0);
    group.bench_function("thin_star", |b| {
        let mut rng = StdRng::seed_from_u64(0xBADC0DE);
        b.iter(|| black_box(sampler.sample_inside(&star, &mut rng)));
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = intersection_area_benches,
              disk_polygon_benches,
              sampling_benches
}
criterion_main!(benches);
