use std::time::Duration;

use criterion::{Criterion, Throughput};
use token_placer::prelude::Polygon;

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

#[allow(dead_code)]
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

pub fn square(size: f64) -> Polygon {
    Polygon::new([[0.0, 0.0], [size, 0.0], [size, size], [0.0, size]]).unwrap()
}

/// Star-shaped concave polygon with `points` spikes.
#[allow(dead_code)]
pub fn star(points: usize, inner: f64, outer: f64) -> Polygon {
    let n = points * 2;
    let vertices: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            let r = if i % 2 == 0 { outer } else { inner };
            [outer + r * angle.cos(), outer + r * angle.sin()]
        })
        .collect();
    Polygon::new(vertices).unwrap()
}
