//! Planar geometry used by the placement cost functions.
//!
//! - [`Polygon`]: immutable polygonal area (one or more rings) with cached area, centroid and bounds.
//! - [`Disk`]: circular token footprint, approximated as a regular polygon for clipping.
//! - [`Bounds`]: axis-aligned bounding box used for sampling and fast rejection.
//!
//! Clipping is delegated to `i_overlay`; everything else is computed from the rings directly.
pub mod bounds;
pub mod disk;
pub mod polygon;

pub use bounds::Bounds;
pub use disk::{Disk, DISK_SEGMENTS};
pub use polygon::Polygon;

/// Areas at or below this value are treated as empty.
pub const MIN_AREA: f64 = 1e-12;

/// Twice the signed area of a ring together with its first moments, scaled by 6.
///
/// Returns `(2A, 6A·cx, 6A·cy)` for the ring as given (positive when counter-clockwise).
pub(crate) fn ring_moments(ring: &[[f64; 2]]) -> (f64, f64, f64) {
    let n = ring.len();
    if n < 3 {
        return (0.0, 0.0, 0.0);
    }

    let mut area2 = 0.0;
    let mut mx = 0.0;
    let mut my = 0.0;
    for i in 0..n {
        let [x0, y0] = ring[i];
        let [x1, y1] = ring[(i + 1) % n];
        let cross = x0 * y1 - x1 * y0;
        area2 += cross;
        mx += (x0 + x1) * cross;
        my += (y0 + y1) * cross;
    }
    (area2, mx, my)
}

/// Absolute area enclosed by a set of rings.
///
/// Rings must follow one orientation convention (outer rings one way, holes the other), which
/// holds for polygons built by this crate and for clipping output.
pub(crate) fn rings_area(rings: &[Vec<[f64; 2]>]) -> f64 {
    rings.iter().map(|r| ring_moments(r).0).sum::<f64>().abs() * 0.5
}
