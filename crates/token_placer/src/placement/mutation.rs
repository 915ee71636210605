//! Move operator shared by the single and multi placement problems.
//!
//! Points move relative to the target centroid: either a rotation about it, or a radial
//! shift that scales their distance to it.
use std::f64::consts::TAU;

use glam::DVec2;
use rand::RngCore;

use crate::sampling::{rand01, rand_bool, rand_range};

/// Rotates `point` counter-clockwise about `pivot` by `angle` radians.
#[inline]
pub fn rotate_about(point: DVec2, pivot: DVec2, angle: f64) -> DVec2 {
    pivot + DVec2::from_angle(angle).rotate(point - pivot)
}

/// Moves `point` along the ray from `pivot` by `fraction` of its current distance.
///
/// Negative fractions pull towards the pivot, positive ones push away.
#[inline]
pub fn shift_radially(point: DVec2, pivot: DVec2, fraction: f64) -> DVec2 {
    pivot + (point - pivot) * (1.0 + fraction)
}

/// Random move about `centroid`: a coin flip picks a uniform rotation or a radial shift
/// by a signed fraction in `(-1, 1)`.
///
/// A point sitting exactly on the centroid stays there.
pub fn mutate_about(point: DVec2, centroid: DVec2, rng: &mut dyn RngCore) -> DVec2 {
    if rand_bool(rng) {
        rotate_about(point, centroid, rand_range(rng, 0.0, TAU))
    } else {
        let magnitude = rand01(rng);
        let fraction = if rand_bool(rng) { magnitude } else { -magnitude };
        shift_radially(point, centroid, fraction)
    }
}
