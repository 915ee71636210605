//! Bounded rejection sampling of interior points.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::Polygon;
use crate::sampling::rand_range;

/// Attempts allowed before giving up on a polygon.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Draws uniform points from a polygon's bounding box until one falls inside.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RejectionSampler {
    /// Upper bound on draws per requested point.
    pub max_attempts: usize,
}

impl Default for RejectionSampler {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl RejectionSampler {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Uniform random point inside `polygon`.
    ///
    /// Fails with [`Error::Sampling`] once `max_attempts` draws missed, which is how
    /// slivers and other near-zero-area polygons surface instead of spinning forever.
    pub fn sample_inside(&self, polygon: &Polygon, rng: &mut dyn RngCore) -> Result<DVec2> {
        let bounds = polygon.bounds();
        for _ in 0..self.max_attempts {
            let candidate = DVec2::new(
                rand_range(rng, bounds.min.x, bounds.max.x),
                rand_range(rng, bounds.min.y, bounds.max.y),
            );
            if polygon.contains(candidate) {
                return Ok(candidate);
            }
        }
        Err(Error::Sampling {
            attempts: self.max_attempts,
        })
    }

    /// `count` independent interior points.
    pub fn sample_many(
        &self,
        polygon: &Polygon,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<DVec2>> {
        (0..count).map(|_| self.sample_inside(polygon, rng)).collect()
    }
}
