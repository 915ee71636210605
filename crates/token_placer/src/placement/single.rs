//! Placement of a single disk.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::{Disk, Polygon};
use crate::placement::feasibility::{assess, Feasibility};
use crate::placement::mutation::mutate_about;
use crate::placement::{
    forbidden_penalty, nearly_contained, validate_radius, validate_tolerance,
};
use crate::sampling::{rand_bool, RejectionSampler};
use crate::search::SearchProblem;

/// One disk of fixed radius that should sit inside `target` and clear `forbidden`.
///
/// The state is the disk center. Cost (lower is better):
///
/// - every forbidden zone adds the cube of its overlap with the disk;
/// - a disk covering the target up to `tolerance` subtracts the covered area;
/// - any other disk adds its distance to the target centroid raised to the tenth power,
///   which pulls stray states back towards the target.
#[derive(Debug, Clone)]
pub struct SinglePlacement<'a> {
    target: &'a Polygon,
    forbidden: &'a [Polygon],
    radius: f64,
    tolerance: f64,
    seed: Option<DVec2>,
    sampler: RejectionSampler,
}

impl<'a> SinglePlacement<'a> {
    pub fn new(
        target: &'a Polygon,
        forbidden: &'a [Polygon],
        radius: f64,
        tolerance: f64,
    ) -> Result<Self> {
        validate_radius(radius)?;
        validate_tolerance(tolerance)?;
        Ok(Self {
            target,
            forbidden,
            radius,
            tolerance,
            seed: None,
            sampler: RejectionSampler::default(),
        })
    }

    /// Starts the search from `seed` instead of a sampled point.
    pub fn with_seed(mut self, seed: DVec2) -> Result<Self> {
        if !seed.is_finite() {
            return Err(Error::InvalidConfig(format!("seed must be finite, got {seed}")));
        }
        self.seed = Some(seed);
        Ok(self)
    }

    pub fn with_sampler(mut self, sampler: RejectionSampler) -> Self {
        self.sampler = sampler;
        self
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn disk_at(&self, center: DVec2) -> Disk {
        Disk::new(center, self.radius)
    }

    /// Forbidden term of the cost at `center`.
    pub fn forbidden_term(&self, center: DVec2) -> f64 {
        forbidden_penalty(&self.disk_at(center).to_polygon(), self.forbidden)
    }

    /// Whether the disk at `center` lies inside the target up to the tolerance.
    pub fn is_contained(&self, center: DVec2) -> bool {
        let disk = self.disk_at(center);
        nearly_contained(
            &disk,
            disk.to_polygon().intersection_area(self.target),
            self.tolerance,
        )
    }

    pub fn assess(&self, center: DVec2) -> Feasibility {
        assess(
            self.target,
            self.forbidden,
            &[self.disk_at(center)],
            self.tolerance,
        )
    }
}

impl SearchProblem for SinglePlacement<'_> {
    type State = DVec2;

    fn initial_state(&self, rng: &mut dyn RngCore) -> Result<DVec2> {
        match self.seed {
            Some(seed) => Ok(seed),
            None => self.random_state(rng),
        }
    }

    fn random_state(&self, rng: &mut dyn RngCore) -> Result<DVec2> {
        self.sampler.sample_inside(self.target, rng)
    }

    fn mutate(&self, state: &DVec2, rng: &mut dyn RngCore) -> DVec2 {
        mutate_about(*state, self.target.centroid(), rng)
    }

    fn crossover(&self, mother: &DVec2, father: &DVec2, rng: &mut dyn RngCore) -> DVec2 {
        if rand_bool(rng) {
            DVec2::new(mother.x, father.y)
        } else {
            DVec2::new(father.x, mother.y)
        }
    }

    fn cost(&self, state: &DVec2) -> f64 {
        let disk = self.disk_at(*state);
        let polygon = disk.to_polygon();
        let mut badness = forbidden_penalty(&polygon, self.forbidden);
        let contained = polygon.intersection_area(self.target);
        if nearly_contained(&disk, contained, self.tolerance) {
            badness -= contained;
        } else {
            badness += state.distance_squared(self.target.centroid()).powi(5);
        }
        badness
    }
}
