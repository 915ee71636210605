//! Joint placement of several disks.
use glam::DVec2;
use rand::RngCore;

use crate::error::{Error, Result};
use crate::geometry::{Disk, Polygon};
use crate::placement::feasibility::{assess, Feasibility};
use crate::placement::mutation::mutate_about;
use crate::placement::{
    forbidden_penalty, nearly_contained, validate_radius, validate_tolerance,
};
use crate::sampling::{rand_subset, RejectionSampler};
use crate::search::SearchProblem;

/// Disks with fixed radii placed together inside `target`.
///
/// The state holds one center per radius, in radius order. Per disk the cost adds the cubed
/// forbidden overlaps and, unless the disk is contained up to `tolerance`, the part of its
/// area outside the target. Every pair of disks adds its overlap area, so evaluation is
/// quadratic in the number of disks.
#[derive(Debug, Clone)]
pub struct MultiPlacement<'a> {
    target: &'a Polygon,
    forbidden: &'a [Polygon],
    radii: Vec<f64>,
    tolerance: f64,
    seed: Option<Vec<DVec2>>,
    sampler: RejectionSampler,
}

impl<'a> MultiPlacement<'a> {
    pub fn new(
        target: &'a Polygon,
        forbidden: &'a [Polygon],
        radii: Vec<f64>,
        tolerance: f64,
    ) -> Result<Self> {
        if radii.is_empty() {
            return Err(Error::InvalidConfig(
                "multi placement needs at least one radius".into(),
            ));
        }
        for &radius in &radii {
            validate_radius(radius)?;
        }
        validate_tolerance(tolerance)?;
        Ok(Self {
            target,
            forbidden,
            radii,
            tolerance,
            seed: None,
            sampler: RejectionSampler::default(),
        })
    }

    /// Starts the search from `seed`, one center per radius.
    pub fn with_seed(mut self, seed: Vec<DVec2>) -> Result<Self> {
        if seed.len() != self.radii.len() {
            return Err(Error::InvalidConfig(format!(
                "seed has {} centers for {} radii",
                seed.len(),
                self.radii.len()
            )));
        }
        if seed.iter().any(|p| !p.is_finite()) {
            return Err(Error::InvalidConfig("seed centers must be finite".into()));
        }
        self.seed = Some(seed);
        Ok(self)
    }

    pub fn with_sampler(mut self, sampler: RejectionSampler) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }

    pub fn disks(&self, state: &[DVec2]) -> Vec<Disk> {
        state
            .iter()
            .zip(&self.radii)
            .map(|(&center, &radius)| Disk::new(center, radius))
            .collect()
    }

    /// Sum of the forbidden terms of all disks.
    pub fn forbidden_term(&self, state: &[DVec2]) -> f64 {
        self.disks(state)
            .iter()
            .map(|disk| forbidden_penalty(&disk.to_polygon(), self.forbidden))
            .sum()
    }

    /// Per-disk containment up to the tolerance.
    pub fn contained(&self, state: &[DVec2]) -> Vec<bool> {
        self.disks(state)
            .iter()
            .map(|disk| {
                let inside = disk.to_polygon().intersection_area(self.target);
                nearly_contained(disk, inside, self.tolerance)
            })
            .collect()
    }

    pub fn assess(&self, state: &[DVec2]) -> Feasibility {
        assess(
            self.target,
            self.forbidden,
            &self.disks(state),
            self.tolerance,
        )
    }
}

impl SearchProblem for MultiPlacement<'_> {
    type State = Vec<DVec2>;

    fn initial_state(&self, rng: &mut dyn RngCore) -> Result<Vec<DVec2>> {
        match &self.seed {
            Some(seed) => Ok(seed.clone()),
            None => self.random_state(rng),
        }
    }

    fn random_state(&self, rng: &mut dyn RngCore) -> Result<Vec<DVec2>> {
        self.sampler.sample_many(self.target, self.radii.len(), rng)
    }

    fn mutate(&self, state: &Vec<DVec2>, rng: &mut dyn RngCore) -> Vec<DVec2> {
        let centroid = self.target.centroid();
        let mut mutated = state.clone();
        for j in rand_subset(rng, state.len()) {
            mutated[j] = mutate_about(state[j], centroid, rng);
        }
        mutated
    }

    /// Inherits a random non-empty subset of centers from `father`, the rest from `mother`.
    fn crossover(
        &self,
        mother: &Vec<DVec2>,
        father: &Vec<DVec2>,
        rng: &mut dyn RngCore,
    ) -> Vec<DVec2> {
        let mut child = mother.clone();
        for j in rand_subset(rng, child.len()) {
            child[j] = father[j];
        }
        child
    }

    fn cost(&self, state: &Vec<DVec2>) -> f64 {
        let disks = self.disks(state);
        let polygons: Vec<Polygon> = disks.iter().map(Disk::to_polygon).collect();

        let mut badness = 0.0;
        for (j, (disk, polygon)) in disks.iter().zip(&polygons).enumerate() {
            badness += forbidden_penalty(polygon, self.forbidden);
            let inside = polygon.intersection_area(self.target);
            if !nearly_contained(disk, inside, self.tolerance) {
                badness += disk.polygon_area() - inside;
            }
            for k in (j + 1)..disks.len() {
                if disk.intersects(&disks[k]) {
                    badness += polygon.intersection_area(&polygons[k]);
                }
            }
        }
        badness
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::placement::SinglePlacement;
    use crate::search::{search, GeneticConfig, SearchBudget, SearchStrategy};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
        Polygon::new([[x0, y0], [x1, y0], [x1, y1], [x0, y1]]).unwrap()
    }

    #[test]
    fn rejects_invalid_radii_and_seed() {
        let target = rect(0.0, 0.0, 100.0, 100.0);
        assert!(matches!(
            MultiPlacement::new(&target, &[], vec![], 0.01),
            Err(Error::InvalidConfig(_))
        ));
        assert!(MultiPlacement::new(&target, &[], vec![10.0, -1.0], 0.01).is_err());
        assert!(MultiPlacement::new(&target, &[], vec![10.0, f64::NAN], 0.01).is_err());
        let problem = MultiPlacement::new(&target, &[], vec![10.0, 5.0], 0.01).unwrap();
        assert!(problem
            .clone()
            .with_seed(vec![DVec2::new(1.0, 1.0)])
            .is_err());
        assert!(problem
            .with_seed(vec![DVec2::new(1.0, 1.0), DVec2::new(2.0, 2.0)])
            .is_ok());
    }

    #[test]
    fn separated_interior_disks_cost_nothing() {
        let target = rect(0.0, 0.0, 100.0, 100.0);
        let problem = MultiPlacement::new(&target, &[], vec![10.0, 10.0], 0.01).unwrap();
        let state = vec![DVec2::new(25.0, 25.0), DVec2::new(75.0, 75.0)];
        assert_eq!(problem.cost(&state), 0.0);
    }

    #[test]
    fn collisions_and_spill_are_penalized() {
        let target = rect(0.0, 0.0, 100.0, 100.0);
        let problem = MultiPlacement::new(&target, &[], vec![10.0, 10.0], 0.01).unwrap();
        let stacked = vec![DVec2::new(50.0, 50.0), DVec2::new(50.0, 50.0)];
        let area = Disk::new(DVec2::ZERO, 10.0).polygon_area();
        assert!((problem.cost(&stacked) - area).abs() < 1e-3);

        // Half of the disk hangs over the left edge.
        let spilled = vec![DVec2::new(0.0, 50.0), DVec2::new(50.0, 50.0)];
        assert!((problem.cost(&spilled) - area / 2.0).abs() < 1e-3);
    }

    #[test]
    fn single_disk_matches_single_placement() {
        let target = rect(0.0, 0.0, 100.0, 100.0);
        let forbidden = [Polygon::disk([50.0, 50.0], 10.0).unwrap()];
        let single = SinglePlacement::new(&target, &forbidden, 10.0, 0.01).unwrap();
        let multi = MultiPlacement::new(&target, &forbidden, vec![10.0], 0.01).unwrap();
        let area = single.disk_at(DVec2::ZERO).polygon_area();

        let points = [
            DVec2::new(20.0, 20.0),
            DVec2::new(45.0, 52.0),
            DVec2::new(62.0, 50.0),
            DVec2::new(95.0, 30.0),
            DVec2::new(-30.0, 120.0),
        ];
        for p in points {
            let state = vec![p];
            assert_eq!(single.forbidden_term(p), multi.forbidden_term(&state));
            assert_eq!(single.is_contained(p), multi.contained(&state)[0]);
        }

        // Fully inside: the costs differ by the disk area.
        for p in [DVec2::new(20.0, 20.0), DVec2::new(45.0, 52.0), DVec2::new(62.0, 50.0)] {
            let diff = multi.cost(&vec![p]) - single.cost(&p);
            assert!((diff - area).abs() < 1e-3, "{p}: {diff} vs {area}");
        }
    }

    #[test]
    fn mutation_and_crossover_keep_length() {
        let target = rect(0.0, 0.0, 100.0, 100.0);
        let problem = MultiPlacement::new(&target, &[], vec![5.0, 6.0, 7.0], 0.01).unwrap();
        let mut rng = StdRng::seed_from_u64(77);
        let mother = problem.random_state(&mut rng).unwrap();
        let father = problem.random_state(&mut rng).unwrap();
        for _ in 0..50 {
            let child = problem.crossover(&mother, &father, &mut rng);
            assert_eq!(child.len(), 3);
            assert!(child
                .iter()
                .zip(mother.iter().zip(&father))
                .all(|(c, (m, f))| c == m || c == f));
            assert!(child.iter().zip(&father).any(|(c, f)| c == f));

            let mutant = problem.mutate(&child, &mut rng);
            assert_eq!(mutant.len(), 3);
            assert!(mutant.iter().zip(&child).any(|(a, b)| a != b));
        }
    }

    #[test]
    fn squeezed_pair_is_close_to_grid_baseline() {
        // Two r = 10 disks cannot both fit a 30 x 30 square without touching.
        let target = rect(0.0, 0.0, 30.0, 30.0);
        let problem = MultiPlacement::new(&target, &[], vec![10.0, 10.0], 0.01).unwrap();

        let steps: Vec<f64> = (0..=8).map(|i| 5.0 + 2.5 * i as f64).collect();
        let mut baseline = f64::INFINITY;
        for &ax in &steps {
            for &ay in &steps {
                for &bx in &steps {
                    for &by in &steps {
                        let state = vec![DVec2::new(ax, ay), DVec2::new(bx, by)];
                        baseline = baseline.min(problem.cost(&state));
                    }
                }
            }
        }

        let strategy = SearchStrategy::Genetic(GeneticConfig::new(60, 0.2, 100));
        let margin = 0.1 * Disk::new(DVec2::ZERO, 10.0).polygon_area();
        let mut rng = StdRng::seed_from_u64(2024);
        let solution = search(&problem, &strategy, &SearchBudget::default(), &mut rng).unwrap();
        assert!(
            solution.cost <= baseline + margin,
            "search {} vs grid {}",
            solution.cost,
            baseline
        );
    }
}
