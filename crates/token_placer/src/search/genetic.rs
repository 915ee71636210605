//! Generational genetic algorithm with tournament selection and elitism.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::{rand01, rand_index};
use crate::search::events::EventSink;
use crate::search::{Progress, SearchBudget, SearchProblem, Solution, StopReason};

/// Parameters of the genetic algorithm.
///
/// Defaults reproduce the tuned single-token setup: 75 individuals, 15% mutation chance,
/// 120 generations.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneticConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Probability that a child is mutated after crossover.
    pub mutation_chance: f64,
    /// Generations to evolve.
    pub generations: usize,
    /// Individuals competing in each parent selection.
    pub tournament_size: usize,
    /// Best individuals copied unchanged into the next generation.
    pub elite_count: usize,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 75,
            mutation_chance: 0.15,
            generations: 120,
            tournament_size: 3,
            elite_count: 1,
        }
    }
}

impl GeneticConfig {
    pub fn new(population_size: usize, mutation_chance: f64, generations: usize) -> Self {
        Self {
            population_size,
            mutation_chance,
            generations,
            ..Default::default()
        }
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, tournament_size: usize) -> Self {
        self.tournament_size = tournament_size;
        self
    }

    /// Sets the number of elites carried over per generation.
    pub fn with_elite_count(mut self, elite_count: usize) -> Self {
        self.elite_count = elite_count;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(Error::InvalidConfig("population_size must be > 0".into()));
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(Error::InvalidConfig(
                "mutation_chance must be within [0, 1]".into(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(Error::InvalidConfig("tournament_size must be > 0".into()));
        }
        if self.elite_count > self.population_size {
            return Err(Error::InvalidConfig(
                "elite_count must be <= population_size".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn run<P>(
    problem: &P,
    config: &GeneticConfig,
    budget: &SearchBudget,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Solution<P::State>>
where
    P: SearchProblem + ?Sized,
{
    let first = problem.initial_state(rng)?;
    let first_cost = problem.cost(&first);
    let mut progress = Progress::start(
        "genetic",
        config.generations,
        first.clone(),
        first_cost,
        budget,
        sink,
    );

    let mut population: Vec<(P::State, f64)> = Vec::with_capacity(config.population_size);
    population.push((first, progress.best_cost()));
    while population.len() < config.population_size {
        let state = problem.random_state(rng)?;
        let cost = progress.evaluate(problem, &state);
        population.push((state, cost));
    }

    let mut stop_reason = StopReason::BudgetExhausted;
    for _ in 0..config.generations {
        if let Some(reason) = progress.interrupted() {
            stop_reason = reason;
            break;
        }

        population.sort_by(|a, b| a.1.total_cmp(&b.1));
        let mut next: Vec<(P::State, f64)> = Vec::with_capacity(config.population_size);
        next.extend(population[..config.elite_count].iter().cloned());

        while next.len() < config.population_size {
            let mother = tournament_select(&population, config.tournament_size, rng);
            let father = tournament_select(&population, config.tournament_size, rng);
            let mut child = problem.crossover(&mother.0, &father.0, rng);
            if rand01(rng) < config.mutation_chance {
                child = problem.mutate(&child, rng);
            }
            let cost = progress.evaluate(problem, &child);
            next.push((child, cost));
        }

        population = next;
        let generation_best = population
            .iter()
            .map(|(_, cost)| *cost)
            .fold(f64::INFINITY, f64::min);
        if let Some(reason) = progress.end_iteration(generation_best) {
            stop_reason = reason;
            break;
        }
    }

    Ok(progress.finish(stop_reason))
}

/// Best of `tournament_size` individuals drawn with replacement.
fn tournament_select<'p, S>(
    population: &'p [(S, f64)],
    tournament_size: usize,
    rng: &mut dyn RngCore,
) -> &'p (S, f64) {
    let mut best = &population[rand_index(rng, population.len())];
    for _ in 1..tournament_size {
        let candidate = &population[rand_index(rng, population.len())];
        if candidate.1 < best.1 {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::search::test_problems::Paraboloid;

    #[test]
    fn defaults_match_tuned_setup() {
        let config = GeneticConfig::default();
        assert_eq!(config.population_size, 75);
        assert_eq!(config.mutation_chance, 0.15);
        assert_eq!(config.generations, 120);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(GeneticConfig::new(0, 0.1, 10).validate().is_err());
        assert!(GeneticConfig::new(10, 1.5, 10).validate().is_err());
        assert!(GeneticConfig::new(10, -0.1, 10).validate().is_err());
        assert!(GeneticConfig::new(10, 0.1, 10)
            .with_tournament_size(0)
            .validate()
            .is_err());
        assert!(GeneticConfig::new(4, 0.1, 10)
            .with_elite_count(5)
            .validate()
            .is_err());
    }

    #[test]
    fn evaluations_follow_population_and_generations() {
        let config = GeneticConfig::new(20, 0.2, 10).with_elite_count(2);
        let mut rng = StdRng::seed_from_u64(4);
        let solution =
            run(&Paraboloid, &config, &SearchBudget::default(), &mut rng, &mut ()).unwrap();
        // Initial population plus the non-elite children of every generation.
        assert_eq!(solution.evaluations, 20 + 10 * 18);
        assert_eq!(solution.iterations, 10);
    }

    #[test]
    fn zero_generations_returns_best_initial_individual() {
        let config = GeneticConfig::new(30, 0.2, 0);
        let mut rng = StdRng::seed_from_u64(21);
        let solution =
            run(&Paraboloid, &config, &SearchBudget::default(), &mut rng, &mut ()).unwrap();

        let mut replay = StdRng::seed_from_u64(21);
        let best_initial = (0..30)
            .map(|_| Paraboloid.initial_state(&mut replay).unwrap())
            .map(|s| Paraboloid.cost(&s))
            .fold(f64::INFINITY, f64::min);
        assert_eq!(solution.cost, best_initial);
        assert_eq!(solution.iterations, 0);
    }

    #[test]
    fn tournament_prefers_lower_cost() {
        let population = vec![((), 5.0), ((), 1.0), ((), 3.0)];
        let mut rng = StdRng::seed_from_u64(2);
        // With a tournament as large as many draws, the best is almost surely picked.
        let picked = tournament_select(&population, 64, &mut rng);
        assert_eq!(picked.1, 1.0);
    }
}
