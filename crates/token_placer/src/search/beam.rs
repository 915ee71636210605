//! Local beam search: keep the best `width` states among the beam and its mutants.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::search::events::EventSink;
use crate::search::{Progress, SearchBudget, SearchProblem, Solution, StopReason};

/// Parameters of local beam search.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeamConfig {
    /// States kept between iterations.
    pub width: usize,
    /// Mutants generated from each beam state per iteration.
    pub neighbors_per_state: usize,
    pub iterations: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            width: 10,
            neighbors_per_state: 8,
            iterations: 100,
        }
    }
}

impl BeamConfig {
    pub fn new(width: usize, neighbors_per_state: usize, iterations: usize) -> Self {
        Self {
            width,
            neighbors_per_state,
            iterations,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::InvalidConfig("beam width must be > 0".into()));
        }
        if self.neighbors_per_state == 0 {
            return Err(Error::InvalidConfig(
                "neighbors_per_state must be > 0".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn run<P>(
    problem: &P,
    config: &BeamConfig,
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
        "beam",
        config.iterations,
        first.clone(),
        first_cost,
        budget,
        sink,
    );

    let mut beam: Vec<(P::State, f64)> = Vec::with_capacity(config.width);
    beam.push((first, progress.best_cost()));
    while beam.len() < config.width {
        let state = problem.random_state(rng)?;
        let cost = progress.evaluate(problem, &state);
        beam.push((state, cost));
    }

    let mut stop_reason = StopReason::BudgetExhausted;
    for _ in 0..config.iterations {
        if let Some(reason) = progress.interrupted() {
            stop_reason = reason;
            break;
        }

        let mut candidates = Vec::with_capacity(beam.len() * (config.neighbors_per_state + 1));
        for (state, _) in &beam {
            for _ in 0..config.neighbors_per_state {
                let neighbor = problem.mutate(state, rng);
                let cost = progress.evaluate(problem, &neighbor);
                candidates.push((neighbor, cost));
            }
        }
        candidates.append(&mut beam);
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates.truncate(config.width);
        beam = candidates;

        let iteration_best = beam.first().map_or(f64::INFINITY, |(_, cost)| *cost);
        if let Some(reason) = progress.end_iteration(iteration_best) {
            stop_reason = reason;
            break;
        }
    }

    Ok(progress.finish(stop_reason))
}
