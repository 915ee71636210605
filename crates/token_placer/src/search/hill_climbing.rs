//! Steepest-ascent hill climbing over sampled neighbors.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::search::events::EventSink;
use crate::search::{Progress, SearchBudget, SearchProblem, Solution, StopReason};

/// Parameters of hill climbing.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HillClimbingConfig {
    /// Mutants sampled around the current state per step.
    pub neighbors: usize,
    pub iterations: usize,
}

impl Default for HillClimbingConfig {
    fn default() -> Self {
        Self {
            neighbors: 16,
            iterations: 200,
        }
    }
}

impl HillClimbingConfig {
    pub fn new(neighbors: usize, iterations: usize) -> Self {
        Self {
            neighbors,
            iterations,
        }
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.neighbors == 0 {
            return Err(Error::InvalidConfig("neighbors must be > 0".into()));
        }
        Ok(())
    }
}

/// Moves to the best sampled neighbor while it is strictly better; stops with
/// [`StopReason::NoImprovement`] at the first step where none is.
pub(crate) fn run<P>(
    problem: &P,
    config: &HillClimbingConfig,
    budget: &SearchBudget,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Solution<P::State>>
where
    P: SearchProblem + ?Sized,
{
    let mut current = problem.initial_state(rng)?;
    let first_cost = problem.cost(&current);
    let mut progress = Progress::start(
        "hill_climbing",
        config.iterations,
        current.clone(),
        first_cost,
        budget,
        sink,
    );
    let mut current_cost = progress.best_cost();

    let mut stop_reason = StopReason::BudgetExhausted;
    for _ in 0..config.iterations {
        if let Some(reason) = progress.interrupted() {
            stop_reason = reason;
            break;
        }

        let mut step: Option<(P::State, f64)> = None;
        for _ in 0..config.neighbors {
            let neighbor = problem.mutate(&current, rng);
            let cost = progress.evaluate(problem, &neighbor);
            if step.as_ref().is_none_or(|(_, best)| cost < *best) {
                step = Some((neighbor, cost));
            }
        }

        let step_cost = step.as_ref().map_or(f64::INFINITY, |(_, cost)| *cost);
        let budget_stop = progress.end_iteration(step_cost);
        match step {
            Some((neighbor, cost)) if cost < current_cost => {
                current = neighbor;
                current_cost = cost;
            }
            _ => {
                stop_reason = StopReason::NoImprovement;
                break;
            }
        }
        if let Some(reason) = budget_stop {
            stop_reason = reason;
            break;
        }
    }

    Ok(progress.finish(stop_reason))
}
