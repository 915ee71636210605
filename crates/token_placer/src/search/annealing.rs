//! Simulated annealing with a geometric cooling schedule.
//!
//! Each temperature level counts as one iteration. At every level the strategy proposes
//! [`AnnealingConfig::iterations_per_temperature`] mutations of the current state and accepts
//! worse ones with the Metropolis probability `exp(-delta / T)`.
use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::rand01;
use crate::search::events::EventSink;
use crate::search::{Progress, SearchBudget, SearchProblem, Solution, StopReason};

/// Parameters of simulated annealing.
#[non_exhaustive]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Starting temperature.
    pub initial_temperature: f64,
    /// The run ends once the temperature drops below this.
    pub final_temperature: f64,
    /// Geometric factor applied after each level, in `(0, 1)`.
    pub cooling_rate: f64,
    /// Proposals per temperature level.
    pub iterations_per_temperature: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 100.0,
            final_temperature: 0.01,
            cooling_rate: 0.95,
            iterations_per_temperature: 20,
        }
    }
}

impl AnnealingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets both ends of the temperature schedule.
    pub fn with_temperatures(mut self, initial: f64, final_temperature: f64) -> Self {
        self.initial_temperature = initial;
        self.final_temperature = final_temperature;
        self
    }

    /// Sets the cooling rate.
    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    /// Sets the proposals per temperature level.
    pub fn with_iterations_per_temperature(mut self, iterations: usize) -> Self {
        self.iterations_per_temperature = iterations;
        self
    }

    /// Number of temperature levels between the initial and final temperature.
    pub fn temperature_levels(&self) -> usize {
        if self.initial_temperature <= self.final_temperature {
            return 1;
        }
        let levels = (self.final_temperature / self.initial_temperature).ln()
            / self.cooling_rate.ln();
        if levels.is_finite() {
            (levels.ceil() as usize).max(1)
        } else {
            1
        }
    }

    /// Temperature at zero-based `level`.
    pub fn temperature_at(&self, level: usize) -> f64 {
        self.initial_temperature * self.cooling_rate.powi(level as i32)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature.is_finite() && self.initial_temperature > 0.0) {
            return Err(Error::InvalidConfig(
                "initial_temperature must be finite and > 0".into(),
            ));
        }
        if !(self.final_temperature.is_finite() && self.final_temperature > 0.0) {
            return Err(Error::InvalidConfig(
                "final_temperature must be finite and > 0".into(),
            ));
        }
        if self.final_temperature > self.initial_temperature {
            return Err(Error::InvalidConfig(
                "final_temperature must not exceed initial_temperature".into(),
            ));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate < 1.0) {
            return Err(Error::InvalidConfig(
                "cooling_rate must be within (0, 1)".into(),
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(Error::InvalidConfig(
                "iterations_per_temperature must be > 0".into(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn run<P>(
    problem: &P,
    config: &AnnealingConfig,
    budget: &SearchBudget,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Solution<P::State>>
where
    P: SearchProblem + ?Sized,
{
    let levels = config.temperature_levels();
    let mut current = problem.initial_state(rng)?;
    let mut current_cost = problem.cost(&current);
    let mut progress = Progress::start(
        "simulated_annealing",
        levels,
        current.clone(),
        current_cost,
        budget,
        sink,
    );
    current_cost = progress.best_cost();

    let mut stop_reason = StopReason::BudgetExhausted;
    for level in 0..levels {
        if let Some(reason) = progress.interrupted() {
            stop_reason = reason;
            break;
        }

        let temperature = config.temperature_at(level);
        let mut level_best = f64::INFINITY;
        for _ in 0..config.iterations_per_temperature {
            let candidate = problem.mutate(&current, rng);
            let cost = progress.evaluate(problem, &candidate);
            level_best = level_best.min(cost);

            let delta = cost - current_cost;
            if delta <= 0.0 || rand01(rng) < (-delta / temperature).exp() {
                current = candidate;
                current_cost = cost;
            }
        }

        if let Some(reason) = progress.end_iteration(level_best) {
            stop_reason = reason;
            break;
        }
    }

    Ok(progress.finish(stop_reason))
}
