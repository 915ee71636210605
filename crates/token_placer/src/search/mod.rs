//! Problem-agnostic local search.
//!
//! A problem implements [`SearchProblem`] (initial state, mutation, crossover, cost) and any
//! [`SearchStrategy`] can drive it through [`search`] or [`search_with_events`]. Strategies
//! always return the best state seen during the run, after their iteration budget or an
//! earlier stop requested through [`SearchBudget`].
use std::fmt;
use std::time::Duration;

use rand::RngCore;
use tracing::debug;

use crate::error::Result;

pub mod annealing;
pub mod beam;
pub mod budget;
pub mod events;
pub mod genetic;
pub mod hill_climbing;

pub use annealing::AnnealingConfig;
pub use beam::BeamConfig;
pub use budget::{CancellationToken, SearchBudget};
pub use events::{EventSink, FnSink, MultiSink, SearchEvent, SearchEventKind, VecSink};
pub use genetic::GeneticConfig;
pub use hill_climbing::HillClimbingConfig;

use budget::BudgetTracker;

/// Capability contract between a problem definition and the search strategies.
///
/// Costs are minimized. Operators receive the run's random source explicitly.
pub trait SearchProblem {
    type State: Clone;

    /// Starting state: a caller-supplied seed if any, otherwise a random state.
    fn initial_state(&self, rng: &mut dyn RngCore) -> Result<Self::State>;

    /// Fresh random state used to fill populations and beams.
    fn random_state(&self, rng: &mut dyn RngCore) -> Result<Self::State> {
        self.initial_state(rng)
    }

    fn mutate(&self, state: &Self::State, rng: &mut dyn RngCore) -> Self::State;

    fn crossover(
        &self,
        mother: &Self::State,
        father: &Self::State,
        rng: &mut dyn RngCore,
    ) -> Self::State;

    fn cost(&self, state: &Self::State) -> f64;

    /// Higher is better.
    fn value(&self, state: &Self::State) -> f64 {
        -self.cost(state)
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// The strategy's iteration budget was used up.
    BudgetExhausted,
    /// [`SearchBudget::stagnation_limit`] iterations passed without improvement.
    Stagnated,
    /// [`SearchBudget::time_limit`] elapsed.
    TimeLimit,
    /// The [`CancellationToken`] was cancelled.
    Cancelled,
    /// Hill climbing found no better neighbor.
    NoImprovement,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::BudgetExhausted => "budget exhausted",
            StopReason::Stagnated => "stagnated",
            StopReason::TimeLimit => "time limit",
            StopReason::Cancelled => "cancelled",
            StopReason::NoImprovement => "no improvement",
        };
        f.write_str(s)
    }
}

/// Best state found by a run, with run statistics.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    pub state: S,
    pub cost: f64,
    /// Completed iterations.
    pub iterations: usize,
    /// Cost evaluations performed, including the initial states.
    pub evaluations: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
}

impl<S> Solution<S> {
    pub fn value(&self) -> f64 {
        -self.cost
    }
}

/// Search strategy and its parameters.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    Genetic(GeneticConfig),
    SimulatedAnnealing(AnnealingConfig),
    Beam(BeamConfig),
    HillClimbing(HillClimbingConfig),
}

impl Default for SearchStrategy {
    fn default() -> Self {
        SearchStrategy::Genetic(GeneticConfig::default())
    }
}

impl SearchStrategy {
    /// Short name used in logs and events.
    pub fn name(&self) -> &'static str {
        match self {
            SearchStrategy::Genetic(_) => "genetic",
            SearchStrategy::SimulatedAnnealing(_) => "simulated_annealing",
            SearchStrategy::Beam(_) => "beam",
            SearchStrategy::HillClimbing(_) => "hill_climbing",
        }
    }

    /// Iteration budget of the configured strategy.
    pub fn max_iterations(&self) -> usize {
        match self {
            SearchStrategy::Genetic(c) => c.generations,
            SearchStrategy::SimulatedAnnealing(c) => c.temperature_levels(),
            SearchStrategy::Beam(c) => c.iterations,
            SearchStrategy::HillClimbing(c) => c.iterations,
        }
    }

    /// Validates the strategy parameters, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        match self {
            SearchStrategy::Genetic(c) => c.validate(),
            SearchStrategy::SimulatedAnnealing(c) => c.validate(),
            SearchStrategy::Beam(c) => c.validate(),
            SearchStrategy::HillClimbing(c) => c.validate(),
        }
    }
}

/// Runs `strategy` on `problem` without observing events.
pub fn search<P>(
    problem: &P,
    strategy: &SearchStrategy,
    budget: &SearchBudget,
    rng: &mut dyn RngCore,
) -> Result<Solution<P::State>>
where
    P: SearchProblem + ?Sized,
{
    search_with_events(problem, strategy, budget, rng, &mut ())
}

/// Runs `strategy` on `problem`, reporting progress to `sink`.
pub fn search_with_events<P>(
    problem: &P,
    strategy: &SearchStrategy,
    budget: &SearchBudget,
    rng: &mut dyn RngCore,
    sink: &mut dyn EventSink,
) -> Result<Solution<P::State>>
where
    P: SearchProblem + ?Sized,
{
    strategy.validate()?;
    budget.validate()?;

    let solution = match strategy {
        SearchStrategy::Genetic(c) => genetic::run(problem, c, budget, rng, sink)?,
        SearchStrategy::SimulatedAnnealing(c) => annealing::run(problem, c, budget, rng, sink)?,
        SearchStrategy::Beam(c) => beam::run(problem, c, budget, rng, sink)?,
        SearchStrategy::HillClimbing(c) => hill_climbing::run(problem, c, budget, rng, sink)?,
    };

    debug!(
        "{} search stopped ({}) after {} iterations, {} evaluations: best cost {}.",
        strategy.name(),
        solution.stop_reason,
        solution.iterations,
        solution.evaluations,
        solution.cost
    );
    Ok(solution)
}

/// NaN costs rank behind everything else.
#[inline]
pub(crate) fn sanitize_cost(cost: f64) -> f64 {
    if cost.is_nan() {
        f64::INFINITY
    } else {
        cost
    }
}

/// Shared run bookkeeping: best-so-far state, counters, budget checks and events.
pub(crate) struct Progress<'a, S> {
    best: S,
    best_cost: f64,
    evaluations: usize,
    iterations: usize,
    improved_this_iteration: bool,
    tracker: BudgetTracker<'a>,
    sink: &'a mut dyn EventSink,
}

impl<'a, S: Clone> Progress<'a, S> {
    /// Starts a run from the first evaluated state.
    pub(crate) fn start(
        strategy: &'static str,
        max_iterations: usize,
        first: S,
        first_cost: f64,
        budget: &'a SearchBudget,
        sink: &'a mut dyn EventSink,
    ) -> Self {
        let mut progress = Self {
            best: first,
            best_cost: sanitize_cost(first_cost),
            evaluations: 1,
            iterations: 0,
            improved_this_iteration: false,
            tracker: BudgetTracker::start(budget),
            sink,
        };
        if progress.sink.wants(SearchEventKind::RunStarted) {
            progress.sink.send(SearchEvent::RunStarted {
                strategy,
                max_iterations,
                initial_cost: progress.best_cost,
            });
        }
        progress
    }

    /// Evaluates `state`, updating the best-so-far. Returns the sanitized cost.
    pub(crate) fn evaluate<P>(&mut self, problem: &P, state: &S) -> f64
    where
        P: SearchProblem<State = S> + ?Sized,
    {
        let cost = sanitize_cost(problem.cost(state));
        self.evaluations += 1;
        self.offer(state, cost);
        cost
    }

    /// Offers an already evaluated state as best-so-far candidate.
    pub(crate) fn offer(&mut self, state: &S, cost: f64) {
        if cost < self.best_cost {
            self.best = state.clone();
            self.best_cost = cost;
            self.improved_this_iteration = true;
            if self.sink.wants(SearchEventKind::ImprovedBest) {
                self.sink.send(SearchEvent::ImprovedBest {
                    iteration: self.iterations,
                    cost,
                });
            }
        }
    }

    pub(crate) fn best_cost(&self) -> f64 {
        self.best_cost
    }

    pub(crate) fn interrupted(&self) -> Option<StopReason> {
        self.tracker.interrupted()
    }

    /// Closes an iteration; returns a stop reason when the budget says so.
    pub(crate) fn end_iteration(&mut self, iteration_best_cost: f64) -> Option<StopReason> {
        if self.sink.wants(SearchEventKind::IterationFinished) {
            self.sink.send(SearchEvent::IterationFinished {
                iteration: self.iterations,
                iteration_best_cost,
                best_cost: self.best_cost,
            });
        }
        self.iterations += 1;
        let improved = std::mem::take(&mut self.improved_this_iteration);
        self.tracker.record_iteration(improved)
    }

    pub(crate) fn finish(self, stop_reason: StopReason) -> Solution<S> {
        if self.sink.wants(SearchEventKind::RunFinished) {
            self.sink.send(SearchEvent::RunFinished {
                stop_reason,
                best_cost: self.best_cost,
                iterations: self.iterations,
                evaluations: self.evaluations,
            });
        }
        Solution {
            elapsed: self.tracker.elapsed(),
            state: self.best,
            cost: self.best_cost,
            iterations: self.iterations,
            evaluations: self.evaluations,
            stop_reason,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_problems {
    use rand::RngCore;

    use super::SearchProblem;
    use crate::error::Result;
    use crate::sampling::{rand_bool, rand_range};

    /// Minimize (x - 3)^2 + (y + 1)^2 over the plane.
    pub struct Paraboloid;

    impl SearchProblem for Paraboloid {
        type State = (f64, f64);

        fn initial_state(&self, rng: &mut dyn RngCore) -> Result<Self::State> {
            Ok((rand_range(rng, -50.0, 50.0), rand_range(rng, -50.0, 50.0)))
        }

        fn mutate(&self, state: &Self::State, rng: &mut dyn RngCore) -> Self::State {
            (
                state.0 + rand_range(rng, -1.0, 1.0),
                state.1 + rand_range(rng, -1.0, 1.0),
            )
        }

        fn crossover(
            &self,
            mother: &Self::State,
            father: &Self::State,
            rng: &mut dyn RngCore,
        ) -> Self::State {
            if rand_bool(rng) {
                (mother.0, father.1)
            } else {
                (father.0, mother.1)
            }
        }

        fn cost(&self, state: &Self::State) -> f64 {
            (state.0 - 3.0).powi(2) + (state.1 + 1.0).powi(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::test_problems::Paraboloid;
    use super::*;

    fn strategies() -> Vec<SearchStrategy> {
        vec![
            SearchStrategy::Genetic(GeneticConfig::new(30, 0.3, 100)),
            SearchStrategy::SimulatedAnnealing(
                AnnealingConfig::default().with_temperatures(50.0, 0.01),
            ),
            SearchStrategy::Beam(BeamConfig::new(8, 6, 150)),
            SearchStrategy::HillClimbing(HillClimbingConfig::new(24, 400)),
        ]
    }

    #[test]
    fn every_strategy_improves_on_a_paraboloid() {
        for strategy in strategies() {
            let mut rng = StdRng::seed_from_u64(11);
            let solution = search(&Paraboloid, &strategy, &SearchBudget::default(), &mut rng)
                .expect("search runs");
            assert!(
                solution.cost < 1.0,
                "{} ended at cost {}",
                strategy.name(),
                solution.cost
            );
            assert_eq!(solution.cost, Paraboloid.cost(&solution.state));
            assert!(solution.evaluations > solution.iterations);
        }
    }

    #[test]
    fn value_is_negated_cost() {
        assert_eq!(Paraboloid.value(&(3.0, 0.0)), -1.0);
    }

    #[test]
    fn same_seed_same_solution() {
        for strategy in strategies() {
            let mut rng_a = StdRng::seed_from_u64(5);
            let mut rng_b = StdRng::seed_from_u64(5);
            let a = search(&Paraboloid, &strategy, &SearchBudget::default(), &mut rng_a).unwrap();
            let b = search(&Paraboloid, &strategy, &SearchBudget::default(), &mut rng_b).unwrap();
            assert_eq!(a.state, b.state, "{}", strategy.name());
            assert_eq!(a.iterations, b.iterations);
        }
    }

    #[test]
    fn cancelled_token_stops_before_first_iteration() {
        let token = CancellationToken::new();
        token.cancel();
        let budget = SearchBudget::new().with_cancellation(token);
        for strategy in strategies() {
            let mut rng = StdRng::seed_from_u64(1);
            let solution = search(&Paraboloid, &strategy, &budget, &mut rng).unwrap();
            assert_eq!(solution.stop_reason, StopReason::Cancelled);
            assert_eq!(solution.iterations, 0);
            assert!(solution.cost.is_finite());
        }
    }

    #[test]
    fn stagnation_limit_stops_early() {
        let strategy = SearchStrategy::Genetic(GeneticConfig::new(10, 0.2, 10_000));
        let budget = SearchBudget::new().with_stagnation_limit(5);
        let mut rng = StdRng::seed_from_u64(3);
        let solution = search(&Paraboloid, &strategy, &budget, &mut rng).unwrap();
        assert_eq!(solution.stop_reason, StopReason::Stagnated);
        assert!(solution.iterations < 10_000);
    }

    #[test]
    fn fixed_generation_count_by_default() {
        let strategy = SearchStrategy::Genetic(GeneticConfig::new(10, 0.2, 25));
        let mut rng = StdRng::seed_from_u64(3);
        let solution = search(&Paraboloid, &strategy, &SearchBudget::default(), &mut rng).unwrap();
        assert_eq!(solution.stop_reason, StopReason::BudgetExhausted);
        assert_eq!(solution.iterations, 25);
    }

    #[test]
    fn events_bracket_the_run() {
        let strategy = SearchStrategy::Genetic(GeneticConfig::new(10, 0.2, 4));
        let mut rng = StdRng::seed_from_u64(8);
        let mut sink = VecSink::new();
        let solution = search_with_events(
            &Paraboloid,
            &strategy,
            &SearchBudget::default(),
            &mut rng,
            &mut sink,
        )
        .unwrap();

        let events = sink.into_inner();
        assert!(matches!(
            events.first(),
            Some(SearchEvent::RunStarted {
                strategy: "genetic",
                max_iterations: 4,
                ..
            })
        ));
        let iterations: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                SearchEvent::IterationFinished { iteration, .. } => Some(*iteration),
                _ => None,
            })
            .collect();
        assert_eq!(iterations, vec![0, 1, 2, 3]);
        match events.last() {
            Some(SearchEvent::RunFinished {
                best_cost,
                iterations,
                ..
            }) => {
                assert_eq!(*best_cost, solution.cost);
                assert_eq!(*iterations, 4);
            }
            other => panic!("expected RunFinished, got {other:?}"),
        }
    }

    #[test]
    fn invalid_strategy_is_rejected() {
        let strategy = SearchStrategy::Genetic(GeneticConfig::new(0, 0.2, 10));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(search(&Paraboloid, &strategy, &SearchBudget::default(), &mut rng).is_err());
    }

    #[test]
    fn nan_costs_rank_last() {
        assert_eq!(sanitize_cost(f64::NAN), f64::INFINITY);
        assert_eq!(sanitize_cost(-2.0), -2.0);
    }
}
