//! Event types and sinks for observing search runs.
//!
//! This module defines [`SearchEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while a strategy runs via
//! [`crate::search::search_with_events`] or while the
//! [`crate::placer::Placer`] places tokens.
use crate::search::StopReason;

/// Describes events emitted by search runs.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SearchEvent {
    /// Emitted when a run starts.
    RunStarted {
        /// Name of the strategy, e.g. `"genetic"`.
        strategy: &'static str,
        /// Iteration budget of the strategy.
        max_iterations: usize,
        /// Cost of the first initial state.
        initial_cost: f64,
    },

    /// Emitted after each iteration (generation, temperature level, beam or climb step).
    IterationFinished {
        /// Zero-based iteration index.
        iteration: usize,
        /// Best cost seen in this iteration.
        iteration_best_cost: f64,
        /// Best cost seen so far in the run.
        best_cost: f64,
    },

    /// Emitted when the best-so-far state improves.
    ImprovedBest {
        /// Iteration during which the improvement happened.
        iteration: usize,
        /// New best cost.
        cost: f64,
    },

    /// Emitted when the run stops.
    RunFinished {
        /// Why the run stopped.
        stop_reason: StopReason,
        /// Best cost found.
        best_cost: f64,
        /// Completed iterations.
        iterations: usize,
        /// Cost evaluations performed.
        evaluations: usize,
    },

    /// Non-fatal warning, e.g. an infeasible placement.
    Warning {
        /// Context string (e.g. area and sub-region).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`SearchEvent`], used by sinks to opt out of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEventKind {
    RunStarted,
    IterationFinished,
    ImprovedBest,
    RunFinished,
    Warning,
}

impl SearchEvent {
    pub fn kind(&self) -> SearchEventKind {
        match self {
            SearchEvent::RunStarted { .. } => SearchEventKind::RunStarted,
            SearchEvent::IterationFinished { .. } => SearchEventKind::IterationFinished,
            SearchEvent::ImprovedBest { .. } => SearchEventKind::ImprovedBest,
            SearchEvent::RunFinished { .. } => SearchEventKind::RunFinished,
            SearchEvent::Warning { .. } => SearchEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`SearchEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SearchEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: SearchEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = SearchEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SearchEvent) {}

    #[inline]
    fn wants(&self, _kind: SearchEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SearchEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SearchEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SearchEvent),
{
    #[inline]
    fn send(&mut self, event: SearchEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally skipping per-iteration noise.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SearchEvent>,
    skip_iterations: bool,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            skip_iterations: false,
        }
    }

    /// Drops [`SearchEvent::IterationFinished`] events.
    pub fn without_iterations(mut self) -> Self {
        self.skip_iterations = true;
        self
    }

    pub fn into_inner(self) -> Vec<SearchEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SearchEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SearchEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    #[inline]
    fn wants(&self, kind: SearchEventKind) -> bool {
        !(self.skip_iterations && kind == SearchEventKind::IterationFinished)
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: SearchEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: SearchEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
