//! Outcomes of placement calls.
use std::fmt;
use std::time::Duration;

use glam::DVec2;

use crate::placement::Feasibility;
use crate::search::{Solution, StopReason};

/// Result of one low-level placement run.
#[derive(Debug, Clone)]
pub struct PlacementOutcome {
    /// One center per requested disk, in request order.
    pub positions: Vec<DVec2>,
    pub cost: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub elapsed: Duration,
    pub stop_reason: StopReason,
    pub feasibility: Feasibility,
}

impl PlacementOutcome {
    pub(crate) fn from_solution<S>(
        solution: Solution<S>,
        positions: Vec<DVec2>,
        feasibility: Feasibility,
    ) -> Self {
        Self {
            positions,
            cost: solution.cost,
            iterations: solution.iterations,
            evaluations: solution.evaluations,
            elapsed: solution.elapsed,
            stop_reason: solution.stop_reason,
            feasibility,
        }
    }

    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.feasibility.is_feasible()
    }
}

/// Non-fatal problems found after a placement.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementWarning {
    /// The best state found leaves `token` outside the target or overlapping something.
    Infeasible {
        area: String,
        sub_region: String,
        token: String,
        contained_fraction: f64,
        forbidden_overlap: f64,
        token_overlap: f64,
    },
}

impl fmt::Display for PlacementWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementWarning::Infeasible {
                area,
                sub_region,
                token,
                contained_fraction,
                forbidden_overlap,
                token_overlap,
            } => write!(
                f,
                "token '{token}' in '{area}/{sub_region}' is infeasible: {:.1}% contained, \
                 forbidden overlap {forbidden_overlap:.2}, token overlap {token_overlap:.2}",
                contained_fraction * 100.0
            ),
        }
    }
}

/// Result of placing a group of tokens into one area and sub-region.
#[derive(Debug, Clone)]
pub struct PlacementReport {
    pub area: String,
    pub sub_region: String,
    /// Requested token names, index-matched with `outcome.positions`.
    pub tokens: Vec<String>,
    pub outcome: PlacementOutcome,
    pub warnings: Vec<PlacementWarning>,
}

impl PlacementReport {
    pub fn is_feasible(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Placed tokens with their positions.
    pub fn positions(&self) -> impl Iterator<Item = (&str, DVec2)> {
        self.tokens
            .iter()
            .map(String::as_str)
            .zip(self.outcome.positions.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_message_names_the_token() {
        let warning = PlacementWarning::Infeasible {
            area: "arrakeen".into(),
            sub_region: "whole".into(),
            token: "paul".into(),
            contained_fraction: 0.5,
            forbidden_overlap: 0.0,
            token_overlap: 1.25,
        };
        let text = warning.to_string();
        assert!(text.contains("'paul'"));
        assert!(text.contains("arrakeen/whole"));
        assert!(text.contains("50.0% contained"));
    }
}
