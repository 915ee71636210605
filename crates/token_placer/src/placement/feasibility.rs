//! Post-search feasibility assessment of placed disks.
use crate::geometry::{Disk, Polygon};
use crate::placement::AREA_EPSILON;

/// Measures for one placed disk.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenFeasibility {
    pub disk: Disk,
    /// Share of the disk area inside the target, in `[0, 1]`.
    pub contained_fraction: f64,
    /// Summed intersection area with the forbidden zones.
    pub forbidden_overlap: f64,
    /// Summed intersection area with the other disks of the same placement.
    pub token_overlap: f64,
}

impl TokenFeasibility {
    /// Contained within `tolerance` and overlapping nothing beyond `tolerance` of its area.
    pub fn is_feasible(&self, tolerance: f64) -> bool {
        let slack = self.disk.polygon_area() * (tolerance + AREA_EPSILON);
        self.contained_fraction >= 1.0 - tolerance - AREA_EPSILON
            && self.forbidden_overlap <= slack
            && self.token_overlap <= slack
    }
}

/// Feasibility of a whole placement.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feasibility {
    pub tokens: Vec<TokenFeasibility>,
    pub tolerance: f64,
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        self.tokens.iter().all(|t| t.is_feasible(self.tolerance))
    }

    /// Indices of the disks that violate containment or overlap limits.
    pub fn infeasible_tokens(&self) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.is_feasible(self.tolerance))
            .map(|(i, _)| i)
    }
}

/// Measures every disk against the target, the forbidden zones and the other disks.
pub fn assess(
    target: &Polygon,
    forbidden: &[Polygon],
    disks: &[Disk],
    tolerance: f64,
) -> Feasibility {
    let polygons: Vec<Polygon> = disks.iter().map(Disk::to_polygon).collect();
    let tokens = disks
        .iter()
        .zip(&polygons)
        .enumerate()
        .map(|(j, (disk, polygon))| {
            let token_overlap = polygons
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != j && disk.intersects(&disks[k]))
                .map(|(_, other)| polygon.intersection_area(other))
                .sum::<f64>();
            TokenFeasibility {
                disk: *disk,
                contained_fraction: (polygon.intersection_area(target) / polygon.area()).min(1.0),
                forbidden_overlap: forbidden.iter().map(|z| polygon.intersection_area(z)).sum(),
                token_overlap,
            }
        })
        .collect();
    Feasibility { tokens, tolerance }
}
