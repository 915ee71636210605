//! Token placement problems.
//!
//! [`SinglePlacement`] positions one disk, [`MultiPlacement`] positions several disks
//! jointly. Both implement [`crate::search::SearchProblem`] and share the cost terms in this
//! module and the move operator in [`mutation`].
use crate::error::{Error, Result};
use crate::geometry::{Disk, Polygon};

pub mod feasibility;
pub mod multi;
pub mod mutation;
pub mod single;

pub use feasibility::{assess, Feasibility, TokenFeasibility};
pub use multi::MultiPlacement;
pub use single::SinglePlacement;

/// Default containment tolerance, as a fraction of the disk area.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Relative slack absorbing clipping round-off in area comparisons.
pub const AREA_EPSILON: f64 = 1e-5;

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !(0.0..1.0).contains(&tolerance) {
        return Err(Error::InvalidConfig(format!(
            "tolerance must be within [0, 1), got {tolerance}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_radius(radius: f64) -> Result<()> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(Error::InvalidConfig(format!(
            "radius must be finite and > 0, got {radius}"
        )));
    }
    Ok(())
}

/// Cubed overlap with every forbidden zone, summed.
pub(crate) fn forbidden_penalty(disk: &Polygon, forbidden: &[Polygon]) -> f64 {
    forbidden
        .iter()
        .map(|zone| disk.intersection_area(zone).powi(3))
        .sum()
}

/// Whether `contained_area` covers the disk up to `tolerance` of its area.
///
/// Clipped areas come back slightly below the closed-form disk area, so the comparison
/// allows [`AREA_EPSILON`] of the disk area on top of the tolerance.
#[inline]
pub(crate) fn nearly_contained(disk: &Disk, contained_area: f64, tolerance: f64) -> bool {
    contained_area >= disk.polygon_area() * (1.0 - tolerance - AREA_EPSILON)
}

#[cfg(test)]
mod tests {
    use glam::DVec2;

    use super::*;

    #[test]
    fn tolerance_bounds() {
        assert!(validate_tolerance(0.0).is_ok());
        assert!(validate_tolerance(0.5).is_ok());
        assert!(validate_tolerance(1.0).is_err());
        assert!(validate_tolerance(-0.1).is_err());
        assert!(validate_tolerance(f64::NAN).is_err());
    }

    #[test]
    fn radius_must_be_positive() {
        assert!(validate_radius(1.0).is_ok());
        assert!(validate_radius(0.0).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
    }

    #[test]
    fn penalty_is_cubic() {
        let disk = Polygon::new([[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]).unwrap();
        let zone = Polygon::new([[1.0, 0.0], [3.0, 0.0], [3.0, 2.0], [1.0, 2.0]]).unwrap();
        // Overlap is 2, counted once per zone.
        let penalty = forbidden_penalty(&disk, &[zone.clone(), zone]);
        assert!((penalty - 16.0).abs() < 1e-6);
    }

    #[test]
    fn containment_threshold_is_relative() {
        let disk = Disk::new(DVec2::ZERO, 10.0);
        let area = disk.polygon_area();
        assert!(nearly_contained(&disk, area, 0.0));
        assert!(nearly_contained(&disk, area * 0.995, 0.01));
        assert!(!nearly_contained(&disk, area * 0.98, 0.01));
    }

    #[test]
    fn zero_tolerance_absorbs_clipping_round_off() {
        let disk = Disk::new(DVec2::ZERO, 23.0);
        let area = disk.polygon_area();
        assert!(nearly_contained(&disk, area * (1.0 - 1e-9), 0.0));
        assert!(!nearly_contained(&disk, area * (1.0 - 1e-4), 0.0));
    }
}
