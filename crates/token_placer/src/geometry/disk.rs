//! Circular token footprints.
use std::f64::consts::TAU;

use glam::DVec2;

use crate::geometry::Polygon;

/// Segments used to approximate a circle (16 per quarter turn).
pub const DISK_SEGMENTS: usize = 64;

/// Circular footprint of a token: a center and a fixed radius.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disk {
    pub center: DVec2,
    pub radius: f64,
}

impl Disk {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Regular [`DISK_SEGMENTS`]-gon inscribed in the disk.
    ///
    /// The caller guarantees a finite center and a positive radius.
    pub fn to_polygon(&self) -> Polygon {
        let ring = (0..DISK_SEGMENTS)
            .map(|i| {
                let angle = TAU * i as f64 / DISK_SEGMENTS as f64;
                [
                    self.center.x + self.radius * angle.cos(),
                    self.center.y + self.radius * angle.sin(),
                ]
            })
            .collect();
        Polygon::from_rings_unchecked(vec![ring])
    }

    /// Area of the polygonal approximation returned by [`Disk::to_polygon`].
    #[inline]
    pub fn polygon_area(&self) -> f64 {
        let n = DISK_SEGMENTS as f64;
        0.5 * n * self.radius * self.radius * (TAU / n).sin()
    }

    #[inline]
    pub fn intersects(&self, other: &Disk) -> bool {
        self.center.distance_squared(other.center) < (self.radius + other.radius).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn polygon_area_matches_closed_form() {
        let disk = Disk::new(DVec2::new(3.0, -7.0), 10.0);
        let polygon = disk.to_polygon();
        assert!((polygon.area() - disk.polygon_area()).abs() < 1e-9);
        // Inscribed 64-gon loses well under 1% of the true circle.
        assert!(polygon.area() < PI * 100.0);
        assert!(polygon.area() > PI * 100.0 * 0.99);
    }

    #[test]
    fn polygon_is_centered() {
        let disk = Disk::new(DVec2::new(50.0, 25.0), 4.0);
        let polygon = disk.to_polygon();
        assert!(polygon.centroid().distance(disk.center) < 1e-9);
        assert!((polygon.bounds().width() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn intersects_uses_open_contact() {
        let a = Disk::new(DVec2::ZERO, 1.0);
        assert!(a.intersects(&Disk::new(DVec2::new(1.5, 0.0), 1.0)));
        assert!(!a.intersects(&Disk::new(DVec2::new(2.0, 0.0), 1.0)));
    }
}
