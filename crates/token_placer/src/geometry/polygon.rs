//! Polygonal areas with cached measures and intersection support.
use glam::DVec2;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::error::{Error, Result};
use crate::geometry::disk::Disk;
use crate::geometry::{ring_moments, rings_area, Bounds, MIN_AREA};

/// Immutable polygonal area.
///
/// A polygon is one or more closed rings interpreted with the even-odd rule, so clipping output
/// with several pieces or holes is represented by the same type as a hand-authored outline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<[f64; 2]>>", into = "Vec<Vec<[f64; 2]>>")
)]
pub struct Polygon {
    rings: Vec<Vec<[f64; 2]>>,
    area: f64,
    centroid: DVec2,
    bounds: Bounds,
}

impl Polygon {
    /// Builds a polygon from an ordered vertex list.
    ///
    /// A trailing vertex equal to the first one is dropped. Fails with
    /// [`Error::InvalidGeometry`] on fewer than 3 vertices, non-finite coordinates, or a
    /// non-positive area.
    pub fn new<I, P>(vertices: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: Into<mint::Point2<f64>>,
    {
        let mut ring: Vec<[f64; 2]> = vertices
            .into_iter()
            .map(|p| {
                let p: mint::Point2<f64> = p.into();
                [p.x, p.y]
            })
            .collect();

        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(Error::InvalidGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                ring.len()
            )));
        }
        if ring.iter().flatten().any(|c| !c.is_finite()) {
            return Err(Error::InvalidGeometry(
                "polygon has non-finite coordinates".into(),
            ));
        }

        let polygon = Self::from_rings_unchecked(vec![ring]);
        if polygon.area <= MIN_AREA {
            return Err(Error::InvalidGeometry(format!(
                "polygon area must be > 0, got {}",
                polygon.area
            )));
        }
        Ok(polygon)
    }

    /// Approximates a disk of `radius` around `center`.
    pub fn disk(center: impl Into<mint::Point2<f64>>, radius: f64) -> Result<Self> {
        let center: mint::Point2<f64> = center.into();
        let center = DVec2::new(center.x, center.y);
        if !radius.is_finite() || radius <= 0.0 || !center.is_finite() {
            return Err(Error::InvalidGeometry(format!(
                "disk needs a finite center and radius > 0, got radius {radius}"
            )));
        }
        Ok(Disk::new(center, radius).to_polygon())
    }

    /// Builds a polygon from rings without validation. Measures are still computed.
    pub(crate) fn from_rings_unchecked(rings: Vec<Vec<[f64; 2]>>) -> Self {
        let mut area2 = 0.0;
        let mut mx = 0.0;
        let mut my = 0.0;
        for ring in &rings {
            let (a, x, y) = ring_moments(ring);
            area2 += a;
            mx += x;
            my += y;
        }

        let bounds = Bounds::from_points(rings.iter().flatten().map(|&[x, y]| DVec2::new(x, y)))
            .unwrap_or(Bounds::new(DVec2::ZERO, DVec2::ZERO));

        let centroid = if area2.abs() > 0.0 {
            DVec2::new(mx, my) / (3.0 * area2)
        } else {
            (bounds.min + bounds.max) * 0.5
        };

        Self {
            rings,
            area: area2.abs() * 0.5,
            centroid,
            bounds,
        }
    }

    /// Collects clipping output into a polygon, or `None` if nothing with positive area remains.
    fn from_shapes(shapes: Vec<Vec<Vec<[f64; 2]>>>) -> Option<Self> {
        let rings: Vec<Vec<[f64; 2]>> = shapes
            .into_iter()
            .flatten()
            .filter(|ring| ring.len() >= 3)
            .collect();
        if rings.is_empty() {
            return None;
        }
        let polygon = Self::from_rings_unchecked(rings);
        (polygon.area > MIN_AREA).then_some(polygon)
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Area-weighted centroid over all rings.
    #[inline]
    pub fn centroid(&self) -> DVec2 {
        self.centroid
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Raw rings as `[x, y]` pairs.
    pub fn rings(&self) -> &[Vec<[f64; 2]>] {
        &self.rings
    }

    /// Vertices of every ring, in order.
    pub fn vertices(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.rings
            .iter()
            .flatten()
            .map(|&[x, y]| DVec2::new(x, y))
    }

    /// Even-odd point containment over all rings.
    pub fn contains(&self, point: DVec2) -> bool {
        if !self.bounds.contains(point) {
            return false;
        }

        let mut inside = false;
        for ring in &self.rings {
            let n = ring.len();
            let mut j = n - 1;
            for i in 0..n {
                let [xi, yi] = ring[i];
                let [xj, yj] = ring[j];
                if (yi > point.y) != (yj > point.y)
                    && point.x < (xj - xi) * (point.y - yi) / (yj - yi) + xi
                {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }

    /// Intersection of two polygons, or `None` when they do not overlap with positive area.
    pub fn intersection(&self, other: &Polygon) -> Option<Polygon> {
        if !self.bounds.overlaps(&other.bounds) {
            return None;
        }
        let shapes = self
            .rings
            .overlay(&other.rings, OverlayRule::Intersect, FillRule::EvenOdd);
        Self::from_shapes(shapes)
    }

    /// Area of the intersection of two polygons. Symmetric in its arguments.
    pub fn intersection_area(&self, other: &Polygon) -> f64 {
        if !self.bounds.overlaps(&other.bounds) {
            return 0.0;
        }
        let shapes = self
            .rings
            .overlay(&other.rings, OverlayRule::Intersect, FillRule::EvenOdd);
        shapes
            .iter()
            .map(|shape| rings_area(shape))
            .sum::<f64>()
    }
}

impl TryFrom<Vec<Vec<[f64; 2]>>> for Polygon {
    type Error = Error;

    /// Rebuilds a polygon from raw rings, applying the checks of [`Polygon::new`] to the
    /// combined even-odd area.
    fn try_from(rings: Vec<Vec<[f64; 2]>>) -> Result<Self> {
        if rings.is_empty() || rings.iter().any(|ring| ring.len() < 3) {
            return Err(Error::InvalidGeometry(
                "every ring needs at least 3 vertices".into(),
            ));
        }
        if rings.iter().flatten().flatten().any(|c| !c.is_finite()) {
            return Err(Error::InvalidGeometry(
                "polygon has non-finite coordinates".into(),
            ));
        }
        let polygon = Self::from_rings_unchecked(rings);
        if polygon.area <= MIN_AREA {
            return Err(Error::InvalidGeometry(format!(
                "polygon area must be > 0, got {}",
                polygon.area
            )));
        }
        Ok(polygon)
    }
}

impl From<Polygon> for Vec<Vec<[f64; 2]>> {
    fn from(polygon: Polygon) -> Self {
        polygon.rings
    }
}
