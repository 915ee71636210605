//! Named map regions.
use std::collections::BTreeMap;

use glam::DVec2;

use crate::error::{Error, Result};
use crate::geometry::Polygon;

/// Registry of the map's named polygons and named points.
///
/// Points mark regions that hold a single value at a fixed spot rather than a set of tokens;
/// they are never placement targets.
#[derive(Debug, Clone, Default)]
pub struct RegionMap {
    polygons: BTreeMap<String, Polygon>,
    points: BTreeMap<String, DVec2>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a polygonal region, replacing any region of the same name.
    pub fn insert_polygon(&mut self, name: impl Into<String>, polygon: Polygon) {
        let name = name.into();
        self.points.remove(&name);
        self.polygons.insert(name, polygon);
    }

    /// Builds and registers a polygonal region from raw vertices.
    pub fn insert_vertices<I, P>(&mut self, name: impl Into<String>, vertices: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: Into<mint::Point2<f64>>,
    {
        let polygon = Polygon::new(vertices)?;
        self.insert_polygon(name, polygon);
        Ok(())
    }

    /// Registers a point region, replacing any region of the same name.
    pub fn insert_point(&mut self, name: impl Into<String>, point: impl Into<mint::Point2<f64>>) {
        let name = name.into();
        let point: mint::Point2<f64> = point.into();
        self.polygons.remove(&name);
        self.points.insert(name, DVec2::new(point.x, point.y));
    }

    pub fn with_polygon(mut self, name: impl Into<String>, polygon: Polygon) -> Self {
        self.insert_polygon(name, polygon);
        self
    }

    pub fn with_point(
        mut self,
        name: impl Into<String>,
        point: impl Into<mint::Point2<f64>>,
    ) -> Self {
        self.insert_point(name, point);
        self
    }

    pub fn polygon(&self, name: &str) -> Result<&Polygon> {
        self.polygons.get(name).ok_or_else(|| Error::UnknownRegion {
            name: name.to_string(),
        })
    }

    pub fn point(&self, name: &str) -> Result<DVec2> {
        self.points.get(name).copied().ok_or_else(|| Error::UnknownRegion {
            name: name.to_string(),
        })
    }

    #[inline]
    pub fn is_point(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.polygons.contains_key(name) || self.points.contains_key(name)
    }

    /// Names of all regions, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self
            .polygons
            .keys()
            .chain(self.points.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.into_iter()
    }

    pub fn len(&self) -> usize {
        self.polygons.len() + self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.points.is_empty()
    }
}
