//! Vector data shown on the map.

use std::slice;
use kurbo::Point;
use crate::bbox::BoundingBox;
use crate::crs::{Crs, CrsError};


//------------ FeatureCollection ---------------------------------------------

/// An ordered collection of geometries in a common reference system.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureCollection {
    /// The reference system of all coordinates in the collection.
    crs: Crs,

    /// The geometries.
    geometries: Vec<Geometry>,
}

impl FeatureCollection {
    pub fn new(crs: Crs, geometries: Vec<Geometry>) -> Self {
        FeatureCollection { crs, geometries }
    }

    pub fn empty(crs: Crs) -> Self {
        Self::new(crs, Vec::new())
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn push(&mut self, geometry: Geometry) {
        self.geometries.push(geometry)
    }

    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<Geometry> {
        self.geometries.iter()
    }

    /// Returns the bounding box of all geometries.
    ///
    /// Returns `None` if the collection doesn’t contain any points.
    pub fn total_bounds(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(
            self.geometries.iter().flat_map(|geom| {
                geom.points().iter().copied()
            })
        )
    }

    /// Reprojects all geometries into `crs`.
    ///
    /// If this fails, the collection is left unchanged.
    pub fn reproject(&mut self, crs: Crs) -> Result<(), CrsError> {
        if crs == self.crs {
            return Ok(())
        }
        let from = self.crs;
        let geometries = self.geometries.iter().map(|geom| {
            geom.try_map(|point| from.reproject_point(crs, point))
        }).collect::<Result<Vec<_>, _>>()?;
        self.geometries = geometries;
        self.crs = crs;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Geometry;
    type IntoIter = slice::Iter<'a, Geometry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


//------------ Geometry ------------------------------------------------------

/// A single geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single location.
    Point(Point),

    /// An open sequence of connected line segments.
    LineString(Vec<Point>),

    /// The exterior ring of an area.
    ///
    /// The ring is implicitely closed, i.e., the last point is connected
    /// back to the first one.
    Polygon(Vec<Point>),
}

impl Geometry {
    /// Returns all the points of the geometry.
    pub fn points(&self) -> &[Point] {
        match *self {
            Geometry::Point(ref point) => slice::from_ref(point),
            Geometry::LineString(ref points) => points,
            Geometry::Polygon(ref points) => points,
        }
    }

    /// Returns a geometry of the same kind with all points replaced.
    fn try_map<E>(
        &self, mut op: impl FnMut(Point) -> Result<Point, E>
    ) -> Result<Self, E> {
        Ok(match *self {
            Geometry::Point(point) => Geometry::Point(op(point)?),
            Geometry::LineString(ref points) => {
                Geometry::LineString(
                    points.iter().map(|point| op(*point))
                        .collect::<Result<_, _>>()?
                )
            }
            Geometry::Polygon(ref points) => {
                Geometry::Polygon(
                    points.iter().map(|point| op(*point))
                        .collect::<Result<_, _>>()?
                )
            }
        })
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> FeatureCollection {
        FeatureCollection::new(Crs::WGS84, vec![
            Geometry::Point(Point::new(5.1, 52.1)),
            Geometry::LineString(vec![
                Point::new(4.9, 52.4), Point::new(6.1, 52.2)
            ]),
            Geometry::Polygon(vec![
                Point::new(5., 51.5), Point::new(5.5, 51.5),
                Point::new(5.5, 51.9),
            ]),
        ])
    }

    #[test]
    fn total_bounds() {
        assert_eq!(FeatureCollection::empty(Crs::WGS84).total_bounds(), None);
        assert_eq!(
            sample().total_bounds(),
            Some(BoundingBox::new(4.9, 51.5, 6.1, 52.4))
        );
    }

    #[test]
    fn reproject() {
        let mut data = sample();
        data.reproject(Crs::WEB_MERCATOR).unwrap();
        assert_eq!(data.crs(), Crs::WEB_MERCATOR);
        assert_eq!(data.len(), 3);

        let bounds = data.total_bounds().unwrap();
        let expected = Crs::WGS84.reproject_point(
            Crs::WEB_MERCATOR, Point::new(6.1, 52.4)
        ).unwrap();
        assert_eq!(bounds.maxx(), expected.x);
        assert_eq!(bounds.maxy(), expected.y);

        data.reproject(Crs::WGS84).unwrap();
        for (geom, orig) in data.iter().zip(sample().iter()) {
            for (point, orig) in geom.points().iter().zip(orig.points()) {
                assert!((point.x - orig.x).abs() < 1e-9);
                assert!((point.y - orig.y).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn failed_reproject_keeps_data() {
        let mut data = sample();
        assert!(data.reproject(Crs::from_epsg(28992)).is_err());
        assert_eq!(data, sample());
    }
}
