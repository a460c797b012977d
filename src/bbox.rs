//! Axis-aligned bounding boxes in world coordinates.

use std::fmt;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};


//------------ BoundingBox ---------------------------------------------------

/// An axis-aligned rectangle in some planar world coordinate system.
///
/// The box is kept as its four ordered extremes `minx`, `miny`, `maxx`, and
/// `maxy`. The constructor orders the values, so a box always has
/// `minx <= maxx` and `miny <= maxy`. Boxes with zero width or height are
/// allowed here. They are only rejected when a transformation is fitted
/// around them.
///
/// In configuration files, a box is written as the array
/// `[minx, miny, maxx, maxy]`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    minx: f64,
    miny: f64,
    maxx: f64,
    maxy: f64,
}

impl BoundingBox {
    /// Creates a new box from its extremes.
    ///
    /// If a minimum is larger than its maximum, the two are swapped.
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        BoundingBox {
            minx: minx.min(maxx),
            miny: miny.min(maxy),
            maxx: minx.max(maxx),
            maxy: miny.max(maxy),
        }
    }

    /// Returns the smallest box containing all the given points.
    ///
    /// Returns `None` if the iterator is empty.
    pub fn from_points(
        points: impl IntoIterator<Item = Point>
    ) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut res = BoundingBox::new(first.x, first.y, first.x, first.y);
        for point in points {
            res = res.union_point(point);
        }
        Some(res)
    }

    pub fn minx(&self) -> f64 {
        self.minx
    }

    pub fn miny(&self) -> f64 {
        self.miny
    }

    pub fn maxx(&self) -> f64 {
        self.maxx
    }

    pub fn maxy(&self) -> f64 {
        self.maxy
    }

    /// Returns the four values as `(minx, miny, maxx, maxy)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.minx, self.miny, self.maxx, self.maxy)
    }

    /// The extent of the box along the x axis.
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    /// The extent of the box along the y axis.
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }

    /// Returns whether the box has no area.
    pub fn is_empty(&self) -> bool {
        !(self.width() > 0. && self.height() > 0.)
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        BoundingBox {
            minx: self.minx.min(other.minx),
            miny: self.miny.min(other.miny),
            maxx: self.maxx.max(other.maxx),
            maxy: self.maxy.max(other.maxy),
        }
    }

    /// Returns the smallest box containing `self` and `point`.
    pub fn union_point(&self, point: Point) -> Self {
        BoundingBox {
            minx: self.minx.min(point.x),
            miny: self.miny.min(point.y),
            maxx: self.maxx.max(point.x),
            maxy: self.maxy.max(point.y),
        }
    }

    /// Returns whether `other` lies completely within `self`.
    ///
    /// Shared edges count as contained.
    pub fn contains(&self, other: &Self) -> bool {
        self.minx <= other.minx && self.miny <= other.miny
            && self.maxx >= other.maxx && self.maxy >= other.maxy
    }

    /// Returns whether the point lies within or on the edge of the box.
    pub fn contains_point(&self, point: Point) -> bool {
        self.minx <= point.x && point.x <= self.maxx
            && self.miny <= point.y && point.y <= self.maxy
    }
}


//--- From

impl From<[f64; 4]> for BoundingBox {
    fn from([minx, miny, maxx, maxy]: [f64; 4]) -> Self {
        BoundingBox::new(minx, miny, maxx, maxy)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(src: BoundingBox) -> Self {
        [src.minx, src.miny, src.maxx, src.maxy]
    }
}

impl From<Rect> for BoundingBox {
    fn from(src: Rect) -> Self {
        BoundingBox::new(src.x0, src.y0, src.x1, src.y1)
    }
}

impl From<BoundingBox> for Rect {
    fn from(src: BoundingBox) -> Self {
        Rect::new(src.minx, src.miny, src.maxx, src.maxy)
    }
}


//--- Display

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "({}, {}, {}, {})",
            self.minx, self.miny, self.maxx, self.maxy
        )
    }
}


//============ Tests =========================================================
