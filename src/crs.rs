//! Coordinate reference systems.
//!
//! Only a small set of reference systems is understood. Reprojection is
//! available between geographic WGS 84 coordinates and Spherical Mercator
//! as used by web maps. Any other pair of systems can only be used if both
//! sides are the same.

use std::{error, fmt};
use std::f64::consts::PI;
use std::str::FromStr;
use kurbo::Point;
use serde::{Deserialize, Serialize};


//------------ Configurable Constants ----------------------------------------

/// The radius of the sphere used by Spherical Mercator in meters.
const EARTH_RADIUS: f64 = 6_378_137.;

/// The largest latitude representable in Spherical Mercator in degrees.
///
/// This is the latitude at which the projected map becomes square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Half the width and height of the Spherical Mercator plane in meters.
pub const MERCATOR_HALF_EXTENT: f64 = PI * EARTH_RADIUS;


//------------ Crs -----------------------------------------------------------

/// A coordinate reference system identified by its EPSG code.
///
/// The textual representation is `"epsg:<code>"`. When parsing, the prefix
/// is accepted in any case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    epsg: u32,
}

impl Crs {
    /// Geographic coordinates on WGS 84 in degrees of longitude and latitude.
    pub const WGS84: Crs = Crs::from_epsg(4326);

    /// Spherical Mercator in meters as used by web maps.
    pub const WEB_MERCATOR: Crs = Crs::from_epsg(3857);

    pub const fn from_epsg(epsg: u32) -> Self {
        Crs { epsg }
    }

    pub fn epsg(self) -> u32 {
        self.epsg
    }

    /// Reprojects a point from `self` into `target`.
    pub fn reproject_point(
        self, target: Crs, point: Point
    ) -> Result<Point, CrsError> {
        if self == target {
            Ok(point)
        }
        else if self == Crs::WGS84 && target == Crs::WEB_MERCATOR {
            Ok(lonlat_to_mercator(point))
        }
        else if self == Crs::WEB_MERCATOR && target == Crs::WGS84 {
            Ok(mercator_to_lonlat(point))
        }
        else {
            Err(CrsError::Unsupported { from: self, to: target })
        }
    }

    /// Returns whether points can be reprojected from `self` into `target`.
    pub fn can_reproject(self, target: Crs) -> bool {
        self.reproject_point(target, Point::ZERO).is_ok()
    }
}


//--- FromStr and Display

impl FromStr for Crs {
    type Err = CrsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let code = match code.get(..5) {
            Some(prefix) if prefix.eq_ignore_ascii_case("epsg:") => {
                &code[5..]
            }
            _ => return Err(CrsError::Parse(s.into()))
        };
        u32::from_str(code).map(Crs::from_epsg).map_err(|_| {
            CrsError::Parse(s.into())
        })
    }
}

impl TryFrom<String> for Crs {
    type Error = CrsError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Crs::from_str(&src)
    }
}

impl From<Crs> for String {
    fn from(src: Crs) -> Self {
        src.to_string()
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "epsg:{}", self.epsg)
    }
}


//------------ Spherical Mercator --------------------------------------------

/// Projects longitude and latitude in degrees into Spherical Mercator.
///
/// Latitudes beyond [`MAX_LATITUDE`] are clamped.
fn lonlat_to_mercator(point: Point) -> Point {
    let lat = point.y.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    if lat != point.y {
        log::warn!(
            "latitude {} outside of Spherical Mercator, clamped to {}",
            point.y, lat
        );
    }
    Point::new(
        point.x.to_radians() * EARTH_RADIUS,
        lat.to_radians().tan().asinh() * EARTH_RADIUS,
    )
}

/// Converts Spherical Mercator back into longitude and latitude in degrees.
fn mercator_to_lonlat(point: Point) -> Point {
    Point::new(
        (point.x / EARTH_RADIUS).to_degrees(),
        (point.y / EARTH_RADIUS).sinh().atan().to_degrees(),
    )
}


//------------ CrsError ------------------------------------------------------

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CrsError {
    /// A string could not be parsed into a reference system.
    Parse(String),

    /// There is no reprojection between the two systems.
    Unsupported { from: Crs, to: Crs },
}

impl fmt::Display for CrsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CrsError::Parse(ref s) => {
                write!(f, "invalid reference system '{}'", s)
            }
            CrsError::Unsupported { from, to } => {
                write!(f, "cannot reproject from {} to {}", from, to)
            }
        }
    }
}

impl error::Error for CrsError { }


//============ Tests =========================================================
