//! Configuration of a map.

use std::{error, fmt, fs, io};
use std::path::Path;
use std::str::FromStr;
use kurbo::Point;
use serde::Deserialize;
use crate::bbox::BoundingBox;
use crate::crs::Crs;
use crate::feature::{FeatureCollection, Geometry};
use crate::layer::{LayerError, LayerKind, VectorLayer};
use crate::map::{Map, MapError};
use crate::transform::Margins;


//------------ MapConfig -----------------------------------------------------

/// The map configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapConfig {
    /// The width of the image in pixels.
    pub width: u32,

    /// The height of the image in pixels.
    pub height: u32,

    /// The reference system of the map.
    pub crs: Crs,

    /// The initial area of the map.
    #[serde(default)]
    pub bbox: Option<BoundingBox>,

    /// The margins as `[x, y]`.
    #[serde(default)]
    pub margins: Option<[f64; 2]>,

    /// The layers of the map in drawing order.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

impl MapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path.as_ref())?;
        Self::from_str(&data)
    }

    /// Creates the map described by the configuration.
    ///
    /// Layers are added in the order they appear in.
    pub fn into_map(self) -> Result<Map, ConfigError> {
        let mut map = Map::new(self.width, self.height, self.crs, self.bbox)?;
        if let Some([x, y]) = self.margins {
            map = map.with_margins(Margins::new(x, y))?;
        }
        for layer in self.layers {
            match layer {
                LayerConfig::Vector(layer) => {
                    map.add_layer(layer.into_layer()?)?
                }
            }
        }
        Ok(map)
    }
}

impl FromStr for MapConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s).map_err(Into::into)
    }
}


//------------ LayerConfig ---------------------------------------------------

/// The configuration of a single layer.
///
/// The kind of layer is selected by the `type` field which has to contain
/// one of the tags of [`LayerKind`].
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerConfig {
    Vector(VectorLayerConfig),
}

impl LayerConfig {
    pub fn kind(&self) -> LayerKind {
        match *self {
            LayerConfig::Vector(_) => LayerKind::Vector,
        }
    }
}


//------------ VectorLayerConfig ---------------------------------------------

#[derive(Clone, Debug, Deserialize)]
pub struct VectorLayerConfig {
    /// The name of the layer.
    pub name: String,

    /// The reference system of the geometries.
    pub crs: Crs,

    /// The geometries.
    #[serde(default)]
    pub geometries: Vec<GeometryConfig>,
}

impl VectorLayerConfig {
    pub fn into_layer(self) -> Result<VectorLayer, LayerError> {
        VectorLayer::new(
            self.name,
            FeatureCollection::new(
                self.crs,
                self.geometries.into_iter().map(Into::into).collect()
            )
        )
    }
}


//------------ GeometryConfig ------------------------------------------------

/// A geometry with its coordinates given as `[x, y]` pairs.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryConfig {
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
    Polygon(Vec<[f64; 2]>),
}

impl From<GeometryConfig> for Geometry {
    fn from(src: GeometryConfig) -> Self {
        fn points(src: Vec<[f64; 2]>) -> Vec<Point> {
            src.into_iter().map(|[x, y]| Point::new(x, y)).collect()
        }

        match src {
            GeometryConfig::Point([x, y]) => Geometry::Point(Point::new(x, y)),
            GeometryConfig::LineString(src) => {
                Geometry::LineString(points(src))
            }
            GeometryConfig::Polygon(src) => Geometry::Polygon(points(src)),
        }
    }
}


//------------ ConfigError ---------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    Io(io::Error),

    /// The configuration is not valid.
    Parse(toml::de::Error),

    /// A layer could not be created.
    Layer(LayerError),

    /// The map could not be created.
    Map(MapError),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl From<LayerError> for ConfigError {
    fn from(err: LayerError) -> Self {
        ConfigError::Layer(err)
    }
}

impl From<MapError> for ConfigError {
    fn from(err: MapError) -> Self {
        ConfigError::Map(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::Io(ref err) => fmt::Display::fmt(err, f),
            ConfigError::Parse(ref err) => fmt::Display::fmt(err, f),
            ConfigError::Layer(ref err) => fmt::Display::fmt(err, f),
            ConfigError::Map(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for ConfigError { }


//============ Tests =========================================================
