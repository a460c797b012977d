//! The layers a map is composed of.
//!
//! A layer is a named source of data with a reference system and a bounding
//! box. The kinds of layers available are listed by [`LayerKind`] and each
//! kind has a variant in [`Layer`]. Adding a new kind of layer means adding
//! a variant to both types, after which the compiler points out everything
//! that needs to handle it.

use std::{error, fmt};
use std::str::FromStr;
use crate::bbox::BoundingBox;
use crate::crs::{Crs, CrsError};
use crate::render::RenderError;
use crate::transform::ImageTransform;

pub use self::vector::VectorLayer;


//------------ Submodules with the actual layers -----------------------------

pub mod vector;


//------------ Layer ---------------------------------------------------------

/// A layer of a map.
#[derive(Clone, Debug)]
pub enum Layer {
    /// A layer of vector geometries.
    Vector(VectorLayer),
}

impl Layer {
    /// Returns the kind of the layer.
    pub fn kind(&self) -> LayerKind {
        match *self {
            Layer::Vector(_) => LayerKind::Vector,
        }
    }

    pub fn name(&self) -> &str {
        match *self {
            Layer::Vector(ref layer) => layer.name(),
        }
    }

    /// Returns the current reference system of the layer’s data.
    pub fn crs(&self) -> Crs {
        match *self {
            Layer::Vector(ref layer) => layer.crs(),
        }
    }

    /// Returns the bounding box of the layer’s data.
    pub fn bbox(&self) -> BoundingBox {
        match *self {
            Layer::Vector(ref layer) => layer.bbox(),
        }
    }

    /// Reprojects the layer’s data into a new reference system.
    ///
    /// The bounding box is updated accordingly. If reprojection fails,
    /// the layer remains unchanged.
    pub fn set_crs(&mut self, crs: Crs) -> Result<(), LayerError> {
        match *self {
            Layer::Vector(ref mut layer) => layer.set_crs(crs),
        }
    }

    /// Renders the layer onto a Cairo context.
    pub fn render(
        &self, context: &cairo::Context, transform: &ImageTransform,
    ) -> Result<(), RenderError> {
        match *self {
            Layer::Vector(ref layer) => layer.render(context, transform),
        }
    }
}

impl From<VectorLayer> for Layer {
    fn from(src: VectorLayer) -> Self {
        Layer::Vector(src)
    }
}


//------------ LayerKind -----------------------------------------------------

/// The kinds of layers available.
///
/// Each kind has a unique type tag that is used to refer to it by name,
/// for instance in configuration files.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LayerKind {
    /// A [`VectorLayer`].
    Vector,
}

impl LayerKind {
    /// All known kinds of layers.
    pub const ALL: &'static [LayerKind] = &[LayerKind::Vector];

    /// Returns the type tag of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            LayerKind::Vector => "vector",
        }
    }
}

impl FromStr for LayerKind {
    type Err = UnknownLayerKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL.iter().copied().find(|kind| {
            kind.as_str() == s
        }).ok_or_else(|| UnknownLayerKind(s.into()))
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ LayerError ----------------------------------------------------

/// An error happened while creating or modifying a layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LayerError {
    /// The layer doesn’t have any data and thus no bounding box.
    EmptyData { name: String },

    /// The layer data could not be reprojected.
    Crs(CrsError),
}

impl From<CrsError> for LayerError {
    fn from(err: CrsError) -> Self {
        LayerError::Crs(err)
    }
}

impl fmt::Display for LayerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LayerError::EmptyData { ref name } => {
                write!(f, "layer '{}' has no data", name)
            }
            LayerError::Crs(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for LayerError { }


//------------ UnknownLayerKind ----------------------------------------------

/// A type tag does not name a known kind of layer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownLayerKind(pub String);

impl fmt::Display for UnknownLayerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown layer type '{}'", self.0)
    }
}

impl error::Error for UnknownLayerKind { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use kurbo::Point;
    use crate::feature::{FeatureCollection, Geometry};
    use super::*;

    #[test]
    fn registry_lookup() {
        assert_eq!(LayerKind::from_str("vector"), Ok(LayerKind::Vector));
        assert_eq!(
            LayerKind::from_str("raster"),
            Err(UnknownLayerKind("raster".into()))
        );
        assert!(LayerKind::from_str("Vector").is_err());
        assert!(LayerKind::from_str("").is_err());
        for kind in LayerKind::ALL {
            assert_eq!(LayerKind::from_str(kind.as_str()), Ok(*kind));
        }
    }

    #[test]
    fn dispatch() {
        let data = FeatureCollection::new(Crs::WGS84, vec![
            Geometry::LineString(vec![
                Point::new(4., 51.), Point::new(6., 53.)
            ])
        ]);
        let mut layer = Layer::from(
            VectorLayer::new("rails", data).unwrap()
        );
        assert_eq!(layer.kind(), LayerKind::Vector);
        assert_eq!(layer.name(), "rails");
        assert_eq!(layer.crs(), Crs::WGS84);
        assert_eq!(layer.bbox(), BoundingBox::new(4., 51., 6., 53.));

        layer.set_crs(Crs::WEB_MERCATOR).unwrap();
        assert_eq!(layer.crs(), Crs::WEB_MERCATOR);
        assert!(layer.bbox().minx() > 400_000.);

        assert!(matches!(
            layer.set_crs(Crs::from_epsg(28992)),
            Err(LayerError::Crs(CrsError::Unsupported { .. }))
        ));
        assert_eq!(layer.crs(), Crs::WEB_MERCATOR);
    }
}
