//! Layers of vector geometries.

use crate::bbox::BoundingBox;
use crate::crs::Crs;
use crate::feature::FeatureCollection;
use crate::render::{self, RenderError};
use crate::transform::ImageTransform;
use super::LayerError;


//------------ VectorLayer ---------------------------------------------------

/// A layer showing a collection of vector geometries.
///
/// The layer owns its data. Changing the layer’s reference system
/// reprojects the data in place. If the data is needed in its original
/// form elsewhere, clone it before handing it to the layer.
#[derive(Clone, Debug)]
pub struct VectorLayer {
    /// The name of the layer.
    name: String,

    /// The geometries of the layer.
    data: FeatureCollection,

    /// The bounding box of all geometries in `data`.
    bbox: BoundingBox,
}

impl VectorLayer {
    /// Creates a new layer from its name and data.
    ///
    /// The layer uses the reference system of the data. Fails if the data
    /// doesn’t contain any points.
    pub fn new(
        name: impl Into<String>, data: FeatureCollection
    ) -> Result<Self, LayerError> {
        let name = name.into();
        match data.total_bounds() {
            Some(bbox) => Ok(VectorLayer { name, data, bbox }),
            None => Err(LayerError::EmptyData { name }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn crs(&self) -> Crs {
        self.data.crs()
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn data(&self) -> &FeatureCollection {
        &self.data
    }

    /// Returns the data, consuming the layer.
    pub fn into_data(self) -> FeatureCollection {
        self.data
    }

    /// Reprojects the data into `crs` and recalculates the bounding box.
    pub fn set_crs(&mut self, crs: Crs) -> Result<(), LayerError> {
        self.data.reproject(crs)?;

        // Reprojection keeps the number of points, so there are bounds.
        if let Some(bbox) = self.data.total_bounds() {
            self.bbox = bbox
        }
        Ok(())
    }

    pub fn render(
        &self, context: &cairo::Context, transform: &ImageTransform,
    ) -> Result<(), RenderError> {
        render::stroke_geometries(context, transform, &self.data)
    }
}


//============ Tests =========================================================
