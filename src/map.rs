//! The map.
//!
//! A [`Map`] collects layers and keeps track of the area they cover. Every
//! time this area changes, the transformation into the map’s image is
//! refitted.

use std::{error, fmt};
use crate::bbox::BoundingBox;
use crate::crs::Crs;
use crate::layer::{Layer, LayerError};
use crate::render::RenderError;
use crate::transform::{FitError, ImageTransform, Margins};


//------------ Map -----------------------------------------------------------

/// A map to be rendered into an image.
#[derive(Clone, Debug)]
pub struct Map {
    /// The width of the image in pixels.
    width: u32,

    /// The height of the image in pixels.
    height: u32,

    /// The reference system all layers are reprojected into.
    crs: Crs,

    /// The margins used when fitting the transformation.
    margins: Margins,

    /// The area of the map and its transformation.
    ///
    /// This is `None` until either a bounding box is set explicitly or a
    /// layer is added.
    view: Option<View>,

    /// The layers in the order they were added.
    layers: Vec<Layer>,
}

#[derive(Clone, Copy, Debug)]
struct View {
    bbox: BoundingBox,
    transformation: ImageTransform,
}

impl Map {
    /// Creates a new map.
    ///
    /// If `bbox` is given, the transformation is fitted right away.
    pub fn new(
        width: u32, height: u32, crs: Crs, bbox: Option<BoundingBox>,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(FitError::ZeroSize { width, height }.into())
        }
        let mut res = Map {
            width, height, crs,
            margins: Margins::default(),
            view: None,
            layers: Vec::new(),
        };
        if let Some(bbox) = bbox {
            res.set_bbox(bbox)?;
        }
        Ok(res)
    }

    /// Changes the margins used for fitting the transformation.
    pub fn with_margins(mut self, margins: Margins) -> Result<Self, MapError> {
        if let Some(view) = self.view {
            self.view = Some(View {
                bbox: view.bbox,
                transformation: ImageTransform::fit(
                    view.bbox, self.width, self.height, margins
                )?,
            });
        }
        self.margins = margins;
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn margins(&self) -> Margins {
        self.margins
    }

    /// Returns the area covered by the map’s data.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.view.map(|view| view.bbox)
    }

    /// Returns the transformation from world into image coordinates.
    ///
    /// This is available whenever [`bbox`][Self::bbox] is.
    pub fn transformation(&self) -> Option<&ImageTransform> {
        self.view.as_ref().map(|view| &view.transformation)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Sets the area covered by the map and refits the transformation.
    ///
    /// If the transformation cannot be fitted, the map is left unchanged.
    pub fn set_bbox(&mut self, bbox: BoundingBox) -> Result<(), MapError> {
        let transformation = self.fit(bbox)?;
        log::info!("map area set to {}", bbox);
        self.view = Some(View { bbox, transformation });
        Ok(())
    }

    /// Adds a layer to the map.
    ///
    /// The layer is reprojected into the map’s reference system first. The
    /// map’s area is then grown to include the layer’s area.
    ///
    /// If anything goes wrong, the map is left unchanged and the layer is
    /// dropped.
    pub fn add_layer(
        &mut self, layer: impl Into<Layer>
    ) -> Result<(), MapError> {
        let mut layer = layer.into();
        layer.set_crs(self.crs)?;
        let bbox = match self.view {
            Some(ref view) => view.bbox.union(&layer.bbox()),
            None => layer.bbox(),
        };
        let transformation = self.fit(bbox)?;
        log::info!(
            "added {} layer '{}', map area now {}",
            layer.kind(), layer.name(), bbox
        );
        self.layers.push(layer);
        self.view = Some(View { bbox, transformation });
        Ok(())
    }

    /// Renders the map onto a Cairo context.
    ///
    /// The context is expected to have the size of the map with its origin
    /// in the top left corner. The layers are drawn in the order they were
    /// added on top of a white background.
    pub fn render(&self, context: &cairo::Context) -> Result<(), RenderError> {
        let transformation = self.transformation().ok_or(
            RenderError::NoExtent
        )?;
        context.save()?;
        context.set_source_rgb(1., 1., 1.);
        context.paint()?;
        context.restore()?;
        for layer in &self.layers {
            layer.render(context, transformation)?;
        }
        Ok(())
    }

    fn fit(&self, bbox: BoundingBox) -> Result<ImageTransform, FitError> {
        ImageTransform::fit(bbox, self.width, self.height, self.margins)
    }
}


//------------ MapError ------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum MapError {
    /// A layer could not be added.
    Layer(LayerError),

    /// The map’s area cannot be fitted into its image.
    Fit(FitError),
}

impl From<LayerError> for MapError {
    fn from(err: LayerError) -> Self {
        MapError::Layer(err)
    }
}

impl From<FitError> for MapError {
    fn from(err: FitError) -> Self {
        MapError::Fit(err)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MapError::Layer(ref err) => fmt::Display::fmt(err, f),
            MapError::Fit(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for MapError { }


//============ Tests =========================================================
