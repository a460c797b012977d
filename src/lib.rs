//! Fitting geographic data into images.
//!
//! The crate determines the affine transformation that maps a bounding box
//! in some planar reference system onto the pixels of an image, keeping
//! the aspect ratio and leaving a margin around the data. See
//! [`ImageTransform`] for the details.
//!
//! Around this sits a small map model: a [`Map`] collects [`Layer`]s,
//! reprojects them into its reference system, and refits its
//! transformation whenever the area covered by the layers grows.

pub use self::bbox::BoundingBox;
pub use self::config::MapConfig;
pub use self::crs::Crs;
pub use self::layer::{Layer, LayerKind};
pub use self::map::Map;
pub use self::transform::{ImageTransform, Margins};

pub mod bbox;
pub mod config;
pub mod crs;
pub mod feature;
pub mod layer;
pub mod map;
pub mod render;
pub mod transform;
