//! Transformations from world space into image space.
//!
//! The central type of this module is [`ImageTransform`]. It describes the
//! affine transformation that maps the planar coordinates of a map’s
//! coordinate reference system onto the pixels of a target image. World
//! coordinates have their y axis pointing north while image coordinates
//! have their origin in the top left corner and the y axis pointing down.

use std::{error, fmt};
use kurbo::{Affine, Point};
use crate::bbox::BoundingBox;


//------------ Margins -------------------------------------------------------

/// The padding to keep around the data when fitting it into an image.
///
/// Both values are fractions of the data’s extent along the respective
/// axis and are added on each side. They should be in the range `0. .. 1.`.
/// This isn’t enforced, but negative values shrink the padded area and will
/// lead to data being clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub x: f64,
    pub y: f64,
}

impl Margins {
    /// The default margin along both axes.
    pub const DEFAULT: f64 = 0.2;

    pub fn new(x: f64, y: f64) -> Self {
        Margins { x, y }
    }

    /// Margins of the same size along both axes.
    pub fn uniform(margin: f64) -> Self {
        Margins::new(margin, margin)
    }

    /// No margins at all.
    pub fn zero() -> Self {
        Margins::new(0., 0.)
    }
}

impl Default for Margins {
    fn default() -> Self {
        Margins::uniform(Self::DEFAULT)
    }
}


//------------ ImageTransform ------------------------------------------------

/// The transformation from world coordinates to image coordinates.
///
/// The transformation is kept as the six coefficients of an affine
/// transformation such that
///
/// ```text
/// x_new = xx * x + xy * y + x0
/// y_new = yx * x + yy * y + y0
/// ```
///
/// In addition, it keeps the extent of the world area covered by the image
/// and the bounding box of that area. This bounding box is the one given
/// when creating the transformation grown by the margins and then grown
/// further along one axis to match the aspect ratio of the image.
///
/// A value can only be created by fitting a bounding box into an image
/// via [`fit`][Self::fit] or [`for_map`][Self::for_map].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransform {
    xx: f64,
    xy: f64,
    x0: f64,
    yx: f64,
    yy: f64,
    y0: f64,

    /// The world extent along the x axis covered by the image.
    extentx: f64,

    /// The world extent along the y axis covered by the image.
    extenty: f64,

    /// The world area covered by the image.
    bbox: BoundingBox,

    /// The width of the image in pixels.
    width: u32,

    /// The height of the image in pixels.
    height: u32,
}

impl ImageTransform {
    /// Creates the transformation for a map with the default margins.
    pub fn for_map(
        bbox: BoundingBox, width: u32, height: u32
    ) -> Result<Self, FitError> {
        Self::fit(bbox, width, height, Margins::default())
    }

    /// Creates a transformation fitting `bbox` into an image.
    ///
    /// The image is `width` by `height` pixels. The box is first padded on
    /// each side by the fraction of its extent given by `margins`. Then
    /// whichever axis is too short for the image’s aspect ratio is grown
    /// symmetrically, so the data stays centered in the image.
    ///
    /// Fails if the image has no pixels along either axis or if the
    /// resulting world extent is empty, which happens if `bbox` is a single
    /// point.
    pub fn fit(
        bbox: BoundingBox, width: u32, height: u32, margins: Margins,
    ) -> Result<Self, FitError> {
        if width == 0 || height == 0 {
            return Err(FitError::ZeroSize { width, height })
        }
        let fwidth = f64::from(width);
        let fheight = f64::from(height);

        let (minx, miny, maxx, maxy) = bbox.bounds();
        let hratio = fheight / fwidth;
        let vratio = fwidth / fheight;
        let mut offsetx = (maxx - minx) * margins.x;
        let mut offsety = (maxy - miny) * margins.y;
        let mut extentx = maxx - minx + offsetx * 2.;
        let mut extenty = maxy - miny + offsety * 2.;

        if extentx * hratio > extenty {
            let new_extenty = extentx * hratio;
            offsety += (new_extenty - extenty) / 2.;
            extenty = new_extenty;
        }
        else {
            let new_extentx = extenty * vratio;
            offsetx += (new_extentx - extentx) / 2.;
            extentx = new_extentx;
        }

        if !Self::is_usable_extent(extentx)
            || !Self::is_usable_extent(extenty)
        {
            return Err(FitError::Degenerate { extentx, extenty })
        }

        let scalex = fwidth / extentx;
        let scaley = fheight / extenty;
        let originx = minx - offsetx;
        let originy = miny - offsety;

        let res = ImageTransform {
            xx: scalex,
            xy: 0.,
            x0: -originx * scalex,
            yx: 0.,
            yy: -scaley,
            y0: originy * scaley + fheight,
            extentx,
            extenty,
            bbox: BoundingBox::new(
                originx, originy, originx + extentx, originy + extenty
            ),
            width,
            height,
        };
        log::debug!(
            "fitted {} into {}x{} px: scale {}/{}, covering {}",
            bbox, width, height, scalex, scaley, res.bbox
        );
        Ok(res)
    }

    fn is_usable_extent(extent: f64) -> bool {
        extent.is_finite() && extent > 0.
    }
}

impl ImageTransform {
    pub fn xx(&self) -> f64 {
        self.xx
    }

    pub fn xy(&self) -> f64 {
        self.xy
    }

    pub fn x0(&self) -> f64 {
        self.x0
    }

    pub fn yx(&self) -> f64 {
        self.yx
    }

    pub fn yy(&self) -> f64 {
        self.yy
    }

    pub fn y0(&self) -> f64 {
        self.y0
    }

    /// The world extent along the x axis covered by the image.
    pub fn extentx(&self) -> f64 {
        self.extentx
    }

    /// The world extent along the y axis covered by the image.
    pub fn extenty(&self) -> f64 {
        self.extenty
    }

    /// The world area covered by the image.
    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the coefficients in row order.
    ///
    /// The array is `[xx, xy, x0, yx, yy, y0]`, i.e., the two rows of the
    /// matrix `[xx xy x0; yx yy y0]`.
    pub fn matrix(&self) -> [f64; 6] {
        [self.xx, self.xy, self.x0, self.yx, self.yy, self.y0]
    }

    /// Returns the coefficients with the offsets last.
    ///
    /// The array is `[xx, xy, yx, yy, x0, y0]`. This is the order used by
    /// Shapely’s `affine_transform` as `[a, b, d, e, xoff, yoff]`.
    pub fn shapely_matrix(&self) -> [f64; 6] {
        [self.xx, self.xy, self.yx, self.yy, self.x0, self.y0]
    }

    /// Returns the transformation as a Cairo matrix.
    ///
    /// Setting this matrix on a context makes world coordinates the user
    /// space of the context.
    pub fn cairo_matrix(&self) -> cairo::Matrix {
        cairo::Matrix::new(
            self.xx, self.yx, self.xy, self.yy, self.x0, self.y0
        )
    }

    /// Returns the transformation as a Kurbo affine transformation.
    pub fn to_affine(&self) -> Affine {
        Affine::new([self.xx, self.yx, self.xy, self.yy, self.x0, self.y0])
    }

    /// Transforms a point in world coordinates into image coordinates.
    pub fn world_to_pixel(&self, point: Point) -> Point {
        Point::new(
            self.xx * point.x + self.xy * point.y + self.x0,
            self.yx * point.x + self.yy * point.y + self.y0,
        )
    }
}


//--- Display

impl fmt::Display for ImageTransform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "size:    {}x{}", self.width, self.height)?;
        writeln!(
            f, "matrix:  [{} {} {}; {} {} {}]",
            self.xx, self.xy, self.x0, self.yx, self.yy, self.y0
        )?;
        writeln!(f, "extent:  {} x {}", self.extentx, self.extenty)?;
        write!(f, "bbox:    {}", self.bbox)
    }
}


//------------ FitError -----------------------------------------------------

/// A transformation could not be fitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FitError {
    /// The image has no pixels along at least one axis.
    ZeroSize { width: u32, height: u32 },

    /// The world extent to cover is empty or not a number.
    Degenerate { extentx: f64, extenty: f64 },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            FitError::ZeroSize { width, height } => {
                write!(f, "image size {}x{} has no pixels", width, height)
            }
            FitError::Degenerate { extentx, extenty } => {
                write!(
                    f, "cannot fit degenerate extent {} x {}",
                    extentx, extenty
                )
            }
        }
    }
}

impl error::Error for FitError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn assert_close(left: f64, right: f64) {
        let tolerance = 1e-9 * left.abs().max(right.abs()).max(1.);
        assert!(
            (left - right).abs() <= tolerance,
            "{} is not close to {}", left, right
        );
    }

    fn assert_point_close(left: Point, right: Point) {
        assert_close(left.x, right.x);
        assert_close(left.y, right.y);
    }

    fn sample_bbox() -> BoundingBox {
        BoundingBox::new(2150., 2015., 5000., 3500.)
    }

    #[test]
    fn landscape_fit() {
        let trans = ImageTransform::fit(
            sample_bbox(), 1000, 500, Margins::uniform(0.2)
        ).unwrap();

        let (minx, miny, maxx, maxy) = (2150., 2015., 5000., 3500.);
        let extenty = (maxy - miny) * 1.4;
        let extentx = extenty * 2.;
        let offsetx = (maxx - minx) * 0.2
            + (extentx - (maxx - minx) * 1.4) / 2.;
        let scalex = 1000. / extentx;
        let scaley = 500. / extenty;

        assert_close(trans.extenty(), 2079.);
        assert_close(trans.extentx(), 4158.);
        assert_close(trans.xx(), scalex);
        assert_eq!(trans.xy(), 0.);
        assert_close(trans.x0(), -(minx - offsetx) * scalex);
        assert_eq!(trans.yx(), 0.);
        assert_close(trans.yy(), -scaley);
        assert_close(
            trans.y0(), (miny - (maxy - miny) * 0.2) * scaley + 500.
        );
        assert_close(trans.xx(), 0.24050024050024);
        assert_close(trans.xx(), -trans.yy());
    }

    #[test]
    fn portrait_fit() {
        let trans = ImageTransform::fit(
            sample_bbox(), 500, 1000, Margins::uniform(0.2)
        ).unwrap();

        let (minx, miny, maxx, maxy) = (2150., 2015., 5000., 3500.);
        let extentx = (maxx - minx) * 1.4;
        let extenty = extentx * 2.;
        let offsety = (maxy - miny) * 0.2
            + (extenty - (maxy - miny) * 1.4) / 2.;
        let scalex = 500. / extentx;
        let scaley = 1000. / extenty;

        assert_close(trans.extentx(), extentx);
        assert_close(trans.extenty(), extenty);
        assert_close(trans.xx(), scalex);
        assert_close(trans.yy(), -scaley);
        assert_close(trans.x0(), -(minx - (maxx - minx) * 0.2) * scalex);
        assert_close(trans.y0(), (miny - offsety) * scaley + 1000.);
    }

    #[test]
    fn extent_matches_aspect_ratio() {
        let boxes = [
            sample_bbox(),
            BoundingBox::new(-10., -10., 10., 10.),
            BoundingBox::new(0., 0., 1., 1000.),
            BoundingBox::new(0., 0., 1000., 1.),
            BoundingBox::new(-0.001, 51.2, 0.003, 51.21),
        ];
        let sizes = [(1000, 500), (500, 1000), (256, 256), (1, 7919)];
        let margins = [
            Margins::zero(), Margins::default(), Margins::new(0.1, 0.7)
        ];
        for bbox in boxes {
            for (width, height) in sizes {
                for margin in margins {
                    let trans = ImageTransform::fit(
                        bbox, width, height, margin
                    ).unwrap();
                    assert_close(
                        trans.extentx() / trans.extenty(),
                        f64::from(width) / f64::from(height)
                    );
                    assert_close(trans.xx(), -trans.yy());
                }
            }
        }
    }

    #[test]
    fn adjusted_bbox_contains_margined_bbox() {
        let bbox = sample_bbox();
        for (width, height) in [(1000, 500), (500, 1000), (300, 300)] {
            let margins = Margins::new(0.2, 0.3);
            let trans = ImageTransform::fit(
                bbox, width, height, margins
            ).unwrap();
            let margined = BoundingBox::new(
                bbox.minx() - bbox.width() * margins.x,
                bbox.miny() - bbox.height() * margins.y,
                bbox.maxx() + bbox.width() * margins.x,
                bbox.maxy() + bbox.height() * margins.y,
            );
            let adjusted = trans.bbox();
            let slack = 1e-9 * adjusted.width().max(adjusted.height());
            assert!(adjusted.minx() <= margined.minx() + slack);
            assert!(adjusted.miny() <= margined.miny() + slack);
            assert!(adjusted.maxx() >= margined.maxx() - slack);
            assert!(adjusted.maxy() >= margined.maxy() - slack);

            // The slack is distributed evenly.
            assert_close(
                margined.minx() - adjusted.minx(),
                adjusted.maxx() - margined.maxx()
            );
            assert_close(
                margined.miny() - adjusted.miny(),
                adjusted.maxy() - margined.maxy()
            );
        }
    }

    #[test]
    fn corners_land_on_image_corners() {
        let trans = ImageTransform::for_map(sample_bbox(), 1000, 500)
            .unwrap();
        let adjusted = trans.bbox();
        let corners = [
            (Point::new(adjusted.minx(), adjusted.miny()),
             Point::new(0., 500.)),
            (Point::new(adjusted.maxx(), adjusted.maxy()),
             Point::new(1000., 0.)),
            (Point::new(adjusted.minx(), adjusted.maxy()),
             Point::new(0., 0.)),
            (Point::new(adjusted.maxx(), adjusted.miny()),
             Point::new(1000., 500.)),
        ];
        for (world, pixel) in corners {
            assert_point_close(trans.world_to_pixel(world), pixel);
            assert_point_close(trans.to_affine() * world, pixel);
        }
    }

    #[test]
    fn refit_of_adjusted_bbox() {
        let trans = ImageTransform::for_map(sample_bbox(), 1000, 500)
            .unwrap();
        let again = ImageTransform::fit(
            trans.bbox(), 1000, 500, Margins::zero()
        ).unwrap();
        assert_close(again.xx(), trans.xx());
        assert_eq!(again.xy(), trans.xy());
        assert_eq!(again.yx(), trans.yx());
        assert_close(again.yy(), trans.yy());
        assert_close(again.x0(), trans.x0());
        assert_close(again.y0(), trans.y0());
        assert_close(again.extentx(), trans.extentx());
        assert_close(again.extenty(), trans.extenty());
    }

    #[test]
    fn equality() {
        let bbox = sample_bbox();
        let margins = Margins::default();
        let trans = ImageTransform::fit(bbox, 1000, 500, margins).unwrap();
        assert_eq!(
            trans, ImageTransform::fit(bbox, 1000, 500, margins).unwrap()
        );
        assert_eq!(trans, ImageTransform::for_map(bbox, 1000, 500).unwrap());

        let others = [
            ImageTransform::fit(bbox, 1001, 500, margins),
            ImageTransform::fit(bbox, 1000, 501, margins),
            ImageTransform::fit(bbox, 1000, 500, Margins::new(0.3, 0.2)),
            ImageTransform::fit(bbox, 1000, 500, Margins::new(0.2, 0.3)),
            ImageTransform::fit(
                BoundingBox::new(2151., 2015., 5000., 3500.),
                1000, 500, margins
            ),
            ImageTransform::fit(
                BoundingBox::new(2150., 2015., 5000., 3501.),
                1000, 500, margins
            ),
        ];
        for other in others {
            assert_ne!(trans, other.unwrap());
        }
    }

    #[test]
    fn matrix_views() {
        let trans = ImageTransform::for_map(sample_bbox(), 1000, 500)
            .unwrap();
        let [xx, xy, x0, yx, yy, y0] = trans.matrix();
        assert_eq!(trans.shapely_matrix(), [xx, xy, yx, yy, x0, y0]);

        let matrix = trans.cairo_matrix();
        assert_eq!(matrix.xx(), xx);
        assert_eq!(matrix.xy(), xy);
        assert_eq!(matrix.x0(), x0);
        assert_eq!(matrix.yx(), yx);
        assert_eq!(matrix.yy(), yy);
        assert_eq!(matrix.y0(), y0);

        let world = Point::new(3000., 2500.);
        let (px, py) = matrix.transform_point(world.x, world.y);
        assert_point_close(Point::new(px, py), trans.world_to_pixel(world));
    }

    #[test]
    fn thin_boxes_are_fitted() {
        let trans = ImageTransform::for_map(
            BoundingBox::new(10., 0., 10., 100.), 200, 100
        ).unwrap();
        assert_close(trans.extenty(), 140.);
        assert_close(trans.extentx(), 280.);
        assert_close(trans.bbox().minx(), 10. - 140.);
        assert_close(trans.bbox().maxx(), 10. + 140.);
    }

    #[test]
    fn degenerate_input() {
        assert_eq!(
            ImageTransform::for_map(sample_bbox(), 0, 500),
            Err(FitError::ZeroSize { width: 0, height: 500 })
        );
        assert_eq!(
            ImageTransform::for_map(sample_bbox(), 1000, 0),
            Err(FitError::ZeroSize { width: 1000, height: 0 })
        );
        assert!(matches!(
            ImageTransform::for_map(
                BoundingBox::new(5., 5., 5., 5.), 1000, 500
            ),
            Err(FitError::Degenerate { .. })
        ));
        assert!(matches!(
            ImageTransform::fit(
                sample_bbox(), 1000, 500, Margins::uniform(f64::NAN)
            ),
            Err(FitError::Degenerate { .. })
        ));
    }
}
