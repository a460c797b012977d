//! Rendering onto Cairo surfaces.
//!
//! Actual drawing is left to Cairo. The transformation of a map is applied
//! to the context via its matrix so that geometries can be traced in world
//! coordinates. Strokes are done in image space so lines keep their width
//! in pixels regardless of the map’s scale.

use std::{error, fmt, fs, io};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::feature::Geometry;
use crate::map::Map;
use crate::transform::ImageTransform;


//------------ Configurable Constants ----------------------------------------

/// The width of lines in pixels.
const LINE_WIDTH: f64 = 1.;

/// The length of the side of the square marking a point in pixels.
const POINT_SIZE: f64 = 4.;


//------------ render_file ---------------------------------------------------

/// Renders a map into an image file.
///
/// The format of the file is determined by the extension of `path`.
pub fn render_file(map: &Map, path: &Path) -> Result<(), RenderError> {
    let format = OutputFormat::from_path(path)?;
    let surface = Surface::create(format, map.width(), map.height(), path)?;
    map.render(&surface.context()?)?;
    surface.finish()?;
    log::info!("map written to {}", path.display());
    Ok(())
}


//------------ stroke_geometries ---------------------------------------------

/// Draws geometries given in world coordinates onto a context.
///
/// Lines and polygon outlines are stroked, points are drawn as small
/// filled squares.
pub fn stroke_geometries<'a>(
    context: &cairo::Context,
    transform: &ImageTransform,
    geometries: impl IntoIterator<Item = &'a Geometry>,
) -> Result<(), RenderError> {
    context.save()?;
    context.set_source_rgb(0., 0., 0.);
    context.set_line_width(LINE_WIDTH);

    let mut points = Vec::new();
    context.set_matrix(transform.cairo_matrix());
    for geometry in geometries {
        match *geometry {
            Geometry::Point(point) => points.push(point),
            Geometry::LineString(ref line) => trace(context, line, false),
            Geometry::Polygon(ref ring) => trace(context, ring, true),
        }
    }
    context.identity_matrix();
    context.stroke()?;

    for point in points {
        let point = transform.world_to_pixel(point);
        context.rectangle(
            point.x - POINT_SIZE / 2., point.y - POINT_SIZE / 2.,
            POINT_SIZE, POINT_SIZE
        );
    }
    context.fill()?;
    context.restore()?;
    Ok(())
}

fn trace(context: &cairo::Context, points: &[kurbo::Point], close: bool) {
    let mut points = points.iter();
    let first = match points.next() {
        Some(first) => first,
        None => return
    };
    context.move_to(first.x, first.y);
    for point in points {
        context.line_to(point.x, point.y);
    }
    if close {
        context.close_path();
    }
}


//------------ OutputFormat --------------------------------------------------

/// The file formats a map can be rendered into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Determines the format from the extension of a file name.
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        path.extension().and_then(|ext| ext.to_str()).and_then(|ext| {
            OutputFormat::from_str(ext).ok()
        }).ok_or_else(|| RenderError::UnknownFormat(path.into()))
    }
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("png") {
            Ok(OutputFormat::Png)
        }
        else if s.eq_ignore_ascii_case("svg") {
            Ok(OutputFormat::Svg)
        }
        else {
            Err(())
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match *self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
        })
    }
}


//------------ Surface -------------------------------------------------------

/// A Cairo surface that ends up in a file.
enum Surface {
    Png(cairo::ImageSurface, PathBuf),
    Svg(cairo::SvgSurface),
}

impl Surface {
    fn create(
        format: OutputFormat, width: u32, height: u32, path: &Path,
    ) -> Result<Self, RenderError> {
        match format {
            OutputFormat::Png => {
                let size_err = || RenderError::Size { width, height };
                Ok(Surface::Png(
                    cairo::ImageSurface::create(
                        cairo::Format::ARgb32,
                        i32::try_from(width).map_err(|_| size_err())?,
                        i32::try_from(height).map_err(|_| size_err())?,
                    )?,
                    path.into()
                ))
            }
            OutputFormat::Svg => {
                // One pixel becomes one point.
                Ok(Surface::Svg(cairo::SvgSurface::new(
                    f64::from(width), f64::from(height), Some(path)
                )?))
            }
        }
    }

    fn context(&self) -> Result<cairo::Context, RenderError> {
        let context = match *self {
            Surface::Png(ref surface, _) => cairo::Context::new(surface)?,
            Surface::Svg(ref surface) => cairo::Context::new(surface)?,
        };
        Ok(context)
    }

    fn finish(self) -> Result<(), RenderError> {
        match self {
            Surface::Png(surface, path) => {
                let mut file = fs::File::create(path)?;
                surface.write_to_png(&mut file).map_err(RenderError::Png)
            }
            Surface::Svg(surface) => {
                surface.finish();
                Ok(())
            }
        }
    }
}


//------------ RenderError ---------------------------------------------------

#[derive(Debug)]
pub enum RenderError {
    /// The map has no area to render yet.
    NoExtent,

    /// The file name doesn’t indicate a supported format.
    UnknownFormat(PathBuf),

    /// The image is too large for Cairo.
    Size { width: u32, height: u32 },

    /// Cairo failed.
    Cairo(cairo::Error),

    /// Writing the PNG image failed.
    Png(cairo::IoError),

    /// Creating the output file failed.
    Io(io::Error),
}

impl From<cairo::Error> for RenderError {
    fn from(err: cairo::Error) -> Self {
        RenderError::Cairo(err)
    }
}

impl From<io::Error> for RenderError {
    fn from(err: io::Error) -> Self {
        RenderError::Io(err)
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RenderError::NoExtent => {
                f.write_str("map has no bounding box to render")
            }
            RenderError::UnknownFormat(ref path) => {
                write!(
                    f, "cannot determine image format of '{}'",
                    path.display()
                )
            }
            RenderError::Size { width, height } => {
                write!(f, "image size {}x{} is too large", width, height)
            }
            RenderError::Cairo(ref err) => fmt::Display::fmt(err, f),
            RenderError::Png(ref err) => fmt::Display::fmt(err, f),
            RenderError::Io(ref err) => fmt::Display::fmt(err, f),
        }
    }
}

impl error::Error for RenderError { }


//============ Tests =========================================================
