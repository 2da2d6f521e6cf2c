//! Image I/O

use crate::error::ResourceError;
use crate::fileutil::extension;
use crate::holo::*;
use crate::spectrum::*;
use exr::prelude as exrs;
use exr::prelude::*;
use ::image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use std::result::Result;

/// Stores RGB image data in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct RGBImage {
    /// The pixels.
    pub pixels: Vec<RGBSpectrum>,

    /// Image width.
    pub width: usize,

    /// Image height.
    pub height: usize,
}

impl RGBImage {
    /// Creates a new `RGBImage` from pixel data.
    ///
    /// * `pixels` - RGB pixel data.
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn new(pixels: Vec<RGBSpectrum>, width: usize, height: usize) -> Self {
        assert_eq!(width * height, pixels.len());
        Self {
            pixels,
            width,
            height,
        }
    }

    /// Creates a black image.
    ///
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn black(width: usize, height: usize) -> Self {
        Self::new(vec![RGBSpectrum::default(); width * height], width, height)
    }

    /// Returns the pixel at the given coordinates.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn pixel(&self, x: usize, y: usize) -> RGBSpectrum {
        self.pixels[y * self.width + x]
    }
}

/// Read an image.
///
/// * `path` - Input file path.
pub fn read_image(path: &str) -> Result<RGBImage, ResourceError> {
    match extension(path).as_deref() {
        Some("exr") => read_exr(path),
        Some(_) => read_8_bit(path),
        None => Err(ResourceError::decode(
            path,
            "can't determine file type from suffix of filename",
        )),
    }
}

/// Read a single layer OpenEXR file.
///
/// * `path` - Input file path.
fn read_exr(path: &str) -> Result<RGBImage, ResourceError> {
    let reader = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| {
                let width = resolution.width();
                let height = resolution.height();
                RGBImage::black(width, height)
            },
            |img, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let offset = position.y() * img.width + position.x();
                img.pixels[offset] = RGBSpectrum::from_rgb(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes();

    match reader.from_file(path) {
        Ok(image) => {
            let pixels = image.layer_data.channel_data.pixels;
            info!(
                "Read EXR image {path} ({} x {})",
                pixels.width, pixels.height,
            );
            Ok(pixels)
        }
        Err(exr::error::Error::Io(err)) => Err(ResourceError::from_io(path, &err)),
        Err(err) => Err(ResourceError::decode(path, err)),
    }
}

/// Read an 8-bit image format.
///
/// * `path` - Input file path.
fn read_8_bit(path: &str) -> Result<RGBImage, ResourceError> {
    let img: RgbImage = match ::image::open(path) {
        Ok(i) => i.into_rgb8(),
        Err(::image::ImageError::IoError(err)) => return Err(ResourceError::from_io(path, &err)),
        Err(err) => return Err(ResourceError::decode(path, err)),
    };

    let width = img.width() as usize;
    let height = img.height() as usize;

    // 8-bit files are gamma encoded; return linear values.
    let pixels: Vec<RGBSpectrum> = img
        .pixels()
        .map(|rgb_u8| {
            RGBSpectrum::from_rgb(
                inv_gamma_correct(rgb_u8[0] as Float / 255.0),
                inv_gamma_correct(rgb_u8[1] as Float / 255.0),
                inv_gamma_correct(rgb_u8[2] as Float / 255.0),
            )
        })
        .collect();

    info!("Read 8-bit image {path} ({width} x {height})");

    Ok(RGBImage::new(pixels, width, height))
}

/// Write an image to given path. The format is chosen from the extension.
///
/// * `path`  - Output file path.
/// * `image` - The image.
pub fn write_image(path: &str, image: &RGBImage) -> Result<(), ResourceError> {
    match extension(path).as_deref() {
        Some("exr") => write_exr(path, image),
        Some("png") => write_8_bit(path, image, ImageFormat::Png),
        Some("jpg") | Some("jpeg") => write_8_bit(path, image, ImageFormat::Jpeg),
        Some("tga") => write_8_bit(path, image, ImageFormat::Tga),
        Some(ext) => Err(ResourceError::decode(
            path,
            format!("extension {ext} is not supported"),
        )),
        None => Err(ResourceError::decode(
            path,
            "can't determine file type from suffix of filename",
        )),
    }
}

/// Writes the image in OpenEXR format.
///
/// * `path`  - Output file path.
/// * `image` - The image.
fn write_exr(path: &str, image: &RGBImage) -> Result<(), ResourceError> {
    info!(
        "Writing image {} with resolution {}x{}",
        path, image.width, image.height
    );

    let width = image.width;
    let size = Vec2(image.width, image.height);

    let layer1 = Layer::new(
        size,
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let p = image.pixels[pos.1 * width + pos.0];
            (p[0], p[1], p[2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    exrs::Image::empty(attributes)
        .with_layer(layer1)
        .write()
        .to_file(path)
        .map_err(|err| ResourceError::decode(path, format!("error saving output image: {err}")))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `image`        - The image.
/// * `image_format` - Image format.
fn write_8_bit(
    path: &str,
    image: &RGBImage,
    image_format: ImageFormat,
) -> Result<(), ResourceError> {
    let res_x = image.width as u32;
    let res_y = image.height as u32;
    info!("Writing image {path} with resolution {res_x}x{res_y}");

    let mut imgbuf = ImageBuffer::new(res_x, res_y);
    for (x, y, pixel) in imgbuf.enumerate_pixels_mut() {
        // 8-bit format; apply gamma and clamp.
        let p = image.pixel(x as usize, y as usize);
        *pixel = Rgb(apply_gamma(&p.to_rgb()));
    }

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| ResourceError::decode(path, format!("error saving output image: {err}")))
}

/// Apply gamma correction to a RGB floating point pixel and return the clamped 8-bit values.
///
/// * `rgb` - RGB floating point pixel value.
#[inline]
fn apply_gamma(rgb: &[Float; 3]) -> [u8; 3] {
    [clamp_byte(rgb[0]), clamp_byte(rgb[1]), clamp_byte(rgb[2])]
}

/// Clamp floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
