//! Dust texture of the holographic film.
//!
//! The film's dust pattern is an 8-bit grayscale image. Texels at or below a
//! threshold level are cleared and the remaining range is stretched to
//! [0, 1]. The result weights the blend between the clear coating and the
//! diffuse dust and doubles as the bump map.

use holo_core::error::ResourceError;
use holo_core::holo::*;
use holo_core::texture::{DustTextureSource, GrayscaleBitmap};
use image::{GrayImage, ImageBuffer, Luma};

/// Loads dust textures from 8-bit image files.
#[derive(Copy, Clone, Debug, Default)]
pub struct DustTexture;

impl DustTexture {
    /// Write a weight map as an 8-bit grayscale image. The format is chosen
    /// from the extension.
    ///
    /// * `path`   - Output file path.
    /// * `bitmap` - The weight map.
    pub fn write(path: &str, bitmap: &GrayscaleBitmap) -> Result<(), ResourceError> {
        let mut imgbuf: GrayImage = ImageBuffer::new(bitmap.width() as u32, bitmap.height() as u32);
        for (x, y, pixel) in imgbuf.enumerate_pixels_mut() {
            let v = bitmap.value(x as usize, y as usize);
            *pixel = Luma([clamp(255.0 * v + 0.5, 0.0, 255.0) as u8]);
        }
        imgbuf
            .save(path)
            .map_err(|err| ResourceError::decode(path, format!("error saving weight map: {err}")))?;
        debug!("Wrote dust weight map '{path}'");
        Ok(())
    }
}

impl DustTextureSource for DustTexture {
    fn load_and_threshold(
        &self,
        path: &str,
        threshold: u8,
    ) -> Result<GrayscaleBitmap, ResourceError> {
        let img = match image::open(path) {
            Ok(i) => i.into_luma8(),
            Err(image::ImageError::IoError(err)) => return Err(ResourceError::from_io(path, &err)),
            Err(err) => return Err(ResourceError::decode(path, err)),
        };

        let width = img.width() as usize;
        let height = img.height() as usize;
        let levels: Vec<u8> = img.into_raw();

        info!("Read dust texture {path} ({width} x {height}), threshold {threshold}");

        Ok(GrayscaleBitmap::new(
            threshold_and_normalize(&levels, threshold),
            width,
            height,
        ))
    }
}

/// Clear every level at or below `threshold` and stretch the remaining range
/// linearly to [0, 1]. A constant result maps to all zeros.
///
/// * `levels`    - 8-bit levels.
/// * `threshold` - Threshold level.
pub fn threshold_and_normalize(levels: &[u8], threshold: u8) -> Vec<Float> {
    let kept: Vec<Float> = levels
        .iter()
        .map(|&l| if l > threshold { l as Float } else { 0.0 })
        .collect();

    let lo = kept.iter().copied().fold(Float::INFINITY, min);
    let hi = kept.iter().copied().fold(Float::NEG_INFINITY, max);
    let range = hi - lo;
    if !(range > 0.0) {
        return vec![0.0; kept.len()];
    }
    kept.iter().map(|&v| (v - lo) / range).collect()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
