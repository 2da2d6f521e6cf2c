//! Dust texture collaborator interface.

use crate::error::ResourceError;
use crate::holo::*;

/// A single channel bitmap with values in [0, 1], stored row-major. The
/// pixel count always equals `width * height`.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayscaleBitmap {
    /// Bitmap width.
    width: usize,

    /// Bitmap height.
    height: usize,

    /// Pixel values.
    values: Vec<Float>,
}

impl GrayscaleBitmap {
    /// Creates a new bitmap.
    ///
    /// * `values` - Pixel values.
    /// * `width`  - Bitmap width.
    /// * `height` - Bitmap height.
    pub fn new(values: Vec<Float>, width: usize, height: usize) -> Self {
        assert_eq!(width * height, values.len());
        Self {
            width,
            height,
            values,
        }
    }

    /// Returns the bitmap width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the bitmap height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the value at the given coordinates.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn value(&self, x: usize, y: usize) -> Float {
        self.values[y * self.width + x]
    }
}

/// Loads the film's dust texture and turns it into a weight map.
pub trait DustTextureSource {
    /// Reads the 8-bit grayscale texture at `path`, zeroes every texel at or
    /// below `threshold` and normalizes the result to [0, 1].
    ///
    /// * `path`      - Path to the texture.
    /// * `threshold` - Threshold level in [0, 255].
    fn load_and_threshold(&self, path: &str, threshold: u8)
        -> Result<GrayscaleBitmap, ResourceError>;
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_row_major() {
        let b = GrayscaleBitmap::new(vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.5], 3, 2);
        assert_eq!((b.width(), b.height()), (3, 2));
        assert_eq!(b.value(2, 0), 0.5);
        assert_eq!(b.value(0, 1), 0.75);
    }

    #[test]
    #[should_panic]
    fn size_mismatch_is_rejected() {
        GrayscaleBitmap::new(vec![0.0; 3], 2, 2);
    }
}
