//! Object size normalization.

use super::ObjectScaleConfig;
use holo_core::error::{Error, Result};
use holo_core::geometry::Vector3f;
use holo_core::holo::*;

/// Minimum extents at or below this value cannot be rescaled.
pub const MIN_RESCALABLE_EXTENT: Float = 1e-6;

/// Returns the uniform scale that moves an object into the configured size
/// band. The band test uses the largest extent while the scale divides the
/// target by the smallest extent, so flat objects grow more than their
/// largest extent suggests.
///
/// * `extents`          - Bounding box size along each axis.
/// * `min_threshold`    - Objects with a smaller maximum extent are scaled up.
/// * `max_threshold`    - Objects with a larger maximum extent are scaled down.
/// * `downscale_target` - Target minimum extent when scaling down.
/// * `upscale_target`   - Target minimum extent when scaling up.
pub fn normalize(
    extents: &Vector3f,
    min_threshold: Float,
    max_threshold: Float,
    downscale_target: Float,
    upscale_target: Float,
) -> Result<Float> {
    let max_extent = extents.max_component();
    let min_extent = extents.min_component();

    let target = if max_extent > max_threshold {
        downscale_target
    } else if max_extent < min_threshold {
        upscale_target
    } else {
        return Ok(1.0);
    };

    if !min_extent.is_finite() || min_extent <= MIN_RESCALABLE_EXTENT {
        return Err(Error::DegenerateGeometry { min_extent });
    }
    Ok(target / min_extent)
}

impl ObjectScaleConfig {
    /// Returns the corrective scale for an object with the given extents.
    ///
    /// * `extents` - Bounding box size along each axis.
    pub fn corrective_scale(&self, extents: &Vector3f) -> Result<Float> {
        normalize(
            extents,
            self.min_threshold,
            self.max_threshold,
            self.downscale_target,
            self.upscale_target,
        )
    }
}
