//! Angular radiance of the emitters.
//!
//! The holographic film is angularly selective: an emitter behind it appears
//! brightest head-on and fades with the viewer's azimuth. The falloff is a
//! squared sinc whose first zero lies at half the viewing angle, and beyond
//! half the cutoff angle the emitter is dark.

use super::EmitterConfig;
use holo_core::holo::*;

/// Maps a viewer azimuth to emitter radiance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AngularRadiance {
    /// Radiance at azimuth 0.
    pub peak: Float,

    /// Full width (degrees) of the falloff.
    pub viewing_angle: Float,

    /// Full angle (degrees) of the hard cutoff.
    pub cutoff_angle: Float,
}

impl AngularRadiance {
    /// Create a new radiance model.
    ///
    /// * `peak`          - Radiance at azimuth 0.
    /// * `viewing_angle` - Full width (degrees) of the falloff.
    /// * `cutoff_angle`  - Full angle (degrees) of the hard cutoff.
    pub fn new(peak: Float, viewing_angle: Float, cutoff_angle: Float) -> Self {
        Self {
            peak,
            viewing_angle,
            cutoff_angle,
        }
    }

    /// Returns the radiance seen from signed azimuth `theta` (degrees) off
    /// boresight.
    ///
    /// * `theta` - Azimuth in degrees.
    pub fn radiance(&self, theta: Float) -> Float {
        if abs(theta) > 0.5 * self.cutoff_angle {
            return 0.0;
        }
        let s = sinc(theta / (0.5 * self.viewing_angle));
        self.peak * s * s
    }
}

impl From<&EmitterConfig> for AngularRadiance {
    fn from(config: &EmitterConfig) -> Self {
        Self::new(
            config.max_radiance,
            config.viewing_angle,
            config.cutoff_angle,
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn model() -> AngularRadiance {
        AngularRadiance::from(&EmitterConfig::default())
    }

    #[test]
    fn peak_is_exact_at_boresight() {
        assert_eq!(model().radiance(0.0), 200.0);
        assert_eq!(AngularRadiance::new(3.25, 30.0, 60.0).radiance(0.0), 3.25);
    }

    #[test]
    fn beyond_cutoff_is_dark() {
        let m = model();
        assert_eq!(m.radiance(45.001), 0.0);
        assert_eq!(m.radiance(-60.0), 0.0);
        assert_eq!(m.radiance(90.0), 0.0);
    }

    #[test]
    fn cutoff_boundary_is_inclusive() {
        let m = AngularRadiance::new(1.0, 180.0, 90.0);
        assert!(m.radiance(45.0) > 0.0);
        assert_eq!(m.radiance(45.01), 0.0);
    }

    #[test]
    fn first_zero_at_half_viewing_angle() {
        let m = AngularRadiance::new(10.0, 40.0, 360.0);
        assert!(approx_eq!(Float, m.radiance(20.0), 0.0, epsilon = 1e-5));
    }

    #[test]
    fn half_way_to_first_zero() {
        // sinc(0.5)^2 = 4 / π^2
        let m = model();
        let expected = 200.0 * 4.0 / (PI * PI);
        assert!(approx_eq!(Float, m.radiance(22.5), expected, epsilon = 1e-3));
    }

    proptest! {
        #[test]
        fn symmetric(theta in -180.0f32..180.0f32) {
            let m = model();
            prop_assert_eq!(m.radiance(theta), m.radiance(-theta));
        }

        #[test]
        fn bounded_by_peak(theta in -180.0f32..180.0f32, peak in 0.0f32..1000.0f32) {
            let m = AngularRadiance::new(peak, 90.0, 120.0);
            let r = m.radiance(theta);
            prop_assert!(r >= 0.0 && r <= peak);
        }

        #[test]
        fn zero_outside_cutoff(theta in 45.0001f32..360.0f32) {
            let m = model();
            prop_assert_eq!(m.radiance(theta), 0.0);
            prop_assert_eq!(m.radiance(-theta), 0.0);
        }
    }
}
