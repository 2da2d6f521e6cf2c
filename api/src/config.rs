//! Scene configuration.
//!
//! Every value is defaulted and can be overridden before the scene is built.

use holo_core::error::ConfigurationError;
use holo_core::geometry::*;
use holo_core::holo::*;
use std::fmt;
use std::str::FromStr;

/// Emitter settings.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterConfig {
    /// Radiance of an emitter seen head-on.
    pub max_radiance: Float,

    /// Full angular width (degrees) of the radiance falloff.
    pub viewing_angle: Float,

    /// Full angle (degrees) beyond which emitters are dark.
    pub cutoff_angle: Float,

    /// Light the glass edges with two fixed emitters.
    pub edge_lights: bool,

    /// Positions of the left and right edge lights.
    pub edge_light_positions: [Point3f; 2],
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            max_radiance: 200.0,
            viewing_angle: 90.0,
            cutoff_angle: 90.0,
            edge_lights: true,
            edge_light_positions: [point3(0.5, -3.0, 0.0), point3(0.5, 3.0, 0.0)],
        }
    }
}

/// Camera settings shared by all sensors on the arc.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    /// Number of sensors on the arc.
    pub count: usize,

    /// Total angle (degrees) spanned by the arc.
    pub total_angle: Float,

    /// Camera position before the arc rotation.
    pub origin: Point3f,

    /// Point all sensors look at.
    pub target: Point3f,

    /// Up direction; also the arc's rotation axis.
    pub up: Vector3f,

    /// Horizontal field of view in degrees.
    pub fov: Float,

    /// Thin lens aperture radius.
    pub aperture_radius: Float,

    /// Distance to the plane in focus.
    pub focus_distance: Float,

    /// Film width in pixels.
    pub x_resolution: u32,

    /// Film height in pixels.
    pub y_resolution: u32,

    /// Samples per pixel.
    pub spp: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            count: 1,
            total_angle: 120.0,
            origin: point3(15.0, 0.0, 0.0),
            target: point3(0.0, 0.0, 0.0),
            up: vector3(0.0, 0.0, 1.0),
            fov: 40.0,
            aperture_radius: 0.01,
            focus_distance: 15.0,
            x_resolution: 1024,
            y_resolution: 1024,
            spp: 128,
        }
    }
}

/// Size band objects are normalized into.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectScaleConfig {
    /// Objects with a larger maximum extent are scaled down.
    pub max_threshold: Float,

    /// Objects with a smaller maximum extent are scaled up.
    pub min_threshold: Float,

    /// Target minimum extent of objects that are scaled down.
    pub downscale_target: Float,

    /// Target minimum extent of objects that are scaled up.
    pub upscale_target: Float,
}

impl Default for ObjectScaleConfig {
    fn default() -> Self {
        Self {
            max_threshold: 12.0,
            min_threshold: 0.5,
            downscale_target: 2.0,
            upscale_target: 2.5,
        }
    }
}

/// Coating model of the holographic film.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CoatingKind {
    /// Smooth dielectric.
    Dielectric,

    /// Rough dielectric using the configured roughness.
    RoughDielectric,
}

impl FromStr for CoatingKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dielectric" => Ok(Self::Dielectric),
            "roughdielectric" => Ok(Self::RoughDielectric),
            _ => Err(invalid("glass.coating", format!("unknown coating '{s}'"))),
        }
    }
}

impl fmt::Display for CoatingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dielectric => write!(f, "dielectric"),
            Self::RoughDielectric => write!(f, "roughdielectric"),
        }
    }
}

/// Glass slab, film and medium settings.
#[derive(Clone, Debug, PartialEq)]
pub struct GlassConfig {
    /// Half size of the slab along each axis before it is turned upright.
    pub size: Vector3f,

    /// Location of the slab.
    pub location: Vector3f,

    /// Coating model.
    pub coating: CoatingKind,

    /// Interior index of refraction (BK7).
    pub ior: Float,

    /// Roughness of a rough coating.
    pub roughness: Float,

    /// Specular reflectance of the coating.
    pub specular_reflectance: Float,

    /// Path to the 8-bit dust texture.
    pub dust_texture: String,

    /// Dust texels at or below this level are cleared.
    pub dust_threshold: u8,

    /// Extinction coefficient of the interior medium.
    pub sigma_t: Float,

    /// Single scattering albedo of the interior medium.
    pub albedo: Float,
}

impl Default for GlassConfig {
    fn default() -> Self {
        Self {
            size: vector3(4.0, 6.0, 0.1),
            location: vector3(0.0, 0.0, 0.0),
            coating: CoatingKind::Dielectric,
            ior: 1.5046,
            roughness: 0.01,
            specular_reflectance: 0.6,
            dust_texture: String::from("dust.jpg"),
            dust_threshold: 150,
            sigma_t: 0.1,
            albedo: 0.9,
        }
    }
}

/// Light transport settings.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorConfig {
    /// Maximum path depth; -1 is unbounded.
    pub max_depth: Int,

    /// Do not show emitters directly to the camera.
    pub hide_emitters: bool,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_depth: -1,
            hide_emitters: true,
        }
    }
}

/// The complete scene configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HologramConfig {
    /// Emitter settings.
    pub emitter: EmitterConfig,

    /// Camera settings.
    pub camera: CameraConfig,

    /// Object size band.
    pub object_scale: ObjectScaleConfig,

    /// Glass settings.
    pub glass: GlassConfig,

    /// Light transport settings.
    pub integrator: IntegratorConfig,
}

impl HologramConfig {
    /// Check that all values are usable. The sensor count is checked when the
    /// arc is built.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let e = &self.emitter;
        require("emitter.max_radiance", e.max_radiance, |v| v >= 0.0)?;
        require("emitter.viewing_angle", e.viewing_angle, |v| v > 0.0)?;
        require("emitter.cutoff_angle", e.cutoff_angle, |v| v >= 0.0)?;

        let c = &self.camera;
        require("camera.total_angle", c.total_angle, |v| v >= 0.0)?;
        require("camera.fov", c.fov, |v| v > 0.0 && v < 180.0)?;
        require("camera.aperture_radius", c.aperture_radius, |v| v >= 0.0)?;
        require("camera.focus_distance", c.focus_distance, |v| v > 0.0)?;
        if c.x_resolution == 0 || c.y_resolution == 0 {
            return Err(invalid("camera.resolution", "must be positive"));
        }
        if c.spp == 0 {
            return Err(invalid("camera.spp", "must be positive"));
        }
        let view = c.target - c.origin;
        if c.up.length_squared() == 0.0 || view.length_squared() == 0.0 {
            return Err(invalid("camera.up", "camera frame is degenerate"));
        }
        // Rotating the origin about `up` keeps this angle, so checking the
        // base frame covers every sensor on the arc.
        if c.up.normalize().cross(&view.normalize()).length_squared() < MIN_FRAME_SINE_SQ {
            return Err(invalid("camera.up", "parallel to the viewing direction"));
        }

        let o = &self.object_scale;
        require("object_scale.min_threshold", o.min_threshold, |v| v >= 0.0)?;
        require("object_scale.max_threshold", o.max_threshold, |v| {
            v >= o.min_threshold
        })?;
        require("object_scale.downscale_target", o.downscale_target, |v| v > 0.0)?;
        require("object_scale.upscale_target", o.upscale_target, |v| v > 0.0)?;

        let g = &self.glass;
        if !(g.size.x > 0.0 && g.size.y > 0.0 && g.size.z > 0.0) {
            return Err(invalid("glass.size", "must be positive"));
        }
        require("glass.ior", g.ior, |v| v > 0.0)?;
        require("glass.roughness", g.roughness, |v| v > 0.0)?;
        require("glass.specular_reflectance", g.specular_reflectance, |v| {
            (0.0..=1.0).contains(&v)
        })?;
        require("glass.sigma_t", g.sigma_t, |v| v >= 0.0)?;
        require("glass.albedo", g.albedo, |v| (0.0..=1.0).contains(&v))?;
        if g.dust_texture.is_empty() {
            return Err(invalid("glass.dust_texture", "no path given"));
        }

        if self.integrator.max_depth < -1 {
            return Err(invalid("integrator.max_depth", "must be -1 or more"));
        }

        Ok(())
    }
}

/// Squared sine of the smallest angle allowed between the camera's up vector
/// and its viewing direction.
const MIN_FRAME_SINE_SQ: Float = 1e-6;

/// Returns an `InvalidValue` error.
///
/// * `field`  - Name of the field.
/// * `reason` - Why the value was rejected.
pub fn invalid<S: Into<String>>(field: &str, reason: S) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Check that a value is finite and satisfies `ok`.
fn require<F>(field: &str, value: Float, ok: F) -> Result<(), ConfigurationError>
where
    F: Fn(Float) -> bool,
{
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} is out of range")))
    }
}
