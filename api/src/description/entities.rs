//! Scene entities.

use super::Material;
use holo_core::geometry::*;
use holo_core::holo::*;
use holo_core::mesh::MeshFormat;
use holo_core::spectrum::*;

/// A point emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterSpec {
    /// World position.
    pub position: Point3f,

    /// Radiant intensity.
    pub intensity: Float,

    /// Intensity follows the viewer's azimuth. Edge lights are constant.
    pub modulated: bool,
}

/// A thin lens perspective sensor.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorSpec {
    /// Signed azimuth (degrees) on the arc.
    pub azimuth: Float,

    /// Camera-to-world transformation.
    pub to_world: Transform,

    /// Horizontal field of view in degrees.
    pub fov: Float,

    /// Aperture radius.
    pub aperture_radius: Float,

    /// Focus distance.
    pub focus_distance: Float,

    /// Film width.
    pub x_resolution: u32,

    /// Film height.
    pub y_resolution: u32,

    /// Default samples per pixel.
    pub spp: u32,
}

/// A mesh object placed in front of the display.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSpec {
    /// Path to the mesh file.
    pub mesh_path: String,

    /// Mesh file format.
    pub format: MeshFormat,

    /// Surface material.
    pub material: Material,

    /// Scale requested by the caller.
    pub requested_scale: Vector3f,

    /// Rotation about X, Y and Z in degrees, applied in that order.
    pub rotation: Vector3f,

    /// Location relative to the display.
    pub location: Vector3f,

    /// Object space bounding box size.
    pub extents: Vector3f,

    /// Uniform scale moving the object into the size band.
    pub corrective_scale: Float,

    /// Object-to-world transformation.
    pub to_world: Transform,
}

impl ObjectSpec {
    /// Returns the requested scale multiplied by the corrective scale.
    pub fn effective_scale(&self) -> Vector3f {
        self.requested_scale * self.corrective_scale
    }

    /// Returns the object-to-world transformation. The X location is
    /// mirrored, so positive values move the object away from the cameras
    /// to the far side of the glass.
    ///
    /// * `location`  - Location relative to the display.
    /// * `scale`     - Effective scale.
    /// * `rotation`  - Rotation about X, Y and Z in degrees.
    pub fn placement(location: &Vector3f, scale: &Vector3f, rotation: &Vector3f) -> Transform {
        Transform::translate(&vector3(-location.x, location.y, location.z))
            * Transform::scale(scale)
            * Transform::rotate_x(rotation.x)
            * Transform::rotate_y(rotation.y)
            * Transform::rotate_z(rotation.z)
    }
}

/// A homogeneous participating medium.
#[derive(Clone, Debug, PartialEq)]
pub struct MediumSpec {
    /// Extinction coefficient.
    pub sigma_t: Spectrum,

    /// Single scattering albedo.
    pub albedo: Spectrum,
}

impl MediumSpec {
    /// Returns the scattering coefficient.
    pub fn sigma_s(&self) -> Spectrum {
        self.albedo * self.sigma_t
    }

    /// Returns the absorption coefficient.
    pub fn sigma_a(&self) -> Spectrum {
        self.sigma_t - self.sigma_s()
    }
}

/// Shapes of the glass assembly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// The glass slab carrying the film.
    Slab,

    /// An opaque frame next to the slab.
    Frame,
}

/// Reference to the surface material of a shape.
#[derive(Clone, Debug, PartialEq)]
pub enum BsdfRef {
    /// A material entity.
    Named(String),

    /// A material owned by the shape.
    Inline(Material),
}

/// A unit cube `[-1, 1]^3` placed in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeSpec {
    /// Role in the glass assembly.
    pub kind: ShapeKind,

    /// Object-to-world transformation.
    pub to_world: Transform,

    /// Surface material.
    pub bsdf: BsdfRef,

    /// Medium entity filling the interior.
    pub interior: Option<String>,
}

/// Light transport settings.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegratorSpec {
    /// Maximum path depth; -1 is unbounded.
    pub max_depth: Int,

    /// Do not show emitters directly to the camera.
    pub hide_emitters: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn medium_coefficients() {
        let m = MediumSpec {
            sigma_t: Spectrum::new(0.1),
            albedo: Spectrum::new(0.9),
        };
        assert!(approx_eq!(Float, m.sigma_s()[0], 0.09, epsilon = 1e-7));
        assert!(approx_eq!(Float, m.sigma_a()[2], 0.01, epsilon = 1e-7));
    }

    #[test]
    fn placement_mirrors_x_location() {
        let t = ObjectSpec::placement(
            &vector3(8.0, 1.0, 2.0),
            &vector3(1.0, 1.0, 1.0),
            &vector3(0.0, 0.0, 0.0),
        );
        assert_eq!(
            t.transform_point(&point3(0.0, 0.0, 0.0)),
            point3(-8.0, 1.0, 2.0)
        );
    }

    #[test]
    fn placement_scales_before_translating() {
        let t = ObjectSpec::placement(
            &vector3(0.0, 0.0, 0.0),
            &vector3(2.0, 3.0, 4.0),
            &vector3(0.0, 0.0, 90.0),
        );
        // rotate_z(90) maps x to y, then y is scaled by 3.
        let p = t.transform_point(&point3(1.0, 0.0, 0.0));
        assert!(approx_eq!(Float, p.x, 0.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, p.y, 3.0, epsilon = 1e-5));
    }
}
