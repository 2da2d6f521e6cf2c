//! pbrt-v3 scene export.

use api::*;
use core::error::EngineError;
use core::geometry::*;
use core::holo::*;
use core::spectrum::Spectrum;
use itertools::Itertools;
use shapes::TriangleMesh;
use std::collections::HashMap;
use std::fmt::{self, Write};

/// pbrt has no unbounded path depth; this depth stands in for it.
pub const UNBOUNDED_DEPTH: Int = 64;

/// Unit cube `[-1, 1]^3` vertex positions.
#[rustfmt::skip]
const CUBE_POSITIONS: [Float; 24] = [
    -1.0, -1.0, -1.0,
     1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,
    -1.0,  1.0, -1.0,
    -1.0, -1.0,  1.0,
     1.0, -1.0,  1.0,
     1.0,  1.0,  1.0,
    -1.0,  1.0,  1.0,
];

/// Unit cube triangles.
#[rustfmt::skip]
const CUBE_INDICES: [usize; 36] = [
    0, 2, 1,  0, 3, 2,
    4, 5, 6,  4, 6, 7,
    0, 1, 5,  0, 5, 4,
    2, 3, 7,  2, 7, 6,
    1, 2, 6,  1, 6, 5,
    0, 4, 7,  0, 7, 3,
];

/// Where the renderer finds an object's geometry.
#[derive(Clone, Debug, PartialEq)]
pub enum MeshSource {
    /// A PLY file read by the renderer.
    PlyFile(String),

    /// Triangles written into the scene file.
    Inline(TriangleMesh),
}

/// Returns the path depth pbrt uses for `max_depth`.
///
/// * `max_depth` - Maximum path depth; -1 is unbounded.
pub fn pbrt_max_depth(max_depth: Int) -> Int {
    if max_depth < 0 {
        UNBOUNDED_DEPTH
    } else {
        max_depth
    }
}

/// Returns pbrt's field of view, which spans the shorter image axis, for a
/// horizontal field of view.
///
/// * `fov_x`        - Horizontal field of view in degrees.
/// * `x_resolution` - Image width.
/// * `y_resolution` - Image height.
pub fn pbrt_fov(fov_x: Float, x_resolution: u32, y_resolution: u32) -> Float {
    if x_resolution <= y_resolution {
        fov_x
    } else {
        let aspect = y_resolution as Float / x_resolution as Float;
        2.0 * ((0.5 * fov_x).to_radians().tan() * aspect).atan().to_degrees()
    }
}

/// Writes the scene seen by one sensor in pbrt-v3 format.
pub struct SceneWriter<'a> {
    /// The scene description.
    description: &'a SceneDescription,

    /// Weight map image of each holographic film material.
    weight_maps: &'a HashMap<String, String>,

    /// Geometry of each object.
    meshes: &'a HashMap<String, MeshSource>,
}

impl<'a> SceneWriter<'a> {
    /// Create a new writer.
    ///
    /// * `description` - The scene description.
    /// * `weight_maps` - Weight map image of each holographic film material.
    /// * `meshes`      - Geometry of each object.
    pub fn new(
        description: &'a SceneDescription,
        weight_maps: &'a HashMap<String, String>,
        meshes: &'a HashMap<String, MeshSource>,
    ) -> Self {
        Self {
            description,
            weight_maps,
            meshes,
        }
    }

    /// Returns the scene text.
    ///
    /// * `sensor`  - Name of the sensor entity.
    /// * `spp`     - Samples per pixel.
    /// * `outfile` - Image file the renderer writes.
    pub fn write(&self, sensor: &str, spp: u32, outfile: &str) -> Result<String, EngineError> {
        let camera = self
            .description
            .sensor(sensor)
            .ok_or_else(|| EngineError::RenderFailure(format!("unknown sensor '{sensor}'")))?;
        let integrator = self.description.integrator().ok_or_else(|| {
            EngineError::InvalidSceneDescription("no integrator".to_string())
        })?;
        self.description.check_references()?;
        for (name, e) in self.description.iter() {
            match e {
                Entity::Material(Material::HolographicFilm(_))
                    if !self.weight_maps.contains_key(name) =>
                {
                    return Err(EngineError::InvalidSceneDescription(format!(
                        "no weight map for '{name}'"
                    )));
                }
                Entity::Object(_) if !self.meshes.contains_key(name) => {
                    return Err(EngineError::InvalidSceneDescription(format!(
                        "no geometry for '{name}'"
                    )));
                }
                _ => {}
            }
        }

        let mut out = String::new();
        self.write_all(&mut out, camera, integrator, spp, outfile)
            .map_err(|e| EngineError::RenderFailure(format!("unable to write scene. {e}")))?;
        Ok(out)
    }

    fn write_all(
        &self,
        out: &mut String,
        camera: &SensorSpec,
        integrator: &IntegratorSpec,
        spp: u32,
        outfile: &str,
    ) -> fmt::Result {
        self.write_camera(out, camera, spp, outfile)?;
        writeln!(
            out,
            "Integrator \"volpath\" \"integer maxdepth\" [ {} ]",
            pbrt_max_depth(integrator.max_depth)
        )?;
        writeln!(out)?;
        writeln!(out, "WorldBegin")?;

        for (name, e) in self.description.iter() {
            match e {
                Entity::Emitter(emitter) => write_emitter(out, name, emitter)?,
                Entity::Medium(medium) => write_medium(out, name, medium)?,
                Entity::Material(material) => self.write_named_material(out, name, material)?,
                _ => {}
            }
        }
        for (name, e) in self.description.iter() {
            match e {
                Entity::Object(object) => self.write_object(out, name, object)?,
                Entity::Shape(shape) => write_shape(out, name, shape)?,
                _ => {}
            }
        }

        writeln!(out, "WorldEnd")
    }

    /// pbrt is left-handed; the x flip keeps the image orientation of the
    /// right-handed scene.
    fn write_camera(
        &self,
        out: &mut String,
        camera: &SensorSpec,
        spp: u32,
        outfile: &str,
    ) -> fmt::Result {
        let world_to_camera = camera.to_world.inverse();
        writeln!(out, "Scale -1 1 1")?;
        writeln!(out, "ConcatTransform [ {} ]", matrix(&world_to_camera))?;
        writeln!(
            out,
            "Camera \"perspective\" \"float fov\" [ {} ] \"float lensradius\" [ {} ] \"float focaldistance\" [ {} ]",
            pbrt_fov(camera.fov, camera.x_resolution, camera.y_resolution),
            camera.aperture_radius,
            camera.focus_distance
        )?;
        writeln!(
            out,
            "Sampler \"halton\" \"integer pixelsamples\" [ {spp} ]"
        )?;
        writeln!(
            out,
            "Film \"image\" \"integer xresolution\" [ {} ] \"integer yresolution\" [ {} ] \"string filename\" \"{}\"",
            camera.x_resolution, camera.y_resolution, outfile
        )
    }

    /// The holographic film becomes a mix of the coating and a bumped matte
    /// dust layer. The weight map drives both the mix amount and the bumps.
    fn write_named_material(&self, out: &mut String, name: &str, material: &Material) -> fmt::Result {
        match material {
            Material::HolographicFilm(film) => {
                let map = self.weight_maps.get(name).ok_or(fmt::Error)?;
                writeln!(
                    out,
                    "Texture \"{name}-weight\" \"spectrum\" \"imagemap\" \"string filename\" \"{map}\" \"bool gamma\" \"false\""
                )?;
                writeln!(
                    out,
                    "Texture \"{name}-bump\" \"float\" \"imagemap\" \"string filename\" \"{map}\" \"bool gamma\" \"false\""
                )?;
                write!(out, "MakeNamedMaterial \"{name}-coating\" \"string type\" \"glass\"")?;
                match film.coating {
                    Coating::Dielectric {
                        int_ior,
                        specular_reflectance,
                    } => writeln!(
                        out,
                        " \"rgb Kr\" [ {} ] \"float eta\" [ {} ]",
                        rgb(&Spectrum::new(specular_reflectance)),
                        int_ior
                    )?,
                    Coating::RoughDielectric {
                        int_ior,
                        specular_reflectance,
                        alpha,
                    } => writeln!(
                        out,
                        " \"rgb Kr\" [ {} ] \"float eta\" [ {} ] \"float uroughness\" [ {alpha} ] \"float vroughness\" [ {alpha} ] \"bool remaproughness\" \"false\"",
                        rgb(&Spectrum::new(specular_reflectance)),
                        int_ior
                    )?,
                }
                writeln!(
                    out,
                    "MakeNamedMaterial \"{name}-dust\" \"string type\" \"matte\" \"rgb Kd\" [ 0.5 0.5 0.5 ] \"texture bumpmap\" \"{name}-bump\""
                )?;
                writeln!(
                    out,
                    "MakeNamedMaterial \"{name}\" \"string type\" \"mix\" \"string namedmaterial1\" \"{name}-coating\" \"string namedmaterial2\" \"{name}-dust\" \"texture amount\" \"{name}-weight\""
                )
            }
            m => {
                let (kind, params) = material_params(m);
                writeln!(out, "MakeNamedMaterial \"{name}\" \"string type\" \"{kind}\" {params}")
            }
        }
    }

    fn write_object(&self, out: &mut String, name: &str, object: &ObjectSpec) -> fmt::Result {
        let (kind, params) = material_params(&object.material);
        writeln!(out, "# {name}")?;
        writeln!(out, "AttributeBegin")?;
        writeln!(out, "  ConcatTransform [ {} ]", matrix(&object.to_world))?;
        writeln!(out, "  Material \"{kind}\" {params}")?;
        match self.meshes.get(name).ok_or(fmt::Error)? {
            MeshSource::PlyFile(path) => {
                writeln!(out, "  Shape \"plymesh\" \"string filename\" \"{path}\"")?
            }
            MeshSource::Inline(mesh) => {
                let positions: Vec<Float> = mesh
                    .positions
                    .iter()
                    .flat_map(|p| [p.x, p.y, p.z])
                    .collect();
                write_triangles(out, &positions, &mesh.indices)?
            }
        }
        writeln!(out, "AttributeEnd")
    }
}

fn write_emitter(out: &mut String, name: &str, emitter: &EmitterSpec) -> fmt::Result {
    let p = emitter.position;
    writeln!(out, "# {name}")?;
    writeln!(
        out,
        "LightSource \"point\" \"point from\" [ {} {} {} ] \"rgb I\" [ {} ]",
        p.x,
        p.y,
        p.z,
        rgb(&Spectrum::new(emitter.intensity))
    )
}

fn write_medium(out: &mut String, name: &str, medium: &MediumSpec) -> fmt::Result {
    writeln!(
        out,
        "MakeNamedMedium \"{name}\" \"string type\" \"homogeneous\" \"rgb sigma_a\" [ {} ] \"rgb sigma_s\" [ {} ]",
        rgb(&medium.sigma_a()),
        rgb(&medium.sigma_s())
    )
}

fn write_shape(out: &mut String, name: &str, shape: &ShapeSpec) -> fmt::Result {
    writeln!(out, "# {name}")?;
    writeln!(out, "AttributeBegin")?;
    writeln!(out, "  ConcatTransform [ {} ]", matrix(&shape.to_world))?;
    match &shape.bsdf {
        BsdfRef::Named(m) => writeln!(out, "  NamedMaterial \"{m}\"")?,
        BsdfRef::Inline(m) => {
            let (kind, params) = material_params(m);
            writeln!(out, "  Material \"{kind}\" {params}")?
        }
    }
    if let Some(m) = &shape.interior {
        writeln!(out, "  MediumInterface \"{m}\" \"\"")?;
    }
    write_triangles(out, &CUBE_POSITIONS, &CUBE_INDICES)?;
    writeln!(out, "AttributeEnd")
}

fn write_triangles(out: &mut String, positions: &[Float], indices: &[usize]) -> fmt::Result {
    writeln!(
        out,
        "  Shape \"trianglemesh\" \"integer indices\" [ {} ] \"point P\" [ {} ]",
        indices.iter().join(" "),
        positions.iter().join(" ")
    )
}

/// Returns the pbrt material type and parameters of an object material.
///
/// * `material` - The material.
fn material_params(material: &Material) -> (&'static str, String) {
    match material {
        Material::Diffuse { reflectance } => {
            ("matte", format!("\"rgb Kd\" [ {} ]", rgb(reflectance)))
        }
        Material::RoughPlastic {
            diffuse_reflectance,
        } => (
            "plastic",
            format!(
                "\"rgb Kd\" [ {} ] \"rgb Ks\" [ 1 1 1 ] \"float roughness\" [ 0.1 ] \"bool remaproughness\" \"false\"",
                rgb(diffuse_reflectance)
            ),
        ),
        Material::HolographicFilm(film) => (
            "glass",
            format!("\"float eta\" [ {} ]", film.coating.int_ior()),
        ),
    }
}

/// Returns the transformation matrix in column-major order.
fn matrix(t: &Transform) -> String {
    t.m.to_column_major().iter().join(" ")
}

fn rgb(s: &Spectrum) -> String {
    s.to_rgb().iter().join(" ")
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
