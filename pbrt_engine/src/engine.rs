//! Render engine running the pbrt executable.

use super::{MeshSource, SceneWriter};
use api::*;
use core::error::{EngineError, ResourceError, Result};
use core::fileutil::absolute_path;
use core::image_io::{read_image, RGBImage};
use core::mesh::MeshFormat;
use shapes::TriangleMesh;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use textures::DustTexture;

/// A scene loaded into the pbrt engine.
#[derive(Clone, Debug)]
pub struct PbrtScene {
    /// The scene description; parameters are written here.
    description: SceneDescription,

    /// Weight map image of each holographic film material.
    weight_maps: HashMap<String, String>,

    /// Geometry of each object.
    meshes: HashMap<String, MeshSource>,
}

impl PbrtScene {
    /// Returns the scene description.
    pub fn description(&self) -> &SceneDescription {
        &self.description
    }
}

/// Renders scenes with an external pbrt-v3 executable.
#[derive(Clone, Debug)]
pub struct PbrtEngine {
    /// Path to the pbrt executable.
    exe: String,

    /// Directory receiving scene files, weight maps and renders.
    work_dir: PathBuf,

    /// Number of threads pbrt may use.
    threads: Option<usize>,
}

impl PbrtEngine {
    /// Create a new engine. The working directory is created if needed and
    /// stored as an absolute path, since pbrt resolves relative file names
    /// against the directory of the scene file.
    ///
    /// * `exe`      - Path to the pbrt executable.
    /// * `work_dir` - Directory receiving intermediate files.
    /// * `threads`  - Number of threads pbrt may use; `None` lets pbrt decide.
    pub fn new(exe: &str, work_dir: &str, threads: Option<usize>) -> Result<Self> {
        fs::create_dir_all(work_dir).map_err(|e| ResourceError::from_io(work_dir, &e))?;
        let work_dir = absolute_path(work_dir)
            .map_err(|_| ResourceError::FileNotFound(work_dir.to_string()))?;
        Ok(Self {
            exe: exe.to_string(),
            work_dir: PathBuf::from(work_dir),
            threads,
        })
    }

    /// Returns a path inside the working directory.
    ///
    /// * `file_name` - File name.
    fn work_path(&self, file_name: &str) -> String {
        self.work_dir.join(file_name).to_string_lossy().into_owned()
    }

    /// Check the parts of the description every render needs.
    ///
    /// * `description` - The scene description.
    fn validate(description: &SceneDescription) -> Result<()> {
        if description.integrator().is_none() {
            return Err(EngineError::InvalidSceneDescription("no integrator".to_string()).into());
        }
        if description.sensors().next().is_none() {
            return Err(EngineError::InvalidSceneDescription("no sensors".to_string()).into());
        }
        description.check_references()?;
        Ok(())
    }
}

impl RenderEngine for PbrtEngine {
    type Scene = PbrtScene;

    fn load(&mut self, description: &SceneDescription) -> Result<Self::Scene> {
        Self::validate(description)?;

        let mut weight_maps = HashMap::new();
        let mut meshes = HashMap::new();
        for (name, e) in description.iter() {
            match e {
                Entity::Material(Material::HolographicFilm(film)) => {
                    let path = self.work_path(&format!("{name}.png"));
                    DustTexture::write(&path, &film.weight)?;
                    weight_maps.insert(name.to_string(), path);
                }
                Entity::Object(object) => {
                    let source = match object.format {
                        MeshFormat::Ply => {
                            let path = absolute_path(&object.mesh_path).map_err(|_| {
                                ResourceError::FileNotFound(object.mesh_path.clone())
                            })?;
                            MeshSource::PlyFile(path)
                        }
                        MeshFormat::Obj => MeshSource::Inline(TriangleMesh::load(&object.mesh_path)?),
                    };
                    meshes.insert(name.to_string(), source);
                }
                _ => {}
            }
        }

        info!(
            "Loaded scene with {} entities into '{}'",
            description.len(),
            self.work_dir.display()
        );

        Ok(PbrtScene {
            description: description.clone(),
            weight_maps,
            meshes,
        })
    }

    fn set_parameter(
        &mut self,
        scene: &mut Self::Scene,
        path: &str,
        value: ParamValue,
    ) -> Result<()> {
        debug!("Setting '{path}' to {value}");
        Ok(scene.description.set_parameter(path, value)?)
    }

    fn parameter(&self, scene: &Self::Scene, path: &str) -> Result<ParamValue> {
        Ok(scene.description.parameter(path)?)
    }

    fn render(&mut self, scene: &Self::Scene, sensor: &str, spp: u32) -> Result<RGBImage> {
        let scene_file = self.work_path(&format!("{sensor}.pbrt"));
        let image_file = self.work_path(&format!("{sensor}.exr"));

        let text = SceneWriter::new(&scene.description, &scene.weight_maps, &scene.meshes)
            .write(sensor, spp, &image_file)?;
        fs::write(&scene_file, text).map_err(|e| {
            EngineError::RenderFailure(format!("unable to write '{scene_file}'. {e}"))
        })?;

        let mut command = Command::new(&self.exe);
        command.arg("--quiet").arg("--outfile").arg(&image_file);
        if let Some(n) = self.threads {
            command.arg("--nthreads").arg(n.to_string());
        }
        command.arg(&scene_file);

        debug!("Running {:?}", command);
        let output = command.output().map_err(|e| {
            EngineError::RenderFailure(format!("unable to run '{}'. {e}", self.exe))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::RenderFailure(format!(
                "'{}' failed with status {:?}. {}",
                self.exe,
                output.status.code(),
                stderr.trim()
            ))
            .into());
        }

        read_image(&image_file).map_err(|e| EngineError::RenderFailure(e.to_string()).into())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::tests::assembled;
    use core::error::Error;
    use core::geometry::point3;

    fn work_dir(name: &str) -> String {
        std::env::temp_dir()
            .join("holo-pbrt-engine-tests")
            .join(name)
            .to_string_lossy()
            .into_owned()
    }

    fn engine(name: &str, exe: &str) -> PbrtEngine {
        PbrtEngine::new(exe, &work_dir(name), Some(2)).unwrap()
    }

    #[test]
    fn load_writes_weight_map() {
        let a = assembled(&[]);
        let mut e = engine("weight-map", "pbrt");
        let scene = e.load(a.description()).unwrap();
        let path = scene.weight_maps.get(HOLOGRAPHIC_FILM).unwrap();
        assert!(std::path::Path::new(path).exists());
        assert!(scene.meshes.is_empty());
    }

    #[test]
    fn relative_work_dir_yields_absolute_scene_paths() {
        let rel = "holo-pbrt-engine-relative-work";
        let mut e = PbrtEngine::new("/no/such/pbrt", rel, None).unwrap();
        assert!(e.work_dir.is_absolute());

        let a = assembled(&[]);
        let scene = e.load(a.description()).unwrap();
        let map = scene.weight_maps.get(HOLOGRAPHIC_FILM).unwrap();
        assert!(std::path::Path::new(map).is_absolute());
        assert!(std::path::Path::new(map).exists());

        // The render fails without pbrt but the scene file is left behind.
        assert!(e.render(&scene, "sensor1", 1).is_err());
        let text = std::fs::read_to_string(e.work_dir.join("sensor1.pbrt")).unwrap();
        assert!(text.contains(&format!("\"string filename\" \"{map}\"")));

        std::fs::remove_dir_all(rel).unwrap();
    }

    #[test]
    fn description_without_integrator_is_rejected() {
        let mut d = SceneDescription::new();
        d.insert(
            "emitter1",
            Entity::Emitter(EmitterSpec {
                position: point3(0.0, 0.0, 0.0),
                intensity: 1.0,
                modulated: true,
            }),
        )
        .unwrap();
        let mut e = engine("no-integrator", "pbrt");
        assert!(matches!(
            e.load(&d),
            Err(Error::Engine(EngineError::InvalidSceneDescription(_)))
        ));
    }

    #[test]
    fn missing_ply_is_not_found() {
        let a = assembled(&[ObjectDescriptor::new("/no/such/bunny.ply")]);
        let mut e = engine("missing-ply", "pbrt");
        assert_eq!(
            e.load(a.description()).map(|_| ()),
            Err(Error::ExternalResource(ResourceError::FileNotFound(
                "/no/such/bunny.ply".to_string()
            )))
        );
    }

    #[test]
    fn parameters_go_through_the_description() {
        let a = assembled(&[]);
        let mut e = engine("parameters", "pbrt");
        let mut scene = e.load(a.description()).unwrap();
        e.set_parameter(&mut scene, "emitter1.intensity.value", ParamValue::Float(7.0))
            .unwrap();
        assert_eq!(
            e.parameter(&scene, "emitter1.intensity.value"),
            Ok(ParamValue::Float(7.0))
        );
        assert_eq!(
            e.set_parameter(&mut scene, "slab.size", ParamValue::Float(1.0)),
            Err(Error::Engine(EngineError::UnknownParameterPath(
                "slab.size".to_string()
            )))
        );
    }

    #[test]
    fn missing_executable_is_a_render_failure() {
        let a = assembled(&[]);
        let mut e = engine("no-exe", "/no/such/pbrt");
        let scene = e.load(a.description()).unwrap();
        assert!(matches!(
            e.render(&scene, "sensor1", 1),
            Err(Error::Engine(EngineError::RenderFailure(_)))
        ));
        // The scene file is still written for inspection.
        assert!(std::path::Path::new(&work_dir("no-exe")).join("sensor1.pbrt").exists());
    }

    #[test]
    fn unknown_sensor_is_a_render_failure() {
        let a = assembled(&[]);
        let mut e = engine("unknown-sensor", "pbrt");
        let scene = e.load(a.description()).unwrap();
        assert!(matches!(
            e.render(&scene, "sensor9", 1),
            Err(Error::Engine(EngineError::RenderFailure(_)))
        ));
    }
}
