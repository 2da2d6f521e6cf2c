#[macro_use]
extern crate log;

use api::*;
use core::app::*;
use core::fileutil::*;
use core::geometry::*;
use core::holo::Float;
use core::image_io::write_image;
use core::spectrum::Spectrum;
use pbrt_engine::PbrtEngine;
use shapes::MeshLoader;
use std::path::Path;
use textures::DustTexture;

fn main() {
    // Initialize `env_logger`.
    env_logger::init();

    let (config, mut engine, meshes) = match setup() {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!("Rendering {} meshes from '{}'", meshes.len(), OPTIONS.mesh_dir);

    for path in meshes.iter() {
        // In case of error report it and continue.
        if let Err(e) = render(path, &config, &mut engine) {
            error!("{path}: {e}");
        }
    }
}

/// Returns the scene configuration, the render engine and the meshes to
/// render.
fn setup() -> Result<(HologramConfig, PbrtEngine, Vec<String>), String> {
    let config = config_from_options(&OPTIONS)?;
    config.validate().map_err(|e| e.to_string())?;

    std::fs::create_dir_all(&OPTIONS.out_dir)
        .map_err(|e| format!("Unable to create '{}'. {e}.", OPTIONS.out_dir))?;

    let work_dir = match &OPTIONS.scene_dir {
        Some(dir) => dir.clone(),
        None => std::env::temp_dir()
            .join("holo-dataset")
            .to_string_lossy()
            .into_owned(),
    };
    let engine = PbrtEngine::new(&OPTIONS.pbrt_exe, &work_dir, OPTIONS.threads())
        .map_err(|e| e.to_string())?;

    let meshes = mesh_files(&OPTIONS.mesh_dir)?;
    Ok((config, engine, meshes))
}

/// Returns the scene configuration with the command line overrides applied.
///
/// * `options` - Command line options.
fn config_from_options(options: &Options) -> Result<HologramConfig, String> {
    let mut config = HologramConfig::default();
    config.camera.count = options.cameras;
    config.camera.total_angle = options.total_angle;
    config.camera.spp = options.spp;
    config.camera.x_resolution = options.x_resolution;
    config.camera.y_resolution = options.y_resolution;
    config.glass.dust_texture = absolute_path(&options.dust_texture)?;
    config.glass.dust_threshold = options.dust_threshold;
    config.emitter.edge_lights = !options.no_edge_lights;
    Ok(config)
}

/// Returns the object descriptor for a mesh using the command line object
/// settings.
///
/// * `path`    - Path to the mesh.
/// * `options` - Command line options.
fn object_from_options(path: &str, options: &Options) -> Result<ObjectDescriptor, String> {
    let mut object = ObjectDescriptor::new(path);
    object.material = options
        .material
        .parse::<ObjectMaterialKind>()
        .map_err(|e| e.to_string())?;
    let c = vec3("color", &options.color)?;
    object.base_color = Spectrum::from_rgb(c.x, c.y, c.z);
    object.scale = vec3("scale", &options.scale)?;
    object.rotation = vec3("rotation", &options.rotation)?;
    object.location = vec3("location", &options.location)?;
    Ok(object)
}

/// Returns the PLY and OBJ files of a directory sorted by name.
///
/// * `dir` - The directory.
fn mesh_files(dir: &str) -> Result<Vec<String>, String> {
    let entries = std::fs::read_dir(dir).map_err(|e| format!("Unable to read '{dir}'. {e}."))?;
    let mut paths: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file())
        .map(|p| p.to_string_lossy().into_owned())
        .filter(|p| matches!(extension(p).as_deref(), Some("ply") | Some("obj")))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Returns the path of the i-th image (0-based) of a mesh.
///
/// * `out_dir` - Output directory.
/// * `stem`    - Mesh file name without extension.
/// * `i`       - Placement index.
/// * `ext`     - Image file extension.
fn output_path(out_dir: &str, stem: &str, i: usize, ext: &str) -> String {
    Path::new(out_dir)
        .join(format!("{stem}{i}.{ext}"))
        .to_string_lossy()
        .into_owned()
}

/// Returns a vector from exactly three values.
fn vec3(name: &str, v: &[Float]) -> Result<Vector3f, String> {
    match v {
        [x, y, z] => Ok(vector3(*x, *y, *z)),
        _ => Err(format!("'{name}' needs 3 values, got {}", v.len())),
    }
}

/// Render all sensor placements of one mesh and write the images.
///
/// * `path`   - Path to the mesh.
/// * `config` - Scene configuration.
/// * `engine` - The render engine.
fn render(path: &str, config: &HologramConfig, engine: &mut PbrtEngine) -> Result<(), String> {
    let stem = file_stem(path).ok_or_else(|| format!("Invalid mesh path '{path}'."))?;

    let emitters: Vec<EmitterDescriptor> = OPTIONS
        .emitter_positions()
        .into_iter()
        .map(EmitterDescriptor::new)
        .collect();
    let object = object_from_options(path, &OPTIONS)?;

    let mut assembler =
        SceneAssembler::new(config.clone(), Box::new(MeshLoader), Box::new(DustTexture));
    assembler
        .build(&emitters, &[object])
        .map_err(|e| e.to_string())?;

    let description = assembler.description();
    let mut scene = engine.load(description).map_err(|e| e.to_string())?;
    let modulated = description.modulated_emitters();

    let progress = create_progress_reporter(assembler.placements().len() as u64);
    progress.set_message(stem.clone());

    let mut i = 0;
    let result = RenderDriver::new(engine, assembler.radiance()).render_each(
        &mut scene,
        assembler.placements(),
        &modulated,
        config.camera.spp,
        |placement, image| {
            let out = output_path(&OPTIONS.out_dir, &stem, i, &OPTIONS.image_ext);
            write_image(&out, &image)?;
            debug!("Wrote '{}' for {}", out, placement.name);
            i += 1;
            progress.inc(1);
            Ok(())
        },
    );

    match result {
        Ok(()) => {
            progress.finish_with_message(format!("{stem} complete"));
            Ok(())
        }
        Err(e) => {
            progress.abandon();
            Err(e.to_string())
        }
    }
}
