//! Application related stuff

use crate::geometry::{point3, Point3f};
use crate::holo::Float;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

lazy_static! {
    /// The global application options.
    pub static ref OPTIONS: Options = Options::parse();
}

/// Emitter positions used when none are given on the command line.
pub const DEFAULT_EMITTERS: [[Float; 3]; 2] = [[-6.0, 8.0, 6.0], [-6.0, 8.0, -2.0]];

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Directory containing the meshes.
    #[arg(value_name = "DIR", default_value = "./AllObjs", help = "Directory of PLY/OBJ meshes")]
    pub mesh_dir: String,

    /// Directory receiving the rendered images.
    #[arg(
        long = "outdir",
        short = 'o',
        value_name = "DIR",
        default_value = "./dataset",
        help = "Write the rendered images to the given directory."
    )]
    pub out_dir: String,

    /// Image file extension.
    #[arg(
        long = "format",
        value_name = "EXT",
        default_value = "jpeg",
        help = "Image format of the rendered images (exr, png, jpg, jpeg, tga)."
    )]
    pub image_ext: String,

    /// Directory receiving intermediate scene files.
    #[arg(
        long = "scenedir",
        value_name = "DIR",
        help = "Keep the exported scene files in the given directory."
    )]
    pub scene_dir: Option<String>,

    /// Path to the renderer executable.
    #[arg(
        long = "pbrt",
        value_name = "FILE",
        default_value = "pbrt",
        help = "Path to the pbrt executable."
    )]
    pub pbrt_exe: String,

    /// Number of threads the renderer may use.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        default_value_t = 0,
        help = "Use specified number of threads for rendering (0 lets the renderer decide)."
    )]
    n_threads: usize,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,

    /// Number of cameras on the viewing arc.
    #[arg(
        long = "cameras",
        short = 'n',
        value_name = "NUM",
        default_value_t = 3,
        help = "Number of cameras spread over the viewing arc."
    )]
    pub cameras: usize,

    /// Total viewing angle spanned by the cameras.
    #[arg(
        long = "angle",
        value_name = "DEGREES",
        default_value_t = 120.0,
        help = "Total viewing angle covered by the cameras."
    )]
    pub total_angle: Float,

    /// Samples per pixel.
    #[arg(long = "spp", value_name = "NUM", default_value_t = 128, help = "Samples per pixel.")]
    pub spp: u32,

    /// Image width.
    #[arg(long = "xres", value_name = "NUM", default_value_t = 1024, help = "Image width.")]
    pub x_resolution: u32,

    /// Image height.
    #[arg(long = "yres", value_name = "NUM", default_value_t = 1024, help = "Image height.")]
    pub y_resolution: u32,

    /// Dust texture path.
    #[arg(
        long = "dust",
        value_name = "FILE",
        default_value = "dust.jpg",
        help = "8-bit grayscale dust texture of the holographic film."
    )]
    pub dust_texture: String,

    /// Dust threshold level.
    #[arg(
        long = "threshold",
        value_name = "LEVEL",
        default_value_t = 150,
        help = "Dust texels at or below this level are cleared."
    )]
    pub dust_threshold: u8,

    /// Emitter positions as a flat list of coordinates.
    #[arg(
        long = "emitter",
        value_name = "FLOAT",
        num_args = 3,
        action = clap::ArgAction::Append,
        allow_hyphen_values = true,
        help = "Add an emitter at the given position (x y z). May be repeated."
    )]
    emitters: Vec<Float>,

    /// Disable the fixed lights on the glass edges.
    #[arg(long = "no-edge-lights", help = "Do not light the glass edges.")]
    pub no_edge_lights: bool,

    /// Object material.
    #[arg(
        long = "material",
        value_name = "NAME",
        default_value = "diffuse",
        help = "Object material (diffuse or roughplastic)."
    )]
    pub material: String,

    /// Object base color.
    #[arg(
        long = "color",
        value_name = "FLOAT",
        num_args = 3,
        default_values_t = [0.5, 0.5, 0.5],
        help = "Object base color (r g b)."
    )]
    pub color: Vec<Float>,

    /// Object scale.
    #[arg(
        long = "scale",
        value_name = "FLOAT",
        num_args = 3,
        default_values_t = [1.0, 1.0, 1.0],
        help = "Object scale applied after normalization (x y z)."
    )]
    pub scale: Vec<Float>,

    /// Object rotation in degrees.
    #[arg(
        long = "rotation",
        value_name = "DEGREES",
        num_args = 3,
        allow_hyphen_values = true,
        default_values_t = [0.0, 0.0, 0.0],
        help = "Object rotation about X, Y and Z in degrees."
    )]
    pub rotation: Vec<Float>,

    /// Object location relative to the display.
    #[arg(
        long = "location",
        value_name = "FLOAT",
        num_args = 3,
        allow_hyphen_values = true,
        default_values_t = [8.0, 0.0, 0.0],
        help = "Object location relative to the display (x y z)."
    )]
    pub location: Vec<Float>,
}

impl Options {
    /// Returns the number of threads to use or `None` to let the renderer
    /// decide.
    pub fn threads(&self) -> Option<usize> {
        match self.n_threads {
            0 => None,
            n => Some(n),
        }
    }

    /// Returns the emitter positions.
    pub fn emitter_positions(&self) -> Vec<Point3f> {
        if self.emitters.is_empty() {
            DEFAULT_EMITTERS
                .iter()
                .map(|p| point3(p[0], p[1], p[2]))
                .collect()
        } else {
            self.emitters
                .chunks_exact(3)
                .map(|p| point3(p[0], p[1], p[2]))
                .collect()
        }
    }
}

/// Returns a progress bar with `count` steps. The bar is hidden when
/// `OPTIONS.quiet` is set.
///
/// * `count` - Number of steps.
pub fn create_progress_reporter(count: u64) -> ProgressBar {
    if OPTIONS.quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(count);
    let template = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
    match ProgressStyle::with_template(template) {
        Ok(style) => progress.set_style(style.progress_chars("=> ")),
        Err(e) => warn!("Invalid progress bar template. {e}"),
    }
    progress
}
