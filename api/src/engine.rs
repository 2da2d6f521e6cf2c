//! Render engine interface.

use super::{ParamValue, SceneDescription};
use holo_core::error::Result;
use holo_core::image_io::RGBImage;

/// A physically based renderer the scene description is handed to.
pub trait RenderEngine {
    /// The engine's loaded scene.
    type Scene;

    /// Load a scene description. Malformed descriptions are rejected with
    /// `EngineError::InvalidSceneDescription`.
    ///
    /// * `description` - The scene description.
    fn load(&mut self, description: &SceneDescription) -> Result<Self::Scene>;

    /// Write a parameter of the loaded scene addressed as
    /// `<entity>.<field path>`.
    ///
    /// * `scene` - The loaded scene.
    /// * `path`  - Parameter path.
    /// * `value` - New value.
    fn set_parameter(&mut self, scene: &mut Self::Scene, path: &str, value: ParamValue)
        -> Result<()>;

    /// Read a parameter of the loaded scene.
    ///
    /// * `scene` - The loaded scene.
    /// * `path`  - Parameter path.
    fn parameter(&self, scene: &Self::Scene, path: &str) -> Result<ParamValue>;

    /// Render the scene as seen by a sensor.
    ///
    /// * `scene`  - The loaded scene.
    /// * `sensor` - Name of the sensor entity.
    /// * `spp`    - Samples per pixel.
    fn render(&mut self, scene: &Self::Scene, sensor: &str, spp: u32) -> Result<RGBImage>;
}
