//! Test doubles for the mesh, texture and render collaborators.

use super::*;
use holo_core::error::{EngineError, ResourceError, Result};
use holo_core::geometry::*;
use holo_core::holo::*;
use holo_core::image_io::RGBImage;
use holo_core::mesh::MeshBounds;
use holo_core::spectrum::Spectrum;
use holo_core::texture::{DustTextureSource, GrayscaleBitmap};
use std::collections::HashMap;

/// Returns bounds from a table keyed by path.
#[derive(Default)]
pub struct FixedBounds {
    pub extents: HashMap<String, Vector3f>,
}

impl FixedBounds {
    pub fn with(mut self, path: &str, extents: Vector3f) -> Self {
        self.extents.insert(path.to_string(), extents);
        self
    }
}

impl MeshBounds for FixedBounds {
    fn bounds(&self, path: &str) -> std::result::Result<Bounds3f, ResourceError> {
        self.extents
            .get(path)
            .map(|e| Bounds3f::new(point3(0.0, 0.0, 0.0), Point3f::from(*e)))
            .ok_or_else(|| ResourceError::FileNotFound(path.to_string()))
    }
}

/// A 2x2 dust map.
pub struct FlatDust;

impl DustTextureSource for FlatDust {
    fn load_and_threshold(
        &self,
        path: &str,
        _threshold: u8,
    ) -> std::result::Result<GrayscaleBitmap, ResourceError> {
        if path.is_empty() {
            return Err(ResourceError::FileNotFound(path.to_string()));
        }
        Ok(GrayscaleBitmap::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2))
    }
}

/// One recorded render call.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderCall {
    pub sensor: String,
    pub spp: u32,
    pub intensities: Vec<(String, Float)>,
}

/// Renders the intensity of the first emitter into a 1x1 image and records
/// every call. Rendering fails for sensors listed in `fail_on`.
#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Vec<RenderCall>,
    pub fail_on: Vec<String>,
}

impl RenderEngine for RecordingEngine {
    type Scene = SceneDescription;

    fn load(&mut self, description: &SceneDescription) -> Result<Self::Scene> {
        description.check_references()?;
        if description.integrator().is_none() {
            return Err(EngineError::InvalidSceneDescription("no integrator".into()).into());
        }
        Ok(description.clone())
    }

    fn set_parameter(
        &mut self,
        scene: &mut Self::Scene,
        path: &str,
        value: ParamValue,
    ) -> Result<()> {
        Ok(scene.set_parameter(path, value)?)
    }

    fn parameter(&self, scene: &Self::Scene, path: &str) -> Result<ParamValue> {
        Ok(scene.parameter(path)?)
    }

    fn render(&mut self, scene: &Self::Scene, sensor: &str, spp: u32) -> Result<RGBImage> {
        if scene.sensor(sensor).is_none() {
            return Err(EngineError::RenderFailure(format!("no sensor '{sensor}'")).into());
        }
        if self.fail_on.iter().any(|s| s == sensor) {
            return Err(EngineError::RenderFailure(format!("sensor '{sensor}' failed")).into());
        }
        let intensities: Vec<(String, Float)> = scene
            .emitters()
            .map(|(n, e)| (n.to_string(), e.intensity))
            .collect();
        let first = intensities.first().map_or(0.0, |(_, i)| *i);
        self.calls.push(RenderCall {
            sensor: sensor.to_string(),
            spp,
            intensities,
        });
        Ok(RGBImage::new(vec![Spectrum::new(first)], 1, 1))
    }
}
