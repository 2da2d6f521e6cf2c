//! Render driver
//!
//! Renders the sensor placements in order. Before each render every
//! modulated emitter gets the radiance the film passes at that placement's
//! azimuth, written into the loaded scene as one complete snapshot.

use super::*;
use holo_core::error::Result;
use holo_core::holo::*;
use holo_core::image_io::RGBImage;

/// Intensity written to one emitter before a render.
#[derive(Clone, Debug, PartialEq)]
pub struct IntensityOverride {
    /// Emitter name.
    pub emitter: String,

    /// Radiant intensity.
    pub intensity: Float,
}

impl IntensityOverride {
    /// Returns the parameter path of the emitter's intensity.
    pub fn path(&self) -> String {
        format!("{}.intensity.value", self.emitter)
    }
}

/// Returns the intensities of `emitters` as seen from `azimuth`.
///
/// * `radiance` - Angular radiance model.
/// * `emitters` - Names of the modulated emitters.
/// * `azimuth`  - Viewer azimuth in degrees.
pub fn intensity_snapshot(
    radiance: &AngularRadiance,
    emitters: &[String],
    azimuth: Float,
) -> Vec<IntensityOverride> {
    let intensity = radiance.radiance(azimuth);
    emitters
        .iter()
        .map(|e| IntensityOverride {
            emitter: e.clone(),
            intensity,
        })
        .collect()
}

/// Drives a render engine over the sensor placements.
pub struct RenderDriver<'a, E: RenderEngine> {
    /// The render engine.
    engine: &'a mut E,

    /// Angular radiance model.
    radiance: AngularRadiance,
}

impl<'a, E: RenderEngine> RenderDriver<'a, E> {
    /// Create a new driver.
    ///
    /// * `engine`   - The render engine.
    /// * `radiance` - Angular radiance model.
    pub fn new(engine: &'a mut E, radiance: AngularRadiance) -> Self {
        Self { engine, radiance }
    }

    /// Write an intensity snapshot into the loaded scene.
    ///
    /// * `scene`    - The loaded scene.
    /// * `snapshot` - Intensities to write.
    pub fn apply(&mut self, scene: &mut E::Scene, snapshot: &[IntensityOverride]) -> Result<()> {
        for o in snapshot {
            self.engine
                .set_parameter(scene, &o.path(), ParamValue::Float(o.intensity))?;
        }
        Ok(())
    }

    /// Render every placement in order and hand each image to `on_image` as
    /// soon as it is available. Stops at the first failure.
    ///
    /// * `scene`      - The loaded scene.
    /// * `placements` - Sensor placements.
    /// * `emitters`   - Names of the modulated emitters.
    /// * `spp`        - Samples per pixel.
    /// * `on_image`   - Receives each placement and its image.
    pub fn render_each<F>(
        &mut self,
        scene: &mut E::Scene,
        placements: &[SensorPlacement],
        emitters: &[String],
        spp: u32,
        mut on_image: F,
    ) -> Result<()>
    where
        F: FnMut(&SensorPlacement, RGBImage) -> Result<()>,
    {
        for placement in placements {
            let snapshot = intensity_snapshot(&self.radiance, emitters, placement.azimuth);
            debug!(
                "Sensor '{}' at {} degrees: emitter intensity {}",
                placement.name,
                placement.azimuth,
                snapshot.first().map_or(0.0, |o| o.intensity)
            );
            self.apply(scene, &snapshot)?;

            info!("Rendering '{}' with {} spp", placement.name, spp);
            let image = self.engine.render(scene, &placement.name, spp)?;
            on_image(placement, image)?;
        }
        Ok(())
    }

    /// Render every placement in order and return the images.
    ///
    /// * `scene`      - The loaded scene.
    /// * `placements` - Sensor placements.
    /// * `emitters`   - Names of the modulated emitters.
    /// * `spp`        - Samples per pixel.
    pub fn render_all(
        &mut self,
        scene: &mut E::Scene,
        placements: &[SensorPlacement],
        emitters: &[String],
        spp: u32,
    ) -> Result<Vec<RGBImage>> {
        let mut images = Vec::with_capacity(placements.len());
        self.render_each(scene, placements, emitters, spp, |_, image| {
            images.push(image);
            Ok(())
        })?;
        Ok(images)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
