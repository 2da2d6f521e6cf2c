//! Scene assembler
//!
//! Builds the scene description in a fixed order: the integrator, then the
//! emitters, sensors, objects and finally the glass assembly. A build is
//! one-shot; the assembler has to be reset before it builds again.

use super::*;
use holo_core::error::{ConfigurationError, Result};
use holo_core::geometry::*;
use holo_core::mesh::{MeshBounds, MeshFormat};
use holo_core::spectrum::Spectrum;
use holo_core::texture::DustTextureSource;
use itertools::Itertools;

/// Caller description of an emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct EmitterDescriptor {
    /// Entity name; generated if `None`.
    pub name: Option<String>,

    /// World position.
    pub position: Point3f,
}

impl EmitterDescriptor {
    /// Returns an emitter with a generated name.
    ///
    /// * `position` - World position.
    pub fn new(position: Point3f) -> Self {
        Self {
            name: None,
            position,
        }
    }
}

/// Caller description of a mesh object.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDescriptor {
    /// Entity name; generated if `None`.
    pub name: Option<String>,

    /// Path to a PLY or OBJ file.
    pub mesh_path: String,

    /// Material kind.
    pub material: ObjectMaterialKind,

    /// Base color in [0, 1].
    pub base_color: Spectrum,

    /// Scale applied after normalization.
    pub scale: Vector3f,

    /// Rotation about X, Y and Z in degrees.
    pub rotation: Vector3f,

    /// Location relative to the display.
    pub location: Vector3f,
}

impl ObjectDescriptor {
    /// Returns a grey diffuse object at the default location.
    ///
    /// * `mesh_path` - Path to a PLY or OBJ file.
    pub fn new(mesh_path: &str) -> Self {
        Self {
            name: None,
            mesh_path: mesh_path.to_string(),
            material: ObjectMaterialKind::Diffuse,
            base_color: Spectrum::new(0.5),
            scale: vector3(1.0, 1.0, 1.0),
            rotation: vector3(0.0, 0.0, 0.0),
            location: vector3(8.0, 0.0, 0.0),
        }
    }
}

/// Builds the scene description.
pub struct SceneAssembler {
    /// Scene configuration.
    config: HologramConfig,

    /// Reads mesh bounds.
    meshes: Box<dyn MeshBounds>,

    /// Loads the dust texture.
    dust: Box<dyn DustTextureSource>,

    /// The built description.
    description: SceneDescription,

    /// Sensor placements of the built description.
    placements: Vec<SensorPlacement>,

    /// Set after a successful build.
    built: bool,
}

impl SceneAssembler {
    /// Create a new assembler.
    ///
    /// * `config` - Scene configuration.
    /// * `meshes` - Reads mesh bounds.
    /// * `dust`   - Loads the dust texture.
    pub fn new(
        config: HologramConfig,
        meshes: Box<dyn MeshBounds>,
        dust: Box<dyn DustTextureSource>,
    ) -> Self {
        Self {
            config,
            meshes,
            dust,
            description: SceneDescription::new(),
            placements: vec![],
            built: false,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &HologramConfig {
        &self.config
    }

    /// Returns the configuration for modification. Changes take effect on
    /// the next build.
    pub fn config_mut(&mut self) -> &mut HologramConfig {
        &mut self.config
    }

    /// Returns the radiance model of the configured emitters.
    pub fn radiance(&self) -> AngularRadiance {
        AngularRadiance::from(&self.config.emitter)
    }

    /// Returns the built description.
    pub fn description(&self) -> &SceneDescription {
        &self.description
    }

    /// Returns the sensor placements of the built description.
    pub fn placements(&self) -> &[SensorPlacement] {
        &self.placements
    }

    /// Returns true after a successful build.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Discard the built description so the assembler can build again.
    pub fn reset(&mut self) {
        self.description = SceneDescription::new();
        self.placements.clear();
        self.built = false;
    }

    /// Build the scene description. A failed build leaves the assembler
    /// unchanged.
    ///
    /// * `emitters` - Emitters modulated by the viewer's azimuth.
    /// * `objects`  - Mesh objects.
    pub fn build(
        &mut self,
        emitters: &[EmitterDescriptor],
        objects: &[ObjectDescriptor],
    ) -> Result<()> {
        if self.built {
            return Err(ConfigurationError::AlreadyBuilt.into());
        }
        self.config.validate()?;

        let mut description = SceneDescription::new();
        self.add_integrator(&mut description)?;
        self.add_emitters(&mut description, emitters)?;
        let placements = self.add_sensors(&mut description)?;
        self.add_objects(&mut description, objects)?;
        self.add_glass(&mut description)?;

        info!(
            "Built scene with {} entities: {}",
            description.len(),
            description.names().iter().join(", ")
        );

        self.description = description;
        self.placements = placements;
        self.built = true;
        Ok(())
    }

    fn add_integrator(&self, description: &mut SceneDescription) -> Result<()> {
        let c = &self.config.integrator;
        description.insert_reserved(
            INTEGRATOR,
            Entity::Integrator(IntegratorSpec {
                max_depth: c.max_depth,
                hide_emitters: c.hide_emitters,
            }),
        )?;
        Ok(())
    }

    /// Emitters start dark; the driver sets their intensity before every
    /// render.
    fn add_emitters(
        &self,
        description: &mut SceneDescription,
        emitters: &[EmitterDescriptor],
    ) -> Result<()> {
        for (i, e) in emitters.iter().enumerate() {
            let name = e
                .name
                .clone()
                .unwrap_or_else(|| format!("emitter{}", i + 1));
            description.insert(
                &name,
                Entity::Emitter(EmitterSpec {
                    position: e.position,
                    intensity: 0.0,
                    modulated: true,
                }),
            )?;
        }
        Ok(())
    }

    fn add_sensors(&self, description: &mut SceneDescription) -> Result<Vec<SensorPlacement>> {
        let c = &self.config.camera;
        let placements = build_arc(c.count, c.total_angle, &c.target, &c.origin, &c.up)?;
        for p in placements.iter() {
            description.insert(
                &p.name,
                Entity::Sensor(SensorSpec {
                    azimuth: p.azimuth,
                    to_world: p.world_transform,
                    fov: c.fov,
                    aperture_radius: c.aperture_radius,
                    focus_distance: c.focus_distance,
                    x_resolution: c.x_resolution,
                    y_resolution: c.y_resolution,
                    spp: c.spp,
                }),
            )?;
        }
        Ok(placements)
    }

    fn add_objects(
        &self,
        description: &mut SceneDescription,
        objects: &[ObjectDescriptor],
    ) -> Result<()> {
        for (i, o) in objects.iter().enumerate() {
            let name = o.name.clone().unwrap_or_else(|| format!("obj{}", i + 1));
            if description.contains(&name) || is_reserved(&name) {
                return Err(ConfigurationError::NameCollision(name).into());
            }
            if !o.base_color.is_unit_range() {
                return Err(invalid(
                    &format!("{name}.base_color"),
                    format!("{} is outside [0, 1]", o.base_color),
                )
                .into());
            }

            let extents = self.meshes.bounds(&o.mesh_path)?.extents();
            let corrective_scale = self.config.object_scale.corrective_scale(&extents)?;
            let effective_scale = o.scale * corrective_scale;
            debug!(
                "Object '{}' extents {:?}, corrective scale {}",
                name, extents, corrective_scale
            );

            description.insert(
                &name,
                Entity::Object(ObjectSpec {
                    mesh_path: o.mesh_path.clone(),
                    format: MeshFormat::from_path(&o.mesh_path),
                    material: o.material.with_color(o.base_color),
                    requested_scale: o.scale,
                    rotation: o.rotation,
                    location: o.location,
                    extents,
                    corrective_scale,
                    to_world: ObjectSpec::placement(&o.location, &effective_scale, &o.rotation),
                }),
            )?;
        }
        Ok(())
    }

    fn add_glass(&self, description: &mut SceneDescription) -> Result<()> {
        let g = &self.config.glass;

        let weight = self
            .dust
            .load_and_threshold(&g.dust_texture, g.dust_threshold)?;
        description.insert_reserved(
            HOLOGRAPHIC_FILM,
            Entity::Material(Material::HolographicFilm(HolographicFilm {
                coating: Coating::from_config(g),
                weight,
                texture_path: g.dust_texture.clone(),
            })),
        )?;

        description.insert_reserved(
            MEDIUM,
            Entity::Medium(MediumSpec {
                sigma_t: Spectrum::new(g.sigma_t),
                albedo: Spectrum::new(g.albedo),
            }),
        )?;

        let upright = Transform::rotate_y(90.0);
        let scale = Transform::scale(&g.size);
        description.insert_reserved(
            SLAB,
            Entity::Shape(ShapeSpec {
                kind: ShapeKind::Slab,
                to_world: upright * Transform::translate(&g.location) * scale,
                bsdf: BsdfRef::Named(HOLOGRAPHIC_FILM.to_string()),
                interior: Some(MEDIUM.to_string()),
            }),
        )?;

        for (name, side) in [(FRAME_LEFT, -1.0), (FRAME_RIGHT, 1.0)] {
            let offset = vector3(0.0, side * 2.0 * g.size.y, -2.0 * g.size.z);
            description.insert_reserved(
                name,
                Entity::Shape(ShapeSpec {
                    kind: ShapeKind::Frame,
                    to_world: upright * Transform::translate(&(g.location + offset)) * scale,
                    bsdf: BsdfRef::Inline(Material::black()),
                    interior: None,
                }),
            )?;
        }

        let e = &self.config.emitter;
        if e.edge_lights {
            for (name, position) in [EDGE_LIGHT_LEFT, EDGE_LIGHT_RIGHT]
                .into_iter()
                .zip(e.edge_light_positions)
            {
                description.insert_reserved(
                    name,
                    Entity::Emitter(EmitterSpec {
                        position,
                        intensity: e.max_radiance,
                        modulated: false,
                    }),
                )?;
            }
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use holo_core::error::{Error, ResourceError};
    use holo_core::holo::*;
    use float_cmp::approx_eq;

    fn assembler(config: HologramConfig) -> SceneAssembler {
        let meshes = FixedBounds::default()
            .with("bunny.ply", vector3(1.0, 20.0, 1.0))
            .with("teapot.obj", vector3(3.0, 4.0, 5.0))
            .with("sheet.obj", vector3(20.0, 1.0, 0.0));
        SceneAssembler::new(config, Box::new(meshes), Box::new(FlatDust))
    }

    fn emitters() -> Vec<EmitterDescriptor> {
        vec![
            EmitterDescriptor::new(point3(-6.0, 8.0, 6.0)),
            EmitterDescriptor::new(point3(-6.0, 8.0, -2.0)),
        ]
    }

    #[test]
    fn entities_follow_build_order() {
        let mut config = HologramConfig::default();
        config.camera.count = 2;
        let mut a = assembler(config);
        a.build(&emitters(), &[ObjectDescriptor::new("teapot.obj")])
            .unwrap();
        assert_eq!(
            a.description().names(),
            vec![
                INTEGRATOR,
                "emitter1",
                "emitter2",
                "sensor1",
                "sensor2",
                "obj1",
                HOLOGRAPHIC_FILM,
                MEDIUM,
                SLAB,
                FRAME_LEFT,
                FRAME_RIGHT,
                EDGE_LIGHT_LEFT,
                EDGE_LIGHT_RIGHT,
            ]
        );
        assert_eq!(a.placements().len(), 2);
        assert_eq!(a.description().check_references(), Ok(()));
    }

    #[test]
    fn emitters_start_dark_and_edge_lights_are_constant() {
        let mut a = assembler(HologramConfig::default());
        a.build(&emitters(), &[]).unwrap();
        assert_eq!(
            a.description().modulated_emitters(),
            vec!["emitter1".to_string(), "emitter2".to_string()]
        );
        assert_eq!(
            a.description().parameter("emitter1.intensity.value"),
            Ok(ParamValue::Float(0.0))
        );
        assert_eq!(
            a.description().parameter("edge-light-right.intensity.value"),
            Ok(ParamValue::Float(200.0))
        );
    }

    #[test]
    fn edge_lights_can_be_disabled() {
        let mut config = HologramConfig::default();
        config.emitter.edge_lights = false;
        let mut a = assembler(config);
        a.build(&emitters(), &[]).unwrap();
        assert!(!a.description().contains(EDGE_LIGHT_LEFT));
        assert_eq!(a.description().emitters().count(), 2);
    }

    #[test]
    fn second_build_fails_until_reset() {
        let mut a = assembler(HologramConfig::default());
        a.build(&emitters(), &[]).unwrap();
        assert_eq!(
            a.build(&emitters(), &[]),
            Err(Error::Configuration(ConfigurationError::AlreadyBuilt))
        );
        a.reset();
        assert!(!a.is_built());
        assert!(a.description().is_empty());
        a.build(&emitters(), &[]).unwrap();
        assert!(a.is_built());
    }

    #[test]
    fn reserved_object_name_collides() {
        let mut a = assembler(HologramConfig::default());
        let mut o = ObjectDescriptor::new("teapot.obj");
        o.name = Some(SLAB.to_string());
        assert_eq!(
            a.build(&emitters(), &[o]),
            Err(Error::Configuration(ConfigurationError::NameCollision(
                SLAB.to_string()
            )))
        );
        assert!(!a.is_built());
        assert!(a.description().is_empty());
    }

    #[test]
    fn reserved_emitter_name_collides() {
        let mut a = assembler(HologramConfig::default());
        let mut e = EmitterDescriptor::new(point3(0.0, 0.0, 0.0));
        e.name = Some(MEDIUM.to_string());
        assert_eq!(
            a.build(&[e], &[]),
            Err(Error::Configuration(ConfigurationError::NameCollision(
                MEDIUM.to_string()
            )))
        );
    }

    #[test]
    fn duplicate_caller_names_collide() {
        let mut a = assembler(HologramConfig::default());
        let mut o = ObjectDescriptor::new("teapot.obj");
        o.name = Some("emitter1".to_string());
        assert!(matches!(
            a.build(&emitters(), &[o]),
            Err(Error::Configuration(ConfigurationError::NameCollision(_)))
        ));
    }

    #[test]
    fn zero_sensors_is_an_error() {
        let mut config = HologramConfig::default();
        config.camera.count = 0;
        let mut a = assembler(config);
        assert_eq!(
            a.build(&emitters(), &[]),
            Err(Error::Configuration(ConfigurationError::EmptySensorSet))
        );
    }

    #[test]
    fn object_is_normalized_and_placed() {
        let mut a = assembler(HologramConfig::default());
        let mut o = ObjectDescriptor::new("bunny.ply");
        o.scale = vector3(1.0, 2.0, 3.0);
        a.build(&emitters(), &[o]).unwrap();

        let (_, obj) = a.description().objects().next().unwrap();
        assert_eq!(obj.format, MeshFormat::Ply);
        assert_eq!(obj.corrective_scale, 2.0);
        assert_eq!(obj.effective_scale(), vector3(2.0, 4.0, 6.0));

        let origin = obj.to_world.transform_point(&point3(0.0, 0.0, 0.0));
        assert_eq!(origin, point3(-8.0, 0.0, 0.0));
        let p = obj.to_world.transform_point(&point3(1.0, 1.0, 1.0));
        assert!(approx_eq!(Float, p.x, -6.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, p.y, 4.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, p.z, 6.0, epsilon = 1e-5));
    }

    #[test]
    fn degenerate_object_fails_the_build() {
        let mut a = assembler(HologramConfig::default());
        assert_eq!(
            a.build(&emitters(), &[ObjectDescriptor::new("sheet.obj")]),
            Err(Error::DegenerateGeometry { min_extent: 0.0 })
        );
    }

    #[test]
    fn missing_mesh_fails_the_build() {
        let mut a = assembler(HologramConfig::default());
        assert_eq!(
            a.build(&emitters(), &[ObjectDescriptor::new("nowhere.ply")]),
            Err(Error::ExternalResource(ResourceError::FileNotFound(
                "nowhere.ply".to_string()
            )))
        );
    }

    #[test]
    fn base_color_must_be_in_unit_range() {
        let mut a = assembler(HologramConfig::default());
        let mut o = ObjectDescriptor::new("teapot.obj");
        o.base_color = Spectrum::from_rgb(0.5, 1.5, 0.5);
        assert!(matches!(
            a.build(&emitters(), &[o]),
            Err(Error::Configuration(ConfigurationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn glass_is_upright_with_flanking_frames() {
        let mut a = assembler(HologramConfig::default());
        a.build(&emitters(), &[]).unwrap();
        let d = a.description();

        let slab = match d.get(SLAB) {
            Some(Entity::Shape(s)) => s,
            e => panic!("unexpected {e:?}"),
        };
        assert_eq!(slab.interior.as_deref(), Some(MEDIUM));
        // The thin axis of the slab ends up along world x.
        let thin = slab.to_world.transform_vector(&vector3(0.0, 0.0, 1.0));
        assert!(approx_eq!(Float, thin.x, 0.1, epsilon = 1e-6));
        assert!(approx_eq!(Float, thin.z, 0.0, epsilon = 1e-6));

        let left = match d.get(FRAME_LEFT) {
            Some(Entity::Shape(s)) => s,
            e => panic!("unexpected {e:?}"),
        };
        let c = left.to_world.transform_point(&point3(0.0, 0.0, 0.0));
        assert!(approx_eq!(Float, c.x, -0.2, epsilon = 1e-5));
        assert!(approx_eq!(Float, c.y, -12.0, epsilon = 1e-5));
        assert_eq!(left.bsdf, BsdfRef::Inline(Material::black()));

        match d.medium(MEDIUM) {
            Some(m) => assert!(approx_eq!(Float, m.sigma_s()[1], 0.09, epsilon = 1e-7)),
            None => panic!("medium missing"),
        }
        match d.material(HOLOGRAPHIC_FILM) {
            Some(Material::HolographicFilm(film)) => {
                assert_eq!(film.weight.width(), 2);
                assert_eq!(film.texture_path, "dust.jpg");
            }
            m => panic!("unexpected {m:?}"),
        }
    }

    #[test]
    fn invalid_config_fails_before_anything_is_read() {
        let mut config = HologramConfig::default();
        config.glass.dust_texture = String::new();
        let mut a = assembler(config);
        assert!(matches!(
            a.build(&emitters(), &[]),
            Err(Error::Configuration(ConfigurationError::InvalidValue { .. }))
        ));
    }
}
