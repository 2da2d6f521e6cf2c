//! Scene description
//!
//! An ordered table of named entities. Names are unique and a handful of
//! names are reserved for the glass assembly and the integrator.

mod entities;
mod material;
mod param;

// Re-export
pub use entities::*;
pub use material::*;
pub use param::*;

use holo_core::error::{ConfigurationError, EngineError};
use std::collections::HashMap;

/// Name of the integrator entity.
pub const INTEGRATOR: &str = "integrator";

/// Name of the holographic film material.
pub const HOLOGRAPHIC_FILM: &str = "holographic-film";

/// Name of the glass interior medium.
pub const MEDIUM: &str = "medium";

/// Name of the glass slab.
pub const SLAB: &str = "slab";

/// Name of the left frame.
pub const FRAME_LEFT: &str = "frame-left";

/// Name of the right frame.
pub const FRAME_RIGHT: &str = "frame-right";

/// Name of the left edge light.
pub const EDGE_LIGHT_LEFT: &str = "edge-light-left";

/// Name of the right edge light.
pub const EDGE_LIGHT_RIGHT: &str = "edge-light-right";

/// Names callers may not use.
pub const RESERVED_NAMES: [&str; 8] = [
    INTEGRATOR,
    HOLOGRAPHIC_FILM,
    MEDIUM,
    SLAB,
    FRAME_LEFT,
    FRAME_RIGHT,
    EDGE_LIGHT_LEFT,
    EDGE_LIGHT_RIGHT,
];

/// Returns true if `name` is reserved.
///
/// * `name` - Entity name.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// An entity of the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Entity {
    /// Point emitter.
    Emitter(EmitterSpec),

    /// Camera.
    Sensor(SensorSpec),

    /// Mesh object.
    Object(ObjectSpec),

    /// Named material.
    Material(Material),

    /// Participating medium.
    Medium(MediumSpec),

    /// Slab or frame.
    Shape(ShapeSpec),

    /// Light transport settings.
    Integrator(IntegratorSpec),
}

impl Entity {
    /// Returns the entity type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Emitter(_) => "emitter",
            Self::Sensor(_) => "sensor",
            Self::Object(_) => "object",
            Self::Material(_) => "material",
            Self::Medium(_) => "medium",
            Self::Shape(_) => "shape",
            Self::Integrator(_) => "integrator",
        }
    }
}

/// Named scene entities in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneDescription {
    /// Entities in insertion order.
    entities: Vec<(String, Entity)>,

    /// Maps names to positions in `entities`.
    index: HashMap<String, usize>,
}

impl SceneDescription {
    /// Returns an empty description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity with a caller-chosen name. Reserved and existing names
    /// are rejected.
    ///
    /// * `name`   - Entity name.
    /// * `entity` - The entity.
    pub fn insert(&mut self, name: &str, entity: Entity) -> Result<(), ConfigurationError> {
        if is_reserved(name) {
            return Err(ConfigurationError::NameCollision(name.to_string()));
        }
        self.insert_reserved(name, entity)
    }

    /// Add an entity that may use a reserved name.
    ///
    /// * `name`   - Entity name.
    /// * `entity` - The entity.
    pub(crate) fn insert_reserved(
        &mut self,
        name: &str,
        entity: Entity,
    ) -> Result<(), ConfigurationError> {
        if self.index.contains_key(name) {
            return Err(ConfigurationError::NameCollision(name.to_string()));
        }
        debug!("Adding {} '{}'", entity.type_name(), name);
        self.index.insert(name.to_string(), self.entities.len());
        self.entities.push((name.to_string(), entity));
        Ok(())
    }

    /// Returns the number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true if an entity is called `name`.
    ///
    /// * `name` - Entity name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the entity called `name`.
    ///
    /// * `name` - Entity name.
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&i| &self.entities[i].1)
    }

    /// Returns the entity called `name` for modification.
    ///
    /// * `name` - Entity name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Entity> {
        match self.index.get(name) {
            Some(&i) => Some(&mut self.entities[i].1),
            None => None,
        }
    }

    /// Iterate over names and entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entities.iter().map(|(n, e)| (n.as_str(), e))
    }

    /// Returns the entity names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.entities.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Iterate over the emitters.
    pub fn emitters(&self) -> impl Iterator<Item = (&str, &EmitterSpec)> {
        self.iter().filter_map(|(n, e)| match e {
            Entity::Emitter(s) => Some((n, s)),
            _ => None,
        })
    }

    /// Returns the names of emitters whose intensity follows the viewer.
    pub fn modulated_emitters(&self) -> Vec<String> {
        self.emitters()
            .filter(|(_, e)| e.modulated)
            .map(|(n, _)| n.to_string())
            .collect()
    }

    /// Iterate over the sensors.
    pub fn sensors(&self) -> impl Iterator<Item = (&str, &SensorSpec)> {
        self.iter().filter_map(|(n, e)| match e {
            Entity::Sensor(s) => Some((n, s)),
            _ => None,
        })
    }

    /// Iterate over the objects.
    pub fn objects(&self) -> impl Iterator<Item = (&str, &ObjectSpec)> {
        self.iter().filter_map(|(n, e)| match e {
            Entity::Object(s) => Some((n, s)),
            _ => None,
        })
    }

    /// Iterate over the slab and frames.
    pub fn shapes(&self) -> impl Iterator<Item = (&str, &ShapeSpec)> {
        self.iter().filter_map(|(n, e)| match e {
            Entity::Shape(s) => Some((n, s)),
            _ => None,
        })
    }

    /// Returns the integrator settings if present.
    pub fn integrator(&self) -> Option<&IntegratorSpec> {
        self.iter().find_map(|(_, e)| match e {
            Entity::Integrator(s) => Some(s),
            _ => None,
        })
    }

    /// Returns the sensor called `name`.
    ///
    /// * `name` - Entity name.
    pub fn sensor(&self, name: &str) -> Option<&SensorSpec> {
        match self.get(name) {
            Some(Entity::Sensor(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns the material entity called `name`.
    ///
    /// * `name` - Entity name.
    pub fn material(&self, name: &str) -> Option<&Material> {
        match self.get(name) {
            Some(Entity::Material(m)) => Some(m),
            _ => None,
        }
    }

    /// Returns the medium entity called `name`.
    ///
    /// * `name` - Entity name.
    pub fn medium(&self, name: &str) -> Option<&MediumSpec> {
        match self.get(name) {
            Some(Entity::Medium(m)) => Some(m),
            _ => None,
        }
    }

    /// Check that every material and medium reference of the shapes names an
    /// entity of the right type.
    pub fn check_references(&self) -> Result<(), EngineError> {
        for (name, shape) in self.shapes() {
            if let BsdfRef::Named(m) = &shape.bsdf {
                if self.material(m).is_none() {
                    return Err(EngineError::InvalidSceneDescription(format!(
                        "shape '{name}' references unknown material '{m}'"
                    )));
                }
            }
            if let Some(m) = &shape.interior {
                if self.medium(m).is_none() {
                    return Err(EngineError::InvalidSceneDescription(format!(
                        "shape '{name}' references unknown medium '{m}'"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Write a parameter addressed as `<entity>.<field path>`.
    ///
    /// * `path`  - Parameter path.
    /// * `value` - New value.
    pub fn set_parameter(&mut self, path: &str, value: ParamValue) -> Result<(), EngineError> {
        let unknown = || EngineError::UnknownParameterPath(path.to_string());
        let (name, field) = path.split_once('.').ok_or_else(unknown)?;
        let entity = self.get_mut(name).ok_or_else(unknown)?;

        match (entity, field) {
            (Entity::Emitter(e), "intensity.value") => e.intensity = value.as_float(path)?,
            (Entity::Emitter(e), "position") => e.position = value.as_point(path)?,
            (Entity::Object(o), "bsdf.reflectance.value") => match &mut o.material {
                Material::Diffuse { reflectance } => *reflectance = value.as_rgb(path)?,
                _ => return Err(unknown()),
            },
            (Entity::Object(o), "bsdf.diffuse_reflectance.value") => match &mut o.material {
                Material::RoughPlastic {
                    diffuse_reflectance,
                } => *diffuse_reflectance = value.as_rgb(path)?,
                _ => return Err(unknown()),
            },
            (Entity::Medium(m), "sigma_t.value") => m.sigma_t = value.as_rgb(path)?,
            (Entity::Medium(m), "albedo.value") => m.albedo = value.as_rgb(path)?,
            (Entity::Integrator(i), "max_depth") => i.max_depth = value.as_int(path)?,
            _ => return Err(unknown()),
        }
        Ok(())
    }

    /// Read a parameter addressed as `<entity>.<field path>`.
    ///
    /// * `path` - Parameter path.
    pub fn parameter(&self, path: &str) -> Result<ParamValue, EngineError> {
        let unknown = || EngineError::UnknownParameterPath(path.to_string());
        let (name, field) = path.split_once('.').ok_or_else(unknown)?;
        let entity = self.get(name).ok_or_else(unknown)?;

        match (entity, field) {
            (Entity::Emitter(e), "intensity.value") => Ok(ParamValue::Float(e.intensity)),
            (Entity::Emitter(e), "position") => Ok(ParamValue::Point(e.position)),
            (Entity::Object(o), "bsdf.reflectance.value") => match &o.material {
                Material::Diffuse { reflectance } => Ok(ParamValue::Rgb(*reflectance)),
                _ => Err(unknown()),
            },
            (Entity::Object(o), "bsdf.diffuse_reflectance.value") => match &o.material {
                Material::RoughPlastic {
                    diffuse_reflectance,
                } => Ok(ParamValue::Rgb(*diffuse_reflectance)),
                _ => Err(unknown()),
            },
            (Entity::Medium(m), "sigma_t.value") => Ok(ParamValue::Rgb(m.sigma_t)),
            (Entity::Medium(m), "albedo.value") => Ok(ParamValue::Rgb(m.albedo)),
            (Entity::Integrator(i), "max_depth") => Ok(ParamValue::Int(i.max_depth)),
            _ => Err(unknown()),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use holo_core::geometry::*;
    use holo_core::spectrum::Spectrum;

    fn emitter(intensity: f32) -> Entity {
        Entity::Emitter(EmitterSpec {
            position: point3(-6.0, 8.0, 6.0),
            intensity,
            modulated: true,
        })
    }

    fn scene() -> SceneDescription {
        let mut d = SceneDescription::new();
        d.insert_reserved(
            INTEGRATOR,
            Entity::Integrator(IntegratorSpec {
                max_depth: -1,
                hide_emitters: true,
            }),
        )
        .unwrap();
        d.insert("emitter1", emitter(0.0)).unwrap();
        d.insert_reserved(
            MEDIUM,
            Entity::Medium(MediumSpec {
                sigma_t: Spectrum::new(0.1),
                albedo: Spectrum::new(0.9),
            }),
        )
        .unwrap();
        d
    }

    #[test]
    fn insertion_order_is_kept() {
        let d = scene();
        assert_eq!(d.names(), vec![INTEGRATOR, "emitter1", MEDIUM]);
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn duplicate_name_collides() {
        let mut d = scene();
        assert_eq!(
            d.insert("emitter1", emitter(1.0)),
            Err(ConfigurationError::NameCollision("emitter1".to_string()))
        );
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn reserved_name_collides() {
        let mut d = SceneDescription::new();
        for name in RESERVED_NAMES {
            assert_eq!(
                d.insert(name, emitter(1.0)),
                Err(ConfigurationError::NameCollision(name.to_string()))
            );
        }
        assert!(d.is_empty());
    }

    #[test]
    fn emitter_intensity_round_trip() {
        let mut d = scene();
        d.set_parameter("emitter1.intensity.value", ParamValue::Float(42.0))
            .unwrap();
        assert_eq!(
            d.parameter("emitter1.intensity.value"),
            Ok(ParamValue::Float(42.0))
        );
    }

    #[test]
    fn unknown_paths() {
        let mut d = scene();
        for path in ["emitter9.intensity.value", "emitter1.size", "emitter1", "medium.density"] {
            assert_eq!(
                d.set_parameter(path, ParamValue::Float(1.0)),
                Err(EngineError::UnknownParameterPath(path.to_string()))
            );
        }
    }

    #[test]
    fn wrong_value_type() {
        let mut d = scene();
        assert_eq!(
            d.set_parameter("integrator.max_depth", ParamValue::Float(3.0)),
            Err(EngineError::ParameterTypeMismatch {
                path: "integrator.max_depth".to_string(),
                expected: "int"
            })
        );
        d.set_parameter("integrator.max_depth", ParamValue::Int(8))
            .unwrap();
        assert_eq!(d.integrator().map(|i| i.max_depth), Some(8));
    }

    #[test]
    fn medium_parameters() {
        let mut d = scene();
        let rgb = Spectrum::from_rgb(0.2, 0.3, 0.4);
        d.set_parameter("medium.albedo.value", ParamValue::Rgb(rgb))
            .unwrap();
        assert_eq!(d.parameter("medium.albedo.value"), Ok(ParamValue::Rgb(rgb)));
    }

    #[test]
    fn dangling_references_are_reported() {
        let mut d = scene();
        d.insert_reserved(
            SLAB,
            Entity::Shape(ShapeSpec {
                kind: ShapeKind::Slab,
                to_world: Transform::IDENTITY,
                bsdf: BsdfRef::Named(HOLOGRAPHIC_FILM.to_string()),
                interior: Some(MEDIUM.to_string()),
            }),
        )
        .unwrap();
        assert!(matches!(
            d.check_references(),
            Err(EngineError::InvalidSceneDescription(_))
        ));
    }
}
