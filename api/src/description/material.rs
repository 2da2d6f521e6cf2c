//! Materials.

use crate::config::{invalid, CoatingKind, GlassConfig};
use holo_core::error::ConfigurationError;
use holo_core::holo::*;
use holo_core::spectrum::*;
use holo_core::texture::GrayscaleBitmap;
use std::fmt;
use std::str::FromStr;

/// Material choices for objects.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObjectMaterialKind {
    /// Lambertian.
    Diffuse,

    /// Rough plastic; only the diffuse component is exposed.
    RoughPlastic,
}

impl ObjectMaterialKind {
    /// Returns the material of this kind with the given base color.
    ///
    /// * `color` - Base color.
    pub fn with_color(&self, color: Spectrum) -> Material {
        match self {
            Self::Diffuse => Material::Diffuse { reflectance: color },
            Self::RoughPlastic => Material::RoughPlastic {
                diffuse_reflectance: color,
            },
        }
    }
}

impl FromStr for ObjectMaterialKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diffuse" => Ok(Self::Diffuse),
            "roughplastic" => Ok(Self::RoughPlastic),
            _ => Err(invalid("object.material", format!("unknown material '{s}'"))),
        }
    }
}

impl fmt::Display for ObjectMaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diffuse => write!(f, "diffuse"),
            Self::RoughPlastic => write!(f, "roughplastic"),
        }
    }
}

/// Clear coating of the holographic film.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Coating {
    /// Smooth dielectric.
    Dielectric {
        /// Interior index of refraction.
        int_ior: Float,

        /// Specular reflectance.
        specular_reflectance: Float,
    },

    /// Rough dielectric.
    RoughDielectric {
        /// Interior index of refraction.
        int_ior: Float,

        /// Specular reflectance.
        specular_reflectance: Float,

        /// Roughness.
        alpha: Float,
    },
}

impl Coating {
    /// Returns the coating described by the glass configuration.
    ///
    /// * `glass` - Glass configuration.
    pub fn from_config(glass: &GlassConfig) -> Self {
        match glass.coating {
            CoatingKind::Dielectric => Self::Dielectric {
                int_ior: glass.ior,
                specular_reflectance: glass.specular_reflectance,
            },
            CoatingKind::RoughDielectric => Self::RoughDielectric {
                int_ior: glass.ior,
                specular_reflectance: glass.specular_reflectance,
                alpha: glass.roughness,
            },
        }
    }

    /// Returns the interior index of refraction.
    pub fn int_ior(&self) -> Float {
        match self {
            Self::Dielectric { int_ior, .. } => *int_ior,
            Self::RoughDielectric { int_ior, .. } => *int_ior,
        }
    }
}

/// The dust-textured film: a blend of the clear coating and a diffuse dust
/// layer weighted by the dust map, which also bumps the dust layer.
#[derive(Clone, Debug, PartialEq)]
pub struct HolographicFilm {
    /// Clear coating.
    pub coating: Coating,

    /// Dust weight map in [0, 1].
    pub weight: GrayscaleBitmap,

    /// Path of the source dust texture.
    pub texture_path: String,
}

/// A surface material.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Lambertian reflector.
    Diffuse {
        /// Reflectance.
        reflectance: Spectrum,
    },

    /// Rough plastic.
    RoughPlastic {
        /// Diffuse reflectance.
        diffuse_reflectance: Spectrum,
    },

    /// Holographic film.
    HolographicFilm(HolographicFilm),
}

impl Material {
    /// Returns a black diffuse material.
    pub fn black() -> Self {
        Self::Diffuse {
            reflectance: Spectrum::new(0.0),
        }
    }
}
