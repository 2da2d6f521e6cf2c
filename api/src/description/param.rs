//! Parameter values.

use holo_core::error::EngineError;
use holo_core::geometry::Point3f;
use holo_core::holo::*;
use holo_core::spectrum::Spectrum;
use std::fmt;

/// A value read from or written to a scene parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Scalar.
    Float(Float),

    /// Integer.
    Int(Int),

    /// RGB color.
    Rgb(Spectrum),

    /// Position.
    Point(Point3f),
}

impl ParamValue {
    /// Returns the name of the value type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Rgb(_) => "rgb",
            Self::Point(_) => "point",
        }
    }

    /// Returns the scalar or a type mismatch for `path`.
    ///
    /// * `path` - Parameter path being written.
    pub fn as_float(&self, path: &str) -> Result<Float, EngineError> {
        match self {
            Self::Float(v) => Ok(*v),
            _ => Err(mismatch(path, "float")),
        }
    }

    /// Returns the integer or a type mismatch for `path`.
    ///
    /// * `path` - Parameter path being written.
    pub fn as_int(&self, path: &str) -> Result<Int, EngineError> {
        match self {
            Self::Int(v) => Ok(*v),
            _ => Err(mismatch(path, "int")),
        }
    }

    /// Returns the color or a type mismatch for `path`.
    ///
    /// * `path` - Parameter path being written.
    pub fn as_rgb(&self, path: &str) -> Result<Spectrum, EngineError> {
        match self {
            Self::Rgb(v) => Ok(*v),
            _ => Err(mismatch(path, "rgb")),
        }
    }

    /// Returns the position or a type mismatch for `path`.
    ///
    /// * `path` - Parameter path being written.
    pub fn as_point(&self, path: &str) -> Result<Point3f, EngineError> {
        match self {
            Self::Point(v) => Ok(*v),
            _ => Err(mismatch(path, "point")),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Rgb(v) => write!(f, "{v}"),
            Self::Point(p) => write!(f, "[{} {} {}]", p.x, p.y, p.z),
        }
    }
}

fn mismatch(path: &str, expected: &'static str) -> EngineError {
    EngineError::ParameterTypeMismatch {
        path: path.to_string(),
        expected,
    }
}
