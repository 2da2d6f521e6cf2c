//! Errors

use crate::holo::Float;
use std::fmt;
use std::io;

/// Errors caused by an inconsistent scene configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigurationError {
    /// An entity name is already taken or is reserved for the glass assembly.
    NameCollision(String),

    /// The sensor arc was requested with zero sensors.
    EmptySensorSet,

    /// The scene was already built; it has to be reset before building again.
    AlreadyBuilt,

    /// A configuration value is outside of its valid range.
    InvalidValue {
        /// Name of the offending field.
        field: String,

        /// Why the value was rejected.
        reason: String,
    },
}

/// Errors raised while reading meshes or textures.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceError {
    /// The file does not exist.
    FileNotFound(String),

    /// The file exists but could not be read or decoded.
    DecodeError {
        /// Path to the file.
        path: String,

        /// Decoder message.
        reason: String,
    },
}

impl ResourceError {
    /// Maps an I/O error on `path` to `FileNotFound` or `DecodeError`.
    ///
    /// * `path` - The file that was accessed.
    /// * `err`  - The I/O error.
    pub fn from_io(path: &str, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::FileNotFound(path.to_string()),
            _ => Self::decode(path, err),
        }
    }

    /// Returns a `DecodeError` for `path`.
    ///
    /// * `path`   - Path to the file.
    /// * `reason` - Anything describing the failure.
    pub fn decode<E: fmt::Display>(path: &str, reason: E) -> Self {
        Self::DecodeError {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Errors reported by a render engine.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineError {
    /// The scene description is malformed or misses required entries.
    InvalidSceneDescription(String),

    /// A parameter path names an entity or field that does not exist.
    UnknownParameterPath(String),

    /// The value written to a parameter path has the wrong type.
    ParameterTypeMismatch {
        /// The parameter path.
        path: String,

        /// The value type the field holds.
        expected: &'static str,
    },

    /// Rendering failed.
    RenderFailure(String),
}

/// Top-level error type.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Configuration error.
    Configuration(ConfigurationError),

    /// A mesh is too thin to be rescaled by its minimum extent.
    DegenerateGeometry {
        /// The minimum bounding box extent.
        min_extent: Float,
    },

    /// Mesh or texture read failure.
    ExternalResource(ResourceError),

    /// Render engine failure.
    Engine(EngineError),
}

/// Result type used throughout the crates.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameCollision(name) => write!(f, "entity name '{name}' is already in use"),
            Self::EmptySensorSet => write!(f, "at least one sensor is required"),
            Self::AlreadyBuilt => write!(f, "scene has already been built"),
            Self::InvalidValue { field, reason } => write!(f, "invalid '{field}': {reason}"),
        }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "file '{path}' not found"),
            Self::DecodeError { path, reason } => write!(f, "unable to read '{path}'. {reason}"),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSceneDescription(msg) => write!(f, "invalid scene description: {msg}"),
            Self::UnknownParameterPath(path) => write!(f, "unknown parameter '{path}'"),
            Self::ParameterTypeMismatch { path, expected } => {
                write!(f, "parameter '{path}' expects a {expected} value")
            }
            Self::RenderFailure(msg) => write!(f, "render failed: {msg}"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => write!(f, "configuration error: {e}"),
            Self::DegenerateGeometry { min_extent } => write!(
                f,
                "degenerate geometry: minimum bounding box extent {min_extent} cannot be rescaled"
            ),
            Self::ExternalResource(e) => write!(f, "resource error: {e}"),
            Self::Engine(e) => write!(f, "engine error: {e}"),
        }
    }
}

impl std::error::Error for ConfigurationError {}
impl std::error::Error for ResourceError {}
impl std::error::Error for EngineError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::ExternalResource(e) => Some(e),
            Self::Engine(e) => Some(e),
            Self::DegenerateGeometry { .. } => None,
        }
    }
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<ResourceError> for Error {
    fn from(e: ResourceError) -> Self {
        Self::ExternalResource(e)
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        Self::Engine(e)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
