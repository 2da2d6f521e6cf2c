//! Mesh collaborator interface.

use crate::error::ResourceError;
use crate::fileutil::extension;
use crate::geometry::Bounds3f;
use std::fmt;

/// Mesh file formats understood by the loaders.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeshFormat {
    /// Stanford polygon file.
    Ply,

    /// Wavefront OBJ file.
    Obj,
}

impl MeshFormat {
    /// Infers the format from a file path. Anything that is not a `.ply`
    /// file is treated as OBJ.
    ///
    /// * `path` - Path to the mesh file.
    pub fn from_path(path: &str) -> Self {
        match extension(path).as_deref() {
            Some("ply") => Self::Ply,
            _ => Self::Obj,
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ply => write!(f, "ply"),
            Self::Obj => write!(f, "obj"),
        }
    }
}

/// Reads the object-space axis-aligned bounding box of a mesh file.
pub trait MeshBounds {
    /// Returns the bounding box of the mesh stored at `path`.
    ///
    /// * `path` - Path to the mesh file.
    fn bounds(&self, path: &str) -> Result<Bounds3f, ResourceError>;
}
