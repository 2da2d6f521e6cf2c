//! Meshes

#[macro_use]
extern crate log;
extern crate ply_rs;

mod mesh;
mod objmesh;
mod plymesh;

// Re-export
pub use mesh::*;
pub use objmesh::*;
pub use plymesh::*;
