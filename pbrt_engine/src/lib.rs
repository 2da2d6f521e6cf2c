//! pbrt-v3 render engine
//!
//! Implements `RenderEngine` by exporting one pbrt-v3 scene per sensor and
//! running an external `pbrt` executable on it.

#[macro_use]
extern crate log;

mod engine;
mod writer;

// Re-export
pub use engine::*;
pub use writer::*;
