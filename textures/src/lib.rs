//! Textures

#[macro_use]
extern crate log;

mod dust;

// Re-export
pub use dust::*;
