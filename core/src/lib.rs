//! Core

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod error;
pub mod fileutil;
pub mod geometry;
pub mod holo;
pub mod image_io;
pub mod mesh;
pub mod spectrum;
pub mod texture;
