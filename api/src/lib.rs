//! The API
//!
//! Scene parameter model of the holographic display: configuration, the
//! angular radiance of the emitters, object size normalization, the sensor
//! arc, the typed scene description with its assembler and the render
//! driver that feeds a `RenderEngine`.

#[macro_use]
extern crate log;

mod assembler;
mod config;
mod description;
mod driver;
mod engine;
mod normalizer;
mod radiance;
mod sensor_arc;

#[cfg(test)]
mod testing;

// Re-export
pub use assembler::*;
pub use config::*;
pub use description::*;
pub use driver::*;
pub use engine::*;
pub use normalizer::*;
pub use radiance::*;
pub use sensor_arc::*;
