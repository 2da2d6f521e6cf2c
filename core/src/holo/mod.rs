//! Common numeric types and helpers shared by every crate.

mod common;

// Re-export
pub use common::*;
