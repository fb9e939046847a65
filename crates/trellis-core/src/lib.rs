//! Core types for the Trellis box-model renderer.
//!
//! This crate provides the foundational types used across all other trellis crates:
//! - The styled node tree and scene description
//! - The fixed-schema style with its defaulting rules
//! - Geometry and colour value types
//! - Error types

pub mod errors;
pub mod node;
pub mod style;
pub mod types;

pub use errors::*;
pub use node::*;
pub use style::*;
pub use types::*;
