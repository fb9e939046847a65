//! Export for Trellis scenes.
//!
//! Supported outputs:
//! - PNG (software-rendered box-model overlay)
//! - JSON (computed layout tree)

pub mod json;
pub mod png;
pub mod scene;

pub use json::{layout_to_json, LayoutReport};
pub use png::{encode_png, encode_rgba, PngOptions};
pub use scene::{load_scene, load_scene_file, render_scene, render_scene_png, RenderedScene};
