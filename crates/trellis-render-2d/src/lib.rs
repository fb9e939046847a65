//! Canvas rendering for Trellis node trees.
//!
//! This crate draws a laid-out node tree as a box-model debug overlay.
//! Drawing goes through the [`Canvas`] trait; two implementations ship:
//!
//! - [`SoftwareCanvas`]: an RGBA8 rasterizer for headless rendering
//! - [`RecordingCanvas`]: a display list of [`DrawCommand`]s for inspection
//!
//! [`CanvasRenderer`] ties a canvas, a node tree and the layout engine
//! together behind a single [`draw`](CanvasRenderer::draw) call.

mod canvas;
mod debug;
pub mod draw;
mod frame;
mod recording;
mod renderer;
mod shapes;
mod software;

pub use canvas::{Canvas, DashPattern, DrawState, PathOp, PathRecorder, StateStack};
pub use debug::{draw_node_debug, DebugPalette, GuideStyle};
pub use frame::CanvasFrame;
pub use recording::{DrawCommand, RecordingCanvas};
pub use renderer::{CanvasRenderer, RendererOptions};
pub use shapes::{Mesh, Tessellator, Vertex};
pub use software::{SoftwareCanvas, MAX_CANVAS_SIDE};
