//! Error types for the Trellis renderer.
//!
//! Style values never fail; they default. Errors only come from the external
//! layout engine, from an unusable canvas, or from export.

use thiserror::Error;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Errors during layout computation.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Layout engine rejected the tree: {reason}")]
    EngineFailed { reason: String },

    #[error("Invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Errors during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Canvas size {width}x{height} is not drawable")]
    InvalidCanvasSize { width: u32, height: u32 },
}

/// Errors during export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid scene: {reason}")]
    InvalidScene { reason: String },

    #[error("Image encoding failed: {reason}")]
    EncodeFailed { reason: String },

    #[error("Render failed: {reason}")]
    RenderFailed { reason: String },
}
