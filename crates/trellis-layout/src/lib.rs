//! Text measurement and layout for Trellis node trees.
//!
//! This crate sizes text and runs the flexbox engine over a node tree.
//!
//! # Architecture
//!
//! 1. **Text metrics**: [`TextMeasurer`] supplies line widths, [`wrap_text`] breaks lines
//! 2. **Measurement bridge**: [`measure_node`] turns a node's text into a content size
//! 3. **Layout invocation**: [`LayoutEngine`] attaches measure contexts to text nodes,
//!    runs the engine and writes a [`Layout`](trellis_core::Layout) into every node
//!
//! # Example
//!
//! ```
//! use trellis_core::{Node, Style};
//! use trellis_layout::{EstimatedMetrics, LayoutEngine};
//!
//! let mut root = Node::new(Style::new())
//!     .with_child(Node::text(Style::new().with_padding(10.0).with_font_size(16.0), "Hi"));
//!
//! let mut engine = LayoutEngine::new();
//! engine.compute_layout(&mut root, 800.0, 600.0, &EstimatedMetrics::default()).unwrap();
//!
//! assert!(root.children[0].layout.unwrap().height >= 36.0);
//! ```

mod engine;
mod measure;
mod text;

pub use engine::{to_taffy_style, LayoutEngine, LayoutStats};
pub use measure::{measure_node, wrap_width, MeasureConstraint, MeasureContext, MeasureResult};
pub use text::{
    align_offset, layout_lines, measure_text, wrap_text, EstimatedMetrics, PositionedLine,
    TextLine, TextMeasurer, TextOptions, TextSize, WRAP_TOLERANCE,
};
