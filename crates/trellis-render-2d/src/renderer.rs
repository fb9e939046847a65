//! Frame driver: layout followed by drawing.

use trellis_core::{LayoutError, Node};
use trellis_layout::{LayoutEngine, LayoutStats};

use crate::canvas::Canvas;
use crate::debug::{draw_node_debug, DebugPalette};

/// Renderer configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RendererOptions {
    /// Draw the box-model overlay
    pub debug_draw: bool,
    /// Overlay colours
    pub palette: DebugPalette,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            debug_draw: true,
            palette: DebugPalette::default(),
        }
    }
}

impl RendererOptions {
    pub fn with_debug_draw(mut self, debug_draw: bool) -> Self {
        self.debug_draw = debug_draw;
        self
    }

    pub fn with_palette(mut self, palette: DebugPalette) -> Self {
        self.palette = palette;
        self
    }
}

/// Lays out a node tree and draws it onto a canvas.
///
/// The root node always covers the whole canvas.
#[derive(Debug)]
pub struct CanvasRenderer<C: Canvas> {
    canvas: C,
    root: Node,
    engine: LayoutEngine,
    options: RendererOptions,
}

impl<C: Canvas> CanvasRenderer<C> {
    pub fn new(canvas: C, root: Node) -> Self {
        Self::with_options(canvas, root, RendererOptions::default())
    }

    pub fn with_options(canvas: C, root: Node, options: RendererOptions) -> Self {
        Self {
            canvas,
            root,
            engine: LayoutEngine::new(),
            options,
        }
    }

    /// Render one frame.
    ///
    /// Recomputes layout, clears the canvas and, in debug mode, draws the
    /// box-model overlay for the whole tree. A layout failure aborts the
    /// frame before anything is drawn.
    pub fn draw(&mut self) -> Result<LayoutStats, LayoutError> {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        let stats =
            self.engine
                .compute_layout(&mut self.root, width, height, self.canvas.measurer())?;

        self.canvas.clear_rect(0.0, 0.0, width, height);
        if self.options.debug_draw {
            draw_node_debug(&mut self.canvas, &self.root, &self.options.palette);
        }

        tracing::debug!(
            nodes = stats.nodes,
            measured = stats.measured,
            debug_draw = self.options.debug_draw,
            "frame drawn"
        );
        Ok(stats)
    }

    /// Resize the canvas; the root follows on the next [`draw`](Self::draw).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.resize(width, height);
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn into_canvas(self) -> C {
        self.canvas
    }

    /// Split into the canvas and the laid-out tree.
    pub fn into_parts(self) -> (C, Node) {
        (self.canvas, self.root)
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn set_debug_draw(&mut self, debug_draw: bool) {
        self.options.debug_draw = debug_draw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingCanvas};
    use trellis_core::{Style, WhiteSpace};

    fn scene() -> Node {
        Node::new(Style::new()).with_child(Node::text(
            Style::new()
                .with_padding(10.0)
                .with_border_width(2.0)
                .with_font_size(16.0)
                .with_white_space(WhiteSpace::NoWrap),
            "Hi",
        ))
    }

    #[test]
    fn test_draw_lays_out_then_overlays() {
        let mut renderer = CanvasRenderer::new(RecordingCanvas::new(800, 600), scene());
        let stats = renderer.draw().unwrap();

        assert_eq!(stats.nodes, 2);
        let root = renderer.root().layout.unwrap();
        assert!((root.width - 800.0).abs() < 0.001);
        assert!(renderer.root().children[0].layout.unwrap().height >= 40.0 - 0.001);

        let commands = renderer.canvas().commands();
        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0
            }
        );
        assert_eq!(renderer.canvas().texts().count(), 1);
        assert_eq!(renderer.canvas().state_depth(), 0);
    }

    #[test]
    fn test_non_debug_only_clears() {
        let options = RendererOptions::default().with_debug_draw(false);
        let mut renderer =
            CanvasRenderer::with_options(RecordingCanvas::new(100, 100), scene(), options);
        renderer.draw().unwrap();

        assert_eq!(renderer.canvas().commands().len(), 1);
        assert!(renderer.root().children[0].layout.is_some());
    }

    #[test]
    fn test_resize_changes_root_size() {
        let mut renderer = CanvasRenderer::new(RecordingCanvas::new(100, 100), scene());
        renderer.draw().unwrap();
        renderer.resize(320, 240);
        renderer.draw().unwrap();

        let root = renderer.root().layout.unwrap();
        assert!((root.width - 320.0).abs() < 0.001);
        assert!((root.height - 240.0).abs() < 0.001);
    }

    #[test]
    fn test_text_removed_between_frames() {
        let mut renderer = CanvasRenderer::new(RecordingCanvas::new(800, 600), scene());
        renderer.draw().unwrap();
        assert!(renderer.engine().is_measured(1));

        renderer.root_mut().children[0].set_text(None);
        renderer.canvas_mut().take_commands();
        let stats = renderer.draw().unwrap();

        assert_eq!(stats.measured, 0);
        assert!(!renderer.engine().is_measured(1));
        assert_eq!(renderer.canvas().texts().count(), 0);
    }
}
