//! A canvas that records a display list instead of pixels.

use trellis_core::{Color, CornerRadii, FontSpec};
use trellis_layout::{EstimatedMetrics, TextMeasurer};

use crate::canvas::{Canvas, DashPattern, PathOp, PathRecorder, StateStack};

/// A recorded drawing operation, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Reset a region to transparent
    Clear {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Stroke a path
    Stroke {
        path: Vec<PathOp>,
        color: Color,
        line_width: f64,
        dash: DashPattern,
    },
    /// Fill a rectangle
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    /// Draw a line of text at a baseline position
    FillText {
        text: String,
        x: f64,
        y: f64,
        font: FontSpec,
        color: Color,
    },
}

/// Records every drawing call as a [`DrawCommand`].
///
/// Stroking an empty path draws nothing and records nothing.
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    state: StateStack,
    path: PathRecorder,
    commands: Vec<DrawCommand>,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for RecordingCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("commands", &self.commands.len())
            .finish()
    }
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            state: StateStack::new(),
            path: PathRecorder::new(),
            commands: Vec::new(),
            measurer: Box::new(EstimatedMetrics::default()),
        }
    }

    /// Use a different source of text metrics.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drop everything recorded so far.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of saved states not yet restored.
    pub fn state_depth(&self) -> usize {
        self.state.depth()
    }

    /// Recorded strokes as `(path, color, dash)`.
    pub fn strokes(&self) -> impl Iterator<Item = (&[PathOp], Color, &[f64])> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Stroke {
                path, color, dash, ..
            } => Some((path.as_slice(), *color, dash.as_slice())),
            _ => None,
        })
    }

    /// Recorded filled rectangles as `(x, y, width, height)`.
    pub fn fill_rects(&self) -> impl Iterator<Item = (f64, f64, f64, f64)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillRect {
                x, y, width, height, ..
            } => Some((*x, *y, *width, *height)),
            _ => None,
        })
    }

    /// Recorded text as `(text, x, y)`.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f64, f64)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText { text, x, y, .. } => Some((text.as_str(), *x, *y)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.state.translate(x, y);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.current_mut().stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.current_mut().fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.current_mut().line_width = width;
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.state.current_mut().line_dash = DashPattern::from_slice(dash);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.state.current_mut().font = font.clone();
    }

    fn font(&self) -> &FontSpec {
        &self.state.current().font
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.move_to(self.state.current(), x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.line_to(self.state.current(), x, y);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.path.rect(self.state.current(), x, y, width, height);
    }

    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radii: CornerRadii) {
        self.path
            .round_rect(self.state.current(), x, y, width, height, radii);
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let state = self.state.current();
        self.commands.push(DrawCommand::Stroke {
            path: self.path.ops().to_vec(),
            color: state.stroke_color,
            line_width: state.line_width,
            dash: state.line_dash.clone(),
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let state = self.state.current();
        let origin = state.to_canvas(x, y);
        self.commands.push(DrawCommand::FillRect {
            x: origin.x,
            y: origin.y,
            width,
            height,
            color: state.fill_color,
        });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let origin = self.state.current().to_canvas(x, y);
        self.commands.push(DrawCommand::Clear {
            x: origin.x,
            y: origin.y,
            width,
            height,
        });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let state = self.state.current();
        let origin = state.to_canvas(x, y);
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x: origin.x,
            y: origin.y,
            font: state.font.clone(),
            color: state.fill_color,
        });
    }

    fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }
}
