//! The drawing surface abstraction.
//!
//! A [`Canvas`] behaves like an HTML canvas 2D context reduced to what the
//! box-model overlay needs: a save/restore state stack, translation, dashed
//! strokes, solid fills and text.

use glam::{DAffine2, DVec2};
use smallvec::SmallVec;
use trellis_core::{Color, CornerRadii, FontSpec, DEFAULT_FONT_FAMILY};
use trellis_layout::TextMeasurer;

/// Dash pattern storage; patterns are almost always two entries long.
pub type DashPattern = SmallVec<[f64; 4]>;

/// Everything `save` captures and `restore` brings back.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub transform: DAffine2,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub line_width: f64,
    pub line_dash: DashPattern,
    pub font: FontSpec,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 1.0,
            line_dash: DashPattern::new(),
            font: FontSpec::new(10.0, DEFAULT_FONT_FAMILY),
        }
    }
}

impl DrawState {
    /// Map a point from the current frame to canvas coordinates.
    pub fn to_canvas(&self, x: f64, y: f64) -> DVec2 {
        self.transform.transform_point2(DVec2::new(x, y))
    }
}

/// Current state plus the saved stack.
#[derive(Debug, Clone, Default)]
pub struct StateStack {
    current: DrawState,
    saved: Vec<DrawState>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &DrawState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut DrawState {
        &mut self.current
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pop the last saved state; an unbalanced restore is ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.current = state;
        }
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.current.transform =
            self.current.transform * DAffine2::from_translation(DVec2::new(x, y));
    }

    /// Number of states currently saved.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }
}

/// One element of the current path, in canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOp {
    MoveTo(DVec2),
    LineTo(DVec2),
    Close,
    Rect {
        origin: DVec2,
        size: DVec2,
    },
    RoundRect {
        origin: DVec2,
        size: DVec2,
        radii: CornerRadii,
    },
}

/// Path under construction, recorded in canvas coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathRecorder {
    ops: Vec<PathOp>,
}

impl PathRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn move_to(&mut self, state: &DrawState, x: f64, y: f64) {
        self.ops.push(PathOp::MoveTo(state.to_canvas(x, y)));
    }

    pub fn line_to(&mut self, state: &DrawState, x: f64, y: f64) {
        self.ops.push(PathOp::LineTo(state.to_canvas(x, y)));
    }

    pub fn close(&mut self) {
        self.ops.push(PathOp::Close);
    }

    pub fn rect(&mut self, state: &DrawState, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(PathOp::Rect {
            origin: state.to_canvas(x, y),
            size: state.transform.transform_vector2(DVec2::new(width, height)),
        });
    }

    pub fn round_rect(
        &mut self,
        state: &DrawState,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radii: CornerRadii,
    ) {
        self.ops.push(PathOp::RoundRect {
            origin: state.to_canvas(x, y),
            size: state.transform.transform_vector2(DVec2::new(width, height)),
            radii,
        });
    }
}

/// A 2D drawing context.
///
/// Path and shape coordinates are interpreted in the current frame, as set
/// up by [`translate`](Canvas::translate). `save` and `restore` cover the
/// transform, colours, line width, dash pattern and font.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Change the surface size. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);

    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    /// An empty pattern draws solid lines.
    fn set_line_dash(&mut self, dash: &[f64]);
    fn set_font(&mut self, font: &FontSpec);
    fn font(&self) -> &FontSpec;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radii: CornerRadii);
    /// Stroke the current path with the current stroke style.
    fn stroke(&mut self);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Reset a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Draw one line of text with its baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Metrics used both for layout and for drawing text on this canvas.
    fn measurer(&self) -> &dyn TextMeasurer;

    /// Width of `text` in the current font.
    fn measure_text(&self, text: &str) -> f64 {
        self.measurer().line_width(text, self.font())
    }
}
