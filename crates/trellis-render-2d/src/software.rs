//! Software rasterizer canvas for headless rendering.

use glam::DVec2;
use lyon::geom::{point, Box2D};
use trellis_core::{Color, CornerRadii, FontSpec, RenderError};
use trellis_layout::{EstimatedMetrics, TextMeasurer};

use crate::canvas::{Canvas, DashPattern, PathRecorder, StateStack};
use crate::shapes::{Mesh, Tessellator, Vertex};

/// Fraction of the font size a glyph cell rises above the baseline.
const GLYPH_ASCENT: f64 = 0.7;

/// Largest side length [`SoftwareCanvas::try_new`] accepts.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// An RGBA8 canvas drawn on the CPU.
///
/// Shapes are tessellated with lyon and rasterized with edge functions.
/// Glyphs are drawn as solid cells as wide as the measurer says, so drawn
/// text always occupies its measured width. The buffer starts transparent.
pub struct SoftwareCanvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
    state: StateStack,
    path: PathRecorder,
    tessellator: Tessellator,
    mesh: Mesh,
    measurer: Box<dyn TextMeasurer>,
}

impl std::fmt::Debug for SoftwareCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoftwareCanvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl SoftwareCanvas {
    /// Create a transparent canvas of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; (width as usize) * (height as usize) * 4],
            state: StateStack::new(),
            path: PathRecorder::new(),
            tessellator: Tessellator::new(),
            mesh: Mesh::new(),
            measurer: Box::new(EstimatedMetrics::default()),
        }
    }

    /// Create a canvas, rejecting empty or oversized surfaces.
    pub fn try_new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 || width > MAX_CANVAS_SIDE || height > MAX_CANVAS_SIDE {
            return Err(RenderError::InvalidCanvasSize { width, height });
        }
        Ok(Self::new(width, height))
    }

    /// Use a different source of text metrics.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        self
    }

    /// Raw RGBA8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    /// RGBA of one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let px = &self.buffer[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Fill the whole buffer with one colour, ignoring the transform.
    pub fn fill_all(&mut self, color: Color) {
        let (r, g, b, a) = color.to_rgba8();
        for chunk in self.buffer.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[r, g, b, a]);
        }
    }

    fn fill_canvas_rect(&mut self, origin: DVec2, size: DVec2, color: Color) {
        self.mesh.clear();
        self.tessellator.tessellate_rect_fill(
            origin.x as f32,
            origin.y as f32,
            size.x as f32,
            size.y as f32,
            color,
            &mut self.mesh,
        );
        self.rasterize_mesh();
    }

    /// Rasterize the scratch mesh to the buffer.
    fn rasterize_mesh(&mut self) {
        let mesh = std::mem::take(&mut self.mesh);
        for triangle in mesh.indices.chunks_exact(3) {
            let v0 = &mesh.vertices[triangle[0] as usize];
            let v1 = &mesh.vertices[triangle[1] as usize];
            let v2 = &mesh.vertices[triangle[2] as usize];
            self.rasterize_triangle(v0, v1, v2);
        }
        self.mesh = mesh;
    }

    /// Rasterize a single triangle using edge functions, sampling pixel
    /// centres.
    fn rasterize_triangle(&mut self, v0: &Vertex, v1: &Vertex, v2: &Vertex) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let min_x = v0.position[0].min(v1.position[0]).min(v2.position[0]).floor().max(0.0) as i32;
        let max_x = v0.position[0]
            .max(v1.position[0])
            .max(v2.position[0])
            .ceil()
            .min(self.width as f32 - 1.0) as i32;
        let min_y = v0.position[1].min(v1.position[1]).min(v2.position[1]).floor().max(0.0) as i32;
        let max_y = v0.position[1]
            .max(v1.position[1])
            .max(v2.position[1])
            .ceil()
            .min(self.height as f32 - 1.0) as i32;

        let area = edge_function(v0.position, v1.position, v2.position);
        if area.abs() < 0.0001 {
            return;
        }
        let inv_area = 1.0 / area;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = [x as f32 + 0.5, y as f32 + 0.5];

                let w0 = edge_function(v1.position, v2.position, p);
                let w1 = edge_function(v2.position, v0.position, p);
                let w2 = edge_function(v0.position, v1.position, p);

                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if !inside {
                    continue;
                }

                let (b0, b1, b2) = (w0 * inv_area, w1 * inv_area, w2 * inv_area);
                let mut color = [0.0; 4];
                for (i, channel) in color.iter_mut().enumerate() {
                    *channel = (v0.color[i] * b0 + v1.color[i] * b1 + v2.color[i] * b2)
                        .clamp(0.0, 1.0);
                }
                self.blend_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Source-over compositing of a straight-alpha colour.
    fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let Some(dst) = self.buffer.get_mut(idx..idx + 4) else {
            return;
        };

        let src_a = color[3];
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        for i in 0..3 {
            let dst_c = dst[i] as f32 / 255.0;
            let out = (color[i] * src_a + dst_c * dst_a * (1.0 - src_a)) / out_a;
            dst[i] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        dst[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
}

/// Edge function for triangle rasterization.
/// Positive when `p` lies to the left of the edge `(a, b)`.
#[inline]
fn edge_function(a: [f32; 2], b: [f32; 2], p: [f32; 2]) -> f32 {
    (p[0] - a[0]) * (b[1] - a[1]) - (p[1] - a[1]) * (b[0] - a[0])
}

impl Canvas for SoftwareCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.buffer = vec![0; (width as usize) * (height as usize) * 4];
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
        if state.line_width <= 0.0 || !state.line_width.is_finite() {
            return;
        }

        // dashes beyond the surface are never split out
        let margin = state.line_width as f32;
        let clip = Box2D::new(
            point(-margin, -margin),
            point(self.width as f32 + margin, self.height as f32 + margin),
        );

        self.mesh.clear();
        self.tessellator.tessellate_stroke(
            self.path.ops(),
            state.stroke_color,
            state.line_width as f32,
            &state.line_dash,
            Some(&clip),
            &mut self.mesh,
        );
        self.rasterize_mesh();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let state = self.state.current();
        let origin = state.to_canvas(x, y);
        let size = state.transform.transform_vector2(DVec2::new(width, height));
        let color = state.fill_color;
        self.fill_canvas_rect(origin, size, color);
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let state = self.state.current();
        let a = state.to_canvas(x, y);
        let b = state.to_canvas(x + width, y + height);

        let clamp_x = |v: f64| v.clamp(0.0, self.width as f64) as usize;
        let clamp_y = |v: f64| v.clamp(0.0, self.height as f64) as usize;
        let (x0, x1) = (clamp_x(a.x.min(b.x).floor()), clamp_x(a.x.max(b.x).ceil()));
        let (y0, y1) = (clamp_y(a.y.min(b.y).floor()), clamp_y(a.y.max(b.y).ceil()));

        let row = self.width as usize * 4;
        for y in y0..y1 {
            self.buffer[y * row + x0 * 4..y * row + x1 * 4].fill(0);
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let state = self.state.current();
        let font = state.font.clone();
        let color = state.fill_color;
        let baseline = state.to_canvas(x, y);

        let ascent = font.size * GLYPH_ASCENT;
        let mut pen = baseline.x;
        let mut glyph = [0u8; 4];

        for c in text.chars() {
            let advance = self.measurer.line_width(c.encode_utf8(&mut glyph), &font);
            if !c.is_whitespace() {
                let cell = DVec2::new(pen + advance * 0.1, baseline.y - ascent);
                self.fill_canvas_rect(cell, DVec2::new(advance * 0.8, ascent), color);
            }
            pen += advance;
        }
    }

    fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }
}
