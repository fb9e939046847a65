//! Path construction and tessellation for the software canvas.

use lyon::geom::{point, Box2D};
use lyon::math::Point;
use lyon::path::builder::BorderRadii;
use lyon::path::iterator::PathIterator;
use lyon::path::{Path, PathEvent, Winding};
use lyon::tessellation::{
    BuffersBuilder, LineCap, LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex,
    VertexBuffers,
};
use trellis_core::Color;

use crate::canvas::PathOp;

/// Flattening tolerance for curves, in pixels.
const TOLERANCE: f32 = 0.1;

/// A vertex for rendering.
#[derive(Debug, Clone, Copy, Default)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Tessellated mesh ready for rasterization.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

fn color_array(color: Color) -> [f32; 4] {
    [color.r, color.g, color.b, color.a]
}

/// Converts fills and strokes into triangles.
pub struct Tessellator {
    stroke_tessellator: StrokeTessellator,
}

impl Default for Tessellator {
    fn default() -> Self {
        Self::new()
    }
}

impl Tessellator {
    pub fn new() -> Self {
        Self {
            stroke_tessellator: StrokeTessellator::new(),
        }
    }

    /// Two triangles covering an axis-aligned rectangle.
    pub fn tessellate_rect_fill(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        mesh: &mut Mesh,
    ) {
        let color = color_array(color);
        let base = mesh.vertices.len() as u32;

        mesh.vertices.push(Vertex::new(x, y, color));
        mesh.vertices.push(Vertex::new(x + width, y, color));
        mesh.vertices.push(Vertex::new(x + width, y + height, color));
        mesh.vertices.push(Vertex::new(x, y + height, color));

        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Stroke `ops`, splitting the outline into dashes when `dash` is a
    /// usable pattern. Dashes outside `clip` are skipped.
    pub fn tessellate_stroke(
        &mut self,
        ops: &[PathOp],
        color: Color,
        line_width: f32,
        dash: &[f64],
        clip: Option<&Box2D<f32>>,
        mesh: &mut Mesh,
    ) {
        let path = build_path(ops);
        match dash_pattern(dash) {
            Some(pattern) => {
                let mut builder = Path::builder();
                for polyline in polylines(&path) {
                    for dash in apply_dash(&polyline, &pattern, clip) {
                        builder.begin(dash[0]);
                        for &p in &dash[1..] {
                            builder.line_to(p);
                        }
                        builder.end(false);
                    }
                }
                self.stroke_path(&builder.build(), color, line_width, mesh);
            }
            None => self.stroke_path(&path, color, line_width, mesh),
        }
    }

    fn stroke_path(&mut self, path: &Path, color: Color, line_width: f32, mesh: &mut Mesh) {
        let color = color_array(color);
        let mut buffers: VertexBuffers<Vertex, u32> = VertexBuffers::new();

        let options = StrokeOptions::default()
            .with_line_width(line_width)
            .with_line_cap(LineCap::Butt)
            .with_line_join(LineJoin::Miter);

        let result = self.stroke_tessellator.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut buffers, |vertex: StrokeVertex| {
                Vertex::new(vertex.position().x, vertex.position().y, color)
            }),
        );

        match result {
            Ok(()) => {
                let base = mesh.vertices.len() as u32;
                mesh.vertices.extend(buffers.vertices);
                mesh.indices.extend(buffers.indices.iter().map(|i| i + base));
            }
            Err(err) => tracing::trace!(?err, "stroke tessellation failed"),
        }
    }
}

/// Normalized corners of a rectangle given by origin and possibly negative
/// size.
fn normalized_box(x: f64, y: f64, width: f64, height: f64) -> Box2D<f32> {
    let (x0, x1) = (x.min(x + width), x.max(x + width));
    let (y0, y1) = (y.min(y + height), y.max(y + height));
    Box2D::new(point(x0 as f32, y0 as f32), point(x1 as f32, y1 as f32))
}

/// Build a lyon path from recorded path operations.
///
/// A `LineTo` without an open subpath starts one, as on an HTML canvas.
pub fn build_path(ops: &[PathOp]) -> Path {
    let mut builder = Path::builder();
    let mut open = false;

    for op in ops {
        match op {
            PathOp::MoveTo(p) => {
                if open {
                    builder.end(false);
                }
                builder.begin(point(p.x as f32, p.y as f32));
                open = true;
            }
            PathOp::LineTo(p) => {
                let p = point(p.x as f32, p.y as f32);
                if open {
                    builder.line_to(p);
                } else {
                    builder.begin(p);
                    open = true;
                }
            }
            PathOp::Close => {
                if open {
                    builder.close();
                    open = false;
                }
            }
            PathOp::Rect { origin, size } => {
                if open {
                    builder.end(false);
                    open = false;
                }
                let rect = normalized_box(origin.x, origin.y, size.x, size.y);
                builder.add_rectangle(&rect, Winding::Positive);
            }
            PathOp::RoundRect {
                origin,
                size,
                radii,
            } => {
                if open {
                    builder.end(false);
                    open = false;
                }
                let rect = normalized_box(origin.x, origin.y, size.x, size.y);
                let radii = BorderRadii {
                    top_left: radii.top_left as f32,
                    top_right: radii.top_right as f32,
                    bottom_left: radii.bottom_left as f32,
                    bottom_right: radii.bottom_right as f32,
                };
                builder.add_rounded_rectangle(&rect, &radii, Winding::Positive);
            }
        }
    }

    if open {
        builder.end(false);
    }
    builder.build()
}

/// Flatten a path into polylines; closed subpaths repeat their first point.
pub fn polylines(path: &Path) -> Vec<Vec<Point>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();

    for event in path.iter().flattened(TOLERANCE) {
        match event {
            PathEvent::Begin { at } => current = vec![at],
            PathEvent::Line { to, .. } => current.push(to),
            PathEvent::End { first, close, .. } => {
                if close {
                    current.push(first);
                }
                lines.push(std::mem::take(&mut current));
            }
            _ => {}
        }
    }

    lines
}

/// A dash pattern usable for splitting, or `None` for a solid line.
///
/// Odd-length patterns repeat once, like on an HTML canvas. Patterns with
/// negative or non-finite entries, or a period shorter than
/// [`MIN_DASH_PERIOD`], draw solid.
pub fn dash_pattern(dash: &[f64]) -> Option<Vec<f32>> {
    if !splits(dash.iter().copied()) {
        return None;
    }
    let mut pattern: Vec<f32> = dash.iter().map(|&d| d as f32).collect();
    if pattern.len() % 2 == 1 {
        pattern.extend_from_within(..);
    }
    Some(pattern)
}

/// Shortest dash period, in pixels, that is still split into dashes.
pub const MIN_DASH_PERIOD: f64 = 0.1;

fn splits(mut dash: impl Iterator<Item = f64> + Clone) -> bool {
    dash.clone().sum::<f64>() >= MIN_DASH_PERIOD && dash.all(|d| d.is_finite() && d >= 0.0)
}

/// Position within a dash pattern.
struct DashCursor<'a> {
    pattern: &'a [f32],
    period: f64,
    index: usize,
    remaining: f64,
    on: bool,
}

impl<'a> DashCursor<'a> {
    fn new(pattern: &'a [f32]) -> Self {
        let sum: f64 = pattern.iter().map(|&d| d as f64).sum();
        Self {
            pattern,
            // odd patterns only return to the same on/off phase after two passes
            period: if pattern.len() % 2 == 1 { 2.0 * sum } else { sum },
            index: 0,
            remaining: pattern[0] as f64,
            on: true,
        }
    }

    fn advance(&mut self) {
        self.index = (self.index + 1) % self.pattern.len();
        self.remaining = self.pattern[self.index] as f64;
        self.on = !self.on;
    }

    /// Advance without emitting geometry. Whole periods leave the phase
    /// unchanged.
    fn skip(&mut self, distance: f64) {
        let mut distance = if self.period > 0.0 && distance >= self.period {
            distance % self.period
        } else {
            distance
        };
        while distance > self.remaining {
            distance -= self.remaining;
            self.advance();
        }
        self.remaining -= distance;
    }
}

/// Parametric range of the segment `start..end` inside `bounds`
/// (Liang-Barsky).
fn clip_segment(start: Point, end: Point, bounds: &Box2D<f32>) -> Option<(f64, f64)> {
    let (x0, y0) = (start.x as f64, start.y as f64);
    let (dx, dy) = (end.x as f64 - x0, end.y as f64 - y0);
    let (min, max) = (bounds.min, bounds.max);

    let mut t0 = 0.0;
    let mut t1 = 1.0;
    for (p, q) in [
        (-dx, x0 - min.x as f64),
        (dx, max.x as f64 - x0),
        (-dy, y0 - min.y as f64),
        (dy, max.y as f64 - y0),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = f64::max(t0, r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = f64::min(t1, r);
        }
    }
    Some((t0, t1))
}

fn end_dash(current: &mut Vec<Point>, dashes: &mut Vec<Vec<Point>>) {
    if current.len() > 1 {
        dashes.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Split a polyline into its "on" dashes. The pattern restarts at the first
/// point.
///
/// With `clip`, only the parts of each segment inside it produce dashes;
/// the pattern still advances across the hidden parts, so visible dashes
/// keep their phase.
pub fn apply_dash(
    polyline: &[Point],
    pattern: &[f32],
    clip: Option<&Box2D<f32>>,
) -> Vec<Vec<Point>> {
    let mut dashes = Vec::new();
    if polyline.len() < 2 {
        return dashes;
    }
    if !splits(pattern.iter().map(|&d| d as f64)) {
        dashes.push(polyline.to_vec());
        return dashes;
    }

    let mut cursor = DashCursor::new(pattern);
    let mut current: Vec<Point> = Vec::new();

    for pair in polyline.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let (x0, y0) = (start.x as f64, start.y as f64);
        let (dx, dy) = (end.x as f64 - x0, end.y as f64 - y0);
        let length = dx.hypot(dy);
        if length <= 0.0 {
            continue;
        }

        let visible = match clip {
            Some(bounds) => clip_segment(start, end, bounds),
            None => Some((0.0, 1.0)),
        };
        let Some((t0, t1)) = visible else {
            end_dash(&mut current, &mut dashes);
            cursor.skip(length);
            continue;
        };

        let at = |distance: f64| {
            if distance >= length {
                end
            } else {
                let t = distance / length;
                point((x0 + dx * t) as f32, (y0 + dy * t) as f32)
            }
        };

        let mut travelled = t0 * length;
        let stop = t1 * length;
        if t0 > 0.0 {
            end_dash(&mut current, &mut dashes);
            cursor.skip(travelled);
        }
        if cursor.on && current.is_empty() {
            current.push(at(travelled));
        }

        while stop - travelled > cursor.remaining {
            travelled += cursor.remaining;
            let p = at(travelled);
            if cursor.on {
                current.push(p);
                end_dash(&mut current, &mut dashes);
            } else {
                current.clear();
                current.push(p);
            }
            cursor.advance();
        }

        cursor.remaining -= stop - travelled;
        if cursor.on {
            current.push(at(stop));
        }

        if t1 < 1.0 {
            end_dash(&mut current, &mut dashes);
            cursor.skip(length - stop);
        }
    }

    end_dash(&mut current, &mut dashes);
    dashes
}
