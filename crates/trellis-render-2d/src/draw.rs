//! Path-building helpers used by the debug overlay.
//!
//! The shape helpers only add to the current path; callers begin and stroke
//! it themselves. `inset` is the stroke width the shape must fit inside: the
//! shape shrinks by half of it on every side so the stroke stays within the
//! box.

use trellis_core::CornerRadii;
use trellis_layout::{layout_lines, TextOptions};

use crate::canvas::Canvas;

/// Axis-aligned rectangle.
pub fn rect<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    inset: f64,
) {
    let half = inset * 0.5;
    canvas.rect(x + half, y + half, width - inset, height - inset);
}

/// Rounded rectangle with the same radius on every corner.
pub fn rounded_rect_uniform<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
    inset: f64,
) {
    rounded_rect_corners(
        canvas,
        x,
        y,
        width,
        height,
        CornerRadii::uniform(radius),
        inset,
    );
}

/// Rounded rectangle with independent corner radii.
pub fn rounded_rect_corners<C: Canvas + ?Sized>(
    canvas: &mut C,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radii: CornerRadii,
    inset: f64,
) {
    let half = inset * 0.5;
    canvas.round_rect(
        x + half,
        y + half,
        width - inset,
        height - inset,
        radii.shrink(half),
    );
}

/// Line segment from `(x0, y0)` to `(x1, y1)`.
pub fn line<C: Canvas + ?Sized>(canvas: &mut C, x0: f64, y0: f64, x1: f64, y1: f64) {
    canvas.move_to(x0, y0);
    canvas.line_to(x1, y1);
}

/// Horizontal line at `y` from `x0` to `x1`.
pub fn line_h<C: Canvas + ?Sized>(canvas: &mut C, x0: f64, x1: f64, y: f64) {
    line(canvas, x0, y, x1, y);
}

/// Vertical line at `x` from `y0` to `y1`.
pub fn line_v<C: Canvas + ?Sized>(canvas: &mut C, x: f64, y0: f64, y1: f64) {
    line(canvas, x, y0, x, y1);
}

/// Draw wrapped text with its first baseline at `(x, y)`.
///
/// Lines wrap at `options.max_width`, advance by the line height and are
/// aligned inside the wrap width. Uses the canvas's current font.
pub fn fill_text_multiline<C: Canvas + ?Sized>(
    canvas: &mut C,
    text: &str,
    x: f64,
    y: f64,
    options: &TextOptions,
) {
    let lines = layout_lines(canvas.measurer(), text, options);
    for line in lines {
        if line.text.is_empty() {
            continue;
        }
        canvas.fill_text(&line.text, x + line.x, y + line.y);
    }
}
