//! Box-model debug overlay.
//!
//! [`draw_node_debug`] walks a laid-out tree and, for each node, draws its
//! padding guides, margin guides, border, outer box, origin marker and text
//! inside a frame translated to the node's position. Children are drawn in
//! the parent's frame so their offsets compose.

use trellis_core::{Color, Insets, Layout, Node, Style, WhiteSpace};
use trellis_layout::{wrap_width, TextOptions};

use crate::canvas::Canvas;
use crate::draw::{fill_text_multiline, line_h, line_v, rect, rounded_rect_corners, rounded_rect_uniform};
use crate::frame::CanvasFrame;

/// Colour and dash pattern of one kind of guide.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuideStyle {
    pub color: Color,
    /// Empty for solid lines
    pub dash: Vec<f64>,
}

impl GuideStyle {
    pub fn new(color: Color, dash: &[f64]) -> Self {
        Self {
            color,
            dash: dash.to_vec(),
        }
    }

    pub fn solid(color: Color) -> Self {
        Self::new(color, &[])
    }

    fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.set_stroke_color(self.color);
        canvas.set_line_dash(&self.dash);
    }
}

/// Colours and sizes of the debug overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DebugPalette {
    pub padding: GuideStyle,
    pub margin_handles: GuideStyle,
    pub margin_frame: GuideStyle,
    pub border: GuideStyle,
    pub dimension: GuideStyle,
    /// Fill of the origin marker; text is drawn with the same fill
    pub origin: Color,
    /// Side of the square origin marker
    pub origin_size: f64,
    /// Upper bound on margin handle length
    pub max_handle: f64,
}

impl Default for DebugPalette {
    fn default() -> Self {
        Self {
            padding: GuideStyle::new(Color::GREEN, &[5.0, 5.0]),
            margin_handles: GuideStyle::new(Color::MAGENTA, &[2.0, 2.0]),
            margin_frame: GuideStyle::new(Color::GREEN, &[5.0, 5.0]),
            border: GuideStyle::solid(Color::YELLOW),
            dimension: GuideStyle::new(Color::RED, &[5.0, 5.0]),
            origin: Color::BLUE,
            origin_size: 5.0,
            max_handle: 20.0,
        }
    }
}

/// Draw `node` and its subtree onto `canvas`.
///
/// The canvas state is saved before the node's frame is entered and restored
/// when it is left, on every path out of this function. Nodes that have not
/// been laid out are drawn as a zero-sized box at their parent's origin.
pub fn draw_node_debug<C: Canvas + ?Sized>(canvas: &mut C, node: &Node, palette: &DebugPalette) {
    let layout = node.layout_or_default();
    let style = &node.style;

    let mut frame = CanvasFrame::enter(canvas, layout.left, layout.top);
    let canvas = &mut *frame;

    draw_padding(canvas, style, &layout, palette);
    draw_margin(canvas, style.margin_insets(), &layout, palette);
    draw_border(canvas, style, &layout, palette);

    palette.dimension.apply(canvas);
    draw_size(canvas, style, &layout, 0.0);

    canvas.set_fill_color(palette.origin);
    canvas.fill_rect(0.0, 0.0, palette.origin_size, palette.origin_size);

    if let Some(text) = node.text_content() {
        draw_text(canvas, style, text, &layout);
    }

    for child in &node.children {
        draw_node_debug(canvas, child, palette);
    }
}

/// Unified padding draws one inset rectangle; otherwise each non-zero side
/// gets its own guide line.
fn draw_padding<C: Canvas + ?Sized>(
    canvas: &mut C,
    style: &Style,
    layout: &Layout,
    palette: &DebugPalette,
) {
    let border = style.border_width();
    palette.padding.apply(canvas);
    canvas.begin_path();

    if let Some(padding) = style.unified_padding() {
        let inset = padding + border;
        rect(
            canvas,
            inset,
            inset,
            layout.width - inset * 2.0,
            layout.height - inset * 2.0,
            0.0,
        );
    } else {
        let padding = style.padding_insets();
        if padding.top != 0.0 {
            line_h(canvas, 0.0, layout.width, padding.top + border);
        }
        if padding.right != 0.0 {
            line_v(canvas, layout.width - border - padding.right, 0.0, layout.height);
        }
        if padding.bottom != 0.0 {
            line_h(canvas, 0.0, layout.width, layout.height - padding.bottom - border);
        }
        if padding.left != 0.0 {
            line_v(canvas, padding.left + border, 0.0, layout.height);
        }
    }

    canvas.stroke();
}

/// Margin handles and frame. Nothing is drawn unless every side is non-zero.
fn draw_margin<C: Canvas + ?Sized>(
    canvas: &mut C,
    margin: Insets,
    layout: &Layout,
    palette: &DebugPalette,
) {
    if margin.any_zero() {
        return;
    }
    let Insets {
        top,
        right,
        bottom,
        left,
    } = margin;
    let (width, height) = (layout.width, layout.height);

    let center_v = height * 0.5;
    let center_h = width * 0.5;
    let handle = width.min(height).min(palette.max_handle);
    let (handle_va, handle_vb) = (center_v - handle * 0.5, center_v + handle * 0.5);
    let (handle_ha, handle_hb) = (center_h - handle * 0.5, center_h + handle * 0.5);

    palette.margin_handles.apply(canvas);
    canvas.begin_path();
    line_v(canvas, -left, handle_va, handle_vb);
    line_v(canvas, 0.0, handle_va, handle_vb);
    line_h(canvas, -left, 0.0, center_v);
    line_v(canvas, width + right, handle_va, handle_vb);
    line_v(canvas, width, handle_va, handle_vb);
    line_h(canvas, width, width + right, center_v);
    line_h(canvas, handle_ha, handle_hb, -top);
    line_h(canvas, handle_ha, handle_hb, 0.0);
    line_v(canvas, center_h, -top, 0.0);
    line_h(canvas, handle_ha, handle_hb, height);
    line_h(canvas, handle_ha, handle_hb, height + bottom);
    line_v(canvas, center_h, height, height + bottom);
    canvas.stroke();

    palette.margin_frame.apply(canvas);
    canvas.begin_path();
    rect(
        canvas,
        -left,
        -top,
        width + right + left,
        height + bottom + top,
        0.0,
    );
    canvas.stroke();
}

fn draw_border<C: Canvas + ?Sized>(
    canvas: &mut C,
    style: &Style,
    layout: &Layout,
    palette: &DebugPalette,
) {
    let border = style.border_width();
    if border == 0.0 {
        return;
    }
    palette.border.apply(canvas);
    canvas.set_line_width(border);
    draw_size(canvas, style, layout, border);
    canvas.set_line_width(1.0);
}

/// Stroke the node's outer box, rounded when the style asks for it.
fn draw_size<C: Canvas + ?Sized>(canvas: &mut C, style: &Style, layout: &Layout, inset: f64) {
    canvas.begin_path();
    if let Some(radius) = style.unified_border_radius() {
        rounded_rect_uniform(canvas, 0.0, 0.0, layout.width, layout.height, radius, inset);
    } else {
        let radii = style.corner_radii();
        if radii.is_zero() {
            rect(canvas, 0.0, 0.0, layout.width, layout.height, inset);
        } else {
            rounded_rect_corners(canvas, 0.0, 0.0, layout.width, layout.height, radii, inset);
        }
    }
    canvas.stroke();
}

/// Draw the node's text at the content origin, wrapped exactly as it was
/// measured.
fn draw_text<C: Canvas + ?Sized>(canvas: &mut C, style: &Style, text: &str, layout: &Layout) {
    let font = style.font();
    let padding = style.padding_insets();
    let border = style.border_width();

    let x = border + padding.left;
    let y = border + padding.top + font.size - 2.0;

    canvas.set_font(&font);
    match style.white_space {
        WhiteSpace::NoWrap => canvas.fill_text(text, x, y),
        WhiteSpace::Normal => {
            let options = TextOptions::new(font, wrap_width(style, layout.width))
                .with_line_height(style.line_height())
                .with_text_align(style.text_align);
            fill_text_multiline(canvas, text, x, y, &options);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PathOp;
    use crate::recording::RecordingCanvas;
    use glam::DVec2;
    use trellis_core::CornerRadii;

    fn laid_out(style: Style, layout: Layout) -> Node {
        let mut node = Node::new(style);
        node.layout = Some(layout);
        node
    }

    fn draw(node: &Node) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(800, 600);
        draw_node_debug(&mut canvas, node, &DebugPalette::default());
        canvas
    }

    fn count_moves(path: &[PathOp]) -> usize {
        path.iter().filter(|op| matches!(op, PathOp::MoveTo(_))).count()
    }

    #[test]
    fn test_plain_node_draws_outline_and_origin() {
        let canvas = draw(&laid_out(Style::new(), Layout::new(10.0, 20.0, 100.0, 50.0)));

        let strokes: Vec<_> = canvas.strokes().collect();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].1, Color::RED);
        assert_eq!(
            strokes[0].0,
            &[PathOp::Rect {
                origin: DVec2::new(10.0, 20.0),
                size: DVec2::new(100.0, 50.0),
            }]
        );
        assert_eq!(canvas.fill_rects().collect::<Vec<_>>(), vec![(10.0, 20.0, 5.0, 5.0)]);
        assert_eq!(canvas.state_depth(), 0);
    }

    #[test]
    fn test_unified_padding_is_one_inset_rect() {
        let style = Style::new().with_padding(10.0).with_border_width(2.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let (path, color, dash) = canvas.strokes().next().unwrap();
        assert_eq!(color, Color::GREEN);
        assert_eq!(dash, &[5.0, 5.0]);
        assert_eq!(
            path,
            &[PathOp::Rect {
                origin: DVec2::new(12.0, 12.0),
                size: DVec2::new(76.0, 36.0),
            }]
        );
    }

    #[test]
    fn test_single_side_padding_is_one_vertical_line() {
        let mut style = Style::new();
        style.padding_left = Some(4.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let (path, _, _) = canvas.strokes().next().unwrap();
        assert_eq!(count_moves(path), 1);
        assert_eq!(
            path,
            &[
                PathOp::MoveTo(DVec2::new(4.0, 0.0)),
                PathOp::LineTo(DVec2::new(4.0, 60.0)),
            ]
        );
    }

    #[test]
    fn test_zero_unified_padding_falls_back_to_sides() {
        let style = Style::new().with_padding(0.0).with_padding_sides(3.0, 0.0, 3.0, 0.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let (path, color, _) = canvas.strokes().next().unwrap();
        assert_eq!(color, Color::GREEN);
        assert_eq!(count_moves(path), 2);
    }

    #[test]
    fn test_margin_skipped_when_any_side_zero() {
        let style = Style::new().with_margin_sides(10.0, 10.0, 0.0, 10.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        assert!(canvas.strokes().all(|(_, color, _)| color != Color::MAGENTA));
        // only the red outline
        assert_eq!(canvas.strokes().count(), 1);
    }

    #[test]
    fn test_margin_handles_and_frame() {
        let style = Style::new().with_margin(8.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 16.0)));

        let strokes: Vec<_> = canvas.strokes().collect();
        assert_eq!(strokes.len(), 3);

        let (handles, color, dash) = strokes[0];
        assert_eq!(color, Color::MAGENTA);
        assert_eq!(dash, &[2.0, 2.0]);
        assert_eq!(count_moves(handles), 12);
        // handle length is min(100, 16, 20) = 16, centred on the left edge
        assert_eq!(handles[0], PathOp::MoveTo(DVec2::new(-8.0, 0.0)));
        assert_eq!(handles[1], PathOp::LineTo(DVec2::new(-8.0, 16.0)));

        let (frame, color, _) = strokes[1];
        assert_eq!(color, Color::GREEN);
        assert_eq!(
            frame,
            &[PathOp::Rect {
                origin: DVec2::new(-8.0, -8.0),
                size: DVec2::new(116.0, 32.0),
            }]
        );
    }

    #[test]
    fn test_border_stroked_with_its_width() {
        let style = Style::new().with_border_width(4.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let border = canvas
            .commands()
            .iter()
            .find_map(|command| match command {
                crate::DrawCommand::Stroke {
                    path,
                    color,
                    line_width,
                    dash,
                } if *color == Color::YELLOW => Some((path.clone(), *line_width, dash.clone())),
                _ => None,
            })
            .unwrap();

        assert_eq!(border.1, 4.0);
        assert!(border.2.is_empty());
        assert_eq!(
            border.0,
            vec![PathOp::Rect {
                origin: DVec2::new(2.0, 2.0),
                size: DVec2::new(96.0, 56.0),
            }]
        );

        // outline after the border is back to width 1
        let last_width = canvas
            .commands()
            .iter()
            .filter_map(|command| match command {
                crate::DrawCommand::Stroke { line_width, .. } => Some(*line_width),
                _ => None,
            })
            .last();
        assert_eq!(last_width, Some(1.0));
    }

    #[test]
    fn test_uniform_radius_wins_over_corners() {
        let mut style = Style::new().with_border_radius(8.0);
        style.border_radius_top_left = Some(4.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let (path, _, _) = canvas.strokes().last().unwrap();
        match &path[0] {
            PathOp::RoundRect { radii, .. } => assert_eq!(*radii, CornerRadii::uniform(8.0)),
            other => panic!("expected rounded outline, got {other:?}"),
        }
    }

    #[test]
    fn test_corner_radii_used_without_uniform() {
        let mut style = Style::new();
        style.border_radius_top_right = Some(6.0);
        let canvas = draw(&laid_out(style, Layout::new(0.0, 0.0, 100.0, 60.0)));

        let (path, _, _) = canvas.strokes().last().unwrap();
        match &path[0] {
            PathOp::RoundRect { radii, .. } => {
                assert_eq!(*radii, CornerRadii::new(0.0, 6.0, 0.0, 0.0))
            }
            other => panic!("expected rounded outline, got {other:?}"),
        }
    }

    #[test]
    fn test_nowrap_text_baseline() {
        let style = Style::new()
            .with_padding(10.0)
            .with_border_width(2.0)
            .with_font_size(16.0)
            .with_white_space(WhiteSpace::NoWrap);
        let mut node = laid_out(style, Layout::new(0.0, 0.0, 800.0, 40.0));
        node.set_text(Some("Hi".to_string()));

        let canvas = draw(&node);
        let texts: Vec<_> = canvas.texts().collect();
        assert_eq!(texts, vec![("Hi", 12.0, 26.0)]);
    }

    #[test]
    fn test_text_uses_origin_fill() {
        let node = laid_out(Style::new().with_font_size(10.0), Layout::new(0.0, 0.0, 200.0, 20.0))
            .with_text("label");
        let canvas = draw(&node);

        let color = canvas.commands().iter().find_map(|command| match command {
            crate::DrawCommand::FillText { color, font, .. } => Some((*color, font.size)),
            _ => None,
        });
        assert_eq!(color, Some((Color::BLUE, 10.0)));
    }

    #[test]
    fn test_children_compose_offsets() {
        let grandchild = laid_out(Style::new(), Layout::new(3.0, 4.0, 10.0, 10.0));
        let child =
            laid_out(Style::new(), Layout::new(20.0, 30.0, 50.0, 50.0)).with_child(grandchild);
        let sibling = laid_out(Style::new(), Layout::new(1.0, 1.0, 5.0, 5.0));
        let root = laid_out(Style::new(), Layout::new(100.0, 200.0, 300.0, 300.0))
            .with_child(child)
            .with_child(sibling);

        let canvas = draw(&root);
        let origins: Vec<_> = canvas.fill_rects().map(|(x, y, _, _)| (x, y)).collect();
        assert_eq!(
            origins,
            vec![(100.0, 200.0), (120.0, 230.0), (123.0, 234.0), (101.0, 201.0)]
        );
        assert_eq!(canvas.state_depth(), 0);
    }

    #[test]
    fn test_missing_layout_drawn_at_parent_origin() {
        let root = laid_out(Style::new(), Layout::new(7.0, 9.0, 30.0, 30.0))
            .with_child(Node::new(Style::new()));
        let canvas = draw(&root);

        let origins: Vec<_> = canvas.fill_rects().map(|(x, y, _, _)| (x, y)).collect();
        assert_eq!(origins, vec![(7.0, 9.0), (7.0, 9.0)]);
    }
}
