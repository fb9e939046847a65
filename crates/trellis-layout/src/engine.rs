//! Layout invocation over the external flexbox engine.
//!
//! Each pass rebuilds the engine's tree from the node tree in pre-order. A
//! node with non-empty text gets a [`MeasureContext`] attached; every other
//! node has its context explicitly cleared, so a node that stopped carrying
//! text can never keep measuring like a text node.

use taffy::style_helpers::{auto, length};
use taffy::{AvailableSpace, TaffyTree};
use trellis_core::{
    AlignItems, FlexDirection, FlexWrap, Insets, JustifyContent, Layout, LayoutError, Node,
    PositionType, Style,
};

use crate::measure::{MeasureConstraint, MeasureContext};
use crate::text::TextMeasurer;

/// Summary of one layout pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Nodes laid out
    pub nodes: usize,
    /// Nodes that carried a measure context
    pub measured: usize,
}

/// Wraps the flexbox engine and keeps its tree in sync with a [`Node`] tree.
pub struct LayoutEngine {
    taffy: TaffyTree<MeasureContext>,
    /// Engine node for each tree node, in pre-order
    nodes: Vec<taffy::NodeId>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

fn engine_error(err: taffy::TaffyError) -> LayoutError {
    LayoutError::EngineFailed {
        reason: err.to_string(),
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        let mut taffy = TaffyTree::new();
        // layouts keep the fractional widths text is drawn at
        taffy.disable_rounding();
        Self {
            taffy,
            nodes: Vec::new(),
        }
    }

    /// Lay out `root` inside a viewport and write a [`Layout`] into every node.
    ///
    /// The root is sized to the viewport. Engine failures abort the pass and
    /// leave previous layouts in place.
    pub fn compute_layout<M: TextMeasurer + ?Sized>(
        &mut self,
        root: &mut Node,
        viewport_width: f64,
        viewport_height: f64,
        measurer: &M,
    ) -> Result<LayoutStats, LayoutError> {
        if !viewport_width.is_finite()
            || !viewport_height.is_finite()
            || viewport_width < 0.0
            || viewport_height < 0.0
        {
            return Err(LayoutError::InvalidViewport {
                width: viewport_width,
                height: viewport_height,
            });
        }

        self.taffy.clear();
        self.nodes.clear();

        let root_id = self.attach(root)?;

        let mut root_style = to_taffy_style(&root.style);
        root_style.size = taffy::Size {
            width: length(viewport_width as f32),
            height: length(viewport_height as f32),
        };
        self.taffy.set_style(root_id, root_style).map_err(engine_error)?;

        let stats = LayoutStats {
            nodes: self.nodes.len(),
            measured: self.measured_count(),
        };
        tracing::debug!(
            nodes = stats.nodes,
            measured = stats.measured,
            viewport_width,
            viewport_height,
            "computing layout"
        );

        let available = taffy::Size {
            width: AvailableSpace::Definite(viewport_width as f32),
            height: AvailableSpace::Definite(viewport_height as f32),
        };
        self.taffy
            .compute_layout_with_measure(
                root_id,
                available,
                |known, available, _node_id, context, _style| match context {
                    Some(context) => measure_with_engine(context, measurer, known, available),
                    None => taffy::Size::ZERO,
                },
            )
            .map_err(engine_error)?;

        let mut index = 0;
        self.write_back(root, &mut index)?;

        Ok(stats)
    }

    /// Whether the node at `preorder_index` carried a measure context in the
    /// last pass.
    pub fn is_measured(&self, preorder_index: usize) -> bool {
        self.nodes
            .get(preorder_index)
            .is_some_and(|&id| self.taffy.get_node_context(id).is_some())
    }

    /// Number of nodes with a measure context in the last pass.
    pub fn measured_count(&self) -> usize {
        (0..self.nodes.len()).filter(|&i| self.is_measured(i)).count()
    }

    /// Create the engine node for `node`, decide its measure context, then
    /// recurse into the children.
    fn attach(&mut self, node: &Node) -> Result<taffy::NodeId, LayoutError> {
        let id = self
            .taffy
            .new_leaf(to_taffy_style(&node.style))
            .map_err(engine_error)?;
        self.nodes.push(id);

        let context = node
            .text_content()
            .map(|text| MeasureContext::new(node.style.clone(), text));
        if context.is_some() {
            tracing::trace!(index = self.nodes.len() - 1, "attaching measure context");
        }
        self.taffy.set_node_context(id, context).map_err(engine_error)?;

        for child in &node.children {
            let child_id = self.attach(child)?;
            self.taffy.add_child(id, child_id).map_err(engine_error)?;
        }

        Ok(id)
    }

    fn write_back(&self, node: &mut Node, index: &mut usize) -> Result<(), LayoutError> {
        let id = self.nodes[*index];
        *index += 1;

        let layout = self.taffy.layout(id).map_err(engine_error)?;
        node.layout = Some(Layout::new(
            layout.location.x as f64,
            layout.location.y as f64,
            layout.size.width as f64,
            layout.size.height as f64,
        ));

        for child in &mut node.children {
            self.write_back(child, index)?;
        }
        Ok(())
    }
}

/// Translate the engine's sizing query into a [`MeasureContext::measure`] call.
///
/// Known dimensions become the lower-bound constraint (content box). The
/// definite available width is content-box in the engine, so the node's
/// horizontal insets are added back to get the width the node is offered.
fn measure_with_engine<M: TextMeasurer + ?Sized>(
    context: &MeasureContext,
    measurer: &M,
    known: taffy::Size<Option<f32>>,
    available: taffy::Size<AvailableSpace>,
) -> taffy::Size<f32> {
    let insets = context.style.content_insets();

    let constraint = MeasureConstraint::new(
        known
            .width
            .map_or(0.0, |w| (w as f64 - insets.horizontal()).max(0.0)),
        known
            .height
            .map_or(0.0, |h| (h as f64 - insets.vertical()).max(0.0)),
    );

    let layout_width = match available.width {
        AvailableSpace::Definite(width) => width as f64 + insets.horizontal(),
        AvailableSpace::MinContent => 0.0,
        AvailableSpace::MaxContent => f64::INFINITY,
    };

    let result = context.measure(measurer, layout_width, constraint);
    taffy::Size {
        width: result.width as f32,
        height: result.height as f32,
    }
}

fn dimension(value: Option<f64>) -> taffy::Dimension {
    match value {
        Some(value) => length(value as f32),
        None => auto(),
    }
}

fn offset(value: Option<f64>) -> taffy::LengthPercentageAuto {
    match value {
        Some(value) => length(value as f32),
        None => auto(),
    }
}

fn padding_rect(insets: Insets) -> taffy::Rect<taffy::LengthPercentage> {
    taffy::Rect {
        left: length(insets.left as f32),
        right: length(insets.right as f32),
        top: length(insets.top as f32),
        bottom: length(insets.bottom as f32),
    }
}

fn margin_rect(insets: Insets) -> taffy::Rect<taffy::LengthPercentageAuto> {
    taffy::Rect {
        left: length(insets.left as f32),
        right: length(insets.right as f32),
        top: length(insets.top as f32),
        bottom: length(insets.bottom as f32),
    }
}

fn flex_direction(direction: FlexDirection) -> taffy::FlexDirection {
    match direction {
        FlexDirection::Column => taffy::FlexDirection::Column,
        FlexDirection::ColumnReverse => taffy::FlexDirection::ColumnReverse,
        FlexDirection::Row => taffy::FlexDirection::Row,
        FlexDirection::RowReverse => taffy::FlexDirection::RowReverse,
    }
}

fn justify_content(justify: JustifyContent) -> taffy::JustifyContent {
    match justify {
        JustifyContent::FlexStart => taffy::JustifyContent::FlexStart,
        JustifyContent::Center => taffy::JustifyContent::Center,
        JustifyContent::FlexEnd => taffy::JustifyContent::FlexEnd,
        JustifyContent::SpaceBetween => taffy::JustifyContent::SpaceBetween,
        JustifyContent::SpaceAround => taffy::JustifyContent::SpaceAround,
        JustifyContent::SpaceEvenly => taffy::JustifyContent::SpaceEvenly,
    }
}

fn align_items(align: AlignItems) -> taffy::AlignItems {
    match align {
        AlignItems::FlexStart => taffy::AlignItems::FlexStart,
        AlignItems::Center => taffy::AlignItems::Center,
        AlignItems::FlexEnd => taffy::AlignItems::FlexEnd,
        AlignItems::Stretch => taffy::AlignItems::Stretch,
        AlignItems::Baseline => taffy::AlignItems::Baseline,
    }
}

fn flex_wrap(wrap: FlexWrap) -> taffy::FlexWrap {
    match wrap {
        FlexWrap::NoWrap => taffy::FlexWrap::NoWrap,
        FlexWrap::Wrap => taffy::FlexWrap::Wrap,
        FlexWrap::WrapReverse => taffy::FlexWrap::WrapReverse,
    }
}

/// Convert a node style into the engine's style.
///
/// Containers default to a column direction and items neither grow nor
/// shrink unless asked to.
pub fn to_taffy_style(style: &Style) -> taffy::Style {
    let border = style.border_width() as f32;

    taffy::Style {
        display: taffy::Display::Flex,
        position: match style.position.unwrap_or_default() {
            PositionType::Relative => taffy::Position::Relative,
            PositionType::Absolute => taffy::Position::Absolute,
        },
        inset: taffy::Rect {
            left: offset(style.left),
            right: offset(style.right),
            top: offset(style.top),
            bottom: offset(style.bottom),
        },
        size: taffy::Size {
            width: dimension(style.width),
            height: dimension(style.height),
        },
        min_size: taffy::Size {
            width: dimension(style.min_width),
            height: dimension(style.min_height),
        },
        max_size: taffy::Size {
            width: dimension(style.max_width),
            height: dimension(style.max_height),
        },
        margin: margin_rect(style.margin_insets()),
        padding: padding_rect(style.padding_insets()),
        border: taffy::Rect {
            left: length(border),
            right: length(border),
            top: length(border),
            bottom: length(border),
        },
        flex_direction: flex_direction(style.flex_direction.unwrap_or_default()),
        flex_wrap: flex_wrap(style.flex_wrap.unwrap_or_default()),
        justify_content: style.justify_content.map(justify_content),
        align_items: style.align_items.map(align_items),
        align_self: style.align_self.map(align_items),
        flex_grow: style.flex.unwrap_or(0.0) as f32,
        flex_shrink: style.flex_shrink.unwrap_or(0.0) as f32,
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::EstimatedMetrics;
    use trellis_core::WhiteSpace;

    fn compute(root: &mut Node) -> LayoutStats {
        LayoutEngine::new()
            .compute_layout(root, 800.0, 600.0, &EstimatedMetrics::default())
            .unwrap()
    }

    #[test]
    fn test_root_sized_to_viewport() {
        let mut root = Node::new(Style::new());
        compute(&mut root);
        assert_eq!(root.layout, Some(Layout::new(0.0, 0.0, 800.0, 600.0)));
    }

    #[test]
    fn test_text_node_height_includes_insets() {
        let style = Style::new()
            .with_padding(10.0)
            .with_border_width(2.0)
            .with_font_size(16.0)
            .with_white_space(WhiteSpace::NoWrap);
        let mut root = Node::new(Style::new()).with_child(Node::text(style, "Hi"));

        let stats = compute(&mut root);

        assert_eq!(stats, LayoutStats { nodes: 2, measured: 1 });
        let layout = root.children[0].layout.unwrap();
        assert!(layout.height >= 16.0 + 2.0 * (10.0 + 2.0));
        // column containers stretch children across
        assert!((layout.width - 800.0).abs() < 0.001);
    }

    #[test]
    fn test_children_positioned_relative_to_parent() {
        let inner = Node::new(Style::new().with_size(10.0, 10.0));
        let outer = Node::new(Style::new().with_padding(20.0).with_size(100.0, 100.0))
            .with_child(inner);
        let mut root = Node::new(Style::new().with_padding(5.0)).with_child(outer);

        compute(&mut root);

        let outer = root.children[0].layout.unwrap();
        let inner = root.children[0].children[0].layout.unwrap();
        assert!((outer.left - 5.0).abs() < 0.001);
        assert!((inner.left - 20.0).abs() < 0.001);
        assert!((inner.top - 20.0).abs() < 0.001);
    }

    #[test]
    fn test_row_direction() {
        let child = || Node::new(Style::new().with_size(50.0, 20.0));
        let mut root = Node::new(Style::new().with_flex_direction(FlexDirection::Row))
            .with_child(child())
            .with_child(child());

        compute(&mut root);

        assert!((root.children[1].layout.unwrap().left - 50.0).abs() < 0.001);
        assert!((root.children[1].layout.unwrap().top).abs() < 0.001);
    }

    #[test]
    fn test_cleared_text_detaches_measure() {
        let mut engine = LayoutEngine::new();
        let measurer = EstimatedMetrics::default();
        let mut root = Node::new(Style::new())
            .with_child(Node::text(Style::new().with_font_size(12.0), "label"));

        engine.compute_layout(&mut root, 800.0, 600.0, &measurer).unwrap();
        assert!(engine.is_measured(1));
        assert!(!engine.is_measured(0));

        root.children[0].set_text(None);
        let stats = engine.compute_layout(&mut root, 800.0, 600.0, &measurer).unwrap();
        assert!(!engine.is_measured(1));
        assert_eq!(stats.measured, 0);
    }

    #[test]
    fn test_invalid_viewport() {
        let mut root = Node::new(Style::new());
        let result = LayoutEngine::new().compute_layout(
            &mut root,
            f64::NAN,
            10.0,
            &EstimatedMetrics::default(),
        );
        assert!(matches!(result, Err(LayoutError::InvalidViewport { .. })));
        assert!(root.layout.is_none());
    }

    #[test]
    fn test_style_conversion_defaults() {
        let converted = to_taffy_style(&Style::new());
        assert_eq!(converted.flex_direction, taffy::FlexDirection::Column);
        assert_eq!(converted.flex_shrink, 0.0);
        assert_eq!(converted.size.width, taffy::Dimension::Auto);
    }
}
