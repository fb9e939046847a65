//! Intrinsic sizing of a node's text.
//!
//! The layout engine asks "how large must this text be?" through
//! [`MeasureContext::measure`]; the context carries the node's own style and
//! text so no other state is needed.

use trellis_core::{Style, WhiteSpace};

use crate::text::{measure_text, TextMeasurer, TextOptions};

/// Lower bounds offered by the layout engine; 0 means unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasureConstraint {
    pub max_width: f64,
    pub max_height: f64,
}

impl MeasureConstraint {
    pub fn new(max_width: f64, max_height: f64) -> Self {
        Self { max_width, max_height }
    }

    /// No constraint on either axis.
    pub fn none() -> Self {
        Self::default()
    }
}

/// Content size of a measured node, never smaller than its constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeasureResult {
    pub width: f64,
    pub height: f64,
}

/// Width available to wrapped text inside a node of border-box `width`.
///
/// Shared by measurement and drawing so both wrap identically.
pub fn wrap_width(style: &Style, width: f64) -> f64 {
    let padding = style.padding_insets();
    width - (padding.left + padding.right + style.border_width() * 2.0)
}

/// Measure `text` as styled by `style`.
///
/// `layout_width` is the width the layout currently offers the node. The
/// result is clamped so it is at least as large as `constraint`.
pub fn measure_node<M: TextMeasurer + ?Sized>(
    measurer: &M,
    style: &Style,
    text: &str,
    layout_width: f64,
    constraint: MeasureConstraint,
) -> MeasureResult {
    let font = style.font();

    let (width, height) = match style.white_space {
        WhiteSpace::NoWrap => (measurer.line_width(text, &font), font.size),
        WhiteSpace::Normal => {
            let available = wrap_width(style, layout_width.max(constraint.max_width));
            let options = TextOptions::new(font, available)
                .with_line_height(style.line_height())
                .with_text_align(style.text_align);
            let size = measure_text(measurer, text, &options);
            (size.width, size.height)
        }
    };

    MeasureResult {
        width: width.max(constraint.max_width),
        height: height.max(constraint.max_height),
    }
}

/// Measurement capability bound to one text node for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureContext {
    pub style: Style,
    pub text: String,
}

impl MeasureContext {
    pub fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    /// Measure this node's text.
    pub fn measure<M: TextMeasurer + ?Sized>(
        &self,
        measurer: &M,
        layout_width: f64,
        constraint: MeasureConstraint,
    ) -> MeasureResult {
        measure_node(measurer, &self.style, &self.text, layout_width, constraint)
    }
}
