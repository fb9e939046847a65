//! Fixed-schema node style.
//!
//! Every recognized property is an explicit field. Box-model values are kept
//! as `Option<f64>` so that "absent" and "present" stay distinguishable; the
//! `*_insets` / `corner_radii` helpers apply the defaulting and precedence
//! rules in one place so measuring and drawing can never disagree.
//!
//! A unified value (`padding`, `margin`, `border_radius`) only takes effect
//! when it is present and non-zero. A zero unified value falls back to the
//! per-side fields.

use crate::types::{CornerRadii, Insets};

/// Font family used when a style does not name one.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Whitespace handling for text content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WhiteSpace {
    /// Wrap at word boundaries to the available width
    #[default]
    Normal,
    /// Single unbroken line
    #[cfg_attr(feature = "serde", serde(rename = "nowrap"))]
    NoWrap,
}

/// Horizontal alignment of wrapped lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

/// Distribution of children along the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// Alignment of children on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum AlignItems {
    FlexStart,
    Center,
    FlexEnd,
    #[default]
    Stretch,
    Baseline,
}

/// Whether flex items may wrap onto multiple lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FlexWrap {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "nowrap"))]
    NoWrap,
    Wrap,
    WrapReverse,
}

/// Positioning scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

/// Resolved font parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels
    pub size: f64,
    /// Font family name
    pub family: String,
}

impl FontSpec {
    pub fn new(size: f64, family: impl Into<String>) -> Self {
        Self { size, family: family.into() }
    }

    /// CSS shorthand, e.g. `16px Arial`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_FONT_FAMILY)
    }
}

/// Style of a single node.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Style {
    // Box model
    pub padding: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub margin: Option<f64>,
    pub margin_top: Option<f64>,
    pub margin_right: Option<f64>,
    pub margin_bottom: Option<f64>,
    pub margin_left: Option<f64>,
    pub border_width: Option<f64>,
    pub border_radius: Option<f64>,
    pub border_radius_top_left: Option<f64>,
    pub border_radius_top_right: Option<f64>,
    pub border_radius_bottom_right: Option<f64>,
    pub border_radius_bottom_left: Option<f64>,

    // Text
    pub font_size: Option<f64>,
    pub font_family: Option<String>,
    pub line_height: Option<f64>,
    pub text_align: TextAlign,
    pub white_space: WhiteSpace,

    // Flex container / item
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub min_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_width: Option<f64>,
    pub max_height: Option<f64>,
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<JustifyContent>,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignItems>,
    pub flex_wrap: Option<FlexWrap>,
    /// Flex grow factor
    pub flex: Option<f64>,
    pub flex_shrink: Option<f64>,
    pub position: Option<PositionType>,
    pub left: Option<f64>,
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
}

/// A value counts only when present, non-zero and a number.
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn or_zero(value: Option<f64>) -> f64 {
    truthy(value).unwrap_or(0.0)
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unified padding, if it overrides the per-side values.
    pub fn unified_padding(&self) -> Option<f64> {
        truthy(self.padding)
    }

    /// Unified margin, if it overrides the per-side values.
    pub fn unified_margin(&self) -> Option<f64> {
        truthy(self.margin)
    }

    /// Unified corner radius, if it overrides the four corners.
    pub fn unified_border_radius(&self) -> Option<f64> {
        truthy(self.border_radius)
    }

    /// Resolved padding on all four sides.
    pub fn padding_insets(&self) -> Insets {
        match self.unified_padding() {
            Some(padding) => Insets::uniform(padding),
            None => Insets::new(
                or_zero(self.padding_top),
                or_zero(self.padding_right),
                or_zero(self.padding_bottom),
                or_zero(self.padding_left),
            ),
        }
    }

    /// Resolved margin on all four sides.
    pub fn margin_insets(&self) -> Insets {
        match self.unified_margin() {
            Some(margin) => Insets::uniform(margin),
            None => Insets::new(
                or_zero(self.margin_top),
                or_zero(self.margin_right),
                or_zero(self.margin_bottom),
                or_zero(self.margin_left),
            ),
        }
    }

    /// Border thickness, 0 when unset.
    pub fn border_width(&self) -> f64 {
        or_zero(self.border_width)
    }

    /// Padding plus border on each side.
    pub fn content_insets(&self) -> Insets {
        self.padding_insets().grow(self.border_width())
    }

    /// Corner radii; a unified radius wins over the four-corner form.
    pub fn corner_radii(&self) -> CornerRadii {
        match self.unified_border_radius() {
            Some(radius) => CornerRadii::uniform(radius),
            None => CornerRadii::new(
                or_zero(self.border_radius_top_left),
                or_zero(self.border_radius_top_right),
                or_zero(self.border_radius_bottom_right),
                or_zero(self.border_radius_bottom_left),
            ),
        }
    }

    /// Font size, 0 when unset.
    pub fn font_size(&self) -> f64 {
        or_zero(self.font_size)
    }

    /// Line height multiplier, 1 when unset.
    pub fn line_height(&self) -> f64 {
        truthy(self.line_height).unwrap_or(1.0)
    }

    /// Font used for both measuring and drawing this node's text.
    pub fn font(&self) -> FontSpec {
        let family = self
            .font_family
            .as_deref()
            .filter(|family| !family.is_empty())
            .unwrap_or(DEFAULT_FONT_FAMILY);
        FontSpec::new(self.font_size(), family)
    }

    // Builders

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn with_padding_sides(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.padding_top = Some(top);
        self.padding_right = Some(right);
        self.padding_bottom = Some(bottom);
        self.padding_left = Some(left);
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = Some(margin);
        self
    }

    pub fn with_margin_sides(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.margin_top = Some(top);
        self.margin_right = Some(right);
        self.margin_bottom = Some(bottom);
        self.margin_left = Some(left);
        self
    }

    pub fn with_border_width(mut self, width: f64) -> Self {
        self.border_width = Some(width);
        self
    }

    pub fn with_border_radius(mut self, radius: f64) -> Self {
        self.border_radius = Some(radius);
        self
    }

    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn with_white_space(mut self, white_space: WhiteSpace) -> Self {
        self.white_space = white_space;
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_flex_direction(mut self, direction: FlexDirection) -> Self {
        self.flex_direction = Some(direction);
        self
    }

    pub fn with_flex(mut self, grow: f64) -> Self {
        self.flex = Some(grow);
        self
    }
}
