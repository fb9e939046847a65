//! Text metrics and word wrapping.
//!
//! Measuring (during layout) and drawing (during rendering) both go through
//! [`wrap_text`], so a node's text always wraps the same way it was sized.

use trellis_core::{FontSpec, TextAlign};

/// Source of single-line text widths.
pub trait TextMeasurer {
    /// Advance width of `text` drawn on one line with `font`.
    fn line_width(&self, text: &str, font: &FontSpec) -> f64;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn line_width(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).line_width(text, font)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn line_width(&self, text: &str, font: &FontSpec) -> f64 {
        (**self).line_width(text, font)
    }
}

/// Deterministic glyph-width estimation.
///
/// Characters fall into width classes expressed as fractions of the font
/// size. Monospace families use a single class.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMetrics {
    /// Width of an ordinary lowercase glyph, as a fraction of the font size
    pub average: f64,
    /// Width of every glyph in a monospace family
    pub monospace: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            average: 0.55,
            monospace: 0.6,
        }
    }
}

impl EstimatedMetrics {
    fn is_monospace(family: &str) -> bool {
        let family = family.to_ascii_lowercase();
        family.contains("mono") || family.contains("courier") || family.contains("consolas")
    }

    fn glyph_ratio(&self, c: char) -> f64 {
        match c {
            ' ' | '\t' => 0.28,
            'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
            'f' | 'r' | 't' | '(' | ')' | '[' | ']' | '-' => 0.36,
            'm' | 'w' | 'M' | 'W' | '@' => 0.85,
            c if c.is_ascii_uppercase() => 0.68,
            c if c.is_ascii_digit() => 0.55,
            _ => self.average,
        }
    }
}

impl TextMeasurer for EstimatedMetrics {
    fn line_width(&self, text: &str, font: &FontSpec) -> f64 {
        if Self::is_monospace(&font.family) {
            return text.chars().count() as f64 * self.monospace * font.size;
        }
        text.chars().map(|c| self.glyph_ratio(c)).sum::<f64>() * font.size
    }
}

/// Parameters of the word-wrap routine.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// Font used for every line
    pub font: FontSpec,
    /// Line advance as a multiple of the font size
    pub line_height: f64,
    /// Alignment of each line inside `max_width`
    pub text_align: TextAlign,
    /// Available line width; `<= 0` forces one word per line
    pub max_width: f64,
}

impl TextOptions {
    pub fn new(font: FontSpec, max_width: f64) -> Self {
        Self {
            font,
            line_height: 1.0,
            text_align: TextAlign::Left,
            max_width,
        }
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn with_text_align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    /// Vertical distance between consecutive baselines.
    pub fn line_advance(&self) -> f64 {
        self.font.size * self.line_height
    }
}

/// Size of a wrapped text block.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextSize {
    /// Width of the widest line
    pub width: f64,
    /// Total height over all lines
    pub height: f64,
    /// Number of lines
    pub lines: usize,
}

/// One line produced by wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub width: f64,
}

/// A wrapped line with its drawing offset relative to the first baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedLine {
    pub text: String,
    /// Horizontal offset from the text start
    pub x: f64,
    /// Vertical offset from the first baseline
    pub y: f64,
    pub width: f64,
}

/// Slack allowed when a line is checked against its wrap width.
///
/// Layout engines store geometry in `f32`, so a box sized to exactly fit a
/// line can come back a few ulps narrower than the line it was measured for.
pub const WRAP_TOLERANCE: f64 = 1e-3;

fn fits(width: f64, max_width: f64) -> bool {
    max_width > 0.0 && width <= max_width + WRAP_TOLERANCE
}

/// Greedy word wrap.
///
/// Explicit newlines always break. A word wider than `max_width` keeps a line
/// to itself. When `max_width` is zero, negative or NaN every word lands on
/// its own line; an infinite width never wraps.
pub fn wrap_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    font: &FontSpec,
    max_width: f64,
) -> Vec<TextLine> {
    let space_width = measurer.line_width(" ", font);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = measurer.line_width(word, font);

            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if fits(current_width + space_width + word_width, max_width) {
                current.push(' ');
                current.push_str(word);
                current_width += space_width + word_width;
            } else {
                lines.push(TextLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(TextLine {
            text: current,
            width: current_width,
        });
    }

    lines
}

/// Measure wrapped text: widest line by total line height.
pub fn measure_text<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    options: &TextOptions,
) -> TextSize {
    let lines = wrap_text(measurer, text, &options.font, options.max_width);
    let width = lines.iter().map(|line| line.width).fold(0.0_f64, f64::max);

    TextSize {
        width,
        height: lines.len() as f64 * options.line_advance(),
        lines: lines.len(),
    }
}

/// Horizontal offset of a line of `line_width` inside `box_width`.
pub fn align_offset(align: TextAlign, line_width: f64, box_width: f64) -> f64 {
    if !box_width.is_finite() || box_width <= 0.0 {
        return 0.0;
    }
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Center => (box_width - line_width) / 2.0,
        TextAlign::Right => box_width - line_width,
    }
}

/// Wrap and position every line for drawing.
pub fn layout_lines<M: TextMeasurer + ?Sized>(
    measurer: &M,
    text: &str,
    options: &TextOptions,
) -> Vec<PositionedLine> {
    let advance = options.line_advance();

    wrap_text(measurer, text, &options.font, options.max_width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| PositionedLine {
            x: align_offset(options.text_align, line.width, options.max_width),
            y: i as f64 * advance,
            width: line.width,
            text: line.text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> FontSpec {
        FontSpec::new(10.0, "monospace")
    }

    // Every glyph is 6px wide in a 10px monospace font.
    fn measurer() -> EstimatedMetrics {
        EstimatedMetrics::default()
    }

    #[test]
    fn test_monospace_width() {
        let width = measurer().line_width("hello", &font());
        assert!((width - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_proportional_width_depends_on_glyphs() {
        let font = FontSpec::new(10.0, "Arial");
        let narrow = measurer().line_width("iiii", &font);
        let wide = measurer().line_width("MMMM", &font);
        assert!(narrow < wide);
    }

    #[test]
    fn test_wrap_greedy() {
        // "aaa bbb" = 42px, fits in 45
        let lines = wrap_text(&measurer(), "aaa bbb ccc", &font(), 45.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "aaa bbb");
        assert!((lines[0].width - 42.0).abs() < 0.001);
        assert_eq!(lines[1].text, "ccc");
    }

    #[test]
    fn test_wrap_tolerates_f32_rounding() {
        // a box stored as f32 can be a hair narrower than the line it fits
        let snug = (42.0f64 as f32 - 1e-5) as f64;
        let lines = wrap_text(&measurer(), "aaa bbb", &font(), snug);
        assert_eq!(lines.len(), 1);

        let lines = wrap_text(&measurer(), "aaa bbb", &font(), 41.9);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_wrap_zero_width_one_word_per_line() {
        let lines = wrap_text(&measurer(), "a b c", &font(), 0.0);
        assert_eq!(lines.len(), 3);

        let lines = wrap_text(&measurer(), "a b c", &font(), -20.0);
        assert_eq!(lines.len(), 3);

        let lines = wrap_text(&measurer(), "a b c", &font(), f64::NAN);
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_wrap_infinite_width_never_wraps() {
        let lines = wrap_text(&measurer(), "a b c d e f", &font(), f64::INFINITY);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_explicit_newlines_break() {
        let lines = wrap_text(&measurer(), "one\ntwo three", &font(), 1000.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].text, "two three");
    }

    #[test]
    fn test_long_word_keeps_own_line() {
        let lines = wrap_text(&measurer(), "a enormousword b", &font(), 20.0);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, "enormousword");
        assert!(lines[1].width > 20.0);
    }

    #[test]
    fn test_measure_text_height_uses_line_height() {
        let options = TextOptions::new(font(), 45.0).with_line_height(1.5);
        let size = measure_text(&measurer(), "aaa bbb ccc", &options);
        assert_eq!(size.lines, 2);
        assert!((size.width - 42.0).abs() < 0.001);
        assert!((size.height - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_layout_lines_alignment() {
        let options = TextOptions::new(font(), 60.0).with_text_align(TextAlign::Right);
        let lines = layout_lines(&measurer(), "abc", &options);
        assert_eq!(lines.len(), 1);
        assert!((lines[0].x - 42.0).abs() < 0.001);

        let options = TextOptions::new(font(), 60.0).with_text_align(TextAlign::Center);
        let lines = layout_lines(&measurer(), "abc\nabcdef", &options);
        assert!((lines[0].x - 21.0).abs() < 0.001);
        assert!((lines[1].x - 12.0).abs() < 0.001);
        assert!((lines[1].y - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_align_ignores_unbounded_box() {
        assert_eq!(align_offset(TextAlign::Right, 10.0, f64::INFINITY), 0.0);
        assert_eq!(align_offset(TextAlign::Center, 10.0, 0.0), 0.0);
    }
}
