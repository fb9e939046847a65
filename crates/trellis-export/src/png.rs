//! PNG export of software-rendered canvases.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use trellis_core::{Color, ExportError};
use trellis_render_2d::{Canvas, SoftwareCanvas};

/// Export options for PNG.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PngOptions {
    /// Colour composited under the canvas; `None` keeps transparency.
    pub background: Option<Color>,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            background: Some(Color::WHITE),
        }
    }
}

impl PngOptions {
    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }
}

/// Encode a canvas as PNG.
pub fn encode_png(canvas: &SoftwareCanvas, options: &PngOptions) -> Result<Vec<u8>, ExportError> {
    let pixels = match options.background {
        Some(background) => composite_over(canvas.pixels(), background),
        None => canvas.pixels().to_vec(),
    };
    encode_rgba(pixels, canvas.width(), canvas.height())
}

/// Encode raw RGBA pixels as PNG.
pub fn encode_rgba(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, ExportError> {
    let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
        ExportError::EncodeFailed {
            reason: format!("pixel buffer does not match {width}x{height}"),
        }
    })?;

    let mut output = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| ExportError::EncodeFailed {
            reason: e.to_string(),
        })?;

    tracing::debug!(width, height, bytes = output.len(), "encoded png");
    Ok(output)
}

/// Flatten straight-alpha pixels onto an opaque background.
fn composite_over(pixels: &[u8], background: Color) -> Vec<u8> {
    let (br, bg, bb, _) = background.to_rgba8();
    let back = [br, bg, bb];

    let mut out = Vec::with_capacity(pixels.len());
    for px in pixels.chunks_exact(4) {
        let alpha = px[3] as f32 / 255.0;
        for i in 0..3 {
            let value = px[i] as f32 * alpha + back[i] as f32 * (1.0 - alpha);
            out.push(value.round().clamp(0.0, 255.0) as u8);
        }
        out.push(255);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_signature() {
        let canvas = SoftwareCanvas::new(4, 3);
        let png = encode_png(&canvas, &PngOptions::default()).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_background_fills_transparent_pixels() {
        let canvas = SoftwareCanvas::new(2, 2);
        let png = encode_png(&canvas, &PngOptions::default()).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_transparent_export() {
        let mut canvas = SoftwareCanvas::new(2, 2);
        canvas.set_fill_color(Color::RED);
        canvas.fill_rect(0.0, 0.0, 1.0, 1.0);

        let options = PngOptions::default().with_background(None);
        let png = encode_png(&canvas, &options).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(1, 1).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_mismatched_buffer() {
        let result = encode_rgba(vec![0; 7], 2, 2);
        assert!(matches!(result, Err(ExportError::EncodeFailed { .. })));
    }
}
