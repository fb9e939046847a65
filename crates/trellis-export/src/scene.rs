//! Scene files and headless rendering.

use std::path::Path;

use trellis_core::{ExportError, Node, Scene, TrellisError};
use trellis_layout::LayoutStats;
use trellis_render_2d::{CanvasRenderer, RendererOptions, SoftwareCanvas};

use crate::png::{encode_png, PngOptions};

/// Parse a scene from JSON.
pub fn load_scene(json: &str) -> Result<Scene, ExportError> {
    serde_json::from_str(json).map_err(|e| ExportError::InvalidScene {
        reason: e.to_string(),
    })
}

/// Read and parse a scene file.
pub fn load_scene_file(path: impl AsRef<Path>) -> Result<Scene, ExportError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    load_scene(&json)
}

/// Result of rendering a scene on the software canvas.
#[derive(Debug)]
pub struct RenderedScene {
    pub canvas: SoftwareCanvas,
    /// The scene's tree with layouts filled in
    pub root: Node,
    pub stats: LayoutStats,
}

/// Lay out and draw a scene on a new software canvas.
pub fn render_scene(
    scene: &Scene,
    options: &RendererOptions,
) -> Result<RenderedScene, TrellisError> {
    let canvas = SoftwareCanvas::try_new(scene.width, scene.height)?;
    let mut renderer = CanvasRenderer::with_options(canvas, scene.root.clone(), options.clone());
    let stats = renderer.draw()?;

    tracing::debug!(
        width = scene.width,
        height = scene.height,
        nodes = stats.nodes,
        "scene rendered"
    );

    let (canvas, root) = renderer.into_parts();
    Ok(RenderedScene {
        canvas,
        root,
        stats,
    })
}

/// Render a scene straight to PNG bytes.
pub fn render_scene_png(
    scene: &Scene,
    options: &RendererOptions,
    png: &PngOptions,
) -> Result<Vec<u8>, TrellisError> {
    let rendered = render_scene(scene, options)?;
    Ok(encode_png(&rendered.canvas, png)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::RenderError;

    const SCENE: &str = r#"{
        "width": 200,
        "height": 100,
        "root": {
            "style": { "padding": 4 },
            "children": [
                {
                    "style": { "padding": 10, "borderWidth": 2, "fontSize": 16, "whiteSpace": "nowrap" },
                    "textContent": "Hi"
                }
            ]
        }
    }"#;

    #[test]
    fn test_load_scene() {
        let scene = load_scene(SCENE).unwrap();
        assert_eq!((scene.width, scene.height), (200, 100));
        assert_eq!(scene.root.children[0].text_content(), Some("Hi"));
    }

    #[test]
    fn test_load_scene_rejects_garbage() {
        assert!(matches!(
            load_scene("{ not json"),
            Err(ExportError::InvalidScene { .. })
        ));
    }

    #[test]
    fn test_render_scene_lays_out_tree() {
        let scene = load_scene(SCENE).unwrap();
        let rendered = render_scene(&scene, &RendererOptions::default()).unwrap();

        assert_eq!(rendered.stats.nodes, 2);
        assert_eq!(rendered.stats.measured, 1);
        let child = rendered.root.children[0].layout.unwrap();
        assert!((child.left - 4.0).abs() < 0.001);
        assert!(child.height >= 40.0 - 0.001);
        // original scene is untouched
        assert!(scene.root.children[0].layout.is_none());
    }

    #[test]
    fn test_render_scene_png() {
        let scene = load_scene(SCENE).unwrap();
        let png =
            render_scene_png(&scene, &RendererOptions::default(), &PngOptions::default()).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 100));
    }

    #[test]
    fn test_empty_canvas_is_render_error() {
        let scene = Scene::new(0, 100, Node::default());
        let result = render_scene(&scene, &RendererOptions::default());
        assert!(matches!(
            result,
            Err(TrellisError::Render(RenderError::InvalidCanvasSize { .. }))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_scene_file("/nonexistent/trellis/scene.json");
        assert!(matches!(result, Err(ExportError::Io(_))));
    }
}
