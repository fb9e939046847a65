use trellis_export::{
    encode_png, layout_to_json, load_scene, render_scene, render_scene_png, PngOptions,
};
use trellis_render_2d::RendererOptions;

const CARDS: &str = r#"{
    "width": 320,
    "height": 200,
    "root": {
        "style": { "flexDirection": "row", "padding": 8 },
        "children": [
            { "style": { "width": 100, "height": 60, "margin": 4, "borderWidth": 2 } },
            {
                "style": { "padding": 6, "fontSize": 12, "whiteSpace": "nowrap" },
                "textContent": "label"
            }
        ]
    }
}"#;

#[test]
fn layout_json_follows_rendered_tree() {
    let scene = load_scene(CARDS).unwrap();
    let rendered = render_scene(&scene, &RendererOptions::default()).unwrap();

    let json = layout_to_json(&rendered.root).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["width"], 320.0);
    assert_eq!(value["height"], 200.0);
    let first = &value["children"][0];
    assert_eq!(first["left"], 12.0);
    assert_eq!(first["top"], 12.0);
    assert_eq!(first["width"], 100.0);
    assert_eq!(value["children"][1]["textContent"], "label");
}

#[test]
fn overlay_changes_pixels() {
    let scene = load_scene(CARDS).unwrap();
    let plain = render_scene_png(
        &scene,
        &RendererOptions::default().with_debug_draw(false),
        &PngOptions::default(),
    )
    .unwrap();
    let debug = render_scene_png(&scene, &RendererOptions::default(), &PngOptions::default())
        .unwrap();

    let plain = image::load_from_memory(&plain).unwrap().to_rgba8();
    let debug = image::load_from_memory(&debug).unwrap().to_rgba8();

    assert!(plain.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    assert!(debug.pixels().any(|p| p.0 != [255, 255, 255, 255]));
}

#[test]
fn transparent_png_keeps_alpha() {
    let scene = load_scene(CARDS).unwrap();
    let rendered = render_scene(&scene, &RendererOptions::default()).unwrap();
    let png = encode_png(&rendered.canvas, &PngOptions::default().with_background(None)).unwrap();

    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(300, 150).0, [0, 0, 0, 0]);
}
