//! `trellis` - render a JSON scene with its box-model overlay.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trellis_export::{encode_png, layout_to_json, load_scene_file, render_scene, PngOptions};
use trellis_render_2d::RendererOptions;

#[derive(Parser, Debug)]
#[command(name = "trellis", version, about = "Flexbox box-model debug renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a scene and write it as PNG
    Render(RenderArgs),
}

#[derive(clap::Args, Debug)]
struct RenderArgs {
    /// Scene file (JSON with width, height and root)
    scene: PathBuf,

    /// Output PNG path
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,

    /// Only clear the canvas, skipping the overlay
    #[arg(long)]
    no_debug: bool,

    /// Also write the computed layout tree as JSON
    #[arg(long, value_name = "PATH")]
    layout_json: Option<PathBuf>,

    /// Renderer options file (JSON)
    #[arg(long, value_name = "PATH")]
    options: Option<PathBuf>,

    /// Keep the canvas background transparent
    #[arg(long)]
    transparent: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render(&args),
    }
}

fn load_options(path: Option<&Path>) -> Result<RendererOptions> {
    let Some(path) = path else {
        return Ok(RendererOptions::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading options {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing options {}", path.display()))
}

fn render(args: &RenderArgs) -> Result<()> {
    let scene = load_scene_file(&args.scene)
        .with_context(|| format!("loading scene {}", args.scene.display()))?;

    let mut options = load_options(args.options.as_deref())?;
    if args.no_debug {
        options.debug_draw = false;
    }

    let rendered = render_scene(&scene, &options).context("rendering scene")?;
    tracing::info!(
        nodes = rendered.stats.nodes,
        measured = rendered.stats.measured,
        "scene laid out"
    );

    let png_options = if args.transparent {
        PngOptions::default().with_background(None)
    } else {
        PngOptions::default()
    };
    let png = encode_png(&rendered.canvas, &png_options).context("encoding png")?;
    fs::write(&args.output, png)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "wrote png");

    if let Some(path) = &args.layout_json {
        let json = layout_to_json(&rendered.root).context("serializing layout")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote layout");
    }

    Ok(())
}
