//! CLI for computing overlay placements.
//!
//! Usage:
//!   face-overlay --left 100,200 --right 180,200 --overlay 64x64
//!   face-overlay --left 300,200 --right 360,200 --overlay 128x128 \
//!       --source 640x480 --view 1280x960 --mirrored --json
//!   face-overlay ... --config overlay.json -o placement.json

use std::path::PathBuf;

use clap::Parser;
use face_overlay::{
    EyePair, FaceGeometry, OverlayAsset, OverlayConfig, OverlayTransform, Point, ViewMapping,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "face-overlay")]
#[command(author, version, about = "Compute where to draw an overlay on a face", long_about = None)]
struct Args {
    /// Left eye position as x,y (detector coordinates)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    left: Point,

    /// Right eye position as x,y (detector coordinates)
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    right: Point,

    /// Overlay image size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    overlay: (u32, u32),

    /// Front-facing (mirrored) camera
    #[arg(long)]
    mirrored: bool,

    /// Detector frame size as WIDTHxHEIGHT (defaults to the view size)
    #[arg(long, value_parser = parse_size, requires = "view")]
    source: Option<(u32, u32)>,

    /// View size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_size)]
    view: Option<(u32, u32)>,

    /// JSON file overriding the placement constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    left: Point,
    right: Point,
    mirrored: bool,
    overlay: OverlayAsset,
    config: OverlayConfig,
    geometry: Option<FaceGeometry>,
    transform: Option<OverlayTransform>,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let output_str = render_output(args, &build_output(args)?)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        info!(?path, "output written");
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn build_output(args: &Args) -> Result<Output, Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            info!(?path, "loading overlay config");
            OverlayConfig::load(path)?
        }
        None => OverlayConfig::default(),
    };

    let asset = OverlayAsset::new(args.overlay.0, args.overlay.1)?;
    let eyes = EyePair::new(args.left, args.right);

    let view_eyes = match args.view {
        Some((view_w, view_h)) => {
            let (source_w, source_h) = args.source.unwrap_or((view_w, view_h));
            let mapping = ViewMapping::new(
                source_w as f32,
                source_h as f32,
                view_w as f32,
                view_h as f32,
                args.mirrored,
            )?;
            mapping.eyes_to_view(&eyes)
        }
        None => eyes,
    };

    let geometry = FaceGeometry::from_eyes(&view_eyes, &config);
    let transform =
        geometry.and_then(|g| g.overlay_transform(&asset, args.mirrored, &config));

    Ok(Output {
        left: view_eyes.left,
        right: view_eyes.right,
        mirrored: args.mirrored,
        overlay: asset,
        config,
        geometry,
        transform,
    })
}

fn render_output(args: &Args, output: &Output) -> Result<String, serde_json::Error> {
    if args.json {
        serde_json::to_string_pretty(output)
    } else {
        Ok(format_human_readable(output))
    }
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!(
        "Eyes (view): ({:.1}, {:.1}) -> ({:.1}, {:.1})\n",
        output.left.x, output.left.y, output.right.x, output.right.y
    ));
    s.push_str(&format!(
        "Overlay: {}x{}{}\n",
        output.overlay.width(),
        output.overlay.height(),
        if output.mirrored { " (mirrored)" } else { "" }
    ));

    let (Some(geometry), Some(transform)) = (&output.geometry, &output.transform) else {
        s.push_str("\nNo overlay: eye positions are too close together.\n");
        return s;
    };

    s.push_str("\nFace estimate:\n");
    s.push_str(&format!("  Eye distance: {:.2}px\n", geometry.eye_distance));
    s.push_str(&format!(
        "  Face size:    {:.1} x {:.1}px\n",
        geometry.face_width, geometry.face_height
    ));

    s.push_str("\nTransform:\n");
    s.push_str(&format!("  Rotation:  {:.2} deg\n", transform.rotation_degrees));
    s.push_str(&format!("  Scale:     {:.4}\n", transform.scale));
    s.push_str(&format!(
        "  Center:    ({:.1}, {:.1})\n",
        transform.translate_x, transform.translate_y
    ));
    let m = transform.matrix();
    s.push_str(&format!(
        "  Matrix:    [{:.4} {:.4} {:.2}; {:.4} {:.4} {:.2}]\n",
        m.a, m.b, m.tx, m.c, m.d, m.ty
    ));

    s
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y but got {s:?}"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x in {s:?}: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y in {s:?}: {e}"))?;
    Ok(Point::new(x, y))
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT but got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width in {s:?}: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height in {s:?}: {e}"))?;
    Ok((w, h))
}
