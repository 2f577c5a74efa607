/// phong3d Terminal Viewer
///
/// Renders a model JSON file (or a built-in cube) as shaded ASCII.
/// Usage: phong3d-terminal [model.json] [--config viewer.json]
/// Controls:
///   - WASD: Move the camera, R/F: Up/Down
///   - Arrow Keys: Rotate the model
///   - +/-: Zoom
///   - Q/ESC: Quit
use std::env;
use std::fs;

use anyhow::Context;
use phong3d_core::{parse_model, Model, ModelJson};
use phong3d_terminal::{TerminalApp, ViewerConfig};
use tracing::info;

struct Args {
    model: Option<String>,
    config: Option<String>,
}

fn parse_args() -> Args {
    let mut args = Args {
        model: None,
        config: None,
    };
    let argv: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "--config" if i + 1 < argv.len() => {
                args.config = Some(argv[i + 1].clone());
                i += 2;
            }
            other => {
                if args.model.is_none() && !other.starts_with("--") {
                    args.model = Some(other.to_string());
                }
                i += 1;
            }
        }
    }
    args
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never land in the alternate screen.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = parse_args();

    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let data = match &args.model {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading model {}", path))?;
            parse_model(&text).with_context(|| format!("loading model {}", path))?
        }
        None => ModelJson::cube(2.0),
    };
    info!(meshes = data.meshes.len(), "model loaded");

    let mut app = TerminalApp::new(Model::from(data), config)?;
    app.run()?;

    println!("Thank you for using phong3d!");
    Ok(())
}
