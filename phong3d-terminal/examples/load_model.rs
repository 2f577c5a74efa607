/// Example: Load a model JSON file and print one ASCII frame
///
/// Usage: cargo run --example load_model -- path/to/model.json
use std::env;
use std::fs;

use anyhow::Context;
use phong3d_core::{parse_model, Model, ModelJson};
use phong3d_terminal::{TerminalApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    let data = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path))?;
            parse_model(&text)?
        }
        None => {
            eprintln!("No model file provided, using default cube...");
            ModelJson::cube(2.0)
        }
    };

    println!("Loaded {} meshes", data.meshes.len());

    let mut app = TerminalApp::with_size(Model::from(data), ViewerConfig::default(), 80, 24)?;
    let triangles = app.render();
    for line in app.renderer().lines() {
        println!("{}", line);
    }
    println!("{} triangles drawn", triangles);
    Ok(())
}
