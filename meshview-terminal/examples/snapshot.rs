/// Example: render one frame of an OBJ file to stdout without entering the viewer
///
/// Usage: cargo run --example snapshot -- path/to/model.obj [columns] [rows]
use anyhow::{Context, Result};
use meshview_core::{load_obj, Rasterizer};
use meshview_terminal::{init_logging, initial_scene, HalfBlockRenderer, InputConfig, LoggingConfig};
use std::io::{stdout, Write};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut args = std::env::args().skip(1);
    let model = match args.next() {
        Some(path) => Some(load_obj(&path).with_context(|| format!("failed to load {}", path))?),
        None => {
            eprintln!("No OBJ file provided, using default cube...");
            None
        }
    };
    let columns: usize = args.next().map(|c| c.parse()).transpose()?.unwrap_or(60);
    let rows: usize = args.next().map(|r| r.parse()).transpose()?.unwrap_or(30);

    let scene = initial_scene(model, &InputConfig::default())?;
    let renderer = HalfBlockRenderer::new(columns, rows);
    let (width, height) = renderer.pixel_size();
    let mut rasterizer = Rasterizer::new(width, height);
    rasterizer.config_mut().display_extent = Some(width.min(height) as f32);
    rasterizer.render(&scene)?;

    let mut stdout = stdout();
    renderer.draw(rasterizer.color_buffer(), &mut stdout)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
