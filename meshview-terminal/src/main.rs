/// Meshview Terminal - wireframe scene viewer
///
/// Usage: meshview-terminal [path/to/model.obj]
///
/// Without a path a cube is shown. Controls:
///   - Tab: cycle World / Camera / Model / Light frame
///   - x/y/z: rotation axis, r: local/world pivot
///   - Arrows, PageUp/PageDown: translate; a/d: rotate; +/-: scale
///   - n: next entity, Delete: remove active entity
///   - c/m/s/l: add camera / cube / sphere / light
///   - o/p/u: orthographic / perspective / frustum
///   - b/f/v/w/h: bounding cube, face normals, vertex normals, wireframe, camera proxy
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use log::info;
use meshview_core::load_obj;
use meshview_terminal::{init_logging, initial_scene, InputConfig, LoggingConfig, TerminalApp};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let model = match std::env::args().nth(1) {
        Some(path) => {
            let model = load_obj(&path).with_context(|| format!("failed to load {}", path))?;
            Some(model)
        }
        None => {
            info!("no model given, showing a cube");
            None
        }
    };

    let input = InputConfig::default();
    let scene = initial_scene(model, &input).context("failed to build the initial scene")?;

    let mut app = TerminalApp::new(scene, input).context("failed to query terminal size")?;
    app.run().context("terminal viewer failed")?;

    Ok(())
}
