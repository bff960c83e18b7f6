/// Lane3D Terminal Demo - Animated Bowling Alley
///
/// Renders the bowling scene as ASCII art and plays the keyframed roll.
/// Usage: `lane3d-terminal [config.toml]`
/// Controls:
///   - Space: Roll (restarts from the initial pose)
///   - X: Stop the animation
///   - Arrow Keys: Move forward / back, turn
///   - A/D: Strafe, W/S: Up / down
///   - Q/ESC: Quit
use std::env;
use std::io;

use lane3d_core::{Config, SceneConfig};
use lane3d_terminal::{to_io_error, TerminalApp};
use log::info;

fn main() -> io::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => {
            info!("loading scene configuration from {path}");
            SceneConfig::load_from_file(&path).map_err(to_io_error)?
        }
        None => SceneConfig::default(),
    };

    println!("Lane3D Terminal Renderer - Loading...");
    println!("Starting terminal renderer (press Space to roll, Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Thank you for using Lane3D Terminal Renderer!");
    Ok(())
}
