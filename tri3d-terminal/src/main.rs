/// tri3d Terminal Viewer
///
/// Renders a triangle, square, cube or icosphere in the terminal.
/// Controls:
///   - WASD / Arrow Keys: Rotate (heading / pitch)
///   - 1-4: Triangle, square, cube, icosphere
///   - +/-: Icosphere subdivision level
///   - L: Toggle flat / directional light
///   - C: Cycle color, M: Toggle half-block / ASCII
///   - Q/ESC: Quit
use std::io;
use tri3d_terminal::{AppConfig, TerminalApp, USAGE};

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let config = AppConfig::from_args(args).map_err(|e| {
        eprintln!("{USAGE}");
        e
    })?;

    let mut app = TerminalApp::new(config)?;
    app.run()
}
