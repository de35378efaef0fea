/// Example: open the viewer on a spinning icosphere
///
/// Usage: cargo run --example spinning_sphere -- [levels]
use std::env;
use std::io;
use tri3d_core::{Rgb, ShapeKind};
use tri3d_terminal::{AppConfig, CellStyle, TerminalApp};

fn main() -> io::Result<()> {
    let levels: u32 = match env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("bad level: {e}")))?,
        None => 3,
    };
    let shape: ShapeKind = format!("icosphere:{levels}")
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{e}")))?;

    println!("Rendering {} triangles (press Space to spin, Q to quit)...", shape.triangle_count());
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(AppConfig {
        shape,
        color: Rgb::from_rgb8(80, 160, 255),
        style: CellStyle::HalfBlock,
    })?;
    app.run()
}
