/// Terminal frontend for the tri3d software rasterizer
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::debug;
use tri3d_core::parse::DEFAULT_ICOSPHERE_LEVEL;
use tri3d_core::shapes::MAX_ICOSPHERE_LEVEL;
use tri3d_core::{
    LightMode, Mesh, MeshCache, Orientation, Rasterizer, RenderParams, Rgb, ShapeKind, Viewport,
};

pub mod renderer;

pub use renderer::{CellStyle, TerminalRenderer};

/// Radians applied per rotation key press
pub const ROTATION_STEP: f64 = 0.1;

/// Heading change per frame while auto-spin is on
const SPIN_STEP: f64 = 0.015;

/// Colors cycled by the `c` key
pub const PALETTE: [Rgb; 6] = [
    Rgb::WHITE,
    Rgb::new(1.0, 0.35, 0.2),
    Rgb::new(0.3, 0.85, 0.4),
    Rgb::new(0.25, 0.5, 1.0),
    Rgb::new(1.0, 0.8, 0.1),
    Rgb::new(0.8, 0.35, 0.9),
];

pub const USAGE: &str = "\
Usage: tri3d-terminal [--shape <shape>] [--color <color>] [--ascii]

  --shape   triangle | square | cube | icosphere[:<levels>]   (default: cube)
  --color   #rrggbb | r,g,b | white | black | red | green | blue
  --ascii   draw with a character ramp instead of half blocks";

/// Startup options taken from the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    pub shape: ShapeKind,
    pub color: Rgb,
    pub style: CellStyle,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            shape: ShapeKind::Cube,
            color: Rgb::WHITE,
            style: CellStyle::HalfBlock,
        }
    }
}

impl AppConfig {
    /// Parse arguments (without the program name)
    pub fn from_args<I>(args: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--shape" => {
                    let value = required_value(&arg, args.next())?;
                    config.shape = value.parse().map_err(invalid_input)?;
                }
                "--color" => {
                    let value = required_value(&arg, args.next())?;
                    config.color = value.parse().map_err(invalid_input)?;
                }
                "--ascii" => config.style = CellStyle::Ascii,
                other => {
                    return Err(invalid_input(format!("unexpected argument '{other}'")));
                }
            }
        }
        Ok(config)
    }
}

fn required_value(flag: &str, value: Option<String>) -> io::Result<String> {
    value.ok_or_else(|| invalid_input(format!("{flag} needs a value")))
}

fn invalid_input(err: impl ToString) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, err.to_string())
}

/// What the viewer shows, independent of the terminal it runs in
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerState {
    pub orientation: Orientation,
    pub shape: ShapeKind,
    /// Subdivision level used whenever the icosphere is selected
    pub level: u32,
    pub light: LightMode,
    pub color: Rgb,
    palette_index: Option<usize>,
    pub style: CellStyle,
    pub spinning: bool,
    pub running: bool,
}

impl ViewerState {
    pub fn new(config: AppConfig) -> Self {
        let level = match config.shape {
            ShapeKind::Icosphere { levels } => levels,
            _ => DEFAULT_ICOSPHERE_LEVEL,
        };
        Self {
            orientation: Orientation::zero(),
            shape: config.shape,
            level,
            light: LightMode::Flat,
            color: config.color,
            palette_index: PALETTE.iter().position(|c| *c == config.color),
            style: config.style,
            spinning: false,
            running: true,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('w') | KeyCode::Up => self.orientation.rotate(0.0, ROTATION_STEP),
            KeyCode::Char('s') | KeyCode::Down => self.orientation.rotate(0.0, -ROTATION_STEP),
            KeyCode::Char('a') | KeyCode::Left => self.orientation.rotate(-ROTATION_STEP, 0.0),
            KeyCode::Char('d') | KeyCode::Right => self.orientation.rotate(ROTATION_STEP, 0.0),
            KeyCode::Char('1') => self.select(ShapeKind::Triangle),
            KeyCode::Char('2') => self.select(ShapeKind::Square),
            KeyCode::Char('3') => self.select(ShapeKind::Cube),
            KeyCode::Char('4') => self.select(ShapeKind::Icosphere { levels: self.level }),
            KeyCode::Char('+') | KeyCode::Char('=') => self.set_level(self.level + 1),
            KeyCode::Char('-') => self.set_level(self.level.saturating_sub(1)),
            KeyCode::Char('l') => {
                self.light = match self.light {
                    LightMode::Flat => LightMode::directional(),
                    LightMode::Directional { .. } => LightMode::Flat,
                };
            }
            KeyCode::Char('c') => self.cycle_color(),
            KeyCode::Char('m') => self.style = self.style.toggled(),
            KeyCode::Char('r') => self.orientation = Orientation::zero(),
            KeyCode::Char(' ') => self.spinning = !self.spinning,
            _ => {}
        }
    }

    /// Advance per-frame animation
    pub fn tick(&mut self) {
        if self.spinning {
            self.orientation.rotate(SPIN_STEP, 0.0);
        }
    }

    fn select(&mut self, shape: ShapeKind) {
        debug!(%shape, "shape selected");
        self.shape = shape;
    }

    fn set_level(&mut self, level: u32) {
        self.level = level.min(MAX_ICOSPHERE_LEVEL);
        if let ShapeKind::Icosphere { .. } = self.shape {
            self.select(ShapeKind::Icosphere { levels: self.level });
        }
    }

    fn cycle_color(&mut self) {
        let next = self.palette_index.map_or(0, |i| (i + 1) % PALETTE.len());
        self.palette_index = Some(next);
        self.color = PALETTE[next];
    }

    pub fn params(&self, viewport: Viewport) -> RenderParams {
        RenderParams {
            orientation: self.orientation,
            viewport,
            light: self.light,
        }
    }

    fn light_label(&self) -> &'static str {
        match self.light {
            LightMode::Flat => "flat",
            LightMode::Directional { .. } => "directional",
        }
    }
}

/// Main application struct for the interactive terminal viewer
pub struct TerminalApp {
    state: ViewerState,
    meshes: MeshCache,
    mesh: Mesh,
    mesh_key: (ShapeKind, Rgb),
    rasterizer: Rasterizer,
    renderer: TerminalRenderer,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: AppConfig) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let state = ViewerState::new(config);
        let mut meshes = MeshCache::new();
        let mesh = meshes.get(state.shape, state.color);

        Ok(Self {
            mesh_key: (state.shape, state.color),
            renderer: TerminalRenderer::new(cols, rows, state.style),
            state,
            meshes,
            mesh,
            rasterizer: Rasterizer::new(),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.state.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.state.tick();
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => self.state.handle_key(code),
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.renderer.resize(cols, rows);
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let key = (self.state.shape, self.state.color);
        if key != self.mesh_key {
            self.mesh = self.meshes.get(key.0, key.1);
            self.mesh_key = key;
        }
        if self.renderer.style() != self.state.style {
            debug!(style = ?self.state.style, "cell style changed");
            self.renderer.set_style(self.state.style);
        }

        let params = self.state.params(self.renderer.viewport());
        let frame = self.rasterizer.render(&self.mesh, &params);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&frame, &mut stdout)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "tri3d | {} | light: {} | FPS: {:.1} | Arrows/WASD=Rotate 1-4=Shape +/-=Level L=Light C=Color M=Mode Space=Spin Q=Quit",
                self.state.shape,
                self.state.light_label(),
                self.fps
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
