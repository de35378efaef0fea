/// Blits frame buffers into terminal cells
use crossterm::{
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use tri3d_core::{FrameBuffer, Rgb, Viewport};

/// Character luminosity ramp for ASCII output (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Upper half block: foreground paints the top pixel, background the bottom one
const HALF_BLOCK: char = '▀';

/// Smallest frame edge (in pixels) rendered behind the terminal cells, large
/// enough to hold the 346-pixel-wide sphere.
const MIN_FRAME_EDGE: u32 = 420;

/// How a terminal cell shows its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Two truecolor pixels per cell using the upper half block.
    HalfBlock,
    /// One colored ramp character per cell, picked by luminance.
    Ascii,
}

impl CellStyle {
    pub fn toggled(self) -> Self {
        match self {
            CellStyle::HalfBlock => CellStyle::Ascii,
            CellStyle::Ascii => CellStyle::HalfBlock,
        }
    }
}

/// Maps a terminal grid onto a frame buffer and draws it
///
/// Every cell stands for a 1x2 block of "virtual" pixels; the frame is
/// rendered `scale` times larger and sampled at block centers so the
/// 200-unit shapes fit small terminals.
pub struct TerminalRenderer {
    cols: u16,
    rows: u16,
    scale: u32,
    style: CellStyle,
}

impl TerminalRenderer {
    pub fn new(cols: u16, rows: u16, style: CellStyle) -> Self {
        Self {
            cols,
            rows,
            scale: sample_scale(cols, rows),
            style,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.scale = sample_scale(cols, rows);
    }

    pub fn style(&self) -> CellStyle {
        self.style
    }

    pub fn set_style(&mut self, style: CellStyle) {
        self.style = style;
    }

    /// Size of the frame the core should render for this grid
    pub fn viewport(&self) -> Viewport {
        Viewport::new(
            self.cols as u32 * self.scale,
            self.rows as u32 * 2 * self.scale,
        )
    }

    /// Top and bottom pixel sampled for cell (`col`, `row`)
    fn cell_pixels(&self, frame: &FrameBuffer, col: u16, row: u16) -> ([u8; 3], [u8; 3]) {
        let half = self.scale / 2;
        let x = col as u32 * self.scale + half;
        let top = row as u32 * 2 * self.scale + half;
        let bottom = top + self.scale;
        (frame.pixel(x, top), frame.pixel(x, bottom))
    }

    pub fn draw<W: Write>(&self, frame: &FrameBuffer, writer: &mut W) -> std::io::Result<()> {
        if frame.is_empty() || self.viewport() != Viewport::new(frame.width(), frame.height()) {
            return Ok(());
        }
        for row in 0..self.rows {
            for col in 0..self.cols {
                let (top, bottom) = self.cell_pixels(frame, col, row);
                match self.style {
                    CellStyle::HalfBlock => {
                        writer.queue(SetForegroundColor(rgb(top)))?;
                        writer.queue(SetBackgroundColor(rgb(bottom)))?;
                        writer.queue(Print(HALF_BLOCK))?;
                    }
                    CellStyle::Ascii => {
                        let avg = average(top, bottom);
                        writer.queue(SetForegroundColor(rgb(avg)))?;
                        writer.queue(Print(ramp_char(avg)))?;
                    }
                }
            }
            writer.queue(ResetColor)?;
            if row + 1 < self.rows {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Oversampling factor so the shorter frame edge is at least `MIN_FRAME_EDGE`
fn sample_scale(cols: u16, rows: u16) -> u32 {
    let edge = (cols as u32).min(rows as u32 * 2).max(1);
    MIN_FRAME_EDGE.div_ceil(edge).max(1)
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb { r, g, b }
}

fn average(a: [u8; 3], b: [u8; 3]) -> [u8; 3] {
    [0, 1, 2].map(|i| ((a[i] as u16 + b[i] as u16) / 2) as u8)
}

/// Ramp character for a pixel, by luminance
fn ramp_char([r, g, b]: [u8; 3]) -> char {
    let luma = Rgb::from_rgb8(r, g, b).luminance();
    let index = (luma * (LUMINOSITY_RAMP.len() - 1) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp_char([0, 0, 0]), ' ');
        assert_eq!(ramp_char([255, 255, 255]), '@');
    }

    #[test]
    fn test_ramp_weights_green_over_blue() {
        // Pure green is far brighter than pure blue under Rec. 709
        assert_eq!(ramp_char([0, 255, 0]), '*');
        assert_eq!(ramp_char([0, 0, 255]), '.');
    }

    #[test]
    fn test_viewport_fits_shapes() {
        let renderer = TerminalRenderer::new(80, 24, CellStyle::HalfBlock);
        let viewport = renderer.viewport();
        assert!(viewport.width >= MIN_FRAME_EDGE);
        assert!(viewport.height >= MIN_FRAME_EDGE);
        assert_eq!(viewport.width % 80, 0);
        assert_eq!(viewport.height % 48, 0);
    }

    #[test]
    fn test_draw_black_frame_ascii() {
        let renderer = TerminalRenderer::new(4, 2, CellStyle::Ascii);
        let viewport = renderer.viewport();
        let frame = FrameBuffer::new(viewport.width, viewport.height);
        let mut out = Vec::new();
        renderer.draw(&frame, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
        assert!(!text.contains('@'));
    }

    #[test]
    fn test_draw_skips_mismatched_frame() {
        let renderer = TerminalRenderer::new(4, 2, CellStyle::HalfBlock);
        let mut out = Vec::new();
        renderer.draw(&FrameBuffer::new(3, 3), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_toggle_style() {
        assert_eq!(CellStyle::HalfBlock.toggled(), CellStyle::Ascii);
        assert_eq!(CellStyle::Ascii.toggled(), CellStyle::HalfBlock);
    }
}
