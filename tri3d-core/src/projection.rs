/// Orthographic projection into viewport pixel space
use nalgebra::{Point3, Vector3};

/// Target image size in pixels
///
/// Projection is orthographic with the viewport center as origin: a rotated
/// vertex keeps its depth and is only shifted by half the viewport in x and y.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A viewport with no pixels renders to an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Vector3<f64> {
        Vector3::new(self.width as f64 / 2.0, self.height as f64 / 2.0, 0.0)
    }

    /// Map a rotated, origin-centered point to screen space (z unchanged)
    pub fn project(&self, point: &Point3<f64>) -> Point3<f64> {
        point + self.center()
    }

    /// Pixels whose centers may be covered by the triangle `v`
    ///
    /// The low bound rounds up and the high bound rounds down, so pixels only
    /// partially inside the extent are excluded. Returns `None` when the box
    /// misses the viewport.
    pub fn pixel_bounds(&self, v: &[Point3<f64>; 3]) -> Option<PixelRect> {
        if self.is_empty() {
            return None;
        }
        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;

        let x0 = v[0].x.min(v[1].x).min(v[2].x).ceil().max(0.0);
        let x1 = v[0].x.max(v[1].x).max(v[2].x).floor().min(max_x);
        let y0 = v[0].y.min(v[1].y).min(v[2].y).ceil().max(0.0);
        let y1 = v[0].y.max(v[1].y).max(v[2].y).floor().min(max_y);

        // Also rejects NaN coordinates
        if !(x0 <= x1 && y0 <= y1) {
            return None;
        }
        Some(PixelRect {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// An inclusive rectangle of pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    /// Restrict the rows to `rows.start..rows.end`, or `None` if none remain.
    pub fn clip_rows(&self, rows: std::ops::Range<u32>) -> Option<PixelRect> {
        let y0 = self.y0.max(rows.start);
        let y1 = self.y1.min(rows.end.checked_sub(1)?);
        (y0 <= y1).then_some(PixelRect { y0, y1, ..*self })
    }

    pub fn width(&self) -> u32 {
        self.x1 - self.x0 + 1
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0 + 1
    }
}
