/// Depth-buffered triangle rasterization
///
/// A draw call allocates a black [`FrameBuffer`] and a [`DepthBuffer`] filled
/// with −∞, sets up every mesh triangle in screen space, then scan-converts
/// them. Larger z is closer to the viewer and wins the depth test. Since the
/// depth test decides visibility, triangle order does not change the image.
use std::ops::Range;

use nalgebra::Point3;
use tracing::{debug, instrument, trace};

use crate::color::{directional_intensity, shade, LightMode, Rgb};
use crate::geometry::{face_normal, normalize_or_zero, Mesh, Triangle};
use crate::projection::{PixelRect, Viewport};
use crate::transform::{Orientation, RotationMatrix};

/// Rows per band when scan conversion runs in parallel.
#[cfg(feature = "parallel")]
const DEFAULT_BAND_ROWS: u32 = 16;

/// Everything a draw call needs besides the mesh
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderParams {
    pub orientation: Orientation,
    pub viewport: Viewport,
    pub light: LightMode,
}

impl RenderParams {
    pub fn new(heading: f64, pitch: f64, width: u32, height: u32, light: LightMode) -> Self {
        Self {
            orientation: Orientation::new(heading, pitch),
            viewport: Viewport::new(width, height),
            light,
        }
    }
}

/// Row-major RGB pixels, one entry per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl FrameBuffer {
    /// A buffer of the given size filled with the black background.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    /// Pixel at column `x`, row `y`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[[u8; 3]]> {
        // chunks() rejects a zero size
        self.pixels.chunks(self.width.max(1) as usize)
    }

    /// Row-major RGBA bytes with opaque alpha, as canvas APIs expect.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&[r, g, b]| [r, g, b, u8::MAX])
            .collect()
    }
}

/// Per-pixel depth of the nearest surface drawn so far
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    values: Vec<f64>,
}

impl DepthBuffer {
    /// A buffer of the given size where every pixel is infinitely far away.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![f64::NEG_INFINITY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.values[y as usize * self.width as usize + x as usize]
    }
}

/// Twice the signed screen-space area of the triangle `v`
///
/// The sign encodes the winding; zero means the triangle is degenerate.
pub fn signed_area(v: &[Point3<f64>; 3]) -> f64 {
    let [v1, v2, v3] = v;
    (v1.y - v3.y) * (v2.x - v3.x) + (v2.y - v3.y) * (v3.x - v1.x)
}

/// Barycentric weights of `(x, y)` with respect to `v`, given `area = signed_area(v)`.
pub fn barycentric_weights(x: f64, y: f64, v: &[Point3<f64>; 3], area: f64) -> [f64; 3] {
    let [v1, v2, v3] = v;
    let b1 = ((y - v3.y) * (v2.x - v3.x) + (v2.y - v3.y) * (v3.x - x)) / area;
    let b2 = ((y - v1.y) * (v3.x - v1.x) + (v3.y - v1.y) * (v1.x - x)) / area;
    let b3 = ((y - v2.y) * (v1.x - v2.x) + (v1.y - v2.y) * (v2.x - x)) / area;
    [b1, b2, b3]
}

/// Barycentric weights of `(x, y)`, or `None` for a degenerate triangle
pub fn barycentric(x: f64, y: f64, v: &[Point3<f64>; 3]) -> Option<[f64; 3]> {
    let area = signed_area(v);
    (area != 0.0).then(|| barycentric_weights(x, y, v, area))
}

/// Whether weights place a point inside the triangle, edges included.
pub fn is_inside(weights: &[f64; 3]) -> bool {
    weights.iter().all(|w| (0.0..=1.0).contains(w))
}

/// Rotate the corners of a triangle and map them into viewport pixel space
pub fn project_triangle(
    corners: &[Point3<f64>; 3],
    rotation: &RotationMatrix,
    viewport: &Viewport,
) -> [Point3<f64>; 3] {
    corners.map(|p| viewport.project(&rotation.apply_point(&p)))
}

/// How the color of a covered pixel is obtained
#[derive(Debug, Clone, Copy)]
enum Shading {
    /// Shaded once for the whole face.
    Flat([u8; 3]),
    /// Intensity per vertex, interpolated with the barycentric weights.
    Interpolated { color: Rgb, intensity: [f64; 3] },
}

/// A triangle prepared for scan conversion
#[derive(Debug, Clone)]
struct ScreenTriangle {
    v: [Point3<f64>; 3],
    area: f64,
    bounds: PixelRect,
    shading: Shading,
}

impl ScreenTriangle {
    /// Project `tri` and precompute its shading, or `None` if it covers no pixels
    fn setup(
        mesh: &Mesh,
        tri: &Triangle,
        rotation: &RotationMatrix,
        viewport: &Viewport,
        light: &LightMode,
    ) -> Option<Self> {
        let v = project_triangle(&mesh.corners(tri), rotation, viewport);

        let area = signed_area(&v);
        if area == 0.0 {
            trace!(indices = ?tri.indices, "skipping degenerate triangle");
            return None;
        }
        let bounds = viewport.pixel_bounds(&v)?;

        let shading = match light {
            LightMode::Flat => {
                let normal = normalize_or_zero(&face_normal(&v[0], &v[1], &v[2]));
                Shading::Flat(shade(tri.color, normal.z.abs()).to_rgb8())
            }
            LightMode::Directional { direction } => {
                let intensity = tri.indices.map(|i| {
                    let normal = rotation.apply(&mesh.vertex_normal(i));
                    directional_intensity(&normal, direction)
                });
                Shading::Interpolated {
                    color: tri.color,
                    intensity,
                }
            }
        };

        Some(Self {
            v,
            area,
            bounds,
            shading,
        })
    }

    fn color_at(&self, weights: &[f64; 3]) -> [u8; 3] {
        match self.shading {
            Shading::Flat(rgb) => rgb,
            Shading::Interpolated { color, intensity } => {
                let s = weights[0] * intensity[0]
                    + weights[1] * intensity[1]
                    + weights[2] * intensity[2];
                shade(color, s).to_rgb8()
            }
        }
    }
}

/// Scan-convert `tris` into the rows `rows` of the frame
///
/// `pixels` and `depth` hold exactly those rows.
fn scan_band(
    tris: &[ScreenTriangle],
    width: u32,
    rows: Range<u32>,
    pixels: &mut [[u8; 3]],
    depth: &mut [f64],
) {
    for tri in tris {
        let Some(rect) = tri.bounds.clip_rows(rows.clone()) else {
            continue;
        };
        let [v1, v2, v3] = &tri.v;
        for y in rect.y0..=rect.y1 {
            let row = (y - rows.start) as usize * width as usize;
            for x in rect.x0..=rect.x1 {
                let weights = barycentric_weights(x as f64, y as f64, &tri.v, tri.area);
                if !is_inside(&weights) {
                    continue;
                }
                let z = weights[0] * v1.z + weights[1] * v2.z + weights[2] * v3.z;
                let idx = row + x as usize;
                if depth[idx] < z {
                    pixels[idx] = tri.color_at(&weights);
                    depth[idx] = z;
                }
            }
        }
    }
}

/// The scan-conversion engine
///
/// With the `parallel` feature the frame is cut into horizontal bands that
/// are rasterized on the rayon pool. Every band sees all triangles in mesh
/// order, so the output is identical to the serial path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(not(feature = "parallel"), allow(dead_code))]
pub struct Rasterizer {
    parallel: bool,
    band_rows: u32,
}

impl Rasterizer {
    /// Parallel when the `parallel` feature is enabled, serial otherwise.
    #[cfg(feature = "parallel")]
    pub fn new() -> Self {
        Self::parallel()
    }

    #[cfg(not(feature = "parallel"))]
    pub fn new() -> Self {
        Self::serial()
    }

    pub fn serial() -> Self {
        Self {
            parallel: false,
            band_rows: u32::MAX,
        }
    }

    #[cfg(feature = "parallel")]
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            band_rows: DEFAULT_BAND_ROWS,
        }
    }

    /// Set the band height used by the parallel path (at least one row).
    pub fn with_band_rows(self, band_rows: u32) -> Self {
        Self {
            band_rows: band_rows.max(1),
            ..self
        }
    }

    pub fn render(&self, mesh: &Mesh, params: &RenderParams) -> FrameBuffer {
        self.render_with_depth(mesh, params).0
    }

    /// Render `mesh` and also return the final depth buffer
    #[instrument(skip_all, fields(
        triangles = mesh.len(),
        width = params.viewport.width,
        height = params.viewport.height
    ))]
    pub fn render_with_depth(
        &self,
        mesh: &Mesh,
        params: &RenderParams,
    ) -> (FrameBuffer, DepthBuffer) {
        let viewport = params.viewport;
        let mut frame = FrameBuffer::new(viewport.width, viewport.height);
        let mut depth = DepthBuffer::new(viewport.width, viewport.height);
        if viewport.is_empty() {
            debug!("empty viewport, nothing to draw");
            return (frame, depth);
        }

        let rotation = params.orientation.matrix();
        let tris: Vec<ScreenTriangle> = mesh
            .triangles()
            .iter()
            .filter_map(|tri| ScreenTriangle::setup(mesh, tri, &rotation, &viewport, &params.light))
            .collect();
        debug!(visible = tris.len(), "triangles set up");

        self.scan(&tris, &mut frame, &mut depth);
        (frame, depth)
    }

    #[cfg(feature = "parallel")]
    fn scan(&self, tris: &[ScreenTriangle], frame: &mut FrameBuffer, depth: &mut DepthBuffer) {
        use rayon::prelude::*;

        let width = frame.width;
        if !self.parallel || self.band_rows >= frame.height {
            scan_band(tris, width, 0..frame.height, &mut frame.pixels, &mut depth.values);
            return;
        }

        let band_rows = self.band_rows;
        let band_len = band_rows as usize * width as usize;
        frame
            .pixels
            .par_chunks_mut(band_len)
            .zip(depth.values.par_chunks_mut(band_len))
            .enumerate()
            .for_each(|(band, (pixels, depth))| {
                let y0 = band as u32 * band_rows;
                let rows = y0..y0 + (pixels.len() / width as usize) as u32;
                scan_band(tris, width, rows, pixels, depth);
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn scan(&self, tris: &[ScreenTriangle], frame: &mut FrameBuffer, depth: &mut DepthBuffer) {
        let width = frame.width;
        scan_band(tris, width, 0..frame.height, &mut frame.pixels, &mut depth.values);
    }
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `mesh` with the default [`Rasterizer`]
pub fn render(mesh: &Mesh, params: &RenderParams) -> FrameBuffer {
    Rasterizer::new().render(mesh, params)
}

/// Render `mesh` with the default [`Rasterizer`], keeping the depth buffer
pub fn render_with_depth(mesh: &Mesh, params: &RenderParams) -> (FrameBuffer, DepthBuffer) {
    Rasterizer::new().render_with_depth(mesh, params)
}
