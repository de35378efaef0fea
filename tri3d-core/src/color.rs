/// Colors, light modes and gamma-aware shading
use nalgebra::Vector3;

/// Exponent used to expand channels before scaling by light intensity.
pub const GAMMA: f64 = 2.4;

/// Lowest intensity a vertex receives under directional lighting.
pub const AMBIENT_FLOOR: f64 = 0.2;

/// An RGB color with channels normalized to [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Normalize 8-bit channels (0-255) to [0, 1].
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Quantize to 8-bit channels, rounding to nearest.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Relative luminance (Rec. 709 weights)
    pub fn luminance(self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Scale `color` by light `intensity` in gamma-expanded space
///
/// Each channel is raised to [`GAMMA`], multiplied by `intensity`, then brought
/// back with the inverse exponent and clamped to [0, 1].
pub fn shade(color: Rgb, intensity: f64) -> Rgb {
    let channel = |c: f64| {
        let linear = c.powf(GAMMA) * intensity;
        linear.max(0.0).powf(1.0 / GAMMA).clamp(0.0, 1.0)
    };
    Rgb::new(channel(color.r), channel(color.g), channel(color.b))
}

/// How the rasterizer computes light intensity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LightMode {
    /// One intensity per triangle: `|n.z|` of the screen-space face normal.
    #[default]
    Flat,
    /// Per-vertex `max(0.2, n · direction)` interpolated across the face.
    ///
    /// `direction` points toward the light, in view space.
    Directional { direction: Vector3<f64> },
}

impl LightMode {
    /// Directional light from the upper left, in front of the object.
    pub fn directional() -> Self {
        Self::Directional {
            direction: Vector3::new(-1.0, -1.0, 1.0).normalize(),
        }
    }

    /// Directional light along `direction`; a zero vector leaves only ambient light.
    pub fn directional_towards(direction: Vector3<f64>) -> Self {
        Self::Directional {
            direction: crate::geometry::normalize_or_zero(&direction),
        }
    }
}

/// Intensity of a vertex with unit normal `normal` under a directional light
pub fn directional_intensity(normal: &Vector3<f64>, direction: &Vector3<f64>) -> f64 {
    normal.dot(direction).max(AMBIENT_FLOOR)
}
