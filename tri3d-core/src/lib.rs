/// tri3d Core Library - Software rasterization pipeline
///
/// This library provides the stateless core of the renderer: canonical mesh
/// construction, heading/pitch rotation math, depth-buffered scan conversion
/// and gamma-aware shading. Frontends own windows, input and redraw timing;
/// they hand a mesh and [`RenderParams`] to [`render`] and get pixels back.

pub mod color;
pub mod error;
pub mod geometry;
pub mod parse;
pub mod projection;
pub mod raster;
pub mod shapes;
pub mod transform;

pub use nalgebra;

// Re-export commonly used types
pub use color::{shade, LightMode, Rgb};
pub use error::{ConstructionError, ParseError};
pub use geometry::{Mesh, MeshBuilder, Triangle};
pub use projection::Viewport;
pub use raster::{render, render_with_depth, DepthBuffer, FrameBuffer, Rasterizer, RenderParams};
pub use shapes::{build_mesh, MeshCache, ShapeKind};
pub use transform::{Orientation, RotationMatrix};
