/// Canonical meshes: flat shapes, a cube and the subdivided icosphere
use std::collections::HashMap;

use nalgebra::Point3;
use tracing::{debug, instrument};

use crate::color::Rgb;
use crate::geometry::{Mesh, MeshBuilder};

/// Half the edge length of the built-in shapes.
pub const HALF_EXTENT: f64 = 100.0;

/// Highest icosphere subdivision level accepted from textual descriptors.
pub const MAX_ICOSPHERE_LEVEL: u32 = 7;

/// Radius every icosphere vertex is pushed out to: `sqrt(3 * 100²)`.
pub fn icosphere_radius() -> f64 {
    30000f64.sqrt()
}

/// The shapes the engine knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeKind {
    #[default]
    Triangle,
    Square,
    Cube,
    Icosphere { levels: u32 },
}

impl ShapeKind {
    /// Number of triangles the built mesh will contain, saturating at
    /// `usize::MAX` for levels no machine could build.
    pub fn triangle_count(&self) -> usize {
        match self {
            ShapeKind::Triangle => 1,
            ShapeKind::Square => 2,
            ShapeKind::Cube => 12,
            ShapeKind::Icosphere { levels } => 4usize
                .checked_pow(*levels)
                .and_then(|n| n.checked_mul(4))
                .unwrap_or(usize::MAX),
        }
    }
}

/// Build the mesh for `shape`, painting every triangle `color`
pub fn build_mesh(shape: ShapeKind, color: Rgb) -> Mesh {
    match shape {
        ShapeKind::Triangle => triangle(color),
        ShapeKind::Square => square(color),
        ShapeKind::Cube => cube(color),
        ShapeKind::Icosphere { levels } => icosphere(color, levels),
    }
}

/// A single triangle pointing up the screen.
pub fn triangle(color: Rgb) -> Mesh {
    let h = HALF_EXTENT;
    let mut bld = MeshBuilder::with_capacity(3, 1);
    let a = bld.push_vertex(0.0, -h, 0.0);
    let b = bld.push_vertex(h, h, 0.0);
    let c = bld.push_vertex(-h, h, 0.0);
    bld.push_triangle([a, b, c], color);
    bld.build()
}

/// A square in the XY plane made of two triangles, facing +Z.
pub fn square(color: Rgb) -> Mesh {
    let h = HALF_EXTENT;
    let mut bld = MeshBuilder::with_capacity(4, 2);
    let bottom_left = bld.push_vertex(-h, -h, 0.0);
    let bottom_right = bld.push_vertex(h, -h, 0.0);
    let top_right = bld.push_vertex(h, h, 0.0);
    let top_left = bld.push_vertex(-h, h, 0.0);
    bld.push_triangle([bottom_left, bottom_right, top_right], color);
    bld.push_triangle([bottom_left, top_right, top_left], color);
    bld.build()
}

/// Corner signs of the cube, indexed by the face table below.
#[rustfmt::skip]
const CUBE_CORNERS: [[f64; 3]; 8] = [
    [-1.0, -1.0, -1.0], // 0
    [ 1.0, -1.0, -1.0], // 1
    [ 1.0,  1.0, -1.0], // 2
    [-1.0,  1.0, -1.0], // 3
    [-1.0, -1.0,  1.0], // 4
    [ 1.0, -1.0,  1.0], // 5
    [ 1.0,  1.0,  1.0], // 6
    [-1.0,  1.0,  1.0], // 7
];

/// Two triangles per face, wound so `(b - a) × (c - a)` points outward.
#[rustfmt::skip]
const CUBE_FACES: [[usize; 3]; 12] = [
    [4, 5, 6], [4, 6, 7], // front  (+Z)
    [1, 0, 3], [1, 3, 2], // back   (-Z)
    [0, 4, 7], [0, 7, 3], // left   (-X)
    [5, 1, 2], [5, 2, 6], // right  (+X)
    [7, 6, 2], [7, 2, 3], // top    (+Y)
    [0, 1, 5], [0, 5, 4], // bottom (-Y)
];

/// An axis-aligned cube with corners at (±100, ±100, ±100).
pub fn cube(color: Rgb) -> Mesh {
    let h = HALF_EXTENT;
    let mut bld = MeshBuilder::with_capacity(CUBE_CORNERS.len(), CUBE_FACES.len());
    for [x, y, z] in CUBE_CORNERS {
        bld.push_vertex(x * h, y * h, z * h);
    }
    for face in CUBE_FACES {
        bld.push_triangle(face, color);
    }
    bld.build()
}

/// Outward-wound faces of the seed tetrahedron.
const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [2, 0, 3], [2, 3, 1]];

/// A sphere approximated by subdividing a tetrahedron `levels` times
///
/// Each pass splits every triangle into four through its edge midpoints and
/// pushes the midpoints out to [`icosphere_radius`]:
///
/// ```text
///             i
///            /\
///          /   \
///     ij /______\ ik
///      / \      /\
///    /    \   /   \
///  /_______\/______\
/// j        jk       k
/// ```
///
/// Midpoints are shared between the two triangles on either side of an edge,
/// so the mesh stays watertight and vertex normals average across edges.
///
/// Memory grows as `4^levels`; the descriptor parser rejects levels above
/// [`MAX_ICOSPHERE_LEVEL`].
#[instrument(skip(color))]
pub fn icosphere(color: Rgb, levels: u32) -> Mesh {
    let h = HALF_EXTENT;
    let radius = icosphere_radius();

    // Reserve up front only for levels the parser accepts
    let face_count = ShapeKind::Icosphere {
        levels: levels.min(MAX_ICOSPHERE_LEVEL),
    }
    .triangle_count();
    let mut bld = MeshBuilder::with_capacity(face_count / 2 + 2, face_count);
    bld.push_vertex(h, h, h);
    bld.push_vertex(-h, -h, h);
    bld.push_vertex(-h, h, -h);
    bld.push_vertex(h, -h, -h);

    let mut faces = TETRAHEDRON_FACES.to_vec();
    for _ in 0..levels {
        let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
        let mut next = Vec::with_capacity(faces.len() * 4);

        for [i, j, k] in faces {
            let mut split = |a: usize, b: usize| {
                let key = (a.min(b), a.max(b));
                *midpoints.entry(key).or_insert_with(|| {
                    let mid = nalgebra::center(&bld.point(a), &bld.point(b));
                    bld.push_point(inflate(mid, radius))
                })
            };
            let (ij, ik, jk) = (split(i, j), split(i, k), split(j, k));
            next.extend([[i, ij, ik], [j, jk, ij], [k, ik, jk], [ij, jk, ik]]);
        }
        faces = next;
    }

    for &face in &faces {
        bld.push_triangle(face, color);
    }
    debug!(
        vertices = bld.vertex_count(),
        triangles = faces.len(),
        "built icosphere"
    );
    bld.build()
}

/// Rescale `p` so its distance from the origin is `radius`.
fn inflate(p: Point3<f64>, radius: f64) -> Point3<f64> {
    let len = p.coords.norm();
    if len == 0.0 {
        p
    } else {
        Point3::from(p.coords * (radius / len))
    }
}

/// Memoizes mesh geometry per [`ShapeKind`]
///
/// Geometry never depends on rotation or color, so a frontend can rebuild a
/// frame on every input event without re-subdividing the sphere.
#[derive(Debug, Default)]
pub struct MeshCache {
    meshes: HashMap<ShapeKind, Mesh>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mesh for `shape` painted `color`, building it on first use.
    pub fn get(&mut self, shape: ShapeKind, color: Rgb) -> Mesh {
        self.meshes
            .entry(shape)
            .or_insert_with(|| build_mesh(shape, Rgb::WHITE))
            .recolored(color)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
