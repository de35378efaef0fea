/// Geometry primitives for 3D rendering
///
/// A [`Mesh`] owns its vertices in a flat arena; triangles refer to them by
/// index so adjacent faces share vertices, and each vertex carries the sum of
/// the face normals of every triangle that touches it.
use nalgebra::{Point3, Vector3};

use crate::color::Rgb;

/// Normalize `v`, or return the zero vector if its length is exactly zero
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len == 0.0 {
        Vector3::zeros()
    } else {
        v / len
    }
}

/// Un-normalized face normal `(b - a) × (c - a)`
pub fn face_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a).cross(&(c - a))
}

/// A triangle face: three indices into the mesh's vertex arena and a color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub color: Rgb,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize, color: Rgb) -> Self {
        Self {
            indices: [a, b, c],
            color,
        }
    }
}

/// A 3D mesh composed of triangles over a shared vertex arena
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The three corner positions of `triangle`.
    pub fn corners(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        triangle.indices.map(|i| self.vertices[i])
    }

    /// Accumulated, not yet normalized, normal of vertex `index`.
    pub fn accumulated_normal(&self, index: usize) -> Vector3<f64> {
        self.normals[index]
    }

    /// Unit normal of vertex `index`, or zero if the faces around it cancel out.
    pub fn vertex_normal(&self, index: usize) -> Vector3<f64> {
        normalize_or_zero(&self.normals[index])
    }

    /// A copy of this mesh with every triangle painted `color`.
    pub fn recolored(&self, color: Rgb) -> Mesh {
        let mut mesh = self.clone();
        for tri in &mut mesh.triangles {
            tri.color = color;
        }
        mesh
    }
}

/// Incremental mesh construction
///
/// Vertex normals are accumulated once in [`MeshBuilder::build`], after all
/// faces are known.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<Triangle>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Add a vertex and return its index.
    pub fn push_vertex(&mut self, x: f64, y: f64, z: f64) -> usize {
        self.push_point(Point3::new(x, y, z))
    }

    pub fn push_point(&mut self, point: Point3<f64>) -> usize {
        self.vertices.push(point);
        self.vertices.len() - 1
    }

    pub fn point(&self, index: usize) -> Point3<f64> {
        self.vertices[index]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn push_triangle(&mut self, indices: [usize; 3], color: Rgb) {
        debug_assert!(indices.iter().all(|&i| i < self.vertices.len()));
        self.triangles.push(Triangle { indices, color });
    }

    pub fn build(self) -> Mesh {
        let mut normals = vec![Vector3::zeros(); self.vertices.len()];
        for tri in &self.triangles {
            let [a, b, c] = tri.indices;
            let n = face_normal(&self.vertices[a], &self.vertices[b], &self.vertices[c]);
            for i in tri.indices {
                normals[i] += n;
            }
        }
        Mesh {
            vertices: self.vertices,
            normals,
            triangles: self.triangles,
        }
    }
}
