//! Procedural mesh generators.
//!
//! Every generator welds the four corners of a grid cell before emitting the
//! cell's two triangles, so vertices shared between neighbouring cells are
//! stored once. Output depends only on the resolution.

mod cube;
mod quad;
mod terrain;

pub use cube::Cube;
pub use quad::Quad;
pub use terrain::Terrain;

use lumen_common::Shape;

use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::vertex::Vertex;
use crate::welder::VertexWelder;

/// Largest accepted resolution. Keeps every generated index within `u32`.
pub const MAX_RESOLUTION: u32 = 4096;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// A mesh generator parameterized by a single resolution.
pub trait ProceduralMesh {
    fn shape(&self) -> Shape;

    fn resolution(&self) -> u32;

    fn generate(&self) -> Mesh;
}

/// Build the mesh for `shape` at `resolution`.
pub fn generate(shape: Shape, resolution: u32) -> Result<Mesh, GeometryError> {
    let _span = tracing::debug_span!("generate_mesh", %shape, resolution).entered();
    let mesh = match shape {
        Shape::Cube => Cube::new(resolution)?.generate(),
        Shape::Quad => Quad::new(resolution)?.generate(),
        Shape::Terrain => Terrain::new(resolution)?.generate(),
    };
    tracing::debug!(
        vertices = mesh.vertex_count(),
        triangles = mesh.triangle_count(),
        "mesh generated"
    );
    Ok(mesh)
}

pub(crate) fn check_resolution(shape: Shape, resolution: u32) -> Result<u32, GeometryError> {
    if resolution == 0 || resolution > MAX_RESOLUTION {
        return Err(GeometryError::InvalidResolution { shape, resolution });
    }
    Ok(resolution)
}

/// Order of the second triangle of a cell with corners
/// `v1 = (a0, b0)`, `v2 = (a1, b0)`, `v3 = (a0, b1)`, `v4 = (a1, b1)`.
///
/// Both orders wind the same way; they differ in which corner leads, and the
/// index buffer must reproduce that exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuadSplit {
    /// `(v1, v2, v3), (v2, v4, v3)`
    LeadV2,
    /// `(v1, v2, v3), (v3, v2, v4)`
    LeadV3,
}

/// Grid coordinates along one axis for cell `i`.
///
/// Positions step by `1/r`; texture coordinates step by `1/r²`. The squared
/// UV spacing is intentional and must not be "fixed".
#[derive(Debug, Clone, Copy)]
pub(crate) struct GridStep {
    step: f32,
    step_sq: f32,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Span {
    pub p0: f32,
    pub p1: f32,
    pub t0: f32,
    pub t1: f32,
}

impl GridStep {
    pub fn new(resolution: u32) -> Self {
        let step = 1.0 / resolution as f32;
        Self {
            step,
            step_sq: step * step,
        }
    }

    pub fn span(&self, i: u32) -> Span {
        let p0 = i as f32 * self.step;
        let t0 = i as f32 * self.step_sq;
        Span {
            p0,
            p1: p0 + self.step,
            t0,
            t1: t0 + self.step_sq,
        }
    }
}

/// One face of the unit cube. The quad generator reuses `Front`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Front,
    Back,
    Up,
    Down,
    Left,
    Right,
}

impl Face {
    /// Map the face's two free axes onto a point of the unit cube.
    fn place(self, a: f32, b: f32) -> [f32; 3] {
        match self {
            Face::Front => [a, b, 0.0],
            Face::Back => [a, b, 1.0],
            Face::Up => [a, 0.0, b],
            Face::Down => [a, 1.0, b],
            Face::Left => [0.0, a, b],
            Face::Right => [1.0, a, b],
        }
    }

    /// Outward normal. Y points down, so the `y = 0` face is "up".
    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::Front => [0.0, 0.0, -1.0],
            Face::Back => [0.0, 0.0, 1.0],
            Face::Up => [0.0, -1.0, 0.0],
            Face::Down => [0.0, 1.0, 0.0],
            Face::Left => [-1.0, 0.0, 0.0],
            Face::Right => [1.0, 0.0, 0.0],
        }
    }

    fn split(self) -> QuadSplit {
        match self {
            Face::Front | Face::Back => QuadSplit::LeadV2,
            _ => QuadSplit::LeadV3,
        }
    }

    fn corner(self, a: f32, b: f32, u: f32, v: f32) -> Vertex {
        Vertex {
            position: self.place(a, b),
            color: WHITE,
            normal: self.normal(),
            tex_coord: [u, v],
        }
    }
}

/// Accumulates welded vertices and triangle indices for one mesh.
pub(crate) struct MeshBuilder {
    welder: VertexWelder,
    indices: Vec<u32>,
}

impl MeshBuilder {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            welder: VertexWelder::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Weld four cell corners (in order) and emit the cell's two triangles.
    pub fn cell(&mut self, corners: [Vertex; 4], split: QuadSplit) {
        let [v1, v2, v3, v4] = corners.map(|v| self.welder.weld(v));
        let triangles = match split {
            QuadSplit::LeadV2 => [v1, v2, v3, v2, v4, v3],
            QuadSplit::LeadV3 => [v1, v2, v3, v3, v2, v4],
        };
        self.indices.extend_from_slice(&triangles);
    }

    /// Emit grid cell `(a, b)` of a cube face.
    pub fn face_cell(&mut self, face: Face, a: Span, b: Span) {
        self.cell(
            [
                face.corner(a.p0, b.p0, a.t0, b.t0),
                face.corner(a.p1, b.p0, a.t1, b.t0),
                face.corner(a.p0, b.p1, a.t0, b.t1),
                face.corner(a.p1, b.p1, a.t1, b.t1),
            ],
            face.split(),
        );
    }

    pub fn finish(self) -> Mesh {
        Mesh::from_welded(self.welder.into_vertices(), self.indices)
    }
}
