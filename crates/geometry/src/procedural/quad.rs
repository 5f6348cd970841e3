use lumen_common::Shape;

use super::{Face, GridStep, MeshBuilder, ProceduralMesh, check_resolution};
use crate::error::GeometryError;
use crate::mesh::Mesh;

/// A single unit square in the `z = 0` plane facing −Z: the cube's front
/// face on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    resolution: u32,
}

impl Quad {
    pub fn new(resolution: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            resolution: check_resolution(Shape::Quad, resolution)?,
        })
    }
}

impl ProceduralMesh for Quad {
    fn shape(&self) -> Shape {
        Shape::Quad
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn generate(&self) -> Mesh {
        let r = self.resolution as usize;
        let mut builder = MeshBuilder::with_capacity((r + 1) * (r + 1), 6 * r * r);
        let grid = GridStep::new(self.resolution);
        for x in 0..self.resolution {
            let xs = grid.span(x);
            for y in 0..self.resolution {
                builder.face_cell(Face::Front, xs, grid.span(y));
            }
        }
        builder.finish()
    }
}
