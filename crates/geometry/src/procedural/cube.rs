use lumen_common::Shape;

use super::{Face, GridStep, MeshBuilder, ProceduralMesh, check_resolution};
use crate::error::GeometryError;
use crate::mesh::Mesh;

/// Unit cube spanning `[0, 1]³`, each face subdivided into `r × r` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cube {
    resolution: u32,
}

impl Cube {
    pub fn new(resolution: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            resolution: check_resolution(Shape::Cube, resolution)?,
        })
    }
}

impl ProceduralMesh for Cube {
    fn shape(&self) -> Shape {
        Shape::Cube
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn generate(&self) -> Mesh {
        let r = self.resolution;
        let cells = (r as usize) * (r as usize);
        let corners = (r as usize + 1) * (r as usize + 1);
        let mut builder = MeshBuilder::with_capacity(6 * corners, 36 * cells);
        let grid = GridStep::new(r);

        // Emission order is part of the output: front, back, up and down
        // interleave per x column, then left and right per y row.
        for x in 0..r {
            let xs = grid.span(x);
            for face in [Face::Front, Face::Back] {
                for y in 0..r {
                    builder.face_cell(face, xs, grid.span(y));
                }
            }
            for face in [Face::Up, Face::Down] {
                for z in 0..r {
                    builder.face_cell(face, xs, grid.span(z));
                }
            }
        }
        for y in 0..r {
            let ys = grid.span(y);
            for face in [Face::Left, Face::Right] {
                for z in 0..r {
                    builder.face_cell(face, ys, grid.span(z));
                }
            }
        }

        builder.finish()
    }
}
