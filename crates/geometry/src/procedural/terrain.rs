use lumen_common::Shape;

use super::{MeshBuilder, ProceduralMesh, QuadSplit, check_resolution};
use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::vertex::Vertex;

/// Flat `r × r` grid of unit cells on the XZ plane at `y = 0`.
///
/// Only positions are filled in; color, normal and texture coordinates stay
/// zero, so welding happens on position alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrain {
    resolution: u32,
}

impl Terrain {
    pub fn new(resolution: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            resolution: check_resolution(Shape::Terrain, resolution)?,
        })
    }
}

impl ProceduralMesh for Terrain {
    fn shape(&self) -> Shape {
        Shape::Terrain
    }

    fn resolution(&self) -> u32 {
        self.resolution
    }

    fn generate(&self) -> Mesh {
        let r = self.resolution as usize;
        let mut builder = MeshBuilder::with_capacity((r + 1) * (r + 1), 6 * r * r);
        for x in 0..self.resolution {
            let (x0, x1) = (x as f32, (x + 1) as f32);
            for z in 0..self.resolution {
                let (z0, z1) = (z as f32, (z + 1) as f32);
                builder.cell(
                    [
                        Vertex::at([x0, 0.0, z0]),
                        Vertex::at([x1, 0.0, z0]),
                        Vertex::at([x0, 0.0, z1]),
                        Vertex::at([x1, 0.0, z1]),
                    ],
                    QuadSplit::LeadV3,
                );
            }
        }
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welded_vertex_count_is_r_plus_one_squared() {
        for r in [1u32, 2, 3, 10, 33] {
            let mesh = Terrain::new(r).unwrap().generate();
            let expected = ((r + 1) * (r + 1)) as usize;
            assert_eq!(mesh.vertex_count(), expected, "r={r}");
            assert!(mesh.vertex_count() <= 4 * (r * r) as usize);
            assert_eq!(mesh.triangle_count(), 2 * (r * r) as usize);
        }
    }

    #[test]
    fn terrain_lies_flat_with_zeroed_attributes() {
        let mesh = Terrain::new(5).unwrap().generate();
        for v in mesh.vertices() {
            assert_eq!(v.position[1], 0.0);
            assert_eq!(v.color, [0.0; 3]);
            assert_eq!(v.normal, [0.0; 3]);
            assert_eq!(v.tex_coord, [0.0; 2]);
        }
    }

    #[test]
    fn first_cell_winding() {
        let mesh = Terrain::new(2).unwrap().generate();
        assert_eq!(&mesh.indices()[..6], &[0, 1, 2, 2, 1, 3]);
        // Second cell (z = 1) reuses the first cell's far edge.
        assert_eq!(&mesh.indices()[6..9], &[2, 3, 4]);
    }

    #[test]
    fn terrain_spans_resolution_units() {
        let mesh = Terrain::new(4).unwrap().generate();
        let max_x = mesh
            .vertices()
            .iter()
            .map(|v| v.position[0])
            .fold(0.0f32, f32::max);
        assert_eq!(max_x, 4.0);
    }
}
