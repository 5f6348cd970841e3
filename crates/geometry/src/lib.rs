//! Geometry: vertex layout, welding, shared mesh buffers and the procedural
//! generators that build them.
//!
//! # Invariants
//! - Every index of every mesh is below its vertex count.
//! - Equal attribute tuples weld to one vertex within a generation pass.
//! - Generation is deterministic: the same resolution yields the same bytes.

mod error;
mod mesh;
pub mod procedural;
mod vertex;
mod welder;

pub use error::GeometryError;
pub use mesh::{Mesh, MeshFingerprint, MeshHandle};
pub use procedural::{Cube, MAX_RESOLUTION, ProceduralMesh, Quad, Terrain, generate};
pub use vertex::{Vertex, VertexKey};
pub use welder::VertexWelder;
