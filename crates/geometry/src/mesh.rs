use std::ops::Deref;
use std::sync::Arc;

use glam::Vec3;
use sha2::{Digest, Sha256};

use crate::error::GeometryError;
use crate::vertex::Vertex;

/// Indexed triangle-list geometry.
///
/// # Invariants
/// - Every index is `< vertices.len()`.
/// - `indices.len()` is a multiple of 3.
/// - Immutable once built; share it through [`MeshHandle`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Accept buffers produced outside this crate (file importers and the
    /// like), checking only the index invariants.
    pub fn from_buffers(vertices: Vec<Vertex>, indices: Vec<u32>) -> Result<Self, GeometryError> {
        if indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(GeometryError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }
        Ok(Self { vertices, indices })
    }

    /// Wrap buffers that came out of a [`VertexWelder`](crate::VertexWelder).
    ///
    /// An out-of-range index here can only be a welder bug, so it panics.
    pub(crate) fn from_welded(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        assert!(
            indices.len() % 3 == 0,
            "welded mesh has a partial triangle ({} indices)",
            indices.len()
        );
        assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "welded mesh index out of range for {} vertices",
            vertices.len()
        );
        Self { vertices, indices }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as index triples, in emission order.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Axis-aligned bounds of the vertex positions, `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = self.vertices.iter().map(|v| Vec3::from_array(v.position));
        let first = points.next()?;
        Some(points.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Raw vertex buffer bytes for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index buffer bytes for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// SHA-256 over the vertex and index buffers.
    ///
    /// Generation is deterministic, so this is stable across runs and usable
    /// as a golden value.
    pub fn fingerprint(&self) -> MeshFingerprint {
        let mut hasher = Sha256::new();
        hasher.update((self.vertices.len() as u64).to_le_bytes());
        hasher.update(self.vertex_bytes());
        hasher.update((self.indices.len() as u64).to_le_bytes());
        hasher.update(self.index_bytes());
        MeshFingerprint(hasher.finalize().into())
    }
}

/// Content digest of a mesh, printed as lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshFingerprint(pub [u8; 32]);

impl std::fmt::Display for MeshFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Shared, read-only reference to a mesh.
///
/// Cloning the handle never copies the buffers; the mesh is released when
/// the last handle is dropped.
#[derive(Debug, Clone)]
pub struct MeshHandle(Arc<Mesh>);

impl MeshHandle {
    pub fn new(mesh: Mesh) -> Self {
        Self(Arc::new(mesh))
    }

    /// True if both handles point at the same buffers.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// Number of live handles to this mesh.
    pub fn share_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl From<Mesh> for MeshHandle {
    fn from(mesh: Mesh) -> Self {
        Self::new(mesh)
    }
}

impl Deref for MeshHandle {
    type Target = Mesh;

    fn deref(&self) -> &Mesh {
        &self.0
    }
}
