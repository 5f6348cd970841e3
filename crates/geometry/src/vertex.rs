use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// A mesh vertex as the geometry pass reads it.
///
/// Layout is `{vec3 position, vec3 color, vec3 normal, vec2 tex_coord}`,
/// tightly packed (44 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 44);

impl Vertex {
    /// A vertex with only a position; every other attribute is zero.
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn key(&self) -> VertexKey {
        VertexKey::of(self)
    }
}

/// Canonical, hashable identity of a vertex's full attribute tuple.
///
/// Floats are compared by bit pattern after folding `-0.0` onto `0.0`, so two
/// vertices get the same key exactly when their attributes compare equal
/// (for the finite values the generators produce).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexKey([u32; 11]);

impl VertexKey {
    pub fn of(vertex: &Vertex) -> Self {
        let mut bits = [0u32; 11];
        let attributes = vertex
            .position
            .iter()
            .chain(&vertex.color)
            .chain(&vertex.normal)
            .chain(&vertex.tex_coord);
        for (slot, value) in bits.iter_mut().zip(attributes) {
            *slot = canonical_bits(*value);
        }
        Self(bits)
    }
}

fn canonical_bits(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        let v = Vertex {
            position: [1.0, 2.0, 3.0],
            color: [4.0, 5.0, 6.0],
            normal: [7.0, 8.0, 9.0],
            tex_coord: [10.0, 11.0],
        };
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&v));
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn equal_attributes_give_equal_keys() {
        let a = Vertex::at([0.5, 0.0, 1.0]);
        let b = Vertex::at([0.5, 0.0, 1.0]);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn any_attribute_difference_changes_key() {
        let base = Vertex::at([0.0, 0.0, 0.0]);
        let mut by_normal = base;
        by_normal.normal = [0.0, 0.0, -1.0];
        let mut by_uv = base;
        by_uv.tex_coord = [0.25, 0.0];
        assert_ne!(base.key(), by_normal.key());
        assert_ne!(base.key(), by_uv.key());
        assert_ne!(by_normal.key(), by_uv.key());
    }

    #[test]
    fn negative_zero_folds_onto_zero() {
        let a = Vertex::at([0.0, 1.0, 0.0]);
        let b = Vertex::at([-0.0, 1.0, 0.0]);
        assert_eq!(a, b);
        assert_eq!(a.key(), b.key());
    }
}
