use std::collections::HashMap;

use crate::vertex::{Vertex, VertexKey};

/// Deduplicates vertices by attribute identity while a mesh is being built.
///
/// Indices are assigned in first-seen order, so a fixed generation order
/// always produces the same vertex and index buffers. The map is only used
/// for lookups and never iterated.
#[derive(Debug, Default)]
pub struct VertexWelder {
    lookup: HashMap<VertexKey, u32>,
    vertices: Vec<Vertex>,
}

impl VertexWelder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lookup: HashMap::with_capacity(capacity),
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Return the index for `vertex`, appending it if no equal vertex exists.
    pub fn weld(&mut self, vertex: Vertex) -> u32 {
        let next = self.vertices.len() as u32;
        let index = *self.lookup.entry(vertex.key()).or_insert(next);
        if index == next {
            self.vertices.push(vertex);
        }
        index
    }

    /// Number of unique vertices so far.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn welding_is_idempotent() {
        let mut welder = VertexWelder::new();
        let v = Vertex::at([1.0, 2.0, 3.0]);
        let first = welder.weld(v);
        let second = welder.weld(v);
        assert_eq!(first, second);
        assert_eq!(welder.len(), 1);
    }

    #[test]
    fn distinct_vertices_get_sequential_indices() {
        let mut welder = VertexWelder::new();
        assert_eq!(welder.weld(Vertex::at([0.0, 0.0, 0.0])), 0);
        assert_eq!(welder.weld(Vertex::at([1.0, 0.0, 0.0])), 1);
        assert_eq!(welder.weld(Vertex::at([0.0, 0.0, 0.0])), 0);
        assert_eq!(welder.weld(Vertex::at([0.0, 1.0, 0.0])), 2);
        assert_eq!(welder.len(), 3);
    }

    #[test]
    fn existing_entries_are_never_rewritten() {
        let mut welder = VertexWelder::new();
        let a = Vertex::at([0.0, 0.0, 0.0]);
        let b = Vertex::at([5.0, 0.0, 0.0]);
        welder.weld(a);
        welder.weld(b);
        welder.weld(a);
        assert_eq!(welder.vertices(), &[a, b]);
    }

    #[test]
    fn same_order_same_output() {
        let points: Vec<Vertex> = (0..50)
            .map(|i| Vertex::at([(i % 7) as f32, (i % 3) as f32, 0.0]))
            .collect();
        let run = || {
            let mut welder = VertexWelder::new();
            let indices: Vec<u32> = points.iter().map(|v| welder.weld(*v)).collect();
            (welder.into_vertices(), indices)
        };
        assert_eq!(run(), run());
    }
}
