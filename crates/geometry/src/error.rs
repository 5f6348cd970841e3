use lumen_common::Shape;

/// Errors from mesh construction and procedural generation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("invalid {shape} resolution {resolution}: must be at least 1")]
    InvalidResolution { shape: Shape, resolution: u32 },
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}
