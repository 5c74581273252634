use thiserror::Error;

/// Errors produced by BOM construction, explosion, and validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BomError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid required quantity: {0}")]
    InvalidQuantity(f64),

    #[error("Not found: {0}")]
    HeaderNotFound(String),

    /// Phantom composition revisits a material already on the exploration
    /// stack. `path` is the chain of materials that closed the loop,
    /// ending with the repeated `material_id`.
    #[error("Circular BOM reference at material {material_id} (path: {path:?})")]
    CircularReference { material_id: i64, path: Vec<i64> },

    #[error("Maximum explosion depth {limit} exceeded")]
    MaxDepthExceeded { limit: u32 },

    #[error("Graph reader error: {0}")]
    Graph(String),
}

impl BomError {
    /// Wraps a collaborator failure surfaced by a graph reader.
    pub fn graph(err: impl std::fmt::Display) -> Self {
        BomError::Graph(err.to_string())
    }
}
