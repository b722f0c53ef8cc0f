use thiserror::Error;

/// Failure of a single step of the share-link pipeline
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("node {node} has a position that cannot be rounded: ({x}, {y})")]
    Coordinate { node: String, x: f64, y: f64 },
    #[error("failed to pack minimal schema: {0}")]
    Pack(#[source] bincode::Error),
    #[error("failed to unpack minimal schema: {0}")]
    Unpack(#[source] bincode::Error),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("compression failed: {0}")]
    Compress(#[from] std::io::Error),
    #[error("invalid settings payload: {0}")]
    Settings(#[from] serde_json::Error),
}

/// Error surfaced to callers creating a share link
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("failed to create shareable link, diagram may be too large")]
    Encode(#[source] CodecError),
}
