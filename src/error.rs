use thiserror::Error;

/// Errors that can occur during page observation
#[derive(Debug, Error)]
pub enum ObserveError {
    /// The capture payload could not be parsed into a page tree
    #[error("Failed to parse page tree: {0}")]
    TreeParseFailed(String),

    /// The page tree is structurally invalid (bad parent links, missing root)
    #[error("Malformed page tree: {0}")]
    MalformedTree(String),

    /// Snapshot assembly failed partway through
    #[error("Snapshot extraction failed: {0}")]
    ExtractionFailed(String),

    /// Capturing the tree from a live tab failed
    #[cfg(feature = "chrome")]
    #[error("Page capture failed: {0}")]
    CaptureFailed(String),

    /// A protocol request could not be decoded
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for observation operations
pub type Result<T> = std::result::Result<T, ObserveError>;
