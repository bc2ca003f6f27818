use thiserror::Error;

/// Compile error for a path expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path {path:?} at position {position}: {message}")]
pub struct YamlPathError {
    pub path: String,
    /// Byte offset into `path`.
    pub position: usize,
    pub message: String,
}
