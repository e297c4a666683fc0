//! Error types for qualia-blocks

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input ended while a block was still open. Its lines were written
    /// through untransformed before this was returned.
    #[error("unclosed block {quality}")]
    UnclosedBlock { prefix: String, quality: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
