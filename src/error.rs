use thiserror::Error;

/// Errors surfaced while assembling a chain of layers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// A layer produces a different number of values than its successor
    /// consumes.
    #[error("dimension mismatch: {out_size} outputs cannot feed a layer expecting {in_size} inputs")]
    DimensionMismatch { out_size: usize, in_size: usize },
}

pub type Result<T> = std::result::Result<T, NetworkError>;
