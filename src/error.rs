use thiserror::Error;

/// Errors produced while compiling tables, selecting partitions or packing blocks.
#[derive(Debug, Error)]
pub enum Error {
    /// The block footprint cannot be compiled.
    #[error("unsupported block size {x}x{y}, each axis must be in 2..=12")]
    UnsupportedBlockSize { x: u32, y: u32 },

    /// A weight grid referenced by a legal block mode has no usable precision.
    #[error("no 1-plane or 2-plane weight precision fits a {x_weights}x{y_weights} weight grid")]
    NoWeightPrecision { x_weights: u32, y_weights: u32 },

    /// Inconsistent input or internal state. Not recoverable for the block at hand.
    #[error("invariant violated: {0}")]
    InvariantViolated(String),

    #[error("unsupported partition count {0}, expected 1..=4")]
    UnsupportedPartitionCount(u32),

    #[error("image data has {actual} bytes, expected {expected}")]
    ImageSizeMismatch { expected: usize, actual: usize },

    #[error("invalid .astc container: {0}")]
    InvalidContainer(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Error::InvariantViolated(message.into())
    }
}
