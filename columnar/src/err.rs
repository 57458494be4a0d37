use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnarError {
    #[error("corrupt buffer, missing or truncated header: {len} bytes")]
    CorruptHeader { len: usize },
    #[error("corrupt buffer, record {index} at byte {offset} needs {needed} bytes but only {available} remain")]
    CorruptRecord {
        index: usize,
        offset: usize,
        needed: i64,
        available: usize,
    },
    #[error("corrupt buffer, {0} undeclared bytes after the last record")]
    TrailingBytes(usize),
    #[error("value of {len} bytes does not fit a slot of {capacity}")]
    EncodingOverflow { len: usize, capacity: usize },
    #[error("index {index} out of range for column of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("buffer of {len} bytes is not a multiple of stride {stride}")]
    InvalidBufferSize { len: usize, stride: usize },
    #[error("{len} elements of {width} bytes exceed the addressable size")]
    CapacityOverflow { len: usize, width: usize },
    #[error("column element width must be at least one")]
    ZeroStride,
    #[error("record {index} has {actual} bytes, fill value has {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },
}
