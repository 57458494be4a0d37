pub mod boolean;
pub mod code_point;
pub mod fixed_bytes;
pub mod var_bytes;

use std::slice::ChunksExactMut;

use crate::{iterable::ColumnIter, ColumnarError};

/// The capability contract shared by every column kind.
///
/// A column exclusively owns one flat byte buffer and maps logical indices
/// onto byte ranges inside it. Every indexed operation validates `idx`
/// against [`Column::len`] and fails with [`ColumnarError::IndexOutOfRange`]
/// instead of touching memory it does not own.
pub trait Column {
    /// Decoded value produced by [`Column::get`]; may borrow from the column.
    type Item<'a>
    where
        Self: 'a;
    /// Value accepted by [`Column::set`] and [`Column::fill`].
    type Value: ?Sized;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, idx: usize) -> Result<Self::Item<'_>, ColumnarError>;

    fn set(&mut self, idx: usize, value: &Self::Value) -> Result<(), ColumnarError>;

    fn fill(&mut self, value: &Self::Value) -> Result<(), ColumnarError>;

    /// Read-only access to the backing buffer.
    fn as_bytes(&self) -> &[u8];

    /// Gives the backing buffer up, e.g. to hand it to a writer.
    fn into_bytes(self) -> Vec<u8>
    where
        Self: Sized;

    /// A fresh iterator over the decoded values, starting at index 0.
    fn iter(&self) -> ColumnIter<'_, Self>
    where
        Self: Sized,
    {
        ColumnIter::new(self)
    }
}

#[inline]
pub(crate) fn check_index(idx: usize, len: usize) -> Result<(), ColumnarError> {
    if idx < len {
        Ok(())
    } else {
        Err(ColumnarError::IndexOutOfRange { index: idx, len })
    }
}

/// Validates a logical `[begin, end)` range against `len`.
#[inline]
pub(crate) fn check_range(begin: usize, end: usize, len: usize) -> Result<(), ColumnarError> {
    if begin > end {
        return Err(ColumnarError::IndexOutOfRange { index: begin, len });
    }
    if end > len {
        return Err(ColumnarError::IndexOutOfRange { index: end, len });
    }
    Ok(())
}

/// Fixed-stride storage: `bytes.len()` is always a multiple of `stride`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Slots {
    bytes: Vec<u8>,
    stride: usize,
}

impl Slots {
    pub(crate) fn zeroed(len: usize, stride: usize) -> Result<Self, ColumnarError> {
        if stride == 0 {
            return Err(ColumnarError::ZeroStride);
        }
        let size = len
            .checked_mul(stride)
            .ok_or(ColumnarError::CapacityOverflow { len, width: stride })?;
        Ok(Self {
            bytes: vec![0; size],
            stride,
        })
    }

    pub(crate) fn wrap(bytes: Vec<u8>, stride: usize) -> Result<Self, ColumnarError> {
        if stride == 0 {
            return Err(ColumnarError::ZeroStride);
        }
        if bytes.len() % stride != 0 {
            return Err(ColumnarError::InvalidBufferSize {
                len: bytes.len(),
                stride,
            });
        }
        Ok(Self { bytes, stride })
    }

    /// Stride 1: every buffer length is valid.
    pub(crate) fn bytewise(bytes: Vec<u8>) -> Self {
        Self { bytes, stride: 1 }
    }

    #[inline]
    pub(crate) fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.bytes.len() / self.stride
    }

    pub(crate) fn slot(&self, idx: usize) -> Result<&[u8], ColumnarError> {
        check_index(idx, self.len())?;
        let start = idx * self.stride;
        Ok(&self.bytes[start..start + self.stride])
    }

    pub(crate) fn slot_mut(&mut self, idx: usize) -> Result<&mut [u8], ColumnarError> {
        check_index(idx, self.len())?;
        let start = idx * self.stride;
        Ok(&mut self.bytes[start..start + self.stride])
    }

    /// Bytes of the logical elements `[begin, end)`.
    pub(crate) fn range(&self, begin: usize, end: usize) -> Result<&[u8], ColumnarError> {
        check_range(begin, end, self.len())?;
        Ok(&self.bytes[begin * self.stride..end * self.stride])
    }

    pub(crate) fn slots_mut(&mut self) -> ChunksExactMut<'_, u8> {
        self.bytes.chunks_exact_mut(self.stride)
    }

    #[inline]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
