//! Little-endian primitives of the variable-length record format.

use crate::ColumnarError;

/// Size of the record-count header and of every record's length prefix.
pub(crate) const PREFIX_LEN: usize = 4;

#[derive(Debug)]
pub(crate) struct Cursor<'de> {
    original: &'de [u8],
    pos: usize,
    end: usize,
}

impl<'de> Cursor<'de> {
    pub fn new(bytes: &'de [u8]) -> Self {
        Self {
            pos: 0,
            original: bytes,
            end: bytes.len(),
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Takes `ct` bytes, or `None` without advancing if fewer remain.
    pub fn try_take_n(&mut self, ct: usize) -> Option<&'de [u8]> {
        if self.pos.checked_add(ct)? > self.end {
            None
        } else {
            let sli = &self.original[self.pos..self.pos + ct];
            self.pos += ct;
            Some(sli)
        }
    }

    pub fn try_read_i32(&mut self) -> Option<i32> {
        let bytes = self.try_take_n(PREFIX_LEN)?;
        let mut word = [0u8; PREFIX_LEN];
        word.copy_from_slice(bytes);
        Some(i32::from_le_bytes(word))
    }
}

/// Encodes a record length as its wire prefix.
pub(crate) fn encode_len(len: usize) -> Result<[u8; PREFIX_LEN], ColumnarError> {
    let len = i32::try_from(len).map_err(|_| ColumnarError::EncodingOverflow {
        len,
        capacity: i32::MAX as usize,
    })?;
    Ok(len.to_le_bytes())
}
