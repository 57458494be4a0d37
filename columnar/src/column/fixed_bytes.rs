use crate::ColumnarError;

use super::{Column, Slots};

/// Fixed-width UTF-8 strings, `chars` bytes per element, NUL padded.
///
/// Reading a slot decodes it lossily and drops every NUL byte, so a string
/// containing `'\0'` does not survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedBytesColumn {
    slots: Slots,
}

impl FixedBytesColumn {
    /// Allocates `len` empty strings of `chars` bytes each.
    pub fn with_capacity(len: usize, chars: usize) -> Result<Self, ColumnarError> {
        Ok(Self {
            slots: Slots::zeroed(len, chars)?,
        })
    }

    /// Wraps a buffer whose length must be a multiple of `chars`.
    pub fn from_bytes(bytes: Vec<u8>, chars: usize) -> Result<Self, ColumnarError> {
        Ok(Self {
            slots: Slots::wrap(bytes, chars)?,
        })
    }

    /// Byte width of one element.
    #[inline]
    pub fn chars(&self) -> usize {
        self.slots.stride()
    }

    fn check_fits(&self, value: &str) -> Result<(), ColumnarError> {
        if value.len() > self.chars() {
            return Err(ColumnarError::EncodingOverflow {
                len: value.len(),
                capacity: self.chars(),
            });
        }
        Ok(())
    }
}

#[inline]
fn write_padded(slot: &mut [u8], value: &[u8]) {
    slot.fill(0);
    slot[..value.len()].copy_from_slice(value);
}

impl Column for FixedBytesColumn {
    type Item<'a> = String;
    type Value = str;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, idx: usize) -> Result<String, ColumnarError> {
        let slot = self.slots.slot(idx)?;
        Ok(String::from_utf8_lossy(slot).replace('\0', ""))
    }

    fn set(&mut self, idx: usize, value: &str) -> Result<(), ColumnarError> {
        self.check_fits(value)?;
        write_padded(self.slots.slot_mut(idx)?, value.as_bytes());
        Ok(())
    }

    fn fill(&mut self, value: &str) -> Result<(), ColumnarError> {
        self.check_fits(value)?;
        for slot in self.slots.slots_mut() {
            write_padded(slot, value.as_bytes());
        }
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        self.slots.as_bytes()
    }

    fn into_bytes(self) -> Vec<u8> {
        self.slots.into_bytes()
    }
}
