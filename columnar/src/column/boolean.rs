use crate::ColumnarError;

use super::{Column, Slots};

const TRUE_BYTE: u8 = 1;
const FALSE_BYTE: u8 = 0;

/// One byte per element. Only a byte equal to `1` reads as `true`; this column
/// itself only ever writes `0` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BooleanColumn {
    slots: Slots,
}

impl BooleanColumn {
    /// Allocates `len` elements, all `false`.
    pub fn with_capacity(len: usize) -> Self {
        Self::from_bytes(vec![FALSE_BYTE; len])
    }

    /// Wraps a foreign buffer; every byte is one element.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            slots: Slots::bytewise(bytes),
        }
    }

    #[inline]
    fn encode(value: bool) -> u8 {
        if value {
            TRUE_BYTE
        } else {
            FALSE_BYTE
        }
    }
}

impl Column for BooleanColumn {
    type Item<'a> = bool;
    type Value = bool;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, idx: usize) -> Result<bool, ColumnarError> {
        Ok(self.slots.slot(idx)?[0] == TRUE_BYTE)
    }

    fn set(&mut self, idx: usize, value: &bool) -> Result<(), ColumnarError> {
        self.slots.slot_mut(idx)?[0] = Self::encode(*value);
        Ok(())
    }

    fn fill(&mut self, value: &bool) -> Result<(), ColumnarError> {
        let byte = Self::encode(*value);
        for slot in self.slots.slots_mut() {
            slot[0] = byte;
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

impl FromIterator<bool> for BooleanColumn {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self::from_bytes(iter.into_iter().map(Self::encode).collect())
    }
}
