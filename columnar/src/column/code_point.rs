use crate::ColumnarError;

use super::{Column, Slots};

const CELL_SIZE: usize = 4;

/// Fixed-width strings stored as `chars` little-endian `u32` code-point cells
/// per element, one cell per character.
///
/// Cells that are not Unicode scalar values decode to nothing, and trailing
/// NUL characters are dropped from the decoded string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodePointColumn {
    slots: Slots,
}

impl CodePointColumn {
    /// Allocates `len` empty strings of `chars` cells each.
    pub fn with_capacity(len: usize, chars: usize) -> Result<Self, ColumnarError> {
        Ok(Self {
            slots: Slots::zeroed(len, cell_stride(chars)?)?,
        })
    }

    /// Wraps a buffer whose length must be a multiple of `chars * 4`.
    pub fn from_bytes(bytes: Vec<u8>, chars: usize) -> Result<Self, ColumnarError> {
        Ok(Self {
            slots: Slots::wrap(bytes, cell_stride(chars)?)?,
        })
    }

    /// Number of code-point cells in one element.
    #[inline]
    pub fn chars(&self) -> usize {
        self.slots.stride() / CELL_SIZE
    }

    /// Copies `cells` verbatim into the start of element `idx`. Cells past
    /// `cells.len()` keep their previous content.
    pub fn set_code_points(&mut self, idx: usize, cells: &[u32]) -> Result<(), ColumnarError> {
        self.check_fits(cells.len())?;
        let slot = self.slots.slot_mut(idx)?;
        for (dst, cell) in slot.chunks_exact_mut(CELL_SIZE).zip(cells) {
            dst.copy_from_slice(&cell.to_le_bytes());
        }
        Ok(())
    }

    /// Raw cells of the elements `[begin, end)`, without decoding.
    pub fn subarray(&self, begin: usize, end: usize) -> Result<Vec<u32>, ColumnarError> {
        Ok(cells(self.slots.range(begin, end)?).collect())
    }

    fn check_fits(&self, count: usize) -> Result<(), ColumnarError> {
        if count > self.chars() {
            return Err(ColumnarError::EncodingOverflow {
                len: count,
                capacity: self.chars(),
            });
        }
        Ok(())
    }
}

fn cell_stride(chars: usize) -> Result<usize, ColumnarError> {
    chars
        .checked_mul(CELL_SIZE)
        .ok_or(ColumnarError::CapacityOverflow {
            len: chars,
            width: CELL_SIZE,
        })
}

fn cells(bytes: &[u8]) -> impl Iterator<Item = u32> + '_ {
    bytes.chunks_exact(CELL_SIZE).map(|cell| {
        let mut word = [0u8; CELL_SIZE];
        word.copy_from_slice(cell);
        u32::from_le_bytes(word)
    })
}

fn write_str(slot: &mut [u8], value: &str) {
    slot.fill(0);
    for (dst, ch) in slot.chunks_exact_mut(CELL_SIZE).zip(value.chars()) {
        dst.copy_from_slice(&u32::from(ch).to_le_bytes());
    }
}

impl Column for CodePointColumn {
    type Item<'a> = String;
    type Value = str;

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn get(&self, idx: usize) -> Result<String, ColumnarError> {
        let mut ans: String = cells(self.slots.slot(idx)?)
            .filter_map(char::from_u32)
            .collect();
        let trimmed = ans.trim_end_matches('\0').len();
        ans.truncate(trimmed);
        Ok(ans)
    }

    fn set(&mut self, idx: usize, value: &str) -> Result<(), ColumnarError> {
        self.check_fits(value.chars().count())?;
        write_str(self.slots.slot_mut(idx)?, value);
        Ok(())
    }

    fn fill(&mut self, value: &str) -> Result<(), ColumnarError> {
        self.check_fits(value.chars().count())?;
        for slot in self.slots.slots_mut() {
            write_str(slot, value);
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

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn one_cell_per_char() {
        let mut column = CodePointColumn::with_capacity(2, 3).unwrap();
        column.set(0, "€a").unwrap();
        assert_eq!(column.get(0).unwrap(), "€a");
        assert_eq!(
            &column.as_bytes()[..12],
            &[0xac, 0x20, 0, 0, 0x61, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(column.get(1).unwrap(), "");
    }

    #[test]
    fn too_many_chars() {
        let mut column = CodePointColumn::with_capacity(1, 2).unwrap();
        assert_eq!(
            column.set(0, "abc"),
            Err(ColumnarError::EncodingOverflow {
                len: 3,
                capacity: 2
            })
        );
        // three bytes of UTF-8 but a single char
        column.set(0, "€").unwrap();
        assert!(column.set_code_points(0, &[1, 2, 3]).is_err());
    }

    #[test]
    fn invalid_cells_decode_to_nothing() {
        let mut column = CodePointColumn::with_capacity(1, 4).unwrap();
        column
            .set_code_points(0, &[0x68, 0xD800, 0x69, 0x11_0000])
            .unwrap();
        assert_eq!(column.get(0).unwrap(), "hi");
    }

    #[test]
    fn raw_cells_replace_prefix_only() {
        let mut column = CodePointColumn::with_capacity(1, 4).unwrap();
        column.set(0, "abcd").unwrap();
        column.set_code_points(0, &[0x78, 0x79]).unwrap();
        assert_eq!(column.get(0).unwrap(), "xycd");
        column.set(0, "z").unwrap();
        assert_eq!(column.subarray(0, 1).unwrap(), vec![0x7a, 0, 0, 0]);
    }

    #[test]
    fn only_trailing_nul_is_stripped() {
        let mut column = CodePointColumn::with_capacity(1, 4).unwrap();
        column.set_code_points(0, &[0x61, 0, 0x62, 0]).unwrap();
        assert_eq!(column.get(0).unwrap(), "a\0b");
    }

    #[test]
    fn subarray_scales_by_chars() {
        let mut column = CodePointColumn::with_capacity(3, 2).unwrap();
        column.set(0, "ab").unwrap();
        column.set(1, "c").unwrap();
        column.set(2, "de").unwrap();
        assert_eq!(column.subarray(1, 3).unwrap(), vec![0x63, 0, 0x64, 0x65]);
        assert!(column.subarray(1, 1).unwrap().is_empty());
        assert_eq!(
            column.subarray(2, 4),
            Err(ColumnarError::IndexOutOfRange { index: 4, len: 3 })
        );
    }

    #[test]
    fn fill_and_iterate() {
        let mut column = CodePointColumn::with_capacity(3, 2).unwrap();
        column.fill("ok").unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec!["ok"; 3]);
        assert!(column.fill("nope").is_err());
        assert_eq!(column.iter().len(), 3);
    }

    #[test]
    fn oversized_width() {
        let chars = usize::MAX / CELL_SIZE + 1;
        assert_eq!(
            CodePointColumn::from_bytes(vec![0; 4], chars),
            Err(ColumnarError::CapacityOverflow {
                len: chars,
                width: CELL_SIZE
            })
        );
        assert!(CodePointColumn::with_capacity(1, chars).is_err());
        assert!(CodePointColumn::with_capacity(usize::MAX / 4, 2).is_err());
    }

    #[test]
    fn out_of_range_index() {
        let mut column = CodePointColumn::with_capacity(2, 2).unwrap();
        assert_eq!(
            column.get(2),
            Err(ColumnarError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            column.set(2, "a"),
            Err(ColumnarError::IndexOutOfRange { index: 2, len: 2 })
        );
        assert_eq!(
            column.set_code_points(7, &[0x61]),
            Err(ColumnarError::IndexOutOfRange { index: 7, len: 2 })
        );
        assert_eq!(column.as_bytes(), &[0; 16]);
    }

    #[test]
    fn wrap_validates_size() {
        assert_eq!(
            CodePointColumn::from_bytes(vec![0; 6], 1),
            Err(ColumnarError::InvalidBufferSize { len: 6, stride: 4 })
        );
        let column = CodePointColumn::from_bytes(vec![0x41, 0, 0, 0, 0x42, 0, 0, 0], 1).unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.chars(), 1);
    }
}
