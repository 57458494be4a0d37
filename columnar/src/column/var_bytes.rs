use itertools::{izip, Itertools};

use crate::{
    columnar_internal::{encode_len, Cursor, PREFIX_LEN},
    ColumnarError,
};

use super::{check_index, check_range, fixed_bytes::FixedBytesColumn, Column};

/// A stream of variable-length byte records.
///
/// The buffer layout is a little-endian `i32` record count followed by that
/// many records, each an `i32` length prefix and the payload, back to back.
/// `offsets[i]` points at the first payload byte of record `i`; records are
/// contiguous and ordered, so every payload ends where the next prefix starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarBytesColumn {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
}

impl Default for VarBytesColumn {
    fn default() -> Self {
        Self::new()
    }
}

impl VarBytesColumn {
    /// A stream with no records: just a zero header.
    pub fn new() -> Self {
        Self {
            bytes: 0i32.to_le_bytes().to_vec(),
            offsets: Vec::new(),
            lengths: Vec::new(),
        }
    }

    /// `n` records of length zero.
    pub fn with_empty_records(n: usize) -> Result<Self, ColumnarError> {
        let header = encode_len(n)?;
        let size = n
            .checked_add(1)
            .and_then(|words| words.checked_mul(PREFIX_LEN))
            .ok_or(ColumnarError::CapacityOverflow {
                len: n,
                width: PREFIX_LEN,
            })?;
        let mut bytes = Vec::with_capacity(size);
        bytes.extend_from_slice(&header);
        let mut offsets = Vec::with_capacity(n);
        for _ in 0..n {
            bytes.extend_from_slice(&[0; PREFIX_LEN]);
            offsets.push(bytes.len());
        }
        Ok(Self {
            bytes,
            offsets,
            lengths: vec![0; n],
        })
    }

    /// Encodes `records` in order.
    pub fn from_records<I, T>(records: I) -> Result<Self, ColumnarError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        let mut bytes = vec![0; PREFIX_LEN];
        let mut offsets = Vec::new();
        let mut lengths = Vec::new();
        for record in records {
            let record = record.as_ref();
            bytes.extend_from_slice(&encode_len(record.len())?);
            offsets.push(bytes.len());
            lengths.push(record.len());
            bytes.extend_from_slice(record);
        }
        bytes[..PREFIX_LEN].copy_from_slice(&encode_len(offsets.len())?);
        Ok(Self {
            bytes,
            offsets,
            lengths,
        })
    }

    /// Parses `bytes` and derives the offset index.
    ///
    /// The buffer must hold exactly the declared records: a short header, a
    /// record running past the end, or leftover bytes are all rejected.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ColumnarError> {
        let (offsets, lengths) = index_records(&bytes).map_err(|err| {
            tracing::debug!(%err, len = bytes.len(), "rejected variable-length buffer");
            err
        })?;
        tracing::trace!(records = offsets.len(), len = bytes.len(), "indexed records");
        Ok(Self {
            bytes,
            offsets,
            lengths,
        })
    }

    /// Total size of the encoded buffer.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Copies every record of `other` onto the same index of `self`.
    pub fn set_column(&mut self, other: &VarBytesColumn) -> Result<(), ColumnarError> {
        if other.len() > self.len() {
            return Err(ColumnarError::IndexOutOfRange {
                index: other.len() - 1,
                len: self.len(),
            });
        }
        for (idx, record) in other.iter().enumerate() {
            self.set(idx, record)?;
        }
        Ok(())
    }

    /// Payload bytes from the start of record `begin` to the end of record
    /// `end - 1`, including the length prefixes in between.
    pub fn subarray(&self, begin: usize, end: usize) -> Result<&[u8], ColumnarError> {
        check_range(begin, end, self.len())?;
        if begin == end {
            return Ok(&[]);
        }
        let last = end - 1;
        Ok(&self.bytes[self.offsets[begin]..self.offsets[last] + self.lengths[last]])
    }

    /// Pads every record with NUL bytes to the longest record's length.
    pub fn to_fixed_width(&self) -> Result<FixedBytesColumn, ColumnarError> {
        let width = self.lengths.iter().copied().max().unwrap_or(0).max(1);
        let mut buf = vec![0; width * self.len()];
        for (slot, record) in buf.chunks_exact_mut(width).zip(self.iter()) {
            slot[..record.len()].copy_from_slice(record);
        }
        FixedBytesColumn::from_bytes(buf, width)
    }
}

fn index_records(bytes: &[u8]) -> Result<(Vec<usize>, Vec<usize>), ColumnarError> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor
        .try_read_i32()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(ColumnarError::CorruptHeader { len: bytes.len() })?;

    // a hostile count must not drive the allocation
    let capacity = count.min(cursor.remaining() / PREFIX_LEN);
    let mut offsets = Vec::with_capacity(capacity);
    let mut lengths = Vec::with_capacity(capacity);
    for index in 0..count {
        let offset = cursor.pos();
        let len = cursor
            .try_read_i32()
            .ok_or_else(|| ColumnarError::CorruptRecord {
                index,
                offset,
                needed: PREFIX_LEN as i64,
                available: cursor.remaining(),
            })?;
        let start = cursor.pos();
        let payload = usize::try_from(len)
            .ok()
            .and_then(|len| cursor.try_take_n(len));
        if payload.is_none() {
            return Err(ColumnarError::CorruptRecord {
                index,
                offset: start,
                needed: i64::from(len),
                available: cursor.remaining(),
            });
        }
        offsets.push(start);
        lengths.push(len as usize);
    }

    if cursor.remaining() > 0 {
        return Err(ColumnarError::TrailingBytes(cursor.remaining()));
    }
    Ok((offsets, lengths))
}

impl TryFrom<Vec<u8>> for VarBytesColumn {
    type Error = ColumnarError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl Column for VarBytesColumn {
    type Item<'a> = &'a [u8];
    type Value = [u8];

    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn get(&self, idx: usize) -> Result<&[u8], ColumnarError> {
        check_index(idx, self.len())?;
        let start = self.offsets[idx];
        Ok(&self.bytes[start..start + self.lengths[idx]])
    }

    /// Replaces record `idx`, shifting every later record by the size change.
    fn set(&mut self, idx: usize, value: &[u8]) -> Result<(), ColumnarError> {
        check_index(idx, self.len())?;
        let prefix = encode_len(value.len())?;
        let old = self.lengths[idx];
        let new = value.len();
        let start = self.offsets[idx] - PREFIX_LEN;
        let end = self.offsets[idx] + old;
        self.bytes.splice(start..end, prefix.iter().chain(value).copied());

        self.lengths[idx] = new;
        let later = &mut self.offsets[idx + 1..];
        if new > old {
            later.iter_mut().for_each(|offset| *offset += new - old);
        } else if new < old {
            later.iter_mut().for_each(|offset| *offset -= old - new);
        }
        tracing::trace!(idx, old, new, "replaced record");
        Ok(())
    }

    /// Overwrites every payload in place. Record sizes never change here, so
    /// every record must already be `value.len()` bytes long.
    fn fill(&mut self, value: &[u8]) -> Result<(), ColumnarError> {
        if let Some((index, &actual)) = self
            .lengths
            .iter()
            .find_position(|&&len| len != value.len())
        {
            return Err(ColumnarError::LengthMismatch {
                index,
                expected: value.len(),
                actual,
            });
        }
        for (&offset, &len) in izip!(&self.offsets, &self.lengths) {
            self.bytes[offset..offset + len].copy_from_slice(value);
        }
        Ok(())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const FOO_HI: [u8; 17] = [
        2, 0, 0, 0, 3, 0, 0, 0, b'f', b'o', b'o', 2, 0, 0, 0, b'h', b'i',
    ];

    #[test]
    fn decode_foo_hi() {
        let column = VarBytesColumn::from_bytes(FOO_HI.to_vec()).unwrap();
        assert_eq!(column.len(), 2);
        assert_eq!(column.get(0).unwrap(), b"foo");
        assert_eq!(column.get(1).unwrap(), b"hi");
        assert_eq!(column.offsets, vec![8, 15]);
        assert_eq!(column.lengths, vec![3, 2]);
    }

    #[test]
    fn encode_foo_hi() {
        let column = VarBytesColumn::from_records(["foo", "hi"]).unwrap();
        assert_eq!(column.as_bytes(), &FOO_HI);
        assert_eq!(column.byte_len(), 17);
    }

    #[test]
    fn corrupt_header() {
        assert_eq!(
            VarBytesColumn::from_bytes(vec![1, 0]),
            Err(ColumnarError::CorruptHeader { len: 2 })
        );
        assert_eq!(
            VarBytesColumn::from_bytes((-1i32).to_le_bytes().to_vec()),
            Err(ColumnarError::CorruptHeader { len: 4 })
        );
    }

    #[test]
    fn corrupt_record() {
        let truncated = FOO_HI[..16].to_vec();
        assert_eq!(
            VarBytesColumn::from_bytes(truncated),
            Err(ColumnarError::CorruptRecord {
                index: 1,
                offset: 15,
                needed: 2,
                available: 1
            })
        );
        let missing_prefix = FOO_HI[..13].to_vec();
        assert_eq!(
            VarBytesColumn::from_bytes(missing_prefix),
            Err(ColumnarError::CorruptRecord {
                index: 1,
                offset: 11,
                needed: 4,
                available: 2
            })
        );
        let mut negative = vec![1, 0, 0, 0];
        negative.extend_from_slice(&(-3i32).to_le_bytes());
        assert!(matches!(
            VarBytesColumn::from_bytes(negative),
            Err(ColumnarError::CorruptRecord { needed: -3, .. })
        ));
    }

    #[test]
    fn huge_count_fails_without_allocating() {
        let bytes = i32::MAX.to_le_bytes().to_vec();
        assert!(matches!(
            VarBytesColumn::from_bytes(bytes),
            Err(ColumnarError::CorruptRecord { index: 0, .. })
        ));
    }

    #[test]
    fn trailing_bytes() {
        let mut bytes = FOO_HI.to_vec();
        bytes.push(0);
        assert_eq!(
            VarBytesColumn::from_bytes(bytes),
            Err(ColumnarError::TrailingBytes(1))
        );
    }

    #[test]
    fn set_grows_and_shifts_later_records() {
        let mut column = VarBytesColumn::from_records(["a", "bb", "ccc"]).unwrap();
        column.set(0, b"hello").unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![&b"hello"[..], b"bb", b"ccc"]);
        assert_eq!(column.offsets, vec![8, 17, 23]);
        assert_eq!(
            column.as_bytes(),
            VarBytesColumn::from_records(["hello", "bb", "ccc"])
                .unwrap()
                .as_bytes()
        );
    }

    #[test]
    fn set_shrinks_and_shifts_later_records() {
        let mut column = VarBytesColumn::from_records(["a", "bb", "ccc"]).unwrap();
        column.set(1, b"").unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![&b"a"[..], b"", b"ccc"]);
        let reparsed = VarBytesColumn::from_bytes(column.as_bytes().to_vec()).unwrap();
        assert_eq!(reparsed, column);
    }

    #[test]
    fn set_last_record() {
        let mut column = VarBytesColumn::from_records(["x", "y"]).unwrap();
        column.set(1, b"yyyy").unwrap();
        assert_eq!(column.get(1).unwrap(), b"yyyy");
        assert_eq!(column.byte_len(), 4 + 5 + 8);
        assert!(column.set(2, b"z").is_err());
    }

    #[test]
    fn empty_constructors_are_valid_streams() {
        let empty = VarBytesColumn::new();
        assert_eq!(empty.as_bytes(), &[0, 0, 0, 0]);
        assert!(empty.is_empty());
        assert_eq!(VarBytesColumn::from_bytes(vec![0; 4]).unwrap(), empty);

        let mut column = VarBytesColumn::with_empty_records(3).unwrap();
        assert_eq!(column.byte_len(), 16);
        assert_eq!(
            VarBytesColumn::from_bytes(column.as_bytes().to_vec()).unwrap(),
            column
        );
        column.set(1, b"mid").unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![&b""[..], b"mid", b""]);
    }

    #[test]
    fn too_many_empty_records() {
        assert!(matches!(
            VarBytesColumn::with_empty_records(i32::MAX as usize + 1),
            Err(ColumnarError::EncodingOverflow { .. })
        ));
    }

    #[test]
    fn set_column_copies_prefix_of_records() {
        let mut column = VarBytesColumn::from_records(["a", "b", "c"]).unwrap();
        let other = VarBytesColumn::from_records(["xx", "yyy"]).unwrap();
        column.set_column(&other).unwrap();
        assert_eq!(
            column.iter().collect::<Vec<_>>(),
            vec![&b"xx"[..], b"yyy", b"c"]
        );

        let longer = VarBytesColumn::with_empty_records(4).unwrap();
        let before = column.clone();
        assert_eq!(
            column.set_column(&longer),
            Err(ColumnarError::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(column, before);
    }

    #[test]
    fn fill_requires_equal_lengths() {
        let mut column = VarBytesColumn::from_records(["ab", "cd"]).unwrap();
        column.fill(b"zz").unwrap();
        assert_eq!(column.iter().collect::<Vec<_>>(), vec![b"zz", b"zz"]);

        let mut mixed = VarBytesColumn::from_records(["ab", "c"]).unwrap();
        assert_eq!(
            mixed.fill(b"zz"),
            Err(ColumnarError::LengthMismatch {
                index: 1,
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(mixed.get(0).unwrap(), b"ab");
    }

    #[test]
    fn subarray_is_bounded() {
        let column = VarBytesColumn::from_bytes(FOO_HI.to_vec()).unwrap();
        assert_eq!(column.subarray(0, 1).unwrap(), b"foo");
        assert_eq!(column.subarray(1, 2).unwrap(), b"hi");
        assert_eq!(column.subarray(0, 2).unwrap(), &FOO_HI[8..]);
        assert!(column.subarray(1, 1).unwrap().is_empty());
        assert!(column.subarray(0, 3).is_err());
        assert!(column.subarray(2, 1).is_err());
    }

    #[test]
    fn fixed_width_projection() {
        let column = VarBytesColumn::from_records(["foo", "hi", ""]).unwrap();
        let fixed = column.to_fixed_width().unwrap();
        assert_eq!(fixed.chars(), 3);
        assert_eq!(fixed.as_bytes(), b"foohi\0\0\0\0");
        assert_eq!(fixed.iter().collect::<Vec<_>>(), vec!["foo", "hi", ""]);

        let empty = VarBytesColumn::with_empty_records(2).unwrap();
        assert_eq!(empty.to_fixed_width().unwrap().as_bytes(), &[0, 0]);
    }
}
