//! Lazy iteration over decoded column values.

use crate::Column;

/// A finite cursor over a column. Each [`Column::iter`] call creates a new one
/// starting at index 0; cursors never share position.
pub struct ColumnIter<'a, C> {
    column: &'a C,
    front: usize,
    back: usize,
}

impl<'a, C: Column> ColumnIter<'a, C> {
    pub fn new(column: &'a C) -> Self {
        Self {
            column,
            front: 0,
            back: column.len(),
        }
    }

    /// Whether [`Iterator::next`] will yield another value.
    #[inline]
    pub fn has_next(&self) -> bool {
        self.front < self.back
    }
}

impl<C> Clone for ColumnIter<'_, C> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, C: Column + 'a> Iterator for ColumnIter<'a, C> {
    type Item = C::Item<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let value = self
            .column
            .get(self.front)
            .expect("iterator bounds stay within the column");
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<'a, C: Column + 'a> DoubleEndedIterator for ColumnIter<'a, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if !self.has_next() {
            return None;
        }
        let value = self
            .column
            .get(self.back - 1)
            .expect("iterator bounds stay within the column");
        self.back -= 1;
        Some(value)
    }
}

impl<'a, C: Column + 'a> ExactSizeIterator for ColumnIter<'a, C> {}
