use std::iter::FusedIterator;

use crate::byte_store::{ByteStore, VecStore};
use crate::error::{ensure, Error, Result};
use crate::table::SmallCuckoo;

/// Single-pass cursor over the occupied slots of a [`SmallCuckoo`].
///
/// Pairs come out in slot order. The cursor cannot be rewound; call
/// [`SmallCuckoo::iter`] again for another pass.
pub struct Cursor<'a, S: ByteStore = VecStore> {
    table: &'a SmallCuckoo<S>,
    position: usize,
}

impl<'a, S: ByteStore> Cursor<'a, S> {
    pub(crate) fn new(table: &'a SmallCuckoo<S>) -> Self {
        Self { table, position: 0 }
    }

    /// Moves up to the next occupied slot without consuming it.
    pub fn has_next(&mut self) -> bool {
        match self.table.slots.next_occupied(self.position) {
            Some(slot) => {
                self.position = slot;
                true
            }
            None => {
                self.position = self.table.slots.len();
                false
            }
        }
    }

    /// Returns the pair in the next occupied slot and moves past it.
    /// Advancing an exhausted cursor is fatal.
    pub fn advance(&mut self) -> (u64, u64) {
        ensure(self.try_advance())
    }

    pub fn try_advance(&mut self) -> Result<(u64, u64)> {
        let slot = self
            .table
            .slots
            .next_occupied(self.position)
            .ok_or(Error::Exhausted)?;
        let entry = self.table.entries.get(self.table.slots.get(slot));
        self.position = slot + 1;
        Ok((entry.key, entry.value))
    }
}

impl<S: ByteStore> Iterator for Cursor<'_, S> {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            Some(self.advance())
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.table.len()))
    }
}

impl<S: ByteStore> FusedIterator for Cursor<'_, S> {}
