//! Placement of entry indices into the slot table.
//!
//! An index is placed by swapping it into its even slot; whatever was there
//! is then swapped into its odd slot, and so on, alternating, until an empty
//! slot absorbs the index in hand. After a bounded number of rounds the slot
//! table doubles and placement restarts for everything, the index still in
//! hand last.

use crate::byte_store::ByteStore;
use crate::error::{ensure, Error, Result};
use crate::hash::Selector;
use crate::slots::{SlotTable, MAX_TABLE_SIZE};
use crate::table::SmallCuckoo;

impl<S: ByteStore> SmallCuckoo<S> {
    /// Runs the eviction loop for `index`.
    ///
    /// Returns `None` once some index lands in an empty slot, or the index
    /// left without a slot when the round budget runs out.
    fn relocate(&mut self, mut index: u16) -> Option<u16> {
        let n = self.slots.len();
        for _ in 0..self.config.rounds() {
            for selector in Selector::ROUND {
                let slot = selector.slot(n, self.entries.key(index));
                index = self.slots.swap(slot, index);
                if index == 0 {
                    return None;
                }
            }
        }
        Some(index)
    }

    /// Places `index`, doubling the slot table as often as it takes.
    ///
    /// Growth re-places every index the old table held. Those, and the index
    /// that was left over, go on a worklist instead of recursing, so nested
    /// growth keeps the stack flat. The worklist is a stack: pushing the
    /// leftover first and the rehash batch in reverse slot order replays
    /// old slots in ascending order before the leftover.
    pub(crate) fn settle(&mut self, index: u16) {
        let mut pending = vec![index];
        while let Some(index) = pending.pop() {
            if let Some(homeless) = self.relocate(index) {
                let rehash = ensure(self.double_size());
                pending.push(homeless);
                pending.extend(rehash.into_iter().rev());
            }
        }
    }

    /// Swaps in an empty slot table of twice the size and returns the
    /// indices the old one held, in slot order.
    fn double_size(&mut self) -> Result<Vec<u16>> {
        let old_size = self.slots.len();
        let new_size = old_size * 2;
        if new_size > MAX_TABLE_SIZE {
            return Err(Error::TableSizeLimit(MAX_TABLE_SIZE));
        }

        let old = std::mem::replace(&mut self.slots, SlotTable::new(new_size));
        self.growths += 1;
        tracing::debug!(
            old_size,
            new_size,
            live = self.len(),
            "slot table doubled"
        );
        Ok(old.occupied().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::table::SmallCuckoo;

    #[test]
    fn test_relocate_places_into_empty_even_slot() {
        let mut table = SmallCuckoo::new(8);
        let index = table.entries.append(11, 22).unwrap();
        assert_eq!(table.relocate(index), None);
        assert!(table.slots.occupied().eq([index]));
        table.assert_consistent();
    }

    #[test]
    fn test_relocate_reports_homeless_index() {
        let mut table = SmallCuckoo::new(0);
        table.insert(1, 1);
        table.insert(2, 2);
        let index = table.entries.append(3, 3).unwrap();
        let homeless = table.relocate(index).expect("two slots cannot hold three entries");
        assert!((1..=3).contains(&homeless));
        assert_eq!(table.slots.occupied().count(), 2);
        assert_eq!(table.table_size(), 2);
    }

    #[test]
    fn test_double_size_hands_back_slot_order() {
        let mut table = SmallCuckoo::new(4);
        for key in [10, 20, 30] {
            table.insert(key, key);
        }
        let before: Vec<u16> = table.slots.occupied().collect();
        let size = table.table_size();

        let rehash = table.double_size().unwrap();
        assert_eq!(rehash, before);
        assert_eq!(table.table_size(), size * 2);
        assert_eq!(table.slots.occupied().count(), 0);

        for index in rehash {
            table.settle(index);
        }
        for key in [10, 20, 30] {
            assert_eq!(table.find(key), Some(key));
        }
        table.assert_consistent();
    }

    #[test]
    fn test_same_insertion_order_same_layout() {
        let build = || {
            let mut table = SmallCuckoo::with_config(Config::default());
            for key in 0..3000u64 {
                table.insert(key.rotate_left(17) ^ 0x5bd1_e995, key);
            }
            table
        };
        let (a, b) = (build(), build());
        assert_eq!(a.table_size(), b.table_size());
        assert!(a.slots.occupied().eq(b.slots.occupied()));
        assert!(a.iter().eq(b.iter()));
    }

    #[test]
    #[should_panic(expected = "slot table cannot grow beyond")]
    fn test_unplaceable_keys_hit_the_size_limit() {
        // Three copies of one key share both candidate slots forever.
        let mut table = SmallCuckoo::new(0);
        for _ in 0..3 {
            table.insert(99, 0);
        }
    }
}
