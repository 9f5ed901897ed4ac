use crate::byte_store::{ByteStore, VecStore};
use crate::config::Config;
use crate::entries::EntryStore;
use crate::error::{ensure, Result};
use crate::hash::Selector;
use crate::iter::Cursor;
use crate::slots::{table_size_for, SlotTable};

/// A cuckoo hash table for fewer than 64k `u64 -> u64` pairs.
///
/// Keys and values live in an append-only entry store; the slot table only
/// holds 16-bit indices into it. Every key has one even and one odd
/// candidate slot, and insertion evicts incumbents between their two
/// candidates, doubling the slot table when a bounded number of rounds is
/// not enough.
///
/// The entry store is generic over its [`ByteStore`]: heap memory by
/// default, or a mapped file (see [`SmallCuckoo::create_in`]).
///
/// Inserting never replaces an existing pair. A key inserted twice is stored
/// twice and [`find`](SmallCuckoo::find) reports whichever copy it meets
/// first.
pub struct SmallCuckoo<S: ByteStore = VecStore> {
    pub(crate) slots: SlotTable,
    pub(crate) entries: EntryStore<S>,
    pub(crate) config: Config,
    pub(crate) growths: u64,
}

impl SmallCuckoo<VecStore> {
    /// Creates an empty table sized for `capacity_hint` entries
    pub fn new(capacity_hint: usize) -> Self {
        Self::with_config(Config::default().with_capacity_hint(capacity_hint))
    }

    pub fn with_config(config: Config) -> Self {
        let entries = EntryStore::with_capacity(1 + config.capacity_hint);
        Self::from_entries(entries, table_size_for(config.capacity_hint), config)
    }
}

impl Default for SmallCuckoo<VecStore> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<S: ByteStore> SmallCuckoo<S> {
    /// Builds a table over already-populated entries, placing every live
    /// index in ascending order into a fresh slot table of `table_size`.
    pub(crate) fn from_entries(entries: EntryStore<S>, table_size: usize, config: Config) -> Self {
        let mut table = Self {
            slots: SlotTable::new(table_size),
            entries,
            config,
            growths: 0,
        };
        for index in 1..table.entries.count() {
            table.settle(index as u16);
        }
        table
    }

    /// Inserts a pair. Running out of 16-bit entry indices is fatal.
    pub fn insert(&mut self, key: u64, value: u64) {
        ensure(self.try_insert(key, value))
    }

    /// Inserts a pair, reporting a full index space or a failed store
    /// growth as an error instead of a fault.
    ///
    /// On error the table is left exactly as it was.
    pub fn try_insert(&mut self, key: u64, value: u64) -> Result<()> {
        let index = self.entries.append(key, value)?;
        self.settle(index);
        Ok(())
    }

    /// Looks `key` up in its even slot, then in its odd slot.
    pub fn find(&self, key: u64) -> Option<u64> {
        let n = self.slots.len();
        Selector::ROUND.into_iter().find_map(|selector| {
            let index = self.slots.get(selector.slot(n, key));
            if index == 0 {
                return None;
            }
            let entry = self.entries.get(index);
            (entry.key == key).then_some(entry.value)
        })
    }

    pub fn contains_key(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Returns a cursor over every live pair, in slot order
    pub fn iter(&self) -> Cursor<'_, S> {
        Cursor::new(self)
    }

    /// Returns the number of live pairs
    pub fn len(&self) -> usize {
        self.entries.count() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once no further pair can be inserted
    pub fn is_full(&self) -> bool {
        self.len() >= crate::MAX_ENTRIES
    }

    /// Number of slots in the slot table, always a power of two
    pub fn table_size(&self) -> usize {
        self.slots.len()
    }

    /// Allocated length of the entry store, sentinel included
    pub fn entry_capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Returns the load factor of the slot table (len / table_size)
    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.table_size() as f64
    }

    /// Slot table doublings since this table was built or loaded
    pub fn growths(&self) -> u64 {
        self.growths
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Checks that every live index sits in exactly one slot, and in the
    /// slot its key selects for that slot's parity.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let n = self.slots.len();
        let mut seen = vec![false; self.entries.count()];
        for slot in 0..n {
            let index = self.slots.get(slot);
            if index == 0 {
                continue;
            }
            let selector = if slot % 2 == 0 {
                Selector::Even
            } else {
                Selector::Odd
            };
            assert_eq!(selector.slot(n, self.entries.key(index)), slot);
            assert!(!seen[index as usize], "index {index} placed twice");
            seen[index as usize] = true;
        }
        assert!(seen[1..].iter().all(|&s| s), "unplaced live index");
    }
}

impl<'a, S: ByteStore> IntoIterator for &'a SmallCuckoo<S> {
    type Item = (u64, u64);
    type IntoIter = Cursor<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
