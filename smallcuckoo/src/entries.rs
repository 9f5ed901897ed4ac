use bytemuck::{Pod, Zeroable};

use crate::byte_store::{ByteStore, VecStore};
use crate::error::{Error, Result};
use crate::fixed_buffers::FixedVec;
use crate::MAX_ENTRIES;

/// Sentinel key marking entry 0 of a table image; spells "smcuckoo".
pub const ENTRY_FILE_MAGIC: u64 = u64::from_le_bytes(*b"smcuckoo");

/// One key/value pair as laid out in the entry store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Entry {
    pub key: u64,
    pub value: u64,
}

/// Append-only array of entries addressed by 16-bit indices.
///
/// Index 0 is the sentinel and is never handed out; it records
/// `{ key: ENTRY_FILE_MAGIC, value: count }` so that a mapped store
/// describes itself.
pub struct EntryStore<S: ByteStore> {
    entries: FixedVec<Entry, S>,
    count: usize,
}

impl EntryStore<VecStore> {
    /// In-memory store with room for `capacity` entries, sentinel included
    pub fn with_capacity(capacity: usize) -> Self {
        let store = VecStore::zeroed(capacity.max(1) * size_of::<Entry>());
        Self::new(store)
    }
}

impl<S: ByteStore> EntryStore<S> {
    /// Fresh store over `store`; existing bytes are ignored.
    pub fn new(store: S) -> Self {
        let mut entries = FixedVec::new(store);
        if entries.capacity() == 0 {
            crate::error::ensure(entries.grow().map_err(Error::from));
        }
        let mut this = Self { entries, count: 1 };
        this.write_sentinel();
        this
    }

    /// Reattaches to a store previously written through [`EntryStore::new`].
    pub fn load(store: S) -> Result<Self> {
        let entries = FixedVec::<Entry, S>::new(store);
        if entries.capacity() == 0 {
            return Err(Error::Corrupt("entry store holds no sentinel".to_string()));
        }

        let sentinel = entries[0];
        if sentinel.key != ENTRY_FILE_MAGIC {
            return Err(Error::Corrupt(format!(
                "bad sentinel magic {:#018x}",
                sentinel.key
            )));
        }

        let count = sentinel.value as usize;
        if count == 0 || count > MAX_ENTRIES + 1 || count > entries.capacity() {
            return Err(Error::Corrupt(format!(
                "entry count {count} does not fit a store of {} entries",
                entries.capacity()
            )));
        }

        Ok(Self { entries, count })
    }

    fn write_sentinel(&mut self) {
        self.entries[0] = Entry {
            key: ENTRY_FILE_MAGIC,
            value: self.count as u64,
        };
    }

    /// Appends a pair and returns its index, doubling the store when full.
    ///
    /// Fails with [`Error::EntryOverflow`] without touching the store when the
    /// 16-bit index space is used up.
    pub fn append(&mut self, key: u64, value: u64) -> Result<u16> {
        if self.count > MAX_ENTRIES {
            return Err(Error::EntryOverflow);
        }

        if self.count == self.entries.capacity() {
            let old_capacity = self.entries.capacity();
            self.entries.grow()?;
            tracing::debug!(
                old_capacity,
                new_capacity = self.entries.capacity(),
                "entry store grown"
            );
        }

        let index = self.count;
        self.entries[index] = Entry { key, value };
        self.count += 1;
        self.write_sentinel();
        Ok(index as u16)
    }

    /// Entry at a live index. Index 0 or anything past the end is a fault.
    #[inline]
    pub fn get(&self, index: u16) -> Entry {
        let index = index as usize;
        if index == 0 || index >= self.count {
            crate::error::fatal(format!(
                "entry index {index} outside live range 1..{}",
                self.count
            ));
        }
        self.entries[index]
    }

    #[inline]
    pub fn key(&self, index: u16) -> u64 {
        self.get(index).key
    }

    /// Occupied entry slots, sentinel included
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Live entries in index order
    pub fn live(&self) -> &[Entry] {
        &self.entries[1..self.count]
    }

    pub fn store(&self) -> &S {
        self.entries.store()
    }

    pub fn flush(&self) -> Result<()> {
        Ok(self.entries.flush()?)
    }
}
