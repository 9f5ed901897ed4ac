use std::path::Path;

use crate::byte_store::MMapFile;
use crate::config::Config;
use crate::entries::{Entry, EntryStore};
use crate::error::Result;
use crate::slots::table_size_for;
use crate::table::SmallCuckoo;

/// A table whose entry store is a memory-mapped file.
///
/// The file holds the raw entry array in host byte order, sentinel first,
/// and is kept current on every insert. The slot table stays in memory and
/// is rebuilt by [`SmallCuckoo::open`]. Use [`SmallCuckoo::save`] for a
/// portable image instead.
impl SmallCuckoo<MMapFile> {
    /// Creates (or truncates) the entry file at `path`, sized for
    /// `config.capacity_hint` entries.
    pub fn create_in(path: &Path, config: Config) -> Result<Self> {
        let capacity = 1 + config.capacity_hint;
        let store = MMapFile::create(path, capacity * size_of::<Entry>())?;
        let table = Self::from_entries(
            EntryStore::new(store),
            table_size_for(config.capacity_hint),
            config,
        );

        tracing::info!(
            path = %path.display(),
            entry_capacity = table.entry_capacity(),
            table_size = table.table_size(),
            "created small cuckoo entry file"
        );
        Ok(table)
    }

    /// Maps the entry file at `path` and re-places its entries.
    /// The capacity hint in `config` is ignored.
    pub fn open(path: &Path, config: Config) -> Result<Self> {
        let entries = EntryStore::load(MMapFile::open(path)?)?;
        let count = entries.count();
        let table = Self::from_entries(entries, table_size_for(count), config);

        tracing::info!(
            path = %path.display(),
            entries = table.len(),
            table_size = table.table_size(),
            "opened small cuckoo entry file"
        );
        Ok(table)
    }

    /// Syncs the entry file to disk
    pub fn flush(&self) -> Result<()> {
        self.entries.flush()
    }
}
