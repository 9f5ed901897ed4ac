//! Portable table images.
//!
//! Layout, little-endian with no padding:
//!
//! ```text
//! [count: u16] then (count - 1) x [key: u64][value: u64]
//! ```
//!
//! `count` includes the sentinel entry, so an empty table encodes as the
//! two bytes `01 00`. Only the entry store is written; the slot table is
//! rebuilt on load by re-placing entries in index order.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::byte_store::{ByteStore, VecStore};
use crate::config::Config;
use crate::entries::EntryStore;
use crate::error::{ensure, Error, Result};
use crate::slots::table_size_for;
use crate::table::SmallCuckoo;

const COUNT_LEN: usize = size_of::<u16>();
const PAIR_LEN: usize = 2 * size_of::<u64>();

/// Reads until `buf` is full or the input ends; returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl<S: ByteStore> SmallCuckoo<S> {
    /// Writes the table image to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let count = self.entries.count() as u16;
        writer.write_all(&count.to_le_bytes())?;
        for entry in self.entries.live() {
            writer.write_all(&entry.key.to_le_bytes())?;
            writer.write_all(&entry.value.to_le_bytes())?;
        }
        Ok(())
    }

    /// Writes the table image to `writer`. A failed or short write is fatal.
    pub fn serialize<W: Write>(&self, writer: &mut W) {
        ensure(self.write_to(writer))
    }

    /// Size in bytes of the table image
    pub fn encoded_len(&self) -> usize {
        COUNT_LEN + self.len() * PAIR_LEN
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        self.serialize(&mut bytes);
        bytes
    }

    /// Writes the table image to a file at `path`, replacing it
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(())
    }
}

impl SmallCuckoo<VecStore> {
    /// Reads a table image from `reader`
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_from_with_config(reader, Config::default())
    }

    /// Reads a table image, using `config` for the displacement bound.
    /// The capacity hint is ignored; sizing follows the stored count.
    pub fn read_from_with_config<R: Read>(reader: &mut R, config: Config) -> Result<Self> {
        let mut header = [0u8; COUNT_LEN];
        let got = read_full(reader, &mut header)?;
        if got < COUNT_LEN {
            return Err(Error::Truncated {
                expected: COUNT_LEN,
                actual: got,
            });
        }

        let count = u16::from_le_bytes(header) as usize;
        if count == 0 {
            return Err(Error::Corrupt("entry count 0 leaves no sentinel".to_string()));
        }

        let mut body = vec![0u8; (count - 1) * PAIR_LEN];
        let got = read_full(reader, &mut body)?;
        if got < body.len() {
            return Err(Error::Truncated {
                expected: COUNT_LEN + body.len(),
                actual: COUNT_LEN + got,
            });
        }

        let mut entries = EntryStore::with_capacity(count);
        for pair in body.chunks_exact(PAIR_LEN) {
            let mut key = [0u8; 8];
            let mut value = [0u8; 8];
            key.copy_from_slice(&pair[..8]);
            value.copy_from_slice(&pair[8..]);
            entries.append(u64::from_le_bytes(key), u64::from_le_bytes(value))?;
        }

        Ok(Self::from_entries(entries, table_size_for(count), config))
    }

    /// Reads a table image from `reader`. Any short or failed read, or an
    /// invalid image, is fatal.
    pub fn deserialize<R: Read>(reader: &mut R) -> Self {
        ensure(Self::read_from(reader))
    }

    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut bytes)
    }

    /// Reads a table image from the file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }
}
