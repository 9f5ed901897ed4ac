use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::MmapMut;

/// Raw byte backing for a [`FixedVec`](crate::fixed_buffers::FixedVec).
///
/// Newly exposed bytes are always zero.
pub trait ByteStore: AsRef<[u8]> + AsMut<[u8]> {
    /// Extends the store by `additional` zeroed bytes
    fn grow(&mut self, additional: usize) -> io::Result<()>;

    /// Makes the current contents durable, a no-op for memory stores
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    /// Number of times the store has grown
    fn stats(&self) -> u64;
}

/// Heap backed store.
///
/// Bytes live in a `Vec<u64>` so typed views over them are always aligned.
#[derive(Debug, Default)]
pub struct VecStore {
    words: Vec<u64>,
    len: usize,
    resizes: u64,
}

impl VecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store of `len` zero bytes
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(8)],
            len,
            resizes: 0,
        }
    }
}

impl AsRef<[u8]> for VecStore {
    fn as_ref(&self) -> &[u8] {
        &bytemuck::cast_slice(&self.words)[..self.len]
    }
}

impl AsMut<[u8]> for VecStore {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut bytemuck::cast_slice_mut(&mut self.words)[..self.len]
    }
}

impl ByteStore for VecStore {
    fn grow(&mut self, additional: usize) -> io::Result<()> {
        let new_len = self.len + additional;
        let new_words = new_len.div_ceil(8);
        self.words
            .try_reserve_exact(new_words - self.words.len())
            .map_err(|e| io::Error::new(io::ErrorKind::OutOfMemory, e))?;
        self.words.resize(new_words, 0);
        self.len = new_len;
        self.resizes += 1;
        Ok(())
    }

    fn stats(&self) -> u64 {
        self.resizes
    }
}

/// A file mapped read-write into memory.
pub struct MMapFile {
    mmap: MmapMut,
    file: File,
    resizes: u64,
}

impl MMapFile {
    /// Creates (or truncates) `path` to `len` zero bytes and maps it
    pub fn create(path: &Path, len: usize) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(len as u64)?;
        Self::map(file)
    }

    /// Maps an existing file at its current length
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::map(file)
    }

    fn map(file: File) -> io::Result<Self> {
        // SAFETY: the file is opened read-write by us and is not expected to be
        // truncated by another process while mapped.
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self {
            mmap,
            file,
            resizes: 0,
        })
    }
}

impl AsRef<[u8]> for MMapFile {
    fn as_ref(&self) -> &[u8] {
        &self.mmap
    }
}

impl AsMut<[u8]> for MMapFile {
    fn as_mut(&mut self) -> &mut [u8] {
        &mut self.mmap
    }
}

impl ByteStore for MMapFile {
    fn grow(&mut self, additional: usize) -> io::Result<()> {
        self.mmap.flush()?;

        let new_len = self.mmap.len() + additional;
        self.file.set_len(new_len as u64)?;

        // SAFETY: same file as before, now extended; the old mapping is
        // dropped when replaced.
        self.mmap = unsafe { MmapMut::map_mut(&self.file)? };
        self.resizes += 1;
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        self.mmap.flush()?;
        self.file.sync_all()
    }

    fn stats(&self) -> u64 {
        self.resizes
    }
}
