//! A compact cuckoo hash table for up to 65,534 `u64 -> u64` pairs.
//!
//! ```
//! use smallcuckoo::SmallCuckoo;
//!
//! let mut table = SmallCuckoo::new(0);
//! table.insert(42, 100);
//! assert_eq!(table.find(42), Some(100));
//! assert_eq!(table.find(7), None);
//!
//! let image = table.to_bytes();
//! assert_eq!(image.len(), 18);
//! let restored = SmallCuckoo::from_bytes(&image).unwrap();
//! assert_eq!(restored.find(42), Some(100));
//! ```

pub mod byte_store;
mod codec;
pub mod config;
pub mod entries;
pub mod error;
mod evict;
mod fixed_buffers;
pub mod hash;
pub mod iter;
mod slots;
mod storage;
pub mod table;

pub use byte_store::{ByteStore, MMapFile, VecStore};
pub use config::{Config, MAX_DISPLACEMENT_ROUNDS};
pub use entries::Entry;
pub use error::{Error, Result};
pub use iter::Cursor;
pub use slots::{table_size_for, MAX_TABLE_SIZE};
pub use table::SmallCuckoo;

/// Most live pairs a table can hold: every `u16` index except the sentinel
/// at 0, with the count itself still fitting the 2-byte image header.
pub const MAX_ENTRIES: usize = u16::MAX as usize - 1;
