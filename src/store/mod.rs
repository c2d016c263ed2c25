//! Ordered key → word-list dictionary storage.
//!
//! `DictionaryStore` is the seam between candidate composition and the
//! storage engine. `MemoryStore` keeps a sorted map in memory, `FileStore`
//! persists one with a snapshot plus write-ahead log, and `NullStore` stands
//! in for a store that failed to open.

pub mod bundle;
mod file;
pub mod interchange;
mod memory;
mod null;
mod wal;
mod word_list;

pub use file::{from_bytes, read_snapshot, to_bytes, write_snapshot, FileStore};
pub use interchange::ImportReport;
pub use memory::MemoryStore;
pub use null::NullStore;
pub use word_list::WordList;

use std::io;
use std::path::Path;

use tracing::{debug, warn};

/// Storage errors. Surfaced internally; the engine absorbs them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected KDIC)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("store is read-only")]
    ReadOnly,

    #[error("store is unavailable")]
    Unavailable,

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// A stored key and its words.
pub type StoreEntry = (String, WordList);

/// Persistent sorted map from key to an ordered, duplicate-free word list.
///
/// Keys are ordered by Unicode code point. Mutation takes `&mut self`; there
/// is exactly one writer.
pub trait DictionaryStore: Send {
    fn find_exact(&self, key: &str) -> Option<WordList>;

    /// Entries in key order, starting at the first key `>= key`.
    ///
    /// The iterator does not stop at the end of the prefix range; callers
    /// stop consuming once a key no longer starts with `key` (see
    /// [`prefix_entries`]). This keeps the scan lazy for every backend.
    fn scan_prefix<'a>(&'a self, key: &str) -> Box<dyn Iterator<Item = StoreEntry> + 'a>;

    /// Move `word` to the front of `key`'s list, creating the entry if
    /// needed. Persistent stores flush before returning. Empty keys or words
    /// are ignored.
    fn upsert(&mut self, key: &str, word: &str) -> Result<(), StoreError>;

    fn scan_all<'a>(&'a self) -> Box<dyn Iterator<Item = StoreEntry> + 'a>;

    fn flush(&mut self) -> Result<(), StoreError>;

    /// Number of keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// False for the degraded stand-in.
    fn is_available(&self) -> bool {
        true
    }
}

/// Entries whose key starts with `prefix`, in order.
pub fn prefix_entries<'a>(
    store: &'a dyn DictionaryStore,
    prefix: &'a str,
) -> impl Iterator<Item = StoreEntry> + 'a {
    store
        .scan_prefix(prefix)
        .take_while(move |(key, _)| key.starts_with(prefix))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

/// Open a file-backed store, degrading to [`NullStore`] if it cannot be
/// opened. The failure is logged and never reported to the caller.
pub fn open_or_stub(path: &Path, mode: OpenMode) -> Box<dyn DictionaryStore> {
    let opened = match mode {
        OpenMode::ReadOnly => FileStore::open_read_only(path),
        OpenMode::ReadWrite => FileStore::open(path),
    };
    match opened {
        Ok(store) => {
            debug!(path = %path.display(), ?mode, keys = store.len(), "store ready");
            Box::new(store)
        }
        Err(e) => {
            warn!(path = %path.display(), ?mode, "store unavailable, continuing without it: {e}");
            Box::new(NullStore)
        }
    }
}
