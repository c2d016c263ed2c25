use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::wal::StoreWal;
use super::{DictionaryStore, MemoryStore, StoreEntry, StoreError, WordList};

const MAGIC: &[u8; 4] = b"KDIC";
const VERSION: u8 = 1;
const HEADER_SIZE: usize = 5;

/// Persistent store: a snapshot file plus a write-ahead log.
///
/// The whole map is held in memory; every successful upsert is appended to
/// the log and synced before returning. A read-only store (the system
/// dictionary) has no log and rejects writes.
pub struct FileStore {
    path: PathBuf,
    inner: MemoryStore,
    wal: Option<StoreWal>,
    /// Set when a mutation could not be logged; the next write or flush
    /// rewrites the snapshot instead of appending.
    dirty: bool,
}

impl FileStore {
    /// Open a read-write store, creating it lazily if the snapshot is absent.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut inner = match read_snapshot(path) {
            Ok(store) => store,
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => return Err(e),
        };
        let mut wal = StoreWal::new(path);
        let replay = wal.replay(&mut inner)?;
        debug!(
            path = %path.display(),
            keys = inner.len(),
            replayed = replay.applied,
            "opened store"
        );

        let mut store = Self {
            path: path.to_path_buf(),
            inner,
            wal: Some(wal),
            dirty: false,
        };
        if !replay.clean {
            // Fold the intact prefix into the snapshot so new frames do not
            // land behind the damaged tail.
            warn!(path = %path.display(), "damaged WAL tail, rewriting snapshot");
            store.checkpoint()?;
        }
        Ok(store)
    }

    /// Open an existing snapshot for reading only.
    pub fn open_read_only(path: &Path) -> Result<Self, StoreError> {
        let inner = read_snapshot(path)?;
        debug!(path = %path.display(), keys = inner.len(), "opened read-only store");
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            wal: None,
            dirty: false,
        })
    }

    /// Open for reading with log frames not yet checkpointed applied.
    /// Nothing on disk is modified; the snapshot may be absent if a log
    /// exists.
    pub fn open_read_only_with_log(path: &Path) -> Result<Self, StoreError> {
        let mut wal = StoreWal::new(path);
        let mut inner = match read_snapshot(path) {
            Ok(store) => store,
            Err(StoreError::Io(e))
                if e.kind() == io::ErrorKind::NotFound && wal.wal_path().exists() =>
            {
                MemoryStore::new()
            }
            Err(e) => return Err(e),
        };
        let replay = wal.replay(&mut inner)?;
        if !replay.clean {
            warn!(path = %path.display(), "damaged WAL tail ignored");
        }
        debug!(
            path = %path.display(),
            keys = inner.len(),
            replayed = replay.applied,
            "opened read-only store with log"
        );
        Ok(Self {
            path: path.to_path_buf(),
            inner,
            wal: None,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_read_only(&self) -> bool {
        self.wal.is_none()
    }

    /// Write the full snapshot and truncate the log.
    pub fn checkpoint(&mut self) -> Result<(), StoreError> {
        let Some(wal) = self.wal.as_mut() else {
            return Err(StoreError::ReadOnly);
        };
        write_snapshot(&self.path, &self.inner)?;
        wal.truncate()?;
        self.dirty = false;
        Ok(())
    }

    /// Number of log frames written since the last checkpoint.
    pub fn pending_log_entries(&self) -> usize {
        self.wal.as_ref().map_or(0, StoreWal::entry_count)
    }

    fn persist(&mut self, key: &str, word: &str) -> Result<(), StoreError> {
        if self.dirty {
            return self.checkpoint();
        }
        match self.wal.as_mut() {
            Some(wal) => Ok(wal.append(key, word)?),
            None => Err(StoreError::ReadOnly),
        }
    }
}

impl DictionaryStore for FileStore {
    fn find_exact(&self, key: &str) -> Option<WordList> {
        self.inner.find_exact(key)
    }

    fn scan_prefix<'a>(&'a self, key: &str) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        self.inner.scan_prefix(key)
    }

    fn upsert(&mut self, key: &str, word: &str) -> Result<(), StoreError> {
        if self.is_read_only() {
            return Err(StoreError::ReadOnly);
        }
        if !self.inner.apply(key, word) {
            return Ok(());
        }
        if let Err(e) = self.persist(key, word) {
            // The in-memory state stays ahead of disk until the next
            // successful flush.
            warn!(path = %self.path.display(), "store flush failed: {e}");
            self.dirty = true;
        }
        Ok(())
    }

    fn scan_all<'a>(&'a self) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        self.inner.scan_all()
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if self.is_read_only() {
            return Ok(());
        }
        if self.dirty {
            return self.checkpoint();
        }
        match self.wal.as_mut() {
            Some(wal) => Ok(wal.sync()?),
            None => Ok(()),
        }
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

// --- Snapshot format ---

/// Serialize a store to bytes (KDIC format).
pub fn to_bytes(store: &MemoryStore) -> Result<Vec<u8>, StoreError> {
    let records: Vec<(&String, &WordList)> = store.iter().collect();
    let body = bincode::serialize(&records).map_err(StoreError::Serialize)?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(MAGIC);
    buf.push(VERSION);
    buf.extend_from_slice(&body);
    Ok(buf)
}

/// Deserialize a store from bytes (KDIC format).
pub fn from_bytes(bytes: &[u8]) -> Result<MemoryStore, StoreError> {
    if bytes.len() < HEADER_SIZE {
        return Err(StoreError::InvalidHeader);
    }
    if &bytes[0..4] != MAGIC {
        return Err(StoreError::InvalidMagic);
    }
    if bytes[4] != VERSION {
        return Err(StoreError::UnsupportedVersion(bytes[4]));
    }
    let records: Vec<(String, Vec<String>)> =
        bincode::deserialize(&bytes[HEADER_SIZE..]).map_err(StoreError::Deserialize)?;
    Ok(MemoryStore::from_entries(records))
}

pub fn read_snapshot(path: &Path) -> Result<MemoryStore, StoreError> {
    let bytes = fs::read(path)?;
    from_bytes(&bytes)
}

/// Atomic write: write to .tmp then rename.
pub fn write_snapshot(path: &Path, store: &MemoryStore) -> Result<(), StoreError> {
    let bytes = to_bytes(store)?;
    let tmp = path.with_extension("tmp");
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
