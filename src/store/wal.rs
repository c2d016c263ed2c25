//! Write-ahead log for [`FileStore`](super::FileStore).
//!
//! Each upsert appends one small frame and syncs it before returning, instead
//! of rewriting the whole snapshot. An explicit checkpoint writes the full
//! snapshot and truncates the log.
//!
//! Frame layout (little-endian): `u32 length | u32 crc32 | payload`, where the
//! payload is a bincode-encoded [`WalRecord`].

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::MemoryStore;

const FRAME_HEADER: usize = 8;

/// A single logged upsert.
#[derive(Serialize, Deserialize)]
struct WalRecord {
    key: String,
    word: String,
}

/// Outcome of replaying a log into a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replay {
    pub applied: usize,
    /// False when replay stopped at a truncated or corrupt frame.
    pub clean: bool,
}

pub struct StoreWal {
    wal_path: PathBuf,
    /// Kept open in append mode to avoid repeated open/close per entry.
    file: Option<File>,
    /// Number of frames in the current log (since the last checkpoint).
    entry_count: usize,
}

impl StoreWal {
    /// Log handle living next to `snapshot_path` (`<snapshot>.wal`).
    pub fn new(snapshot_path: &Path) -> Self {
        let mut name = snapshot_path.as_os_str().to_owned();
        name.push(".wal");
        Self {
            wal_path: PathBuf::from(name),
            file: None,
            entry_count: 0,
        }
    }

    /// Replay every intact frame into `store`.
    pub fn replay(&mut self, store: &mut MemoryStore) -> io::Result<Replay> {
        let data = match fs::read(&self.wal_path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.entry_count = 0;
                return Ok(Replay {
                    applied: 0,
                    clean: true,
                });
            }
            Err(e) => return Err(e),
        };

        let mut count = 0;
        let mut pos = 0;
        while pos < data.len() {
            let (Some(length), Some(expected_crc)) = (read_u32(&data, pos), read_u32(&data, pos + 4))
            else {
                break; // truncated header
            };
            let length = length as usize;
            let start = pos + FRAME_HEADER;
            if length == 0 || start + length > data.len() {
                break; // truncated frame
            }

            let payload = &data[start..start + length];
            if crc32fast::hash(payload) != expected_crc {
                break; // corrupt frame
            }

            match bincode::deserialize::<WalRecord>(payload) {
                Ok(record) => {
                    store.apply(&record.key, &record.word);
                    count += 1;
                }
                Err(_) => break, // corrupt payload
            }

            pos = start + length;
        }

        self.entry_count = count;
        Ok(Replay {
            applied: count,
            clean: pos == data.len(),
        })
    }

    /// Append one upsert and sync it to disk.
    pub fn append(&mut self, key: &str, word: &str) -> io::Result<()> {
        let record = WalRecord {
            key: key.to_string(),
            word: word.to_string(),
        };
        let payload = bincode::serialize(&record).map_err(io::Error::other)?;
        let length = u32::try_from(payload.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "WAL record too large"))?;

        let mut frame = Vec::with_capacity(FRAME_HEADER + payload.len());
        frame.extend_from_slice(&length.to_le_bytes());
        frame.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
        frame.extend_from_slice(&payload);

        let file = self.open_file()?;
        file.write_all(&frame)?;
        file.sync_data()?;

        self.entry_count += 1;
        Ok(())
    }

    /// Sync any buffered frames to disk.
    pub fn sync(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(f) => f.sync_data(),
            None => Ok(()),
        }
    }

    /// Get or lazily open the log file handle.
    fn open_file(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            if let Some(parent) = self.wal_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.wal_path)?;
            self.file = Some(f);
        }
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("WAL file handle unavailable"))
    }

    /// Truncate the log and reset the entry count.
    /// Call after a checkpoint has been written.
    pub fn truncate(&mut self) -> io::Result<()> {
        self.file = None;
        File::create(&self.wal_path)?;
        self.entry_count = 0;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }
}

fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    let bytes = data.get(pos..pos + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}
