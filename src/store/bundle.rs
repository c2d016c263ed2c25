//! Building and installing the bundled system dictionary.
//!
//! The system dictionary is compiled once from a tab-separated seed into a
//! snapshot, and typically shipped inside a zip archive that is unpacked into
//! the data directory on first run.

use std::fs::{self, File};
use std::io::{self, BufRead, Read, Seek};
use std::path::Path;

use tracing::{debug, warn};

use super::file::write_snapshot;
use super::interchange::{import, ImportReport};
use super::{MemoryStore, StoreError};

/// Compile an interchange-format seed into a snapshot at `out`.
pub fn compile_seed<R: BufRead>(seed: R, out: &Path) -> Result<ImportReport, StoreError> {
    let mut store = MemoryStore::new();
    let report = import(&mut store, seed)?;
    write_snapshot(out, &store)?;
    debug!(path = %out.display(), keys = store.iter().count(), "compiled snapshot");
    Ok(report)
}

/// Extract every file of a zip archive into `dir`.
///
/// Files already present with the same size are left alone. Returns the
/// number of files written.
pub fn install_archive<R: Read + Seek>(archive: R, dir: &Path) -> Result<usize, StoreError> {
    let mut archive = zip::ZipArchive::new(archive)?;
    fs::create_dir_all(dir)?;

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = entry.enclosed_name() else {
            warn!(name = entry.name(), "skipping archive entry with unsafe path");
            continue;
        };
        let dest = dir.join(name);

        if let Ok(meta) = fs::metadata(&dest) {
            if meta.len() == entry.size() {
                continue;
            }
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = dest.with_extension("tmp");
        {
            let mut out = File::create(&tmp)?;
            io::copy(&mut entry, &mut out)?;
            out.sync_all()?;
        }
        fs::rename(&tmp, &dest)?;
        debug!(path = %dest.display(), "installed dictionary file");
        written += 1;
    }
    Ok(written)
}

/// Convenience wrapper around [`install_archive`] for an archive on disk.
pub fn install_archive_file(archive_path: &Path, dir: &Path) -> Result<usize, StoreError> {
    install_archive(File::open(archive_path)?, dir)
}
