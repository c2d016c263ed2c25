//! Tab-separated text interchange for stores.
//!
//! One entry per line: `key<TAB>word1<TAB>word2...`, newline terminated,
//! keys in sorted order, words in stored (most recent first) order.

use std::io::{self, BufRead, Write};

use tracing::debug;

use super::{DictionaryStore, StoreError};

/// Counts from an import run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Lines that carried a key and at least one word.
    pub lines: usize,
    /// Individual words replayed through `upsert`.
    pub words: usize,
    /// Lines skipped for having fewer than two fields.
    pub skipped: usize,
}

/// Format one entry as an interchange line (without the trailing newline).
pub fn format_line<'a>(key: &str, words: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = key.to_string();
    for w in words {
        line.push('\t');
        line.push_str(w);
    }
    line
}

/// Write every entry of `store` to `out`. Returns the number of lines.
pub fn export<W: Write>(store: &dyn DictionaryStore, mut out: W) -> io::Result<usize> {
    let mut count = 0;
    for (key, words) in store.scan_all() {
        writeln!(out, "{}", format_line(&key, words.iter()))?;
        count += 1;
    }
    out.flush()?;
    Ok(count)
}

/// Export into memory, one string per entry.
pub fn export_lines(store: &dyn DictionaryStore) -> Vec<String> {
    store
        .scan_all()
        .map(|(key, words)| format_line(&key, words.iter()))
        .collect()
}

/// Replay one line into `store`. Returns the number of words replayed, or
/// `None` if the line is malformed.
///
/// Words are replayed last-to-first, so on a fresh key the stored order
/// matches the line.
pub fn import_line(store: &mut dyn DictionaryStore, line: &str) -> Result<Option<usize>, StoreError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return Ok(None);
    }
    let key = fields[0];
    let mut count = 0;
    for word in fields[1..].iter().rev() {
        if word.is_empty() {
            continue;
        }
        store.upsert(key, word)?;
        count += 1;
    }
    Ok(Some(count))
}

/// Replay every line of `input` into `store`.
///
/// Existing entries are merged, never replaced.
pub fn import<R: BufRead>(store: &mut dyn DictionaryStore, input: R) -> Result<ImportReport, StoreError> {
    let mut report = ImportReport::default();
    for line in input.lines() {
        let line = line?;
        match import_line(store, &line)? {
            Some(words) => {
                report.lines += 1;
                report.words += words;
            }
            None => report.skipped += 1,
        }
    }
    debug!(
        lines = report.lines,
        words = report.words,
        skipped = report.skipped,
        "import finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::store::{MemoryStore, NullStore};

    fn pairs(store: &dyn DictionaryStore) -> BTreeSet<(String, String)> {
        store
            .scan_all()
            .flat_map(|(k, words)| {
                words
                    .into_vec()
                    .into_iter()
                    .map(move |w| (k.clone(), w))
            })
            .collect()
    }

    fn export_string(store: &dyn DictionaryStore) -> String {
        let mut buf = Vec::new();
        export(store, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn export_format() {
        let mut store = MemoryStore::new();
        store.upsert("き", "木").unwrap();
        store.upsert("か", "買").unwrap();
        store.upsert("か", "家").unwrap();
        assert_eq!(export_string(&store), "か\t家\t買\nき\t木\n");
        assert_eq!(export_lines(&store), vec!["か\t家\t買", "き\t木"]);
    }

    #[test]
    fn import_skips_malformed_lines() {
        let mut store = MemoryStore::new();
        let input = "か\t家\t買\nnotab\n\nき\t木\n";
        let report = import(&mut store, input.as_bytes()).unwrap();
        assert_eq!(
            report,
            ImportReport {
                lines: 2,
                words: 3,
                skipped: 2
            }
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn import_preserves_line_order_on_fresh_store() {
        let mut store = MemoryStore::new();
        import(&mut store, "か\t家\t買\n".as_bytes()).unwrap();
        assert_eq!(store.find_exact("か").unwrap().into_vec(), vec!["家", "買"]);
    }

    #[test]
    fn import_merges_with_existing() {
        let mut store = MemoryStore::new();
        store.upsert("か", "蚊").unwrap();
        store.upsert("か", "買").unwrap();
        import(&mut store, "か\t家\t買\n".as_bytes()).unwrap();
        assert_eq!(
            store.find_exact("か").unwrap().into_vec(),
            vec!["家", "買", "蚊"]
        );
    }

    #[test]
    fn import_handles_crlf_and_empty_fields() {
        let mut store = MemoryStore::new();
        let report = import(&mut store, "か\t家\t\r\n".as_bytes()).unwrap();
        assert_eq!(report.words, 1);
        assert_eq!(store.find_exact("か").unwrap().into_vec(), vec!["家"]);
    }

    #[test]
    fn roundtrip_keeps_pairs() {
        let mut store = MemoryStore::new();
        for (k, w) in [("か", "買"), ("か", "家"), ("わたし 私", "は は"), ("き", "木")] {
            store.upsert(k, w).unwrap();
        }
        let first = export_string(&store);

        let mut fresh = MemoryStore::new();
        import(&mut fresh, first.as_bytes()).unwrap();
        // Importing twice must not duplicate words.
        import(&mut fresh, first.as_bytes()).unwrap();
        let second = export_string(&fresh);

        assert_eq!(pairs(&store), pairs(&fresh));
        assert_eq!(first, second);
    }

    #[test]
    fn import_into_unavailable_store_fails() {
        let mut store = NullStore;
        let err = import(&mut store, "か\t家\n".as_bytes()).unwrap_err();
        assert!(matches!(err, StoreError::Unavailable));
    }
}
