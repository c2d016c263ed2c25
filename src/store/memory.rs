use std::collections::BTreeMap;
use std::ops::Bound;

use super::{DictionaryStore, StoreEntry, StoreError, WordList};

/// In-memory sorted store.
///
/// Keys are ordered by `str` comparison, which for UTF-8 is Unicode
/// code-point order. Also serves as the working image of a [`FileStore`].
///
/// [`FileStore`]: super::FileStore
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, WordList>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, words)` pairs, keeping word order. Repeated words
    /// collapse to their first occurrence; a repeated key replaces the
    /// earlier entry.
    pub fn from_entries<I, W>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, W)>,
        W: IntoIterator<Item = String>,
    {
        let mut map: BTreeMap<String, WordList> = BTreeMap::new();
        for (key, words) in entries {
            if key.is_empty() {
                continue;
            }
            let list: WordList = words.into_iter().filter(|w| !w.is_empty()).collect();
            if list.is_empty() {
                continue;
            }
            map.insert(key, list);
        }
        Self { entries: map }
    }

    /// Promote `word` under `key`. Returns whether anything changed.
    pub(crate) fn apply(&mut self, key: &str, word: &str) -> bool {
        if key.is_empty() || word.is_empty() {
            return false;
        }
        match self.entries.get_mut(key) {
            Some(list) => list.promote(word),
            None => {
                self.entries.insert(key.to_string(), WordList::single(word));
                true
            }
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &WordList)> {
        self.entries.iter()
    }
}

impl DictionaryStore for MemoryStore {
    fn find_exact(&self, key: &str) -> Option<WordList> {
        self.entries.get(key).cloned()
    }

    fn scan_prefix<'a>(&'a self, key: &str) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        let range = self
            .entries
            .range::<String, _>((Bound::Included(key.to_string()), Bound::Unbounded));
        Box::new(range.map(|(k, v)| (k.clone(), v.clone())))
    }

    fn upsert(&mut self, key: &str, word: &str) -> Result<(), StoreError> {
        self.apply(key, word);
        Ok(())
    }

    fn scan_all<'a>(&'a self) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        Box::new(self.entries.iter().map(|(k, v)| (k.clone(), v.clone())))
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
