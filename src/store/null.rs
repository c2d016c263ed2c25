use std::iter;

use super::{DictionaryStore, StoreEntry, StoreError, WordList};

/// Stand-in for a store that could not be opened.
///
/// Always empty; writes are refused with [`StoreError::Unavailable`] and
/// leave no trace, so the engine keeps running on the remaining stores.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl DictionaryStore for NullStore {
    fn find_exact(&self, _key: &str) -> Option<WordList> {
        None
    }

    fn scan_prefix<'a>(&'a self, _key: &str) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        Box::new(iter::empty())
    }

    fn upsert(&mut self, _key: &str, _word: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable)
    }

    fn scan_all<'a>(&'a self) -> Box<dyn Iterator<Item = StoreEntry> + 'a> {
        Box::new(iter::empty())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    fn len(&self) -> usize {
        0
    }

    fn is_available(&self) -> bool {
        false
    }
}
