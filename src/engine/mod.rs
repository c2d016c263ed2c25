//! Candidate composition over the system, learning and connection stores.

mod candidate;
pub mod learning;
pub mod prediction;


pub use candidate::Candidate;
pub use learning::{LearnError, LearningManager, SkipReason};
pub use prediction::PredictionEngine;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, debug_span, warn};

use crate::romaji::{is_fully_resolved, transliterate};
use crate::settings::{settings, SearchSettings};
use crate::store::{
    open_or_stub, prefix_entries, DictionaryStore, MemoryStore, OpenMode, StoreError, WordList,
};
use crate::unicode::{to_half_katakana, to_wide_katakana, to_wide_latin};

pub const SYSTEM_STORE_FILE: &str = "system.kdic";
pub const LEARNING_STORE_FILE: &str = "learning.kdic";
pub const CONNECTION_STORE_FILE: &str = "connection.kdic";

/// The system dictionary. Only read access is exposed.
pub struct SystemDictionary(Box<dyn DictionaryStore>);

impl SystemDictionary {
    pub fn new(store: Box<dyn DictionaryStore>) -> Self {
        Self(store)
    }

    pub fn find_exact(&self, key: &str) -> Option<WordList> {
        self.0.find_exact(key)
    }

    pub fn as_store(&self) -> &dyn DictionaryStore {
        &*self.0
    }
}

/// The three named stores the engine composes candidates from.
pub struct Dictionaries {
    pub system: SystemDictionary,
    pub learning: Box<dyn DictionaryStore>,
    pub connection: Box<dyn DictionaryStore>,
}

impl Dictionaries {
    pub fn new(
        system: Box<dyn DictionaryStore>,
        learning: Box<dyn DictionaryStore>,
        connection: Box<dyn DictionaryStore>,
    ) -> Self {
        Self {
            system: SystemDictionary::new(system),
            learning,
            connection,
        }
    }

    /// Open the stores under `data_dir`. Each one that fails to open is
    /// replaced by an empty stand-in; the others keep working.
    pub fn open(data_dir: &Path) -> Self {
        let _span = debug_span!("open_dictionaries", dir = %data_dir.display()).entered();
        Self::new(
            open_or_stub(&data_dir.join(SYSTEM_STORE_FILE), OpenMode::ReadOnly),
            open_or_stub(&data_dir.join(LEARNING_STORE_FILE), OpenMode::ReadWrite),
            open_or_stub(&data_dir.join(CONNECTION_STORE_FILE), OpenMode::ReadWrite),
        )
    }

    /// In-memory stores around a prebuilt system dictionary.
    pub fn in_memory(system: MemoryStore) -> Self {
        Self::new(
            Box::new(system),
            Box::new(MemoryStore::new()),
            Box::new(MemoryStore::new()),
        )
    }

    /// Flush both writable stores. Failures are logged and swallowed.
    pub fn flush(&mut self) {
        for (name, store) in [
            ("learning", &mut self.learning),
            ("connection", &mut self.connection),
        ] {
            if let Err(e) = store.flush() {
                warn!(store = name, "flush failed: {e}");
            }
        }
    }
}

/// Ordered, duplicate-free candidate accumulator local to one search.
#[derive(Default)]
struct CandidateSink {
    items: Vec<Candidate>,
    seen: HashSet<Candidate>,
}

impl CandidateSink {
    /// Returns true if the candidate was new.
    fn push(&mut self, key: &str, value: &str) -> bool {
        let candidate = Candidate::new(key, value);
        if self.seen.contains(&candidate) {
            return false;
        }
        self.seen.insert(candidate.clone());
        self.items.push(candidate);
        true
    }

    fn push_words(&mut self, key: &str, words: &WordList) {
        for word in words {
            self.push(key, word);
        }
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn into_vec(self) -> Vec<Candidate> {
        self.items
    }
}

pub struct DictionaryEngine {
    dicts: Dictionaries,
    settings: SearchSettings,
}

impl DictionaryEngine {
    /// Engine using the process-wide search settings.
    pub fn new(dicts: Dictionaries) -> Self {
        Self::with_settings(dicts, settings().search.clone())
    }

    pub fn with_settings(dicts: Dictionaries, settings: SearchSettings) -> Self {
        Self { dicts, settings }
    }

    pub fn open(data_dir: &Path) -> Self {
        Self::new(Dictionaries::open(data_dir))
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn dictionaries(&self) -> &Dictionaries {
        &self.dicts
    }

    pub fn dictionaries_mut(&mut self) -> &mut Dictionaries {
        &mut self.dicts
    }

    /// Candidates for a typed key, most preferred first.
    ///
    /// Learned words come first, then system entries and completions, then
    /// kana and raw-input fallbacks. Never fails; an empty key yields an
    /// empty list.
    pub fn search(&self, key: &str) -> Vec<Candidate> {
        let _span = debug_span!("search", key).entered();
        if key.is_empty() {
            return Vec::new();
        }

        let reading = transliterate(key);
        let hiragana_only = is_fully_resolved(&reading);
        let mut out = CandidateSink::default();

        if hiragana_only {
            if let Some(words) = self.dicts.learning.find_exact(&reading) {
                out.push_words(&reading, &words);
            }
        }
        if let Some(words) = self.dicts.learning.find_exact(key) {
            out.push_words(key, &words);
        }

        let mut completions = 0;
        if hiragana_only {
            if let Some(words) = self.dicts.system.find_exact(&reading) {
                out.push_words(&reading, &words);
            }
            completions = self.push_completions(&reading, &mut out);

            out.push(&reading, &reading);
            out.push(&reading, &to_wide_katakana(&reading));
            if self.settings.convert_halfkana {
                out.push(&reading, &to_half_katakana(&reading));
            }
        }

        out.push(key, key);
        out.push(key, &to_wide_latin(key));

        debug!(
            reading = %reading,
            hiragana_only,
            completions,
            total = out.len(),
            "search done"
        );
        out.into_vec()
    }

    /// Add system entries whose key extends `reading`, bounded by
    /// `search_limit` added candidates and by key length. Returns the number
    /// added.
    fn push_completions(&self, reading: &str, out: &mut CandidateSink) -> usize {
        let max_len = reading.chars().count() + self.settings.completion_length_delta;
        let limit = self.settings.search_limit;
        let mut added = 0;

        'scan: for (stored_key, words) in prefix_entries(self.dicts.system.as_store(), reading) {
            if stored_key.chars().count() > max_len {
                break;
            }
            for word in &words {
                if added >= limit {
                    break 'scan;
                }
                if out.push(&stored_key, word) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Next-candidate predictions after `last`.
    pub fn predict(&self, last: Option<&Candidate>) -> Option<Vec<Candidate>> {
        self.predictor().predict(last)
    }

    pub fn predictor(&self) -> PredictionEngine<'_> {
        PredictionEngine::new(&*self.dicts.connection)
    }

    pub fn learner(&mut self) -> LearningManager<'_> {
        LearningManager::new(&mut *self.dicts.learning, &mut *self.dicts.connection)
    }

    pub fn commit(&mut self, key: &str, word: &str) -> Result<(), LearnError> {
        self.learner().commit(key, word)
    }

    pub fn commit_concatenation(
        &mut self,
        left: &Candidate,
        right: &Candidate,
    ) -> Result<(), LearnError> {
        self.learner().commit_concatenation(left, right)
    }

    pub fn commit_connection(&mut self, prev: &Candidate, next: &Candidate) -> Result<(), LearnError> {
        self.learner().commit_connection(prev, next)
    }

    pub fn flush(&mut self) {
        self.dicts.flush();
    }

    /// Flush the writable stores, surfacing the first error.
    pub fn try_flush(&mut self) -> Result<(), StoreError> {
        self.dicts.learning.flush()?;
        self.dicts.connection.flush()
    }
}
