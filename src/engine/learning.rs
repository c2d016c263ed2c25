//! Updating the learning and connection stores from committed candidates.

use tracing::debug;

use super::Candidate;
use crate::romaji::transliterate;
use crate::store::{DictionaryStore, StoreError};
use crate::unicode::{contains_punctuation, is_hiragana_reading};

/// Why a commit was not registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("empty key or word")]
    EmptyKeyOrWord,
    #[error("right key is longer than left key")]
    RightKeyLonger,
    #[error("value contains punctuation")]
    Punctuation,
    #[error("right value is not a hiragana suffix")]
    NonKanaSuffix,
    #[error("successor key contains a space")]
    SpaceInKey,
}

#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    #[error("commit skipped: {0}")]
    Skipped(#[from] SkipReason),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LearnError {
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Borrowed view over the two writable stores.
pub struct LearningManager<'a> {
    learning: &'a mut dyn DictionaryStore,
    connection: &'a mut dyn DictionaryStore,
}

impl<'a> LearningManager<'a> {
    pub fn new(
        learning: &'a mut dyn DictionaryStore,
        connection: &'a mut dyn DictionaryStore,
    ) -> Self {
        Self {
            learning,
            connection,
        }
    }

    /// Record `word` as the most recent choice for the reading of `key`.
    pub fn commit(&mut self, key: &str, word: &str) -> Result<(), LearnError> {
        if key.is_empty() || word.is_empty() {
            return Err(SkipReason::EmptyKeyOrWord.into());
        }
        let reading = transliterate(key);
        self.learning.upsert(&reading, word)?;
        debug!(reading = %reading, word, "learned");
        Ok(())
    }

    /// Learn `left` and `right` as one word, when `right` looks like a
    /// kana suffix (okurigana, particle) of `left`.
    pub fn commit_concatenation(
        &mut self,
        left: &Candidate,
        right: &Candidate,
    ) -> Result<(), LearnError> {
        if left.key().chars().count() < right.key().chars().count() {
            return Err(SkipReason::RightKeyLonger.into());
        }
        if contains_punctuation(left.value()) || contains_punctuation(right.value()) {
            return Err(SkipReason::Punctuation.into());
        }
        if !is_hiragana_reading(right.value()) {
            return Err(SkipReason::NonKanaSuffix.into());
        }
        let key = format!("{}{}", left.key(), right.key());
        let word = format!("{}{}", left.value(), right.value());
        self.commit(&key, &word)
    }

    /// Record that `next` was committed right after `prev`.
    pub fn commit_connection(&mut self, prev: &Candidate, next: &Candidate) -> Result<(), LearnError> {
        if contains_punctuation(prev.value()) {
            return Err(SkipReason::Punctuation.into());
        }
        if next.key().is_empty() || next.value().is_empty() {
            return Err(SkipReason::EmptyKeyOrWord.into());
        }
        // Stored successors are split back at their first space.
        if next.key().contains(' ') {
            return Err(SkipReason::SpaceInKey.into());
        }
        let key = prev.connection_key();
        self.connection.upsert(&key, &next.connection_key())?;
        debug!(prev = %key, next = next.value(), "learned connection");
        Ok(())
    }
}
