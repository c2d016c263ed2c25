use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of words stored under one key.
///
/// The most recently learned word is always first. Words are never counted;
/// learning a word again only moves it back to the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(word: &str) -> Self {
        Self(vec![word.to_string()])
    }

    /// Move `word` to the front, inserting it if absent.
    ///
    /// Returns `false` when the word was already first (nothing changed).
    pub fn promote(&mut self, word: &str) -> bool {
        if self.first() == Some(word) {
            return false;
        }
        self.0.retain(|w| w != word);
        self.0.insert(0, word.to_string());
        true
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.iter().any(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Collects words in order, keeping only the first occurrence of each.
impl FromIterator<String> for WordList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut words: Vec<String> = Vec::new();
        for w in iter {
            if !words.contains(&w) {
                words.push(w);
            }
        }
        Self(words)
    }
}

impl<'a> IntoIterator for &'a WordList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
