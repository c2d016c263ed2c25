use tracing::debug;

use super::Candidate;
use crate::store::DictionaryStore;

/// Bigram lookup of candidates that previously followed a committed one.
pub struct PredictionEngine<'a> {
    connection: &'a dyn DictionaryStore,
}

impl<'a> PredictionEngine<'a> {
    pub fn new(connection: &'a dyn DictionaryStore) -> Self {
        Self { connection }
    }

    /// Successors of `last`, most recent first. `None` without context or
    /// when nothing has been learned for it.
    pub fn predict(&self, last: Option<&Candidate>) -> Option<Vec<Candidate>> {
        let last = last?;
        let words = self.connection.find_exact(&last.connection_key())?;
        let predictions: Vec<Candidate> = words
            .iter()
            .filter_map(Candidate::from_connection_entry)
            .collect();
        debug!(after = last.value(), count = predictions.len(), "predict");
        if predictions.is_empty() {
            None
        } else {
            Some(predictions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn no_context_no_prediction() {
        let store = MemoryStore::new();
        assert!(PredictionEngine::new(&store).predict(None).is_none());
    }

    #[test]
    fn unknown_context_no_prediction() {
        let mut store = MemoryStore::new();
        store.upsert("わたし 私", "は は").unwrap();
        let pe = PredictionEngine::new(&store);
        assert!(pe.predict(Some(&Candidate::new("わたし", "渡し"))).is_none());
    }

    #[test]
    fn predicts_stored_successors_in_order() {
        let mut store = MemoryStore::new();
        store.upsert("わたし 私", "は は").unwrap();
        store.upsert("わたし 私", "が が").unwrap();
        let pe = PredictionEngine::new(&store);
        let got = pe.predict(Some(&Candidate::new("わたし", "私"))).unwrap();
        assert_eq!(got, vec![Candidate::new("が", "が"), Candidate::new("は", "は")]);
    }

    #[test]
    fn malformed_entries_skipped() {
        let mut store = MemoryStore::new();
        store.upsert("a b", "broken").unwrap();
        let pe = PredictionEngine::new(&store);
        assert!(pe.predict(Some(&Candidate::new("a", "b"))).is_none());

        store.upsert("a b", "c d").unwrap();
        let pe = PredictionEngine::new(&store);
        let got = pe.predict(Some(&Candidate::new("a", "b"))).unwrap();
        assert_eq!(got, vec![Candidate::new("c", "d")]);
    }
}
