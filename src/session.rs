//! Per-input-cycle commit bookkeeping.
//!
//! The host calls [`CommitCycle::commit`] once per accepted candidate. The
//! cycle runs the learning calls in order (word, connection from the
//! previous candidate, concatenation with it) and returns predictions for
//! what may follow.

use tracing::{debug, debug_span, warn};

use crate::engine::{Candidate, DictionaryEngine, LearnError};

#[derive(Debug, Default)]
pub struct CommitCycle {
    previous: Option<Candidate>,
}

impl CommitCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The candidate committed last, if the context has not been reset.
    pub fn previous(&self) -> Option<&Candidate> {
        self.previous.as_ref()
    }

    /// Learn from `candidate` and return predictions for the next input.
    pub fn commit(
        &mut self,
        engine: &mut DictionaryEngine,
        candidate: Candidate,
    ) -> Option<Vec<Candidate>> {
        let _span = debug_span!("commit", key = candidate.key(), value = candidate.value()).entered();

        {
            let mut learner = engine.learner();
            note("commit", learner.commit(candidate.key(), candidate.value()));
            if let Some(prev) = &self.previous {
                note("connection", learner.commit_connection(prev, &candidate));
                note("concatenation", learner.commit_concatenation(prev, &candidate));
            }
        }

        self.previous = Some(candidate);
        engine.predict(self.previous.as_ref())
    }

    /// The composing text was committed as-is. Nothing is learned and the
    /// prediction context is dropped.
    pub fn commit_raw(&mut self, text: &str) {
        debug!(len = text.chars().count(), "raw commit");
        self.previous = None;
    }

    pub fn reset(&mut self) {
        self.previous = None;
    }
}

fn note(step: &str, result: Result<(), LearnError>) {
    match result {
        Ok(()) => {}
        Err(LearnError::Skipped(reason)) => debug!(step, %reason, "learning skipped"),
        Err(LearnError::Store(e)) => warn!(step, "learning failed: {e}"),
    }
}
