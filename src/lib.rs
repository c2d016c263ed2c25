pub mod engine;
pub mod romaji;
pub mod session;
pub mod settings;
pub mod store;
pub mod trace_init;
pub mod unicode;

pub use engine::{Candidate, Dictionaries, DictionaryEngine};
pub use session::CommitCycle;

pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
