//! Romaji-to-kana transliteration.
//!
//! Applies an ordered table of literal substitution rules to the whole input,
//! producing hiragana for resolved morae. Trailing consonants that do not yet
//! form a mora stay as ASCII so callers can tell the input is incomplete.

mod convert;
mod table;

pub use convert::{is_fully_resolved, transliterate, transliterate_with};
pub use table::{default_toml, parse_romaji_toml, RomajiConfigError, RomajiTable};
