use super::table::RomajiTable;

/// Transliterate romaji to kana using the global rule table.
///
/// Input is lowercased first. Text that is already kana or punctuation
/// passes through unchanged; unresolved consonants stay as ASCII.
pub fn transliterate(input: &str) -> String {
    transliterate_with(RomajiTable::global(), input)
}

/// Transliterate with an explicit rule table.
///
/// Every rule is a literal global substitution over the whole string, run to
/// completion before the next rule is applied.
pub fn transliterate_with(table: &RomajiTable, input: &str) -> String {
    let mut s = input.to_lowercase();
    for (pattern, replacement) in table.rules() {
        if s.contains(pattern) {
            s = s.replace(pattern, replacement);
        }
    }
    s
}

/// Whether transliteration left no ASCII behind, i.e. every mora resolved.
pub fn is_fully_resolved(reading: &str) -> bool {
    !reading.chars().any(|c| c.is_ascii())
}
