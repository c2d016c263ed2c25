/// One selectable conversion result.
///
/// `key` is the reading or raw input the candidate was found under, `value`
/// the text shown and committed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    key: String,
    value: String,
}

impl Candidate {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `"<key> <value>"`: the connection-store key for this candidate, and
    /// also the form in which it is stored as a successor.
    pub fn connection_key(&self) -> String {
        format!("{} {}", self.key, self.value)
    }

    /// Parse a stored successor back into a candidate, splitting at the
    /// first space.
    pub fn from_connection_entry(entry: &str) -> Option<Self> {
        let (key, value) = entry.split_once(' ')?;
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(Self::new(key, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_key_format() {
        let c = Candidate::new("わたし", "私");
        assert_eq!(c.connection_key(), "わたし 私");
    }

    #[test]
    fn parse_connection_entry() {
        let c = Candidate::from_connection_entry("は は").unwrap();
        assert_eq!(c, Candidate::new("は", "は"));
        // Value may itself contain spaces.
        let c = Candidate::from_connection_entry("a b c").unwrap();
        assert_eq!(c.key(), "a");
        assert_eq!(c.value(), "b c");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(Candidate::from_connection_entry("nospace").is_none());
        assert!(Candidate::from_connection_entry(" value").is_none());
        assert!(Candidate::from_connection_entry("key ").is_none());
    }
}
