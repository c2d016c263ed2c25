use std::sync::OnceLock;

use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("default_romaji.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Deserialize)]
struct RomajiConfig {
    rules: Vec<(String, String)>,
}

#[derive(Debug, thiserror::Error)]
pub enum RomajiConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("rules table is empty")]
    Empty,
    #[error("non-ASCII pattern: {0}")]
    NonAsciiPattern(String),
    #[error("empty pattern at rule {0}")]
    EmptyPattern(usize),
    #[error("empty replacement for pattern: {0}")]
    EmptyReplacement(String),
    #[error("romaji table already initialized")]
    AlreadyInitialized,
}

/// Ordered list of `(pattern, replacement)` rules.
///
/// Rule order is significant and is kept exactly as written in the source
/// TOML, unlike a keyed map.
#[derive(Debug, Clone)]
pub struct RomajiTable {
    rules: Vec<(String, String)>,
}

impl RomajiTable {
    /// Get or initialize the global table.
    ///
    /// Uses the custom TOML registered through [`RomajiTable::init_custom`]
    /// if one was set before the first call, the embedded default otherwise.
    pub fn global() -> &'static RomajiTable {
        static INSTANCE: OnceLock<RomajiTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            if let Some(custom) = CUSTOM_TOML.get() {
                match parse_romaji_toml(custom) {
                    Ok(table) => return table,
                    Err(e) => tracing::warn!("custom romaji table rejected, using default: {e}"),
                }
            }
            Self::default_table()
        })
    }

    /// Register a custom rule table. Must happen before the first `global()`.
    pub fn init_custom(toml_content: String) -> Result<(), RomajiConfigError> {
        parse_romaji_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| RomajiConfigError::AlreadyInitialized)
    }

    fn default_table() -> RomajiTable {
        // The embedded table is covered by `parse_default_toml`.
        parse_romaji_toml(DEFAULT_TOML).unwrap_or_else(|_| RomajiTable { rules: Vec::new() })
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(p, r)| (p.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Returns the embedded default rule table as TOML.
pub fn default_toml() -> &'static str {
    DEFAULT_TOML
}

/// Parse and validate a rule table.
pub fn parse_romaji_toml(toml_str: &str) -> Result<RomajiTable, RomajiConfigError> {
    let config: RomajiConfig =
        toml::from_str(toml_str).map_err(|e| RomajiConfigError::Parse(e.to_string()))?;

    if config.rules.is_empty() {
        return Err(RomajiConfigError::Empty);
    }

    for (i, (pattern, replacement)) in config.rules.iter().enumerate() {
        if pattern.is_empty() {
            return Err(RomajiConfigError::EmptyPattern(i));
        }
        if !pattern.is_ascii() {
            return Err(RomajiConfigError::NonAsciiPattern(pattern.clone()));
        }
        if replacement.is_empty() {
            return Err(RomajiConfigError::EmptyReplacement(pattern.clone()));
        }
    }

    Ok(RomajiTable {
        rules: config.rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let table = parse_romaji_toml(DEFAULT_TOML).unwrap();
        assert!(table.len() > 250, "expected 250+ rules, got {}", table.len());
    }

    #[test]
    fn default_order_starts_with_geminates() {
        let table = parse_romaji_toml(DEFAULT_TOML).unwrap();
        let first: Vec<&str> = table.rules().take(3).map(|(p, _)| p).collect();
        assert_eq!(first, vec!["bb", "cc", "dd"]);
        let pos_nn = table.rules().position(|(p, _)| p == "nn").unwrap();
        let pos_na = table.rules().position(|(p, _)| p == "na").unwrap();
        assert!(pos_nn < pos_na);
    }

    #[test]
    fn parse_preserves_order() {
        let toml = r#"
rules = [
    ["b", "ぶ"],
    ["a", "あ"],
]
"#;
        let table = parse_romaji_toml(toml).unwrap();
        let rules: Vec<_> = table.rules().collect();
        assert_eq!(rules, vec![("b", "ぶ"), ("a", "あ")]);
    }

    #[test]
    fn error_empty_rules() {
        let err = parse_romaji_toml("rules = []").unwrap_err();
        assert!(matches!(err, RomajiConfigError::Empty));
    }

    #[test]
    fn error_non_ascii_pattern() {
        let err = parse_romaji_toml(r#"rules = [["あ", "a"]]"#).unwrap_err();
        assert!(matches!(err, RomajiConfigError::NonAsciiPattern(_)));
    }

    #[test]
    fn error_empty_pattern() {
        let err = parse_romaji_toml(r#"rules = [["", "a"]]"#).unwrap_err();
        assert!(matches!(err, RomajiConfigError::EmptyPattern(0)));
    }

    #[test]
    fn error_empty_replacement() {
        let err = parse_romaji_toml(r#"rules = [["a", ""]]"#).unwrap_err();
        assert!(matches!(err, RomajiConfigError::EmptyReplacement(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_romaji_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, RomajiConfigError::Parse(_)));
    }
}
