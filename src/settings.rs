//! Global settings loaded from TOML, following the same OnceLock pattern as the
//! romaji table.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).unwrap_or_else(|e| {
            tracing::warn!("settings rejected, using built-in defaults: {e}");
            Settings::default()
        })
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    pub search: SearchSettings,
}

/// Knobs consumed read-only by candidate search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchSettings {
    pub convert_halfkana: bool,
    pub search_limit: usize,
    pub completion_length_delta: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            convert_halfkana: false,
            search_limit: 50,
            completion_length_delta: 3,
        }
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_positive_usize {
        ($section:ident . $field:ident) => {
            if s.$section.$field == 0 {
                return Err(SettingsError::InvalidValue {
                    field: concat!(stringify!($section), ".", stringify!($field)).to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        };
    }

    check_positive_usize!(search.search_limit);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert!(!s.search.convert_halfkana);
        assert_eq!(s.search.search_limit, 50);
        assert_eq!(s.search.completion_length_delta, 3);
        assert_eq!(s.search, SearchSettings::default());
    }

    #[test]
    fn parse_valid_custom_toml() {
        let toml = r#"
[search]
convert_halfkana = true
search_limit = 10
completion_length_delta = 2
"#;
        let s = parse_settings_toml(toml).unwrap();
        assert!(s.search.convert_halfkana);
        assert_eq!(s.search.search_limit, 10);
        assert_eq!(s.search.completion_length_delta, 2);
    }

    #[test]
    fn zero_delta_is_allowed() {
        let toml = r#"
[search]
convert_halfkana = false
search_limit = 10
completion_length_delta = 0
"#;
        assert!(parse_settings_toml(toml).is_ok());
    }

    #[test]
    fn error_zero_search_limit() {
        let toml = r#"
[search]
convert_halfkana = false
search_limit = 0
completion_length_delta = 3
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
        assert!(err.to_string().contains("search.search_limit"));
    }

    #[test]
    fn error_negative_delta() {
        let toml = r#"
[search]
convert_halfkana = false
search_limit = 10
completion_length_delta = -1
"#;
        let err = parse_settings_toml(toml).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_missing_section() {
        let err = parse_settings_toml("").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn error_invalid_toml() {
        let err = parse_settings_toml("not valid toml {{{").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }
}
