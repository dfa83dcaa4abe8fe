//! Language enum for the bilingual game experience.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported conversation and report languages.
///
/// French is the default: the game is deployed at Quebec trade shows
/// where French-first interaction is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Fr,
    En,
}

impl Language {
    /// Returns the wire name (matches the JSON representation).
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Returns the language name used when prompting for report output.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::Fr => "français",
            Language::En => "English",
        }
    }

    /// Returns true for French.
    pub fn is_french(&self) -> bool {
        matches!(self, Language::Fr)
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Fr
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_language_is_french() {
        assert_eq!(Language::default(), Language::Fr);
    }

    #[test]
    fn language_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Language::Fr).unwrap(), "\"fr\"");
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }

    #[test]
    fn language_deserializes_from_lowercase() {
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn prompt_name_matches_language() {
        assert_eq!(Language::Fr.prompt_name(), "français");
        assert_eq!(Language::En.prompt_name(), "English");
    }
}
