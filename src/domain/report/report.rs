//! Structured report document.
//!
//! The final deliverable of a game session: a strategy report the assistant
//! synthesizes from the conversation. Providers return it as raw JSON text;
//! [`Report::parse`] turns that text into a validated document or a full
//! list of schema violations suitable for a repair prompt.
//!
//! # Schema
//!
//! ```json
//! {
//!   "mode": "audit",
//!   "language": "fr",
//!   "sector": "Restauration / Café",
//!   "summary": "...",
//!   "sections": [{ "title": "...", "bullets": ["...", "..."] }],
//!   "cta": "..."
//! }
//! ```

use crate::domain::foundation::{GameMode, Language};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One titled section of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSection {
    title: String,
    bullets: Vec<String>,
}

impl ReportSection {
    /// Creates a section. Intended for tests and fixtures; provider output
    /// goes through [`Report::parse`] instead.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            title: title.into(),
            bullets,
        }
    }

    /// Returns the section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the ordered bullet points.
    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }
}

/// A validated strategy report.
///
/// # Invariants
///
/// - `sector`, `summary`, and `cta` are non-empty
/// - `sections` is non-empty; every section has a non-empty title and at
///   least one non-empty bullet
///
/// Construction goes through [`Report::parse`] / [`Report::from_value`],
/// which enforce the invariants and report every violation at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    mode: GameMode,
    language: Language,
    sector: String,
    summary: String,
    sections: Vec<ReportSection>,
    cta: String,
}

impl Report {
    /// Parses and validates a report from raw JSON text.
    ///
    /// # Errors
    ///
    /// Returns every schema violation found, so a repair prompt can list
    /// them all in one pass.
    pub fn parse(text: &str) -> Result<Self, SchemaViolations> {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(err) => {
                let mut violations = SchemaViolations::new();
                violations.push(format!("response is not valid JSON: {}", err));
                Err(violations)
            }
        }
    }

    /// Validates an already-parsed JSON value against the report schema.
    pub fn from_value(value: &Value) -> Result<Self, SchemaViolations> {
        let mut violations = SchemaViolations::new();

        let obj = match value.as_object() {
            Some(obj) => obj,
            None => {
                violations.push("root must be a JSON object");
                return Err(violations);
            }
        };

        let mode = match obj.get("mode") {
            None => {
                violations.push("missing required field 'mode'");
                None
            }
            Some(v) => match serde_json::from_value::<GameMode>(v.clone()) {
                Ok(mode) => Some(mode),
                Err(_) => {
                    violations.push(format!(
                        "'mode' must be one of audit, startup, portfolio (got {})",
                        v
                    ));
                    None
                }
            },
        };

        let language = match obj.get("language") {
            None => {
                violations.push("missing required field 'language'");
                None
            }
            Some(v) => match serde_json::from_value::<Language>(v.clone()) {
                Ok(language) => Some(language),
                Err(_) => {
                    violations.push(format!("'language' must be one of fr, en (got {})", v));
                    None
                }
            },
        };

        let sector = Self::required_string(obj, "sector", &mut violations);
        let summary = Self::required_string(obj, "summary", &mut violations);
        let cta = Self::required_string(obj, "cta", &mut violations);
        let sections = Self::required_sections(obj, &mut violations);

        match (mode, language, sector, summary, cta, sections) {
            (Some(mode), Some(language), Some(sector), Some(summary), Some(cta), Some(sections))
                if violations.is_empty() =>
            {
                Ok(Self {
                    mode,
                    language,
                    sector,
                    summary,
                    sections,
                    cta,
                })
            }
            _ => Err(violations),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the game mode the report was produced for.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Returns the report language.
    pub fn language(&self) -> Language {
        self.language
    }

    /// Returns the business sector label.
    pub fn sector(&self) -> &str {
        &self.sector
    }

    /// Returns the executive summary.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Returns the report sections in order.
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Returns the call to action.
    pub fn cta(&self) -> &str {
        &self.cta
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn required_string(
        obj: &serde_json::Map<String, Value>,
        field: &str,
        violations: &mut SchemaViolations,
    ) -> Option<String> {
        match obj.get(field) {
            None => {
                violations.push(format!("missing required field '{}'", field));
                None
            }
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::String(_)) => {
                violations.push(format!("'{}' must not be empty", field));
                None
            }
            Some(other) => {
                violations.push(format!("'{}' must be a string (got {})", field, other));
                None
            }
        }
    }

    fn required_sections(
        obj: &serde_json::Map<String, Value>,
        violations: &mut SchemaViolations,
    ) -> Option<Vec<ReportSection>> {
        let items = match obj.get("sections") {
            None => {
                violations.push("missing required field 'sections'");
                return None;
            }
            Some(Value::Array(items)) if !items.is_empty() => items,
            Some(Value::Array(_)) => {
                violations.push("'sections' must contain at least one section");
                return None;
            }
            Some(other) => {
                violations.push(format!("'sections' must be an array (got {})", other));
                return None;
            }
        };

        let before = violations.len();
        let mut sections = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            if let Some(section) = Self::parse_section(index, item, violations) {
                sections.push(section);
            }
        }

        if violations.len() == before {
            Some(sections)
        } else {
            None
        }
    }

    fn parse_section(
        index: usize,
        item: &Value,
        violations: &mut SchemaViolations,
    ) -> Option<ReportSection> {
        let obj = match item.as_object() {
            Some(obj) => obj,
            None => {
                violations.push(format!("'sections[{}]' must be an object", index));
                return None;
            }
        };

        let title = match obj.get("title") {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => {
                violations.push(format!(
                    "'sections[{}].title' must be a non-empty string",
                    index
                ));
                None
            }
        };

        let bullets = match obj.get("bullets") {
            Some(Value::Array(items)) if !items.is_empty() => {
                let mut bullets = Vec::with_capacity(items.len());
                let mut all_valid = true;
                for bullet in items {
                    match bullet {
                        Value::String(s) if !s.trim().is_empty() => bullets.push(s.clone()),
                        _ => {
                            violations.push(format!(
                                "'sections[{}].bullets' must contain only non-empty strings",
                                index
                            ));
                            all_valid = false;
                            break;
                        }
                    }
                }
                if all_valid {
                    Some(bullets)
                } else {
                    None
                }
            }
            _ => {
                violations.push(format!(
                    "'sections[{}].bullets' must be a non-empty array",
                    index
                ));
                None
            }
        };

        match (title, bullets) {
            (Some(title), Some(bullets)) => Some(ReportSection { title, bullets }),
            _ => None,
        }
    }
}

/// Accumulated schema violations from validating provider output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaViolations(Vec<String>);

impl SchemaViolations {
    /// Creates an empty violation list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Records a violation.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    /// Returns true when no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the violation messages in the order they were found.
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

impl std::fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for SchemaViolations {}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_report_json() -> serde_json::Value {
        serde_json::json!({
            "mode": "audit",
            "language": "fr",
            "sector": "Restauration / Café",
            "summary": "Le site de Chez Luc convertit mal sur mobile.",
            "sections": [
                {
                    "title": "Diagnostic",
                    "bullets": ["Temps de chargement élevé", "Menu introuvable"]
                },
                {
                    "title": "Plan d'action",
                    "bullets": ["Compresser les images"]
                }
            ],
            "cta": "Réservez un appel découverte."
        })
    }

    mod parsing {
        use super::*;

        #[test]
        fn valid_document_parses() {
            let report = Report::from_value(&valid_report_json()).unwrap();
            assert_eq!(report.mode(), GameMode::Audit);
            assert_eq!(report.language(), Language::Fr);
            assert_eq!(report.sector(), "Restauration / Café");
            assert_eq!(report.sections().len(), 2);
            assert_eq!(report.sections()[0].title(), "Diagnostic");
            assert_eq!(report.sections()[0].bullets().len(), 2);
            assert_eq!(report.cta(), "Réservez un appel découverte.");
        }

        #[test]
        fn parse_accepts_raw_json_text() {
            let text = valid_report_json().to_string();
            assert!(Report::parse(&text).is_ok());
        }

        #[test]
        fn non_json_text_is_a_single_violation() {
            let err = Report::parse("here is your report!").unwrap_err();
            assert_eq!(err.len(), 1);
            assert!(err.messages()[0].contains("not valid JSON"));
        }

        #[test]
        fn non_object_root_is_rejected() {
            let err = Report::from_value(&serde_json::json!([1, 2, 3])).unwrap_err();
            assert!(err.messages()[0].contains("object"));
        }
    }

    mod field_validation {
        use super::*;

        #[test]
        fn missing_fields_are_all_reported_at_once() {
            let err = Report::from_value(&serde_json::json!({})).unwrap_err();
            assert_eq!(err.len(), 6);
            for field in ["mode", "language", "sector", "summary", "cta", "sections"] {
                assert!(
                    err.messages().iter().any(|m| m.contains(field)),
                    "no violation mentions '{}'",
                    field
                );
            }
        }

        #[test]
        fn unknown_mode_is_rejected() {
            let mut value = valid_report_json();
            value["mode"] = serde_json::json!("consulting");
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("'mode'"));
        }

        #[test]
        fn empty_summary_is_rejected() {
            let mut value = valid_report_json();
            value["summary"] = serde_json::json!("   ");
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("'summary'"));
        }

        #[test]
        fn empty_sections_array_is_rejected() {
            let mut value = valid_report_json();
            value["sections"] = serde_json::json!([]);
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("at least one section"));
        }

        #[test]
        fn section_without_bullets_is_rejected() {
            let mut value = valid_report_json();
            value["sections"] = serde_json::json!([{ "title": "Diagnostic", "bullets": [] }]);
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("sections[0].bullets"));
        }

        #[test]
        fn section_with_blank_title_is_rejected() {
            let mut value = valid_report_json();
            value["sections"] = serde_json::json!([{ "title": "", "bullets": ["point"] }]);
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("sections[0].title"));
        }

        #[test]
        fn non_string_bullet_is_rejected() {
            let mut value = valid_report_json();
            value["sections"] =
                serde_json::json!([{ "title": "Diagnostic", "bullets": ["ok", 42] }]);
            let err = Report::from_value(&value).unwrap_err();
            assert!(err.messages()[0].contains("sections[0].bullets"));
        }
    }

    mod serialization {
        use super::*;

        #[test]
        fn serializing_a_parsed_report_is_stable() {
            let report = Report::from_value(&valid_report_json()).unwrap();
            let first = serde_json::to_string(&report).unwrap();
            let second = serde_json::to_string(&report).unwrap();
            assert_eq!(first, second);
        }

        #[test]
        fn serialized_report_revalidates() {
            let report = Report::from_value(&valid_report_json()).unwrap();
            let value = serde_json::to_value(&report).unwrap();
            let reparsed = Report::from_value(&value).unwrap();
            assert_eq!(reparsed, report);
        }
    }

    mod violations_display {
        use super::*;

        #[test]
        fn joins_messages_with_semicolons() {
            let mut violations = SchemaViolations::new();
            violations.push("missing required field 'cta'");
            violations.push("'summary' must not be empty");
            assert_eq!(
                violations.to_string(),
                "missing required field 'cta'; 'summary' must not be empty"
            );
        }
    }
}
