//! Flat export records for personas and responses, plus a JSON writer.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use listening_common::{ListeningError, Persona, Result, SurveyResponse};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

/// Prefix applied to persona fields inside a response record.
pub const PERSONA_PREFIX: &str = "persona_";

/// An ordered field → value mapping. Serializes as a JSON object with keys in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRecord {
    fields: Vec<(String, String)>,
}

impl ExportRecord {
    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ExportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Every persona field by its stable name.
pub fn persona_record(persona: &Persona) -> ExportRecord {
    let mut record = ExportRecord::default();
    for (name, value) in persona.fields() {
        record.push(name, value);
    }
    record
}

/// One response flattened: response columns first, then every persona field
/// as `persona_<field>`. The persona's `id` is already `persona_id`.
pub fn response_record(response: &SurveyResponse) -> ExportRecord {
    let mut record = ExportRecord::default();
    record.push("persona_id", response.persona_id.to_string());
    record.push("question", response.question.as_str());
    record.push("response", response.response.as_str());
    record.push("success", response.success.to_string());
    record.push("backend_id", response.backend_id.as_str());
    record.push("timestamp", response.created_at.to_rfc3339());
    record.push("cost_usd", response.cost_usd.to_string());
    record.push("tokens_used", response.tokens_used.to_string());
    record.push("error", response.error.clone().unwrap_or_default());

    for (name, value) in response.persona.fields() {
        if name == "id" {
            continue;
        }
        record.push(format!("{PERSONA_PREFIX}{name}"), value);
    }
    record
}

/// Write `records` as a pretty JSON array, creating parent directories.
pub fn write_json(path: &Path, records: &[ExportRecord]) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ListeningError::Export(format!("{}: {e}", parent.display())))?;
    }

    let json = serde_json::to_string_pretty(records)
        .map_err(|e| ListeningError::Export(e.to_string()))?;
    std::fs::write(path, json)
        .map_err(|e| ListeningError::Export(format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), records = records.len(), "Export written");
    Ok(path.to_path_buf())
}

/// Timestamped default file name, e.g. `survey_export_20250101_120000.json`.
pub fn export_file_name(stem: &str, at: DateTime<Utc>) -> String {
    format!("{stem}_{}.json", at.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{animal, human, response_for};
    use chrono::TimeZone;

    #[test]
    fn test_persona_record_keeps_field_order() {
        let record = persona_record(&animal(3, "Herbivore"));
        let names: Vec<_> = record.names().collect();
        assert_eq!(names.first(), Some(&"id"));
        assert_eq!(names.last(), Some(&"continent"));
        assert_eq!(record.get("diet_type"), Some("Herbivore"));
    }

    #[test]
    fn test_response_record_prefixes_persona_fields() {
        let response = response_for(human(5, 61), "Why?", "Because.");
        let record = response_record(&response);

        assert_eq!(record.get("persona_id"), Some("5"));
        assert_eq!(record.get("success"), Some("true"));
        assert_eq!(record.get("persona_age"), Some("61"));
        assert_eq!(record.get("persona_country"), Some("Japan"));
        assert!(record.get("age").is_none());
        assert_eq!(record.names().filter(|n| *n == "persona_id").count(), 1);
    }

    #[test]
    fn test_record_serializes_in_order() {
        let record = persona_record(&human(1, 30));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with("{\"id\":\"1\",\"age\":\"30\""));
    }

    #[test]
    fn test_write_json_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/personas.json");
        let records = vec![persona_record(&human(1, 30))];

        let written = write_json(&path, &records).unwrap();
        let text = std::fs::read_to_string(written).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["country"], "Japan");
    }

    #[test]
    fn test_export_file_name() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(
            export_file_name("survey_export", at),
            "survey_export_20250304_050607.json"
        );
    }
}
