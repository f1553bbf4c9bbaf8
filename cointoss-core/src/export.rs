//! Export and import documents.
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementSet;
use crate::state::TossStats;
use crate::storage::StorageError;
use crate::summary::StatisticalSummary;

/// Full snapshot offered to the user as a downloadable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub stats: TossStats,
    pub achievements: AchievementSet,
    pub summary: StatisticalSummary,
    /// Milliseconds since the Unix epoch at export time.
    pub timestamp: u64,
    pub user_agent: String,
}

impl ExportDocument {
    /// Pretty-printed JSON body for the download.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        export_file_name(self.timestamp)
    }
}

#[must_use]
pub fn export_file_name(timestamp: u64) -> String {
    format!("coin-toss-data-{timestamp}.json")
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Import is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Import is missing the `{0}` field")]
    MissingField(&'static str),
    #[error("Import field `{field}` is malformed: {source}")]
    Malformed {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// State carried by an accepted import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPayload {
    pub stats: TossStats,
    pub achievements: AchievementSet,
}

/// Parse and validate an import document.
///
/// Only `stats` and `achievements` are required; the rest of an export
/// document is informational and ignored.
///
/// # Errors
///
/// Returns [`ImportError`] when the text is not JSON, a required field is
/// absent or null, or a field does not have the expected shape.
pub fn parse_import(text: &str) -> Result<ImportPayload, ImportError> {
    let mut doc: serde_json::Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
    let stats = take_field(&mut doc, "stats")?;
    let achievements = take_field(&mut doc, "achievements")?;

    let mut stats: TossStats = serde_json::from_value(stats)
        .map_err(|source| ImportError::Malformed {
            field: "stats",
            source,
        })?;
    let achievements: AchievementSet =
        serde_json::from_value(achievements).map_err(|source| ImportError::Malformed {
            field: "achievements",
            source,
        })?;
    if !stats.is_consistent() {
        log::warn!("imported stats had inconsistent counters; repairing");
        stats.sanitize();
    }
    Ok(ImportPayload {
        stats,
        achievements,
    })
}

fn take_field(
    doc: &mut serde_json::Value,
    field: &'static str,
) -> Result<serde_json::Value, ImportError> {
    match doc.get_mut(field).map(serde_json::Value::take) {
        Some(serde_json::Value::Null) | None => Err(ImportError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::AchievementId;

    #[test]
    fn accepts_minimal_document() {
        let payload =
            parse_import(r#"{"stats":{"total":1,"heads":1},"achievements":{"first-toss":true}}"#)
                .unwrap();
        assert_eq!(payload.stats.total, 1);
        assert!(payload.achievements.is_unlocked(AchievementId::FirstToss));
    }

    #[test]
    fn rejects_missing_achievements() {
        let err = parse_import(r#"{"stats":{"total":0}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("achievements")));
    }

    #[test]
    fn rejects_null_stats_and_bad_json() {
        let err = parse_import(r#"{"stats":null,"achievements":{}}"#).unwrap_err();
        assert!(matches!(err, ImportError::MissingField("stats")));
        assert!(matches!(
            parse_import("not json").unwrap_err(),
            ImportError::Parse(_)
        ));
        assert!(matches!(
            parse_import("[1,2]").unwrap_err(),
            ImportError::MissingField("stats")
        ));
    }

    #[test]
    fn rejects_wrongly_shaped_fields() {
        let err = parse_import(r#"{"stats":"lots","achievements":{}}"#).unwrap_err();
        assert!(matches!(err, ImportError::Malformed { field: "stats", .. }));
    }

    #[test]
    fn file_name_embeds_timestamp() {
        assert_eq!(export_file_name(1700), "coin-toss-data-1700.json");
    }
}
