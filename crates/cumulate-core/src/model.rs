use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// The four content-richness tracks an activity carries. `Core` is the
/// reference track: its step list drives row emission, and the other levels
/// align to it by positional index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    #[serde(rename = "CORE")]
    Core,
    #[serde(rename = "LIGHT-MULTILINGUAL")]
    LightMultilingual,
    #[serde(rename = "MODERATE-MULTILINGUAL")]
    ModerateMultilingual,
    #[serde(rename = "INTENSIVE-MULTILINGUAL")]
    IntensiveMultilingual,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Core,
        Level::LightMultilingual,
        Level::ModerateMultilingual,
        Level::IntensiveMultilingual,
    ];

    /// Wire name, as used for the `steps` map keys in source records.
    pub fn key(self) -> &'static str {
        match self {
            Level::Core => "CORE",
            Level::LightMultilingual => "LIGHT-MULTILINGUAL",
            Level::ModerateMultilingual => "MODERATE-MULTILINGUAL",
            Level::IntensiveMultilingual => "INTENSIVE-MULTILINGUAL",
        }
    }

    /// Position of this level in per-row arrays (`Level::ALL` order).
    pub fn index(self) -> usize {
        match self {
            Level::Core => 0,
            Level::LightMultilingual => 1,
            Level::ModerateMultilingual => 2,
            Level::IntensiveMultilingual => 3,
        }
    }

    /// Column label for this level's aligned page id in the flat extract.
    pub fn page_id_column(self) -> &'static str {
        match self {
            Level::Core => "CORE pageReferenceId",
            Level::LightMultilingual => "LIGHT-MULTILINGUAL pageReferenceId",
            Level::ModerateMultilingual => "MODERATE-MULTILINGUAL pageReferenceId",
            Level::IntensiveMultilingual => "INTENSIVE-MULTILINGUAL pageReferenceId",
        }
    }

    /// Column label for this level's back-reference in the annotated report.
    pub fn cumulated_column(self) -> &'static str {
        match self {
            Level::Core => "CORE Cumulated From",
            Level::LightMultilingual => "LIGHT-MULTILINGUAL Cumulated From",
            Level::ModerateMultilingual => "MODERATE-MULTILINGUAL Cumulated From",
            Level::IntensiveMultilingual => "INTENSIVE-MULTILINGUAL Cumulated From",
        }
    }
}

// ---------------------------------------------------------------------------
// ActivityRecord (source input)
// ---------------------------------------------------------------------------

/// One parsed source record. Every scalar leaf is tolerant: missing fields
/// deserialize to empty strings and JSON numbers are accepted where strings
/// are expected, since source files mix both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityRecord {
    #[serde(default, rename = "activityinfo")]
    pub activity_info: ActivityInfo,
    /// Step lists keyed by level wire name. Unknown keys are retained but
    /// ignored; lookups go through [`ActivityRecord::steps_for`].
    #[serde(default)]
    pub steps: HashMap<String, Vec<StepEntry>>,
}

impl ActivityRecord {
    /// The step list for `level`, empty if the record has none.
    pub fn steps_for(&self, level: Level) -> &[StepEntry] {
        self.steps.get(level.key()).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityInfo {
    #[serde(default, rename = "activityNo", deserialize_with = "scalar_string")]
    pub activity_no: String,
    #[serde(default, rename = "activityTitle", deserialize_with = "scalar_string")]
    pub activity_title: String,
    #[serde(default, rename = "referenceID", deserialize_with = "scalar_string")]
    pub reference_id: String,
}

impl ActivityInfo {
    /// True if any identifying field is non-empty. A record with no CORE
    /// steps still yields a placeholder row when this holds.
    pub fn is_identified(&self) -> bool {
        !self.activity_no.is_empty()
            || !self.activity_title.is_empty()
            || !self.reference_id.is_empty()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepEntry {
    #[serde(default, rename = "pageReferenceId", deserialize_with = "scalar_string")]
    pub page_reference_id: String,
    #[serde(
        default,
        rename = "originalPageSequence",
        deserialize_with = "scalar_string"
    )]
    pub original_page_sequence: String,
    #[serde(default)]
    pub metadata: StepMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepMetadata {
    #[serde(default, rename = "stepTitle", deserialize_with = "scalar_string")]
    pub step_title: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: String,
}

/// Accept strings, numbers, booleans, or null where a string is expected.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ---------------------------------------------------------------------------
// FlatRow
// ---------------------------------------------------------------------------

/// One row of the flattened dataset: one per CORE step, or a single
/// placeholder when an identified activity has no CORE steps at all.
#[derive(Debug, Clone, Serialize)]
pub struct FlatRow {
    pub source_file: String,
    pub reference_id: String,
    pub activity_no: String,
    pub activity_title: String,
    /// Step-ordinal label, `"Step {n}:"` with a 1-based continuous counter.
    pub step_label: String,
    pub step_title: String,
    pub step_name: String,
    pub page_reference_id: String,
    pub original_page_sequence: String,
    /// Aligned page id per level, `Level::ALL` order. Empty when the level
    /// has no step at that index or the source value was the `N/A` sentinel.
    pub level_page_ids: [String; 4],
}

impl FlatRow {
    pub fn page_id(&self, level: Level) -> &str {
        &self.level_page_ids[level.index()]
    }
}

// ---------------------------------------------------------------------------
// CumulatedFrom / Status / AnnotatedRow
// ---------------------------------------------------------------------------

/// Per-level reuse annotation: the first sighting of a page id is `Fresh`,
/// later sightings carry a back-reference to the most recent one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CumulatedFrom {
    Fresh,
    Reused(String),
}

impl CumulatedFrom {
    pub fn label(&self) -> &str {
        match self {
            CumulatedFrom::Fresh => "Fresh",
            CumulatedFrom::Reused(reference) => reference,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, CumulatedFrom::Fresh)
    }
}

impl Serialize for CumulatedFrom {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "Pass",
            Status::Fail => "Fail",
        }
    }
}

/// A [`FlatRow`] after the tracker pass: per-level reuse annotations plus the
/// row's cross-level consistency verdict.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedRow {
    #[serde(flatten)]
    pub flat: FlatRow,
    /// `Level::ALL` order.
    pub cumulated_from: [CumulatedFrom; 4],
    pub status: Status,
}

impl AnnotatedRow {
    pub fn cumulated(&self, level: Level) -> &CumulatedFrom {
        &self.cumulated_from[level.index()]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_keys_roundtrip_serde() {
        for level in Level::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.key()));
            let parsed: Level = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, level);
        }
    }

    #[test]
    fn level_index_matches_all_order() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn record_tolerates_numeric_scalars() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{
                "activityinfo": {"activityNo": 12, "activityTitle": "Intro", "referenceID": "R-1"},
                "steps": {"CORE": [{"pageReferenceId": 4401, "metadata": {"stepTitle": "Warmup"}}]}
            }"#,
        )
        .unwrap();
        assert_eq!(record.activity_info.activity_no, "12");
        assert_eq!(record.steps_for(Level::Core)[0].page_reference_id, "4401");
        assert_eq!(record.steps_for(Level::Core)[0].metadata.step_title, "Warmup");
    }

    #[test]
    fn record_tolerates_missing_sections() {
        let record: ActivityRecord = serde_json::from_str("{}").unwrap();
        assert!(!record.activity_info.is_identified());
        assert!(record.steps_for(Level::Core).is_empty());
    }

    #[test]
    fn unknown_step_keys_are_ignored() {
        let record: ActivityRecord = serde_json::from_str(
            r#"{"steps": {"EXPERIMENTAL": [{"pageReferenceId": "x"}]}}"#,
        )
        .unwrap();
        for level in Level::ALL {
            assert!(record.steps_for(level).is_empty());
        }
    }

    #[test]
    fn cumulated_from_serializes_as_plain_string() {
        assert_eq!(
            serde_json::to_string(&CumulatedFrom::Fresh).unwrap(),
            "\"Fresh\""
        );
        assert_eq!(
            serde_json::to_string(&CumulatedFrom::Reused("2 - Step 1".into())).unwrap(),
            "\"2 - Step 1\""
        );
    }
}
