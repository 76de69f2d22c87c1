use crate::model::{ActivityRecord, FlatRow, Level};
use serde::ser::SerializeMap;
use serde::Serialize;

// ---------------------------------------------------------------------------
// StepTotals
// ---------------------------------------------------------------------------

/// Batch-wide step counts per level. Each activity contributes the full
/// length of its step list for each level, counted once per activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepTotals([usize; 4]);

impl StepTotals {
    pub fn get(&self, level: Level) -> usize {
        self.0[level.index()]
    }

    pub fn add(&mut self, level: Level, count: usize) {
        self.0[level.index()] += count;
    }

    pub fn merge(&mut self, other: StepTotals) {
        for level in Level::ALL {
            self.add(level, other.get(level));
        }
    }
}

impl Serialize for StepTotals {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Level::ALL.len()))?;
        for level in Level::ALL {
            map.serialize_entry(level.key(), &self.get(level))?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// Record Extractor
// ---------------------------------------------------------------------------

/// The `N/A` placeholder some source files use instead of omitting a page id.
const NA_SENTINEL: &str = "N/A";

fn normalize_page_id(raw: &str) -> String {
    if raw == NA_SENTINEL {
        String::new()
    } else {
        raw.to_string()
    }
}

/// Flatten one activity record into per-step rows plus its per-level step
/// counts. CORE drives emission: one row per CORE step, each carrying the
/// positionally aligned page id of every other level. An identified activity
/// with no CORE steps yields exactly one placeholder row so it survives into
/// the report.
pub fn extract_rows(record: &ActivityRecord, source_file: &str) -> (Vec<FlatRow>, StepTotals) {
    let info = &record.activity_info;
    let core_steps = record.steps_for(Level::Core);

    let mut rows = Vec::with_capacity(core_steps.len());
    for (i, core_step) in core_steps.iter().enumerate() {
        let mut level_page_ids: [String; 4] = Default::default();
        level_page_ids[Level::Core.index()] = normalize_page_id(&core_step.page_reference_id);
        for level in Level::ALL {
            if level == Level::Core {
                continue;
            }
            if let Some(step) = record.steps_for(level).get(i) {
                level_page_ids[level.index()] = normalize_page_id(&step.page_reference_id);
            }
        }
        rows.push(FlatRow {
            source_file: source_file.to_string(),
            reference_id: info.reference_id.clone(),
            activity_no: info.activity_no.clone(),
            activity_title: info.activity_title.clone(),
            // 1-based and continuous per emitted row, so the ordinal never
            // desynchronizes from the row sequence.
            step_label: format!("Step {}:", i + 1),
            step_title: core_step.metadata.step_title.clone(),
            step_name: core_step.metadata.name.clone(),
            page_reference_id: core_step.page_reference_id.clone(),
            original_page_sequence: core_step.original_page_sequence.clone(),
            level_page_ids,
        });
    }

    if rows.is_empty() && info.is_identified() {
        rows.push(FlatRow {
            source_file: source_file.to_string(),
            reference_id: info.reference_id.clone(),
            activity_no: info.activity_no.clone(),
            activity_title: info.activity_title.clone(),
            step_label: String::new(),
            step_title: String::new(),
            step_name: String::new(),
            page_reference_id: String::new(),
            original_page_sequence: String::new(),
            level_page_ids: Default::default(),
        });
    }

    let mut totals = StepTotals::default();
    for level in Level::ALL {
        totals.add(level, record.steps_for(level).len());
    }

    (rows, totals)
}

// ---------------------------------------------------------------------------
// Batch Collector
// ---------------------------------------------------------------------------

/// Fold the extractor over every record of a batch, in input order.
pub fn collect_batch<'a, I>(records: I) -> (Vec<FlatRow>, StepTotals)
where
    I: IntoIterator<Item = (&'a str, &'a ActivityRecord)>,
{
    let mut rows = Vec::new();
    let mut totals = StepTotals::default();
    for (source_file, record) in records {
        let (record_rows, record_totals) = extract_rows(record, source_file);
        tracing::debug!(
            source = source_file,
            rows = record_rows.len(),
            "extracted activity record"
        );
        rows.extend(record_rows);
        totals.merge(record_totals);
    }
    (rows, totals)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
