use crate::evaluate;
use crate::model::{AnnotatedRow, CumulatedFrom, FlatRow, Level};
use crate::order;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Sighting / ReuseSummary
// ---------------------------------------------------------------------------

/// The most recent row seen carrying a given page id for one level.
#[derive(Debug, Clone)]
struct Sighting {
    activity_no: String,
    step: Option<u32>,
}

impl Sighting {
    /// Back-reference string for a reuse of this sighting. The activity
    /// number is omitted when the reuse happens within the same activity.
    /// An unresolvable step ordinal renders as `Step ?` rather than a
    /// fabricated number.
    fn back_reference(&self, current_activity: &str) -> String {
        let step = match self.step {
            Some(n) => format!("Step {n}"),
            None => "Step ?".to_string(),
        };
        if self.activity_no == current_activity {
            step
        } else {
            format!("{} - {step}", self.activity_no)
        }
    }
}

/// One reused page id at one level, with every back-reference generated for
/// it over the batch, in generation order.
#[derive(Debug, Clone, Serialize)]
pub struct ReuseSummary {
    pub level: Level,
    pub page_id: String,
    pub references: Vec<String>,
}

// ---------------------------------------------------------------------------
// ReuseTracker
// ---------------------------------------------------------------------------

/// Per-level reuse state for one batch run. The index always tracks the most
/// recent sighting of each page id, so repeated reuses chain pairwise: a
/// third occurrence points at the second, not the first. State never aliases
/// across levels, and it lives for exactly one [`ReuseTracker::annotate`]
/// call chain.
#[derive(Debug, Default)]
pub struct ReuseTracker {
    index: [HashMap<String, Sighting>; 4],
    records: [HashMap<String, Vec<String>>; 4],
    /// First-reuse order of page ids per level, so summaries are stable.
    record_order: [Vec<String>; 4],
}

impl ReuseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single forward pass over rows already in batch order: fill in each
    /// level's "Cumulated From" and the row status, updating the reuse index
    /// on every non-empty page id. Must not be fed out-of-order rows; the
    /// most-recent-sighting semantics depend on it.
    pub fn annotate(&mut self, rows: Vec<FlatRow>) -> Vec<AnnotatedRow> {
        rows.into_iter().map(|row| self.annotate_row(row)).collect()
    }

    fn annotate_row(&mut self, row: FlatRow) -> AnnotatedRow {
        let step = order::step_number(&row.step_label);
        let mut cumulated: [CumulatedFrom; 4] = [
            CumulatedFrom::Fresh,
            CumulatedFrom::Fresh,
            CumulatedFrom::Fresh,
            CumulatedFrom::Fresh,
        ];

        for level in Level::ALL {
            let page_id = row.page_id(level);
            if page_id.is_empty() {
                continue;
            }
            let slot = level.index();
            if let Some(previous) = self.index[slot].get(page_id) {
                let reference = previous.back_reference(&row.activity_no);
                if !self.records[slot].contains_key(page_id) {
                    self.record_order[slot].push(page_id.to_string());
                }
                self.records[slot]
                    .entry(page_id.to_string())
                    .or_default()
                    .push(reference.clone());
                cumulated[slot] = CumulatedFrom::Reused(reference);
            }
            self.index[slot].insert(
                page_id.to_string(),
                Sighting {
                    activity_no: row.activity_no.clone(),
                    step,
                },
            );
        }

        let status = evaluate::row_status(&cumulated);
        AnnotatedRow {
            flat: row,
            cumulated_from: cumulated,
            status,
        }
    }

    /// Reused-pages summary: level order, then first-reuse order per level.
    pub fn summaries(&self) -> Vec<ReuseSummary> {
        let mut out = Vec::new();
        for level in Level::ALL {
            let slot = level.index();
            for page_id in &self.record_order[slot] {
                let references = self.records[slot][page_id].clone();
                out.push(ReuseSummary {
                    level,
                    page_id: page_id.clone(),
                    references,
                });
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;

    fn row(activity_no: &str, step_label: &str, page_ids: [&str; 4]) -> FlatRow {
        FlatRow {
            source_file: format!("a{activity_no}.json"),
            reference_id: String::new(),
            activity_no: activity_no.to_string(),
            activity_title: String::new(),
            step_label: step_label.to_string(),
            step_title: String::new(),
            step_name: String::new(),
            page_reference_id: page_ids[0].to_string(),
            original_page_sequence: String::new(),
            level_page_ids: page_ids.map(str::to_string),
        }
    }

    #[test]
    fn first_sighting_is_fresh() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![row("1", "Step 1:", ["A", "", "", ""])]);
        assert_eq!(*annotated[0].cumulated(Level::Core), CumulatedFrom::Fresh);
        assert_eq!(annotated[0].status, Status::Pass);
    }

    #[test]
    fn cross_activity_reuse_carries_activity_prefix() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("1", "Step 1:", ["A", "", "", ""]),
            row("1", "Step 2:", ["B", "", "", ""]),
            row("2", "Step 1:", ["B", "", "", ""]),
            row("2", "Step 2:", ["C", "", "", ""]),
        ]);
        assert_eq!(
            *annotated[2].cumulated(Level::Core),
            CumulatedFrom::Reused("1 - Step 2".to_string())
        );
        assert_eq!(annotated[2].status, Status::Pass);
        assert_eq!(*annotated[3].cumulated(Level::Core), CumulatedFrom::Fresh);
    }

    #[test]
    fn same_activity_reuse_omits_activity_number() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("3", "Step 1:", ["A", "", "", ""]),
            row("3", "Step 2:", ["A", "", "", ""]),
        ]);
        assert_eq!(
            *annotated[1].cumulated(Level::Core),
            CumulatedFrom::Reused("Step 1".to_string())
        );
    }

    #[test]
    fn third_occurrence_references_the_second() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("1", "Step 1:", ["A", "", "", ""]),
            row("2", "Step 1:", ["A", "", "", ""]),
            row("3", "Step 1:", ["A", "", "", ""]),
        ]);
        assert_eq!(
            *annotated[1].cumulated(Level::Core),
            CumulatedFrom::Reused("1 - Step 1".to_string())
        );
        assert_eq!(
            *annotated[2].cumulated(Level::Core),
            CumulatedFrom::Reused("2 - Step 1".to_string())
        );
    }

    #[test]
    fn levels_track_independently() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("1", "Step 1:", ["A", "A", "", ""]),
            row("2", "Step 1:", ["A", "", "A", ""]),
        ]);
        // CORE saw A before; MODERATE did not, even though CORE carried it.
        assert_eq!(
            *annotated[1].cumulated(Level::Core),
            CumulatedFrom::Reused("1 - Step 1".to_string())
        );
        assert_eq!(
            *annotated[1].cumulated(Level::ModerateMultilingual),
            CumulatedFrom::Fresh
        );
    }

    #[test]
    fn disagreeing_levels_fail_the_row() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("1", "Step 1:", ["A", "", "", ""]),
            row("1", "Step 2:", ["", "B", "", ""]),
            row("2", "Step 1:", ["A", "B", "", ""]),
        ]);
        // CORE points at 1 - Step 1, LIGHT at 1 - Step 2.
        assert_eq!(annotated[2].status, Status::Fail);
    }

    #[test]
    fn unresolvable_step_ordinal_degrades_to_marker() {
        let mut tracker = ReuseTracker::new();
        let annotated = tracker.annotate(vec![
            row("1", "", ["A", "", "", ""]),
            row("2", "Step 1:", ["A", "", "", ""]),
        ]);
        assert_eq!(
            *annotated[1].cumulated(Level::Core),
            CumulatedFrom::Reused("1 - Step ?".to_string())
        );
    }

    #[test]
    fn summaries_preserve_first_reuse_order() {
        let mut tracker = ReuseTracker::new();
        tracker.annotate(vec![
            row("1", "Step 1:", ["A", "", "", ""]),
            row("1", "Step 2:", ["B", "", "", ""]),
            row("2", "Step 1:", ["B", "", "", ""]),
            row("2", "Step 2:", ["A", "", "", ""]),
            row("3", "Step 1:", ["A", "", "", ""]),
        ]);
        let summaries = tracker.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].page_id, "B");
        assert_eq!(summaries[0].references, ["1 - Step 2"]);
        assert_eq!(summaries[1].page_id, "A");
        assert_eq!(summaries[1].references, ["1 - Step 1", "2 - Step 2"]);
    }
}
