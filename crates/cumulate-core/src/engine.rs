use crate::error::{CumulateError, Result};
use crate::extract::{self, StepTotals};
use crate::model::{ActivityRecord, AnnotatedRow, FlatRow};
use crate::order;
use crate::tracker::{ReuseSummary, ReuseTracker};
use serde::Serialize;

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// The full outcome of one batch run: annotated rows in batch order, the
/// reused-pages summary, and the per-level step totals.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub rows: Vec<AnnotatedRow>,
    pub summaries: Vec<ReuseSummary>,
    pub step_totals: StepTotals,
}

impl BatchReport {
    pub fn reused_page_count(&self) -> usize {
        self.summaries.len()
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Flatten a batch into extraction-order rows plus step totals, without the
/// tracker pass. `NoData` when nothing was extractable.
pub fn run_flat(records: &[(String, ActivityRecord)]) -> Result<(Vec<FlatRow>, StepTotals)> {
    let (rows, totals) =
        extract::collect_batch(records.iter().map(|(name, record)| (name.as_str(), record)));
    if rows.is_empty() {
        return Err(CumulateError::NoData);
    }
    Ok((rows, totals))
}

/// Sort flattened rows into batch order and run the tracker pass over them.
pub fn annotate(mut rows: Vec<FlatRow>, step_totals: StepTotals) -> BatchReport {
    order::sort_rows(&mut rows);
    let mut tracker = ReuseTracker::new();
    let annotated = tracker.annotate(rows);
    let summaries = tracker.summaries();
    tracing::info!(
        rows = annotated.len(),
        reused_pages = summaries.len(),
        "annotated batch"
    );
    BatchReport {
        rows: annotated,
        summaries,
        step_totals,
    }
}

/// Full pipeline: extract, order, track, evaluate.
pub fn run_batch(records: &[(String, ActivityRecord)]) -> Result<BatchReport> {
    let (rows, totals) = run_flat(records)?;
    Ok(annotate(rows, totals))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
