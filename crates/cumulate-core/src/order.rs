use crate::model::FlatRow;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

static ACTIVITY_NUMBER_RE: OnceLock<Regex> = OnceLock::new();

fn activity_number_re() -> &'static Regex {
    ACTIVITY_NUMBER_RE.get_or_init(|| Regex::new(r"(\d+\.?\d*)").unwrap())
}

/// First numeric token (integer or decimal) found anywhere in the
/// activity-number text. `None` when the text carries no digits.
pub fn activity_sort_key(activity_no: &str) -> Option<f64> {
    activity_number_re()
        .find(activity_no)
        .and_then(|m| m.as_str().parse().ok())
}

/// Stable total order over the batch: numeric activity keys ascending,
/// keyless rows after all keyed rows. Ties (including all keyless rows)
/// keep their extraction order, which already reflects step ordinals.
pub fn sort_rows(rows: &mut Vec<FlatRow>) {
    // Decorate-sort against precomputed keys so the regex runs once per row
    // and no row is cloned.
    let mut keyed: Vec<(Option<f64>, FlatRow)> = rows
        .drain(..)
        .map(|row| (activity_sort_key(&row.activity_no), row))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(*a, *b));
    rows.extend(keyed.into_iter().map(|(_, row)| row));
}

fn compare_keys(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Parse the ordinal back out of a `"Step {n}:"` label. Absent or mangled
/// labels are `None`, never a silent zero.
pub fn step_number(step_label: &str) -> Option<u32> {
    step_label
        .split_whitespace()
        .nth(1)?
        .trim_end_matches(':')
        .parse()
        .ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
