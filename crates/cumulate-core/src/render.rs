use crate::error::Result;
use crate::io;
use crate::model::{AnnotatedRow, FlatRow, Level};
use crate::tracker::ReuseSummary;
use std::borrow::Cow;
use std::path::Path;

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

/// The nine base columns, order-significant: consumers match on these names.
pub const BASE_HEADERS: [&str; 9] = [
    "JSON File name",
    "Reference ID",
    "Activity Number",
    "Activity Title",
    "Number of steps in the core",
    "Step Title",
    "Name",
    "pageReferenceId",
    "Original Page Sequence",
];

pub const SUMMARY_HEADERS: [&str; 3] = ["Modality", "pageReferenceId", "Referenced In"];

/// Flat extract: base columns plus one aligned page-id column per level.
pub fn flat_headers() -> Vec<&'static str> {
    let mut headers = BASE_HEADERS.to_vec();
    headers.extend(Level::ALL.iter().map(|l| l.page_id_column()));
    headers
}

/// Annotated report: base columns, one "Cumulated From" column per level,
/// and the overall status last.
pub fn report_headers() -> Vec<&'static str> {
    let mut headers = BASE_HEADERS.to_vec();
    headers.extend(Level::ALL.iter().map(|l| l.cumulated_column()));
    headers.push("Status");
    headers
}

fn base_fields(row: &FlatRow) -> [&str; 9] {
    [
        &row.source_file,
        &row.reference_id,
        &row.activity_no,
        &row.activity_title,
        &row.step_label,
        &row.step_title,
        &row.step_name,
        &row.page_reference_id,
        &row.original_page_sequence,
    ]
}

// ---------------------------------------------------------------------------
// CSV writing
// ---------------------------------------------------------------------------

/// RFC 4180 quoting: only fields containing a delimiter, quote, or newline
/// get wrapped, with embedded quotes doubled.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn csv_line(fields: &[&str]) -> String {
    let mut line = fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn write_csv<'a, R>(path: &Path, headers: &[&str], rows: R) -> Result<()>
where
    R: IntoIterator<Item = Vec<&'a str>>,
{
    let mut out = csv_line(headers);
    for row in rows {
        out.push_str(&csv_line(&row));
    }
    io::atomic_write(path, out.as_bytes())
}

/// Write the unsorted, unannotated flat extract.
pub fn write_flat_csv(path: &Path, rows: &[FlatRow]) -> Result<()> {
    write_csv(
        path,
        &flat_headers(),
        rows.iter().map(|row| {
            let mut fields = base_fields(row).to_vec();
            fields.extend(row.level_page_ids.iter().map(String::as_str));
            fields
        }),
    )
}

/// Write the annotated report, rows already in batch order.
pub fn write_report_csv(path: &Path, rows: &[AnnotatedRow]) -> Result<()> {
    write_csv(
        path,
        &report_headers(),
        rows.iter().map(|row| {
            let mut fields = base_fields(&row.flat).to_vec();
            fields.extend(row.cumulated_from.iter().map(|c| c.label()));
            fields.push(row.status.as_str());
            fields
        }),
    )
}

/// Write the reused-pages summary view, one row per (level, page id), with
/// all back-references joined into a single cell.
pub fn write_summary_csv(path: &Path, summaries: &[ReuseSummary]) -> Result<()> {
    let joined: Vec<(&ReuseSummary, String)> = summaries
        .iter()
        .map(|s| (s, s.references.join(", ")))
        .collect();
    write_csv(
        path,
        &SUMMARY_HEADERS,
        joined
            .iter()
            .map(|(s, refs)| vec![s.level.cumulated_column(), s.page_id.as_str(), refs.as_str()]),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
