use crate::output::{print_json, print_table};
use anyhow::Context;
use cumulate_core::model::Level;
use cumulate_core::{extract, intake};
use std::path::Path;

pub fn run(file: &Path, json: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let Some(record) = intake::parse_record(&raw) else {
        anyhow::bail!("unparsable payload in {}", file.display());
    };

    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let (rows, totals) = extract::extract_rows(&record, &name);

    if json {
        print_json(&serde_json::json!({
            "rows": rows,
            "step_totals": totals,
        }))?;
        return Ok(());
    }

    println!(
        "{} — {} ({})",
        record.activity_info.activity_no,
        record.activity_info.activity_title,
        record.activity_info.reference_id
    );
    let headers = ["Step", "Step Title", "CORE", "LIGHT", "MODERATE", "INTENSIVE"];
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.step_label.clone(), row.step_title.clone()];
            cells.extend(Level::ALL.iter().map(|l| row.page_id(*l).to_string()));
            cells
        })
        .collect();
    print_table(&headers, &table);
    for level in Level::ALL {
        println!("{} steps: {}", level.key(), totals.get(level));
    }
    Ok(())
}
