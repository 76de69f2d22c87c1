use crate::output::print_json;
use anyhow::Context;
use cumulate_core::config::Config;
use cumulate_core::model::{Level, Status};
use cumulate_core::{engine, intake, io, render};
use std::path::Path;

pub fn run(
    input_dir: &Path,
    out_dir: &Path,
    flat_only: bool,
    config_path: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load(config_path).context("failed to load config")?;
    let records = intake::load_directory(input_dir, &config.input_extension)
        .context("failed to read input directory")?;

    let (rows, totals) = engine::run_flat(&records).context("failed to process batch")?;
    io::ensure_dir(out_dir).context("failed to create output directory")?;
    let flat_path = out_dir.join(&config.flat_file);
    render::write_flat_csv(&flat_path, &rows).context("failed to write flat extract")?;

    if flat_only {
        if json {
            print_json(&serde_json::json!({
                "files": records.len(),
                "rows": rows.len(),
                "step_totals": totals,
                "flat_file": flat_path,
            }))?;
        } else {
            println!(
                "Processed {} file(s); wrote {} row(s) to {}",
                records.len(),
                rows.len(),
                flat_path.display()
            );
        }
        return Ok(());
    }

    let report = engine::annotate(rows, totals);
    let report_path = out_dir.join(&config.report_file);
    let summary_path = out_dir.join(&config.summary_file);
    render::write_report_csv(&report_path, &report.rows).context("failed to write report")?;
    render::write_summary_csv(&summary_path, &report.summaries)
        .context("failed to write reuse summary")?;

    let failed = report
        .rows
        .iter()
        .filter(|r| r.status == Status::Fail)
        .count();

    if json {
        print_json(&serde_json::json!({
            "files": records.len(),
            "rows": report.rows.len(),
            "failed_rows": failed,
            "reused_pages": report.reused_page_count(),
            "step_totals": report.step_totals,
            "flat_file": flat_path,
            "report_file": report_path,
            "summary_file": summary_path,
        }))?;
    } else {
        println!(
            "Processed {} file(s) into {} row(s), {} reused page(s), {} failed row(s)",
            records.len(),
            report.rows.len(),
            report.reused_page_count(),
            failed
        );
        for level in Level::ALL {
            println!("  {} steps: {}", level.key(), report.step_totals.get(level));
        }
        println!("Report written to {}", report_path.display());
        println!("Reuse summary written to {}", summary_path.display());
    }
    Ok(())
}
