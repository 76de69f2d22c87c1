use crate::error::{CumulateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Run configuration: which source files to consider and what the rendered
/// output files are called. Loaded from an optional YAML file; every field
/// has a default so a partial file is fine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extension of source files inside the input directory.
    #[serde(default = "default_input_extension")]
    pub input_extension: String,
    /// Unsorted, unannotated flat extract.
    #[serde(default = "default_flat_file")]
    pub flat_file: String,
    /// Sorted, annotated report with per-level back-references and status.
    #[serde(default = "default_report_file")]
    pub report_file: String,
    /// Reused-pages summary view.
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
}

fn default_input_extension() -> String {
    "json".to_string()
}

fn default_flat_file() -> String {
    "cumulative_output.csv".to_string()
}

fn default_report_file() -> String {
    "cumulated_data.csv".to_string()
}

fn default_summary_file() -> String {
    "reused_pages_summary.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_extension: default_input_extension(),
            flat_file: default_flat_file(),
            report_file: default_report_file(),
            summary_file: default_summary_file(),
        }
    }
}

impl Config {
    /// Load from `path`, or defaults when no path is given. A named path
    /// that does not exist is an error rather than a silent fallback.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(CumulateError::ConfigNotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
