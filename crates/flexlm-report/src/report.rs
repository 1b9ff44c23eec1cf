//! Writing the plot report's data tables and script.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use flexlm_core::error::{FlexlmError, Result};
use flexlm_core::formatting::format_data_table;
use flexlm_core::models::FeatureSeries;
use flexlm_data::analysis::Analysis;
use tracing::{debug, info, warn};

use crate::gnuplot::render_script;
use crate::layout::{assign_tables, ReportLayout};

/// Files written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFiles {
    pub script: PathBuf,
    /// One table per feature, in plot order.
    pub tables: Vec<PathBuf>,
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| FlexlmError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Writer for the data directory of a gnuplot report.
pub struct GnuplotReport;

impl GnuplotReport {
    /// Create the report directories and write one table per series plus
    /// the plot script. Existing files are overwritten.
    ///
    /// Every series gets its own table even when feature names sanitise to
    /// the same file name; the script refers to the tables actually written.
    pub fn write(layout: &ReportLayout, series: &[FeatureSeries]) -> Result<ReportFiles> {
        layout.create_dirs()?;

        let plot_tables = assign_tables(series.iter().map(|s| s.feature.as_str()));
        let mut tables = Vec::with_capacity(series.len());
        for (s, table) in series.iter().zip(&plot_tables) {
            let path = layout.table_path(table);
            write_file(&path, &format_data_table(s))?;
            debug!(
                feature = %s.feature,
                file = %table.file_name,
                rows = s.entries.len(),
                "data table written"
            );
            tables.push(path);
        }

        let script = layout.script_path();
        write_file(
            &script,
            &render_script(layout.name(), &plot_tables, Local::now().naive_local()),
        )?;

        info!(
            "Wrote {} data table(s) and {} to {}",
            tables.len(),
            script.display(),
            layout.data_dir().display()
        );
        Ok(ReportFiles { script, tables })
    }
}

/// Write the report for `analysis`, or nothing when no day was seen.
pub fn write_report(layout: &ReportLayout, analysis: &Analysis) -> Result<Option<ReportFiles>> {
    if !analysis.has_active_days() {
        warn!("No TIMESTAMP day found in the logs; plot report skipped");
        return Ok(None);
    }
    GnuplotReport::write(layout, &analysis.time_series()).map(Some)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
