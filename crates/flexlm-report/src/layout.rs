//! On-disk layout of a plot report.
//!
//! ```text
//! <output_dir>/
//! └── <name>_report/
//!     ├── <name>.pdf
//!     └── data/
//!         ├── gnuplot.script
//!         └── <feature>.dat   (one per feature, names made unique)
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use flexlm_core::error::{FlexlmError, Result};

/// File name of the generated plot script inside the data directory.
pub const SCRIPT_FILE: &str = "gnuplot.script";

/// Extension of the per-feature data tables.
pub const TABLE_EXTENSION: &str = "dat";

/// Paths making up one named report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    name: String,
    report_dir: PathBuf,
    data_dir: PathBuf,
}

impl ReportLayout {
    pub fn new(output_dir: impl AsRef<Path>, name: &str) -> Self {
        let report_dir = output_dir.as_ref().join(format!("{}_report", name));
        let data_dir = report_dir.join("data");
        Self {
            name: name.to_string(),
            report_dir,
            data_dir,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn script_path(&self) -> PathBuf {
        self.data_dir.join(SCRIPT_FILE)
    }

    /// Bare PDF file name, as named in the script's `set output`.
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.name)
    }

    /// Where the plotter writes the PDF (it runs inside `data/`).
    pub fn plotted_pdf_path(&self) -> PathBuf {
        self.data_dir.join(self.pdf_file_name())
    }

    /// Final location of the PDF.
    pub fn pdf_path(&self) -> PathBuf {
        self.report_dir.join(self.pdf_file_name())
    }

    pub fn table_path(&self, table: &PlotTable) -> PathBuf {
        self.data_dir.join(&table.file_name)
    }

    /// Create the report and data directories if missing.
    pub fn create_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).map_err(|source| FlexlmError::ReportWrite {
            path: self.data_dir.clone(),
            source,
        })
    }
}

/// A feature paired with the data table it is written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotTable {
    pub feature: String,
    pub file_name: String,
}

/// File stem for `feature`.
///
/// Path separators are replaced by `_` so that every table lands directly in
/// the data directory.
pub fn table_stem(feature: &str) -> String {
    feature
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect()
}

/// Assign one distinct table file per feature, in the order given.
///
/// Features whose stems clash (`a/b` and `a_b`, or names differing only in
/// case) get a `-2`, `-3`, … suffix in order of appearance.
pub fn assign_tables<'a>(features: impl IntoIterator<Item = &'a str>) -> Vec<PlotTable> {
    let mut taken: HashSet<String> = HashSet::new();
    features
        .into_iter()
        .map(|feature| {
            let base = table_stem(feature);
            let mut stem = base.clone();
            let mut n = 1;
            while !taken.insert(stem.to_lowercase()) {
                n += 1;
                stem = format!("{}-{}", base, n);
            }
            PlotTable {
                feature: feature.to_string(),
                file_name: format!("{}.{}", stem, TABLE_EXTENSION),
            }
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
