//! gnuplot script generation and invocation.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use chrono::NaiveDateTime;
use flexlm_core::error::{FlexlmError, Result};
use tracing::{debug, info};

use crate::layout::{PlotTable, ReportLayout, SCRIPT_FILE};

/// Quote `value` as a gnuplot double-quoted string.
fn quoted(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

/// Render the plot script for `tables` (in plot order).
///
/// The first page overlays every feature; each following page shows one
/// feature on the x range of the overlay.
pub fn render_script(report_name: &str, tables: &[PlotTable], generated_at: NaiveDateTime) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Generated by flexlm-analysis v{} on {}",
        env!("CARGO_PKG_VERSION"),
        generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    out.push_str("# Gnuplot settings.\n");
    out.push_str("set key right\n");
    out.push_str("set grid\n");
    let _ = writeln!(
        out,
        "set title {} noenhanced",
        quoted(&format!("FlexLm - {}", report_name))
    );
    out.push_str("set xdata time\n");
    out.push_str("set timefmt \"%Y/%m/%d %H:%M:%S\"\n");
    out.push_str("set format x \"%Y/%m/%d %H:%M:%S\"\n");
    out.push_str("set xlabel \"Date, Time\"\n");
    out.push_str("set xtics rotate\n");
    out.push_str("set ylabel \"Number of licenses in use\"\n");
    out.push_str("set ytics 1\n");
    let _ = writeln!(out, "set output {}", quoted(&format!("{}.pdf", report_name)));
    out.push_str("set style line 1 lt 1 lw 2 pt 7 ps 0.5\n");
    out.push_str("set terminal pdf size 29.7 cm, 21.0 cm  # PDF output in A4 format\n");

    out.push_str("\n# All license features on one page.\n");
    let overlay: Vec<String> = tables
        .iter()
        .map(|t| {
            format!(
                "{} using 1:3 title {} noenhanced with lines",
                quoted(&t.file_name),
                quoted(&t.feature)
            )
        })
        .collect();
    let _ = write!(out, "plot {}", overlay.join(", \\\n"));

    out.push_str("\n# One page per license feature.");
    out.push_str("\nset xrange [GPVAL_X_MIN:GPVAL_X_MAX]");
    for t in tables {
        let _ = write!(
            out,
            "\nplot {} using 1:3 title {} noenhanced with linespoints linestyle 1",
            quoted(&t.file_name),
            quoted(&t.feature)
        );
    }
    out.push('\n');
    out
}

/// Run `bin` on the report's script and move the resulting PDF into place.
///
/// The plotter runs with the data directory as working directory. On failure
/// the script and tables are left on disk.
pub fn run_gnuplot(bin: &str, layout: &ReportLayout) -> Result<PathBuf> {
    debug!(bin, dir = %layout.data_dir().display(), "running plotter");

    let output = Command::new(bin)
        .arg(SCRIPT_FILE)
        .current_dir(layout.data_dir())
        .output()
        .map_err(|e| FlexlmError::Plotter(format!("failed to run {}: {}", bin, e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FlexlmError::Plotter(format!(
            "{} exited with {}: {}",
            bin,
            output.status,
            stderr.trim()
        )));
    }

    let plotted = layout.plotted_pdf_path();
    if !plotted.is_file() {
        return Err(FlexlmError::Plotter(format!(
            "{} did not produce {}",
            bin,
            plotted.display()
        )));
    }

    let target = layout.pdf_path();
    fs::rename(&plotted, &target).map_err(|source| FlexlmError::ReportWrite {
        path: target.clone(),
        source,
    })?;

    info!("Report written to {}", target.display());
    Ok(target)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::assign_tables;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn generated() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 7, 30)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn tables(names: &[&str]) -> Vec<PlotTable> {
        assign_tables(names.iter().copied())
    }

    // ── render_script ─────────────────────────────────────────────────────────

    #[test]
    fn test_render_script_header() {
        let script = render_script("Licenses", &tables(&["A"]), generated());
        let mut lines = script.lines();
        assert!(lines
            .next()
            .unwrap()
            .ends_with("on 2012-07-30 12:00:00"));
        assert_eq!(lines.next(), Some("# Gnuplot settings."));
        assert!(script.contains("set title \"FlexLm - Licenses\" noenhanced\n"));
        assert!(script.contains("set timefmt \"%Y/%m/%d %H:%M:%S\"\n"));
        assert!(script.contains("set ytics 1\n"));
        assert!(script.contains("set output \"Licenses.pdf\"\n"));
        assert!(script.contains("set terminal pdf size 29.7 cm, 21.0 cm"));
    }

    #[test]
    fn test_render_script_plot_sections() {
        let script = render_script("Licenses", &tables(&["A", "B"]), generated());
        let body = script
            .split("# All license features on one page.\n")
            .nth(1)
            .unwrap();
        let expected = "plot \"A.dat\" using 1:3 title \"A\" noenhanced with lines, \\\n\
                        \"B.dat\" using 1:3 title \"B\" noenhanced with lines\n\
                        # One page per license feature.\n\
                        set xrange [GPVAL_X_MIN:GPVAL_X_MAX]\n\
                        plot \"A.dat\" using 1:3 title \"A\" noenhanced with linespoints linestyle 1\n\
                        plot \"B.dat\" using 1:3 title \"B\" noenhanced with linespoints linestyle 1\n";
        assert_eq!(body, expected);
    }

    #[test]
    fn test_render_script_uses_sanitised_table_names() {
        let script = render_script("R", &tables(&["x/y"]), generated());
        assert!(script.contains("plot \"x_y.dat\" using 1:3 title \"x/y\""));
    }

    #[test]
    fn test_render_script_keeps_clashing_features_apart() {
        let script = render_script("R", &tables(&["a/b", "a_b"]), generated());
        assert!(script.contains("plot \"a_b.dat\" using 1:3 title \"a/b\" noenhanced with linespoints"));
        assert!(script.contains("plot \"a_b-2.dat\" using 1:3 title \"a_b\" noenhanced with linespoints"));
    }

    #[test]
    fn test_render_script_escapes_quotes() {
        let script = render_script("My \"Q3\"", &tables(&["A"]), generated());
        assert!(script.contains("set title \"FlexLm - My \\\"Q3\\\"\" noenhanced\n"));
    }

    // ── run_gnuplot ───────────────────────────────────────────────────────────

    #[test]
    fn test_run_gnuplot_missing_binary() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), "R");
        layout.create_dirs().unwrap();

        let err = run_gnuplot("flexlm-no-such-plotter", &layout).unwrap_err();
        assert!(matches!(err, FlexlmError::Plotter(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_gnuplot_non_zero_exit_keeps_files() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), "R");
        layout.create_dirs().unwrap();
        fs::write(layout.script_path(), "exit 3\n").unwrap();

        let err = run_gnuplot("sh", &layout).unwrap_err();
        assert!(matches!(err, FlexlmError::Plotter(ref m) if m.contains("exited")));
        assert!(layout.script_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_gnuplot_moves_pdf_into_report_dir() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), "R");
        layout.create_dirs().unwrap();
        // `sh gnuplot.script` stands in for the plotter.
        fs::write(layout.script_path(), "echo pdf > R.pdf\n").unwrap();

        let pdf = run_gnuplot("sh", &layout).unwrap();
        assert_eq!(pdf, layout.pdf_path());
        assert!(pdf.is_file());
        assert!(!layout.plotted_pdf_path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_gnuplot_without_output_is_error() {
        let dir = TempDir::new().unwrap();
        let layout = ReportLayout::new(dir.path(), "R");
        layout.create_dirs().unwrap();
        fs::write(layout.script_path(), "true\n").unwrap();

        let err = run_gnuplot("sh", &layout).unwrap_err();
        assert!(matches!(err, FlexlmError::Plotter(ref m) if m.contains("did not produce")));
    }
}
