mod bootstrap;

use anyhow::{Context, Result};
use flexlm_core::formatting::{format_stats_json, format_stats_report};
use flexlm_core::settings::{OutputMode, Settings, StatsFormat};
use flexlm_data::analysis::{analyze, load_logs, Analysis};
use flexlm_report::gnuplot::run_gnuplot;
use flexlm_report::layout::ReportLayout;
use flexlm_report::report::write_report;

fn print_stats(analysis: &Analysis, format: StatsFormat) -> Result<()> {
    let stats = analysis.stats();
    match format {
        StatsFormat::Text => print!("{}", format_stats_report(&stats)),
        StatsFormat::Json => println!("{}", format_stats_json(&stats)?),
    }
    Ok(())
}

fn plot_report(analysis: &Analysis, settings: &Settings) -> Result<()> {
    let layout = ReportLayout::new(&settings.output_dir, &settings.report);
    let Some(files) = write_report(&layout, analysis)? else {
        return Ok(());
    };

    if settings.no_plot {
        tracing::info!(
            "Skipping plotter; run `{} {}` in {} to render",
            settings.gnuplot_bin,
            files.script.display(),
            layout.data_dir().display()
        );
        return Ok(());
    }

    let pdf = run_gnuplot(&settings.gnuplot_bin, &layout)
        .with_context(|| format!("rendering report {}", settings.report))?;
    tracing::info!("PDF report: {}", pdf.display());
    Ok(())
}

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("FlexLM analysis v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        files = settings.files.len(),
        mode = ?settings.output_mode(),
        "settings loaded"
    );

    let parsed = load_logs(&settings.files)?;
    if parsed.summary.unresolved_events > 0 {
        tracing::warn!(
            "{} event(s) appear before any date line; they are reported with an unknown date",
            parsed.summary.unresolved_events
        );
    }

    if parsed.summary.invalid_dates > 0 {
        tracing::warn!(
            "{} date line(s) carry an out-of-range date and were skipped",
            parsed.summary.invalid_dates
        );
    }

    let Some(analysis) = analyze(&parsed) else {
        return Ok(());
    };

    let dedup = analysis.dedup_summary();
    tracing::debug!(
        accepted = dedup.accepted,
        duplicate_checkouts = dedup.duplicate_checkouts,
        orphan_checkins = dedup.orphan_checkins,
        "events deduplicated"
    );

    match settings.output_mode() {
        OutputMode::Stats => print_stats(&analysis, settings.stats_format())?,
        OutputMode::Gnuplot => plot_report(&analysis, &settings)?,
        OutputMode::None => {
            tracing::warn!("Nothing to do: pass --stats or --gnuplot");
        }
    }

    Ok(())
}
