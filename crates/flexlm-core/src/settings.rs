use clap::Parser;
use std::path::PathBuf;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Analyse FlexLM license server logs
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flexlm-analysis",
    about = "Analyse FlexLM license server logs: usage stats or gnuplot reports",
    version
)]
pub struct Settings {
    /// Log files (plain or .gz) or directories containing them, read in order
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Print usage statistics for each license feature
    #[arg(short, long)]
    pub stats: bool,

    /// Write gnuplot data tables and script, then render a PDF report
    #[arg(short, long)]
    pub gnuplot: bool,

    /// Report name used for the plot title, PDF and report directory
    #[arg(short, long, env = "FLEXLM_REPORT", default_value = "Licenses")]
    pub report: String,

    /// Stats output format
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Directory in which `<report>_report/` is created
    #[arg(short, long, env = "FLEXLM_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Plotting binary to invoke
    #[arg(long, env = "FLEXLM_GNUPLOT", default_value = "gnuplot")]
    pub gnuplot_bin: String,

    /// Write data tables and script without running the plotter
    #[arg(long)]
    pub no_plot: bool,

    /// Logging level
    #[arg(long, env = "FLEXLM_LOG", default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// What the run should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Stats,
    Gnuplot,
    None,
}

/// Rendition of the stats report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsFormat {
    Text,
    Json,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply `--debug`.
    pub fn load() -> Self {
        Self::load_from(std::env::args_os())
    }

    /// Same as [`load`] but over an explicit argument list, for tests.
    pub fn load_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut settings = Settings::parse_from(args);
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Stats wins when both modes are requested.
    pub fn output_mode(&self) -> OutputMode {
        if self.stats {
            OutputMode::Stats
        } else if self.gnuplot {
            OutputMode::Gnuplot
        } else {
            OutputMode::None
        }
    }

    pub fn stats_format(&self) -> StatsFormat {
        match self.format.as_str() {
            "json" => StatsFormat::Json,
            _ => StatsFormat::Text,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
