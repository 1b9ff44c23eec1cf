//! Log file discovery and loading.
//!
//! Reads FlexLM debug logs, plain or gzip-compressed, into line vectors.
//! Files are read in parallel but always returned in the order given, since
//! the date tracking downstream depends on it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use flexlm_core::error::{FlexlmError, Result};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Extensions picked up when a directory is given as input.
const LOG_EXTENSIONS: &[&str] = &["log", "txt", "gz"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve command-line inputs into the ordered list of files to read.
///
/// Files are kept in argument order. A directory is replaced in place by the
/// log files found beneath it, sorted by path.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = find_log_files(path);
            if found.is_empty() {
                warn!("No log files found in {}", path.display());
            }
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(FlexlmError::InputNotFound(path.clone()));
        }
    }
    Ok(files)
}

/// Find all log files recursively under `dir`, sorted by path.
pub fn find_log_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_log_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Read every line of one log file, decompressing `.gz` files.
///
/// Bytes that are not valid UTF-8 are replaced rather than failing the run;
/// license logs regularly contain host names in local code pages.
pub fn read_log_lines(path: &Path) -> Result<Vec<String>> {
    let file_error = |source| FlexlmError::FileRead {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(file_error)?;
    let mut bytes = Vec::new();
    if is_gzip(path) {
        MultiGzDecoder::new(BufReader::new(file))
            .read_to_end(&mut bytes)
            .map_err(file_error)?;
    } else {
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(file_error)?;
    }

    let lines: Vec<String> = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect();
    debug!("File {}: {} lines", path.display(), lines.len());
    Ok(lines)
}

/// Read all `paths` in parallel, returning their lines in input order.
///
/// The first failure aborts the whole read.
pub fn read_all(paths: &[PathBuf]) -> Result<Vec<Vec<String>>> {
    paths.par_iter().map(|p| read_log_lines(p)).collect()
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}

fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            LOG_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
