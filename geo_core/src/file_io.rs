//! # File I/O Module
//!
//! JSON file helpers for front ends. The engine itself never touches the
//! filesystem; these functions sit at the edge:
//! - **Input loading**: soil profile + foundation as an [`AnalysisInput`]
//! - **Settings loading**: partial [`EngineSettings`] overrides, validated
//! - **Atomic report saves**: write to `.tmp`, sync, verify, rename
//!
//! ## Example
//!
//! ```rust,no_run
//! use geo_core::engine::{analyze, AnalysisReport};
//! use geo_core::file_io::{load_input, save_report};
//! use geo_core::settings::EngineSettings;
//! use std::path::Path;
//!
//! let input = load_input(Path::new("site.json"))?;
//! let output = analyze(&input, &EngineSettings::default())?;
//! save_report(&AnalysisReport::new(output, input.locale), Path::new("site.report.json"))?;
//! # Ok::<(), geo_core::errors::CalcError>(())
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::engine::{AnalysisInput, AnalysisReport};
use crate::errors::{CalcError, CalcResult};
use crate::settings::EngineSettings;

fn read_json<T: DeserializeOwned>(path: &Path) -> CalcResult<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid JSON in {}: {}", path.display(), e),
    })
}

/// Load an analysis input file.
///
/// Only the JSON shape is checked here; profile and geometry validation
/// happen in [`crate::engine::analyze`].
pub fn load_input(path: &Path) -> CalcResult<AnalysisInput> {
    let input: AnalysisInput = read_json(path)?;
    debug!(path = %path.display(), layers = input.layers.len(), "input loaded");
    Ok(input)
}

/// Load engine settings. Fields missing from the file keep their defaults.
pub fn load_settings(path: &Path) -> CalcResult<EngineSettings> {
    let settings: EngineSettings = read_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Save a report using atomic write (write to .tmp, then rename).
///
/// This prevents a truncated report if the process is interrupted during write.
pub fn save_report(report: &AnalysisReport, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| CalcError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = path.with_extension("json.tmp");

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .write_all(json.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    // Verify what landed on disk before replacing the target
    let written = fs::metadata(&tmp_path)
        .map_err(|e| CalcError::file_error("verify temp file", tmp_path.display().to_string(), e.to_string()))?;
    if written.len() != json.len() as u64 {
        let _ = fs::remove_file(&tmp_path);
        return Err(CalcError::file_error(
            "verify temp file",
            tmp_path.display().to_string(),
            format!("expected {} bytes, found {}", json.len(), written.len()),
        ));
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), bytes = json.len(), "report saved");
    Ok(())
}

/// Load a previously saved report.
pub fn load_report(path: &Path) -> CalcResult<AnalysisReport> {
    read_json(path)
}
