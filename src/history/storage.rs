use super::types::{HistoryState, HISTORY_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Get the default history file path (~/.config/atar-calc/history.json)
pub fn get_history_path() -> PathBuf {
    crate::config::get_config_dir().join("history.json")
}

/// Load calculation history from a JSON file
///
/// If the file doesn't exist, returns a new empty history.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_history(path: &Path) -> Result<HistoryState> {
    if !path.exists() {
        return Ok(HistoryState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open history file at {}", path.display()))?;

    let state: HistoryState = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to load history from {}", path.display()))?;

    if state.version != HISTORY_VERSION {
        anyhow::bail!("Unsupported history version: {}", state.version);
    }

    tracing::debug!(
        calculations = state.calculations.len(),
        path = %path.display(),
        "loaded history"
    );

    Ok(state)
}

/// Save calculation history to a JSON file atomically
///
/// The file is never left half-written. Creates the parent directory if needed.
pub fn save_history(path: &Path, state: &HistoryState) -> Result<()> {
    crate::config::ensure_parent_dir(path)?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state).context("Failed to serialize history")?;

    file.commit()
        .with_context(|| format!("Failed to save history to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "saved history");
    Ok(())
}
