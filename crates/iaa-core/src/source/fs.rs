//! Filesystem record loader over JSON-lines experiment files.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/<group>/run<run>/*.jsonl        raw judgements
//! <data_dir>/<group>/run<run>/clean/*.jsonl  cleaned judgements
//! ```
//!
//! Each non-blank line is one [`JudgementRecord`] object. Files are read in
//! sorted path order so record order, and with it slot assignment, is stable.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{select_records, RecordLoader};
use crate::domain::{IaaError, JudgementRecord, Result, RunConfig};

/// Directory (relative to a run directory) holding the cleaned dataset.
pub const CLEAN_DIR: &str = "clean";

/// Extension of judgement files.
pub const RECORD_EXTENSION: &str = "jsonl";

/// Loads judgement records from JSON-lines files on disk.
#[derive(Debug, Clone)]
pub struct FsRecordLoader {
    root: PathBuf,
}

impl FsRecordLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the raw judgements of a run.
    pub fn run_dir(&self, run: u32, group: &str) -> PathBuf {
        self.root.join(group).join(format!("run{}", run))
    }

    /// Directory holding the cleaned judgements of a run.
    pub fn clean_dir(&self, run: u32, group: &str) -> PathBuf {
        self.run_dir(run, group).join(CLEAN_DIR)
    }
}

#[async_trait]
impl RecordLoader for FsRecordLoader {
    async fn load(&self, selection: &RunConfig) -> Result<Vec<JudgementRecord>> {
        let dir = self.run_dir(selection.run, &selection.group);
        let records = read_record_dir(&dir).await?;
        Ok(select_records(records, selection))
    }

    async fn load_clean(&self, run: u32, group: &str) -> Result<Vec<JudgementRecord>> {
        read_record_dir(&self.clean_dir(run, group)).await
    }
}

/// Read every `*.jsonl` file directly inside `dir`, in sorted path order.
pub async fn read_record_dir(dir: &Path) -> Result<Vec<JudgementRecord>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| IaaError::upstream(dir.display().to_string(), e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| IaaError::upstream(dir.display().to_string(), e))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
            continue;
        }
        // Follows symlinks; a dangling link is an error, not a skipped file.
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| IaaError::upstream(path.display().to_string(), e))?;
        if metadata.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(IaaError::upstream(
            dir.display().to_string(),
            format!("no .{} files found", RECORD_EXTENSION),
        ));
    }

    let mut records = Vec::new();
    for file in &files {
        records.extend(read_record_file(file).await?);
    }

    tracing::debug!(
        dir = %dir.display(),
        files = files.len(),
        records = records.len(),
        "loaded judgement records"
    );
    Ok(records)
}

/// Parse one JSON-lines file. Blank lines are skipped.
pub async fn read_record_file(path: &Path) -> Result<Vec<JudgementRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| IaaError::upstream(path.display().to_string(), e))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<JudgementRecord>(line).map_err(|e| {
                IaaError::upstream(path.display().to_string(), format!("line {}: {}", idx + 1, e))
            })
        })
        .collect()
}

/// Write records as JSON lines, creating parent directories as needed.
pub async fn write_record_file(path: &Path, records: &[JudgementRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    tokio::fs::write(path, out).await?;
    Ok(())
}
