//! In-memory fakes for the record source traits (testing only)
//!
//! Provides `MemoryRecordLoader` and `RecordingCleaner` that satisfy the
//! trait contracts without touching the filesystem. A loader and the cleaner
//! obtained from it share state, so `load_clean` fails until `clean` has run.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{IaaError, JudgementRecord, Result, RunConfig};
use crate::source::{select_records, Cleaner, RecordLoader};

// ---------------------------------------------------------------------------
// MemoryRecordLoader
// ---------------------------------------------------------------------------

/// In-memory loader holding one original and one cleaned dataset.
#[derive(Debug, Default)]
pub struct MemoryRecordLoader {
    original: Vec<JudgementRecord>,
    clean: Vec<JudgementRecord>,
    cleaned: Arc<AtomicBool>,
    original_error: Option<String>,
    clean_error: Option<String>,
}

impl MemoryRecordLoader {
    pub fn new(original: Vec<JudgementRecord>, clean: Vec<JudgementRecord>) -> Self {
        Self {
            original,
            clean,
            ..Self::default()
        }
    }

    /// Make `load` fail with an upstream error.
    pub fn with_original_error(mut self, message: impl Into<String>) -> Self {
        self.original_error = Some(message.into());
        self
    }

    /// Make `load_clean` fail with an upstream error.
    pub fn with_clean_error(mut self, message: impl Into<String>) -> Self {
        self.clean_error = Some(message.into());
        self
    }

    /// A cleaner whose successful runs unlock `load_clean` on this loader.
    pub fn cleaner(&self) -> RecordingCleaner {
        RecordingCleaner {
            cleaned: Arc::clone(&self.cleaned),
            calls: Arc::new(AtomicUsize::new(0)),
            error: None,
        }
    }
}

#[async_trait]
impl RecordLoader for MemoryRecordLoader {
    async fn load(&self, selection: &RunConfig) -> Result<Vec<JudgementRecord>> {
        if let Some(message) = &self.original_error {
            return Err(IaaError::upstream("memory:original", message));
        }
        Ok(select_records(self.original.clone(), selection))
    }

    async fn load_clean(&self, _run: u32, _group: &str) -> Result<Vec<JudgementRecord>> {
        if let Some(message) = &self.clean_error {
            return Err(IaaError::upstream("memory:clean", message));
        }
        if !self.cleaned.load(Ordering::SeqCst) {
            return Err(IaaError::upstream(
                "memory:clean",
                "clean dataset has not been produced",
            ));
        }
        Ok(self.clean.clone())
    }
}

// ---------------------------------------------------------------------------
// RecordingCleaner
// ---------------------------------------------------------------------------

/// Cleaner that records how often it ran.
#[derive(Debug, Clone)]
pub struct RecordingCleaner {
    cleaned: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    error: Option<String>,
}

impl RecordingCleaner {
    /// Make every `clean` call fail.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Cleaner for RecordingCleaner {
    async fn clean(&self, _selection: &RunConfig) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.error {
            return Err(IaaError::Clean(message.clone()));
        }
        self.cleaned.store(true, Ordering::SeqCst);
        Ok(())
    }
}
