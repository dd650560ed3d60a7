//! Record sources and the cleaning step.
//!
//! These traits are the seams to the data-collection side of an experiment:
//! - `RecordLoader`: loads raw and cleaned judgement records
//! - `Cleaner`: produces the cleaned dataset that `load_clean` reads
//!
//! Both are async and backend-agnostic. In-memory fakes are provided in
//! [`crate::fakes`] for testing.

pub mod clean;
pub mod fs;

use async_trait::async_trait;

use crate::domain::{JudgementRecord, Result, RunConfig};

pub use clean::{CommandCleaner, NoopCleaner};
pub use fs::FsRecordLoader;

/// Loads judgement records for one experiment run.
#[async_trait]
pub trait RecordLoader: Send + Sync {
    /// Load the original records selected by `selection`.
    ///
    /// When `selection.remove_not_val` is set, records whose validation status
    /// is not `valid` are excluded.
    async fn load(&self, selection: &RunConfig) -> Result<Vec<JudgementRecord>>;

    /// Load the cleaned dataset of a run, as last written by a [`Cleaner`].
    async fn load_clean(&self, run: u32, group: &str) -> Result<Vec<JudgementRecord>>;
}

/// Produces the cleaned dataset for a run as a side effect.
///
/// Must complete before [`RecordLoader::load_clean`] is called for the same run.
#[async_trait]
pub trait Cleaner: Send + Sync {
    async fn clean(&self, selection: &RunConfig) -> Result<()>;
}

/// Apply the selection filters shared by every loader.
pub fn select_records(records: Vec<JudgementRecord>, selection: &RunConfig) -> Vec<JudgementRecord> {
    let before = records.len();
    let kept: Vec<JudgementRecord> = records
        .into_iter()
        .filter(|r| selection.batch.matches(r.batch.as_deref()))
        .filter(|r| selection.questions.matches(r.question_set.as_deref()))
        .filter(|r| !selection.remove_not_val || r.is_validated())
        .collect();

    tracing::debug!(
        run = selection.run,
        group = %selection.group,
        before,
        after = kept.len(),
        "applied record selection"
    );
    kept
}
