//! Domain models for agreement analysis.
//!
//! Canonical definitions for the core entities:
//! - `JudgementRecord`: one annotator's raw answer to one item
//! - `AnnotationTriple`: one `(annotator_slot, item, label)` matrix row
//! - `RunConfig`: which run, group, batches and questions to analyze
//! - `Variant`: original or cleaned dataset

pub mod error;
pub mod record;
pub mod run;
pub mod triple;

pub use error::{IaaError, Result};
pub use record::{JudgementRecord, ValidationStatus};
pub use run::{RunConfig, Selector, Variant};
pub use triple::{AnnotationTriple, Label};
