//! IAA Core Library
//!
//! Inter-annotator agreement over crowd-sourced judgements: builds the
//! `(annotator, item, label)` reliability matrix and computes pairwise
//! proportional agreement alongside Krippendorff's alpha, for the original
//! and the cleaned variant of an experiment run.

pub mod coefficient;
pub mod domain;
pub mod fakes;
pub mod matrix;
pub mod orchestrator;
pub mod pairs;
pub mod parse;
pub mod proportional;
pub mod reporting;
pub mod source;
pub mod telemetry;

pub use domain::{
    AnnotationTriple, IaaError, JudgementRecord, Label, Result, RunConfig, Selector,
    ValidationStatus, Variant,
};

pub use coefficient::{chance_corrected_agreement, CoefficientEstimator, KrippendorffAlpha};
pub use matrix::build_matrix;
pub use orchestrator::AgreementOrchestrator;
pub use pairs::{enumerate_pairs, pair_count, SlotPair};
pub use parse::{AnswerParser, NormalizingParser, VerbatimParser};
pub use proportional::{
    proportional_agreement, proportional_agreement_detailed, AgreementBreakdown, ItemAgreement,
};
pub use reporting::{
    matrix_digest, render_variant_report, write_agreement_report_json, AgreementReportArtifact,
    VariantReport,
};
pub use source::{Cleaner, CommandCleaner, FsRecordLoader, NoopCleaner, RecordLoader};

pub use telemetry::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
