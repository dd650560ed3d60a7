//! Judgement records as produced by the record loaders.

use serde::{Deserialize, Serialize};

/// Validation outcome attached to a judgement by the upstream collection step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// Passed validation checks.
    Valid,

    /// Failed validation checks.
    NotValid,

    /// Never went through validation.
    Unvalidated,
}

impl ValidationStatus {
    pub fn is_valid(self) -> bool {
        matches!(self, ValidationStatus::Valid)
    }
}

/// One annotator's judgement of one item.
///
/// Only `quid` and `answer` are interpreted by the agreement engine. The
/// remaining fields are consulted by loaders for selection and filtering;
/// anything else in the source row is kept in `extra` untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JudgementRecord {
    /// Identifier of the judged item.
    pub quid: String,

    /// Raw answer text, before parsing into a label.
    pub answer: String,

    /// Upstream worker identifier, if the collection platform exposed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<String>,

    /// Experiment batch the judgement was collected in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,

    /// Question set (the `n_q` selector) the item belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_set: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationStatus>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl JudgementRecord {
    /// Create a record with only the fields the agreement engine reads.
    pub fn new(quid: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            quid: quid.into(),
            answer: answer.into(),
            worker: None,
            batch: None,
            question_set: None,
            validation: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_batch(mut self, batch: impl Into<String>) -> Self {
        self.batch = Some(batch.into());
        self
    }

    pub fn with_question_set(mut self, question_set: impl Into<String>) -> Self {
        self.question_set = Some(question_set.into());
        self
    }

    pub fn with_validation(mut self, status: ValidationStatus) -> Self {
        self.validation = Some(status);
        self
    }

    /// Whether this record survives `remove_not_val` filtering.
    ///
    /// Only an explicit non-valid status excludes a record; rows from sources
    /// that never carry a status are kept.
    pub fn is_validated(&self) -> bool {
        self.validation.map(ValidationStatus::is_valid).unwrap_or(true)
    }
}
