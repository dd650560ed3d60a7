//! Run selection: which experiment run, group, batches and questions to analyze.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::IaaError;

/// Wildcard-or-exact selector used for batches and question sets.
///
/// Written as `*` for [`Selector::All`] in configs and on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Selector {
    #[default]
    All,
    Exact(String),
}

impl Selector {
    /// Whether a record field satisfies this selector.
    ///
    /// `All` accepts anything, including a missing field. `Exact` requires the
    /// field to be present and equal.
    pub fn matches(&self, value: Option<&str>) -> bool {
        match self {
            Selector::All => true,
            Selector::Exact(expected) => value == Some(expected.as_str()),
        }
    }
}

impl FromStr for Selector {
    type Err = IaaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "" => Err(IaaError::Config("selector must not be empty".to_string())),
            "*" => Ok(Selector::All),
            other => Ok(Selector::Exact(other.to_string())),
        }
    }
}

impl TryFrom<String> for Selector {
    type Error = IaaError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Selector> for String {
    fn from(selector: Selector) -> Self {
        selector.to_string()
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::All => write!(f, "*"),
            Selector::Exact(v) => write!(f, "{}", v),
        }
    }
}

/// Dataset variant under analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Raw collected responses.
    Original,
    /// Responses after contradictory answers were removed.
    Clean,
}

impl Variant {
    /// Default reporting order.
    pub const ALL: [Variant; 2] = [Variant::Original, Variant::Clean];

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Original => "original",
            Variant::Clean => "clean",
        }
    }
}

impl FromStr for Variant {
    type Err = IaaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(Variant::Original),
            "clean" => Ok(Variant::Clean),
            other => Err(IaaError::Config(format!(
                "unknown variant '{}': expected 'original' or 'clean'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit selection of the data an agreement report covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Experiment run number.
    pub run: u32,

    /// Experiment group name (e.g. `experiment1`).
    pub group: String,

    /// Batch selector.
    #[serde(default)]
    pub batch: Selector,

    /// Question-set selector.
    #[serde(default)]
    pub questions: Selector,

    /// Drop judgements whose validation status is not `valid`.
    #[serde(default = "default_remove_not_val")]
    pub remove_not_val: bool,
}

fn default_remove_not_val() -> bool {
    true
}

impl RunConfig {
    /// Select every batch and question of one run.
    pub fn new(run: u32, group: impl Into<String>) -> Self {
        Self {
            run,
            group: group.into(),
            batch: Selector::All,
            questions: Selector::All,
            remove_not_val: true,
        }
    }

    pub fn with_batch(mut self, batch: Selector) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_questions(mut self, questions: Selector) -> Self {
        self.questions = questions;
        self
    }

    pub fn with_remove_not_val(mut self, remove_not_val: bool) -> Self {
        self.remove_not_val = remove_not_val;
        self
    }

    /// Reject configurations no loader could satisfy.
    pub fn validate(&self) -> Result<(), IaaError> {
        if self.group.trim().is_empty() {
            return Err(IaaError::Config("group must not be empty".to_string()));
        }
        if self.group.contains(['/', '\\']) || self.group == ".." {
            return Err(IaaError::Config(format!(
                "group '{}' must be a plain name",
                self.group
            )));
        }
        Ok(())
    }
}
