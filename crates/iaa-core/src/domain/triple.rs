//! Annotation triples: the `(annotator, item, label)` matrix representation.

use serde::{Deserialize, Serialize};

/// A parsed, normalized answer. Labels are compared by value only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(String);

impl Label {
    pub fn new(value: impl Into<String>) -> Self {
        Label(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label(s)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the reliability matrix.
///
/// `annotator_slot` is local to `item_id`: slot 0 of one item and slot 0 of
/// another need not be the same person. Agreement is assessed per item, so
/// only the within-item pairing structure matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationTriple {
    pub annotator_slot: usize,
    pub item_id: String,
    pub label: Label,
}

impl AnnotationTriple {
    pub fn new(annotator_slot: usize, item_id: impl Into<String>, label: impl Into<Label>) -> Self {
        Self {
            annotator_slot,
            item_id: item_id.into(),
            label: label.into(),
        }
    }
}

impl<I: Into<String>, L: Into<Label>> From<(usize, I, L)> for AnnotationTriple {
    fn from((slot, item, label): (usize, I, L)) -> Self {
        AnnotationTriple::new(slot, item, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_equality_is_by_value() {
        let a = Label::new(String::from("yes"));
        let b = Label::from("yes");
        assert_eq!(a, b);
        assert_ne!(a, Label::from("Yes"));
    }

    #[test]
    fn test_label_serializes_as_plain_string() {
        let json = serde_json::to_string(&Label::from("x")).expect("serialize");
        assert_eq!(json, "\"x\"");
    }

    #[test]
    fn test_triple_from_tuple() {
        let t: AnnotationTriple = (1usize, "A", "x").into();
        assert_eq!(t.annotator_slot, 1);
        assert_eq!(t.item_id, "A");
        assert_eq!(t.label.as_str(), "x");
    }
}
