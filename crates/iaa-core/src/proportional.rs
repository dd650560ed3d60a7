//! Pairwise proportional agreement.
//!
//! For each item, the fraction of annotator pairs that gave the same label;
//! the overall statistic is the plain mean of those per-item fractions.
//!
//! # Single-annotator items
//!
//! An item judged by fewer than two annotators has no pairs. It scores **0**
//! and still counts in the denominator of the mean, so such items pull the
//! overall value down instead of being skipped. Validation filtering that
//! leaves items under-annotated therefore lowers this statistic even when
//! every remaining pair agrees. Krippendorff's alpha, by contrast, ignores
//! unpairable items.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{AnnotationTriple, IaaError, Label, Result};
use crate::pairs::enumerate_pairs;

/// Agreement detail for one item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemAgreement {
    pub item_id: String,
    /// Number of judgements (annotator slots) for the item.
    pub annotators: usize,
    /// Number of unordered annotator pairs.
    pub pairs: usize,
    /// Pairs whose labels are equal.
    pub agreements: usize,
    /// `agreements / pairs`, or 0 when the item has no pairs.
    pub score: f64,
}

impl ItemAgreement {
    /// Whether the item had too few annotators to form a pair.
    pub fn is_degenerate(&self) -> bool {
        self.pairs == 0
    }
}

/// Proportional agreement with its per-item breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgreementBreakdown {
    /// Per-item results in first-seen item order.
    pub items: Vec<ItemAgreement>,
    /// Mean of per-item scores.
    pub overall: f64,
}

impl AgreementBreakdown {
    /// Items with fewer than two annotators (each contributed a score of 0).
    pub fn degenerate_items(&self) -> usize {
        self.items.iter().filter(|i| i.is_degenerate()).count()
    }
}

/// Group labels by item, in first-seen item order and slot order within an item.
pub(crate) fn labels_by_item(matrix: &[AnnotationTriple]) -> Vec<(&str, Vec<&Label>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut grouped: Vec<(&str, Vec<(usize, &Label)>)> = Vec::new();

    for triple in matrix {
        let pos = *index.entry(triple.item_id.as_str()).or_insert_with(|| {
            grouped.push((triple.item_id.as_str(), Vec::new()));
            grouped.len() - 1
        });
        grouped[pos].1.push((triple.annotator_slot, &triple.label));
    }

    grouped
        .into_iter()
        .map(|(item, mut slots)| {
            slots.sort_by_key(|(slot, _)| *slot);
            (item, slots.into_iter().map(|(_, label)| label).collect())
        })
        .collect()
}

fn score_item(item_id: &str, labels: &[&Label]) -> ItemAgreement {
    let pairs = enumerate_pairs(labels.len());
    let agreements = pairs
        .iter()
        .filter(|&&(i, j)| labels[i] == labels[j])
        .count();

    let score = if pairs.is_empty() {
        0.0
    } else {
        agreements as f64 / pairs.len() as f64
    };

    ItemAgreement {
        item_id: item_id.to_string(),
        annotators: labels.len(),
        pairs: pairs.len(),
        agreements,
        score,
    }
}

/// Proportional agreement with the per-item breakdown.
///
/// Returns [`IaaError::EmptyInput`] when the matrix has no items. Logs a
/// warning when some items had fewer than two annotators.
pub fn proportional_agreement_detailed(matrix: &[AnnotationTriple]) -> Result<AgreementBreakdown> {
    let grouped = labels_by_item(matrix);
    if grouped.is_empty() {
        return Err(IaaError::EmptyInput);
    }

    let items: Vec<ItemAgreement> = grouped
        .iter()
        .map(|(item, labels)| score_item(item, labels))
        .collect();

    let overall = items.iter().map(|i| i.score).sum::<f64>() / items.len() as f64;
    let breakdown = AgreementBreakdown { items, overall };

    let degenerate = breakdown.degenerate_items();
    if degenerate > 0 {
        tracing::warn!(
            degenerate_items = degenerate,
            total_items = breakdown.items.len(),
            "items with fewer than two annotators score 0 in proportional agreement"
        );
    }
    Ok(breakdown)
}

/// Mean, over items, of the fraction of annotator pairs that agree.
///
/// The result is in `[0, 1]`. See the module docs for how single-annotator
/// items are scored.
pub fn proportional_agreement(matrix: &[AnnotationTriple]) -> Result<f64> {
    proportional_agreement_detailed(matrix).map(|b| b.overall)
}
