//! Chance-corrected agreement coefficients.
//!
//! The orchestrator only sees [`CoefficientEstimator`]; [`KrippendorffAlpha`]
//! is the default estimator and consumes the same triples as the
//! proportional statistic.

use std::collections::{HashMap, HashSet};

use crate::domain::{AnnotationTriple, IaaError, Label, Result};
use crate::proportional::labels_by_item;

/// A reliability coefficient computed over `(annotator, item, label)` triples.
pub trait CoefficientEstimator: Send + Sync {
    /// Short name used in reports (e.g. "Krippendorff's alpha").
    fn name(&self) -> &str;

    fn estimate(&self, matrix: &[AnnotationTriple]) -> Result<f64>;
}

/// Krippendorff's alpha with the nominal distance metric.
///
/// `alpha = 1 - D_o / D_e`, where observed disagreement `D_o` is taken within
/// items and expected disagreement `D_e` over all pairable values. Items with
/// a single value are unpairable and ignored, as the coefficient prescribes.
///
/// Degenerate inputs:
/// - no items: [`IaaError::EmptyInput`]
/// - a single distinct label overall: `1.0`
/// - no item with two or more values, or no variation among pairable values:
///   [`IaaError::InsufficientData`]
#[derive(Debug, Clone, Copy, Default)]
pub struct KrippendorffAlpha;

impl CoefficientEstimator for KrippendorffAlpha {
    fn name(&self) -> &str {
        "Krippendorff's alpha"
    }

    fn estimate(&self, matrix: &[AnnotationTriple]) -> Result<f64> {
        let grouped = labels_by_item(matrix);
        if grouped.is_empty() {
            return Err(IaaError::EmptyInput);
        }

        let distinct: HashSet<&Label> = matrix.iter().map(|t| &t.label).collect();
        if distinct.len() == 1 {
            tracing::debug!("only one label present, alpha is 1");
            return Ok(1.0);
        }

        let mut totals: HashMap<&Label, f64> = HashMap::new();
        let mut pairable_values = 0.0_f64;
        let mut observed = 0.0_f64;

        for (_, labels) in grouped.iter().filter(|(_, labels)| labels.len() >= 2) {
            let m_u = labels.len() as f64;
            let counts = label_counts(labels);
            let same: f64 = counts.values().map(|n| n * n).sum();
            observed += (m_u * m_u - same) / (m_u - 1.0);

            for (label, n) in counts {
                *totals.entry(label).or_insert(0.0) += n;
            }
            pairable_values += m_u;
        }

        if pairable_values == 0.0 {
            return Err(IaaError::InsufficientData(
                "alpha needs at least one item with two or more annotations".to_string(),
            ));
        }

        let n = pairable_values;
        let same_total: f64 = totals.values().map(|c| c * c).sum();
        let expected = (n * n - same_total) / (n * (n - 1.0));
        if expected == 0.0 {
            return Err(IaaError::InsufficientData(
                "alpha is undefined when pairable values show no variation".to_string(),
            ));
        }

        let observed = observed / n;
        Ok(1.0 - observed / expected)
    }
}

fn label_counts<'a>(labels: &[&'a Label]) -> HashMap<&'a Label, f64> {
    let mut counts = HashMap::new();
    for label in labels {
        *counts.entry(*label).or_insert(0.0) += 1.0;
    }
    counts
}

/// Krippendorff's alpha for the matrix.
pub fn chance_corrected_agreement(matrix: &[AnnotationTriple]) -> Result<f64> {
    KrippendorffAlpha.estimate(matrix)
}
