use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::domain::{AnnotationTriple, RunConfig, Variant};

/// Schema version of the JSON agreement report.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Agreement results for one (run, group, variant).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantReport {
    pub run: u32,
    pub group: String,
    pub variant: Variant,
    /// Display name of the coefficient estimator.
    pub coefficient_name: String,
    pub coefficient: f64,
    pub proportional_agreement: f64,
    pub items: usize,
    /// Items with fewer than two annotators.
    pub degenerate_items: usize,
    pub triples: usize,
    /// SHA-256 over the canonical triple serialization.
    pub matrix_digest: String,
}

/// Canonical JSON artifact covering every variant of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgreementReportArtifact {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub selection: RunConfig,
    pub results: Vec<VariantReport>,
}

impl AgreementReportArtifact {
    pub fn new(selection: RunConfig, results: Vec<VariantReport>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            selection,
            results,
        }
    }
}

/// Digest of a matrix, independent of item order.
///
/// Triples are sorted by (item, slot) and hashed as
/// `slot \0 item \0 label \n`, so two reports with the same digest measured
/// the same judgements.
pub fn matrix_digest(matrix: &[AnnotationTriple]) -> String {
    let mut rows: Vec<&AnnotationTriple> = matrix.iter().collect();
    rows.sort_by(|a, b| {
        a.item_id
            .cmp(&b.item_id)
            .then(a.annotator_slot.cmp(&b.annotator_slot))
    });

    let mut hasher = Sha256::new();
    for row in rows {
        hasher.update(row.annotator_slot.to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(row.item_id.as_bytes());
        hasher.update(b"\0");
        hasher.update(row.label.as_str().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

/// Render the console report for one variant.
pub fn render_variant_report(report: &VariantReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Analyzing run {} of experiment group {} ({}):\n",
        report.run, report.group, report.variant
    ));
    out.push_str(&format!(
        "{}: {}\n",
        report.coefficient_name, report.coefficient
    ));
    out.push_str(&format!(
        "Proportional agreement (pairwise): {}\n",
        report.proportional_agreement
    ));
    out
}

/// Write the agreement report artifact as pretty JSON.
pub fn write_agreement_report_json(path: &Path, artifact: &AgreementReportArtifact) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {:?}", parent))?;
    }
    let content = serde_json::to_string_pretty(artifact).context("serialize agreement report")?;
    std::fs::write(path, content).with_context(|| format!("write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn sample_report(variant: Variant) -> VariantReport {
        VariantReport {
            run: 3,
            group: "experiment1".to_string(),
            variant,
            coefficient_name: "Krippendorff's alpha".to_string(),
            coefficient: 0.25,
            proportional_agreement: 0.5,
            items: 2,
            degenerate_items: 0,
            triples: 4,
            matrix_digest: "abc".to_string(),
        }
    }

    #[test]
    fn render_has_header_and_two_value_lines() {
        let text = render_variant_report(&sample_report(Variant::Clean));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Analyzing run 3 of experiment group experiment1 (clean):",
                "Krippendorff's alpha: 0.25",
                "Proportional agreement (pairwise): 0.5",
            ]
        );
    }

    #[test]
    fn digest_ignores_item_order() {
        let a = vec![
            AnnotationTriple::new(0, "A", "x"),
            AnnotationTriple::new(1, "A", "y"),
            AnnotationTriple::new(0, "B", "x"),
        ];
        let b = vec![a[2].clone(), a[0].clone(), a[1].clone()];
        assert_eq!(matrix_digest(&a), matrix_digest(&b));
        assert_eq!(matrix_digest(&a).len(), 64);
    }

    #[test]
    fn digest_changes_with_labels() {
        let a = vec![AnnotationTriple::new(0, "A", "x")];
        let b = vec![AnnotationTriple::new(0, "A", "y")];
        assert_ne!(matrix_digest(&a), matrix_digest(&b));
    }

    #[test]
    fn artifact_schema_has_expected_keys() {
        let artifact = AgreementReportArtifact::new(
            RunConfig::new(3, "experiment1"),
            vec![sample_report(Variant::Original)],
        );
        let v: Value = serde_json::to_value(&artifact).expect("to_value");
        let obj = v.as_object().expect("top-level object");
        for key in &["schema_version", "generated_at", "selection", "results"] {
            assert!(obj.contains_key(*key), "missing key: {}", key);
        }
        assert_eq!(v["selection"]["batch"], "*");
        assert_eq!(v["results"][0]["variant"], "original");
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("reports/run3.json");
        let artifact = AgreementReportArtifact::new(RunConfig::new(3, "experiment1"), vec![]);
        write_agreement_report_json(&path, &artifact).expect("write");

        let content = std::fs::read_to_string(&path).expect("read back");
        let back: AgreementReportArtifact = serde_json::from_str(&content).expect("parse");
        assert_eq!(back.selection, artifact.selection);
    }
}
