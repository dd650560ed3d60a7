//! Run orchestration: load a dataset variant, build the matrix, compute both
//! statistics and report them.

use std::io::Write;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::coefficient::{CoefficientEstimator, KrippendorffAlpha};
use crate::domain::{JudgementRecord, Result, RunConfig, Variant};
use crate::matrix::build_matrix;
use crate::parse::AnswerParser;
use crate::proportional::proportional_agreement_detailed;
use crate::reporting::{matrix_digest, render_variant_report, VariantReport};
use crate::source::{Cleaner, RecordLoader};

/// Drives one agreement analysis over its collaborators.
///
/// Holds no mutable state: every call loads its own records and rebuilds its
/// own matrix.
#[derive(Clone)]
pub struct AgreementOrchestrator {
    loader: Arc<dyn RecordLoader>,
    cleaner: Arc<dyn Cleaner>,
    parser: Arc<dyn AnswerParser>,
    estimator: Arc<dyn CoefficientEstimator>,
}

impl AgreementOrchestrator {
    /// Create an orchestrator using Krippendorff's alpha as the coefficient.
    pub fn new(
        loader: Arc<dyn RecordLoader>,
        cleaner: Arc<dyn Cleaner>,
        parser: Arc<dyn AnswerParser>,
    ) -> Self {
        Self {
            loader,
            cleaner,
            parser,
            estimator: Arc::new(KrippendorffAlpha),
        }
    }

    /// Override the coefficient estimator.
    pub fn with_estimator(mut self, estimator: Arc<dyn CoefficientEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Obtain the judgement records for one variant.
    ///
    /// For [`Variant::Clean`] the cleaning step runs first; its failure aborts
    /// before anything is loaded.
    pub async fn load_variant(
        &self,
        selection: &RunConfig,
        variant: Variant,
    ) -> Result<Vec<JudgementRecord>> {
        match variant {
            Variant::Original => self.loader.load(selection).await,
            Variant::Clean => {
                self.cleaner.clean(selection).await?;
                self.loader
                    .load_clean(selection.run, &selection.group)
                    .await
            }
        }
    }

    /// Compute the agreement report for one variant.
    #[instrument(skip(self, selection, variant), fields(run = selection.run, group = %selection.group, variant = %variant))]
    pub async fn report(&self, selection: &RunConfig, variant: Variant) -> Result<VariantReport> {
        selection.validate()?;

        let records = self.load_variant(selection, variant).await?;
        let matrix = build_matrix(&records, self.parser.as_ref())?;

        let breakdown = proportional_agreement_detailed(&matrix)?;
        let coefficient = self.estimator.estimate(&matrix)?;

        let report = VariantReport {
            run: selection.run,
            group: selection.group.clone(),
            variant,
            coefficient_name: self.estimator.name().to_string(),
            coefficient,
            proportional_agreement: breakdown.overall,
            items: breakdown.items.len(),
            degenerate_items: breakdown.degenerate_items(),
            triples: matrix.len(),
            matrix_digest: matrix_digest(&matrix),
        };

        info!(
            coefficient = report.coefficient,
            proportional_agreement = report.proportional_agreement,
            items = report.items,
            degenerate_items = report.degenerate_items,
            "agreement computed"
        );
        Ok(report)
    }

    /// Report each variant in order, writing each report to `out` as soon as
    /// it completes.
    ///
    /// Stops at the first failing variant and returns its error; reports
    /// already written stay written, and nothing is written for the failing
    /// variant.
    pub async fn run_variants<W: Write + Send>(
        &self,
        selection: &RunConfig,
        variants: &[Variant],
        out: &mut W,
    ) -> Result<Vec<VariantReport>> {
        let mut reports = Vec::with_capacity(variants.len());
        for &variant in variants {
            let report = self.report(selection, variant).await?;
            writeln!(out, "{}", render_variant_report(&report))?;
            out.flush()?;
            reports.push(report);
        }
        Ok(reports)
    }
}

impl std::fmt::Debug for AgreementOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgreementOrchestrator")
            .field("estimator", &self.estimator.name())
            .finish_non_exhaustive()
    }
}
