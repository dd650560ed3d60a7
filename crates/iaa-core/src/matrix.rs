//! Reliability matrix construction.
//!
//! Groups judgement records by item and numbers the judgements of each item
//! `0..k`, producing the `(annotator_slot, item, label)` triples that both
//! agreement statistics consume.

use std::collections::HashMap;

use crate::domain::{AnnotationTriple, JudgementRecord, Result};
use crate::parse::AnswerParser;

/// Build the annotation matrix from judgement records.
///
/// Items appear in first-seen order and each item's records keep their input
/// order; slots are assigned in that order. Slots are per item only and say
/// nothing about which real annotator produced the judgement.
///
/// Fails if the parser rejects any answer.
pub fn build_matrix(
    records: &[JudgementRecord],
    parser: &dyn AnswerParser,
) -> Result<Vec<AnnotationTriple>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&JudgementRecord>> = HashMap::new();

    for record in records {
        groups
            .entry(record.quid.as_str())
            .or_insert_with(|| {
                order.push(record.quid.as_str());
                Vec::new()
            })
            .push(record);
    }

    let mut matrix = Vec::with_capacity(records.len());
    for quid in order {
        let Some(group) = groups.get(quid) else {
            continue;
        };
        for (slot, record) in group.iter().enumerate() {
            let label = parser.parse(&record.answer)?;
            matrix.push(AnnotationTriple::new(slot, quid, label));
        }
    }

    tracing::debug!(
        records = records.len(),
        items = groups.len(),
        triples = matrix.len(),
        "built annotation matrix"
    );
    Ok(matrix)
}
