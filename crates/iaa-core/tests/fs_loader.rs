//! Filesystem loader contract: layout, ordering, selection and failures.

use iaa_core::source::fs::{write_record_file, FsRecordLoader};
use iaa_core::{IaaError, JudgementRecord, RecordLoader, RunConfig, Selector, ValidationStatus};

async fn seeded_loader() -> (tempfile::TempDir, FsRecordLoader) {
    let dir = tempfile::tempdir().expect("tempdir");
    let loader = FsRecordLoader::new(dir.path());
    let run_dir = loader.run_dir(3, "experiment1");

    // Written out of name order on purpose; reads must sort by path.
    write_record_file(
        &run_dir.join("batch2.jsonl"),
        &[
            JudgementRecord::new("q1", "no")
                .with_batch("2")
                .with_question_set("10")
                .with_validation(ValidationStatus::Valid),
            JudgementRecord::new("q2", "yes")
                .with_batch("2")
                .with_question_set("20")
                .with_validation(ValidationStatus::Unvalidated),
        ],
    )
    .await
    .expect("write batch2");

    write_record_file(
        &run_dir.join("batch1.jsonl"),
        &[
            JudgementRecord::new("q1", "yes")
                .with_batch("1")
                .with_question_set("10")
                .with_validation(ValidationStatus::Valid),
            JudgementRecord::new("q2", "yes")
                .with_batch("1")
                .with_question_set("20")
                .with_validation(ValidationStatus::Valid),
        ],
    )
    .await
    .expect("write batch1");

    (dir, loader)
}

#[tokio::test]
async fn load_reads_files_in_sorted_order() {
    let (_dir, loader) = seeded_loader().await;
    let config = RunConfig::new(3, "experiment1").with_remove_not_val(false);

    let records = loader.load(&config).await.expect("load");
    let answers: Vec<(&str, &str)> = records
        .iter()
        .map(|r| (r.quid.as_str(), r.answer.as_str()))
        .collect();
    assert_eq!(
        answers,
        vec![("q1", "yes"), ("q2", "yes"), ("q1", "no"), ("q2", "yes")]
    );
}

#[tokio::test]
async fn load_removes_not_validated_by_default() {
    let (_dir, loader) = seeded_loader().await;
    let records = loader
        .load(&RunConfig::new(3, "experiment1"))
        .await
        .expect("load");
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.is_validated()));
}

#[tokio::test]
async fn load_applies_batch_and_question_selectors() {
    let (_dir, loader) = seeded_loader().await;
    let config = RunConfig::new(3, "experiment1")
        .with_batch(Selector::Exact("1".to_string()))
        .with_questions(Selector::Exact("10".to_string()));

    let records = loader.load(&config).await.expect("load");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].answer, "yes");
}

#[tokio::test]
async fn load_clean_reads_clean_directory_unfiltered() {
    let (_dir, loader) = seeded_loader().await;
    write_record_file(
        &loader.clean_dir(3, "experiment1").join("cleaned.jsonl"),
        &[JudgementRecord::new("q1", "yes").with_validation(ValidationStatus::Unvalidated)],
    )
    .await
    .expect("write clean");

    let records = loader.load_clean(3, "experiment1").await.expect("load clean");
    assert_eq!(records.len(), 1);

    // The clean directory is not picked up as raw data.
    let raw = loader
        .load(&RunConfig::new(3, "experiment1").with_remove_not_val(false))
        .await
        .expect("load");
    assert_eq!(raw.len(), 4);
}

#[tokio::test]
async fn missing_run_is_upstream_error() {
    let (_dir, loader) = seeded_loader().await;
    let err = loader
        .load(&RunConfig::new(9, "experiment1"))
        .await
        .unwrap_err();
    assert!(matches!(err, IaaError::UpstreamLoad { .. }));
    assert!(err.to_string().contains("run9"));
}

#[tokio::test]
async fn missing_clean_dataset_is_upstream_error() {
    let (_dir, loader) = seeded_loader().await;
    let err = loader.load_clean(3, "experiment1").await.unwrap_err();
    assert!(matches!(err, IaaError::UpstreamLoad { .. }));
}
