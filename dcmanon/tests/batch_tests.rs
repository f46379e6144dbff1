use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use dcmanon::{
  BatchAnonymizer, BatchConfig, BatchError, BatchEvent, BatchReport,
  BatchState, DataElementTag, DataElementValue, DataSet, DocumentErrorKind,
  DocumentRole, DocumentSet, SelectionBuilder, SelectionTree, dictionary,
  json::DataSetJsonExtensions,
};
use dcmanon_core::{ValueRepresentation, uids};

fn insert_text(
  data_set: &mut DataSet,
  tag: DataElementTag,
  vr: ValueRepresentation,
  value: &str,
) {
  data_set.insert(tag, DataElementValue::new_with_text(vr, value).unwrap());
}

fn document(sop_class_uid: &str, patient_id: &str) -> DataSet {
  let mut data_set = DataSet::new();

  insert_text(
    &mut data_set,
    dictionary::SOP_CLASS_UID.tag,
    ValueRepresentation::UniqueIdentifier,
    sop_class_uid,
  );
  insert_text(
    &mut data_set,
    dictionary::PATIENT_NAME.tag,
    ValueRepresentation::PersonName,
    &format!("Name^{patient_id}"),
  );
  insert_text(
    &mut data_set,
    dictionary::PATIENT_ID.tag,
    ValueRepresentation::LongString,
    patient_id,
  );
  insert_text(
    &mut data_set,
    dictionary::INSTITUTION_NAME.tag,
    ValueRepresentation::LongString,
    "General Hospital",
  );

  data_set
}

fn rt_series(patient_id: &str) -> DocumentSet<DataSet> {
  DocumentSet {
    plan: Some(document(uids::RT_PLAN_STORAGE, patient_id)),
    dose: Some(document(uids::RT_DOSE_STORAGE, patient_id)),
    images: vec![
      document(uids::CT_IMAGE_STORAGE, patient_id),
      document(uids::CT_IMAGE_STORAGE, patient_id),
    ],
    ..DocumentSet::default()
  }
}

async fn run_batch(
  config: BatchConfig,
  selection: SelectionTree,
) -> (Result<BatchReport, BatchError>, BatchState, Vec<BatchEvent>) {
  let (tx, mut rx) = mpsc::unbounded_channel();

  let mut anonymizer = BatchAnonymizer::new(config).with_events(tx);
  let result = anonymizer.run(selection).await;
  let state = anonymizer.state();
  drop(anonymizer);

  let mut events = vec![];
  while let Some(event) = rx.recv().await {
    events.push(event);
  }

  (result, state, events)
}

fn read(path: &Path) -> DataSet {
  DataSet::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn written_files(root: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| entry.into_path())
    .collect();

  files.sort();
  files
}

fn progress_counts(events: &[BatchEvent]) -> Vec<(usize, usize)> {
  events
    .iter()
    .filter_map(|event| match event {
      BatchEvent::Progress { done, total, .. } => Some((*done, *total)),
      _ => None,
    })
    .collect()
}

#[tokio::test]
async fn patient_identity_is_shared_across_documents() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p1", "s1", "r1", rt_series("PAT-1"));
  selection.insert_series("p1", "s1", "r2", rt_series("PAT-1"));
  selection.insert_series("p2", "s1", "r1", rt_series("PAT-2"));

  let config = BatchConfig::default().destination(dir.path());
  let (result, state, _) = run_batch(config, selection).await;

  let report = result.unwrap();
  assert_eq!(state, BatchState::Completed);
  assert!(report.is_success());
  assert_eq!(report.total_series, 3);
  assert_eq!(report.completed_series, 3);
  assert_eq!(report.documents_written, 12);

  let identity = |patient: &str| {
    let mut pairs = vec![];

    for series in ["r1", "r2"] {
      let directory = dir.path().join(patient).join("s1").join(series);
      if !directory.exists() {
        continue;
      }

      for name in ["rtplan.dcm", "rtdose.dcm", "ct.0.dcm", "ct.1.dcm"] {
        let data_set = read(&directory.join(name));
        pairs.push((
          data_set
            .get_string(dictionary::PATIENT_NAME.tag)
            .unwrap()
            .to_string(),
          data_set
            .get_string(dictionary::PATIENT_ID.tag)
            .unwrap()
            .to_string(),
        ));
      }
    }

    pairs.dedup();
    assert_eq!(pairs.len(), 1);
    pairs.remove(0)
  };

  let (name_1, id_1) = identity("p1");
  let (name_2, id_2) = identity("p2");

  assert!(!name_1.starts_with("Name^"));
  assert!(id_1 != "PAT-1");
  assert!(name_1 != name_2);
  assert!(id_1 != id_2);
}

#[tokio::test]
async fn documents_are_written_to_their_series_directory() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r", rt_series("PAT-1"));

  let config = BatchConfig::default().destination(dir.path());
  let (result, _, _) = run_batch(config, selection).await;
  assert!(result.unwrap().is_success());

  let series_dir = dir.path().join("p").join("s").join("r");
  assert_eq!(
    written_files(dir.path()),
    vec![
      series_dir.join("ct.0.dcm"),
      series_dir.join("ct.1.dcm"),
      series_dir.join("rtdose.dcm"),
      series_dir.join("rtplan.dcm"),
    ]
  );

  let image = read(&series_dir.join("ct.0.dcm"));
  assert_eq!(
    image.get_string(dictionary::INSTITUTION_NAME.tag),
    Ok("institution")
  );
}

#[tokio::test]
async fn absent_fields_are_not_introduced() {
  let dir = tempfile::tempdir().unwrap();

  let documents = DocumentSet {
    images: vec![document(uids::MR_IMAGE_STORAGE, "PAT-1")],
    ..DocumentSet::default()
  };
  let input_tags = documents.images[0].tags();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r", documents);

  let config = BatchConfig::default().destination(dir.path());
  let (result, _, _) = run_batch(config, selection).await;
  assert!(result.unwrap().is_success());

  let image = read(&dir.path().join("p/s/r/mr.0.dcm"));
  assert_eq!(image.tags(), input_tags);
}

#[tokio::test]
async fn private_elements_are_stripped_unless_disabled() {
  let private_tag = DataElementTag::new(0x0009, 0x1001);

  for strip_private in [true, false] {
    let dir = tempfile::tempdir().unwrap();

    let mut plan = document(uids::RT_PLAN_STORAGE, "PAT-1");
    insert_text(
      &mut plan,
      private_tag,
      ValueRepresentation::LongString,
      "vendor data",
    );

    let mut selection = SelectionTree::new();
    selection.insert_series(
      "p",
      "s",
      "r",
      DocumentSet {
        plan: Some(plan),
        ..DocumentSet::default()
      },
    );

    let config = BatchConfig::default()
      .destination(dir.path())
      .strip_private(strip_private);
    let (result, _, _) = run_batch(config, selection).await;
    assert!(result.unwrap().is_success());

    let plan = read(&dir.path().join("p/s/r/rtplan.dcm"));
    assert_eq!(plan.has(private_tag), !strip_private);
  }
}

#[tokio::test]
async fn uncreatable_destination_fails_before_any_series() {
  let dir = tempfile::tempdir().unwrap();

  let blocker = dir.path().join("blocker");
  std::fs::write(&blocker, b"").unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r", rt_series("PAT-1"));

  let config = BatchConfig::default().destination(blocker.join("out"));
  let (result, state, events) = run_batch(config, selection).await;

  assert!(matches!(
    result,
    Err(BatchError::DestinationUnavailable { path: Some(_), .. })
  ));
  assert_eq!(state, BatchState::Failed);

  assert_eq!(events.len(), 1);
  assert!(matches!(events[0], BatchEvent::Failed { .. }));
}

#[tokio::test]
async fn missing_destination_fails() {
  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r", rt_series("PAT-1"));

  let (result, state, events) =
    run_batch(BatchConfig::default(), selection).await;

  assert_eq!(
    result,
    Err(BatchError::DestinationUnavailable {
      path: None,
      details: "No destination or import location is set".to_string(),
    })
  );
  assert_eq!(state, BatchState::Failed);
  assert!(progress_counts(&events).is_empty());
}

#[tokio::test]
async fn import_location_is_used_when_no_destination_is_set() {
  let dir = tempfile::tempdir().unwrap();
  let import_location = dir.path().join("imports");

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r", rt_series("PAT-1"));

  let config =
    BatchConfig::default().import_location(Some(import_location.clone()));
  let (result, _, _) = run_batch(config, selection).await;

  assert!(result.unwrap().is_success());
  assert!(import_location.join("p/s/r/rtplan.dcm").is_file());
}

#[tokio::test]
async fn document_failures_do_not_stop_the_batch() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r1", rt_series("PAT-1"));
  selection.insert_series("p", "s", "r2", rt_series("PAT-1"));

  // An existing file at the dose's output path makes its write fail
  let dose_path = dir.path().join("p/s/r1/rtdose.dcm");
  std::fs::create_dir_all(dose_path.parent().unwrap()).unwrap();
  std::fs::write(&dose_path, b"existing").unwrap();

  let config = BatchConfig::default().destination(dir.path());
  let (result, state, events) = run_batch(config, selection).await;

  let report = result.unwrap();
  assert_eq!(state, BatchState::Completed);
  assert!(!report.is_success());
  assert_eq!(report.completed_series, 2);
  assert_eq!(report.skipped_series, 0);
  assert_eq!(report.documents_written, 7);

  assert_eq!(report.errors.len(), 1);
  let error = &report.errors[0];
  assert_eq!(error.series_key, "r1");
  assert_eq!(error.role, DocumentRole::Dose);
  assert!(matches!(
    &error.kind,
    DocumentErrorKind::PersistenceFailure { path, .. } if *path == dose_path
  ));

  assert_eq!(std::fs::read(&dose_path).unwrap(), b"existing");
  assert!(dir.path().join("p/s/r1/ct.1.dcm").is_file());

  assert_eq!(progress_counts(&events), vec![(1, 2), (2, 2)]);
  assert_eq!(
    events.last(),
    Some(&BatchEvent::Completed {
      errors: report.errors.clone()
    })
  );
}

#[tokio::test]
async fn progress_is_monotonic_under_concurrency() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  for i in 0..8 {
    selection.insert_series(
      &format!("p{}", i % 3),
      "s",
      &format!("r{i}"),
      rt_series(&format!("PAT-{}", i % 3)),
    );
  }

  let config = BatchConfig::default()
    .destination(dir.path())
    .max_concurrency(4);
  let (result, _, events) = run_batch(config, selection).await;

  assert!(result.unwrap().is_success());

  assert_eq!(events.first(), Some(&BatchEvent::Started { total: 8 }));
  assert_eq!(
    progress_counts(&events),
    (1..=8).map(|done| (done, 8)).collect::<Vec<_>>()
  );
  assert!(matches!(events.last(), Some(BatchEvent::Completed { .. })));
}

#[tokio::test]
async fn cancelled_batch_skips_remaining_series() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "r1", rt_series("PAT-1"));
  selection.insert_series("p", "s", "r2", rt_series("PAT-1"));

  let (tx, mut rx) = mpsc::unbounded_channel();
  let mut anonymizer =
    BatchAnonymizer::new(BatchConfig::default().destination(dir.path()))
      .with_events(tx);

  anonymizer.cancellation_token().cancel();
  let report = anonymizer.run(selection).await.unwrap();

  assert_eq!(anonymizer.state(), BatchState::Completed);
  assert!(report.cancelled);
  assert!(!report.is_success());
  assert_eq!(report.skipped_series, 2);
  assert_eq!(report.documents_written, 0);
  assert!(written_files(dir.path()).is_empty());

  drop(anonymizer);
  let mut events = vec![];
  while let Some(event) = rx.recv().await {
    events.push(event);
  }
  assert!(progress_counts(&events).is_empty());
}

#[tokio::test]
async fn empty_series_is_skipped() {
  let dir = tempfile::tempdir().unwrap();

  let mut selection = SelectionTree::new();
  selection.insert_series("p", "s", "empty", DocumentSet::default());
  selection.insert_series("p", "s", "r", rt_series("PAT-1"));

  let config = BatchConfig::default().destination(dir.path());
  let (result, _, events) = run_batch(config, selection).await;

  let report = result.unwrap();
  assert_eq!(report.completed_series, 1);
  assert_eq!(report.skipped_series, 1);

  assert_eq!(report.errors.len(), 1);
  assert_eq!(report.errors[0].series_key, "empty");
  assert_eq!(report.errors[0].role, DocumentRole::Series);
  assert!(matches!(
    report.errors[0].kind,
    DocumentErrorKind::MalformedSelection { .. }
  ));

  assert!(!dir.path().join("p/s/empty").exists());
  assert_eq!(progress_counts(&events).len(), 2);
}

#[tokio::test]
async fn reruns_write_to_new_directories() {
  let dir = tempfile::tempdir().unwrap();

  for _ in 0..2 {
    let mut plan = document(uids::RT_PLAN_STORAGE, "PAT-1");
    insert_text(
      &mut plan,
      dictionary::STUDY_INSTANCE_UID.tag,
      ValueRepresentation::UniqueIdentifier,
      "1.2.3",
    );
    insert_text(
      &mut plan,
      dictionary::SERIES_INSTANCE_UID.tag,
      ValueRepresentation::UniqueIdentifier,
      "1.2.3.4",
    );

    let mut builder = SelectionBuilder::new();
    builder.add(Path::new("plan.json"), plan);
    let (selection, warnings) = builder.build();
    assert!(warnings.is_empty());

    let config = BatchConfig::default().destination(dir.path());
    let (result, _, _) = run_batch(config, selection).await;
    assert!(result.unwrap().is_success());
  }

  let files = written_files(dir.path());
  assert_eq!(files.len(), 2);
  assert!(files[0].parent() != files[1].parent());
}

#[tokio::test]
async fn batch_runs_only_once() {
  let dir = tempfile::tempdir().unwrap();

  let mut anonymizer =
    BatchAnonymizer::new(BatchConfig::default().destination(dir.path()));

  let report = anonymizer.run(SelectionTree::new()).await.unwrap();
  assert_eq!(report.total_series, 0);
  assert!(report.is_success());

  assert_eq!(
    anonymizer.run(SelectionTree::new()).await,
    Err(BatchError::AlreadyStarted)
  );
  assert_eq!(anonymizer.state(), BatchState::Completed);
}
