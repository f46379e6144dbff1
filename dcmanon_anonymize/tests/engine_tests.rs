use std::path::Path;

use dcmanon_anonymize::{
  DocumentErrorKind, DocumentRole, DocumentSet, IdentityPair, SeriesOptions,
  anonymize_series,
};
use dcmanon_core::{
  DataElementTag, DataElementValue, DataSet, ValueRepresentation, dictionary,
  uids,
};
use dcmanon_json::DataSetJsonExtensions;

fn identity() -> IdentityPair {
  IdentityPair {
    name: "5b4e7a46-8ba4-4a43-9b43-3ad2d1b3e0c1".to_string(),
    patient_id: "0f6c1f27-3b45-4a36-a3c6-d5b4f5f7a9e2".to_string(),
  }
}

fn insert_text(
  data_set: &mut DataSet,
  tag: DataElementTag,
  vr: ValueRepresentation,
  value: &str,
) {
  data_set.insert(
    tag,
    DataElementValue::new_text(vr, vec![value.to_string()]).unwrap(),
  );
}

fn image(sop_class_uid: &str, series_date: Option<&str>) -> DataSet {
  let mut data_set = DataSet::new();

  insert_text(
    &mut data_set,
    dictionary::SOP_CLASS_UID.tag,
    ValueRepresentation::UniqueIdentifier,
    sop_class_uid,
  );
  data_set.insert(
    dictionary::PATIENT_NAME.tag,
    DataElementValue::new_with_text(ValueRepresentation::PersonName, "Doe^J")
      .unwrap(),
  );

  if let Some(series_date) = series_date {
    insert_text(
      &mut data_set,
      dictionary::SERIES_DATE.tag,
      ValueRepresentation::Date,
      series_date,
    );
  }

  data_set
}

fn read(path: &Path) -> DataSet {
  DataSet::from_json(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn images_are_named_by_modality_and_index() {
  let dir = tempfile::tempdir().unwrap();

  let documents = DocumentSet {
    images: vec![
      image(uids::CT_IMAGE_STORAGE, None),
      image(uids::CT_IMAGE_STORAGE, Some("20230102")),
    ],
    ..DocumentSet::default()
  };

  let outcome = anonymize_series(
    documents,
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );

  assert!(outcome.errors.is_empty());
  assert_eq!(
    outcome.written,
    vec![dir.path().join("ct.0.dcm"), dir.path().join("ct.1.dcm")]
  );

  let ct0 = read(&dir.path().join("ct.0.dcm"));
  assert!(!ct0.has(dictionary::SERIES_DATE.tag));
  assert_eq!(
    ct0.get_string(dictionary::PATIENT_NAME.tag),
    Ok(identity().name.as_str())
  );

  let ct1 = read(&dir.path().join("ct.1.dcm"));
  assert_eq!(ct1.get_string(dictionary::SERIES_DATE.tag), Ok("19010101"));
}

#[test]
fn less_common_image_classes_are_written() {
  let dir = tempfile::tempdir().unwrap();

  let documents = DocumentSet {
    images: vec![
      image("1.2.840.10008.5.1.4.1.1.3.1", Some("20230102")),
      image("1.2.840.10008.5.1.4.1.1.1.2", None),
      image("1.2.840.10008.5.1.4.1.1.7.2", None),
      image("1.2.840.10008.5.1.4.1.1.77.1.4", None),
    ],
    ..DocumentSet::default()
  };

  let outcome = anonymize_series(
    documents,
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );

  assert!(outcome.errors.is_empty());
  assert_eq!(
    outcome.written,
    vec![
      dir.path().join("ultrasound multi-frame.0.dcm"),
      dir.path().join("digital mammography x-ray.1.dcm"),
      dir
        .path()
        .join("multi-frame grayscale byte secondary capture.2.dcm"),
      dir.path().join("vl photographic.3.dcm"),
    ]
  );

  let us = read(&dir.path().join("ultrasound multi-frame.0.dcm"));
  assert_eq!(us.get_string(dictionary::SERIES_DATE.tag), Ok("19010101"));
}

#[test]
fn plan_without_tolerance_tables() {
  let dir = tempfile::tempdir().unwrap();

  let mut beam = DataSet::new();
  insert_text(
    &mut beam,
    dictionary::TREATMENT_MACHINE_NAME.tag,
    ValueRepresentation::ShortString,
    "LINAC-3",
  );

  let mut plan = DataSet::new();
  insert_text(
    &mut plan,
    dictionary::RT_PLAN_NAME.tag,
    ValueRepresentation::ShortString,
    "Prostate 78Gy",
  );
  plan.insert(
    dictionary::BEAM_SEQUENCE.tag,
    DataElementValue::new_sequence(vec![beam]),
  );

  let documents = DocumentSet {
    plan: Some(plan),
    ..DocumentSet::default()
  };

  let outcome = anonymize_series(
    documents,
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );
  assert!(outcome.errors.is_empty());

  let plan = read(&dir.path().join("rtplan.dcm"));
  assert!(!plan.has(dictionary::TOLERANCE_TABLE_SEQUENCE.tag));
  assert_eq!(plan.get_string(dictionary::RT_PLAN_NAME.tag), Ok("plan"));

  let beams = plan.get_sequence_items(dictionary::BEAM_SEQUENCE.tag).unwrap();
  assert_eq!(
    beams[0].get_string(dictionary::TREATMENT_MACHINE_NAME.tag),
    Ok("txmachine")
  );
  assert_eq!(beams[0].size(), 1);
}

#[test]
fn dose_write_failure_is_scoped_to_the_dose() {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("rtdose.dcm"), "existing").unwrap();

  let mut dose = DataSet::new();
  insert_text(
    &mut dose,
    dictionary::SERIES_DESCRIPTION.tag,
    ValueRepresentation::LongString,
    "Dose",
  );

  let documents = DocumentSet {
    structure_set: Some(DataSet::new()),
    dose: Some(dose),
    images: vec![image(uids::MR_IMAGE_STORAGE, None)],
    ..DocumentSet::default()
  };

  let outcome = anonymize_series(
    documents,
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );

  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].role, DocumentRole::Dose);
  assert!(matches!(
    &outcome.errors[0].kind,
    DocumentErrorKind::PersistenceFailure { path, .. }
      if *path == dir.path().join("rtdose.dcm")
  ));

  assert_eq!(
    outcome.written,
    vec![dir.path().join("rtss.dcm"), dir.path().join("mr.0.dcm")]
  );
  assert_eq!(
    std::fs::read_to_string(dir.path().join("rtdose.dcm")).unwrap(),
    "existing"
  );
}

#[test]
fn unknown_image_class_is_scoped_to_the_image() {
  let dir = tempfile::tempdir().unwrap();

  let documents = DocumentSet {
    images: vec![
      image("1.2.3.4.5", None),
      image(uids::CT_IMAGE_STORAGE, None),
    ],
    ..DocumentSet::default()
  };

  let outcome = anonymize_series(
    documents,
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );

  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].role, DocumentRole::Image { index: 0 });
  assert!(matches!(
    outcome.errors[0].kind,
    DocumentErrorKind::MalformedSelection { .. }
  ));
  assert_eq!(outcome.written, vec![dir.path().join("ct.1.dcm")]);
}

#[test]
fn empty_series_is_malformed() {
  let dir = tempfile::tempdir().unwrap();

  let outcome = anonymize_series(
    DocumentSet::<DataSet>::default(),
    dir.path(),
    &identity(),
    &SeriesOptions::default(),
  );

  assert_eq!(outcome.errors.len(), 1);
  assert_eq!(outcome.errors[0].role, DocumentRole::Series);
  assert!(outcome.written.is_empty());
  assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
