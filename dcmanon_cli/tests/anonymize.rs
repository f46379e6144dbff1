mod utils;

use insta::assert_snapshot;
use predicates::prelude::*;
use utils::{
  create_temp_dir, dcmanon_cli, find_file, get_stderr, get_stdout, read_json,
  write_document, written_file_names,
};

const RT_PLAN: &str = "1.2.840.10008.5.1.4.1.1.481.5";
const RT_DOSE: &str = "1.2.840.10008.5.1.4.1.1.481.2";
const CT_IMAGE: &str = "1.2.840.10008.5.1.4.1.1.2";

#[test]
fn anonymize_directory() {
  let input = create_temp_dir();
  let output = create_temp_dir();

  write_document(&input.path().join("a/plan.json"), RT_PLAN, "PAT-1", "1.1");
  write_document(&input.path().join("a/dose.json"), RT_DOSE, "PAT-1", "1.1");
  write_document(&input.path().join("b/ct.json"), CT_IMAGE, "PAT-1", "1.1");
  write_document(&input.path().join("b/ct.JSON"), CT_IMAGE, "PAT-1", "1.1");
  std::fs::write(input.path().join("notes.txt"), "not a document").unwrap();

  let assert = dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .arg("--destination")
    .arg(output.path())
    .assert()
    .success();

  let stdout = get_stdout(assert);
  let lines: Vec<_> = stdout.lines().collect();
  assert_eq!(lines.len(), 2);
  assert!(lines[0].starts_with("[1/1] "));
  assert_eq!(lines[1], "Anonymized 4 documents in 1 of 1 series");

  assert_eq!(
    written_file_names(output.path()),
    vec![
      "*/*/*/ct.0.dcm",
      "*/*/*/ct.1.dcm",
      "*/*/*/rtdose.dcm",
      "*/*/*/rtplan.dcm",
    ]
  );

  let plan = read_json(&find_file(output.path(), "rtplan.dcm"));
  let dose = read_json(&find_file(output.path(), "rtdose.dcm"));

  let patient_name = &plan["00100010"]["Value"][0]["Alphabetic"];
  assert!(patient_name.is_string());
  assert_ne!(patient_name, "Doe^Jane");
  assert_eq!(patient_name, &dose["00100010"]["Value"][0]["Alphabetic"]);

  assert_ne!(plan["00100020"]["Value"][0], "PAT-1");
  assert_eq!(plan["00100020"], dose["00100020"]);

  assert!(plan.get("00091001").is_none());

  let image = read_json(&find_file(output.path(), "ct.0.dcm"));
  assert_eq!(image["00080080"]["Value"][0], "institution");
  assert_eq!(image["00100020"], plan["00100020"]);
}

#[test]
fn anonymize_keeping_private_elements() {
  let input = create_temp_dir();
  let output = create_temp_dir();

  write_document(&input.path().join("plan.json"), RT_PLAN, "PAT-1", "1.1");

  dcmanon_cli()
    .arg("anonymize")
    .arg(input.path().join("plan.json"))
    .arg("-d")
    .arg(output.path())
    .arg("--keep-private")
    .assert()
    .success();

  let plan = read_json(&find_file(output.path(), "rtplan.dcm"));
  assert_eq!(plan["00091001"]["Value"][0], "vendor data");
}

#[test]
fn anonymize_to_import_location() {
  let input = create_temp_dir();
  let import_location = create_temp_dir();

  write_document(&input.path().join("plan.json"), RT_PLAN, "PAT-1", "1.1");

  dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .env("DCMANON_IMPORT_LOCATION", import_location.path())
    .assert()
    .success();

  assert_eq!(
    written_file_names(import_location.path()),
    vec!["*/*/*/rtplan.dcm"]
  );
}

#[test]
fn anonymize_without_destination() {
  let input = create_temp_dir();

  write_document(&input.path().join("plan.json"), RT_PLAN, "PAT-1", "1.1");

  let assert = dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .assert()
    .failure();

  assert_snapshot!(get_stderr(assert).trim(), @r"
  -----
  Batch error anonymizing

    Error: Destination unavailable
    Details: No destination or import location is set
  ");
}

#[test]
fn anonymize_invalid_json() {
  let input = create_temp_dir();
  let output = create_temp_dir();

  std::fs::write(input.path().join("broken.json"), "{").unwrap();

  dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .arg("-d")
    .arg(output.path())
    .assert()
    .failure()
    .stderr(predicate::str::contains("DICOM JSON deserialize error reading"));

  assert!(written_file_names(output.path()).is_empty());
}

#[test]
fn anonymize_with_unplaceable_document() {
  let input = create_temp_dir();
  let output = create_temp_dir();

  write_document(&input.path().join("a.json"), RT_PLAN, "PAT-1", "1.1");
  write_document(&input.path().join("b.json"), RT_PLAN, "PAT-1", "1.1");

  let assert = dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .arg("-d")
    .arg(output.path())
    .assert()
    .success();

  let stderr = get_stderr(assert);
  assert!(stderr.contains("Selection warning building the selection"));
  assert!(stderr.contains("b.json"));

  assert_eq!(written_file_names(output.path()), vec!["*/*/*/rtplan.dcm"]);
}

#[test]
fn anonymize_patients_separately() {
  let input = create_temp_dir();
  let output = create_temp_dir();

  write_document(&input.path().join("1.json"), RT_PLAN, "PAT-1", "1.1");
  write_document(&input.path().join("2.json"), RT_PLAN, "PAT-2", "2.1");

  let assert = dcmanon_cli()
    .arg("anonymize")
    .arg(input.path())
    .arg("-d")
    .arg(output.path())
    .arg("--threads")
    .arg("1")
    .assert()
    .success();

  let stdout = get_stdout(assert);
  assert!(stdout.contains("[1/2] "));
  assert!(stdout.contains("[2/2] "));
  assert!(stdout.contains("Anonymized 2 documents in 2 of 2 series"));

  let patient_ids: Vec<_> = walkdir::WalkDir::new(output.path())
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| read_json(entry.path())["00100020"]["Value"][0].clone())
    .collect();

  assert_eq!(patient_ids.len(), 2);
  assert_ne!(patient_ids[0], patient_ids[1]);
}
