use std::path::Path;

use assert_cmd::{Command, assert::Assert, cargo::cargo_bin_cmd};
use tempfile::TempDir;

#[allow(dead_code)]
pub fn dcmanon_cli() -> Command {
  let mut cmd = cargo_bin_cmd!("dcmanon_cli");

  cmd.env_remove("DCMANON_IMPORT_LOCATION").env_remove("RUST_LOG");

  cmd
}

#[allow(dead_code)]
pub fn create_temp_dir() -> TempDir {
  tempfile::tempdir().unwrap()
}

/// Writes a minimal DICOM JSON document with the given SOP class to a file.
///
#[allow(dead_code)]
pub fn write_document(
  path: &Path,
  sop_class_uid: &str,
  patient_id: &str,
  series_uid: &str,
) {
  let json = serde_json::json!({
    "00080016": { "vr": "UI", "Value": [sop_class_uid] },
    "00080080": { "vr": "LO", "Value": ["General Hospital"] },
    "00091001": { "vr": "LO", "Value": ["vendor data"] },
    "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^Jane" }] },
    "00100020": { "vr": "LO", "Value": [patient_id] },
    "0020000D": { "vr": "UI", "Value": ["1.2.3"] },
    "0020000E": { "vr": "UI", "Value": [series_uid] },
  });

  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
}

/// Returns the paths of all files under a directory relative to it, sorted,
/// with each path's directories replaced by `*`.
///
#[allow(dead_code)]
pub fn written_file_names(root: &Path) -> Vec<String> {
  let mut names: Vec<String> = walkdir::WalkDir::new(root)
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_type().is_file())
    .map(|entry| {
      let relative = entry.path().strip_prefix(root).unwrap();
      let depth = relative.components().count();

      let mut parts = vec!["*"; depth - 1];
      parts.push(entry.file_name().to_str().unwrap());
      parts.join("/")
    })
    .collect();

  names.sort();
  names
}

#[allow(dead_code)]
pub fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[allow(dead_code)]
pub fn get_stdout(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[allow(dead_code)]
pub fn get_stderr(assert: Assert) -> String {
  String::from_utf8(assert.get_output().stderr.clone()).unwrap()
}

/// Returns the path of the only file with the given name under a directory.
///
#[allow(dead_code)]
pub fn find_file(root: &Path, name: &str) -> std::path::PathBuf {
  let paths: Vec<_> = walkdir::WalkDir::new(root)
    .into_iter()
    .map(|entry| entry.unwrap())
    .filter(|entry| entry.file_name() == name)
    .map(|entry| entry.into_path())
    .collect();

  assert_eq!(paths.len(), 1, "{name}");
  paths[0].clone()
}

#[allow(dead_code)]
pub fn get_stdout_and_stderr(assert: Assert) -> (String, String) {
  (
    String::from_utf8(assert.get_output().stdout.clone()).unwrap(),
    String::from_utf8(assert.get_output().stderr.clone()).unwrap(),
  )
}
