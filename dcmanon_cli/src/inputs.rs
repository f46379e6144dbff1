//! Loads DICOM JSON input files and groups them into a selection.

use std::path::{Path, PathBuf};

use dcmanon::{
  DataSet, DcmanonError, SelectionBuilder, SelectionTree, SelectionWarning,
  json::DataSetJsonExtensions,
};

/// Finds the input files to load. Files named directly are always included,
/// and directories are searched recursively for files with the given
/// extension. The extension check is not case sensitive.
///
pub fn find_input_files(
  inputs: &[PathBuf],
  extension: &str,
) -> Result<Vec<PathBuf>, String> {
  let extension = extension.to_lowercase();
  let mut files = vec![];

  for input in inputs {
    if input.is_file() {
      files.push(input.clone());
      continue;
    }

    for entry in walkdir::WalkDir::new(input).sort_by_file_name() {
      let entry = entry.map_err(|e| e.to_string())?;

      if !entry.file_type().is_file() {
        continue;
      }

      let has_extension = entry
        .path()
        .extension()
        .is_some_and(|e| e.to_string_lossy().to_lowercase() == extension);

      if has_extension {
        files.push(entry.into_path());
      }
    }
  }

  Ok(files)
}

fn load_data_set(path: &Path) -> Result<DataSet, Vec<String>> {
  let task_description = format!("reading \"{}\"", path.display());

  let json = std::fs::read_to_string(path).map_err(|e| {
    vec![
      format!("Error {task_description}"),
      "".to_string(),
      format!("  Details: {e}"),
    ]
  })?;

  DataSet::from_json(&json).map_err(|e| e.to_lines(&task_description))
}

/// Loads the input files and builds the selection from them. Any error
/// finding or reading a file is printed and stops the load.
///
pub fn load_selection(
  inputs: &[PathBuf],
  extension: &str,
) -> Result<(SelectionTree, Vec<SelectionWarning>), ()> {
  let files = find_input_files(inputs, extension).map_err(|e| {
    eprintln!("Error: {e}");
  })?;

  tracing::debug!(files = files.len(), "Loading input files");

  let mut builder = SelectionBuilder::new();

  for path in files {
    match load_data_set(&path) {
      Ok(data_set) => builder.add(&path, data_set),

      Err(lines) => {
        dcmanon::print_error_lines(&lines);
        return Err(());
      }
    }
  }

  Ok(builder.build())
}

/// Prints selection warnings to stderr.
///
pub fn print_warnings(warnings: &[SelectionWarning]) {
  for warning in warnings {
    warning.print("building the selection");
  }
}
