//! Durable writing of documents to disk.

use std::{
  ffi::OsStr,
  fs::File,
  io::{BufWriter, ErrorKind},
  path::{Path, PathBuf},
};

use rand::Rng;

use dcmanon_core::{DataSet, DcmanonError};
use dcmanon_json::{DataSetJsonExtensions, DicomJsonConfig};

/// An error that occurred writing a document to disk.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PersistError {
  pub when: String,
  pub details: String,
}

impl core::fmt::Display for PersistError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{} failed, details: {}", self.when, self.details)
  }
}

impl std::error::Error for PersistError {}

impl DcmanonError for PersistError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("File error {task_description}"),
      "".to_string(),
      format!("  When: {}", self.when),
      format!("  Details: {}", self.details),
    ]
  }
}

/// Writes a data set to the given path as DICOM JSON.
///
/// Parent directories are created as needed. The data set is first written to
/// a temporary file alongside the output file, which is then moved into place,
/// so a failed write never leaves a partial output file.
///
/// Unless `overwrite` is set, an existing output file is an error. This holds
/// even when the output file is created by another process while the data set
/// is being written, because the temporary file is then hard linked into
/// place, which fails rather than replace an existing file.
///
pub fn persist_data_set(
  data_set: &DataSet,
  path: &Path,
  overwrite: bool,
) -> Result<(), PersistError> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).map_err(|e| PersistError {
      when: format!("Creating directory '{}'", parent.display()),
      details: e.to_string(),
    })?;
  }

  if !overwrite && path.exists() {
    return Err(output_file_exists(path));
  }

  let mut renamer =
    TempFileRenamer::new(temp_file_name(path), path.to_path_buf(), overwrite);

  let file = File::create(&renamer.temp_filename).map_err(|e| PersistError {
    when: format!("Creating '{}'", renamer.temp_filename.display()),
    details: e.to_string(),
  })?;

  let config = DicomJsonConfig { pretty_print: true };

  data_set
    .to_json_stream(&config, &mut BufWriter::new(file))
    .map_err(|e| PersistError {
      when: format!("Writing '{}'", renamer.temp_filename.display()),
      details: e.to_string(),
    })?;

  renamer.commit()
}

fn output_file_exists(path: &Path) -> PersistError {
  PersistError {
    when: format!("Writing '{}'", path.display()),
    details: "Output file already exists".to_string(),
  }
}

/// Appends a random suffix to get a unique name for a temporary output file.
///
fn temp_file_name(path: &Path) -> PathBuf {
  let mut rng = rand::rng();
  let random_suffix: String = (0..16)
    .map(|_| char::from(rng.sample(rand::distr::Alphanumeric)))
    .collect();

  let file_name = path.file_name().unwrap_or(OsStr::new(""));
  let file_name =
    format!("{}.{}.tmp", file_name.to_string_lossy(), random_suffix);

  path.with_file_name(file_name)
}

/// Moves a temporary file to an output filename when [`Self::commit()`] is
/// called. The temporary file is deleted on drop if it's still present.
///
/// When overwriting, the temporary file is renamed over the output file.
/// Otherwise it's hard linked to the output filename, which fails if the output
/// file exists, and the temporary file is then deleted.
///
struct TempFileRenamer {
  temp_filename: PathBuf,
  output_filename: PathBuf,
  overwrite: bool,
  renamed: bool,
}

impl TempFileRenamer {
  fn new(
    temp_filename: PathBuf,
    output_filename: PathBuf,
    overwrite: bool,
  ) -> Self {
    Self {
      temp_filename,
      output_filename,
      overwrite,
      renamed: false,
    }
  }

  fn commit(&mut self) -> Result<(), PersistError> {
    if self.overwrite {
      std::fs::rename(&self.temp_filename, &self.output_filename).map_err(
        |e| PersistError {
          when: format!(
            "Renaming '{}' to '{}'",
            self.temp_filename.display(),
            self.output_filename.display()
          ),
          details: e.to_string(),
        },
      )?;

      self.renamed = true;

      return Ok(());
    }

    std::fs::hard_link(&self.temp_filename, &self.output_filename).map_err(
      |e| {
        if e.kind() == ErrorKind::AlreadyExists {
          return output_file_exists(&self.output_filename);
        }

        PersistError {
          when: format!(
            "Linking '{}' to '{}'",
            self.temp_filename.display(),
            self.output_filename.display()
          ),
          details: e.to_string(),
        }
      },
    )?;

    std::fs::remove_file(&self.temp_filename).map_err(|e| PersistError {
      when: format!("Removing '{}'", self.temp_filename.display()),
      details: e.to_string(),
    })
  }
}

impl Drop for TempFileRenamer {
  fn drop(&mut self) {
    if !self.renamed {
      let _ = std::fs::remove_file(&self.temp_filename);
    }
  }
}
