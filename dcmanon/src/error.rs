use std::path::PathBuf;

use dcmanon_anonymize::{DocumentErrorKind, DocumentRole};
use dcmanon_core::DcmanonError;

/// An error anonymizing one document, or one whole series, in a batch. These
/// are collected while the batch continues.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DocumentError {
  pub patient_key: String,
  pub study_key: String,
  pub series_key: String,
  pub role: DocumentRole,
  pub kind: DocumentErrorKind,
}

impl core::fmt::Display for DocumentError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(
      f,
      "{} of series {}/{}/{}: {}",
      self.role, self.patient_key, self.study_key, self.series_key, self.kind
    )
  }
}

impl std::error::Error for DocumentError {}

impl DcmanonError for DocumentError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("Anonymization error {task_description}"),
      "".to_string(),
      format!("  Patient: {}", self.patient_key),
      format!("  Study: {}", self.study_key),
      format!("  Series: {}", self.series_key),
      format!("  Document: {}", self.role),
    ];

    match &self.kind {
      DocumentErrorKind::PersistenceFailure { path, details } => {
        lines.push(format!("  Path: {}", path.display()));
        lines.push(format!("  Details: {details}"));
      }
      DocumentErrorKind::MalformedSelection { details } => {
        lines.push("  Error: Malformed selection".to_string());
        lines.push(format!("  Details: {details}"));
      }
    }

    lines
  }
}

/// An error that stops a whole batch.
///
#[derive(Clone, Debug, PartialEq)]
pub enum BatchError {
  /// The destination root couldn't be created, or no destination was given.
  /// No series are processed.
  DestinationUnavailable {
    path: Option<PathBuf>,
    details: String,
  },

  /// The batch anonymizer has already been run.
  AlreadyStarted,
}

impl core::fmt::Display for BatchError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::DestinationUnavailable {
        path: Some(path),
        details,
      } => write!(
        f,
        "Destination '{}' is unavailable: {details}",
        path.display()
      ),
      Self::DestinationUnavailable {
        path: None,
        details,
      } => write!(f, "Destination is unavailable: {details}"),
      Self::AlreadyStarted => f.write_str("Batch has already been started"),
    }
  }
}

impl std::error::Error for BatchError {}

impl DcmanonError for BatchError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("Batch error {task_description}"),
      "".to_string(),
    ];

    match self {
      Self::DestinationUnavailable { path, details } => {
        lines.push("  Error: Destination unavailable".to_string());
        if let Some(path) = path {
          lines.push(format!("  Path: {}", path.display()));
        }
        lines.push(format!("  Details: {details}"));
      }
      Self::AlreadyStarted => {
        lines.push("  Error: Batch has already been started".to_string());
      }
    }

    lines
  }
}
