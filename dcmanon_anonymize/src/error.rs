use std::path::PathBuf;

use dcmanon_core::DcmanonError;

use crate::DocumentRole;

/// The ways in which anonymizing a single document can fail.
///
#[derive(Clone, Debug, PartialEq)]
pub enum DocumentErrorKind {
  /// The anonymized document couldn't be written to its output path.
  PersistenceFailure { path: PathBuf, details: String },

  /// The selection doesn't describe something that can be anonymized, e.g. a
  /// series with no documents, or an image whose SOP class isn't known.
  MalformedSelection { details: String },
}

impl core::fmt::Display for DocumentErrorKind {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::PersistenceFailure { path, details } => {
        write!(f, "Failed writing '{}': {details}", path.display())
      }
      Self::MalformedSelection { details } => {
        write!(f, "Malformed selection: {details}")
      }
    }
  }
}

/// An error anonymizing one document of a series.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesError {
  pub role: DocumentRole,
  pub kind: DocumentErrorKind,
}

impl core::fmt::Display for SeriesError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{} of series: {}", self.role, self.kind)
  }
}

impl std::error::Error for SeriesError {}

impl DcmanonError for SeriesError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("Anonymization error {task_description}"),
      "".to_string(),
      format!("  Document: {}", self.role),
    ];

    match &self.kind {
      DocumentErrorKind::PersistenceFailure { path, details } => {
        lines.push(format!("  Path: {}", path.display()));
        lines.push(format!("  Details: {details}"));
      }
      DocumentErrorKind::MalformedSelection { details } => {
        lines.push(format!("  Details: {details}"));
      }
    }

    lines
  }
}
