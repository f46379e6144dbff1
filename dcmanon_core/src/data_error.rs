//! Errors that occur when retrieving or constructing values in a data set.

use crate::{DataSetPath, DcmanonError, dictionary};

/// An error that occurred when retrieving or creating data in a data set.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DataError {
  kind: DataErrorKind,
  path: Option<DataSetPath>,
}

#[derive(Clone, Debug, PartialEq)]
enum DataErrorKind {
  /// The requested tag isn't present in the data set.
  TagNotPresent,

  /// The data element doesn't hold the requested type of value.
  ValueNotPresent,

  /// The data element holds a different number of values than requested.
  MultiplicityMismatch,

  /// The value is invalid for its VR, or can't be converted as requested.
  ValueInvalid { details: String },
}

impl DataError {
  pub fn new_tag_not_present() -> Self {
    Self {
      kind: DataErrorKind::TagNotPresent,
      path: None,
    }
  }

  pub fn new_value_not_present() -> Self {
    Self {
      kind: DataErrorKind::ValueNotPresent,
      path: None,
    }
  }

  pub fn new_multiplicity_mismatch() -> Self {
    Self {
      kind: DataErrorKind::MultiplicityMismatch,
      path: None,
    }
  }

  pub fn new_value_invalid(details: String) -> Self {
    Self {
      kind: DataErrorKind::ValueInvalid { details },
      path: None,
    }
  }

  /// Returns whether this error is a tag not being present in a data set.
  ///
  pub fn is_tag_not_present(&self) -> bool {
    self.kind == DataErrorKind::TagNotPresent
  }

  /// Returns the path to the data element this error relates to, if known.
  ///
  pub fn path(&self) -> Option<&DataSetPath> {
    self.path.as_ref()
  }

  /// Adds a path to the data element this error relates to.
  ///
  pub fn with_path(mut self, path: &DataSetPath) -> Self {
    self.path = Some(path.clone());
    self
  }

  fn name(&self) -> &'static str {
    match self.kind {
      DataErrorKind::TagNotPresent => "Tag not present",
      DataErrorKind::ValueNotPresent => "Value not present",
      DataErrorKind::MultiplicityMismatch => "Multiplicity mismatch",
      DataErrorKind::ValueInvalid { .. } => "Invalid value",
    }
  }
}

impl core::fmt::Display for DataError {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}", self.name())?;

    if let DataErrorKind::ValueInvalid { details } = &self.kind {
      write!(f, ", details: {details}")?;
    }

    if let Some(path) = &self.path {
      write!(f, ", path: {path}")?;
    }

    Ok(())
  }
}

impl std::error::Error for DataError {}

impl DcmanonError for DataError {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    let mut lines = vec![
      format!("DICOM data error {task_description}"),
      "".to_string(),
      format!("  Error: {}", self.name()),
    ];

    if let Some(path) = &self.path {
      if let Ok(tag) = path.final_data_element() {
        lines.push(format!("  Tag: {tag}"));
        lines.push(format!("  Name: {}", dictionary::tag_name(tag)));
      }

      if !path.is_root() {
        lines.push(format!("  Path: {path}"));
      }
    }

    if let DataErrorKind::ValueInvalid { details } = &self.kind {
      lines.push(format!("  Details: {details}"));
    }

    lines
  }
}
