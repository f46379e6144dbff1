use dcmanon_core::{DataError, DataSetPath, DcmanonError, dictionary};

/// Occurs when an error is encountered converting to the DICOM JSON model.
///
#[derive(Debug)]
pub enum JsonSerializeError {
  /// The data to be serialized to the DICOM JSON model is invalid. Details of
  /// the issue are contained in the contained [`DataError`].
  DataError(DataError),

  /// An error occurred when trying to write DICOM JSON data to the provided
  /// stream.
  ///
  IoError(std::io::Error),
}

/// Occurs when an error is encountered converting from the DICOM JSON model.
///
#[derive(Debug, PartialEq)]
pub enum JsonDeserializeError {
  /// The DICOM JSON data to be deserialized is invalid.
  JsonInvalid { details: String, path: DataSetPath },
}

impl JsonDeserializeError {
  pub(crate) fn new(details: impl Into<String>, path: &DataSetPath) -> Self {
    Self::JsonInvalid {
      details: details.into(),
      path: path.clone(),
    }
  }
}

impl PartialEq for JsonSerializeError {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::DataError(a), Self::DataError(b)) => a == b,
      (Self::IoError(a), Self::IoError(b)) => a.to_string() == b.to_string(),
      _ => false,
    }
  }
}

impl core::fmt::Display for JsonSerializeError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::DataError(e) => e.fmt(f),
      Self::IoError(e) => e.fmt(f),
    }
  }
}

impl core::fmt::Display for JsonDeserializeError {
  fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
    match self {
      Self::JsonInvalid { details, path } => {
        write!(
          f,
          "DICOM JSON deserialize error, details: {details}, path: {path}"
        )
      }
    }
  }
}

impl std::error::Error for JsonSerializeError {}

impl std::error::Error for JsonDeserializeError {}

impl DcmanonError for JsonSerializeError {
  /// Returns lines of text that describe a DICOM JSON serialize error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      Self::DataError(e) => e.to_lines(task_description),
      Self::IoError(e) => vec![
        format!("DICOM JSON I/O error {task_description}"),
        "".to_string(),
        format!("  Error: {e}"),
      ],
    }
  }
}

impl DcmanonError for JsonDeserializeError {
  /// Returns lines of text that describe a DICOM JSON deserialize error in a
  /// human-readable format.
  ///
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    match self {
      Self::JsonInvalid { details, path } => {
        let mut lines = vec![];

        lines.push(format!("DICOM JSON deserialize error {task_description}"));
        lines.push("".to_string());
        lines.push(format!("  Details: {details}"));

        if let Ok(tag) = path.final_data_element() {
          lines.push(format!("  Tag: {tag}"));
          lines.push(format!("  Name: {}", dictionary::tag_name(tag)));
        }

        if !path.is_root() {
          lines.push(format!("  Path: {path}"));
        }

        lines
      }
    }
  }
}
