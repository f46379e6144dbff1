//! Convert data sets to and from the DICOM JSON model.
//!
//! Ref: PS3.18 Annex F.

mod data_set_to_json;
mod json_config;
mod json_error;
mod json_to_data_set;

use std::io::Write;

use dcmanon_core::DataSet;

pub use data_set_to_json::data_set_to_json;
pub use json_config::DicomJsonConfig;
pub use json_error::{JsonDeserializeError, JsonSerializeError};
pub use json_to_data_set::json_to_data_set;

/// Adds functions to [`DataSet`] for converting to and from the DICOM JSON
/// model.
///
pub trait DataSetJsonExtensions
where
  Self: Sized,
{
  /// Converts a data set to DICOM JSON.
  ///
  fn to_json(
    &self,
    config: &DicomJsonConfig,
  ) -> Result<String, JsonSerializeError>;

  /// Converts a data set to DICOM JSON that is written to a stream.
  ///
  fn to_json_stream(
    &self,
    config: &DicomJsonConfig,
    stream: &mut dyn Write,
  ) -> Result<(), JsonSerializeError>;

  /// Constructs a new data set from DICOM JSON.
  ///
  fn from_json(json: &str) -> Result<Self, JsonDeserializeError>;
}

impl DataSetJsonExtensions for DataSet {
  fn to_json(
    &self,
    config: &DicomJsonConfig,
  ) -> Result<String, JsonSerializeError> {
    let mut bytes = vec![];
    self.to_json_stream(config, &mut bytes)?;

    String::from_utf8(bytes).map_err(|e| {
      JsonSerializeError::IoError(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        e,
      ))
    })
  }

  fn to_json_stream(
    &self,
    config: &DicomJsonConfig,
    stream: &mut dyn Write,
  ) -> Result<(), JsonSerializeError> {
    let json = data_set_to_json(self).map_err(JsonSerializeError::DataError)?;

    let result = if config.pretty_print {
      serde_json::to_writer_pretty(&mut *stream, &json)
    } else {
      serde_json::to_writer(&mut *stream, &json)
    };

    result.map_err(|e| JsonSerializeError::IoError(e.into()))?;

    stream.flush().map_err(JsonSerializeError::IoError)
  }

  fn from_json(json: &str) -> Result<Self, JsonDeserializeError> {
    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
      JsonDeserializeError::JsonInvalid {
        details: e.to_string(),
        path: dcmanon_core::DataSetPath::new(),
      }
    })?;

    json_to_data_set(&value)
  }
}
