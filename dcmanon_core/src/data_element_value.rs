//! A data element value that can hold any of the DICOM value representations.
//! Data element values are usually stored in a [`DataSet`] which maps data
//! element tags to data element values.

use crate::{DataError, DataSet, ValueRepresentation};

pub mod person_name;

pub use person_name::PersonNameValue;

/// A DICOM data element value that holds one of the following types of data:
///
/// 1. Text value. Holds zero or more strings for a string VR. An empty string
///    is an empty value in a multi-valued element.
///
/// 2. Person name value. Holds zero or more person names, each split into
///    alphabetic, ideographic, and phonetic component groups.
///
/// 3. Numeric value. Holds zero or more numbers for a numeric VR, including
///    the string-encoded DS and IS VRs.
///
/// 4. Binary value. Holds raw little endian bytes for one of the 'Other' VRs
///    or the Unknown VR.
///
/// 5. Bulk data URI value. Holds a reference to binary data that is stored
///    outside of the data set.
///
/// 6. Sequence value. Holds a list of nested data sets used to create
///    hierarchies of data elements in a DICOM data set.
///
/// Every value carries its VR so it can be written back out unchanged.
///
/// Ref: PS3.5 6.2, PS3.18 F.2.
///
#[derive(Clone, Debug, PartialEq)]
pub struct DataElementValue(RawDataElementValue);

#[derive(Clone, Debug, PartialEq)]
#[allow(clippy::enum_variant_names)]
enum RawDataElementValue {
  TextValue {
    vr: ValueRepresentation,
    values: Vec<String>,
  },
  PersonNameValue {
    values: Vec<PersonNameValue>,
  },
  NumericValue {
    vr: ValueRepresentation,
    values: Vec<NumberValue>,
  },
  BinaryValue {
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  },
  BulkDataUriValue {
    vr: ValueRepresentation,
    uri: String,
  },
  SequenceValue {
    items: Vec<DataSet>,
  },
}

/// A single number in a numeric data element value.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberValue {
  Int(i64),
  UInt(u64),
  Float(f64),
}

impl NumberValue {
  /// Parses a number from a string. Integers are preferred over floats, and
  /// non-finite floats are rejected.
  ///
  pub fn parse(s: &str) -> Result<Self, ()> {
    let s = s.trim();

    if let Ok(i) = s.parse::<i64>() {
      return Ok(Self::Int(i));
    }

    if let Ok(u) = s.parse::<u64>() {
      return Ok(Self::UInt(u));
    }

    match s.parse::<f64>() {
      Ok(f) if f.is_finite() => Ok(Self::Float(f)),
      _ => Err(()),
    }
  }
}

impl core::fmt::Display for NumberValue {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Int(i) => write!(f, "{i}"),
      Self::UInt(u) => write!(f, "{u}"),
      Self::Float(x) => write!(f, "{x}"),
    }
  }
}

impl DataElementValue {
  /// Constructs a new text value. The VR must be a string VR, or one of the
  /// string-encoded numeric VRs when the values aren't all valid numbers.
  ///
  pub fn new_text(
    vr: ValueRepresentation,
    values: Vec<String>,
  ) -> Result<Self, DataError> {
    let is_numeric_string = vr == ValueRepresentation::DecimalString
      || vr == ValueRepresentation::IntegerString;

    if !vr.is_string() && !is_numeric_string {
      return Err(DataError::new_value_invalid(format!(
        "VR {vr} does not hold text"
      )));
    }

    Ok(Self(RawDataElementValue::TextValue { vr, values }))
  }

  /// Constructs a new person name value.
  ///
  pub fn new_person_name(values: Vec<PersonNameValue>) -> Self {
    Self(RawDataElementValue::PersonNameValue { values })
  }

  /// Constructs a new numeric value. The VR must be a numeric VR.
  ///
  pub fn new_numeric(
    vr: ValueRepresentation,
    values: Vec<NumberValue>,
  ) -> Result<Self, DataError> {
    if !vr.is_numeric() {
      return Err(DataError::new_value_invalid(format!(
        "VR {vr} does not hold numbers"
      )));
    }

    Ok(Self(RawDataElementValue::NumericValue { vr, values }))
  }

  /// Constructs a new binary value. The VR must be one of the 'Other' VRs or
  /// the Unknown VR.
  ///
  pub fn new_binary(
    vr: ValueRepresentation,
    bytes: Vec<u8>,
  ) -> Result<Self, DataError> {
    if !vr.is_binary() {
      return Err(DataError::new_value_invalid(format!(
        "VR {vr} does not hold binary data"
      )));
    }

    Ok(Self(RawDataElementValue::BinaryValue { vr, bytes }))
  }

  /// Constructs a new value with the Unknown VR holding the given bytes.
  ///
  pub fn new_unknown(bytes: Vec<u8>) -> Self {
    Self(RawDataElementValue::BinaryValue {
      vr: ValueRepresentation::Unknown,
      bytes,
    })
  }

  /// Constructs a new bulk data URI value.
  ///
  pub fn new_bulk_data_uri(
    vr: ValueRepresentation,
    uri: String,
  ) -> Result<Self, DataError> {
    if vr == ValueRepresentation::Sequence {
      return Err(DataError::new_value_invalid(
        "Sequences can't be bulk data".to_string(),
      ));
    }

    Ok(Self(RawDataElementValue::BulkDataUriValue { vr, uri }))
  }

  /// Constructs a new sequence value.
  ///
  pub fn new_sequence(items: Vec<DataSet>) -> Self {
    Self(RawDataElementValue::SequenceValue { items })
  }

  /// Constructs a value of the given VR that holds a single piece of text.
  /// Person names take the text as their alphabetic component, numeric VRs
  /// parse it, and binary VRs store its bytes. Text that isn't a valid number
  /// for a numeric VR is an error, as are sequences.
  ///
  pub fn new_with_text(
    vr: ValueRepresentation,
    text: &str,
  ) -> Result<Self, DataError> {
    match vr {
      ValueRepresentation::PersonName => {
        Ok(Self::new_person_name(vec![PersonNameValue::new_alphabetic(text)]))
      }

      ValueRepresentation::Sequence => Err(DataError::new_value_invalid(
        "Sequences can't hold text".to_string(),
      )),

      _ if vr.is_numeric() => {
        let values = if text.trim().is_empty() {
          vec![]
        } else {
          let number = NumberValue::parse(text).map_err(|_| {
            DataError::new_value_invalid(format!(
              "'{text}' is not a valid {vr} value"
            ))
          })?;

          vec![number]
        };

        Self::new_numeric(vr, values)
      }

      _ if vr.is_binary() => Self::new_binary(vr, text.as_bytes().to_vec()),

      _ => Self::new_text(vr, vec![text.to_string()]),
    }
  }

  /// Returns the value representation for a data element value.
  ///
  pub fn value_representation(&self) -> ValueRepresentation {
    match &self.0 {
      RawDataElementValue::TextValue { vr, .. }
      | RawDataElementValue::NumericValue { vr, .. }
      | RawDataElementValue::BinaryValue { vr, .. }
      | RawDataElementValue::BulkDataUriValue { vr, .. } => *vr,
      RawDataElementValue::PersonNameValue { .. } => {
        ValueRepresentation::PersonName
      }
      RawDataElementValue::SequenceValue { .. } => {
        ValueRepresentation::Sequence
      }
    }
  }

  /// Returns the string contained in a data element value. For person names
  /// this is the alphabetic component group of the name. This is only
  /// supported when exactly one value is present.
  ///
  pub fn get_string(&self) -> Result<&str, DataError> {
    let strings = self.get_strings()?;

    match strings.as_slice() {
      [s] => Ok(s),
      _ => Err(DataError::new_multiplicity_mismatch()),
    }
  }

  /// Returns the strings contained in a data element value.
  ///
  pub fn get_strings(&self) -> Result<Vec<&str>, DataError> {
    match &self.0 {
      RawDataElementValue::TextValue { values, .. } => {
        Ok(values.iter().map(|s| s.trim_end_matches(['\0', ' '])).collect())
      }

      RawDataElementValue::PersonNameValue { values } => Ok(
        values
          .iter()
          .map(|name| name.alphabetic.as_deref().unwrap_or(""))
          .collect(),
      ),

      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For text values, returns the raw strings without any trimming.
  ///
  pub fn text_values(&self) -> Result<&[String], DataError> {
    match &self.0 {
      RawDataElementValue::TextValue { values, .. } => Ok(values),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For person name values, returns the names.
  ///
  pub fn person_names(&self) -> Result<&[PersonNameValue], DataError> {
    match &self.0 {
      RawDataElementValue::PersonNameValue { values } => Ok(values),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For numeric values, returns the numbers.
  ///
  pub fn numbers(&self) -> Result<&[NumberValue], DataError> {
    match &self.0 {
      RawDataElementValue::NumericValue { values, .. } => Ok(values),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// Returns the single integer in a numeric value. Floats with no fractional
  /// part are accepted, which is common for IS values written by some
  /// systems.
  ///
  pub fn get_int(&self) -> Result<i64, DataError> {
    match self.numbers()? {
      [NumberValue::Int(i)] => Ok(*i),
      [NumberValue::UInt(u)] => i64::try_from(*u).map_err(|_| {
        DataError::new_value_invalid(format!("{u} is out of range"))
      }),
      [NumberValue::Float(f)] if f.fract() == 0.0 => Ok(*f as i64),
      [_] => Err(DataError::new_value_invalid(
        "Value is not an integer".to_string(),
      )),
      _ => Err(DataError::new_multiplicity_mismatch()),
    }
  }

  /// For binary values, returns the bytes.
  ///
  pub fn bytes(&self) -> Result<&[u8], DataError> {
    match &self.0 {
      RawDataElementValue::BinaryValue { bytes, .. } => Ok(bytes),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For bulk data values, returns the URI of the bulk data.
  ///
  pub fn bulk_data_uri(&self) -> Result<&str, DataError> {
    match &self.0 {
      RawDataElementValue::BulkDataUriValue { uri, .. } => Ok(uri),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a reference to the
  /// sequence's items.
  ///
  pub fn sequence_items(&self) -> Result<&[DataSet], DataError> {
    match &self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }

  /// For data element values that hold a sequence, returns a mutable reference
  /// to the sequence's items.
  ///
  pub fn sequence_items_mut(&mut self) -> Result<&mut Vec<DataSet>, DataError> {
    match &mut self.0 {
      RawDataElementValue::SequenceValue { items } => Ok(items),
      _ => Err(DataError::new_value_not_present()),
    }
  }
}
