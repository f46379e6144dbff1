//! Converts DICOM JSON into a data set.

use base64::prelude::*;
use serde_json::{Map, Value};

use dcmanon_core::{
  DataElementTag, DataElementValue, DataSet, DataSetPath, NumberValue,
  PersonNameValue, ValueRepresentation,
};

use crate::JsonDeserializeError;

/// Converts a DICOM JSON object into a data set.
///
pub fn json_to_data_set(json: &Value) -> Result<DataSet, JsonDeserializeError> {
  let mut path = DataSetPath::new();

  match json {
    Value::Object(object) => json_object_to_data_set(object, &mut path),
    _ => Err(JsonDeserializeError::new("Root is not an object", &path)),
  }
}

fn json_object_to_data_set(
  object: &Map<String, Value>,
  path: &mut DataSetPath,
) -> Result<DataSet, JsonDeserializeError> {
  let mut data_set = DataSet::new();

  for (key, element) in object {
    let tag = DataElementTag::from_hex_string(key).map_err(|_| {
      let details = format!("Invalid data element tag: {key}");
      JsonDeserializeError::new(details, path)
    })?;

    path
      .add_data_element(tag)
      .map_err(|_| JsonDeserializeError::new("Invalid data set path", path))?;

    let value = json_to_element(element, path)?;
    data_set.insert(tag, value);

    let _ = path.pop();
  }

  Ok(data_set)
}

fn json_to_element(
  element: &Value,
  path: &mut DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let Value::Object(element) = element else {
    return Err(JsonDeserializeError::new(
      "Data element is not an object",
      path,
    ));
  };

  let vr = match element.get("vr") {
    Some(Value::String(vr)) => {
      ValueRepresentation::from_str(vr).map_err(|_| {
        JsonDeserializeError::new(format!("Invalid VR: {vr}"), path)
      })
    }
    _ => Err(JsonDeserializeError::new("VR is missing", path)),
  }?;

  if let Some(uri) = element.get("BulkDataURI") {
    let Value::String(uri) = uri else {
      return Err(JsonDeserializeError::new(
        "BulkDataURI is not a string",
        path,
      ));
    };

    return DataElementValue::new_bulk_data_uri(vr, uri.clone())
      .map_err(|e| JsonDeserializeError::new(e.to_string(), path));
  }

  if let Some(inline_binary) = element.get("InlineBinary") {
    if !vr.is_binary() {
      return Err(JsonDeserializeError::new(
        format!("InlineBinary is not valid for VR {vr}"),
        path,
      ));
    }

    let Value::String(inline_binary) = inline_binary else {
      return Err(JsonDeserializeError::new(
        "InlineBinary is not a string",
        path,
      ));
    };

    let bytes = BASE64_STANDARD.decode(inline_binary).map_err(|e| {
      JsonDeserializeError::new(format!("InlineBinary is invalid: {e}"), path)
    })?;

    return DataElementValue::new_binary(vr, bytes)
      .map_err(|e| JsonDeserializeError::new(e.to_string(), path));
  }

  let values: &[Value] = match element.get("Value") {
    None | Some(Value::Null) => &[],
    Some(Value::Array(values)) => values.as_slice(),
    Some(_) => {
      return Err(JsonDeserializeError::new("Value is not an array", path));
    }
  };

  match vr {
    ValueRepresentation::Sequence => {
      let mut items = Vec::with_capacity(values.len());

      for (index, item) in values.iter().enumerate() {
        let Value::Object(item) = item else {
          return Err(JsonDeserializeError::new(
            "Sequence item is not an object",
            path,
          ));
        };

        path.add_sequence_item(index).map_err(|_| {
          JsonDeserializeError::new("Invalid data set path", path)
        })?;

        items.push(json_object_to_data_set(item, path)?);

        let _ = path.pop();
      }

      Ok(DataElementValue::new_sequence(items))
    }

    ValueRepresentation::PersonName => {
      let names = values
        .iter()
        .map(|name| json_to_person_name(name, path))
        .collect::<Result<Vec<_>, _>>()?;

      Ok(DataElementValue::new_person_name(names))
    }

    _ if vr.is_numeric() => json_to_numeric(vr, values, path),

    _ if vr.is_binary() => {
      if values.is_empty() {
        DataElementValue::new_binary(vr, vec![])
          .map_err(|e| JsonDeserializeError::new(e.to_string(), path))
      } else {
        Err(JsonDeserializeError::new(
          format!("Value is not valid for VR {vr}"),
          path,
        ))
      }
    }

    _ => {
      let strings = values
        .iter()
        .map(|value| match value {
          Value::Null => Ok(String::new()),
          Value::String(s) => Ok(s.clone()),
          Value::Number(n) => Ok(n.to_string()),
          _ => Err(JsonDeserializeError::new(
            format!("Value is not valid for VR {vr}"),
            path,
          )),
        })
        .collect::<Result<Vec<_>, _>>()?;

      DataElementValue::new_text(vr, strings)
        .map_err(|e| JsonDeserializeError::new(e.to_string(), path))
    }
  }
}

/// Numeric values are normally JSON numbers, but DS and IS values that aren't
/// valid numbers, or that are empty, are kept as text so they're preserved.
///
fn json_to_numeric(
  vr: ValueRepresentation,
  values: &[Value],
  path: &DataSetPath,
) -> Result<DataElementValue, JsonDeserializeError> {
  let numbers: Option<Vec<NumberValue>> = values
    .iter()
    .map(|value| match value {
      Value::Number(n) => {
        if let Some(i) = n.as_i64() {
          Some(NumberValue::Int(i))
        } else if let Some(u) = n.as_u64() {
          Some(NumberValue::UInt(u))
        } else {
          n.as_f64().map(NumberValue::Float)
        }
      }
      Value::String(s) => NumberValue::parse(s).ok(),
      _ => None,
    })
    .collect();

  if let Some(numbers) = numbers {
    return DataElementValue::new_numeric(vr, numbers)
      .map_err(|e| JsonDeserializeError::new(e.to_string(), path));
  }

  let strings = values
    .iter()
    .map(|value| match value {
      Value::Null => Ok(String::new()),
      Value::String(s) => Ok(s.clone()),
      Value::Number(n) => Ok(n.to_string()),
      _ => Err(JsonDeserializeError::new(
        format!("Value is not valid for VR {vr}"),
        path,
      )),
    })
    .collect::<Result<Vec<_>, _>>()?;

  DataElementValue::new_text(vr, strings)
    .map_err(|e| JsonDeserializeError::new(e.to_string(), path))
}

fn json_to_person_name(
  value: &Value,
  path: &DataSetPath,
) -> Result<PersonNameValue, JsonDeserializeError> {
  match value {
    Value::Null => Ok(PersonNameValue::default()),

    Value::Object(object) => {
      let component = |key: &str| match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(JsonDeserializeError::new(
          format!("Person name {key} is not a string"),
          path,
        )),
      };

      Ok(PersonNameValue {
        alphabetic: component("Alphabetic")?,
        ideographic: component("Ideographic")?,
        phonetic: component("Phonetic")?,
      })
    }

    _ => Err(JsonDeserializeError::new(
      "Person name is not an object",
      path,
    )),
  }
}
