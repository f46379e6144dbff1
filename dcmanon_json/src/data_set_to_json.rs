//! Converts a data set to the DICOM JSON model.

use base64::prelude::*;
use serde_json::{Map, Number, Value};

use dcmanon_core::{
  DataElementValue, DataError, DataSet, DataSetPath, NumberValue,
  PersonNameValue,
};

/// Converts a data set to a DICOM JSON object. Every data element in the data
/// set is converted, including ones in nested sequence items.
///
pub fn data_set_to_json(data_set: &DataSet) -> Result<Value, DataError> {
  let mut path = DataSetPath::new();
  data_set_to_json_object(data_set, &mut path).map(Value::Object)
}

fn data_set_to_json_object(
  data_set: &DataSet,
  path: &mut DataSetPath,
) -> Result<Map<String, Value>, DataError> {
  let mut object = Map::new();

  for (tag, value) in data_set {
    path
      .add_data_element(*tag)
      .map_err(|_| DataError::new_value_invalid("Invalid path".to_string()))?;

    object.insert(tag.to_hex_string(), element_to_json(value, path)?);

    let _ = path.pop();
  }

  Ok(object)
}

fn element_to_json(
  value: &DataElementValue,
  path: &mut DataSetPath,
) -> Result<Value, DataError> {
  let mut object = Map::new();
  object.insert(
    "vr".to_string(),
    Value::String(value.value_representation().to_str().to_string()),
  );

  if let Ok(strings) = value.text_values() {
    if !strings.is_empty() {
      let values = strings
        .iter()
        .map(|s| {
          let s = s.trim_end_matches(['\0', ' ']);
          if s.is_empty() {
            Value::Null
          } else {
            Value::String(s.to_string())
          }
        })
        .collect();

      object.insert("Value".to_string(), Value::Array(values));
    }
  } else if let Ok(names) = value.person_names() {
    if !names.is_empty() {
      let values = names.iter().map(person_name_to_json).collect();
      object.insert("Value".to_string(), Value::Array(values));
    }
  } else if let Ok(numbers) = value.numbers() {
    if !numbers.is_empty() {
      let values = numbers
        .iter()
        .map(|n| number_to_json(n).map_err(|e| e.with_path(path)))
        .collect::<Result<Vec<_>, _>>()?;

      object.insert("Value".to_string(), Value::Array(values));
    }
  } else if let Ok(bytes) = value.bytes() {
    if !bytes.is_empty() {
      object.insert(
        "InlineBinary".to_string(),
        Value::String(BASE64_STANDARD.encode(bytes)),
      );
    }
  } else if let Ok(uri) = value.bulk_data_uri() {
    object.insert("BulkDataURI".to_string(), Value::String(uri.to_string()));
  } else if let Ok(items) = value.sequence_items() {
    if !items.is_empty() {
      let mut values = Vec::with_capacity(items.len());

      for (index, item) in items.iter().enumerate() {
        path.add_sequence_item(index).map_err(|_| {
          DataError::new_value_invalid("Invalid path".to_string())
        })?;

        values.push(Value::Object(data_set_to_json_object(item, path)?));

        let _ = path.pop();
      }

      object.insert("Value".to_string(), Value::Array(values));
    }
  }

  Ok(Value::Object(object))
}

fn person_name_to_json(name: &PersonNameValue) -> Value {
  if name.is_empty() {
    return Value::Null;
  }

  let mut object = Map::new();

  for (key, component) in [
    ("Alphabetic", &name.alphabetic),
    ("Ideographic", &name.ideographic),
    ("Phonetic", &name.phonetic),
  ] {
    if let Some(component) = component {
      object.insert(key.to_string(), Value::String(component.clone()));
    }
  }

  Value::Object(object)
}

fn number_to_json(number: &NumberValue) -> Result<Value, DataError> {
  match number {
    NumberValue::Int(i) => Ok(Value::Number(Number::from(*i))),
    NumberValue::UInt(u) => Ok(Value::Number(Number::from(*u))),
    NumberValue::Float(f) => Number::from_f64(*f).map(Value::Number).ok_or_else(
      || DataError::new_value_invalid(format!("{f} is not a finite number")),
    ),
  }
}
