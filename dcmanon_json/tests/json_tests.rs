use dcmanon_core::{
  DataElementTag, DataElementValue, DataSet, DataSetPath, NumberValue,
  PersonNameValue, ValueRepresentation, dictionary,
};
use dcmanon_json::{
  DataSetJsonExtensions, DicomJsonConfig, JsonDeserializeError,
};

const PLAN_JSON: &str = r#"{
  "00080060": { "vr": "CS", "Value": ["RTPLAN"] },
  "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^Jane" }] },
  "00101030": { "vr": "DS", "Value": [72.5] },
  "00200013": { "vr": "IS", "Value": ["4"] },
  "300A00B0": {
    "vr": "SQ",
    "Value": [
      {
        "00080070": { "vr": "LO", "Value": ["Acme"] },
        "300900A0": { "vr": "OB", "InlineBinary": "AQID" }
      },
      {}
    ]
  },
  "7FE00010": { "vr": "OW", "BulkDataURI": "http://host/pixels" }
}"#;

#[test]
fn read_plan_json() {
  let data_set = DataSet::from_json(PLAN_JSON).unwrap();

  assert_eq!(data_set.size(), 6);
  assert_eq!(data_set.get_string(dictionary::MODALITY.tag), Ok("RTPLAN"));
  assert_eq!(data_set.get_string(dictionary::PATIENT_NAME.tag), Ok("Doe^Jane"));
  assert_eq!(data_set.get_int(dictionary::INSTANCE_NUMBER.tag), Ok(4));

  assert_eq!(
    data_set
      .get_value(dictionary::PATIENT_WEIGHT.tag)
      .unwrap()
      .numbers(),
    Ok([NumberValue::Float(72.5)].as_slice())
  );

  let beams = data_set
    .get_sequence_items(dictionary::BEAM_SEQUENCE.tag)
    .unwrap();
  assert_eq!(beams.len(), 2);
  assert_eq!(
    beams[0]
      .get_value(DataElementTag::new(0x3009, 0x00A0))
      .unwrap()
      .bytes(),
    Ok([1u8, 2, 3].as_slice())
  );
  assert!(beams[1].is_empty());

  assert_eq!(
    data_set
      .get_value(dictionary::PIXEL_DATA.tag)
      .unwrap()
      .bulk_data_uri(),
    Ok("http://host/pixels")
  );
}

#[test]
fn write_then_read_preserves_all_elements() {
  let data_set = DataSet::from_json(PLAN_JSON).unwrap();

  let json = data_set.to_json(&DicomJsonConfig::default()).unwrap();

  assert_eq!(DataSet::from_json(&json), Ok(data_set));
}

#[test]
fn write_empty_values_as_null() {
  let mut data_set = DataSet::new();
  data_set.insert(
    dictionary::OTHER_PATIENT_IDS.tag,
    DataElementValue::new_text(
      ValueRepresentation::LongString,
      vec!["A".to_string(), "".to_string()],
    )
    .unwrap(),
  );
  data_set.insert(
    dictionary::REFERRING_PHYSICIAN_NAME.tag,
    DataElementValue::new_person_name(vec![PersonNameValue::default()]),
  );
  data_set.insert(
    dictionary::ACCESSION_NUMBER.tag,
    DataElementValue::new_text(ValueRepresentation::ShortString, vec![])
      .unwrap(),
  );

  assert_eq!(
    data_set.to_json(&DicomJsonConfig::default()).unwrap(),
    concat!(
      r#"{"00080050":{"vr":"SH"},"#,
      r#""00080090":{"vr":"PN","Value":[null]},"#,
      r#""00101000":{"vr":"LO","Value":["A",null]}}"#
    )
  );
}

#[test]
fn read_invalid_decimal_string_as_text() {
  let data_set = DataSet::from_json(
    r#"{ "00101020": { "vr": "DS", "Value": ["1.7m", null] } }"#,
  )
  .unwrap();

  let value = data_set.get_value(dictionary::PATIENT_SIZE.tag).unwrap();
  assert_eq!(value.value_representation(), ValueRepresentation::DecimalString);
  assert_eq!(value.get_strings(), Ok(vec!["1.7m", ""]));
}

#[test]
fn read_invalid_json() {
  let mut path = DataSetPath::new();
  path.add_data_element(dictionary::BEAM_SEQUENCE.tag).unwrap();
  path.add_sequence_item(0).unwrap();
  path.add_data_element(dictionary::MANUFACTURER.tag).unwrap();

  assert_eq!(
    DataSet::from_json(
      r#"{ "300A00B0": { "vr": "SQ", "Value": [
        { "00080070": { "vr": "XX" } }
      ] } }"#
    ),
    Err(JsonDeserializeError::JsonInvalid {
      details: "Invalid VR: XX".to_string(),
      path,
    })
  );

  assert!(DataSet::from_json(r#"{ "0010": { "vr": "PN" } }"#).is_err());
  assert!(DataSet::from_json(r#"[]"#).is_err());
  assert!(
    DataSet::from_json(r#"{ "00100010": { "vr": "PN", "InlineBinary": "" } }"#)
      .is_err()
  );
}
