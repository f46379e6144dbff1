//! The field policy tables that say which fields are overwritten for each
//! document role, and with what.
//!
//! Every entry is applied only when its field is present in the source
//! document. Sub-list policies apply the same overwrite to every element of a
//! sub-list, e.g. to every beam in a plan.

use dcmanon_core::dictionary::{self, Item};

use crate::{Document, IdentityPair};

/// The value written into a field.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placeholder {
  /// A fixed value.
  Text(&'static str),

  /// The synthetic name of the patient.
  IdentityName,

  /// The synthetic ID of the patient.
  IdentityPatientId,
}

impl Placeholder {
  /// Returns the value to write for a patient with the given identity.
  ///
  pub fn resolve<'a>(&self, identity: &'a IdentityPair) -> &'a str {
    match self {
      Self::Text(text) => *text,
      Self::IdentityName => &identity.name,
      Self::IdentityPatientId => &identity.patient_id,
    }
  }
}

/// A single field and the placeholder that overwrites it.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldPolicy {
  pub item: Item,
  pub placeholder: Placeholder,
}

/// A sub-list whose every element has the given field policies applied.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SubListPolicy {
  pub sequence: Item,
  pub fields: &'static [FieldPolicy],
}

/// The policy for one document role.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RolePolicy {
  /// Whether the common fields are overwritten, and private fields stripped
  /// when requested.
  pub common: bool,

  pub fields: &'static [FieldPolicy],
  pub sub_lists: &'static [SubListPolicy],
}

const fn text(item: Item, text: &'static str) -> FieldPolicy {
  FieldPolicy {
    item,
    placeholder: Placeholder::Text(text),
  }
}

const DATE: &str = "19010101";
const TIME: &str = "000000";

/// Fields overwritten in plans, doses, and images. Structure sets don't have
/// these applied.
///
pub const COMMON_FIELDS: &[FieldPolicy] = &[
  FieldPolicy {
    item: dictionary::PATIENT_NAME,
    placeholder: Placeholder::IdentityName,
  },
  FieldPolicy {
    item: dictionary::PATIENT_ID,
    placeholder: Placeholder::IdentityPatientId,
  },
  FieldPolicy {
    item: dictionary::OTHER_PATIENT_IDS,
    placeholder: Placeholder::IdentityPatientId,
  },
  FieldPolicy {
    item: dictionary::OTHER_PATIENT_NAMES,
    placeholder: Placeholder::IdentityName,
  },
  text(dictionary::INSTANCE_CREATION_DATE, DATE),
  text(dictionary::INSTANCE_CREATION_TIME, TIME),
  text(dictionary::STUDY_DATE, DATE),
  text(dictionary::STUDY_TIME, TIME),
  text(dictionary::ACCESSION_NUMBER, ""),
  text(dictionary::MANUFACTURER, "manufacturer"),
  text(dictionary::REFERRING_PHYSICIAN_NAME, "physician"),
  text(dictionary::STATION_NAME, "station"),
  text(dictionary::NAME_OF_PHYSICIANS_READING_STUDY, "physician"),
  text(dictionary::OPERATORS_NAME, "operator"),
  text(dictionary::PHYSICIANS_OF_RECORD, "physician"),
  text(dictionary::MANUFACTURER_MODEL_NAME, "model"),
  text(dictionary::PATIENT_BIRTH_DATE, ""),
  text(dictionary::PATIENT_SEX, "O"),
  text(dictionary::PATIENT_AGE, "000Y"),
  text(dictionary::PATIENT_WEIGHT, "0"),
  text(dictionary::PATIENT_SIZE, "0"),
  text(dictionary::PATIENT_ADDRESS, "address"),
  text(dictionary::ADDITIONAL_PATIENT_HISTORY, ""),
  text(dictionary::ETHNIC_GROUP, "ethnicity"),
  text(dictionary::STUDY_ID, "1"),
  text(dictionary::DEVICE_SERIAL_NUMBER, "0"),
  text(dictionary::SOFTWARE_VERSIONS, "1.0"),
  text(dictionary::REVIEW_DATE, DATE),
  text(dictionary::REVIEW_TIME, TIME),
  text(dictionary::REVIEWER_NAME, "anonymous"),
];

pub const STRUCTURE_SET_POLICY: RolePolicy = RolePolicy {
  common: false,
  fields: &[
    text(dictionary::SERIES_DESCRIPTION, "RT Structure Set"),
    text(dictionary::STRUCTURE_SET_DATE, DATE),
    text(dictionary::STRUCTURE_SET_TIME, TIME),
  ],
  sub_lists: &[SubListPolicy {
    sequence: dictionary::RT_ROI_OBSERVATIONS_SEQUENCE,
    fields: &[text(dictionary::ROI_INTERPRETER, "anonymous")],
  }],
};

pub const PLAN_POLICY: RolePolicy = RolePolicy {
  common: true,
  fields: &[
    text(dictionary::SERIES_DESCRIPTION, "RT Plan"),
    text(dictionary::RT_PLAN_NAME, "plan"),
    text(dictionary::RT_PLAN_DATE, DATE),
    text(dictionary::RT_PLAN_TIME, TIME),
  ],
  sub_lists: &[
    SubListPolicy {
      sequence: dictionary::TOLERANCE_TABLE_SEQUENCE,
      fields: &[text(dictionary::TOLERANCE_TABLE_LABEL, "tolerance")],
    },
    SubListPolicy {
      sequence: dictionary::BEAM_SEQUENCE,
      fields: &[
        text(dictionary::MANUFACTURER, "manufacturer"),
        text(dictionary::INSTITUTION_NAME, "institution"),
        text(dictionary::INSTITUTION_ADDRESS, "address"),
        text(dictionary::INSTITUTIONAL_DEPARTMENT_NAME, "department"),
        text(dictionary::MANUFACTURER_MODEL_NAME, "model"),
        text(dictionary::TREATMENT_MACHINE_NAME, "txmachine"),
      ],
    },
    SubListPolicy {
      sequence: dictionary::TREATMENT_MACHINE_SEQUENCE,
      fields: &[
        text(dictionary::MANUFACTURER, "manufacturer"),
        text(dictionary::INSTITUTION_NAME, "vendor"),
        text(dictionary::INSTITUTION_ADDRESS, "address"),
        text(dictionary::INSTITUTIONAL_DEPARTMENT_NAME, "department"),
        text(dictionary::MANUFACTURER_MODEL_NAME, "model"),
        text(dictionary::DEVICE_SERIAL_NUMBER, "0"),
        text(dictionary::TREATMENT_MACHINE_NAME, "txmachine"),
      ],
    },
    SubListPolicy {
      sequence: dictionary::SOURCE_SEQUENCE,
      fields: &[
        text(dictionary::SOURCE_MANUFACTURER, "manufacturer"),
        text(dictionary::SOURCE_ISOTOPE_NAME, "isotope"),
      ],
    },
  ],
};

pub const DOSE_POLICY: RolePolicy = RolePolicy {
  common: true,
  fields: &[text(dictionary::SERIES_DESCRIPTION, "RT Dose")],
  sub_lists: &[],
};

pub const IMAGE_POLICY: RolePolicy = RolePolicy {
  common: true,
  fields: &[
    text(dictionary::SERIES_DATE, DATE),
    text(dictionary::CONTENT_DATE, DATE),
    text(dictionary::SERIES_TIME, TIME),
    text(dictionary::CONTENT_TIME, TIME),
    text(dictionary::INSTITUTION_NAME, "institution"),
    text(dictionary::INSTITUTION_ADDRESS, "address"),
    text(dictionary::INSTITUTIONAL_DEPARTMENT_NAME, "department"),
  ],
  sub_lists: &[],
};

/// Applies a role policy to a document. Returns the number of fields that were
/// overwritten.
///
pub fn apply_policy<D: Document>(
  document: &mut D,
  policy: &RolePolicy,
  identity: &IdentityPair,
  strip_private: bool,
) -> usize {
  let mut written = 0;

  if policy.common {
    if strip_private {
      document.strip_private();
    }

    written += apply_fields(document, COMMON_FIELDS, identity);
  }

  written += apply_fields(document, policy.fields, identity);

  for sub_list in policy.sub_lists {
    for element in document.sub_list_mut(sub_list.sequence.tag) {
      written += apply_fields(element, sub_list.fields, identity);
    }
  }

  written
}

fn apply_fields<D: Document>(
  document: &mut D,
  fields: &[FieldPolicy],
  identity: &IdentityPair,
) -> usize {
  let mut written = 0;

  for field in fields {
    if document.has(field.item.tag) {
      document.set(field.item.tag, field.placeholder.resolve(identity));
      written += 1;
    }
  }

  written
}
