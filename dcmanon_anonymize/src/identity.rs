//! Allocation of synthetic identifiers.
//!
//! Identifiers are random version 4 UUIDs in their canonical hyphenated form.
//! They aren't derived from the source data in any way, so they can't be used
//! to recover the original identity.

use uuid::Uuid;

/// The synthetic name and patient ID given to every document of one patient.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityPair {
  pub name: String,
  pub patient_id: String,
}

/// Mints a new identity pair for a patient. The name and patient ID are
/// independent random values.
///
pub fn new_patient_identity() -> IdentityPair {
  IdentityPair {
    name: new_record_id(),
    patient_id: new_record_id(),
  }
}

/// Mints a new random identifier, used for study and series keys and for the
/// output directories named after them.
///
pub fn new_record_id() -> String {
  Uuid::new_v4().hyphenated().to_string()
}
