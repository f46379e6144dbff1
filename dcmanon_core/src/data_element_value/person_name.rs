//! Work with the DICOM `PersonName` value representation.
//!
//! Ref: PS3.5 6.2.1, PS3.18 F.2.2.

/// A single person name, made up of up to three component groups. Each group
/// holds the `^`-delimited name components in a different representation.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonNameValue {
  pub alphabetic: Option<String>,
  pub ideographic: Option<String>,
  pub phonetic: Option<String>,
}

impl PersonNameValue {
  /// Constructs a person name with only an alphabetic component group. An
  /// empty string gives an empty person name.
  ///
  pub fn new_alphabetic(name: &str) -> Self {
    Self {
      alphabetic: if name.is_empty() {
        None
      } else {
        Some(name.to_string())
      },
      ideographic: None,
      phonetic: None,
    }
  }

  /// Returns whether none of the component groups are present.
  ///
  pub fn is_empty(&self) -> bool {
    self.alphabetic.is_none()
      && self.ideographic.is_none()
      && self.phonetic.is_none()
  }
}
