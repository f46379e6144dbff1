//! The document model that anonymization operates on.

use std::path::Path;

use dcmanon_core::{DataElementTag, DataElementValue, DataSet};

use crate::persist::{PersistError, persist_data_set};

/// A single loaded record, e.g. an RT Plan or a CT image, that supports the
/// operations needed to anonymize it.
///
/// Writes through [`Document::set()`] only ever replace fields that are
/// already present, so anonymization never introduces new fields.
///
pub trait Document: Sized {
  /// Returns whether a field is present in the document.
  ///
  fn has(&self, tag: DataElementTag) -> bool;

  /// Returns the text value of a field, if it's present and holds a single
  /// value.
  ///
  fn get(&self, tag: DataElementTag) -> Option<&str>;

  /// Replaces the value of a field. Does nothing if the field isn't present.
  ///
  fn set(&mut self, tag: DataElementTag, value: &str);

  /// Removes all private fields, including those in nested sub-lists.
  ///
  fn strip_private(&mut self);

  /// Returns the elements of a sub-list, e.g. the items of the Beam Sequence.
  /// Returns no elements if the sub-list isn't present.
  ///
  fn sub_list_mut(&mut self, tag: DataElementTag) -> &mut [Self];

  /// Writes the document to the given path.
  ///
  fn persist(&self, path: &Path, overwrite: bool) -> Result<(), PersistError>;
}

impl Document for DataSet {
  fn has(&self, tag: DataElementTag) -> bool {
    DataSet::has(self, tag)
  }

  fn get(&self, tag: DataElementTag) -> Option<&str> {
    self.get_string(tag).ok()
  }

  fn set(&mut self, tag: DataElementTag, value: &str) {
    let vr = match self.get_value(tag) {
      Ok(existing) => existing.value_representation(),
      Err(_) => return,
    };

    // A value the existing VR can't hold is stored as raw text under the
    // Unknown VR, so the original value is always replaced
    let new_value =
      DataElementValue::new_with_text(vr, value).unwrap_or_else(|e| {
        tracing::warn!(
          %tag,
          %vr,
          error = %e,
          "Replacement value doesn't fit VR"
        );

        DataElementValue::new_unknown(value.as_bytes().to_vec())
      });

    self.insert(tag, new_value);
  }

  fn strip_private(&mut self) {
    self.delete_private_elements();
  }

  fn sub_list_mut(&mut self, tag: DataElementTag) -> &mut [Self] {
    match self.get_sequence_items_mut(tag) {
      Ok(items) => items.as_mut_slice(),
      Err(_) => &mut [],
    }
  }

  fn persist(&self, path: &Path, overwrite: bool) -> Result<(), PersistError> {
    persist_data_set(self, path, overwrite)
  }
}
