//! A DICOM data set, defined as a map of data element tags to data element
//! values.

use std::collections::BTreeMap;

use crate::{
  DataElementTag, DataElementValue, DataError, DataSetPath, dictionary,
};

/// A DICOM data set that is a mapping of data element tags to data element
/// values. Data elements are kept in tag order.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSet(BTreeMap<DataElementTag, DataElementValue>);

impl DataSet {
  /// Returns a new empty data set.
  ///
  pub fn new() -> Self {
    Self(BTreeMap::new())
  }

  /// Returns the number of data elements in a data set.
  ///
  pub fn size(&self) -> usize {
    self.0.len()
  }

  /// Returns whether a data set is empty and contains no data elements.
  ///
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Returns whether a data element with the specified tag exists in a data
  /// set.
  ///
  pub fn has(&self, tag: DataElementTag) -> bool {
    self.0.contains_key(&tag)
  }

  /// Inserts a data element tag and value into a data set. If there is already
  /// a value for the tag then it is replaced with the new value.
  ///
  pub fn insert(&mut self, tag: DataElementTag, value: DataElementValue) {
    self.0.insert(tag, value);
  }

  /// Deletes a data element from a data set, returning its value if it was
  /// present.
  ///
  pub fn delete(&mut self, tag: DataElementTag) -> Option<DataElementValue> {
    self.0.remove(&tag)
  }

  /// Returns the tags in a data set, in ascending order.
  ///
  pub fn tags(&self) -> Vec<DataElementTag> {
    self.0.keys().copied().collect()
  }

  /// Returns an iterator over the data elements in a data set, in tag order.
  ///
  pub fn iter(
    &self,
  ) -> std::collections::btree_map::Iter<'_, DataElementTag, DataElementValue>
  {
    self.0.iter()
  }

  /// Retains only the data elements for which the predicate returns true.
  ///
  pub fn retain(
    &mut self,
    mut f: impl FnMut(&DataElementTag, &mut DataElementValue) -> bool,
  ) {
    self.0.retain(|tag, value| f(tag, value));
  }

  /// Returns the value for a data element in a data set.
  ///
  pub fn get_value(
    &self,
    tag: DataElementTag,
  ) -> Result<&DataElementValue, DataError> {
    self.0.get(&tag).ok_or_else(|| {
      DataError::new_tag_not_present()
        .with_path(&DataSetPath::new_with_data_element(tag))
    })
  }

  /// Returns a mutable reference to the value for a data element in a data
  /// set.
  ///
  pub fn get_value_mut(
    &mut self,
    tag: DataElementTag,
  ) -> Result<&mut DataElementValue, DataError> {
    self.0.get_mut(&tag).ok_or_else(|| {
      DataError::new_tag_not_present()
        .with_path(&DataSetPath::new_with_data_element(tag))
    })
  }

  /// Returns the single string value for a data element in a data set.
  ///
  pub fn get_string(&self, tag: DataElementTag) -> Result<&str, DataError> {
    self
      .get_value(tag)?
      .get_string()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Returns the single integer value for a data element in a data set.
  ///
  pub fn get_int(&self, tag: DataElementTag) -> Result<i64, DataError> {
    self
      .get_value(tag)?
      .get_int()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Returns the items of a sequence in a data set.
  ///
  pub fn get_sequence_items(
    &self,
    tag: DataElementTag,
  ) -> Result<&[DataSet], DataError> {
    self
      .get_value(tag)?
      .sequence_items()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Returns a mutable reference to the items of a sequence in a data set.
  ///
  pub fn get_sequence_items_mut(
    &mut self,
    tag: DataElementTag,
  ) -> Result<&mut Vec<DataSet>, DataError> {
    self
      .get_value_mut(tag)?
      .sequence_items_mut()
      .map_err(|e| e.with_path(&DataSetPath::new_with_data_element(tag)))
  }

  /// Deletes all private data elements from a data set. Private data elements
  /// are removed from sequence items at any depth as well.
  ///
  pub fn delete_private_elements(&mut self) {
    self.0.retain(|tag, _| !tag.is_private());

    for value in self.0.values_mut() {
      if let Ok(items) = value.sequence_items_mut() {
        for item in items.iter_mut() {
          item.delete_private_elements();
        }
      }
    }
  }

  /// Returns whether a data set contains any private data elements, including
  /// in nested sequence items.
  ///
  pub fn has_private_elements(&self) -> bool {
    self.0.iter().any(|(tag, value)| {
      tag.is_private()
        || value
          .sequence_items()
          .map(|items| items.iter().any(|item| item.has_private_elements()))
          .unwrap_or(false)
    })
  }

  /// Returns a short human-readable summary of the data elements in a data
  /// set, one line per element, with nested sequence items indented.
  ///
  pub fn to_lines(&self) -> Vec<String> {
    let mut lines = vec![];
    self.append_lines(&mut lines, 0);
    lines
  }

  fn append_lines(&self, lines: &mut Vec<String>, indent: usize) {
    let prefix = "  ".repeat(indent);

    for (tag, value) in self.0.iter() {
      let header = format!(
        "{prefix}{} {} {}",
        tag,
        dictionary::tag_name(*tag),
        value.value_representation()
      );

      match value.sequence_items() {
        Ok(items) => {
          lines.push(format!("{header} [{} items]", items.len()));

          for item in items {
            item.append_lines(lines, indent + 1);
          }
        }

        Err(_) => match value.get_strings() {
          Ok(strings) => lines.push(format!("{header} {:?}", strings)),
          Err(_) => lines.push(header),
        },
      }
    }
  }
}

impl FromIterator<(DataElementTag, DataElementValue)> for DataSet {
  fn from_iter<T: IntoIterator<Item = (DataElementTag, DataElementValue)>>(
    iter: T,
  ) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a DataSet {
  type Item = (&'a DataElementTag, &'a DataElementValue);
  type IntoIter =
    std::collections::btree_map::Iter<'a, DataElementTag, DataElementValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}
