//! A path in a data set that specifies the precise location of a specific data
//! element or sequence item.

use crate::DataElementTag;

/// A path in a data set that specifies the precise location of a specific data
/// element or sequence item. Entries in a data set path are separated by a
/// forward slash when a path is represented as a string.
///
/// Examples:
///
/// - `""`: Path to the root data set.
/// - `"00100010"`: Path to the *'(0010,0010) Patient Name'* data element.
/// - `"300A00B0/[1]/00080070"`: Path to the *'(0008,0070) Manufacturer'* data
///   element in the second item of the *'(300A,00B0) Beam Sequence'*.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataSetPath(Vec<DataSetPathEntry>);

#[derive(Clone, Copy, Debug, PartialEq)]
enum DataSetPathEntry {
  DataElement { tag: DataElementTag },
  SequenceItem { index: usize },
}

impl DataSetPath {
  /// Constructs a new data set path with no entries. An empty path is a path to
  /// the root data set.
  ///
  pub fn new() -> Self {
    Self(vec![])
  }

  /// Constructs a new data set path with an initial entry for the specified
  /// data element.
  ///
  pub fn new_with_data_element(tag: DataElementTag) -> Self {
    Self(vec![DataSetPathEntry::DataElement { tag }])
  }

  /// Returns whether a data set path is currently empty or pointing to a
  /// root-level data element.
  ///
  pub fn is_root(&self) -> bool {
    matches!(
      self.0.as_slice(),
      [] | [DataSetPathEntry::DataElement { .. }]
    )
  }

  /// Returns the final data element tag in a data set path, if the path ends
  /// with one.
  ///
  pub fn final_data_element(&self) -> Result<DataElementTag, ()> {
    match self.0.last() {
      Some(DataSetPathEntry::DataElement { tag }) => Ok(*tag),
      _ => Err(()),
    }
  }

  /// Adds a data element entry to a data set path. The path must currently be
  /// empty or end with a sequence item.
  ///
  pub fn add_data_element(&mut self, tag: DataElementTag) -> Result<(), ()> {
    match self.0.last() {
      None | Some(DataSetPathEntry::SequenceItem { .. }) => {
        self.0.push(DataSetPathEntry::DataElement { tag });
        Ok(())
      }

      _ => Err(()),
    }
  }

  /// Adds a sequence item entry to a data set path. The path must currently
  /// end with a data element.
  ///
  pub fn add_sequence_item(&mut self, index: usize) -> Result<(), ()> {
    match self.0.last() {
      Some(DataSetPathEntry::DataElement { .. }) => {
        self.0.push(DataSetPathEntry::SequenceItem { index });
        Ok(())
      }

      _ => Err(()),
    }
  }

  /// Removes the last entry in a data set path.
  ///
  pub fn pop(&mut self) -> Result<(), ()> {
    self.0.pop().map(|_| ()).ok_or(())
  }
}

impl core::fmt::Display for DataSetPath {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let entries: Vec<String> = self
      .0
      .iter()
      .map(|entry| match entry {
        DataSetPathEntry::DataElement { tag } => tag.to_hex_string(),
        DataSetPathEntry::SequenceItem { index } => format!("[{index}]"),
      })
      .collect();

    f.write_str(&entries.join("/"))
  }
}
