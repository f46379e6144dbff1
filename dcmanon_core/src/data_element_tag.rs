//! A data element tag, made up of a 16-bit group number and a 16-bit element
//! number.

/// A data element tag that identifies a single data element in a data set.
/// Tags are ordered by group then element, which is the order data elements
/// are stored in.
///
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DataElementTag {
  pub group: u16,
  pub element: u16,
}

impl DataElementTag {
  /// Constructs a new data element tag from its group and element numbers.
  ///
  pub const fn new(group: u16, element: u16) -> Self {
    Self { group, element }
  }

  /// Returns whether the tag is private, i.e. its group number is odd. Private
  /// data elements hold vendor- or site-specific data outside the standard
  /// data dictionary.
  ///
  pub fn is_private(&self) -> bool {
    self.group % 2 == 1
  }

  /// Returns the tag as a single 32-bit integer, with the group in the high 16
  /// bits.
  ///
  pub fn to_int(&self) -> u32 {
    ((self.group as u32) << 16) | self.element as u32
  }

  /// Formats the tag as an eight character uppercase hex string, e.g.
  /// `"00100010"`. This is the form used for keys in DICOM JSON.
  ///
  pub fn to_hex_string(&self) -> String {
    format!("{:04X}{:04X}", self.group, self.element)
  }

  /// Parses an eight character hex string into a data element tag. Both upper
  /// and lowercase hex digits are accepted.
  ///
  pub fn from_hex_string(s: &str) -> Result<Self, ()> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
      return Err(());
    }

    let value = u32::from_str_radix(s, 16).map_err(|_| ())?;

    Ok(Self {
      group: (value >> 16) as u16,
      element: (value & 0xFFFF) as u16,
    })
  }
}

impl core::fmt::Display for DataElementTag {
  /// Formats the tag as `(GGGG,EEEE)`.
  ///
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "({:04X},{:04X})", self.group, self.element)
  }
}
