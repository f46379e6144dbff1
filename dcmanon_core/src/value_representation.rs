//! The value representations (VRs) that specify the data type and format of a
//! data element's value.
//!
//! Ref: PS3.5 6.2.

/// All DICOM value representations.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueRepresentation {
  AgeString,
  ApplicationEntity,
  AttributeTag,
  CodeString,
  Date,
  DateTime,
  DecimalString,
  FloatingPointDouble,
  FloatingPointSingle,
  IntegerString,
  LongString,
  LongText,
  OtherByteString,
  OtherDoubleString,
  OtherFloatString,
  OtherLongString,
  OtherVeryLongString,
  OtherWordString,
  PersonName,
  Sequence,
  ShortString,
  ShortText,
  SignedLong,
  SignedShort,
  SignedVeryLong,
  Time,
  UniqueIdentifier,
  UniversalResourceIdentifier,
  Unknown,
  UnlimitedCharacters,
  UnlimitedText,
  UnsignedLong,
  UnsignedShort,
  UnsignedVeryLong,
}

const ALL: [ValueRepresentation; 34] = [
  ValueRepresentation::AgeString,
  ValueRepresentation::ApplicationEntity,
  ValueRepresentation::AttributeTag,
  ValueRepresentation::CodeString,
  ValueRepresentation::Date,
  ValueRepresentation::DateTime,
  ValueRepresentation::DecimalString,
  ValueRepresentation::FloatingPointDouble,
  ValueRepresentation::FloatingPointSingle,
  ValueRepresentation::IntegerString,
  ValueRepresentation::LongString,
  ValueRepresentation::LongText,
  ValueRepresentation::OtherByteString,
  ValueRepresentation::OtherDoubleString,
  ValueRepresentation::OtherFloatString,
  ValueRepresentation::OtherLongString,
  ValueRepresentation::OtherVeryLongString,
  ValueRepresentation::OtherWordString,
  ValueRepresentation::PersonName,
  ValueRepresentation::Sequence,
  ValueRepresentation::ShortString,
  ValueRepresentation::ShortText,
  ValueRepresentation::SignedLong,
  ValueRepresentation::SignedShort,
  ValueRepresentation::SignedVeryLong,
  ValueRepresentation::Time,
  ValueRepresentation::UniqueIdentifier,
  ValueRepresentation::UniversalResourceIdentifier,
  ValueRepresentation::Unknown,
  ValueRepresentation::UnlimitedCharacters,
  ValueRepresentation::UnlimitedText,
  ValueRepresentation::UnsignedLong,
  ValueRepresentation::UnsignedShort,
  ValueRepresentation::UnsignedVeryLong,
];

impl ValueRepresentation {
  /// Parses a two character VR string such as `"PN"`.
  ///
  pub fn from_str(s: &str) -> Result<Self, ()> {
    ALL.iter().copied().find(|vr| vr.to_str() == s).ok_or(())
  }

  /// Returns the two character string for this VR.
  ///
  pub fn to_str(&self) -> &'static str {
    match self {
      Self::AgeString => "AS",
      Self::ApplicationEntity => "AE",
      Self::AttributeTag => "AT",
      Self::CodeString => "CS",
      Self::Date => "DA",
      Self::DateTime => "DT",
      Self::DecimalString => "DS",
      Self::FloatingPointDouble => "FD",
      Self::FloatingPointSingle => "FL",
      Self::IntegerString => "IS",
      Self::LongString => "LO",
      Self::LongText => "LT",
      Self::OtherByteString => "OB",
      Self::OtherDoubleString => "OD",
      Self::OtherFloatString => "OF",
      Self::OtherLongString => "OL",
      Self::OtherVeryLongString => "OV",
      Self::OtherWordString => "OW",
      Self::PersonName => "PN",
      Self::Sequence => "SQ",
      Self::ShortString => "SH",
      Self::ShortText => "ST",
      Self::SignedLong => "SL",
      Self::SignedShort => "SS",
      Self::SignedVeryLong => "SV",
      Self::Time => "TM",
      Self::UniqueIdentifier => "UI",
      Self::UniversalResourceIdentifier => "UR",
      Self::Unknown => "UN",
      Self::UnlimitedCharacters => "UC",
      Self::UnlimitedText => "UT",
      Self::UnsignedLong => "UL",
      Self::UnsignedShort => "US",
      Self::UnsignedVeryLong => "UV",
    }
  }

  /// Returns whether values of this VR are stored as text. Person names are
  /// not included as they have their own structured form.
  ///
  pub fn is_string(&self) -> bool {
    matches!(
      self,
      Self::AgeString
        | Self::ApplicationEntity
        | Self::AttributeTag
        | Self::CodeString
        | Self::Date
        | Self::DateTime
        | Self::LongString
        | Self::LongText
        | Self::ShortString
        | Self::ShortText
        | Self::Time
        | Self::UniqueIdentifier
        | Self::UniversalResourceIdentifier
        | Self::UnlimitedCharacters
        | Self::UnlimitedText
    )
  }

  /// Returns whether values of this VR are numbers. This includes the two
  /// string-encoded numeric VRs, DS and IS, which DICOM JSON represents as
  /// numbers.
  ///
  pub fn is_numeric(&self) -> bool {
    matches!(
      self,
      Self::DecimalString
        | Self::IntegerString
        | Self::FloatingPointDouble
        | Self::FloatingPointSingle
        | Self::SignedLong
        | Self::SignedShort
        | Self::SignedVeryLong
        | Self::UnsignedLong
        | Self::UnsignedShort
        | Self::UnsignedVeryLong
    )
  }

  /// Returns whether values of this VR are raw bytes.
  ///
  pub fn is_binary(&self) -> bool {
    matches!(
      self,
      Self::OtherByteString
        | Self::OtherDoubleString
        | Self::OtherFloatString
        | Self::OtherLongString
        | Self::OtherVeryLongString
        | Self::OtherWordString
        | Self::Unknown
    )
  }
}

impl core::fmt::Display for ValueRepresentation {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.to_str())
  }
}
