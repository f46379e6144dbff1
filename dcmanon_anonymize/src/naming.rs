//! Output file naming for anonymized documents.
//!
//! Each role has a fixed file name within its series directory. Images are
//! named after their modality and position in the series, e.g. `ct.0.dcm`, so
//! images in one series never share a path.

use dcmanon_core::uids;

pub const STRUCTURE_SET_FILE_NAME: &str = "rtss.dcm";
pub const PLAN_FILE_NAME: &str = "rtplan.dcm";
pub const DOSE_FILE_NAME: &str = "rtdose.dcm";

/// Returns the modality stem used to name an image, which is the name of its
/// SOP class with `" Image Storage"` removed, in lowercase. E.g. CT Image
/// Storage gives `"ct"`. Returns `None` for an unknown SOP class.
///
pub fn modality_stem(sop_class_uid: &str) -> Option<String> {
  let name = uids::sop_class_name(sop_class_uid).ok()?;

  let stem = match name.split_once(" Image Storage") {
    Some((stem, _)) => stem,
    None => name,
  };

  Some(stem.to_lowercase())
}

/// Returns the file name for the image at the given index in its series.
///
pub fn image_file_name(stem: &str, index: usize) -> String {
  format!("{stem}.{index}.dcm")
}
