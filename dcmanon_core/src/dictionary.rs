//! The subset of the DICOM data dictionary used when anonymizing and grouping
//! radiotherapy and image documents.
//!
//! Ref: PS3.6.

use crate::DataElementTag;

/// A data element in the data dictionary.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Item {
  pub tag: DataElementTag,
  pub name: &'static str,
  pub keyword: &'static str,
}

macro_rules! items {
  ($($ident:ident = ($group:literal, $element:literal, $name:literal, $keyword:literal);)*) => {
    $(
      pub const $ident: Item = Item {
        tag: DataElementTag::new($group, $element),
        name: $name,
        keyword: $keyword,
      };
    )*

    /// All items in this dictionary, in tag order.
    ///
    pub const ALL: &[Item] = &[$($ident),*];
  };
}

items! {
  INSTANCE_CREATION_DATE = (0x0008, 0x0012, "Instance Creation Date", "InstanceCreationDate");
  INSTANCE_CREATION_TIME = (0x0008, 0x0013, "Instance Creation Time", "InstanceCreationTime");
  SOP_CLASS_UID = (0x0008, 0x0016, "SOP Class UID", "SOPClassUID");
  SOP_INSTANCE_UID = (0x0008, 0x0018, "SOP Instance UID", "SOPInstanceUID");
  STUDY_DATE = (0x0008, 0x0020, "Study Date", "StudyDate");
  SERIES_DATE = (0x0008, 0x0021, "Series Date", "SeriesDate");
  CONTENT_DATE = (0x0008, 0x0023, "Content Date", "ContentDate");
  STUDY_TIME = (0x0008, 0x0030, "Study Time", "StudyTime");
  SERIES_TIME = (0x0008, 0x0031, "Series Time", "SeriesTime");
  CONTENT_TIME = (0x0008, 0x0033, "Content Time", "ContentTime");
  ACCESSION_NUMBER = (0x0008, 0x0050, "Accession Number", "AccessionNumber");
  MODALITY = (0x0008, 0x0060, "Modality", "Modality");
  MANUFACTURER = (0x0008, 0x0070, "Manufacturer", "Manufacturer");
  INSTITUTION_NAME = (0x0008, 0x0080, "Institution Name", "InstitutionName");
  INSTITUTION_ADDRESS = (0x0008, 0x0081, "Institution Address", "InstitutionAddress");
  REFERRING_PHYSICIAN_NAME = (0x0008, 0x0090, "Referring Physician's Name", "ReferringPhysicianName");
  STATION_NAME = (0x0008, 0x1010, "Station Name", "StationName");
  SERIES_DESCRIPTION = (0x0008, 0x103E, "Series Description", "SeriesDescription");
  INSTITUTIONAL_DEPARTMENT_NAME = (0x0008, 0x1040, "Institutional Department Name", "InstitutionalDepartmentName");
  PHYSICIANS_OF_RECORD = (0x0008, 0x1048, "Physician(s) of Record", "PhysiciansOfRecord");
  NAME_OF_PHYSICIANS_READING_STUDY = (0x0008, 0x1060, "Name of Physician(s) Reading Study", "NameOfPhysiciansReadingStudy");
  OPERATORS_NAME = (0x0008, 0x1070, "Operators' Name", "OperatorsName");
  MANUFACTURER_MODEL_NAME = (0x0008, 0x1090, "Manufacturer's Model Name", "ManufacturerModelName");
  REFERENCED_SOP_INSTANCE_UID = (0x0008, 0x1155, "Referenced SOP Instance UID", "ReferencedSOPInstanceUID");
  PATIENT_NAME = (0x0010, 0x0010, "Patient's Name", "PatientName");
  PATIENT_ID = (0x0010, 0x0020, "Patient ID", "PatientID");
  PATIENT_BIRTH_DATE = (0x0010, 0x0030, "Patient's Birth Date", "PatientBirthDate");
  PATIENT_SEX = (0x0010, 0x0040, "Patient's Sex", "PatientSex");
  OTHER_PATIENT_IDS = (0x0010, 0x1000, "Other Patient IDs", "OtherPatientIDs");
  OTHER_PATIENT_NAMES = (0x0010, 0x1001, "Other Patient Names", "OtherPatientNames");
  PATIENT_AGE = (0x0010, 0x1010, "Patient's Age", "PatientAge");
  PATIENT_SIZE = (0x0010, 0x1020, "Patient's Size", "PatientSize");
  PATIENT_WEIGHT = (0x0010, 0x1030, "Patient's Weight", "PatientWeight");
  PATIENT_ADDRESS = (0x0010, 0x1040, "Patient's Address", "PatientAddress");
  ETHNIC_GROUP = (0x0010, 0x2160, "Ethnic Group", "EthnicGroup");
  ADDITIONAL_PATIENT_HISTORY = (0x0010, 0x21B0, "Additional Patient History", "AdditionalPatientHistory");
  DEVICE_SERIAL_NUMBER = (0x0018, 0x1000, "Device Serial Number", "DeviceSerialNumber");
  SOFTWARE_VERSIONS = (0x0018, 0x1020, "Software Versions", "SoftwareVersions");
  STUDY_INSTANCE_UID = (0x0020, 0x000D, "Study Instance UID", "StudyInstanceUID");
  SERIES_INSTANCE_UID = (0x0020, 0x000E, "Series Instance UID", "SeriesInstanceUID");
  STUDY_ID = (0x0020, 0x0010, "Study ID", "StudyID");
  INSTANCE_NUMBER = (0x0020, 0x0013, "Instance Number", "InstanceNumber");
  STRUCTURE_SET_DATE = (0x3006, 0x0008, "Structure Set Date", "StructureSetDate");
  STRUCTURE_SET_TIME = (0x3006, 0x0009, "Structure Set Time", "StructureSetTime");
  REFERENCED_FRAME_OF_REFERENCE_SEQUENCE = (0x3006, 0x0010, "Referenced Frame of Reference Sequence", "ReferencedFrameOfReferenceSequence");
  RT_REFERENCED_STUDY_SEQUENCE = (0x3006, 0x0012, "RT Referenced Study Sequence", "RTReferencedStudySequence");
  RT_REFERENCED_SERIES_SEQUENCE = (0x3006, 0x0014, "RT Referenced Series Sequence", "RTReferencedSeriesSequence");
  RT_ROI_OBSERVATIONS_SEQUENCE = (0x3006, 0x0080, "RT ROI Observations Sequence", "RTROIObservationsSequence");
  ROI_INTERPRETER = (0x3006, 0x00A6, "ROI Interpreter", "ROIInterpreter");
  RT_PLAN_NAME = (0x300A, 0x0003, "RT Plan Name", "RTPlanName");
  RT_PLAN_DATE = (0x300A, 0x0006, "RT Plan Date", "RTPlanDate");
  RT_PLAN_TIME = (0x300A, 0x0007, "RT Plan Time", "RTPlanTime");
  TOLERANCE_TABLE_SEQUENCE = (0x300A, 0x0040, "Tolerance Table Sequence", "ToleranceTableSequence");
  TOLERANCE_TABLE_LABEL = (0x300A, 0x0043, "Tolerance Table Label", "ToleranceTableLabel");
  BEAM_SEQUENCE = (0x300A, 0x00B0, "Beam Sequence", "BeamSequence");
  TREATMENT_MACHINE_NAME = (0x300A, 0x00B2, "Treatment Machine Name", "TreatmentMachineName");
  TREATMENT_MACHINE_SEQUENCE = (0x300A, 0x0206, "Treatment Machine Sequence", "TreatmentMachineSequence");
  SOURCE_SEQUENCE = (0x300A, 0x0210, "Source Sequence", "SourceSequence");
  SOURCE_MANUFACTURER = (0x300A, 0x0216, "Source Manufacturer", "SourceManufacturer");
  SOURCE_ISOTOPE_NAME = (0x300A, 0x0226, "Source Isotope Name", "SourceIsotopeName");
  REFERENCED_RT_PLAN_SEQUENCE = (0x300C, 0x0002, "Referenced RT Plan Sequence", "ReferencedRTPlanSequence");
  REFERENCED_STRUCTURE_SET_SEQUENCE = (0x300C, 0x0060, "Referenced Structure Set Sequence", "ReferencedStructureSetSequence");
  REVIEW_DATE = (0x300E, 0x0004, "Review Date", "ReviewDate");
  REVIEW_TIME = (0x300E, 0x0005, "Review Time", "ReviewTime");
  REVIEWER_NAME = (0x300E, 0x0008, "Reviewer Name", "ReviewerName");
  PIXEL_DATA = (0x7FE0, 0x0010, "Pixel Data", "PixelData");
}

/// Returns the dictionary item for a tag, if it's in this dictionary.
///
pub fn find(tag: DataElementTag) -> Option<&'static Item> {
  ALL.iter().find(|item| item.tag == tag)
}

/// Returns the name of a data element tag. Private tags are named as such, and
/// tags not in this dictionary are named "unknown".
///
pub fn tag_name(tag: DataElementTag) -> &'static str {
  if tag.is_private() {
    return "Private";
  }

  find(tag).map(|item| item.name).unwrap_or("unknown")
}

/// Returns the tag and name of a data element formatted for display, e.g.
/// `"(0010,0010) Patient's Name"`.
///
pub fn tag_with_name(tag: DataElementTag) -> String {
  format!("{} {}", tag, tag_name(tag))
}
