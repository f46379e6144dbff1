//! Batch anonymization of DICOM-RT patient data.
//!
//! A [`SelectionTree`] of patients, studies, and series is anonymized by a
//! [`BatchAnonymizer`], which writes each series to
//! `<destination>/<patient>/<study>/<series>/` and reports progress as
//! [`BatchEvent`]s.
//!
//! The anonymization and DICOM JSON crates are re-exported as modules, along
//! with the core data set types.

mod batch;
mod config;
mod error;
mod selection;

pub use dcmanon_anonymize as anonymize;
pub use dcmanon_json as json;

pub use batch::{BatchAnonymizer, BatchEvent, BatchReport, BatchState};
pub use config::BatchConfig;
pub use dcmanon_anonymize::{DocumentErrorKind, DocumentRole, DocumentSet};
pub use dcmanon_core::{
  DataElementTag, DataElementValue, DataSet, DcmanonError, dictionary,
  print_error_lines,
};
pub use error::{BatchError, DocumentError};
pub use selection::{
  DocumentKind, PatientNode, SelectionBuilder, SelectionTree,
  SelectionWarning, SeriesNode, StudyNode, output_file_names,
};
