//! Anonymization of DICOM-RT series.
//!
//! Identifying and institutional fields are overwritten with fixed
//! placeholder values, private fields are stripped, and the patient's name and
//! ID are replaced with a synthetic identity shared by all of that patient's
//! documents. Fields that aren't present in a document are never added.

mod document;
mod document_set;
mod engine;
mod error;
mod identity;
pub mod naming;
mod persist;
pub mod policy;

pub use document::Document;
pub use document_set::{DocumentRole, DocumentSet};
pub use engine::{SeriesOptions, SeriesOutcome, anonymize_series};
pub use error::{DocumentErrorKind, SeriesError};
pub use identity::{IdentityPair, new_patient_identity, new_record_id};
pub use persist::{PersistError, persist_data_set};
