//! Core DICOM data model used by dcmanon: data element tags, value
//! representations, data element values, data sets, and the subset of the
//! data dictionary needed to anonymize radiotherapy data.

pub mod data_element_tag;
pub mod data_element_value;
pub mod data_error;
pub mod data_set;
pub mod data_set_path;
pub mod dictionary;
pub mod error;
pub mod uids;
pub mod value_representation;

pub use data_element_tag::DataElementTag;
pub use data_element_value::{DataElementValue, NumberValue, PersonNameValue};
pub use data_error::DataError;
pub use data_set::DataSet;
pub use data_set_path::DataSetPath;
pub use error::{DcmanonError, print_error_lines};
pub use value_representation::ValueRepresentation;
