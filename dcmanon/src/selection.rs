//! The selection of patients, studies, and series to anonymize.
//!
//! A [`SelectionTree`] can be built directly, or with a [`SelectionBuilder`]
//! that groups loaded documents by their Patient ID, Study Instance UID, and
//! Series Instance UID.

use std::{
  collections::{BTreeMap, HashMap},
  path::{Path, PathBuf},
};

use dcmanon_anonymize::{DocumentSet, naming, new_record_id};
use dcmanon_core::{
  DataSet, DcmanonError,
  dictionary::{self, Item},
  uids,
};

/// A three level tree of patients, studies, and series. Each series holds the
/// documents that belong to it. Keys are synthetic and unique within their
/// parent.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionTree {
  patients: Vec<PatientNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PatientNode {
  pub key: String,
  pub studies: Vec<StudyNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StudyNode {
  pub key: String,
  pub series: Vec<SeriesNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SeriesNode {
  pub key: String,
  pub documents: DocumentSet<DataSet>,
}

impl SelectionTree {
  /// Returns a new empty selection tree.
  ///
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a series to the tree, creating its patient and study nodes if they
  /// don't exist. Returns false without changing the tree if the study
  /// already has a series with the same key.
  ///
  pub fn insert_series(
    &mut self,
    patient_key: &str,
    study_key: &str,
    series_key: &str,
    documents: DocumentSet<DataSet>,
  ) -> bool {
    let patient = match self.patients.iter().position(|p| p.key == patient_key)
    {
      Some(index) => &mut self.patients[index],
      None => {
        self.patients.push(PatientNode {
          key: patient_key.to_string(),
          studies: vec![],
        });
        let last = self.patients.len() - 1;
        &mut self.patients[last]
      }
    };

    let study = match patient.studies.iter().position(|s| s.key == study_key) {
      Some(index) => &mut patient.studies[index],
      None => {
        patient.studies.push(StudyNode {
          key: study_key.to_string(),
          series: vec![],
        });
        let last = patient.studies.len() - 1;
        &mut patient.studies[last]
      }
    };

    if study.series.iter().any(|s| s.key == series_key) {
      return false;
    }

    study.series.push(SeriesNode {
      key: series_key.to_string(),
      documents,
    });

    true
  }

  /// Returns the patients in the tree.
  ///
  pub fn patients(&self) -> &[PatientNode] {
    &self.patients
  }

  /// Consumes the tree and returns its patients.
  ///
  pub fn into_patients(self) -> Vec<PatientNode> {
    self.patients
  }

  /// Returns the total number of series in the tree.
  ///
  pub fn series_count(&self) -> usize {
    self
      .patients
      .iter()
      .flat_map(|patient| patient.studies.iter())
      .map(|study| study.series.len())
      .sum()
  }

  /// Returns the total number of documents in the tree.
  ///
  pub fn document_count(&self) -> usize {
    self
      .patients
      .iter()
      .flat_map(|patient| patient.studies.iter())
      .flat_map(|study| study.series.iter())
      .map(|series| series.documents.len())
      .sum()
  }

  pub fn is_empty(&self) -> bool {
    self.patients.is_empty()
  }

  /// Returns lines of text that describe the tree, with one line per patient,
  /// study, series, and document.
  ///
  pub fn to_lines(&self) -> Vec<String> {
    let mut lines = vec![];

    for patient in self.patients.iter() {
      lines.push(format!("Patient {}", patient.key));

      for study in patient.studies.iter() {
        lines.push(format!("  Study {}", study.key));

        for series in study.series.iter() {
          lines.push(format!("    Series {}", series.key));

          for role in series.documents.roles() {
            lines.push(format!("      {role}"));
          }
        }
      }
    }

    lines
  }
}

/// A document that couldn't be placed in a selection tree.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionWarning {
  pub path: PathBuf,
  pub details: String,
}

impl core::fmt::Display for SelectionWarning {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}: {}", self.path.display(), self.details)
  }
}

impl DcmanonError for SelectionWarning {
  fn to_lines(&self, task_description: &str) -> Vec<String> {
    vec![
      format!("Selection warning {task_description}"),
      "".to_string(),
      format!("  Path: {}", self.path.display()),
      format!("  Details: {}", self.details),
    ]
  }
}

/// The kind of a document, determined by its SOP class.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DocumentKind {
  StructureSet,
  Plan,
  Dose,
  Image,
}

impl DocumentKind {
  /// Determines the kind of a document from its SOP Class UID. Storage
  /// classes other than the RT structure set, plan, and dose classes are
  /// images if their name says so or the document has pixel data.
  ///
  pub fn classify(data_set: &DataSet) -> Result<Self, String> {
    let sop_class_uid = data_set
      .get_string(dictionary::SOP_CLASS_UID.tag)
      .map_err(|_| "SOP Class UID is missing".to_string())?
      .trim_end_matches(['\0', ' ']);

    match sop_class_uid {
      uids::RT_STRUCTURE_SET_STORAGE => Ok(Self::StructureSet),
      uids::RT_PLAN_STORAGE | uids::RT_ION_PLAN_STORAGE => Ok(Self::Plan),
      uids::RT_DOSE_STORAGE => Ok(Self::Dose),

      _ => {
        let is_image_class = uids::sop_class_name(sop_class_uid)
          .map(|name| name.contains(" Image Storage"))
          .unwrap_or(false);

        if is_image_class || data_set.has(dictionary::PIXEL_DATA.tag) {
          Ok(Self::Image)
        } else {
          Err(format!("SOP class '{sop_class_uid}' is not supported"))
        }
      }
    }
  }
}

#[derive(Default)]
struct PendingSeries {
  structure_set: Option<DataSet>,
  plan: Option<DataSet>,
  dose: Option<DataSet>,
  images: Vec<(Option<i64>, PathBuf, DataSet)>,
}

type PendingStudies = BTreeMap<String, BTreeMap<String, PendingSeries>>;

/// The patient, study, and series a document is placed in.
///
#[derive(Clone, Debug, PartialEq)]
struct SeriesLocation {
  patient_id: String,
  study_uid: String,
  series_uid: String,
}

struct PendingDocument {
  path: PathBuf,
  kind: DocumentKind,
  location: SeriesLocation,
  target: SeriesLocation,
  data_set: DataSet,
}

/// Builds a [`SelectionTree`] from loaded documents.
///
/// Documents are grouped by Patient ID, then Study Instance UID, then Series
/// Instance UID, and every node is given a freshly minted key. Images are
/// ordered by Instance Number, then by source path.
///
/// RT documents are placed in the image series they reference. A structure set
/// joins the image series it names in its Referenced Frame of Reference
/// Sequence, a plan joins the series of the structure set it references, and a
/// dose joins the series of the plan it references. A document whose reference
/// can't be resolved, or whose referenced series already has a document in its
/// role, stays in its own series.
///
#[derive(Default)]
pub struct SelectionBuilder {
  documents: Vec<PendingDocument>,
  warnings: Vec<SelectionWarning>,
}

impl SelectionBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a loaded document. Documents that can't be placed in the tree are
  /// recorded as warnings.
  ///
  pub fn add(&mut self, path: &Path, data_set: DataSet) {
    let kind = match DocumentKind::classify(&data_set) {
      Ok(kind) => kind,
      Err(details) => return self.warn(path, details),
    };

    let patient_id = data_set
      .get_string(dictionary::PATIENT_ID.tag)
      .unwrap_or("")
      .to_string();

    let Ok(study_uid) = data_set.get_string(dictionary::STUDY_INSTANCE_UID.tag)
    else {
      return self.warn(path, "Study Instance UID is missing".to_string());
    };

    let Ok(series_uid) =
      data_set.get_string(dictionary::SERIES_INSTANCE_UID.tag)
    else {
      return self.warn(path, "Series Instance UID is missing".to_string());
    };

    let location = SeriesLocation {
      patient_id,
      study_uid: study_uid.to_string(),
      series_uid: series_uid.to_string(),
    };

    self.documents.push(PendingDocument {
      path: path.to_path_buf(),
      kind,
      target: location.clone(),
      location,
      data_set,
    });
  }

  fn warn(&mut self, path: &Path, details: String) {
    tracing::warn!(path = %path.display(), details, "Document not selected");

    self.warnings.push(SelectionWarning {
      path: path.to_path_buf(),
      details,
    });
  }

  /// Builds the selection tree, returning it along with warnings for any
  /// documents that weren't placed in it.
  ///
  pub fn build(mut self) -> (SelectionTree, Vec<SelectionWarning>) {
    let mut documents = std::mem::take(&mut self.documents);
    link_referenced_series(&mut documents);

    let mut patients: BTreeMap<String, PendingStudies> = BTreeMap::new();

    for document in documents {
      let PendingDocument {
        path,
        kind,
        location,
        target,
        data_set,
      } = document;

      if kind == DocumentKind::Image {
        let instance_number =
          data_set.get_int(dictionary::INSTANCE_NUMBER.tag).ok();

        pending_series(&mut patients, &location).images.push((
          instance_number,
          path,
          data_set,
        ));

        continue;
      }

      let unplaced = match place(&mut patients, &target, kind, data_set) {
        Some(data_set) if target != location => {
          tracing::debug!(
            path = %path.display(),
            "Referenced series already has a {kind:?} document"
          );

          place(&mut patients, &location, kind, data_set)
        }

        unplaced => unplaced,
      };

      if unplaced.is_some() {
        self.warn(&path, format!("Series already has a {kind:?} document"));
      }
    }

    let mut tree = SelectionTree::new();

    for (_, studies) in patients {
      let patient_key = new_record_id();

      for (_, series) in studies {
        let study_key = new_record_id();

        for (_, mut pending) in series {
          pending.images.sort_by(|a, b| {
            let a_key = (a.0.is_none(), a.0, &a.1);
            let b_key = (b.0.is_none(), b.0, &b.1);
            a_key.cmp(&b_key)
          });

          let documents = DocumentSet {
            structure_set: pending.structure_set,
            plan: pending.plan,
            dose: pending.dose,
            images: pending.images.into_iter().map(|(_, _, d)| d).collect(),
          };

          tree.insert_series(
            &patient_key,
            &study_key,
            &new_record_id(),
            documents,
          );
        }
      }
    }

    (tree, self.warnings)
  }
}

fn pending_series<'a>(
  patients: &'a mut BTreeMap<String, PendingStudies>,
  location: &SeriesLocation,
) -> &'a mut PendingSeries {
  patients
    .entry(location.patient_id.clone())
    .or_default()
    .entry(location.study_uid.clone())
    .or_default()
    .entry(location.series_uid.clone())
    .or_default()
}

/// Puts an RT document in its role's slot of a series. Returns the document if
/// the slot is already taken.
///
fn place(
  patients: &mut BTreeMap<String, PendingStudies>,
  location: &SeriesLocation,
  kind: DocumentKind,
  data_set: DataSet,
) -> Option<DataSet> {
  let series = pending_series(patients, location);

  let slot = match kind {
    DocumentKind::StructureSet => &mut series.structure_set,
    DocumentKind::Plan => &mut series.plan,
    DocumentKind::Dose => &mut series.dose,
    DocumentKind::Image => return Some(data_set),
  };

  if slot.is_some() {
    return Some(data_set);
  }

  *slot = Some(data_set);

  None
}

/// Sets the target series of each RT document by following its references:
/// structure set to image series, plan to structure set, and dose to plan.
/// References to another patient's documents aren't followed.
///
fn link_referenced_series(documents: &mut [PendingDocument]) {
  let image_series: HashMap<String, SeriesLocation> = documents
    .iter()
    .filter(|document| document.kind == DocumentKind::Image)
    .map(|document| {
      (document.location.series_uid.clone(), document.location.clone())
    })
    .collect();

  let mut instance_series: HashMap<String, SeriesLocation> = HashMap::new();

  for kind in [
    DocumentKind::StructureSet,
    DocumentKind::Plan,
    DocumentKind::Dose,
  ] {
    for document in documents.iter_mut().filter(|d| d.kind == kind) {
      let referenced = match kind {
        DocumentKind::StructureSet => referenced_uids(
          &document.data_set,
          &[
            dictionary::REFERENCED_FRAME_OF_REFERENCE_SEQUENCE,
            dictionary::RT_REFERENCED_STUDY_SEQUENCE,
            dictionary::RT_REFERENCED_SERIES_SEQUENCE,
          ],
          dictionary::SERIES_INSTANCE_UID,
        )
        .iter()
        .find_map(|uid| image_series.get(uid)),

        DocumentKind::Plan => referenced_uids(
          &document.data_set,
          &[dictionary::REFERENCED_STRUCTURE_SET_SEQUENCE],
          dictionary::REFERENCED_SOP_INSTANCE_UID,
        )
        .iter()
        .find_map(|uid| instance_series.get(uid)),

        DocumentKind::Dose => referenced_uids(
          &document.data_set,
          &[dictionary::REFERENCED_RT_PLAN_SEQUENCE],
          dictionary::REFERENCED_SOP_INSTANCE_UID,
        )
        .iter()
        .find_map(|uid| instance_series.get(uid)),

        DocumentKind::Image => None,
      };

      let referenced = referenced
        .filter(|location| location.patient_id == document.location.patient_id);

      if let Some(referenced) = referenced {
        document.target = referenced.clone();
      }

      if let Ok(sop_instance_uid) =
        document.data_set.get_string(dictionary::SOP_INSTANCE_UID.tag)
      {
        instance_series
          .insert(sop_instance_uid.to_string(), document.target.clone());
      }
    }
  }
}

/// Returns the values of a UID element found by descending through every item
/// of the given nested sequences.
///
fn referenced_uids(
  data_set: &DataSet,
  sequences: &[Item],
  item: Item,
) -> Vec<String> {
  match sequences.split_first() {
    None => data_set
      .get_string(item.tag)
      .map(|uid| vec![uid.trim_end_matches(['\0', ' ']).to_string()])
      .unwrap_or_default(),

    Some((sequence, rest)) => data_set
      .get_sequence_items(sequence.tag)
      .map(|items| {
        items
          .iter()
          .flat_map(|i| referenced_uids(i, rest, item))
          .collect()
      })
      .unwrap_or_default(),
  }
}

/// Returns the output file names a series will be written as. Images whose
/// SOP class isn't known are named with a `?` stem.
///
pub fn output_file_names(documents: &DocumentSet<DataSet>) -> Vec<String> {
  let mut names = vec![];

  if documents.structure_set.is_some() {
    names.push(naming::STRUCTURE_SET_FILE_NAME.to_string());
  }
  if documents.plan.is_some() {
    names.push(naming::PLAN_FILE_NAME.to_string());
  }
  if documents.dose.is_some() {
    names.push(naming::DOSE_FILE_NAME.to_string());
  }

  for (index, image) in documents.images.iter().enumerate() {
    let stem = image
      .get_string(dictionary::SOP_CLASS_UID.tag)
      .ok()
      .and_then(naming::modality_stem)
      .unwrap_or_else(|| "?".to_string());

    names.push(naming::image_file_name(&stem, index));
  }

  names
}
