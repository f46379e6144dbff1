//! Anonymization of the documents of a single series.

use std::path::{Path, PathBuf};

use dcmanon_core::dictionary;

use crate::{
  Document, DocumentErrorKind, DocumentRole, DocumentSet, IdentityPair,
  SeriesError, naming,
  policy::{self, RolePolicy},
};

/// Options that control how a series is anonymized.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeriesOptions {
  /// Whether to remove private fields from plans, doses, and images.
  pub strip_private: bool,

  /// Whether to replace output files that already exist.
  pub overwrite: bool,
}

impl Default for SeriesOptions {
  fn default() -> Self {
    Self {
      strip_private: true,
      overwrite: false,
    }
  }
}

/// The result of anonymizing a series.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SeriesOutcome {
  /// Paths of the documents that were written, in the order they were written.
  pub written: Vec<PathBuf>,

  /// Errors for the documents that couldn't be anonymized.
  pub errors: Vec<SeriesError>,
}

/// Anonymizes the documents of one series and writes them into the given
/// directory.
///
/// The structure set, plan, and dose are written as `rtss.dcm`, `rtplan.dcm`,
/// and `rtdose.dcm`, and images as `<modality>.<index>.dcm`. A failure on one
/// document doesn't stop the others, and documents already written are left
/// in place.
///
pub fn anonymize_series<D: Document>(
  documents: DocumentSet<D>,
  directory: &Path,
  identity: &IdentityPair,
  options: &SeriesOptions,
) -> SeriesOutcome {
  let mut outcome = SeriesOutcome::default();

  if documents.is_empty() {
    outcome.errors.push(SeriesError {
      role: DocumentRole::Series,
      kind: DocumentErrorKind::MalformedSelection {
        details: "Series has no documents".to_string(),
      },
    });

    return outcome;
  }

  let DocumentSet {
    structure_set,
    plan,
    dose,
    images,
  } = documents;

  let fixed_roles = [
    (
      structure_set,
      DocumentRole::StructureSet,
      &policy::STRUCTURE_SET_POLICY,
      naming::STRUCTURE_SET_FILE_NAME,
    ),
    (
      plan,
      DocumentRole::Plan,
      &policy::PLAN_POLICY,
      naming::PLAN_FILE_NAME,
    ),
    (
      dose,
      DocumentRole::Dose,
      &policy::DOSE_POLICY,
      naming::DOSE_FILE_NAME,
    ),
  ];

  for (document, role, role_policy, file_name) in fixed_roles {
    if let Some(document) = document {
      anonymize_document(
        document,
        role,
        role_policy,
        directory.join(file_name),
        identity,
        options,
        &mut outcome,
      );
    }
  }

  for (index, image) in images.into_iter().enumerate() {
    let role = DocumentRole::Image { index };

    let sop_class_uid = image.get(dictionary::SOP_CLASS_UID.tag);
    let Some(stem) = sop_class_uid.and_then(naming::modality_stem) else {
      outcome.errors.push(SeriesError {
        role,
        kind: DocumentErrorKind::MalformedSelection {
          details: format!(
            "Unknown SOP class UID '{}'",
            sop_class_uid.unwrap_or("")
          ),
        },
      });

      continue;
    };

    anonymize_document(
      image,
      role,
      &policy::IMAGE_POLICY,
      directory.join(naming::image_file_name(&stem, index)),
      identity,
      options,
      &mut outcome,
    );
  }

  outcome
}

fn anonymize_document<D: Document>(
  mut document: D,
  role: DocumentRole,
  role_policy: &RolePolicy,
  path: PathBuf,
  identity: &IdentityPair,
  options: &SeriesOptions,
  outcome: &mut SeriesOutcome,
) {
  let fields_written = policy::apply_policy(
    &mut document,
    role_policy,
    identity,
    options.strip_private,
  );

  match document.persist(&path, options.overwrite) {
    Ok(()) => {
      tracing::debug!(
        %role,
        path = %path.display(),
        fields_written,
        "Wrote anonymized document"
      );

      outcome.written.push(path);
    }

    Err(e) => {
      tracing::warn!(%role, path = %path.display(), error = %e, "Write failed");

      outcome.errors.push(SeriesError {
        role,
        kind: DocumentErrorKind::PersistenceFailure {
          path,
          details: e.to_string(),
        },
      });
    }
  }
}
