//! Runs anonymization over a whole selection of patients, studies, and series.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use dcmanon_anonymize::{
  DocumentErrorKind, DocumentRole, DocumentSet, IdentityPair, SeriesError,
  SeriesOptions, SeriesOutcome, anonymize_series, new_patient_identity,
};
use dcmanon_core::DataSet;

use crate::{BatchConfig, BatchError, DocumentError, SelectionTree};

/// The state of a batch anonymizer. A batch moves from `NotStarted` to
/// `Running`, then ends in either `Completed` or `Failed`.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BatchState {
  NotStarted,
  Running,
  Completed,
  Failed,
}

/// Notifications sent while a batch runs.
///
#[derive(Clone, Debug, PartialEq)]
pub enum BatchEvent {
  /// The destination is ready and the given number of series will be
  /// processed.
  Started { total: usize },

  /// A series has been processed. `done` counts up to `total` and never
  /// decreases.
  Progress {
    done: usize,
    total: usize,
    label: String,
  },

  /// The batch finished. An empty list of errors means every document was
  /// anonymized.
  Completed { errors: Vec<DocumentError> },

  /// The batch failed before any series were processed.
  Failed { error: BatchError },
}

/// A summary of a finished batch.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
  pub total_series: usize,
  pub completed_series: usize,
  pub skipped_series: usize,
  pub documents_written: usize,
  pub errors: Vec<DocumentError>,
  pub cancelled: bool,
}

impl BatchReport {
  /// Returns whether every series was processed without any errors.
  ///
  pub fn is_success(&self) -> bool {
    self.errors.is_empty() && !self.cancelled
  }
}

/// Anonymizes every series in a [`SelectionTree`], writing the results under
/// a destination root.
///
/// Each patient is given one synthetic identity that is used for all of their
/// documents. Series are anonymized concurrently, and errors on individual
/// documents are collected without stopping the batch.
///
pub struct BatchAnonymizer {
  config: BatchConfig,
  state: BatchState,
  events: Option<mpsc::UnboundedSender<BatchEvent>>,
  cancellation_token: CancellationToken,
}

/// Where a series sits in the selection tree.
///
#[derive(Clone, Debug)]
struct SeriesLocation {
  patient_key: String,
  study_key: String,
  series_key: String,
}

impl SeriesLocation {
  fn label(&self) -> String {
    format!("{}/{}/{}", self.patient_key, self.study_key, self.series_key)
  }

  fn document_error(&self, error: SeriesError) -> DocumentError {
    DocumentError {
      patient_key: self.patient_key.clone(),
      study_key: self.study_key.clone(),
      series_key: self.series_key.clone(),
      role: error.role,
      kind: error.kind,
    }
  }
}

struct SeriesJob {
  location: SeriesLocation,
  identity: Arc<IdentityPair>,
  documents: DocumentSet<DataSet>,
  directory: PathBuf,
}

enum JobResult {
  Processed {
    label: String,
    outcome: SeriesOutcome,
    errors: Vec<DocumentError>,
  },
  Cancelled,
}

impl BatchAnonymizer {
  pub fn new(config: BatchConfig) -> Self {
    Self {
      config,
      state: BatchState::NotStarted,
      events: None,
      cancellation_token: CancellationToken::new(),
    }
  }

  /// Sets the channel that batch events are sent on.
  ///
  pub fn with_events(
    mut self,
    events: mpsc::UnboundedSender<BatchEvent>,
  ) -> Self {
    self.events = Some(events);
    self
  }

  /// Returns a token that cancels the batch. Cancellation is checked before
  /// each series starts, so series that are already running complete.
  ///
  pub fn cancellation_token(&self) -> CancellationToken {
    self.cancellation_token.clone()
  }

  pub fn state(&self) -> BatchState {
    self.state
  }

  pub fn config(&self) -> &BatchConfig {
    &self.config
  }

  fn emit(&self, event: BatchEvent) {
    if let Some(events) = &self.events {
      let _ = events.send(event);
    }
  }

  fn fail(&mut self, error: BatchError) -> Result<BatchReport, BatchError> {
    tracing::warn!(%error, "Batch failed");

    self.state = BatchState::Failed;
    self.emit(BatchEvent::Failed {
      error: error.clone(),
    });

    Err(error)
  }

  /// Runs the batch over the given selection. This can only be done once.
  ///
  /// Fails only if the destination root can't be created, in which case no
  /// series are processed. Otherwise returns a report that includes the
  /// errors for any documents that couldn't be anonymized.
  ///
  pub async fn run(
    &mut self,
    selection: SelectionTree,
  ) -> Result<BatchReport, BatchError> {
    if self.state != BatchState::NotStarted {
      return Err(BatchError::AlreadyStarted);
    }

    self.state = BatchState::Running;

    let Some(destination) =
      self.config.resolved_destination().map(Path::to_path_buf)
    else {
      return self.fail(BatchError::DestinationUnavailable {
        path: None,
        details: "No destination or import location is set".to_string(),
      });
    };

    if let Err(e) = tokio::fs::create_dir_all(&destination).await {
      return self.fail(BatchError::DestinationUnavailable {
        path: Some(destination),
        details: e.to_string(),
      });
    }

    let total = selection.series_count();

    tracing::info!(
      total,
      destination = %destination.display(),
      strip_private = self.config.strip_private,
      "Batch started"
    );
    self.emit(BatchEvent::Started { total });

    let jobs = series_jobs(selection, &destination);

    let options = SeriesOptions {
      strip_private: self.config.strip_private,
      overwrite: self.config.overwrite,
    };

    let cancellation_token = self.cancellation_token.clone();

    let mut results = stream::iter(jobs)
      .map(|job| run_job(job, options, cancellation_token.clone()))
      .buffer_unordered(self.config.max_concurrency.max(1));

    let mut report = BatchReport {
      total_series: total,
      ..BatchReport::default()
    };
    let mut done = 0;

    while let Some(result) = results.next().await {
      match result {
        JobResult::Processed {
          label,
          outcome,
          errors,
        } => {
          done += 1;

          let series_skipped = errors
            .iter()
            .any(|error| error.role == DocumentRole::Series);

          if series_skipped {
            report.skipped_series += 1;
          } else {
            report.completed_series += 1;
          }

          report.documents_written += outcome.written.len();

          for error in errors.iter() {
            tracing::warn!(%error, "Document not anonymized");
          }
          report.errors.extend(errors);

          self.emit(BatchEvent::Progress { done, total, label });
        }

        JobResult::Cancelled => {
          report.skipped_series += 1;
          report.cancelled = true;
        }
      }
    }

    tracing::info!(
      completed = report.completed_series,
      skipped = report.skipped_series,
      documents = report.documents_written,
      errors = report.errors.len(),
      cancelled = report.cancelled,
      "Batch completed"
    );

    self.state = BatchState::Completed;
    self.emit(BatchEvent::Completed {
      errors: report.errors.clone(),
    });

    Ok(report)
  }
}

/// Flattens a selection into one job per series. Each patient gets a freshly
/// minted identity that's shared by all of their series.
///
fn series_jobs(selection: SelectionTree, destination: &Path) -> Vec<SeriesJob> {
  let mut jobs = vec![];

  for patient in selection.into_patients() {
    let identity = Arc::new(new_patient_identity());

    for study in patient.studies {
      for series in study.series {
        let directory = destination
          .join(&patient.key)
          .join(&study.key)
          .join(&series.key);

        jobs.push(SeriesJob {
          location: SeriesLocation {
            patient_key: patient.key.clone(),
            study_key: study.key.clone(),
            series_key: series.key,
          },
          identity: identity.clone(),
          documents: series.documents,
          directory,
        });
      }
    }
  }

  jobs
}

async fn run_job(
  job: SeriesJob,
  options: SeriesOptions,
  cancellation_token: CancellationToken,
) -> JobResult {
  if cancellation_token.is_cancelled() {
    return JobResult::Cancelled;
  }

  let SeriesJob {
    location,
    identity,
    documents,
    directory,
  } = job;

  let label = location.label();
  tracing::debug!(series = %label, documents = documents.len(), "Anonymizing");

  let task_directory = directory.clone();
  let result = tokio::task::spawn_blocking(move || {
    if !documents.is_empty() {
      if let Err(e) = std::fs::create_dir_all(&task_directory) {
        return SeriesOutcome {
          written: vec![],
          errors: vec![SeriesError {
            role: DocumentRole::Series,
            kind: DocumentErrorKind::PersistenceFailure {
              path: task_directory,
              details: e.to_string(),
            },
          }],
        };
      }
    }

    anonymize_series(documents, &task_directory, &identity, &options)
  })
  .await;

  let outcome = result.unwrap_or_else(|e| SeriesOutcome {
    written: vec![],
    errors: vec![SeriesError {
      role: DocumentRole::Series,
      kind: DocumentErrorKind::PersistenceFailure {
        path: directory,
        details: format!("Series task failed: {e}"),
      },
    }],
  });

  let errors = outcome
    .errors
    .iter()
    .cloned()
    .map(|error| location.document_error(error))
    .collect();

  JobResult::Processed {
    label,
    outcome,
    errors,
  }
}
