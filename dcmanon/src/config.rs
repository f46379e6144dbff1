use std::path::{Path, PathBuf};

/// Configuration used when running a batch anonymization.
///
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
  pub(crate) destination: Option<PathBuf>,
  pub(crate) import_location: Option<PathBuf>,
  pub(crate) strip_private: bool,
  pub(crate) max_concurrency: usize,
  pub(crate) overwrite: bool,
}

impl Default for BatchConfig {
  fn default() -> Self {
    Self {
      destination: None,
      import_location: None,
      strip_private: true,
      max_concurrency: num_cpus::get(),
      overwrite: false,
    }
  }
}

impl BatchConfig {
  /// The root directory that anonymized documents are written under. Each
  /// series is written to `<destination>/<patient>/<study>/<series>/`.
  ///
  /// When no destination is set the import location is used instead, and if
  /// that isn't set either then the batch fails.
  ///
  pub fn destination(mut self, value: impl Into<PathBuf>) -> Self {
    self.destination = Some(value.into());
    self
  }

  /// The location that source data was last imported from. This is only ever
  /// read, and is used as the destination when no destination is set.
  ///
  pub fn import_location(mut self, value: Option<PathBuf>) -> Self {
    self.import_location = value;
    self
  }

  /// Whether to remove private fields from plans, doses, and images.
  ///
  /// By default private fields are removed.
  ///
  pub fn strip_private(mut self, value: bool) -> Self {
    self.strip_private = value;
    self
  }

  /// The maximum number of series that are anonymized at the same time.
  ///
  /// By default this is the number of CPUs. Values less than one are treated
  /// as one.
  ///
  pub fn max_concurrency(mut self, value: usize) -> Self {
    self.max_concurrency = value.max(1);
    self
  }

  /// Whether to replace output files that already exist. When this is false
  /// an existing output file causes that document to fail.
  ///
  /// By default existing files aren't overwritten.
  ///
  pub fn overwrite(mut self, value: bool) -> Self {
    self.overwrite = value;
    self
  }

  /// Returns the destination root that will be used, if there is one.
  ///
  pub fn resolved_destination(&self) -> Option<&Path> {
    self
      .destination
      .as_deref()
      .or(self.import_location.as_deref())
  }
}
