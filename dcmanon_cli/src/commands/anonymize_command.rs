use std::path::PathBuf;

use clap::Args;
use tokio::sync::mpsc;

use dcmanon::{
  BatchAnonymizer, BatchConfig, BatchEvent, BatchReport, DcmanonError,
};

use crate::inputs;

pub const ABOUT: &str = "Anonymizes the patients, studies, and series found in \
  DICOM JSON files";

#[derive(Args)]
pub struct AnonymizeArgs {
  #[arg(
    required = true,
    help_heading = "Input",
    help = "DICOM JSON files, or directories to recursively search for DICOM \
      JSON files."
  )]
  inputs: Vec<PathBuf>,

  #[arg(
    long,
    short,
    help_heading = "Input",
    help = "Extension that a file in an input directory must have in order to \
      be read. The extension check is not case sensitive.",
    default_value = "json"
  )]
  extension: String,

  #[arg(
    long,
    short,
    help_heading = "Output",
    help = "The root directory to write anonymized series into. Each series \
      is written to '<destination>/<patient>/<study>/<series>/'. Defaults to \
      the import location."
  )]
  destination: Option<PathBuf>,

  #[arg(
    long,
    env = "DCMANON_IMPORT_LOCATION",
    help_heading = "Output",
    help = "The import location used as the destination root when \
      --destination isn't specified."
  )]
  import_location: Option<PathBuf>,

  #[arg(
    long,
    help_heading = "Output",
    help = "Keep private data elements in plans, doses, and images. By default \
      they are removed.",
    default_value_t = false
  )]
  keep_private: bool,

  #[arg(
    long,
    help_heading = "Output",
    help = "Overwrite any output files that already exist",
    default_value_t = false
  )]
  overwrite: bool,

  #[arg(
    long,
    help = "The number of series to anonymize concurrently. Defaults to the \
      number of CPU cores.",
    default_value_t = {num_cpus::get()}
  )]
  threads: usize,
}

pub async fn run(args: AnonymizeArgs) -> Result<(), ()> {
  let (selection, warnings) =
    inputs::load_selection(&args.inputs, &args.extension)?;

  inputs::print_warnings(&warnings);

  let mut config = BatchConfig::default()
    .import_location(args.import_location.clone())
    .strip_private(!args.keep_private)
    .overwrite(args.overwrite)
    .max_concurrency(args.threads);

  if let Some(destination) = &args.destination {
    config = config.destination(destination);
  }

  let (events_tx, events_rx) = mpsc::unbounded_channel();
  let printer = tokio::spawn(print_progress(events_rx));

  let mut anonymizer = BatchAnonymizer::new(config).with_events(events_tx);

  // Ctrl-C stops new series from starting
  let cancellation_token = anonymizer.cancellation_token();
  let interrupt = tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      cancellation_token.cancel();
    }
  });

  let result = anonymizer.run(selection).await;

  interrupt.abort();
  drop(anonymizer);
  let _ = printer.await;

  let task_description = "anonymizing";

  match result {
    Ok(report) => {
      print_summary(&report);

      for error in report.errors.iter() {
        error.print(task_description);
      }

      if report.is_success() { Ok(()) } else { Err(()) }
    }

    Err(e) => {
      e.print(task_description);
      Err(())
    }
  }
}

/// Prints a line to stdout for each series as it's completed.
///
async fn print_progress(mut events: mpsc::UnboundedReceiver<BatchEvent>) {
  while let Some(event) = events.recv().await {
    if let BatchEvent::Progress { done, total, label } = event {
      println!("[{done}/{total}] {label}");
    }
  }
}

fn print_summary(report: &BatchReport) {
  println!(
    "Anonymized {} documents in {} of {} series",
    report.documents_written, report.completed_series, report.total_series
  );

  if report.skipped_series > 0 {
    println!("Skipped {} series", report.skipped_series);
  }

  if report.cancelled {
    println!("Cancelled before all series were started");
  }
}
