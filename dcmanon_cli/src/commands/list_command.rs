use std::path::PathBuf;

use clap::Args;

use dcmanon::output_file_names;

use crate::inputs;

pub const ABOUT: &str = "Lists the patients, studies, and series that would \
  be anonymized from DICOM JSON files, without writing anything";

#[derive(Args)]
pub struct ListArgs {
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
    help_heading = "Output",
    help = "Whether to print the names of the files each series would be \
      written as, rather than the roles of its documents.",
    default_value_t = false
  )]
  file_names: bool,
}

pub fn run(args: &ListArgs) -> Result<(), ()> {
  let (selection, warnings) =
    inputs::load_selection(&args.inputs, &args.extension)?;

  inputs::print_warnings(&warnings);

  if args.file_names {
    for patient in selection.patients() {
      for study in patient.studies.iter() {
        for series in study.series.iter() {
          for name in output_file_names(&series.documents) {
            println!("{}/{}/{}/{name}", patient.key, study.key, series.key);
          }
        }
      }
    }
  } else {
    for line in selection.to_lines() {
      println!("{line}");
    }
  }

  eprintln!(
    "Found {} documents in {} series",
    selection.document_count(),
    selection.series_count()
  );

  Ok(())
}
