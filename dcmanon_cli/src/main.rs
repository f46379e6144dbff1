//! Entry point for dcmanon's CLI tool.

mod commands;
mod inputs;
mod logging;

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use commands::{anonymize_command, list_command};

#[derive(Parser)]
#[command(
  name = "dcmanon",
  bin_name = "dcmanon",
  version = env!("CARGO_PKG_VERSION"),
  about = "dcmanon is a CLI tool for anonymizing DICOM-RT patient data",
  max_term_width = 80
)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  #[arg(
    long,
    short,
    global = true,
    action = ArgAction::Count,
    help = "Increase the detail of log output written to stderr. Specify once \
      for info output, twice for debug output, and three times for trace \
      output. The RUST_LOG environment variable takes precedence when set."
  )]
  verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
  #[command(about = anonymize_command::ABOUT)]
  Anonymize(anonymize_command::AnonymizeArgs),

  #[command(about = list_command::ABOUT)]
  List(list_command::ListArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
  let cli = Cli::parse();

  logging::init_logging(cli.verbose);

  let r = match cli.command {
    Commands::Anonymize(args) => anonymize_command::run(args).await,
    Commands::List(args) => list_command::run(&args),
  };

  // Errors have already been printed by the command
  match r {
    Ok(()) => ExitCode::SUCCESS,
    Err(()) => ExitCode::FAILURE,
  }
}
