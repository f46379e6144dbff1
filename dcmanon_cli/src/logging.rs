//! Log output for the CLI. Logs go to stderr so that stdout only carries
//! progress and listing output.

use tracing::Level;
use tracing_subscriber::{
  EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

const CRATES: [&str; 5] = [
  "dcmanon",
  "dcmanon_anonymize",
  "dcmanon_cli",
  "dcmanon_core",
  "dcmanon_json",
];

/// Returns the log level for a count of `-v` flags. Failures are already
/// printed by the commands, so with no flags only errors are logged.
///
fn level_for_verbosity(verbosity: u8) -> Level {
  match verbosity {
    0 => Level::ERROR,
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  }
}

/// Builds the log filter. `RUST_LOG` overrides the verbosity when it's set.
/// Otherwise dcmanon's crates log at the requested level and everything else
/// at warn.
///
fn build_env_filter(verbosity: u8) -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    let level = level_for_verbosity(verbosity).as_str().to_lowercase();

    let directives: Vec<String> = CRATES
      .iter()
      .map(|name| format!("{name}={level}"))
      .collect();

    EnvFilter::new(format!("warn,{}", directives.join(",")))
  })
}

/// Installs the global tracing subscriber. This must only be called once.
///
pub fn init_logging(verbosity: u8) {
  let layer = fmt::layer()
    .with_writer(std::io::stderr)
    .with_target(false)
    .without_time();

  tracing_subscriber::registry()
    .with(build_env_filter(verbosity))
    .with(layer)
    .init();
}
