// src/utils/logger.rs

use env_logger::{Env, Target};
use log::LevelFilter;

/// Installs the process logger on stderr.
///
/// `RUST_LOG` wins over `default_filter`; `verbose` forces debug output.
pub fn init(default_filter: &str, verbose: bool) {
  let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
  if verbose {
    builder.filter_level(LevelFilter::Debug);
  }
  builder.target(Target::Stderr).format_timestamp(None);

  // A second init (e.g. from tests) keeps the first logger
  let _ = builder.try_init();
}
