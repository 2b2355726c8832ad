//! Process-level setup helpers.

use crate::config::QueueConfig;
use crate::error::Exception;

/// Installs a compact `tracing` subscriber configured by `config`.
///
/// Fails if a global subscriber is already set. Without the `tracing`
/// feature this does nothing.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: &QueueConfig) -> Result<(), Exception> {
  use std::fmt::Display;
  use tracing_subscriber::FmtSubscriber;
  use tracing_subscriber::fmt::format;
  use tracing_subscriber::util::SubscriberInitExt;

  use crate::error::ExceptionClass;
  use crate::error::ExceptionGroup;

  fn error<E>(error: E) -> Exception
  where
    E: Display,
  {
    Exception::new(ExceptionClass::Error, ExceptionGroup::Config, error)
  }

  FmtSubscriber::builder()
    .event_format(format().compact())
    .log_internal_errors(true)
    .with_ansi(true)
    .with_file(config.tracing_source_file)
    .with_level(true)
    .with_line_number(config.tracing_source_line)
    .with_max_level(config.tracing_filter())
    .with_target(config.tracing_source_name)
    .with_thread_ids(config.tracing_thread_info)
    .with_thread_names(config.tracing_thread_info)
    .finish()
    .try_init()
    .map_err(error)
}

#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: &QueueConfig) -> Result<(), Exception> {
  Ok(())
}
