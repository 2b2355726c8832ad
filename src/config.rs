use crate::consts;

// -----------------------------------------------------------------------------
// Queue Config
// -----------------------------------------------------------------------------

/// Tuning knobs for a [`ThreadMessageQueue`].
///
/// [`ThreadMessageQueue`]: crate::queue::ThreadMessageQueue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueConfig {
  // ---------------------------------------------------------------------------
  // Capacities
  // ---------------------------------------------------------------------------
  pub inbox_capacity: usize,
  pub registry_capacity: usize,
  pub handler_capacity: usize,
  // ---------------------------------------------------------------------------
  // Task Threads
  // ---------------------------------------------------------------------------
  pub task_stack_size: usize,
  pub task_thread_prefix: &'static str,
  // ---------------------------------------------------------------------------
  // Tracing Subscriber Configuration
  // ---------------------------------------------------------------------------
  pub tracing_source_file: bool,
  pub tracing_source_line: bool,
  pub tracing_source_name: bool,
  pub tracing_thread_info: bool,
  pub tracing_verbose: bool,
  pub tracing_very_verbose: bool,
}

impl QueueConfig {
  #[inline]
  pub const fn new() -> Self {
    Self {
      inbox_capacity: consts::CAP_INBOX_MESSAGES,
      registry_capacity: consts::CAP_REGISTERED_THREADS,
      handler_capacity: consts::CAP_REGISTERED_HANDLERS,
      task_stack_size: consts::DEFAULT_TASK_STACK_SIZE,
      task_thread_prefix: consts::DEFAULT_TASK_THREAD_PREFIX,
      tracing_source_file: false,
      tracing_source_line: false,
      tracing_source_name: false,
      tracing_thread_info: true,
      tracing_verbose: true,
      tracing_very_verbose: false,
    }
  }

  #[inline]
  pub const fn tracing_filter(&self) -> tracing::Level {
    if self.tracing_very_verbose {
      tracing::Level::TRACE
    } else if self.tracing_verbose {
      tracing::Level::DEBUG
    } else {
      tracing::Level::INFO
    }
  }
}

impl Default for QueueConfig {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use crate::config::QueueConfig;

  #[test]
  fn test_tracing_filter() {
    let mut config: QueueConfig = QueueConfig::new();

    assert_eq!(config.tracing_filter(), tracing::Level::DEBUG);

    config.tracing_very_verbose = true;
    assert_eq!(config.tracing_filter(), tracing::Level::TRACE);

    config.tracing_very_verbose = false;
    config.tracing_verbose = false;
    assert_eq!(config.tracing_filter(), tracing::Level::INFO);
  }
}
