//! Progress indicators for long-running operations
//!
//! Uses `linya` for allocation-free progress bars, drawn once per repository
//! processed during fleet-wide operations.

use linya::{Bar, Progress};

/// Progress bar wrapper for per-repository operations
pub struct RepoProgress {
  progress: Progress,
  bar: Bar,
}

impl RepoProgress {
  /// Create a new progress bar over `total` repositories
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }

  /// Set progress to a specific value
  #[allow(dead_code)]
  pub fn set(&mut self, pos: usize) {
    self.progress.set_and_draw(&self.bar, pos);
  }
}
