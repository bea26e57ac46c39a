//! # Opt-out Module
//!
//! A directory opts itself and everything below it out of header enforcement
//! by containing a marker file (`NO_AUTO_COPYRIGHT` by default). The marker
//! counts whether or not it is tracked by git.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::trace;

/// Memoized marker lookup for the directories of one repository.
#[derive(Debug)]
pub struct OptOutIndex {
  root: PathBuf,
  marker: String,
  cache: Mutex<HashMap<PathBuf, bool>>,
}

impl OptOutIndex {
  /// Create an index for the repository at `root` using `marker` as the
  /// sentinel file name.
  pub fn new(root: impl Into<PathBuf>, marker: impl Into<String>) -> Self {
    Self {
      root: root.into(),
      marker: marker.into(),
      cache: Mutex::new(HashMap::new()),
    }
  }

  /// The sentinel file name.
  pub fn marker(&self) -> &str {
    &self.marker
  }

  /// Returns the directory that opts `path` out, if any.
  ///
  /// `path` is a file path relative to the repository root. Directories from
  /// its parent up to the root are checked.
  pub fn opted_out_by(&self, path: &Path) -> Option<PathBuf> {
    let mut dir = path.parent();
    while let Some(current) = dir {
      if self.has_marker(current) {
        return Some(current.to_path_buf());
      }
      dir = current.parent();
    }
    None
  }

  /// Whether `path` lies in an opted-out directory.
  pub fn is_opted_out(&self, path: &Path) -> bool {
    self.opted_out_by(path).is_some()
  }

  fn has_marker(&self, dir: &Path) -> bool {
    let mut cache = match self.cache.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    };

    *cache.entry(dir.to_path_buf()).or_insert_with(|| {
      let found = self.root.join(dir).join(&self.marker).exists();
      trace!("Opt-out marker in '{}': {}", dir.display(), found);
      found
    })
  }
}
