// Run-scoped segment workspace
// A uniquely named temp directory that lives exactly as long as one pipeline run

use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Ephemeral directory holding one run's segment files.
///
/// Every run gets its own freshly created, uniquely named directory, so
/// sibling runs (batch mode, or concurrent invocations of the binary) can
/// never see each other's segments. The directory is removed when the
/// workspace is dropped, on every exit path; removal failures are logged
/// and suppressed, since cleanup is best-effort.
pub struct Workspace {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl Workspace {
    /// Create an empty workspace under the system temp directory.
    pub fn create() -> io::Result<Workspace> {
        let dir = tempfile::Builder::new().prefix("featab-run-").tempdir()?;
        debug!("created segment workspace {}", dir.path().display());
        Ok(Workspace {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Location of a segment file inside the workspace.
    pub fn segment_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            if let Err(e) = dir.close() {
                warn!(
                    "failed to remove segment workspace {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}
