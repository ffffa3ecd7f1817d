//! Per-request scratch directories
//!
//! Every request extracts into its own uniquely named directory. The
//! directory is removed by [`Workspace::release`] on every exit path; the
//! `Drop` of the underlying [`TempDir`] acts as a backstop if a run unwinds
//! before reaching the release.

use pak_parser_core::{ParseError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, warn};

/// Prefix of every scratch directory name
pub const WORKSPACE_PREFIX: &str = "pak-parser-";

/// A scratch directory owned by exactly one request
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a new, uniquely named directory.
    ///
    /// `scratch_root` selects the parent directory; `None` uses the host's
    /// temp directory.
    pub fn acquire(scratch_root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| ParseError::workspace(format!("Cannot create scratch directory: {}", e)))?;

        info!(path = %dir.path().display(), "Created temporary directory");
        Ok(Self { dir })
    }

    /// Path of the directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Recursively delete the directory.
    ///
    /// Deletion failures are logged and swallowed so they never replace the
    /// error a run is already reporting. Returns the removed path.
    pub fn release(self) -> PathBuf {
        let path = self.dir.path().to_path_buf();
        info!(path = %path.display(), "Removing temporary directory");
        if let Err(e) = self.dir.close() {
            warn!(path = %path.display(), error = %e, "Failed to remove temporary directory");
        }
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let root = tempfile::tempdir().unwrap();
        let workspace = Workspace::acquire(Some(root.path())).unwrap();
        let path = workspace.path().to_path_buf();

        assert!(path.is_dir());
        assert!(path.starts_with(root.path()));
        assert!(
            path.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with(WORKSPACE_PREFIX)
        );

        std::fs::create_dir_all(path.join("Game/Content")).unwrap();
        std::fs::write(path.join("Game/Content/a.uasset"), b"data").unwrap();

        let released = workspace.release();
        assert_eq!(released, path);
        assert!(!path.exists());
    }

    #[test]
    fn test_workspaces_are_unique() {
        let root = tempfile::tempdir().unwrap();
        let a = Workspace::acquire(Some(root.path())).unwrap();
        let b = Workspace::acquire(Some(root.path())).unwrap();
        assert_ne!(a.path(), b.path());
        a.release();
        b.release();
    }

    #[test]
    fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path = {
            let workspace = Workspace::acquire(Some(root.path())).unwrap();
            workspace.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_scratch_root() {
        let err = Workspace::acquire(Some(Path::new("/definitely/not/here"))).unwrap_err();
        assert!(matches!(err, ParseError::Workspace(_)));
    }
}
