//! Source-directory disposal after a successful bind.
//!
//! Trash first so the user can recover a directory that was bound by
//! mistake; fall back to a hard recursive delete when no trash facility is
//! available (headless servers, containers, network mounts).

use crate::error::BinderyError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Remove a consumed source directory: send to trash, else delete.
///
/// Returns `Err` only when both the trash operation and the fallback delete
/// fail. Callers treat that as a degraded outcome, not a pipeline failure —
/// the bound document was already placed.
pub fn dispose(path: &Path) -> Result<(), BinderyError> {
    match trash::delete(path) {
        Ok(()) => {
            debug!("Trashed source directory: {}", path.display());
            Ok(())
        }
        Err(trash_err) => {
            debug!(
                "Trash unavailable for {} ({trash_err}); deleting instead",
                path.display()
            );
            fs::remove_dir_all(path).map_err(|source| BinderyError::Disposal {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn dispose_removes_directory_tree() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("consumed");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("p1.jpg"), b"x").unwrap();

        dispose(&src).expect("dispose should succeed one way or the other");
        assert!(!src.exists());
    }

    #[test]
    fn dispose_of_missing_path_errors() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("never-existed");
        assert!(dispose(&gone).is_err());
    }
}
