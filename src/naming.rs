//! Destination naming: where a bound document lands next to its source.
//!
//! The document for `/scans/holiday` becomes `/scans/holiday.pdf`; existing
//! entries at that name push the result to `holiday (1).pdf`, `holiday
//! (2).pdf`, and so on. The check-then-use sequence here is not atomic, so
//! the pipeline serializes name allocation and the subsequent move under one
//! lock (see [`crate::pipeline`]).

use std::path::{Path, PathBuf};

/// Compute a non-colliding output path for `source_dir` in its parent
/// directory, deterministic given the filesystem state at call time.
pub fn destination_path(source_dir: &Path) -> PathBuf {
    let parent = source_dir.parent().unwrap_or_else(|| Path::new("."));
    let stem = source_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bound".to_string());

    let mut candidate = parent.join(format!("{stem}.pdf"));
    let mut counter: u32 = 0;
    // `exists()` is a stat; a broken symlink at the candidate name counts as
    // occupied via symlink_metadata so we never clobber it.
    while candidate.exists() || candidate.symlink_metadata().is_ok() {
        counter += 1;
        candidate = parent.join(format!("{stem} ({counter}).pdf"));
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn first_name_is_directory_basename_plus_pdf() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("holiday");
        fs::create_dir(&src).unwrap();
        assert_eq!(destination_path(&src), tmp.path().join("holiday.pdf"));
    }

    #[test]
    fn collisions_increment_counter() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("x");
        fs::create_dir(&src).unwrap();

        fs::write(tmp.path().join("x.pdf"), b"").unwrap();
        fs::write(tmp.path().join("x (1).pdf"), b"").unwrap();
        fs::write(tmp.path().join("x (2).pdf"), b"").unwrap();

        let dest = destination_path(&src);
        assert_eq!(dest, tmp.path().join("x (3).pdf"));
        assert!(!dest.exists());
    }

    #[test]
    fn gaps_in_counters_are_not_reused_before_lower_names() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("x");
        fs::create_dir(&src).unwrap();

        // Only "x (1).pdf" exists: the base name is free and wins.
        fs::write(tmp.path().join("x (1).pdf"), b"").unwrap();
        assert_eq!(destination_path(&src), tmp.path().join("x.pdf"));
    }
}
