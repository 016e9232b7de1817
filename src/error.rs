//! Error types for the bindery library.
//!
//! The variants map onto four distinct failure classes with different
//! propagation rules:
//!
//! * Resolution errors (`InvalidPattern`) — abort before any conversion
//!   is scheduled.
//! * Conversion errors (`EmptyDirectory`, `ImageDecode`, `Bind`) — fail one
//!   directory, cancel all not-yet-started work, and surface as the
//!   pipeline's single reported error.
//! * `Placement` — renaming a produced document into its final destination
//!   failed. Kept separate from conversion errors because it signals a
//!   filesystem problem rather than bad data in one source directory; it is
//!   fatal for the whole run.
//! * `Disposal` — best-effort cleanup failed. The pipeline logs this and
//!   never propagates it: the document was already placed successfully.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the bindery library.
#[derive(Debug, Error)]
pub enum BinderyError {
    // ── Resolution errors ─────────────────────────────────────────────────
    /// A glob pattern passed on the command line is syntactically invalid.
    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A source directory contained no image files at bind time.
    ///
    /// The resolver never emits such directories, so this usually means the
    /// directory changed between resolution and conversion.
    #[error("No images found in '{dir}'")]
    EmptyDirectory { dir: PathBuf },

    /// An image file could not be decoded.
    #[error("Failed to decode image '{path}': {detail}")]
    ImageDecode { path: PathBuf, detail: String },

    /// Assembling or writing the document for one source directory failed.
    #[error("Failed to bind '{dir}': {detail}")]
    Bind { dir: PathBuf, detail: String },

    // ── Placement errors ──────────────────────────────────────────────────
    /// Moving a produced document to its final destination failed.
    #[error("Failed to move document '{from}' to '{to}': {source}")]
    Placement {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Disposal errors ───────────────────────────────────────────────────
    /// Neither trashing nor deleting a consumed source directory worked.
    #[error("Failed to dispose of '{path}': {source}")]
    Disposal {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BinderyError {
    /// True for the error classes that must abort the whole run rather than
    /// fail a single source directory.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BinderyError::Placement { .. } | BinderyError::Internal(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_display_names_directory() {
        let e = BinderyError::Bind {
            dir: PathBuf::from("/scans/b"),
            detail: "broken page".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("/scans/b"), "got: {msg}");
        assert!(msg.contains("broken page"));
    }

    #[test]
    fn placement_display_names_both_paths() {
        let e = BinderyError::Placement {
            from: PathBuf::from("/tmp/work/a.pdf"),
            to: PathBuf::from("/scans/a.pdf"),
            source: std::io::Error::other("disk gone"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/work/a.pdf"));
        assert!(msg.contains("/scans/a.pdf"));
        assert!(e.is_fatal());
    }

    #[test]
    fn image_decode_display() {
        let e = BinderyError::ImageDecode {
            path: PathBuf::from("/scans/a/p1.png"),
            detail: "bad header".into(),
        };
        assert!(e.to_string().contains("p1.png"));
        assert!(!e.is_fatal());
    }
}
