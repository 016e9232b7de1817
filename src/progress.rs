//! Progress reporting for bind runs.
//!
//! The pipeline reports through this trait instead of printing, so the
//! library stays silent and frontends choose their own rendering (the CLI
//! draws an indicatif bar; tests record calls). Tasks finish out of order,
//! so implementations must tolerate arbitrary interleaving of the
//! per-directory callbacks.

use crate::error::BinderyError;
use std::path::Path;
use std::sync::Arc;

/// Callbacks fired by [`crate::pipeline::run`]. All default to no-ops.
pub trait BindProgress: Send + Sync {
    /// A run over `total` source directories is starting.
    fn on_start(&self, total: usize) {
        let _ = total;
    }

    /// `source` was bound and its document placed at `document`.
    fn on_bound(&self, source: &Path, document: &Path) {
        let _ = (source, document);
    }

    /// Binding `source` failed with `error`.
    fn on_error(&self, source: &Path, error: &BinderyError) {
        let _ = (source, error);
    }

    /// `source` was skipped because the run was already cancelled.
    fn on_skipped(&self, source: &Path) {
        let _ = source;
    }

    /// The run finished; `bound` of `total` directories produced documents.
    fn on_complete(&self, bound: usize, total: usize) {
        let _ = (bound, total);
    }
}

/// Shared handle to a progress implementation.
pub type ProgressHook = Arc<dyn BindProgress>;
