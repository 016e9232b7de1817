//! Configuration for a bind run.
//!
//! One [`BindConfig`] value carries everything a run needs — worker bound,
//! disposal flag, work directory, progress hook — so components take an
//! explicit config instead of reading process-wide state.

use crate::progress::ProgressHook;
use std::fmt;
use std::path::PathBuf;

/// Configuration for [`crate::pipeline::run`].
///
/// Built via [`BindConfig::builder()`] or [`BindConfig::default()`].
///
/// # Example
/// ```rust
/// use bindery::BindConfig;
///
/// let config = BindConfig::builder()
///     .concurrency(2)
///     .dispose(true)
///     .build();
/// ```
#[derive(Clone)]
pub struct BindConfig {
    /// Upper bound on concurrently running bind tasks. Default: 4.
    ///
    /// The effective pool size is `min(available_parallelism, concurrency)`.
    /// Each in-flight task holds the source directory's decoded pages in
    /// memory while the document is assembled, so this bound also caps peak
    /// memory and open file handles.
    pub concurrency: usize,

    /// Remove each source directory after its document is placed. Default: false.
    ///
    /// Disposal tries the system trash first and falls back to a recursive
    /// delete; see [`crate::dispose`].
    pub dispose: bool,

    /// Directory where collaborators write documents before placement.
    ///
    /// Defaults to the system temp directory. The CLI provisions a
    /// process-scoped [`tempfile::TempDir`] and passes its path here so the
    /// workspace is removed on exit.
    pub work_dir: PathBuf,

    /// Optional progress hook, invoked per directory as tasks finish.
    pub progress: Option<ProgressHook>,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            dispose: false,
            work_dir: std::env::temp_dir(),
            progress: None,
        }
    }
}

impl fmt::Debug for BindConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindConfig")
            .field("concurrency", &self.concurrency)
            .field("dispose", &self.dispose)
            .field("work_dir", &self.work_dir)
            .field("progress", &self.progress.as_ref().map(|_| "<dyn BindProgress>"))
            .finish()
    }
}

impl BindConfig {
    /// Create a new builder for `BindConfig`.
    pub fn builder() -> BindConfigBuilder {
        BindConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`BindConfig`].
#[derive(Debug)]
pub struct BindConfigBuilder {
    config: BindConfig,
}

impl BindConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn dispose(mut self, v: bool) -> Self {
        self.config.dispose = v;
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.work_dir = dir.into();
        self
    }

    pub fn progress(mut self, hook: ProgressHook) -> Self {
        self.config.progress = Some(hook);
        self
    }

    pub fn build(self) -> BindConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BindConfig::default();
        assert_eq!(c.concurrency, 4);
        assert!(!c.dispose);
        assert!(c.progress.is_none());
    }

    #[test]
    fn zero_concurrency_is_clamped_to_one() {
        let c = BindConfig::builder().concurrency(0).build();
        assert_eq!(c.concurrency, 1);
    }
}
