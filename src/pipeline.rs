//! Bounded concurrent conversion pipeline.
//!
//! Every source directory becomes one task. Tasks run concurrently up to
//! `min(available_parallelism, concurrency)` with no ordering guarantee;
//! the semaphore is the back-pressure point bounding peak resource use
//! (open handles, decoded pages in memory).
//!
//! ## Cancellation
//!
//! The first failing task flips a shared flag. Tasks check the flag once,
//! right after acquiring their pool slot: not-yet-started work is skipped
//! as a silent no-op, while tasks already past the check run to completion
//! — there is no mid-bind preemption. The pipeline always waits for every
//! task before returning, and reports the first error only.

use crate::binder::DirectoryBinder;
use crate::config::BindConfig;
use crate::dispose;
use crate::error::BinderyError;
use crate::naming;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// One successfully bound directory.
#[derive(Debug, Clone, Serialize)]
pub struct BoundDocument {
    /// The consumed source directory.
    pub source: PathBuf,
    /// Final location of the produced document.
    pub document: PathBuf,
}

/// Aggregate outcome of one pipeline invocation.
///
/// `failure` holds the first error encountered, if any. Successes placed
/// before the failure are never rolled back and remain listed in
/// `documents`; `skipped` counts tasks that never ran due to cancellation.
#[derive(Debug)]
pub struct PipelineResult {
    pub documents: Vec<BoundDocument>,
    pub failure: Option<BinderyError>,
    pub skipped: usize,
}

impl PipelineResult {
    /// Collapse into a `Result`, treating any failure as fatal.
    pub fn into_result(self) -> Result<Vec<BoundDocument>, BinderyError> {
        match self.failure {
            Some(err) => Err(err),
            None => Ok(self.documents),
        }
    }
}

enum TaskOutcome {
    Bound(BoundDocument),
    Failed(BinderyError),
    Skipped,
}

/// Bind every directory in `sources`, with bounded parallelism and
/// first-error cancellation of unstarted work.
pub async fn run(
    sources: &[PathBuf],
    binder: Arc<dyn DirectoryBinder>,
    config: &BindConfig,
) -> PipelineResult {
    let total = sources.len();
    let pool_size = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(config.concurrency.max(1));
    info!("Binding {total} directories ({pool_size} workers)");

    let semaphore = Arc::new(Semaphore::new(pool_size));
    let cancelled = Arc::new(AtomicBool::new(false));
    // Name allocation plus the following move run under one lock: the
    // stat-then-rename in naming::destination_path is not atomic against
    // concurrent tasks placing into the same parent directory.
    let naming_lock = Arc::new(Mutex::new(()));

    if let Some(hook) = &config.progress {
        hook.on_start(total);
    }

    let mut tasks = JoinSet::new();
    for source in sources {
        let source = source.clone();
        let binder = Arc::clone(&binder);
        let semaphore = Arc::clone(&semaphore);
        let cancelled = Arc::clone(&cancelled);
        let naming_lock = Arc::clone(&naming_lock);
        let config = config.clone();
        tasks.spawn(async move {
            bind_one(source, binder, semaphore, cancelled, naming_lock, config).await
        });
    }

    let mut documents: Vec<BoundDocument> = Vec::new();
    let mut failure: Option<BinderyError> = None;
    let mut skipped = 0usize;

    // Cancellation stops new work, never abandons in-flight work: drain
    // every task before returning.
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(TaskOutcome::Bound(doc)) => documents.push(doc),
            Ok(TaskOutcome::Failed(err)) => {
                if failure.is_none() {
                    failure = Some(err);
                } else {
                    // First error wins; later ones were already reported
                    // through the progress hook.
                    debug!("Suppressing subsequent failure: {err}");
                }
            }
            Ok(TaskOutcome::Skipped) => skipped += 1,
            Err(join_err) => {
                cancelled.store(true, Ordering::SeqCst);
                if failure.is_none() {
                    failure = Some(BinderyError::Internal(format!(
                        "bind task panicked: {join_err}"
                    )));
                }
            }
        }
    }

    // Completion order is scheduling order; report sorted like the resolver.
    documents.sort_by(|a, b| a.source.cmp(&b.source));

    if let Some(hook) = &config.progress {
        hook.on_complete(documents.len(), total);
    }
    match &failure {
        None => info!("Bound {}/{total} directories", documents.len()),
        Some(err) => warn!(
            "Run failed after {} of {total} directories ({skipped} skipped): {err}",
            documents.len()
        ),
    }

    PipelineResult {
        documents,
        failure,
        skipped,
    }
}

async fn bind_one(
    source: PathBuf,
    binder: Arc<dyn DirectoryBinder>,
    semaphore: Arc<Semaphore>,
    cancelled: Arc<AtomicBool>,
    naming_lock: Arc<Mutex<()>>,
    config: BindConfig,
) -> TaskOutcome {
    // Back-pressure point: waits here while the pool is at capacity.
    let Ok(_permit) = semaphore.acquire().await else {
        // The semaphore is never closed; treat a closed pool as cancellation.
        return TaskOutcome::Skipped;
    };

    if cancelled.load(Ordering::SeqCst) {
        debug!("Skipping {} (run cancelled)", source.display());
        if let Some(hook) = &config.progress {
            hook.on_skipped(&source);
        }
        return TaskOutcome::Skipped;
    }

    // Binders are blocking (image decode + document serialisation), so the
    // call runs on the blocking thread pool.
    let bound = {
        let binder = Arc::clone(&binder);
        let dir = source.clone();
        let work_dir = config.work_dir.clone();
        tokio::task::spawn_blocking(move || binder.bind(&dir, &work_dir)).await
    };

    let produced = match bound {
        Ok(Ok(path)) => path,
        Ok(Err(err)) => {
            cancelled.store(true, Ordering::SeqCst);
            warn!("Bind failed for {}: {err}", source.display());
            if let Some(hook) = &config.progress {
                hook.on_error(&source, &err);
            }
            return TaskOutcome::Failed(err);
        }
        Err(join_err) => {
            cancelled.store(true, Ordering::SeqCst);
            let err = BinderyError::Internal(format!("bind task panicked: {join_err}"));
            if let Some(hook) = &config.progress {
                hook.on_error(&source, &err);
            }
            return TaskOutcome::Failed(err);
        }
    };

    // Placement. A failure here is filesystem dysfunction, not a data
    // problem with one directory: cancel the run and surface it as the
    // top-level error.
    let destination = {
        let _guard = naming_lock.lock().await;
        let destination = naming::destination_path(&source);
        if let Err(err) = place(&produced, &destination) {
            cancelled.store(true, Ordering::SeqCst);
            error!("{err}");
            if let Some(hook) = &config.progress {
                hook.on_error(&source, &err);
            }
            return TaskOutcome::Failed(err);
        }
        destination
    };
    info!("Bound {} -> {}", source.display(), destination.display());

    if config.dispose {
        // Best-effort: the document is already placed, so a failed cleanup
        // is logged and swallowed.
        if let Err(err) = dispose::dispose(&source) {
            error!("{err}");
        }
    }

    if let Some(hook) = &config.progress {
        hook.on_bound(&source, &destination);
    }
    TaskOutcome::Bound(BoundDocument {
        source,
        document: destination,
    })
}

/// Move the produced document into place. Tries `rename` first and falls
/// back to copy + remove when the work directory sits on another
/// filesystem.
fn place(from: &Path, to: &Path) -> Result<(), BinderyError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_then_remove(from, to).map_err(|source| BinderyError::Placement {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}
