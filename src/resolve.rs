//! Source-directory resolution: turn raw CLI arguments into a validated,
//! sorted, deduplicated set of directories to bind.
//!
//! ## What qualifies
//!
//! A directory is a source directory when its direct non-directory children
//! are non-empty and all carry a supported image extension. Subdirectories
//! among the children do not disqualify the directory — they are simply not
//! part of it — but a single stray `.txt` or `.gif` does. A directory with
//! no direct image children never qualifies itself, even when every one of
//! its subdirectories does.
//!
//! ## Argument handling
//!
//! Arguments may be literal paths or glob patterns. A list of literal image
//! files sharing one directory (the shell already expanded `*.jpg`)
//! collapses to that containing directory, so `bindery scans/holiday/*`
//! binds `scans/holiday` as one document.
//!
//! Direct qualification and recursive descent are two independent checks:
//! a directory can appear in the result *and* contribute nested source
//! directories discovered below it.

use crate::classify;
use crate::error::BinderyError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Characters that make an argument a glob pattern rather than a literal path.
const WILDCARDS: [char; 3] = ['*', '?', '['];

/// Expand `args` (literal paths and glob patterns) into the sorted,
/// deduplicated list of source directories they denote.
///
/// With `recursive` set, qualifying directories nested at any depth below a
/// directory argument are discovered as well.
///
/// # Errors
/// Only a syntactically invalid glob pattern is fatal. Arguments that fail
/// to resolve or stat are logged at debug level and skipped.
pub fn resolve_source_directories(
    args: &[impl AsRef<str>],
    recursive: bool,
) -> Result<Vec<PathBuf>, BinderyError> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        if !arg.contains(WILDCARDS) {
            match std::path::absolute(arg) {
                Ok(path) => candidates.push(path),
                Err(err) => debug!("Skipping unusable argument '{arg}': {err}"),
            }
            continue;
        }

        // One level of glob expansion: the matches themselves are resolved
        // without further descent.
        let matches = expand_pattern(arg)?;
        candidates.extend(resolve_candidates(matches, false)?);
    }

    resolve_candidates(candidates, recursive)
}

/// Classify absolute candidate paths into source directories.
fn resolve_candidates(
    candidates: Vec<PathBuf>,
    recursive: bool,
) -> Result<Vec<PathBuf>, BinderyError> {
    // A flat list of image files stands in for its containing directory.
    if classify::all_image_files(&candidates) {
        if let Some(parent) = candidates[0].parent() {
            return resolve_candidates(vec![parent.to_path_buf()], false);
        }
    }

    let mut sources: Vec<PathBuf> = Vec::new();
    for path in &candidates {
        let Ok(metadata) = fs::metadata(path) else {
            debug!("Skipping unreadable candidate: {}", path.display());
            continue;
        };
        if !metadata.is_dir() {
            continue;
        }

        let Some(children) = list_children(path) else {
            continue;
        };

        // Two independent outcomes, both may contribute: the directory
        // qualifying directly, and qualifying directories below it.
        if directory_qualifies(&children) {
            sources.push(path.clone());
        }
        if recursive {
            for child in children.iter().filter(|c| c.is_dir()) {
                sources.extend(resolve_candidates(vec![child.clone()], true)?);
            }
        }
    }

    sources.sort();
    sources.dedup();
    Ok(sources)
}

/// Expand a glob pattern into absolute match paths.
///
/// Pattern syntax errors are fatal; matches that fail to absolutise or read
/// are skipped.
fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>, BinderyError> {
    let paths = glob::glob(pattern).map_err(|source| BinderyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(paths
        .filter_map(|entry| match entry {
            Ok(path) => match std::path::absolute(&path) {
                Ok(abs) => Some(abs),
                Err(err) => {
                    debug!("Skipping match '{}': {err}", path.display());
                    None
                }
            },
            Err(err) => {
                debug!("Skipping unreadable glob match: {err}");
                None
            }
        })
        .collect())
}

/// List a directory's direct children via a non-recursive `dir/*` glob.
///
/// Returns `None` when the directory path is not valid UTF-8 or the
/// internally built pattern fails; such directories are treated as not
/// usable, matching the resolver's skip-on-stat-failure policy.
fn list_children(dir: &Path) -> Option<Vec<PathBuf>> {
    let dir_str = dir.to_str()?;
    let pattern = format!("{}/*", glob::Pattern::escape(dir_str));
    let paths = glob::glob(&pattern).ok()?;
    Some(paths.filter_map(Result::ok).collect())
}

/// Permissive check on a directory's children: subdirectories are excluded
/// from consideration, the remaining entries must be non-empty and all
/// supported images.
fn directory_qualifies(children: &[PathBuf]) -> bool {
    let files: Vec<&PathBuf> = children.iter().filter(|c| !c.is_dir()).collect();
    !files.is_empty() && files.iter().all(|f| classify::is_supported_image(f))
}
