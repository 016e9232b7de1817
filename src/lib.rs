//! # bindery
//!
//! Bind directories of images into single-file PDF documents, in batch.
//!
//! ## Why this crate?
//!
//! Scanners, phone cameras, and comic archives all produce the same thing:
//! a folder full of numbered JPEGs and PNGs. bindery turns each such folder
//! into one paginated PDF placed next to it, and can process a whole tree
//! of folders in a single invocation with bounded parallelism.
//!
//! ## Pipeline Overview
//!
//! ```text
//! CLI args (paths, globs)
//!  │
//!  ├─ 1. Resolve   expand globs, classify "all-image" directories,
//!  │               sort + dedup           (resolve)
//!  ├─ 2. Schedule  one task per directory, semaphore-bounded workers,
//!  │               first-error cancellation (pipeline)
//!  ├─ 3. Bind      images → one PDF page each, native size, collated
//!  │               by filename (binder, spawn_blocking)
//!  ├─ 4. Place     collision-safe name in the source's parent (naming)
//!  └─ 5. Dispose   optional: trash or delete the source (dispose)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bindery::{pipeline, resolve_source_directories, BindConfig, PdfBinder};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sources = resolve_source_directories(&["/scans/*".to_string()], true)?;
//!     let config = BindConfig::builder().concurrency(4).build();
//!     let report = pipeline::run(&sources, Arc::new(PdfBinder::new()), &config).await;
//!     for bound in report.into_result()? {
//!         println!("{}", bound.document.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bindery` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! bindery = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod binder;
pub mod classify;
pub mod config;
pub mod dispose;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod resolve;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use binder::{decode_image_dimensions, DirectoryBinder, PdfBinder};
pub use classify::{is_supported_image, SUPPORTED_EXTENSIONS};
pub use config::{BindConfig, BindConfigBuilder};
pub use dispose::dispose;
pub use error::BinderyError;
pub use naming::destination_path;
pub use pipeline::{run, BoundDocument, PipelineResult};
pub use progress::{BindProgress, ProgressHook};
pub use resolve::resolve_source_directories;
