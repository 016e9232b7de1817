//! CLI binary for bindery.
//!
//! A thin shim over the library crate that maps CLI flags to `BindConfig`,
//! provisions the process-scoped work directory, and renders progress.

use anyhow::{bail, Context, Result};
use bindery::{
    pipeline, resolve_source_directories, BindConfig, BindProgress, BinderyError, PdfBinder,
    ProgressHook,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress rendering using indicatif ───────────────────────────────────

/// Terminal progress: a live bar plus one log line per directory. Directories
/// finish out of order in concurrent mode; every callback only appends.
struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_start

        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} directories  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Binding");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl BindProgress for CliProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_bound(&self, source: &Path, document: &Path) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            source.display(),
            dim(&format!("→ {}", document.display())),
        ));
        self.bar.inc(1);
    }

    fn on_error(&self, source: &Path, error: &BinderyError) {
        let msg = truncated(&error.to_string(), 120);
        self.bar
            .println(format!("  {} {}  {}", red("✗"), source.display(), red(&msg)));
        self.bar.inc(1);
    }

    fn on_skipped(&self, source: &Path) {
        self.bar.println(format!(
            "  {} {}  {}",
            dim("–"),
            source.display(),
            dim("skipped"),
        ));
        self.bar.inc(1);
    }

    fn on_complete(&self, bound: usize, total: usize) {
        self.bar.finish_and_clear();
        let remainder = total.saturating_sub(bound);
        if remainder == 0 {
            eprintln!(
                "{} {} directories bound",
                green("✔"),
                bold(&bound.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} directories bound  ({} failed or skipped)",
                if bound == 0 { red("✘") } else { cyan("⚠") },
                bold(&bound.to_string()),
                total,
                red(&remainder.to_string()),
            );
        }
    }
}

/// Cap a log line at roughly `limit` bytes. Error messages embed
/// `path.display()`, so the cut must land on a char boundary — directory
/// names are routinely multi-byte.
fn truncated(msg: &str, limit: usize) -> String {
    if msg.len() <= limit {
        return msg.to_string();
    }
    let mut end = limit;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &msg[..end])
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bind every image folder found under scans/ (recursively)
  bindery scans/*

  # Shell-expanded image files: their containing folder is the unit of work
  bindery /scans/holiday/*.jpg

  # Bind one folder, then move it to the trash
  bindery --dispose /scans/holiday

  # Four folders at a time, machine-readable report
  bindery -c 4 --json /archive/**

A directory qualifies when every one of its direct files is a .jpg, .jpeg,
or .png (case-insensitive). One stray file disqualifies it; qualifying
sub-directories are still found. Each bound PDF lands next to its source
directory as <name>.pdf, with " (1)", " (2)", … appended on collision.

EXIT STATUS:
  0  every resolved directory was bound
  1  resolution failed, or at least one directory failed to bind
"#;

/// Bind directories of images into single PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "bindery",
    version,
    about = "Bind directories of images into single PDF documents",
    long_about = "Turn directories of JPEG/PNG images into one paginated PDF each, \
placed next to the source directory. Accepts literal paths and glob patterns; \
directories are processed concurrently and the first failure cancels the rest \
of the batch.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Paths or glob patterns naming image directories (or the images themselves).
    paths: Vec<String>,

    /// Number of directories converted in parallel.
    #[arg(short, long, env = "BINDERY_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Dispose of each source directory (trash, else delete) after binding.
    #[arg(short, long)]
    dispose: bool,

    /// Only consider the given directories themselves, not nested ones.
    #[arg(long)]
    no_recurse: bool,

    /// Output the produced documents as JSON instead of plain paths.
    #[arg(long, env = "BINDERY_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "BINDERY_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BINDERY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BINDERY_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.paths.is_empty() {
        bail!("no files or directories passed");
    }

    // ── Resolve sources ──────────────────────────────────────────────────
    let sources = resolve_source_directories(&cli.paths, !cli.no_recurse)
        .context("Failed to resolve source directories")?;
    if sources.is_empty() {
        bail!("no source directories found (directories must contain only .jpg/.jpeg/.png files)");
    }

    // ── Process-scoped work directory, removed on drop ───────────────────
    let work_dir = tempfile::Builder::new()
        .prefix("bindery-")
        .tempdir()
        .context("Failed to create temporary work directory")?;

    // ── Build config and run ─────────────────────────────────────────────
    let mut builder = BindConfig::builder()
        .concurrency(cli.concurrency)
        .dispose(cli.dispose)
        .work_dir(work_dir.path());
    if show_progress {
        builder = builder.progress(CliProgress::new() as ProgressHook);
    }
    let config = builder.build();

    let report = pipeline::run(&sources, Arc::new(PdfBinder::new()), &config).await;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report.documents)
                .context("Failed to serialise report")?
        );
    } else if !cli.quiet {
        // Produced document paths on stdout; progress and logs went to stderr.
        for bound in &report.documents {
            println!("{}", bound.document.display());
        }
    }

    if let Some(err) = report.failure {
        return Err(err.into());
    }
    Ok(())
}
