//! CLI binary for pdf-assets.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints progress and a summary.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_assets::{
    run, DocumentReport, ExtractionConfig, ExtractionProgressCallback, OpenError, ProgressCallback,
    RunSummary,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a document-level progress bar plus one log
/// line per document. When stderr is not a terminal the bar is hidden and
/// the log lines go straight to stderr.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Pages finished in the current document, for the bar message.
    pages_done: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Looking for PDF files…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            pages_done: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Extracting");
        self.bar.reset_eta();
    }

    /// Print above the bar, or directly when the bar is not drawn.
    fn line(&self, msg: String) {
        if self.bar.is_hidden() {
            eprintln!("{msg}");
        } else {
            self.bar.println(msg);
        }
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_documents: usize) {
        if total_documents == 0 {
            self.bar.finish_and_clear();
            return;
        }
        self.activate_bar(total_documents);
        self.line(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_documents} PDF files"))
        ));
    }

    fn on_document_start(&self, index: usize, total: usize, path: &Path) {
        self.pages_done.store(0, Ordering::SeqCst);
        self.line(format!(
            "{} Processing {}",
            dim(&format!("[{index}/{total}]")),
            path.display()
        ));
        self.bar.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }

    fn on_page_complete(&self, _page_num: usize, total_pages: usize, _text_len: usize, _images: usize) {
        let done = self.pages_done.fetch_add(1, Ordering::SeqCst) + 1;
        self.bar.set_message(format!("page {done}/{total_pages}"));
    }

    fn on_document_complete(&self, _index: usize, _total: usize, report: &DocumentReport) {
        self.line(format!(
            "  {} done -> {}  {}",
            green("✓"),
            report.output_dir.display(),
            dim(&format!(
                "{} pages, {} images",
                report.page_count,
                report.image_count()
            )),
        ));
        self.bar.inc(1);
    }

    fn on_document_skipped(&self, _index: usize, _total: usize, path: &Path, error: &OpenError) {
        self.line(format!(
            "  {} ERROR opening {}: {}",
            red("✗"),
            path.display(),
            red(&error.to_string())
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        self.bar.finish_and_clear();
        if summary.discovered == 0 {
            return;
        }
        let skipped = summary.skipped.len();
        eprintln!(
            "{} {}/{} documents extracted  {}",
            if skipped == 0 { green("✔") } else { cyan("⚠") },
            bold(&summary.documents.len().to_string()),
            summary.discovered,
            dim(&format!(
                "{} pages, {} images, {}ms",
                summary.total_pages(),
                summary.total_images(),
                summary.duration_ms
            )),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract every PDF under the current directory into ./docs/pdf-assets/
  pdf-assets

  # Scan a specific tree
  pdf-assets ~/papers

  # Write somewhere else
  pdf-assets ~/papers -o /tmp/paper-assets

  # Remove each document's previous output before writing
  pdf-assets --clean ~/papers

  # Machine-readable summary
  pdf-assets --json ~/papers > summary.json

OUTPUT LAYOUT:
  <output>/<name>/metadata.txt            Path and page count
  <output>/<name>/page-<N>.txt            Text of page N
  <output>/<name>/page-<N>-img-<M>.<ext>  M-th image on page N

  <name> is the PDF file stem with characters outside [0-9A-Za-z._-]
  replaced by '_'. Two PDFs with the same <name> share one directory;
  the run reports such collisions.

  Image extensions follow the embedded encoding: jpeg, jpx, jb2 are
  copied out of the stream; bare pixel data is re-encoded as png; an
  encoding that cannot be identified defaults to png as well.

ENVIRONMENT VARIABLES:
  PDF_ASSETS_ROOT      Default scan root
  PDF_ASSETS_OUTPUT    Default output root
  RUST_LOG             Log filter (overrides --verbose/--quiet)
"#;

/// Extract per-page text and embedded images from every PDF in a directory tree.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-assets",
    version,
    about = "Extract per-page text and embedded images from every PDF in a directory tree",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory to scan recursively for .pdf files.
    #[arg(env = "PDF_ASSETS_ROOT", default_value = ".")]
    root: PathBuf,

    /// Output root. Default: <ROOT>/docs/pdf-assets.
    #[arg(short, long, env = "PDF_ASSETS_OUTPUT")]
    output: Option<PathBuf>,

    /// Remove each document's output directory before writing it.
    #[arg(long, env = "PDF_ASSETS_CLEAN")]
    clean: bool,

    /// Follow symbolic links while scanning.
    #[arg(long)]
    follow_links: bool,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF_ASSETS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress callback prints per-document lines itself, so library
    // INFO logs are suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let summary = run(&config).await.context("Extraction failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    }

    if cli.quiet {
        return Ok(());
    }

    if summary.discovered == 0 {
        eprintln!("No PDF files found under {}", summary.root.display());
        return Ok(());
    }

    for collision in &summary.collisions {
        eprintln!(
            "{} {} documents share output directory '{}':",
            cyan("⚠"),
            collision.sources.len(),
            collision.name
        );
        for source in &collision.sources {
            eprintln!("    {}", dim(&source.display().to_string()));
        }
    }

    eprintln!(
        "\nAll done. Output under {}",
        bold(&summary.output_root.display().to_string())
    );

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let mut builder = ExtractionConfig::builder()
        .root(&cli.root)
        .clean_output(cli.clean)
        .follow_links(cli.follow_links);

    if let Some(ref output) = cli.output {
        builder = builder.output_dir(output);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
