//! CLI binary for rst2md.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use rst2md::{convert_file, convert_to_file, ConversionConfig, FileConversion};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert integrations.rst in the current directory to integrations.md
  rst2md

  # Convert a specific file (writes guide.md next to it)
  rst2md docs/guide.rst

  # Choose the output path
  rst2md docs/guide.rst -o site/guide.md

  # Print the construct inventory of a document as JSON
  rst2md --report docs/guide.rst

  # Show per-stage rewrite counts
  rst2md -v docs/guide.rst

ENVIRONMENT VARIABLES:
  RST2MD_OUTPUT    Default for --output
  RST2MD_REPORT    Default for --report
  RST2MD_VERBOSE   Default for --verbose
  RST2MD_QUIET     Default for --quiet
  RUST_LOG         Full tracing filter; overrides -v and -q
"#;

/// Convert reStructuredText documents to Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "rst2md",
    version,
    about = "Convert reStructuredText documents to Markdown",
    long_about = "Convert a reStructuredText document to GitHub-flavoured Markdown. \
Section titles, admonitions, raw HTML, links, images and literal blocks are rewritten; \
leftover directive syntax is stripped and code fences are always balanced.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// RST file to convert.
    #[arg(default_value = "integrations.rst")]
    input: PathBuf,

    /// Write Markdown to this file instead of `<input stem>.md`.
    #[arg(short, long, env = "RST2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Print a JSON inventory of the RST constructs in INPUT; no conversion.
    #[arg(long, env = "RST2MD_REPORT")]
    report: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RST2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "RST2MD_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Report mode ──────────────────────────────────────────────────────
    if cli.report {
        let report = rst_analyzer::analyze_file(&cli.input)
            .with_context(|| format!("Failed to analyze {}", cli.input.display()))?;
        println!(
            "{}",
            report.to_json().context("Failed to serialise report")?
        );
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let config = ConversionConfig::default();
    let done = match cli.output {
        Some(ref output) => convert_to_file(&cli.input, output, &config).await,
        None => convert_file(&cli.input, &config).await,
    }
    .context("Conversion failed")?;

    if !cli.quiet {
        print_summary(&done, cli.verbose);
    }

    Ok(())
}

fn print_summary(done: &FileConversion, verbose: bool) {
    println!(
        "Converted {} to {}",
        done.input.display(),
        done.output.display()
    );
    if verbose {
        eprintln!(
            "  {} → {} lines in {}ms{}",
            done.stats.input_lines,
            done.stats.output_lines,
            done.stats.duration_ms,
            if done.stats.fence_closed {
                "  (closed an unbalanced code fence)"
            } else {
                ""
            }
        );
    }
}
