//! rstpage - Render a reStructuredText README into a landing page

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use rstpage::page::{render_page, write_site};
use rstpage::{PageContent, RenderConfig, Severity, TransformOptions, Transformer};

#[derive(Parser)]
#[command(name = "rstpage")]
#[command(version, about = "Render a reStructuredText README into a landing page", long_about = None)]
#[command(after_help = "EXAMPLES:
    rstpage                          Print README.rst as JSON
    rstpage docs/intro.rst -f html   Print a complete HTML page
    rstpage --site public            Write public/index.html")]
struct Cli {
    /// Input file (reStructuredText)
    #[arg(value_name = "INPUT", default_value = "README.rst")]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write DIR/index.html
    #[arg(long, value_name = "DIR", conflicts_with = "output")]
    site: Option<PathBuf>,

    /// Lowest diagnostic level that aborts rendering
    #[arg(long, value_name = "LEVEL", default_value = "warning", value_parser = parse_severity)]
    halt_level: Severity,

    /// Heading level for top-level sections (1-6)
    #[arg(long, value_name = "N", default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=6))]
    initial_header_level: u8,

    /// Id of the short-features section (repeat to try several in order)
    #[arg(long = "anchor", value_name = "ID")]
    anchors: Vec<String>,

    /// Show debug output
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Structured page content
    Json,
    /// Complete HTML page
    Html,
}

fn parse_severity(s: &str) -> Result<Severity, String> {
    Severity::parse(s).ok_or_else(|| format!("unknown level '{s}' (use info, warning, error, or severe)"))
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("warn")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> rstpage::Result<()> {
    let source = fs::read_to_string(&cli.input)?;
    debug!(path = %cli.input.display(), bytes = source.len(), "read source");

    let mut options = TransformOptions::default().with_render(
        RenderConfig::default()
            .with_halt_level(cli.halt_level)
            .with_initial_header_level(cli.initial_header_level),
    );
    if !cli.anchors.is_empty() {
        options = options.with_anchor_ids(cli.anchors.iter().cloned());
    }

    let transformer: Transformer = Transformer::default().with_options(options);
    let content = transformer.transform(&source)?;
    info!(
        title = %content.title,
        features = content.features_short.len(),
        "transformed {}",
        cli.input.display()
    );

    if let Some(dir) = &cli.site {
        write_site(&content, dir)?;
        return Ok(());
    }

    let output = format_output(&content, cli.format)?;
    match &cli.output {
        Some(path) => write_file(path, &output),
        None => {
            print!("{output}");
            Ok(())
        }
    }
}

fn format_output(content: &PageContent, format: Format) -> rstpage::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(content)? + "\n",
        Format::Html => render_page(content),
    })
}

fn write_file(path: &Path, contents: &str) -> rstpage::Result<()> {
    fs::write(path, contents)?;
    info!(path = %path.display(), "wrote output");
    Ok(())
}
