use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use error_set::error_set;
use side_diff::{DiffReport, ReportError, ReportOptions};
use std::fs;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "side-diff", version)]
#[command(about = "Side-by-side HTML diff reports")]
struct Cli {
    /// Log pipeline details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the difference between two files as HTML
    Render {
        /// The original file
        old: PathBuf,
        /// The changed file
        new: PathBuf,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Wrap lines at this many characters
        #[arg(short, long)]
        wrap: Option<NonZeroUsize>,
        /// Collapse long unchanged runs, keeping a few lines of context
        #[arg(long)]
        context: bool,
        /// Emit only the <table> element
        #[arg(long)]
        table_only: bool,
        /// Page title
        #[arg(long, default_value = "Diff")]
        title: String,
        /// Diff refinement budget in milliseconds (0 for none)
        #[arg(long, default_value_t = 1000)]
        timeout_ms: u64,
    },
    /// Print a shell completion script
    Completions { shell: Shell },
    /// Print the man page
    Man,
}

error_set! {
    /// Failures of the command line driver
    CliError := {
        #[display("Failed to read {path}: {message}")]
        ReadFailed { path: String, message: String },
        #[display("Failed to write {path}: {message}")]
        WriteFailed { path: String, message: String },
        ReportError(ReportError),
    }
}

fn read_lossy(path: &Path) -> Result<String, CliError> {
    let bytes = fs::read(path).map_err(|e| CliError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_report(output: Option<&Path>, html: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, html).map_err(|e| CliError::WriteFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
        None => io::stdout()
            .lock()
            .write_all(html.as_bytes())
            .map_err(|e| CliError::WriteFailed {
                path: "stdout".to_string(),
                message: e.to_string(),
            }),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .without_time()
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            old,
            new,
            output,
            wrap,
            context,
            table_only,
            title,
            timeout_ms,
        } => {
            let options = ReportOptions {
                full_context: !context,
                wrap_column: wrap,
                title,
                timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
                ..ReportOptions::default()
            };
            debug!(old = %old.display(), new = %new.display(), ?options, "rendering");

            let old_text = read_lossy(&old)?;
            let new_text = read_lossy(&new)?;
            let report = DiffReport::new(options);
            let html = if table_only {
                report.render_table(&old_text, &new_text)
            } else {
                report.render_document(&old_text, &new_text)
            }
            .map_err(CliError::from)?;
            write_report(output.as_deref(), &html)?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "side-diff", &mut io::stdout());
        }
        Commands::Man => {
            clap_mangen::Man::new(Cli::command()).render(&mut io::stdout())?;
        }
    }

    Ok(())
}
