//! bib2cv - BibTeX to LaTeX publication list
//!
//! Reads one or more `.bib` files and prints journal, conference and thesis
//! citations in IEEE style, ready to `\input` into a CV.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bib2cv_bibtex::{load_files, LoadError};
use bib2cv_core::{convert, HighlightTarget};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bib2cv")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// BibTeX file(s) to process, in order
    #[arg(required = true, value_name = "BIB")]
    bibs: Vec<PathBuf>,

    /// Author to set in bold, as "Last,First"
    #[arg(short, long, value_name = "LAST,FIRST")]
    user: Option<HighlightTarget>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Load(LoadError::Input { diagnostics })) => {
            for diagnostic in &diagnostics {
                println!("{diagnostic}");
            }
            println!("Input error!");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("bib2cv: {err}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn run(cli: Cli) -> Result<(), Error> {
    let entries = load_files(&cli.bibs)?;
    debug!(count = entries.len(), "loaded entries");
    if let Some(user) = &cli.user {
        debug!(%user, "highlighting author");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    convert(&entries, cli.user, &mut out)?;
    out.flush()?;
    Ok(())
}
