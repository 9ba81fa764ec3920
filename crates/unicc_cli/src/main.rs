use crate::args::{Args, Emit};
use clap::Parser;
use eyre::eyre;
use owo_colors::{OwoColorize, Stream};
use std::fmt::{Display, Formatter};
use std::io::{self, stdout, Write};
use tracing::metadata::LevelFilter;
use tracing::{debug, trace};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::format;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry};
use unicc::{CompiledFile, UnicC};

mod args;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.logging().log_level_filter())?;
    trace!("starting unicc with args: {args:?}");
    debug!("unicc version: {}", env!("CARGO_PKG_VERSION"));

    let mut unicc_builder = UnicC::builder()
        .lenient(args.lenient)
        .reject_unknown(args.reject_unknown);
    if let Some(jobs) = args.jobs {
        unicc_builder = unicc_builder.jobs(jobs);
    }
    let unicc = unicc_builder.build()?;

    debug!("paths to compile: {:#?}", args.files);
    let compiled = unicc.compile_all(args.files.clone()).await?;

    let summary = report(&compiled, args.emit)?;
    eprintln!("{summary}");
    if summary.failed > 0 {
        return Err(eyre!("{} of {} file(s) failed to compile", summary.failed, summary.files));
    }
    Ok(())
}

/// Counts over every compiled file
#[derive(Debug, Default)]
struct Summary {
    files: usize,
    failed: usize,
    warnings: usize,
    notes: usize,
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "compiled {} file(s): {} failed, {} warning(s), {} note(s)",
            self.files, self.failed, self.warnings, self.notes
        )
    }
}

/// Prints the output of every file to stdout and its diagnostics to stderr
fn report(compiled: &[CompiledFile], emit: Emit) -> io::Result<Summary> {
    let mut summary = Summary::default();
    let mut out = stdout().lock();
    for file in compiled {
        let result = &file.result;
        summary.files += 1;
        writeln!(
            out,
            "{}",
            format!("==> {}", file.path.display())
                .if_supports_color(Stream::Stdout, |header| header.bold())
        )?;
        match emit {
            Emit::Sentences => {
                for sentence in &result.sentences {
                    writeln!(out, "{sentence}")?;
                }
            }
            Emit::Units => {
                for unit in &result.units {
                    writeln!(out, "{unit}")?;
                }
            }
        }
        out.flush()?;

        for error in &result.errors {
            eprintln!(
                "{}: {error}",
                "error".if_supports_color(Stream::Stderr, |label| label.red())
            );
        }
        for warning in &result.warnings {
            eprintln!(
                "{}: {warning}",
                "warning".if_supports_color(Stream::Stderr, |label| label.yellow())
            );
        }
        for note in &result.notes {
            eprintln!(
                "{}: {note}",
                "note".if_supports_color(Stream::Stderr, |label| label.blue())
            );
        }

        if !result.is_ok() {
            summary.failed += 1;
        }
        summary.warnings += result.warnings.len();
        summary.notes += result.notes.len();
    }
    Ok(summary)
}

/// Logs go to stderr, stdout is reserved for the emitted sentences or units
fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    let registry = Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().with_thread_ids(true))
                .with_writer(io::stderr)
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)?;

    Ok(())
}
