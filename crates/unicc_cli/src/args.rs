//! the args for running unicc

use clap::{value_parser, ArgAction};
use tracing::level_filters::LevelFilter;
use std::path::PathBuf;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Compiles unic sources into units")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// Specify which source files to compile
    #[clap(required = true, value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,
    /// Repair mismatched end markers and misplaced `elif`s instead of failing
    #[clap(long)]
    pub lenient: bool,
    /// Fail on sentences no unit can be determined for
    #[clap(long)]
    pub reject_unknown: bool,
    /// Number of files to compile at once, defaults to the number of cpus
    #[clap(short = 'j', long)]
    pub jobs: Option<usize>,
    /// What to print for every file
    #[clap(long, value_enum, default_value_t = Emit::Units)]
    pub emit: Emit,
}

impl Args {
    pub fn logging(&self) -> &LoggingArgs {
        &self.logging
    }
}

/// The stage whose output gets printed
#[derive(Debug, Copy, Clone, Eq, PartialEq, clap::ValueEnum)]
pub enum Emit {
    Sentences,
    Units,
}

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LoggingArgs {
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.verbose as i8 - self.quiet as i8 {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from("unicc main.unic lib.unic".split(' '))
            .expect("could not parse test string");
        assert_eq!(args.files, vec![Path::new("main.unic"), Path::new("lib.unic")]);
        assert_eq!(args.emit, Emit::Units);
        assert_eq!(args.jobs, None);
        assert!(!args.lenient);
    }

    #[test]
    fn test_compiler_flags() {
        let args = Args::try_parse_from(
            "unicc --lenient --reject-unknown -j 3 --emit sentences main.unic".split(' '),
        )
        .expect("could not parse test string");
        assert!(args.lenient);
        assert!(args.reject_unknown);
        assert_eq!(args.jobs, Some(3));
        assert_eq!(args.emit, Emit::Sentences);
    }

    #[test]
    fn test_files_required() {
        assert!(Args::try_parse_from(["unicc"]).is_err());
    }

    #[test]
    fn test_log_levels() {
        for (flags, level) in [
            ("", LevelFilter::INFO),
            ("-v", LevelFilter::DEBUG),
            ("-vv", LevelFilter::TRACE),
            ("-q", LevelFilter::ERROR),
            ("-qq", LevelFilter::OFF),
        ] {
            let args = Args::try_parse_from(
                ["unicc", flags, "main.unic"]
                    .into_iter()
                    .filter(|arg| !arg.is_empty()),
            )
            .expect("could not parse test string");
            assert_eq!(args.logging().log_level_filter(), level, "{flags:?}");
        }
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Args::try_parse_from(["unicc", "-v", "-q", "main.unic"]).is_err());
    }
}
