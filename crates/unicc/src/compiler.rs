//! Responsible with compiling unic sources into units

use crate::result::{CompileResult, CompiledFile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, error_span, instrument, Instrument};
use unic_parsing::{tokenize, Diagnostic, GrammarBuilder};
use unic_sentences::{LineCol, Sentence};
use unic_units::{ScopeKind, Unit};

pub mod error;

/// Prelude that can be used in inner modules.
mod prelude {
    pub use super::error::{Location, UnicCError, UnicCErrorKind, UnicCResult};
}

pub use prelude::*;
pub use unic_parsing::grammar::{BuildOptions, ScopePolicy, UnknownSentencePolicy};

/// A source that went through both stages without a fatal error
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub sentences: Vec<Sentence>,
    pub units: Vec<Unit>,
    pub diagnostics: Vec<Diagnostic>,
    pub open_scopes: Vec<ScopeKind>,
}

/// Tokenizes `source` and builds its units, stopping at the first fatal error
pub(crate) fn parse_with(source: &str, options: BuildOptions) -> UnicCResult<Parsed> {
    let tokenized = tokenize(source).map_err(|error| {
        let location = Location::Source(LineCol::of(source, error.index()));
        UnicCError::new(error, location)
    })?;

    let built = GrammarBuilder::new(options)
        .build(&tokenized.sentences)
        .map_err(|error| {
            let location = tokenized
                .sentences
                .get(error.index())
                .map(|sentence| Location::Source(sentence.span().line_col(source)));
            UnicCError::new(error, location)
        })?;

    let mut diagnostics = tokenized.diagnostics;
    diagnostics.extend(built.diagnostics);
    Ok(Parsed {
        sentences: tokenized.sentences,
        units: built.units,
        diagnostics,
        open_scopes: built.open_scopes,
    })
}

pub(crate) fn compile_with(source: &str, options: BuildOptions) -> CompileResult {
    match parse_with(source, options) {
        Ok(parsed) => {
            debug!(
                units = parsed.units.len(),
                diagnostics = parsed.diagnostics.len(),
                "compiled source"
            );
            CompileResult::parsed(source, parsed)
        }
        Err(error) => {
            error!("{error}");
            CompileResult::failed(&error)
        }
    }
}

/// Responsible with compiling unic sources into units.
///
/// Must be configured using an [UnicCBuilder].
#[derive(Debug)]
pub struct UnicC {
    max_jobs: usize,
    options: BuildOptions,
}

impl UnicC {
    /// Creates the default UnicCBuilder
    #[inline]
    pub fn builder() -> UnicCBuilder {
        UnicCBuilder::new()
    }

    pub fn options(&self) -> BuildOptions {
        self.options
    }

    /// Compiles a source, reporting fatal errors in the result
    #[instrument(skip_all, fields(len = source.len()))]
    pub fn compile_source(&self, source: &str) -> CompileResult {
        compile_with(source, self.options)
    }

    /// Tokenizes and builds a source, failing on the first fatal error
    pub fn parse_source(&self, source: &str) -> UnicCResult<Parsed> {
        parse_with(source, self.options)
    }

    /// Compile a file at a given path
    #[inline]
    pub async fn compile(&self, path: &Path) -> CompiledFile {
        compile_file(path.to_path_buf(), self.options)
            .instrument(error_span!("compile", path = ?path))
            .await
    }

    /// Compiles every file at once, at most `jobs` at a time.
    ///
    /// A file that can't be read is reported in its own result, the results are in the same order
    /// as `paths`.
    pub async fn compile_all(&self, paths: Vec<PathBuf>) -> UnicCResult<Vec<CompiledFile>> {
        let permits = Arc::new(Semaphore::new(self.max_jobs));
        let mut join_set = JoinSet::new();
        for (position, path) in paths.into_iter().enumerate() {
            let permits = permits.clone();
            let options = self.options;
            let span = error_span!("compile", path = ?path);
            join_set.spawn(
                async move {
                    let _permit = permits.acquire_owned().await?;
                    UnicCResult::Ok((position, compile_file(path, options).await))
                }
                .instrument(span),
            );
        }

        let mut compiled = Vec::with_capacity(join_set.len());
        while let Some(joined) = join_set.join_next().await {
            compiled.push(joined??);
        }
        compiled.sort_by_key(|(position, _)| *position);
        Ok(compiled.into_iter().map(|(_, file)| file).collect())
    }
}

async fn compile_file(path: PathBuf, options: BuildOptions) -> CompiledFile {
    let result = match tokio::fs::read_to_string(&path).await {
        Ok(source) => compile_with(&source, options),
        Err(error) => {
            let error = UnicCError::new(error, Location::File(path.clone()));
            error!("could not read source: {error}");
            CompileResult::failed(&error)
        }
    };
    CompiledFile { path, result }
}

/// Builder for creating a [UnicC] instance.
#[derive(Debug)]
pub struct UnicCBuilder {
    /// Number of jobs to run at once
    pub jobs: usize,
    pub options: BuildOptions,
}

impl UnicCBuilder {
    /// Creates an UnicCBuilder with default settings
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of files compiled at once
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn build_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Repairs mismatched end markers and misplaced branches instead of failing
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.options.end_markers = if lenient {
            ScopePolicy::Lenient
        } else {
            ScopePolicy::Strict
        };
        self
    }

    /// Fails on sentences that no unit can be determined for
    pub fn reject_unknown(mut self, reject: bool) -> Self {
        self.options.unknown_sentences = if reject {
            UnknownSentencePolicy::Reject
        } else {
            UnknownSentencePolicy::Degrade
        };
        self
    }

    /// Builds an [UnicC] instance from this builder
    pub fn build(self) -> Result<UnicC, BuildUnicCError> {
        if self.jobs == 0 {
            return Err(BuildUnicCError::ZeroJobs);
        }
        Ok(UnicC {
            max_jobs: self.jobs,
            options: self.options,
        })
    }
}

impl Default for UnicCBuilder {
    fn default() -> Self {
        Self {
            jobs: num_cpus::get(),
            options: BuildOptions::default(),
        }
    }
}

/// An error occurred while building an [UnicC] instance
#[derive(Debug, Error)]
pub enum BuildUnicCError {
    #[error("Compilation can't occur if no jobs are allowed")]
    ZeroJobs,
}
