//! The outcome of compiling one source

use crate::compiler::error::UnicCError;
use crate::compiler::Parsed;
use std::path::PathBuf;
use unic_parsing::{Diagnostic, Severity};
use unic_sentences::Sentence;
use unic_units::{ScopeKind, Unit};

/// Everything produced by compiling one source.
///
/// A fatal error leaves `units` empty with the error as the only entry of `errors`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompileResult {
    pub sentences: Vec<Sentence>,
    pub units: Vec<Unit>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub notes: Vec<String>,
    /// Scopes still open at the end of the source, innermost first
    pub open_scopes: Vec<ScopeKind>,
}

impl CompileResult {
    /// Whether no fatal error occurred
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn failed(error: &UnicCError) -> Self {
        Self {
            errors: vec![error.to_string()],
            ..Self::default()
        }
    }

    pub(crate) fn parsed(source: &str, parsed: Parsed) -> Self {
        let mut result = Self {
            sentences: parsed.sentences,
            units: parsed.units,
            open_scopes: parsed.open_scopes,
            ..Self::default()
        };
        for diagnostic in &parsed.diagnostics {
            let message = render(source, diagnostic);
            match diagnostic.severity() {
                Severity::Warning => result.warnings.push(message),
                Severity::Note => result.notes.push(message),
            }
        }
        result
    }
}

fn render(source: &str, diagnostic: &Diagnostic) -> String {
    match diagnostic.span() {
        Some(span) => format!("{}: {}", span.line_col(source), diagnostic.message()),
        None => diagnostic.message().to_string(),
    }
}

/// The result of compiling a file
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFile {
    pub path: PathBuf,
    pub result: CompileResult,
}
