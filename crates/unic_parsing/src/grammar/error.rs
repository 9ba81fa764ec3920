use thiserror::Error;
use unic_units::ScopeKind;

/// A result from building units
pub type GrammarResult<T> = Result<T, GrammarError>;

/// An error that aborts building units. The index is the index of the offending sentence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("sentence {index} closes {requested} but the innermost open scope is {found}")]
    MismatchedEndMarker {
        index: usize,
        requested: ScopeKind,
        found: ScopeKind,
    },
    #[error("sentence {index} closes {requested} but no scope is open")]
    ScopeUnderflow { index: usize, requested: ScopeKind },
    #[error("sentence {index} starts an `{keyword}` branch outside of an if block (innermost open scope is {found})")]
    MisplacedBranch {
        index: usize,
        keyword: &'static str,
        found: ScopeKind,
    },
    #[error("could not determine unit (sentence at index {index}): {text:?}")]
    UnrecognizedSentence { index: usize, text: String },
}

impl GrammarError {
    /// The index of the sentence this error occurred at
    pub fn index(&self) -> usize {
        match self {
            GrammarError::MismatchedEndMarker { index, .. }
            | GrammarError::ScopeUnderflow { index, .. }
            | GrammarError::MisplacedBranch { index, .. }
            | GrammarError::UnrecognizedSentence { index, .. } => *index,
        }
    }
}
