//! A unic compilation error

use derive_more::Display;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::AcquireError;
use tokio::task::JoinError;
use unic_parsing::{GrammarError, TokenizeError};
use unic_sentences::LineCol;

/// The kind of error
#[derive(Debug, Error)]
pub enum UnicCErrorKind {
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Acquire(#[from] AcquireError),
}

/// Where an error occurred
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Location {
    #[display(fmt = "{}", _0)]
    Source(LineCol),
    #[display(fmt = "{}", "_0.display()")]
    File(PathBuf),
}

/// An error occurred while attempting to compile unic sources
#[derive(Debug, Error)]
#[error("{}{kind}", .location.as_ref().map(|location| format!("{location}: ")).unwrap_or_default())]
pub struct UnicCError {
    kind: UnicCErrorKind,
    location: Option<Location>,
}

impl UnicCError {
    /// Creates a new [UnicCError] using a quick constructor
    #[inline]
    pub fn new(error: impl Into<UnicCErrorKind>, location: impl Into<Option<Location>>) -> Self {
        Self {
            kind: error.into(),
            location: location.into(),
        }
    }

    pub fn kind(&self) -> &UnicCErrorKind {
        &self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl<T> From<T> for UnicCError
where
    UnicCErrorKind: From<T>,
{
    fn from(value: T) -> Self {
        Self::new(UnicCErrorKind::from(value), None)
    }
}

/// A type alias for general results in unicc
pub type UnicCResult<T> = Result<T, UnicCError>;

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn location_prefixes_message() {
        let error = UnicCError::new(
            TokenizeError::UnrecognizedCharacter {
                index: 4,
                character: '~',
            },
            Location::Source(LineCol { line: 2, column: 1 }),
        );
        assert_eq!(
            error.to_string(),
            "2:1: could not recognize role of character '~' at index 4"
        );
    }

    #[test]
    fn io_errors_name_their_file() {
        let error = UnicCError::new(
            io::Error::new(io::ErrorKind::NotFound, "not found"),
            Location::File(PathBuf::from("main.unic")),
        );
        assert_eq!(error.to_string(), "main.unic: not found");
        assert!(matches!(error.kind(), UnicCErrorKind::Io(_)));
    }

    #[test]
    fn errors_without_location() {
        let error = UnicCError::from(GrammarError::ScopeUnderflow {
            index: 0,
            requested: unic_units::ScopeKind::LoopBody,
        });
        assert_eq!(error.location(), None);
        assert_eq!(error.to_string(), "sentence 0 closes loop-body but no scope is open");
    }
}
