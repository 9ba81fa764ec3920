use thiserror::Error;

/// A result from tokenizing
pub type TokenizeResult<T> = Result<T, TokenizeError>;

/// An error that aborts tokenizing a source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// No recognizer claimed a character
    #[error("could not recognize role of character {character:?} at index {index}")]
    UnrecognizedCharacter { index: usize, character: char },
}

impl TokenizeError {
    /// The character index this error occurred at
    pub fn index(&self) -> usize {
        match self {
            TokenizeError::UnrecognizedCharacter { index, .. } => *index,
        }
    }
}
