//! Options for the grammar builder

/// How scope mismatches are handled
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum ScopePolicy {
    /// A mismatched end marker or a misplaced `elif` is an error
    #[default]
    Strict,
    /// Mismatches are repaired and reported as warnings
    Lenient,
}

/// What happens to a sentence no recognizer claimed
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub enum UnknownSentencePolicy {
    /// Emit an `unknown` unit and a warning
    #[default]
    Degrade,
    /// Abort with an error
    Reject,
}

/// Options for a [GrammarBuilder](super::GrammarBuilder)
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct BuildOptions {
    pub end_markers: ScopePolicy,
    pub unknown_sentences: UnknownSentencePolicy,
}

impl BuildOptions {
    /// Options that repair scope mismatches instead of failing
    pub fn lenient() -> Self {
        Self {
            end_markers: ScopePolicy::Lenient,
            ..Self::default()
        }
    }
}
