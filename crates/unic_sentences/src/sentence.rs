//! A sentence of source text, along with the punctuation that produced it

use crate::span::Span;
use std::fmt::{Display, Formatter};
use strum::{Display as StrumDisplay, EnumIter};

/// A run of source text closed by a punctuation mark or lexical mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    text: String,
    kind: SentenceKind,
    span: Span,
}

impl Sentence {
    /// Creates a new sentence
    pub fn new(text: impl Into<String>, kind: SentenceKind, span: Span) -> Self {
        Self {
            text: text.into(),
            kind,
            span,
        }
    }

    /// Creates a sentence with no text, used for pure punctuation markers
    pub fn marker(kind: SentenceKind, span: Span) -> Self {
        Self::new(String::new(), kind, span)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> SentenceKind {
        self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Splits the text at the first space.
    ///
    /// The head is everything before the first space and the body everything after it. A sentence
    /// without a space has an empty body.
    pub fn head_and_body(&self) -> (&str, &str) {
        self.text.split_once(' ').unwrap_or((self.text.as_str(), ""))
    }
}

impl Display for Sentence {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.text.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} {:?}", self.kind, self.text)
        }
    }
}

/// The kind of a sentence
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SentenceKind {
    /// `# ...` up to the end of the line
    Comment,
    /// `@ ...` up to the end of the line
    CompilerFlag,
    /// `"..."`
    SafeString,
    /// `'...'`
    NormalString,
    /// `{ ... }`, emitted to the target language untouched
    TargetLanguageCode,
    /// `:`
    Opening,
    /// `;`
    Closing,
    /// `,`
    Enumerating,
    /// ` = `
    AssignmentKey,
    Boolean(BooleanOperator),
    Calculation(CalculationKind),
    Comparison(ComparisonKind),
    ParenthesesStart,
    ParenthesesEnd,
    AccessorStart,
    AccessorMember,
    AccessorAssignmentMarker,
    AccessorLastItem,
    AccessorEnd,
    Unknown,
}

impl SentenceKind {
    /// Whether a sentence of this kind is kept even when its text is empty
    pub const fn may_be_empty(&self) -> bool {
        matches!(self, SentenceKind::Closing | SentenceKind::AccessorStart)
    }

    /// Whether this kind carries the content of a string literal
    pub const fn is_string(&self) -> bool {
        matches!(self, SentenceKind::SafeString | SentenceKind::NormalString)
    }

    /// Whether this kind carries a segment of an accessor path
    pub const fn is_accessor_segment(&self) -> bool {
        matches!(
            self,
            SentenceKind::AccessorMember | SentenceKind::AccessorLastItem
        )
    }
}

impl Display for SentenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SentenceKind::Comment => write!(f, "comment"),
            SentenceKind::CompilerFlag => write!(f, "compiler-flag"),
            SentenceKind::SafeString => write!(f, "safe-string"),
            SentenceKind::NormalString => write!(f, "normal-string"),
            SentenceKind::TargetLanguageCode => write!(f, "target-language-code"),
            SentenceKind::Opening => write!(f, "opening"),
            SentenceKind::Closing => write!(f, "closing"),
            SentenceKind::Enumerating => write!(f, "enumerating"),
            SentenceKind::AssignmentKey => write!(f, "assignment-key"),
            SentenceKind::Boolean(op) => write!(f, "boolean-operator-{op}"),
            SentenceKind::Calculation(kind) => write!(f, "calculation-{kind}"),
            SentenceKind::Comparison(kind) => write!(f, "comparison-{kind}"),
            SentenceKind::ParenthesesStart => write!(f, "parentheses-start"),
            SentenceKind::ParenthesesEnd => write!(f, "parentheses-end"),
            SentenceKind::AccessorStart => write!(f, "accessor-start"),
            SentenceKind::AccessorMember => write!(f, "accessor-member"),
            SentenceKind::AccessorAssignmentMarker => write!(f, "accessor-assignment-marker"),
            SentenceKind::AccessorLastItem => write!(f, "accessor-last-item"),
            SentenceKind::AccessorEnd => write!(f, "accessor-end"),
            SentenceKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// `&&`, `||` and `!`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum BooleanOperator {
    And,
    Or,
    Not,
}

/// Arithmetic operators, optionally assigning the result back (`+=`)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CalculationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    AddAssignment,
    SubtractAssignment,
    MultiplyAssignment,
    DivideAssignment,
}

impl CalculationKind {
    /// Gets the calculation for an operator character
    pub const fn from_operator(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '*' => Some(Self::Multiply),
            '/' => Some(Self::Divide),
            _ => None,
        }
    }

    /// The compound assignment variant of this calculation
    pub const fn assigning(self) -> Self {
        match self {
            Self::Add | Self::AddAssignment => Self::AddAssignment,
            Self::Subtract | Self::SubtractAssignment => Self::SubtractAssignment,
            Self::Multiply | Self::MultiplyAssignment => Self::MultiplyAssignment,
            Self::Divide | Self::DivideAssignment => Self::DivideAssignment,
        }
    }
}

/// Comparison operators
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, StrumDisplay, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ComparisonKind {
    Lower,
    LowerEqual,
    Greater,
    GreaterEqual,
    NotEqual,
    IsEqual,
}

impl ComparisonKind {
    /// Gets the comparison for an operator character, given whether an `=` trails it.
    ///
    /// `!` and `=` are only comparisons when followed by `=`.
    pub const fn from_operator(c: char, equal_trails: bool) -> Option<Self> {
        match (c, equal_trails) {
            ('<', false) => Some(Self::Lower),
            ('<', true) => Some(Self::LowerEqual),
            ('>', false) => Some(Self::Greater),
            ('>', true) => Some(Self::GreaterEqual),
            ('!', true) => Some(Self::NotEqual),
            ('=', true) => Some(Self::IsEqual),
            _ => None,
        }
    }
}
