#![doc = include_str!("../README.md")]

pub mod sentence;
pub mod span;

pub use sentence::{BooleanOperator, CalculationKind, ComparisonKind, Sentence, SentenceKind};
pub use span::{LineCol, Span};
