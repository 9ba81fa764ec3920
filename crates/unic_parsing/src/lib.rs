#![doc = include_str!("../README.md")]

pub mod diagnostic;
pub mod grammar;
pub mod tokenizer;

pub use diagnostic::{Diagnostic, Severity};
pub use grammar::{build_units, BuildOptions, Built, GrammarBuilder, GrammarError, GrammarResult};
pub use tokenizer::{tokenize, TokenizeError, TokenizeResult, Tokenized, Tokenizer};
