//! Groups source text into [sentences](Sentence)
//!
//! The tokenizer is a character level state machine. At every character a priority ordered chain of
//! recognizers is tried, and the first recognizer that claims the character either adds it to the
//! pending sentence or closes the pending sentence. Strings, comments, compiler flags, target
//! language code and accessors are lexical modes: while one is active, it claims every character
//! before any lower priority recognizer sees it.

use crate::diagnostic::Diagnostic;
use tracing::{debug, instrument, trace};
use unic_sentences::{
    BooleanOperator, CalculationKind, ComparisonKind, Sentence, SentenceKind, Span,
};

mod error;

pub use error::*;

/// Tokenizes a source with a fresh [Tokenizer]
#[instrument(skip_all, fields(len = source.len()))]
pub fn tokenize(source: &str) -> TokenizeResult<Tokenized> {
    Tokenizer::new(source).run()
}

/// The output of a tokenizer run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tokenized {
    pub sentences: Vec<Sentence>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Mode {
    Normal,
    String(char),
    Comment,
    CompilerFlag,
    TargetLanguageCode,
}

type Recognizer = fn(&mut Tokenizer, char) -> bool;

/// Converts one source into sentences. A tokenizer is consumed by [run](Tokenizer::run) and can't
/// be reused.
#[derive(Debug)]
pub struct Tokenizer {
    chars: Vec<char>,
    index: usize,
    /// extra characters consumed by the current recognizer
    skip: usize,
    mode: Mode,
    mode_start: usize,
    in_accessor: bool,
    accessor_start: usize,
    escaping: bool,
    pending: String,
    pending_start: usize,
    trailing: Option<Sentence>,
    sentences: Vec<Sentence>,
    diagnostics: Vec<Diagnostic>,
}

impl Tokenizer {
    const RECOGNIZERS: &'static [Recognizer] = &[
        Self::target_language_code,
        Self::comment,
        Self::compiler_flag,
        Self::string,
        Self::calculation,
        Self::boolean_operator,
        Self::parentheses,
        Self::accessor,
        Self::terminator,
        Self::sentence_part,
        Self::assignment,
        Self::generic,
    ];

    /// Creates a new tokenizer over a source
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            index: 0,
            skip: 0,
            mode: Mode::Normal,
            mode_start: 0,
            in_accessor: false,
            accessor_start: 0,
            escaping: false,
            pending: String::new(),
            pending_start: 0,
            trailing: None,
            sentences: vec![],
            diagnostics: vec![],
        }
    }

    /// Runs the tokenizer over the whole source
    pub fn run(mut self) -> TokenizeResult<Tokenized> {
        while self.index < self.chars.len() {
            let current = self.chars[self.index];
            self.skip = 0;
            let claimed = Self::RECOGNIZERS
                .iter()
                .any(|recognize| recognize(&mut self, current));
            if !claimed {
                return Err(TokenizeError::UnrecognizedCharacter {
                    index: self.index,
                    character: current,
                });
            }

            self.escaping = current == '\\' && !self.escaping;
            if let Some(trailing) = self.trailing.take() {
                debug!(kind = %trailing.kind(), "closed marker sentence");
                self.sentences.push(trailing);
            }
            self.index += 1 + self.skip;
        }
        Ok(self.finish())
    }

    fn finish(mut self) -> Tokenized {
        let len = self.chars.len();
        match self.mode {
            Mode::Normal => {}
            Mode::Comment => {
                self.close(SentenceKind::Comment, false);
                self.note_from(self.mode_start, "comment closed by the end of input");
            }
            Mode::CompilerFlag => {
                self.close(SentenceKind::CompilerFlag, true);
                self.note_from(self.mode_start, "compiler flag closed by the end of input");
            }
            Mode::String(quote) => {
                self.close(string_kind(quote), false);
                self.warn_from(
                    self.mode_start,
                    format!("unterminated string, expected a closing {quote}"),
                );
            }
            Mode::TargetLanguageCode => {
                self.close(SentenceKind::TargetLanguageCode, false);
                self.warn_from(
                    self.mode_start,
                    "unterminated target language code, expected a closing }",
                );
            }
        }
        self.mode = Mode::Normal;

        if self.in_accessor {
            self.in_accessor = false;
            self.close(SentenceKind::AccessorLastItem, true);
            self.sentences
                .push(Sentence::marker(SentenceKind::AccessorEnd, Span::new(len, len)));
            self.warn_from(self.accessor_start, "unterminated accessor, expected a closing ]");
        }

        if !self.pending.trim().is_empty() {
            let start = self.pending_start;
            let text = self.pending.trim().to_string();
            self.close(SentenceKind::Unknown, true);
            self.warn_from(start, format!("missing terminator after {text:?}"));
        }

        Tokenized {
            sentences: self.sentences,
            diagnostics: self.diagnostics,
        }
    }

    fn leading(&self) -> Option<char> {
        self.index
            .checked_sub(1)
            .and_then(|index| self.chars.get(index))
            .copied()
    }

    fn trailing_char(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    fn enter(&mut self, mode: Mode) {
        trace!(index = self.index, ?mode, "entering mode");
        self.mode = mode;
        self.mode_start = self.index;
    }

    fn push(&mut self, c: char) {
        if self.pending.is_empty() {
            self.pending_start = self.index;
        }
        self.pending.push(c);
    }

    /// Pushes a character outside of any mode, folding whitespace
    fn fold(&mut self, c: char) {
        let c = if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c };
        if c == ' ' && (self.pending.is_empty() || self.pending.ends_with(' ')) {
            return;
        }
        self.push(c);
    }

    /// Drops the pending fragment
    fn reset(&mut self) {
        if !self.pending.trim().is_empty() {
            trace!(discarded = ?self.pending, "discarding pending fragment");
        }
        self.pending.clear();
    }

    /// Closes the pending text as a sentence of the given kind. Empty sentences are dropped unless
    /// their kind may be empty.
    fn close(&mut self, kind: SentenceKind, clean: bool) {
        let raw = std::mem::take(&mut self.pending);
        let text = if clean {
            raw.trim_matches(is_blank).to_string()
        } else {
            raw
        };
        if text.is_empty() && !kind.may_be_empty() {
            trace!(%kind, "dropping empty sentence");
            return;
        }

        let end = (self.index + 1).min(self.chars.len());
        let start = if text.is_empty() {
            self.index
        } else {
            self.pending_start
        };
        debug!(%kind, ?text, "closed sentence");
        self.sentences
            .push(Sentence::new(text, kind, Span::new(start, end)));
    }

    /// Closes whatever was pending before an operator or a mode marker
    fn close_fragment(&mut self) {
        let kind = if self.in_accessor {
            SentenceKind::AccessorMember
        } else {
            SentenceKind::Unknown
        };
        self.close(kind, true);
    }

    /// Queues an empty marker sentence, emitted once the current character is handled
    fn mark(&mut self, kind: SentenceKind) {
        let span = Span::new(self.index, self.index + 1 + self.skip);
        self.trailing = Some(Sentence::marker(kind, span));
    }

    fn warn_from(&mut self, start: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::warning(message).with_span(Span::new(start, self.chars.len()));
        tracing::warn!("{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn note_from(&mut self, start: usize, message: impl Into<String>) {
        let diagnostic = Diagnostic::note(message).with_span(Span::new(start, self.chars.len()));
        self.diagnostics.push(diagnostic);
    }

    fn target_language_code(&mut self, c: char) -> bool {
        match self.mode {
            Mode::TargetLanguageCode => {
                match c {
                    // the escaped brace is kept, its backslash is not
                    '\\' if self.trailing_char() == Some('}') => {}
                    '}' if !self.escaping => {
                        self.mode = Mode::Normal;
                        self.close(SentenceKind::TargetLanguageCode, false);
                    }
                    c => self.push(c),
                }
                true
            }
            Mode::Normal if c == '{' && !self.escaping => {
                self.reset();
                self.enter(Mode::TargetLanguageCode);
                true
            }
            _ => false,
        }
    }

    fn comment(&mut self, c: char) -> bool {
        match self.mode {
            Mode::Comment => {
                match c {
                    '\n' => {
                        self.mode = Mode::Normal;
                        self.close(SentenceKind::Comment, false);
                    }
                    '\r' if self.trailing_char() == Some('\n') => {}
                    c => self.push(c),
                }
                true
            }
            Mode::Normal if c == '#' => {
                self.reset();
                self.enter(Mode::Comment);
                true
            }
            _ => false,
        }
    }

    fn compiler_flag(&mut self, c: char) -> bool {
        match self.mode {
            Mode::CompilerFlag => {
                match c {
                    '\n' => {
                        self.mode = Mode::Normal;
                        self.close(SentenceKind::CompilerFlag, true);
                    }
                    '\r' if self.trailing_char() == Some('\n') => {}
                    c => self.push(c),
                }
                true
            }
            Mode::Normal if c == '@' => {
                self.reset();
                self.enter(Mode::CompilerFlag);
                true
            }
            _ => false,
        }
    }

    fn string(&mut self, c: char) -> bool {
        match self.mode {
            Mode::String(quote) => {
                if c == quote && !self.escaping {
                    self.mode = Mode::Normal;
                    self.close(string_kind(quote), false);
                } else {
                    self.push(c);
                }
                true
            }
            Mode::Normal if matches!(c, '"' | '\'') && !self.escaping => {
                self.close_fragment();
                self.enter(Mode::String(c));
                true
            }
            _ => false,
        }
    }

    fn calculation(&mut self, c: char) -> bool {
        if self.mode != Mode::Normal || self.in_accessor {
            return false;
        }
        if !self.leading().is_some_and(char::is_whitespace) {
            return false;
        }

        let equal_trails = self.trailing_char() == Some('=');
        let kind = if let Some(calculation) = CalculationKind::from_operator(c) {
            if equal_trails {
                SentenceKind::Calculation(calculation.assigning())
            } else {
                SentenceKind::Calculation(calculation)
            }
        } else if let Some(comparison) = ComparisonKind::from_operator(c, equal_trails) {
            SentenceKind::Comparison(comparison)
        } else {
            return false;
        };

        if equal_trails {
            self.skip = 1;
        }
        self.close_fragment();
        self.mark(kind);
        true
    }

    fn boolean_operator(&mut self, c: char) -> bool {
        if self.mode != Mode::Normal || self.in_accessor {
            return false;
        }
        let operator = match c {
            '!' => BooleanOperator::Not,
            '&' if self.trailing_char() == Some('&') => BooleanOperator::And,
            '|' if self.trailing_char() == Some('|') => BooleanOperator::Or,
            _ => return false,
        };

        if operator != BooleanOperator::Not {
            self.skip = 1;
        }
        self.close_fragment();
        self.mark(SentenceKind::Boolean(operator));
        true
    }

    fn parentheses(&mut self, c: char) -> bool {
        if self.mode != Mode::Normal || self.in_accessor {
            return false;
        }
        let kind = match c {
            '(' => SentenceKind::ParenthesesStart,
            ')' => SentenceKind::ParenthesesEnd,
            _ => return false,
        };
        self.close_fragment();
        self.mark(kind);
        true
    }

    fn accessor(&mut self, c: char) -> bool {
        if self.mode != Mode::Normal {
            return false;
        }
        if !self.in_accessor {
            if c != '[' {
                return false;
            }
            self.close_fragment();
            self.in_accessor = true;
            self.accessor_start = self.index;
            self.mark(SentenceKind::AccessorStart);
            return true;
        }

        match c {
            ']' => {
                self.in_accessor = false;
                self.close(SentenceKind::AccessorLastItem, true);
                self.mark(SentenceKind::AccessorEnd);
            }
            '=' => {
                self.close(SentenceKind::AccessorMember, true);
                self.mark(SentenceKind::AccessorAssignmentMarker);
            }
            c => self.fold(c),
        }
        true
    }

    fn terminator(&mut self, c: char) -> bool {
        let kind = match c {
            ';' => SentenceKind::Closing,
            ':' => SentenceKind::Opening,
            _ => return false,
        };
        self.close(kind, true);
        true
    }

    fn sentence_part(&mut self, c: char) -> bool {
        if c != ',' {
            return false;
        }
        self.close(SentenceKind::Enumerating, true);
        true
    }

    fn assignment(&mut self, c: char) -> bool {
        if c != '=' {
            return false;
        }
        let spaced = self.leading().is_some_and(char::is_whitespace)
            && self.trailing_char().is_some_and(char::is_whitespace);
        if !spaced {
            return false;
        }
        self.close(SentenceKind::AssignmentKey, true);
        true
    }

    fn generic(&mut self, c: char) -> bool {
        self.fold(c);
        true
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn string_kind(quote: char) -> SentenceKind {
    if quote == '"' {
        SentenceKind::SafeString
    } else {
        SentenceKind::NormalString
    }
}
