//! Builds [units](Unit) from [sentences](Sentence)
//!
//! Sentences are processed once, in order. Each sentence is split into a head (the text before the
//! first space) and a body (the rest), then run through a priority ordered chain of recognizers.
//! The first recognizer that claims the sentence produces its units. Afterwards a fix-up step
//! looks at the sentence kind and the innermost scope to close implicitly terminated scopes.

use crate::diagnostic::Diagnostic;
use itertools::Itertools;
use std::str::FromStr;
use tracing::{debug, instrument, trace, warn};
use unic_sentences::{Sentence, SentenceKind, Span};
use unic_units::{LoopKind, ScopeKind, Unit};

mod accessor;
mod error;
mod literal;
mod options;
mod scopes;

pub use error::*;
pub use options::*;
pub use scopes::ScopeStack;

/// Builds units from sentences with a fresh [GrammarBuilder] and default options
#[instrument(skip_all, fields(sentences = sentences.len()))]
pub fn build_units(sentences: &[Sentence]) -> GrammarResult<Built> {
    GrammarBuilder::new(BuildOptions::default()).build(sentences)
}

/// The output of a grammar builder
#[derive(Debug, Clone, PartialEq)]
pub struct Built {
    pub units: Vec<Unit>,
    pub diagnostics: Vec<Diagnostic>,
    /// Scopes still open after the last sentence, innermost first
    pub open_scopes: Vec<ScopeKind>,
}

/// The units a recognizer produced for one sentence
#[derive(Debug, Default)]
struct Recognized {
    primary: Option<Unit>,
    trailing: Vec<Unit>,
}

impl Recognized {
    fn unit(unit: Unit) -> Self {
        Self {
            primary: Some(unit),
            trailing: vec![],
        }
    }

    fn with_trailing(mut self, unit: Unit) -> Self {
        self.trailing.push(unit);
        self
    }
}

/// The sentence being recognized
struct Context<'s> {
    index: usize,
    kind: SentenceKind,
    span: Span,
    text: &'s str,
    head: &'s str,
    body: &'s str,
    /// The head scope an opening sentence turned into a body
    after_head: Option<ScopeKind>,
}

impl Context<'_> {
    fn body_or_none(&self) -> Option<String> {
        (!self.body.is_empty()).then(|| self.body.to_string())
    }
}

type Recognizer = fn(&mut GrammarBuilder, &Context<'_>) -> GrammarResult<Option<Recognized>>;

/// A head waiting for its `returns` sentence
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Callable {
    Function,
    Method,
}

impl Callable {
    fn keyword(self) -> &'static str {
        match self {
            Callable::Function => "function",
            Callable::Method => "method",
        }
    }
}

/// The callable head seen last, with the sentence it was named in
#[derive(Debug, Copy, Clone)]
struct PendingCallable {
    callable: Callable,
    index: usize,
    span: Span,
}

/// Converts sentences into units, owning the scope stack for one source.
#[derive(Debug)]
pub struct GrammarBuilder {
    options: BuildOptions,
    scopes: ScopeStack,
    pending_callable: Option<PendingCallable>,
    units: Vec<Unit>,
    diagnostics: Vec<Diagnostic>,
}

impl GrammarBuilder {
    const RECOGNIZERS: &'static [Recognizer] = &[
        Self::passthrough,
        Self::literal,
        Self::accessor,
        Self::compound_literal,
        Self::operator,
        Self::keyword,
        Self::declaration,
        Self::call,
        Self::end_marker,
        Self::two_word_cluster,
        Self::reference,
    ];

    /// Creates a new grammar builder
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            scopes: ScopeStack::new(),
            pending_callable: None,
            units: vec![],
            diagnostics: vec![],
        }
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Builds units from every sentence, in order
    #[instrument(skip_all, fields(sentences = sentences.len()))]
    pub fn build(mut self, sentences: &[Sentence]) -> GrammarResult<Built> {
        for (index, sentence) in sentences.iter().enumerate() {
            self.feed(index, sentence)?;
        }
        Ok(self.finish())
    }

    /// Processes the sentence at `index`
    pub fn feed(&mut self, index: usize, sentence: &Sentence) -> GrammarResult<()> {
        let (head, body) = sentence.head_and_body();
        // an opening sentence after a head belongs to the head's body, unless it is another case
        // of the same head
        let after_head = match sentence.kind() {
            SentenceKind::Opening if !self.falls_through(head) => self.scopes.promote_head(),
            _ => None,
        };
        let ctx = Context {
            index,
            kind: sentence.kind(),
            span: sentence.span(),
            text: sentence.text(),
            head,
            body,
            after_head,
        };
        trace!(index, kind = %ctx.kind, text = ctx.text, scope = %self.scopes.current(), "recognizing sentence");
        let mut recognized = None;
        for recognize in Self::RECOGNIZERS {
            if let Some(found) = recognize(self, &ctx)? {
                recognized = Some(found);
                break;
            }
        }
        let mut recognized = match recognized {
            Some(recognized) => recognized,
            None => self.fallback(&ctx)?,
        };
        self.settle(&ctx, &mut recognized);

        for unit in recognized.primary.into_iter().chain(recognized.trailing) {
            debug!(index, %unit, "emit unit");
            self.units.push(unit);
        }
        Ok(())
    }

    /// Finishes building, reporting scopes that were never closed
    pub fn finish(mut self) -> Built {
        if let Some(pending) = self.pending_callable.take() {
            self.warn_at(
                pending.index,
                pending.span,
                format!(
                    "`{}` head is never followed by `returns`",
                    pending.callable.keyword()
                ),
            );
        }

        let open_scopes = self.scopes.open().collect::<Vec<_>>();
        if !open_scopes.is_empty() {
            let diagnostic = Diagnostic::warning(format!(
                "{} scope(s) left open at the end of input: {}",
                open_scopes.len(),
                open_scopes.iter().join(", ")
            ));
            warn!("{diagnostic}");
            self.diagnostics.push(diagnostic);
        }

        Built {
            units: self.units,
            diagnostics: self.diagnostics,
            open_scopes,
        }
    }

    fn fallback(&mut self, ctx: &Context<'_>) -> GrammarResult<Recognized> {
        if ctx.text.is_empty() {
            return Ok(Recognized::default());
        }
        match self.options.unknown_sentences {
            UnknownSentencePolicy::Degrade => {
                self.warn(
                    ctx,
                    format!("could not determine unit of {} sentence {:?}", ctx.kind, ctx.text),
                );
                Ok(Recognized::unit(Unit::Unknown {
                    text: ctx.text.to_string(),
                }))
            }
            UnknownSentencePolicy::Reject => Err(GrammarError::UnrecognizedSentence {
                index: ctx.index,
                text: ctx.text.to_string(),
            }),
        }
    }

    /// Scope fix-ups that depend on the sentence kind rather than its text
    fn settle(&mut self, ctx: &Context<'_>, recognized: &mut Recognized) {
        match ctx.kind {
            SentenceKind::Opening => {
                if matches!(recognized.primary, Some(Unit::ElifHead)) {
                    self.scopes.push(ScopeKind::IfBlockBody);
                }
            }
            SentenceKind::Enumerating => {
                if self.scopes.pop_if(ScopeKind::Assignment).is_some() {
                    recognized.trailing.push(Unit::AssignmentEnd);
                }
            }
            SentenceKind::Closing => {
                if matches!(recognized.primary, Some(Unit::EndMarker { .. })) {
                    return;
                }
                let closed = self.close_implicitly();
                if closed.is_empty() {
                    recognized.trailing.push(Unit::Closing);
                } else {
                    recognized.trailing.extend(closed);
                }
            }
            _ => {}
        }
    }

    /// Closes the assignments on top of the stack, at most one implicitly closed scope below them,
    /// and the assignments that scope was the value of.
    fn close_implicitly(&mut self) -> Vec<Unit> {
        let mut closed = self.close_assignments();
        if self.scopes.current().closes_implicitly() {
            if let Some(end) = self.scopes.pop().and_then(|scope| scope.implicit_end()) {
                closed.push(end);
            }
            closed.extend(self.close_assignments());
        }
        closed
    }

    fn close_assignments(&mut self) -> Vec<Unit> {
        let mut closed = vec![];
        while self.scopes.pop_if(ScopeKind::Assignment).is_some() {
            closed.push(Unit::AssignmentEnd);
        }
        closed
    }

    /// Pops the innermost scope for an explicit close of `requested`, returning the closed kind
    fn close_scope(&mut self, ctx: &Context<'_>, requested: ScopeKind) -> GrammarResult<ScopeKind> {
        if self.scopes.depth() == 1 {
            return Err(GrammarError::ScopeUnderflow {
                index: ctx.index,
                requested,
            });
        }
        let found = self.scopes.current();
        if !found.satisfies(requested) {
            match self.options.end_markers {
                ScopePolicy::Strict => {
                    return Err(GrammarError::MismatchedEndMarker {
                        index: ctx.index,
                        requested,
                        found,
                    })
                }
                ScopePolicy::Lenient => self.warn(
                    ctx,
                    format!("{requested} closed while {found} is the innermost open scope"),
                ),
            }
        }
        Ok(self.scopes.pop().unwrap_or(found).body())
    }

    fn warn(&mut self, ctx: &Context<'_>, message: String) {
        self.warn_at(ctx.index, ctx.span, message);
    }

    fn warn_at(&mut self, index: usize, span: Span, message: String) {
        let diagnostic = Diagnostic::warning(message).with_span(span);
        warn!(index, "{diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    fn expect_returns(&mut self, ctx: &Context<'_>, callable: Callable) {
        self.pending_callable = Some(PendingCallable {
            callable,
            index: ctx.index,
            span: ctx.span,
        });
    }

    fn passthrough(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        let unit = match ctx.kind {
            SentenceKind::Comment => Unit::Comment {
                content: ctx.text.to_string(),
            },
            SentenceKind::CompilerFlag => Unit::CompilerFlag {
                flag: ctx.text.to_string(),
            },
            SentenceKind::TargetLanguageCode => Unit::TargetLanguageCode {
                code: ctx.text.to_string(),
            },
            _ => return Ok(None),
        };
        Ok(Some(Recognized::unit(unit)))
    }

    fn literal(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        let unit = match ctx.kind {
            SentenceKind::SafeString => Some(Unit::SafeString {
                content: ctx.text.to_string(),
            }),
            SentenceKind::NormalString => Some(Unit::NormalString {
                content: ctx.text.to_string(),
            }),
            _ => literal::keyword_literal(ctx.text).or_else(|| literal::number(ctx.text)),
        };
        Ok(unit.map(Recognized::unit))
    }

    fn accessor(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        let unit = match ctx.kind {
            SentenceKind::AccessorStart => {
                self.scopes.push(ScopeKind::Accessor);
                Unit::AccessorStart
            }
            kind if kind.is_accessor_segment() => accessor::decompose(ctx.text),
            SentenceKind::AccessorAssignmentMarker => Unit::AccessorAssignmentMarker,
            SentenceKind::AccessorEnd => {
                self.close_scope(ctx, ScopeKind::Accessor)?;
                Unit::AccessorEnd
            }
            _ => return Ok(None),
        };
        Ok(Some(Recognized::unit(unit)))
    }

    fn compound_literal(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        if ctx.kind != SentenceKind::Opening {
            return Ok(None);
        }
        let (unit, scope) = match ctx.text {
            "array" => (Unit::ArrayStart, ScopeKind::ArrayBody),
            "object" => (Unit::ObjectStart, ScopeKind::ObjectBody),
            _ => return Ok(None),
        };
        self.scopes.push(scope);
        Ok(Some(Recognized::unit(unit)))
    }

    fn operator(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        let unit = match ctx.kind {
            SentenceKind::ParenthesesStart => Unit::ParenthesesStart,
            SentenceKind::ParenthesesEnd => Unit::ParenthesesEnd,
            SentenceKind::Boolean(operator) => Unit::BooleanOperator(operator),
            SentenceKind::Calculation(calculation) => Unit::Calculation(calculation),
            SentenceKind::Comparison(comparison) => Unit::Comparison(comparison),
            _ => return Ok(None),
        };
        Ok(Some(Recognized::unit(unit)))
    }

    fn keyword(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        match ctx.kind {
            SentenceKind::Closing => Ok(self.closing_keyword(ctx)),
            SentenceKind::Opening => self.opening_keyword(ctx),
            SentenceKind::Enumerating => Ok(self.enumerating_keyword(ctx)),
            _ => Ok(None),
        }
    }

    fn closing_keyword(&mut self, ctx: &Context<'_>) -> Option<Recognized> {
        let keyword = match ctx.text {
            "break" => Some(Unit::BreakKeyword),
            "continue" => Some(Unit::ContinueKeyword),
            "return" => Some(Unit::ReturnKeyword),
            _ => None,
        };
        if let Some(keyword) = keyword {
            return Some(Recognized::unit(keyword));
        }

        let body = ctx.body_or_none()?;
        let unit = match ctx.head {
            "import" => Unit::Import { source: body },
            "language" => Unit::LanguageDefinition { language: body },
            "module" => Unit::ModuleNameDefinition { name: body },
            "section" => Unit::SectionMarker { name: body },
            "returns" => Unit::FunctionTypeReturn { return_type: body },
            _ => return None,
        };
        Some(Recognized::unit(unit))
    }

    fn opening_keyword(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        let recognized = match ctx.text {
            "if" => {
                self.scopes.push(ScopeKind::IfBlockBody);
                Recognized::unit(Unit::IfHead)
            }
            "elif" => {
                self.leave_if_block(ctx)?;
                Recognized::unit(Unit::ElifHead)
            }
            "else" => Recognized::unit(Unit::ElseHead).with_trailing(Unit::IfBodyStart),
            "then" => Recognized::unit(Unit::IfBodyStart),
            "while" => Recognized::unit(Unit::WhileLoopHead),
            "do" if ctx.after_head == Some(ScopeKind::CaseHead) => {
                Recognized::unit(Unit::CaseBodyStart)
            }
            "do" => {
                self.scopes.push(ScopeKind::LoopBody);
                Recognized::unit(Unit::WhileBodyStart)
            }
            "continue" => Recognized::unit(Unit::ContinueKeyword),
            "return" => Recognized::unit(Unit::ReturnKeyword),
            "default" => {
                self.scopes.push(ScopeKind::CaseBody);
                Recognized::unit(Unit::DefaultCaseHead).with_trailing(Unit::CaseBodyStart)
            }
            "function" => Recognized::unit(Unit::FunctionTypeDefinition),
            "command" if self.scopes.current().uses_function_grammar() => {
                self.scopes.push(ScopeKind::CommandBody);
                Recognized::unit(Unit::CommandHead)
            }
            _ => return Ok(self.opening_head(ctx)),
        };
        Ok(Some(recognized))
    }

    /// Opening sentences recognized by their head
    fn opening_head(&mut self, ctx: &Context<'_>) -> Option<Recognized> {
        let current = self.scopes.current();
        let recognized = match ctx.head {
            "switch" => {
                self.scopes.push(ScopeKind::SwitchHead);
                Recognized::unit(Unit::SwitchHead {
                    subject: ctx.body_or_none(),
                })
            }
            "case" => self.case_head(ctx.body_or_none()),
            _ if ctx.body.is_empty() => return self.command(ctx),
            "take" => {
                self.scopes.push(ScopeKind::LoopBody);
                Recognized::unit(Unit::LoopIteratorName {
                    name: ctx.body.to_string(),
                })
                .with_trailing(Unit::LoopBodyStart)
            }
            "function" if current.uses_function_grammar() => {
                self.expect_returns(ctx, Callable::Function);
                Recognized::unit(Unit::FunctionHead {
                    name: ctx.body.to_string(),
                })
            }
            "method" if matches!(current, ScopeKind::ClassBody | ScopeKind::StructBody) => {
                self.expect_returns(ctx, Callable::Method);
                Recognized::unit(Unit::MethodHead {
                    name: ctx.body.to_string(),
                })
            }
            "returns" => {
                let (scope, body_start) = match self.pending_callable.take()?.callable {
                    Callable::Function => (ScopeKind::FunctionBody, Unit::FunctionBodyStart),
                    Callable::Method => (ScopeKind::MethodBody, Unit::MethodBodyStart),
                };
                self.scopes.push(scope);
                Recognized::unit(Unit::FunctionReturnType {
                    return_type: ctx.body.to_string(),
                })
                .with_trailing(body_start)
            }
            "struct" => {
                self.scopes.push(ScopeKind::StructBody);
                Recognized::unit(Unit::StructHead {
                    name: ctx.body.to_string(),
                })
            }
            "class" => {
                self.scopes.push(ScopeKind::ClassBody);
                Recognized::unit(Unit::ClassHead {
                    name: ctx.body.to_string(),
                })
            }
            "type" => {
                self.scopes.push(ScopeKind::TypeDefinition);
                Recognized::unit(Unit::TypeDefinitionStart {
                    name: ctx.body.to_string(),
                })
            }
            _ => return self.command(ctx),
        };
        Some(recognized)
    }

    /// Any other opening sentence inside a command body names a command
    fn command(&self, ctx: &Context<'_>) -> Option<Recognized> {
        (self.scopes.current() == ScopeKind::CommandBody && !ctx.text.is_empty()).then(|| {
            Recognized::unit(Unit::Command {
                name: ctx.text.to_string(),
            })
        })
    }

    fn enumerating_keyword(&mut self, ctx: &Context<'_>) -> Option<Recognized> {
        let body = ctx.body_or_none()?;
        if ctx.head == "case" {
            return Some(self.case_head(Some(body)));
        }
        let kind = LoopKind::from_str(ctx.head).ok()?;
        Some(Recognized::unit(Unit::LoopHead {
            kind,
            iterable: body,
        }))
    }

    /// Whether a sentence starting with `head` is a further case sharing the open case head
    fn falls_through(&self, head: &str) -> bool {
        head == "case" && self.scopes.current() == ScopeKind::CaseHead
    }

    /// Consecutive cases share one case head scope
    fn case_head(&mut self, value: Option<String>) -> Recognized {
        if !self.falls_through("case") {
            self.scopes.push(ScopeKind::CaseHead);
        }
        Recognized::unit(Unit::CaseHead { value })
    }

    /// `elif` ends the current if block, the fix-up step opens the next one
    fn leave_if_block(&mut self, ctx: &Context<'_>) -> GrammarResult<()> {
        if self.scopes.pop_if(ScopeKind::IfBlockBody).is_some() {
            return Ok(());
        }
        let found = self.scopes.current();
        match self.options.end_markers {
            ScopePolicy::Strict => Err(GrammarError::MisplacedBranch {
                index: ctx.index,
                keyword: "elif",
                found,
            }),
            ScopePolicy::Lenient => {
                self.warn(
                    ctx,
                    format!("`elif` outside of an if block, the innermost open scope is {found}"),
                );
                Ok(())
            }
        }
    }

    fn declaration(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        match ctx.kind {
            SentenceKind::AssignmentKey => {
                let key = Unit::AssignmentKey {
                    key: ctx.text.to_string(),
                };
                // a value with no enumerating sentence after it leaves its assignment open
                let recognized = match self.scopes.pop_if(ScopeKind::Assignment) {
                    Some(_) => Recognized::unit(Unit::AssignmentEnd).with_trailing(key),
                    None => Recognized::unit(key),
                };
                self.scopes.push(ScopeKind::Assignment);
                Ok(Some(recognized))
            }
            SentenceKind::Opening
                if matches!(ctx.head, "constant" | "mutable")
                    && !ctx.body.is_empty()
                    && self.scopes.current().uses_function_grammar() =>
            {
                let (data_type, name) = match ctx.body.split_once(' ') {
                    Some((data_type, name)) => (data_type, Some(name.to_string())),
                    None => (ctx.body, None),
                };
                if name.is_some() {
                    self.scopes.push(ScopeKind::Assignment);
                }
                Ok(Some(Recognized::unit(Unit::VariableDeclaration {
                    mutable: ctx.head == "mutable",
                    data_type: data_type.to_string(),
                    name,
                })))
            }
            _ => Ok(None),
        }
    }

    fn call(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        if !matches!(ctx.kind, SentenceKind::Opening | SentenceKind::Closing) {
            return Ok(None);
        }
        let Some(name) = ctx.body_or_none() else {
            return Ok(None);
        };
        let unit = match ctx.head {
            "call" => Unit::FunctionCallStart { name },
            "new" => Unit::ObjectConstructionStart { type_name: name },
            _ => return Ok(None),
        };
        self.scopes.push(ScopeKind::FunctionCall);
        Ok(Some(Recognized::unit(unit)))
    }

    fn end_marker(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        if ctx.head != "end" {
            return Ok(None);
        }
        let Some(requested) = ScopeKind::from_end_tag(ctx.body) else {
            return Ok(None);
        };
        let scope = self.close_scope(ctx, requested)?;
        Ok(Some(Recognized::unit(Unit::EndMarker { scope })))
    }

    fn two_word_cluster(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        if ctx.body.is_empty() || ctx.body.contains(' ') {
            return Ok(None);
        }
        Ok(Some(Recognized::unit(Unit::TwoWordCluster {
            first: ctx.head.to_string(),
            second: ctx.body.to_string(),
        })))
    }

    fn reference(&mut self, ctx: &Context<'_>) -> GrammarResult<Option<Recognized>> {
        if ctx.text.is_empty() || ctx.text.contains(' ') {
            return Ok(None);
        }
        Ok(Some(Recognized::unit(Unit::Reference {
            name: ctx.text.to_string(),
        })))
    }
}

impl Default for GrammarBuilder {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use unic_sentences::{CalculationKind, ComparisonKind};
    use unic_units::FalsyValue;
    use test_log::test;

    fn sentences(source: &str) -> Vec<Sentence> {
        tokenize(source).expect("tokenizing should succeed").sentences
    }

    fn build_with(source: &str, options: BuildOptions) -> GrammarResult<Built> {
        GrammarBuilder::new(options).build(&sentences(source))
    }

    fn units(source: &str) -> Vec<Unit> {
        let built = build_with(source, BuildOptions::default()).expect("building should succeed");
        assert!(
            built.open_scopes.is_empty(),
            "scopes left open: {:?}",
            built.open_scopes
        );
        built.units
    }

    fn reference(name: &str) -> Unit {
        Unit::Reference {
            name: name.to_string(),
        }
    }

    fn cluster(first: &str, second: &str) -> Unit {
        Unit::TwoWordCluster {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    fn end(scope: ScopeKind) -> Unit {
        Unit::EndMarker { scope }
    }

    #[test]
    fn declaration_with_value() {
        assert_eq!(
            units("# note\nconstant integer x: 5;"),
            vec![
                Unit::Comment {
                    content: " note".to_string()
                },
                Unit::VariableDeclaration {
                    mutable: false,
                    data_type: "integer".to_string(),
                    name: Some("x".to_string()),
                },
                Unit::Integer(5),
                Unit::AssignmentEnd,
            ]
        );
    }

    #[test]
    fn declaration_then_assignment() {
        assert_eq!(
            units("mutable integer: x = null;"),
            vec![
                Unit::VariableDeclaration {
                    mutable: true,
                    data_type: "integer".to_string(),
                    name: None,
                },
                Unit::AssignmentKey {
                    key: "x".to_string()
                },
                Unit::Falsy(FalsyValue::Null),
                Unit::AssignmentEnd,
            ]
        );
    }

    #[test]
    fn array_literal() {
        assert_eq!(
            units("array: 1, 2, 3;"),
            vec![
                Unit::ArrayStart,
                Unit::Integer(1),
                Unit::Integer(2),
                Unit::Integer(3),
                Unit::ArrayEnd,
            ]
        );
    }

    #[test]
    fn array_closes_declaration() {
        assert_eq!(
            units("constant list xs: array: 1.5, true;"),
            vec![
                Unit::VariableDeclaration {
                    mutable: false,
                    data_type: "list".to_string(),
                    name: Some("xs".to_string()),
                },
                Unit::ArrayStart,
                Unit::Float(1.5),
                Unit::Boolean(true),
                Unit::ArrayEnd,
                Unit::AssignmentEnd,
            ]
        );
    }

    #[test]
    fn nested_arrays_close_one_at_a_time() {
        assert_eq!(
            units("array: array: 1; 2;"),
            vec![
                Unit::ArrayStart,
                Unit::ArrayStart,
                Unit::Integer(1),
                Unit::ArrayEnd,
                Unit::Integer(2),
                Unit::ArrayEnd,
            ]
        );
    }

    #[test]
    fn object_fields() {
        assert_eq!(
            units("object: x = 1, y = 2;"),
            vec![
                Unit::ObjectStart,
                Unit::AssignmentKey {
                    key: "x".to_string()
                },
                Unit::Integer(1),
                Unit::AssignmentEnd,
                Unit::AssignmentKey {
                    key: "y".to_string()
                },
                Unit::Integer(2),
                Unit::AssignmentEnd,
                Unit::ObjectEnd,
            ]
        );
    }

    #[test]
    fn object_fields_after_string_values() {
        assert_eq!(
            units(r#"object: name = "x", age = 3;"#),
            vec![
                Unit::ObjectStart,
                Unit::AssignmentKey {
                    key: "name".to_string()
                },
                Unit::SafeString {
                    content: "x".to_string()
                },
                Unit::AssignmentEnd,
                Unit::AssignmentKey {
                    key: "age".to_string()
                },
                Unit::Integer(3),
                Unit::AssignmentEnd,
                Unit::ObjectEnd,
            ]
        );
    }

    #[test]
    fn strings_and_statement_terminators() {
        assert_eq!(
            units(r#""hi"; 'there';"#),
            vec![
                Unit::SafeString {
                    content: "hi".to_string()
                },
                Unit::Closing,
                Unit::NormalString {
                    content: "there".to_string()
                },
                Unit::Closing,
            ]
        );
    }

    #[test]
    fn if_elif_else() {
        assert_eq!(
            units("if: a; then: x; elif: b; then: y; else: z; end if;"),
            vec![
                Unit::IfHead,
                reference("a"),
                Unit::Closing,
                Unit::IfBodyStart,
                reference("x"),
                Unit::Closing,
                Unit::ElifHead,
                reference("b"),
                Unit::Closing,
                Unit::IfBodyStart,
                reference("y"),
                Unit::Closing,
                Unit::ElseHead,
                Unit::IfBodyStart,
                reference("z"),
                Unit::Closing,
                end(ScopeKind::IfBlockBody),
            ]
        );
    }

    #[test]
    fn elif_replaces_if_block() {
        let sentences = sentences("if: a; then: x; elif: b; then: y; elif: c; then: z; end if;");
        let mut builder = GrammarBuilder::default();
        let mut depths = vec![];
        for (index, sentence) in sentences.iter().enumerate() {
            builder.feed(index, sentence).unwrap();
            depths.push(builder.scopes().depth());
        }
        assert_eq!(depths.iter().max(), Some(&2));
        assert_eq!(depths.last(), Some(&1));
    }

    #[test]
    fn walk_loop() {
        assert_eq!(
            units("walk items, take item: print item; end loop;"),
            vec![
                Unit::LoopHead {
                    kind: LoopKind::Walk,
                    iterable: "items".to_string()
                },
                Unit::LoopIteratorName {
                    name: "item".to_string()
                },
                Unit::LoopBodyStart,
                cluster("print", "item"),
                Unit::Closing,
                end(ScopeKind::LoopBody),
            ]
        );
    }

    #[test]
    fn while_loop() {
        assert_eq!(
            units("while: x < 5; do: x += 1; end loop;"),
            vec![
                Unit::WhileLoopHead,
                reference("x"),
                Unit::Comparison(ComparisonKind::Lower),
                Unit::Integer(5),
                Unit::Closing,
                Unit::WhileBodyStart,
                reference("x"),
                Unit::Calculation(CalculationKind::AddAssignment),
                Unit::Integer(1),
                Unit::Closing,
                end(ScopeKind::LoopBody),
            ]
        );
    }

    #[test]
    fn switch_with_inline_subjects() {
        assert_eq!(
            units("switch x:\ncase 1:\nprint one;\nend case;\ndefault:\nprint other;\nend case;\nend switch;"),
            vec![
                Unit::SwitchHead {
                    subject: Some("x".to_string())
                },
                Unit::CaseHead {
                    value: Some("1".to_string())
                },
                cluster("print", "one"),
                Unit::Closing,
                end(ScopeKind::CaseBody),
                Unit::DefaultCaseHead,
                Unit::CaseBodyStart,
                cluster("print", "other"),
                Unit::Closing,
                end(ScopeKind::CaseBody),
                end(ScopeKind::SwitchBody),
            ]
        );
    }

    #[test]
    fn switch_heads_become_bodies() {
        let sentences = sentences("switch: x; case: 1; do: print one; end case; end switch;");
        let mut builder = GrammarBuilder::default();
        let mut stacks = vec![];
        for (index, sentence) in sentences.iter().enumerate() {
            builder.feed(index, sentence).unwrap();
            stacks.push(builder.scopes().to_string());
        }
        assert_eq!(
            stacks,
            vec![
                "[function-body, switch-head]",
                "[function-body, switch-head]",
                "[function-body, switch-body, case-head]",
                "[function-body, switch-body, case-head]",
                "[function-body, switch-body, case-body]",
                "[function-body, switch-body, case-body]",
                "[function-body, switch-body]",
                "[function-body]",
            ]
        );
        assert!(builder.units().contains(&Unit::CaseBodyStart));
    }

    #[test]
    fn consecutive_cases_share_a_body() {
        let sentences = sentences("switch x:\ncase 1:\ncase 2:\nprint y;\nend case;\nend switch;");
        let mut builder = GrammarBuilder::default();
        let mut stacks = vec![];
        for (index, sentence) in sentences.iter().enumerate() {
            builder.feed(index, sentence).unwrap();
            stacks.push(builder.scopes().to_string());
        }
        assert_eq!(
            stacks[..3],
            [
                "[function-body, switch-head]",
                "[function-body, switch-body, case-head]",
                "[function-body, switch-body, case-head]",
            ]
        );

        let built = builder.finish();
        assert_eq!(
            built.units,
            vec![
                Unit::SwitchHead {
                    subject: Some("x".to_string())
                },
                Unit::CaseHead {
                    value: Some("1".to_string())
                },
                Unit::CaseHead {
                    value: Some("2".to_string())
                },
                cluster("print", "y"),
                Unit::Closing,
                end(ScopeKind::CaseBody),
                end(ScopeKind::SwitchBody),
            ]
        );
        assert!(built.open_scopes.is_empty());
        assert!(built.diagnostics.is_empty());
    }

    #[test]
    fn declarations_directly_after_case_head() {
        assert_eq!(
            units("switch x:\ncase 1:\nconstant integer y: 5;\nend case;\nend switch;"),
            vec![
                Unit::SwitchHead {
                    subject: Some("x".to_string())
                },
                Unit::CaseHead {
                    value: Some("1".to_string())
                },
                Unit::VariableDeclaration {
                    mutable: false,
                    data_type: "integer".to_string(),
                    name: Some("y".to_string()),
                },
                Unit::Integer(5),
                Unit::AssignmentEnd,
                end(ScopeKind::CaseBody),
                end(ScopeKind::SwitchBody),
            ]
        );
    }

    #[test]
    fn function_definition() {
        assert_eq!(
            units("function add:\ninteger a,\ninteger b,\nreturns integer:\nreturn: a + b;\nend fn;"),
            vec![
                Unit::FunctionHead {
                    name: "add".to_string()
                },
                cluster("integer", "a"),
                cluster("integer", "b"),
                Unit::FunctionReturnType {
                    return_type: "integer".to_string()
                },
                Unit::FunctionBodyStart,
                Unit::ReturnKeyword,
                reference("a"),
                Unit::Calculation(CalculationKind::Add),
                reference("b"),
                Unit::Closing,
                end(ScopeKind::FunctionBody),
            ]
        );
    }

    #[test]
    fn class_with_method() {
        assert_eq!(
            units("class Point:\nmethod length:\nreturns float:\nreturn: 0;\nend method;\nend class;"),
            vec![
                Unit::ClassHead {
                    name: "Point".to_string()
                },
                Unit::MethodHead {
                    name: "length".to_string()
                },
                Unit::FunctionReturnType {
                    return_type: "float".to_string()
                },
                Unit::MethodBodyStart,
                Unit::ReturnKeyword,
                Unit::Integer(0),
                Unit::Closing,
                end(ScopeKind::MethodBody),
                end(ScopeKind::ClassBody),
            ]
        );
    }

    #[test]
    fn function_heads_need_function_grammar() {
        assert_eq!(
            units("struct Pair:\nfunction f:\nend struct;"),
            vec![
                Unit::StructHead {
                    name: "Pair".to_string()
                },
                cluster("function", "f"),
                end(ScopeKind::StructBody),
            ]
        );
    }

    #[test]
    fn calls_close_with_their_statement() {
        assert_eq!(
            units("x = call sum: 1, 2; call refresh;"),
            vec![
                Unit::AssignmentKey {
                    key: "x".to_string()
                },
                Unit::FunctionCallStart {
                    name: "sum".to_string()
                },
                Unit::Integer(1),
                Unit::Integer(2),
                Unit::FunctionCallEnd,
                Unit::AssignmentEnd,
                Unit::FunctionCallStart {
                    name: "refresh".to_string()
                },
                Unit::FunctionCallEnd,
            ]
        );
    }

    #[test]
    fn object_construction() {
        assert_eq!(
            units("p = new Point: 1, 2;"),
            vec![
                Unit::AssignmentKey {
                    key: "p".to_string()
                },
                Unit::ObjectConstructionStart {
                    type_name: "Point".to_string()
                },
                Unit::Integer(1),
                Unit::Integer(2),
                Unit::FunctionCallEnd,
                Unit::AssignmentEnd,
            ]
        );
    }

    #[test]
    fn type_definitions() {
        assert_eq!(
            units("type age: integer; type callback: function: returns integer;"),
            vec![
                Unit::TypeDefinitionStart {
                    name: "age".to_string()
                },
                reference("integer"),
                Unit::TypeDefinitionEnd,
                Unit::TypeDefinitionStart {
                    name: "callback".to_string()
                },
                Unit::FunctionTypeDefinition,
                Unit::FunctionTypeReturn {
                    return_type: "integer".to_string()
                },
                Unit::TypeDefinitionEnd,
            ]
        );
    }

    #[test]
    fn accessor_units() {
        assert_eq!(
            units("[list.inner push: 1, 2];"),
            vec![
                Unit::AccessorStart,
                Unit::Accessor {
                    item: "list".to_string(),
                    members: vec!["inner".to_string()],
                    method: Some("push".to_string()),
                    parameters: vec!["1".to_string(), "2".to_string()],
                },
                Unit::AccessorEnd,
                Unit::Closing,
            ]
        );
    }

    #[test]
    fn directives() {
        assert_eq!(
            units("module app;\nimport io;\nlanguage c;\nsection main;"),
            vec![
                Unit::ModuleNameDefinition {
                    name: "app".to_string()
                },
                Unit::Closing,
                Unit::Import {
                    source: "io".to_string()
                },
                Unit::Closing,
                Unit::LanguageDefinition {
                    language: "c".to_string()
                },
                Unit::Closing,
                Unit::SectionMarker {
                    name: "main".to_string()
                },
                Unit::Closing,
            ]
        );
    }

    #[test]
    fn commands() {
        assert_eq!(
            units("command:\nbuild:\ntest:\nend cmd;"),
            vec![
                Unit::CommandHead,
                Unit::Command {
                    name: "build".to_string()
                },
                Unit::Command {
                    name: "test".to_string()
                },
                end(ScopeKind::CommandBody),
            ]
        );
    }

    #[test]
    fn unknown_sentences_degrade() {
        let built = build_with("print the value;", BuildOptions::default()).unwrap();
        assert_eq!(
            built.units,
            vec![
                Unit::Unknown {
                    text: "print the value".to_string()
                },
                Unit::Closing
            ]
        );
        assert_eq!(built.diagnostics.len(), 1);
    }

    #[test]
    fn unknown_sentences_can_be_rejected() {
        let options = BuildOptions {
            unknown_sentences: UnknownSentencePolicy::Reject,
            ..BuildOptions::default()
        };
        assert_eq!(
            build_with("x; print the value;", options),
            Err(GrammarError::UnrecognizedSentence {
                index: 1,
                text: "print the value".to_string()
            })
        );
    }

    #[test]
    fn mismatched_end_marker_is_an_error() {
        assert_eq!(
            build_with("if: x; then: end loop;", BuildOptions::default()),
            Err(GrammarError::MismatchedEndMarker {
                index: 3,
                requested: ScopeKind::LoopBody,
                found: ScopeKind::IfBlockBody,
            })
        );
    }

    #[test]
    fn lenient_end_marker_pops_anyway() {
        let built = build_with("if: x; then: end loop;", BuildOptions::lenient()).unwrap();
        assert_eq!(built.units.last(), Some(&end(ScopeKind::IfBlockBody)));
        assert!(built.open_scopes.is_empty());
        assert_eq!(built.diagnostics.len(), 1);
    }

    #[test]
    fn outermost_scope_is_never_popped() {
        for options in [BuildOptions::default(), BuildOptions::lenient()] {
            assert_eq!(
                build_with("end fn;", options),
                Err(GrammarError::ScopeUnderflow {
                    index: 0,
                    requested: ScopeKind::FunctionBody,
                })
            );
        }
    }

    #[test]
    fn misplaced_elif() {
        assert_eq!(
            build_with("elif: x;", BuildOptions::default()),
            Err(GrammarError::MisplacedBranch {
                index: 0,
                keyword: "elif",
                found: ScopeKind::FunctionBody,
            })
        );

        let built = build_with("elif: x;", BuildOptions::lenient()).unwrap();
        assert_eq!(built.open_scopes, vec![ScopeKind::IfBlockBody]);
        assert_eq!(built.diagnostics.len(), 2);
    }

    #[test]
    fn unclosed_scopes_are_reported() {
        let built = build_with("if: x; then: function f:", BuildOptions::default()).unwrap();
        assert_eq!(built.open_scopes, vec![ScopeKind::IfBlockBody]);
        let messages = built
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.message().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "`function` head is never followed by `returns`".to_string(),
                "1 scope(s) left open at the end of input: if-block-body".to_string(),
            ]
        );
    }

    #[test]
    fn missing_returns_points_at_its_head() {
        let source = "if: x; then: function f:";
        let built = build_with(source, BuildOptions::default()).unwrap();
        let head = &sentences(source)[3];
        assert_eq!(head.text(), "function f");
        assert_eq!(built.diagnostics[0].span(), Some(head.span()));
    }
}
