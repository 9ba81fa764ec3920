//! The semantic units produced from sentences

use crate::scope::ScopeKind;
use derive_more::Display;
use itertools::Itertools;
use strum::EnumString;
use unic_sentences::{BooleanOperator, CalculationKind, ComparisonKind};

/// A semantic value in the flat unit stream.
///
/// Blocks are represented by a head unit, an optional body start unit and an
/// [end marker](Unit::EndMarker) instead of by containment.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum Unit {
    #[display(fmt = "comment {:?}", content)]
    Comment { content: String },
    #[display(fmt = "compiler-flag {:?}", flag)]
    CompilerFlag { flag: String },
    #[display(fmt = "target-language-code {:?}", code)]
    TargetLanguageCode { code: String },

    // literals
    #[display(fmt = "boolean {}", _0)]
    Boolean(bool),
    #[display(fmt = "falsy {}", _0)]
    Falsy(FalsyValue),
    #[display(fmt = "integer {}", _0)]
    Integer(i64),
    #[display(fmt = "float {}", _0)]
    Float(f64),
    #[display(fmt = "safe-string {:?}", content)]
    SafeString { content: String },
    #[display(fmt = "normal-string {:?}", content)]
    NormalString { content: String },

    // accessors
    #[display(fmt = "accessor-start")]
    AccessorStart,
    #[display(
        fmt = "accessor {}{}",
        item,
        "accessor_suffix(members, method.as_deref(), parameters)"
    )]
    Accessor {
        item: String,
        members: Vec<String>,
        method: Option<String>,
        parameters: Vec<String>,
    },
    #[display(fmt = "accessor-assignment-marker")]
    AccessorAssignmentMarker,
    #[display(fmt = "accessor-end")]
    AccessorEnd,

    // compound literals
    #[display(fmt = "array-start")]
    ArrayStart,
    #[display(fmt = "array-end")]
    ArrayEnd,
    #[display(fmt = "object-start")]
    ObjectStart,
    #[display(fmt = "object-end")]
    ObjectEnd,

    // operators
    #[display(fmt = "parentheses-start")]
    ParenthesesStart,
    #[display(fmt = "parentheses-end")]
    ParenthesesEnd,
    #[display(fmt = "boolean-operator {}", _0)]
    BooleanOperator(BooleanOperator),
    #[display(fmt = "calculation {}", _0)]
    Calculation(CalculationKind),
    #[display(fmt = "comparison {}", _0)]
    Comparison(ComparisonKind),

    // flow control
    #[display(fmt = "break-keyword")]
    BreakKeyword,
    #[display(fmt = "continue-keyword")]
    ContinueKeyword,
    #[display(fmt = "return-keyword")]
    ReturnKeyword,
    #[display(fmt = "if-head")]
    IfHead,
    #[display(fmt = "elif-head")]
    ElifHead,
    #[display(fmt = "else-head")]
    ElseHead,
    #[display(fmt = "if-body-start")]
    IfBodyStart,
    #[display(fmt = "while-loop-head")]
    WhileLoopHead,
    #[display(fmt = "while-body-start")]
    WhileBodyStart,
    #[display(fmt = "loop-head {} {}", kind, iterable)]
    LoopHead { kind: LoopKind, iterable: String },
    #[display(fmt = "loop-iterator-name {}", name)]
    LoopIteratorName { name: String },
    #[display(fmt = "loop-body-start")]
    LoopBodyStart,
    #[display(fmt = "switch-head{}", "optional_suffix(subject.as_deref())")]
    SwitchHead { subject: Option<String> },
    #[display(fmt = "case-head{}", "optional_suffix(value.as_deref())")]
    CaseHead { value: Option<String> },
    #[display(fmt = "default-case-head")]
    DefaultCaseHead,
    #[display(fmt = "case-body-start")]
    CaseBodyStart,

    // definitions
    #[display(fmt = "function-head {}", name)]
    FunctionHead { name: String },
    #[display(fmt = "method-head {}", name)]
    MethodHead { name: String },
    #[display(fmt = "function-return-type {}", return_type)]
    FunctionReturnType { return_type: String },
    #[display(fmt = "function-body-start")]
    FunctionBodyStart,
    #[display(fmt = "method-body-start")]
    MethodBodyStart,
    #[display(fmt = "function-type-definition")]
    FunctionTypeDefinition,
    #[display(fmt = "function-type-return {}", return_type)]
    FunctionTypeReturn { return_type: String },
    #[display(fmt = "struct-head {}", name)]
    StructHead { name: String },
    #[display(fmt = "class-head {}", name)]
    ClassHead { name: String },
    #[display(fmt = "type-definition-start {}", name)]
    TypeDefinitionStart { name: String },
    #[display(fmt = "type-definition-end")]
    TypeDefinitionEnd,
    #[display(fmt = "command-head")]
    CommandHead,
    #[display(fmt = "command {}", name)]
    Command { name: String },

    // directives
    #[display(fmt = "import {}", source)]
    Import { source: String },
    #[display(fmt = "language-definition {}", language)]
    LanguageDefinition { language: String },
    #[display(fmt = "module-name-definition {}", name)]
    ModuleNameDefinition { name: String },
    #[display(fmt = "section-marker {}", name)]
    SectionMarker { name: String },

    // declarations and assignments
    #[display(
        fmt = "variable-declaration {} {}{}",
        "if *mutable { \"mutable\" } else { \"constant\" }",
        data_type,
        "optional_suffix(name.as_deref())"
    )]
    VariableDeclaration {
        mutable: bool,
        data_type: String,
        name: Option<String>,
    },
    #[display(fmt = "assignment-key {}", key)]
    AssignmentKey { key: String },
    #[display(fmt = "assignment-end")]
    AssignmentEnd,
    #[display(fmt = "function-call-start {}", name)]
    FunctionCallStart { name: String },
    #[display(fmt = "object-construction-start {}", type_name)]
    ObjectConstructionStart { type_name: String },
    #[display(fmt = "function-call-end")]
    FunctionCallEnd,

    #[display(fmt = "end-marker {}", scope)]
    EndMarker { scope: ScopeKind },
    #[display(fmt = "two-word-cluster {} {}", first, second)]
    TwoWordCluster { first: String, second: String },
    #[display(fmt = "reference {}", name)]
    Reference { name: String },
    /// A statement terminator with no scope effect
    #[display(fmt = "closing")]
    Closing,
    #[display(fmt = "unknown {:?}", text)]
    Unknown { text: String },
}

fn optional_suffix(value: Option<&str>) -> String {
    value.map(|value| format!(" {value}")).unwrap_or_default()
}

fn accessor_suffix(members: &[String], method: Option<&str>, parameters: &[String]) -> String {
    let mut suffix = members.iter().map(|member| format!(".{member}")).join("");
    if let Some(method) = method {
        suffix.push(' ');
        suffix.push_str(method);
        if !parameters.is_empty() {
            suffix.push_str(": ");
            suffix.push_str(&parameters.iter().join(", "));
        }
    }
    suffix
}

/// Keywords evaluating to a falsy value
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, EnumString)]
pub enum FalsyValue {
    #[strum(serialize = "undefined")]
    Undefined,
    #[strum(serialize = "null")]
    Null,
    #[strum(serialize = "NaN")]
    NaN,
    #[strum(serialize = "void")]
    Void,
}

/// How a loop walks its iterable
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LoopKind {
    /// `count n`, iterating over indices
    Count,
    /// `walk items`, iterating over items
    Walk,
    /// `until n`
    Until,
}
