//! Kinds of lexical scopes tracked while building units

use crate::unit::Unit;
use strum::{Display, EnumIter};

/// A kind of scope on the grammar builder's scope stack
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ScopeKind {
    FunctionBody,
    MethodBody,
    LoopBody,
    IfBlockBody,
    /// Collects the subject of a switch until the first case
    SwitchHead,
    SwitchBody,
    /// Collects the value of a case until its body starts
    CaseHead,
    CaseBody,
    StructBody,
    ClassBody,
    CommandBody,
    ArrayBody,
    ObjectBody,
    Accessor,
    Assignment,
    FunctionCall,
    TypeDefinition,
}

impl ScopeKind {
    /// Maps the tag of an `end <tag>` sentence to the scope it closes
    pub fn from_end_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "fn" => ScopeKind::FunctionBody,
            "method" => ScopeKind::MethodBody,
            "loop" => ScopeKind::LoopBody,
            "if" => ScopeKind::IfBlockBody,
            "switch" => ScopeKind::SwitchBody,
            "case" => ScopeKind::CaseBody,
            "struct" => ScopeKind::StructBody,
            "class" => ScopeKind::ClassBody,
            "cmd" => ScopeKind::CommandBody,
            "array" => ScopeKind::ArrayBody,
            "object" => ScopeKind::ObjectBody,
            "type" => ScopeKind::TypeDefinition,
            "call" => ScopeKind::FunctionCall,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether statements inside this scope follow the grammar of a function body, allowing
    /// declarations and nested function heads.
    pub fn uses_function_grammar(&self) -> bool {
        matches!(
            self,
            ScopeKind::FunctionBody
                | ScopeKind::MethodBody
                | ScopeKind::LoopBody
                | ScopeKind::IfBlockBody
                | ScopeKind::CaseBody
        )
    }

    /// Whether a `;` sentence closes this scope without an end marker
    pub fn closes_implicitly(&self) -> bool {
        matches!(
            self,
            ScopeKind::ArrayBody
                | ScopeKind::ObjectBody
                | ScopeKind::FunctionCall
                | ScopeKind::TypeDefinition
        )
    }

    /// Whether this is a head scope that turns into a body once its body starts
    pub fn is_head(&self) -> bool {
        matches!(self, ScopeKind::SwitchHead | ScopeKind::CaseHead)
    }

    /// The body scope a head scope turns into. Other scopes are returned as is.
    pub fn body(self) -> Self {
        match self {
            ScopeKind::SwitchHead => ScopeKind::SwitchBody,
            ScopeKind::CaseHead => ScopeKind::CaseBody,
            other => other,
        }
    }

    /// Whether closing `requested` may pop this scope. A head scope can be closed as its body.
    pub fn satisfies(&self, requested: ScopeKind) -> bool {
        *self == requested || self.body() == requested
    }

    /// The unit emitted when this scope is closed by a `;` sentence
    pub fn implicit_end(&self) -> Option<Unit> {
        let unit = match self {
            ScopeKind::Assignment => Unit::AssignmentEnd,
            ScopeKind::ArrayBody => Unit::ArrayEnd,
            ScopeKind::ObjectBody => Unit::ObjectEnd,
            ScopeKind::FunctionCall => Unit::FunctionCallEnd,
            ScopeKind::TypeDefinition => Unit::TypeDefinitionEnd,
            _ => return None,
        };
        Some(unit)
    }
}
