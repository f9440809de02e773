//! Compile-time and execution-time failures of the script runtime.

use thiserror::Error;

use crate::lexer::Span;

/// A lexing or parsing failure in a program's source text.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} at input offset {span:?}")]
pub struct CompileError {
    pub message: String,
    pub span: Span,
}

impl CompileError {
    pub(crate) fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A runtime failure while executing a compiled program.
///
/// Name resolution is deliberately deferred to this point: a program that
/// references names nothing declared compiles fine and fails here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    #[error("identifier is not bound: {0}")]
    UnresolvedIdentifier(String),

    #[error("object declares no property named {0}")]
    UnknownProperty(String),

    #[error("object declares no relationship named {0}")]
    UnknownRelationship(String),

    #[error("no method {name}() on {target} values")]
    UnknownMethod { target: &'static str, name: String },

    #[error("call to undefined function {0}")]
    UnknownFunction(String),

    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {0}")]
    Overflow(&'static str),
}
