//! Compiled programs.

use crate::ast::Stmt;
use crate::error::{CompileError, ExecError};
use crate::exec;
use crate::lexer::lex;
use crate::parser::parse;
use crate::scope::Scope;
use crate::value::Value;

/// A compiled program: the reusable artifact produced from synthesized
/// source text.
///
/// Compilation is lex + parse, done once; the artifact is immutable
/// afterwards and can be executed any number of times against different
/// scopes.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    stmts: Vec<Stmt>,
}

impl Program {
    /// Compiles source text.
    pub fn compile(source: &str) -> Result<Self, CompileError> {
        let tokens = lex(source)?;
        let stmts = parse(&tokens)?;
        Ok(Self { stmts })
    }

    /// Statements in execution order.
    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    /// Executes against the given scope.
    ///
    /// The result is the value of the last expression statement, `Null`
    /// when there is none.
    pub fn exec<'a>(&self, scope: &mut Scope<'a>) -> Result<Value<'a>, ExecError> {
        exec::run(&self.stmts, scope)
    }
}
