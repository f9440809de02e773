//! Compiler and runtime for the script subset that rule and variable
//! expressions are synthesized into.
//!
//! The pipeline is conventional: [`lex`] turns source text into tokens,
//! [`parse`] builds a statement list, and [`Program`] holds the result as
//! the reusable compiled artifact. Execution walks the statements against
//! a [`Scope`] of bindings; the value of the last expression statement is
//! the program result.
//!
//! The language is a small ECMAScript-flavored subset: `var` bindings,
//! no-argument `function` declarations, and expressions over booleans,
//! integers, reals, strings, `null`, the bound model object, and
//! linked-object collections. Semantics are strict: there is no
//! truthiness, and mixed-type comparisons fail instead of coercing.

mod ast;
mod error;
mod exec;
mod lexer;
mod parser;
mod program;
mod scope;
mod value;

pub use ast::{BinaryOp, Expr, Stmt, UnaryOp};
pub use error::{CompileError, ExecError};
pub use lexer::{lex, Span, SpannedToken, Token};
pub use parser::parse;
pub use program::Program;
pub use scope::Scope;
pub use value::Value;
