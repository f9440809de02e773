//! Error types for the evaluation engine.

use thiserror::Error;

use conforma_script::{CompileError, ExecError};

/// Main error type for engine operations.
///
/// Every failure propagates synchronously to the caller of the evaluate
/// call that caused it; nothing is retried internally and nothing is
/// downgraded to a default value.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An expression referenced a name that is neither a declared
    /// property nor a `<relationship>_size` pseudo-property.
    #[error("unresolved binding: {name}")]
    UnresolvedBinding { name: String },

    /// A rule's test did not reduce to a boolean.
    #[error("rule {rule} did not reduce to a boolean: {detail}")]
    TypeCoercion { rule: String, detail: String },

    /// The synthesized program text is syntactically invalid. Raised on
    /// every attempt for the identity; failures are never cached.
    #[error("failed to compile {identity}: {source}")]
    Compile {
        identity: String,
        source: CompileError,
    },

    /// Evaluation was attempted, or shutdown repeated, after the
    /// evaluation context was released.
    #[error("evaluation context has been shut down")]
    ContextClosed,

    /// Any other runtime failure while executing a program.
    #[error("execution failed: {0}")]
    Execution(#[from] ExecError),
}
