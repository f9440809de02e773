//! Rule-expression evaluation engine.
//!
//! The engine turns declarative rule and variable expressions into
//! executable programs bound to model objects: it synthesizes a binding
//! preamble for exactly the names an expression references, compiles the
//! result once per rule or variable identity, and executes the cached
//! artifact under a single shared evaluation context. Entry points
//! serialize on one lock, so the engine is safe to share across caller
//! threads at the cost of one in-flight evaluation at a time.
//!
//! # Example
//!
//! ```
//! use conforma_engine::{Engine, MapObject, Rule, RuleId};
//!
//! let engine = Engine::initialise();
//! let object = MapObject::new().with_property("pages", 3);
//! let rule = Rule::new(RuleId::new("6.1.2", 1), "pages > 0");
//!
//! assert!(engine.evaluate_rule_test(&object, &rule).unwrap());
//! engine.shutdown().unwrap();
//! ```

mod context;
mod engine;
mod error;
mod synth;

pub use context::Context;
pub use engine::{Engine, EngineBuilder};
pub use error::EngineError;
pub use synth::synthesize;

pub use conforma_model::{MapObject, ModelObject, Rule, RuleId, Scalar, Variable};
pub use conforma_script::{CompileError, ExecError, Program, Value};
