//! Engine orchestration: cached compilation and locked evaluation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use conforma_model::{ModelObject, Rule, RuleId, Scalar, Variable};
use conforma_script::{ExecError, Program, Value};
use tracing::{debug, trace};

use crate::context::Context;
use crate::error::EngineError;
use crate::synth::synthesize;

/// The process-wide rule and variable evaluation engine.
///
/// Each entry point runs the whole bind-compile-run-unwrap sequence under
/// one internal lock: concurrent callers cannot interleave an object
/// binding with another caller's execution, and cannot race to compile
/// the same missing cache entry. Throughput is therefore bounded by one
/// in-flight evaluation at a time, regardless of caller parallelism.
///
/// Compiled programs are cached per rule identity and per variable name
/// and are never evicted: rule and variable text is immutable for the
/// lifetime of a process run. This cache is unsafe for a live-reloadable
/// catalog, which would need invalidation this engine does not have.
pub struct Engine {
    inner: Mutex<Inner>,
}

struct Inner {
    context: Option<Context>,
    rule_programs: HashMap<RuleId, Arc<Program>>,
    variable_programs: HashMap<String, Arc<Program>>,
    compilations: u64,
}

impl Engine {
    /// Creates an engine with an empty evaluation context.
    pub fn initialise() -> Self {
        EngineBuilder::new().build()
    }

    /// Starts building an engine with seeded context globals.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Releases the evaluation context.
    ///
    /// Exactly one release is allowed; evaluations after it, and a second
    /// shutdown, fail with [`EngineError::ContextClosed`]. The internal
    /// lock guarantees no evaluation is in flight during the release.
    pub fn shutdown(&self) -> Result<(), EngineError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.context.take() {
            Some(_) => Ok(()),
            None => Err(EngineError::ContextClosed),
        }
    }

    /// Number of successful compilations performed so far.
    pub fn compilations(&self) -> u64 {
        self.inner.lock().unwrap().compilations
    }

    /// Evaluates a rule's boolean test against an object.
    ///
    /// The synthesized program guards the test with `(<test>)==true`, so
    /// a test that does not reduce to a boolean fails with
    /// [`EngineError::TypeCoercion`] instead of being truthiness-coerced.
    /// The first evaluation for a rule identity compiles and caches the
    /// program; later evaluations reuse it, whatever object they bind.
    pub fn evaluate_rule_test(
        &self,
        object: &dyn ModelObject,
        rule: &Rule,
    ) -> Result<bool, EngineError> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        let context = inner.context.as_ref().ok_or(EngineError::ContextClosed)?;

        let program = match inner.rule_programs.get(rule.id()) {
            Some(program) => Arc::clone(program),
            None => {
                let guarded = format!("({})==true", rule.test());
                let source = synthesize(
                    &object.property_names(),
                    &object.relationship_names(),
                    &guarded,
                );
                let program =
                    Arc::new(Program::compile(&source).map_err(|source| EngineError::Compile {
                        identity: rule.id().to_string(),
                        source,
                    })?);
                inner.compilations += 1;
                debug!(rule = %rule.id(), bytes = source.len(), "compiled rule test");
                inner.rule_programs.insert(rule.id().clone(), Arc::clone(&program));
                program
            }
        };

        let raw = context
            .run(&program, object)
            .map_err(|err| rule_error(rule, err))?;
        match raw {
            Value::Bool(result) => {
                trace!(rule = %rule.id(), result, "rule test evaluated");
                Ok(result)
            }
            other => Err(EngineError::TypeCoercion {
                rule: rule.id().to_string(),
                detail: format!("evaluated to {}", other.type_name()),
            }),
        }
    }

    /// Evaluates a variable's value expression against an object and
    /// unwraps the result to a plain scalar.
    ///
    /// The first evaluation for a variable name compiles and caches the
    /// program, exactly as for rules but in an independent cache: rule
    /// identities and variable names come from disjoint namespaces.
    pub fn evaluate_variable(
        &self,
        object: &dyn ModelObject,
        variable: &Variable,
    ) -> Result<Scalar, EngineError> {
        let mut guard = self.inner.lock().unwrap();
        let inner = &mut *guard;
        let context = inner.context.as_ref().ok_or(EngineError::ContextClosed)?;

        let program = match inner.variable_programs.get(variable.name()) {
            Some(program) => Arc::clone(program),
            None => {
                let source = synthesize(
                    &object.property_names(),
                    &object.relationship_names(),
                    variable.value(),
                );
                let program =
                    Arc::new(Program::compile(&source).map_err(|source| EngineError::Compile {
                        identity: variable.name().to_string(),
                        source,
                    })?);
                inner.compilations += 1;
                debug!(variable = variable.name(), bytes = source.len(), "compiled variable value");
                inner
                    .variable_programs
                    .insert(variable.name().to_string(), Arc::clone(&program));
                program
            }
        };

        let raw = context.run(&program, object).map_err(execution_error)?;
        trace!(variable = variable.name(), "variable evaluated");
        unwrap_scalar(raw)
    }

    /// Compiles and runs `source` directly, with no synthesis and no
    /// caching.
    ///
    /// The program sees the context globals and the object as `obj`.
    /// Meant for one-off expressions such as report message arguments.
    pub fn evaluate_raw(
        &self,
        object: &dyn ModelObject,
        source: &str,
    ) -> Result<Scalar, EngineError> {
        let guard = self.inner.lock().unwrap();
        let context = guard.context.as_ref().ok_or(EngineError::ContextClosed)?;

        let program = Program::compile(source).map_err(|source| EngineError::Compile {
            identity: "inline expression".to_string(),
            source,
        })?;
        let raw = context.run(&program, object).map_err(execution_error)?;
        unwrap_scalar(raw)
    }
}

/// Builds an [`Engine`], seeding context globals before first use.
#[derive(Debug, Default)]
pub struct EngineBuilder {
    globals: HashMap<String, Scalar>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an engine-level global visible to every evaluation.
    pub fn global(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            inner: Mutex::new(Inner {
                context: Some(Context::new(self.globals)),
                rule_programs: HashMap::new(),
                variable_programs: HashMap::new(),
                compilations: 0,
            }),
        }
    }
}

fn rule_error(rule: &Rule, err: ExecError) -> EngineError {
    match err {
        ExecError::UnresolvedIdentifier(name) => EngineError::UnresolvedBinding { name },
        // Inside a rule test every type mismatch, including the synthesized
        // `==true` guard hitting a non-boolean, means the test cannot
        // reduce to a boolean.
        ExecError::TypeMismatch(detail) => EngineError::TypeCoercion {
            rule: rule.id().to_string(),
            detail,
        },
        other => EngineError::Execution(other),
    }
}

fn execution_error(err: ExecError) -> EngineError {
    match err {
        ExecError::UnresolvedIdentifier(name) => EngineError::UnresolvedBinding { name },
        other => EngineError::Execution(other),
    }
}

fn unwrap_scalar(raw: Value<'_>) -> Result<Scalar, EngineError> {
    raw.to_scalar().ok_or_else(|| {
        EngineError::Execution(ExecError::TypeMismatch(format!(
            "result is a {} value, not a plain scalar",
            raw.type_name()
        )))
    })
}
