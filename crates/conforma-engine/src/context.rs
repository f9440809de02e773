//! The shared evaluation context.

use std::collections::HashMap;

use conforma_model::{ModelObject, Scalar};
use conforma_script::{ExecError, Program, Scope, Value};

/// The binding environment programs execute in.
///
/// One context lives for the whole engine lifetime. Globals installed
/// with [`Context::bind`] are visible to every run; the current object is
/// injected under the name `obj` for exactly one run at a time — the
/// engine holds its lock across the install-and-execute sequence, so no
/// other run can observe the binding mid-update.
#[derive(Debug, Default)]
pub struct Context {
    globals: HashMap<String, Scalar>,
}

impl Context {
    pub(crate) fn new(globals: HashMap<String, Scalar>) -> Self {
        Self { globals }
    }

    /// Installs or overwrites an engine-level global binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        self.globals.insert(name.into(), value.into());
    }

    /// Executes a compiled program with `object` bound as `obj`.
    pub fn run<'a>(
        &self,
        program: &Program,
        object: &'a dyn ModelObject,
    ) -> Result<Value<'a>, ExecError> {
        let mut scope = Scope::new();
        for (name, value) in &self.globals {
            scope.bind(name.clone(), Value::from(value.clone()));
        }
        scope.bind("obj", Value::Object(object));
        program.exec(&mut scope)
    }
}
