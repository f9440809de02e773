//! Binding environment for program execution.

use std::collections::HashMap;

use crate::value::Value;

/// The namespace a program executes against.
///
/// The engine seeds one scope per run with its globals and the current
/// object; `var` statements layer program-local bindings on top.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    bindings: HashMap<String, Value<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs or overwrites a binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value<'a>) {
        self.bindings.insert(name.into(), value);
    }

    /// Resolves a name to a copy of its value.
    pub fn resolve(&self, name: &str) -> Option<Value<'a>> {
        self.bindings.get(name).cloned()
    }

    /// Whether a binding exists.
    pub fn has(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_resolve() {
        let mut scope = Scope::new();
        scope.bind("x", Value::Int(42));

        assert!(scope.has("x"));
        assert!(matches!(scope.resolve("x"), Some(Value::Int(42))));
        assert!(scope.resolve("y").is_none());
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut scope = Scope::new();
        scope.bind("x", Value::Int(1));
        scope.bind("x", Value::Int(2));

        assert!(matches!(scope.resolve("x"), Some(Value::Int(2))));
    }
}
