//! Rule and variable catalog value types.
//!
//! A validation profile supplies rules (boolean tests) and variables
//! (value expressions). Both are immutable for the lifetime of a process
//! run, which is what makes compiled-artifact caching by identity sound.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a rule: the profile clause it belongs to and the
/// test's ordinal within that clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId {
    clause: String,
    test_number: u32,
}

impl RuleId {
    pub fn new(clause: impl Into<String>, test_number: u32) -> Self {
        Self {
            clause: clause.into(),
            test_number,
        }
    }

    pub fn clause(&self) -> &str {
        &self.clause
    }

    pub fn test_number(&self) -> u32 {
        self.test_number
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.clause, self.test_number)
    }
}

/// A named boolean test evaluated against a model object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    id: RuleId,
    test: String,
}

impl Rule {
    pub fn new(id: RuleId, test: impl Into<String>) -> Self {
        Self {
            id,
            test: test.into(),
        }
    }

    pub fn id(&self) -> &RuleId {
        &self.id
    }

    /// The boolean test expression.
    pub fn test(&self) -> &str {
        &self.test
    }
}

/// A named value expression, typically feeding rule tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    value: String,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The variable's name, which doubles as its cache identity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value expression.
    pub fn value(&self) -> &str {
        &self.value
    }
}
