//! Runtime values.

use std::fmt;
use std::sync::Arc;

use conforma_model::{ModelObject, Scalar};

/// A value produced during program execution.
///
/// The lifetime parameter is the borrow of the model object the program is
/// bound to: object and collection values never outlive one run. Scalar
/// variants unwrap to [`Scalar`]; object and collection values have no
/// plain representation and exist only inside the runtime.
#[derive(Clone)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Real(f64),
    Str(Arc<str>),
    Object(&'a dyn ModelObject),
    Collection(Vec<&'a dyn ModelObject>),
}

impl Value<'_> {
    /// Name of the value's runtime type, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Real(_) => "real",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Collection(_) => "collection",
        }
    }

    /// Unwraps to a plain scalar, or `None` for object and collection
    /// values.
    pub fn to_scalar(&self) -> Option<Scalar> {
        match self {
            Value::Null => Some(Scalar::Absent),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Int(v) => Some(Scalar::Int(*v)),
            Value::Real(v) => Some(Scalar::Real(*v)),
            Value::Str(s) => Some(Scalar::Text(s.to_string())),
            Value::Object(_) | Value::Collection(_) => None,
        }
    }
}

impl<'a> From<Scalar> for Value<'a> {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Absent => Value::Null,
            Scalar::Bool(b) => Value::Bool(b),
            Scalar::Int(v) => Value::Int(v),
            Scalar::Real(v) => Value::Real(v),
            Scalar::Text(s) => Value::Str(Arc::from(s)),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Real(v) => write!(f, "Real({v})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Object(_) => write!(f, "Object(..)"),
            Value::Collection(items) => write!(f, "Collection(len = {})", items.len()),
        }
    }
}
