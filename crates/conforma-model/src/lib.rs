//! Core boundary types for the Conforma rule engine.
//!
//! This crate defines the object-model boundary ([`ModelObject`]), the plain
//! value type exchanged across it ([`Scalar`]), and the catalog value types
//! ([`Rule`], [`Variable`]) whose expressions the engine evaluates. Catalog
//! loading and validation live outside this workspace; these types only fix
//! the shape the engine consumes.

mod catalog;
mod object;
mod scalar;

pub use catalog::{Rule, RuleId, Variable};
pub use object::{MapObject, ModelObject};
pub use scalar::Scalar;
