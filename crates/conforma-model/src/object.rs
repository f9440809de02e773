//! The traversable object-model boundary.

use crate::Scalar;

/// A node of the document graph under evaluation.
///
/// The engine borrows an object for the duration of a single evaluation
/// call: it enumerates the object's declared names while synthesizing a
/// program, and reads properties and linked-object collections while
/// running it. Nothing is retained across calls.
pub trait ModelObject {
    /// Names of the object's own scalar properties, in declaration order.
    ///
    /// Declaration order drives the order of synthesized bindings, which
    /// keeps generated program text reproducible for a given object type.
    fn property_names(&self) -> Vec<String>;

    /// Reads a named scalar property.
    ///
    /// `None` means the object declares no such property. A declared
    /// property that currently has no value reads as `Some(Scalar::Absent)`.
    fn property(&self, name: &str) -> Option<Scalar>;

    /// Names of the object's own relationships, in declaration order.
    fn relationship_names(&self) -> Vec<String>;

    /// The collection of objects reachable via a named relationship, or
    /// `None` if the object declares no such relationship.
    fn linked_objects(&self, name: &str) -> Option<Vec<&dyn ModelObject>>;
}

/// A map-backed [`ModelObject`] with runtime-defined properties and
/// relationships, preserving declaration order.
#[derive(Debug, Clone, Default)]
pub struct MapObject {
    properties: Vec<(String, Scalar)>,
    relationships: Vec<(String, Vec<MapObject>)>,
}

impl MapObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a property (builder form).
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.set_property(name, value);
        self
    }

    /// Adds or replaces a relationship (builder form).
    pub fn with_relationship(mut self, name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        self.set_relationship(name, objects);
        self
    }

    /// Adds or replaces a property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.properties.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.properties.push((name, value));
        }
    }

    /// Adds or replaces a relationship.
    pub fn set_relationship(&mut self, name: impl Into<String>, objects: Vec<MapObject>) {
        let name = name.into();
        if let Some(slot) = self.relationships.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = objects;
        } else {
            self.relationships.push((name, objects));
        }
    }
}

impl ModelObject for MapObject {
    fn property_names(&self) -> Vec<String> {
        self.properties.iter().map(|(n, _)| n.clone()).collect()
    }

    fn property(&self, name: &str) -> Option<Scalar> {
        self.properties
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.clone())
    }

    fn relationship_names(&self) -> Vec<String> {
        self.relationships.iter().map(|(n, _)| n.clone()).collect()
    }

    fn linked_objects(&self, name: &str) -> Option<Vec<&dyn ModelObject>> {
        self.relationships
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, objects)| {
                objects
                    .iter()
                    .map(|o| o as &dyn ModelObject)
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_access() {
        let object = MapObject::new()
            .with_property("b", "x")
            .with_property("a", 5);

        assert_eq!(object.property("a"), Some(Scalar::Int(5)));
        assert_eq!(object.property("b"), Some(Scalar::Text("x".into())));
        assert_eq!(object.property("c"), None);
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let object = MapObject::new()
            .with_property("b", 1)
            .with_property("a", 2);

        assert_eq!(object.property_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_set_property_overwrites() {
        let mut object = MapObject::new().with_property("a", 1);
        object.set_property("a", 2);

        assert_eq!(object.property("a"), Some(Scalar::Int(2)));
        assert_eq!(object.property_names().len(), 1);
    }

    #[test]
    fn test_linked_objects() {
        let object = MapObject::new()
            .with_relationship("children", vec![MapObject::new(), MapObject::new()]);

        assert_eq!(object.relationship_names(), vec!["children"]);
        assert_eq!(object.linked_objects("children").map(|v| v.len()), Some(2));
        assert!(object.linked_objects("parents").is_none());
    }
}
