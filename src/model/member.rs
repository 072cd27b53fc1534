//! Callable members of a type: parameters, methods, constructors.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::model::{Modifier, TypeRef};

/// A single formal parameter of a constructor or method.
///
/// Two parameters are equal iff their rendered source text is identical.
/// This is deliberate: parameters declared on different constructors count
/// as "the same bound parameter" exactly when their rendered form matches.
/// The `unbound` marker is control data and stays out of the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter type as it appears in source.
    pub ty: TypeRef,

    /// Parameter name.
    pub name: String,

    /// Raw annotation text echoed into generated signatures,
    /// e.g. `@Deprecated`. Control annotations never appear here once a
    /// model has been extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<String>,

    /// Supplied per creation-method call instead of being bound into the
    /// factory.
    #[serde(default)]
    pub unbound: bool,
}

impl Parameter {
    /// Create a parameter with no annotations.
    pub fn new(ty: impl Into<TypeRef>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            annotations: Vec::new(),
            unbound: false,
        }
    }

    /// Append one raw annotation.
    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    /// Set the unbound marker.
    pub fn with_unbound(mut self, unbound: bool) -> Self {
        self.unbound = unbound;
        self
    }

    /// Space-joined annotation text, empty when there are none.
    pub fn annotation_text(&self) -> String {
        self.annotations.join(" ")
    }

    /// The parameter as it reads in a signature, annotations first.
    pub fn rendered(&self) -> String {
        if self.annotations.is_empty() {
            format!("{} {}", self.ty, self.name)
        } else {
            format!("{} {} {}", self.annotation_text(), self.ty, self.name)
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.rendered() == other.rendered()
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rendered().hash(state);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered())
    }
}

/// One declared method of the target type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Method {
    /// Declaration modifiers in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,

    /// Method name.
    pub name: String,

    /// Return type, `void` included.
    pub return_type: TypeRef,

    /// Formal parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Declared `throws` list in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thrown_types: Vec<TypeRef>,
}

impl Method {
    /// Create a method with the given name and return type.
    pub fn new(name: impl Into<String>, return_type: impl Into<TypeRef>) -> Self {
        Self {
            modifiers: Vec::new(),
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
            thrown_types: Vec::new(),
        }
    }

    /// Append one modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Append one parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append one thrown type.
    pub fn with_thrown_type(mut self, thrown: impl Into<TypeRef>) -> Self {
        self.thrown_types.push(thrown.into());
        self
    }
}

/// One declared constructor of the target type.
///
/// A degenerate [`Method`] without name, return type, or modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constructor {
    /// Formal parameters in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<Parameter>,

    /// Declared `throws` list in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thrown_types: Vec<TypeRef>,
}

impl Constructor {
    /// Create an empty constructor signature.
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
            thrown_types: Vec::new(),
        }
    }

    /// Append one parameter.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append one thrown type.
    pub fn with_thrown_type(mut self, thrown: impl Into<TypeRef>) -> Self {
        self.thrown_types.push(thrown.into());
        self
    }
}

impl Default for Constructor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural_on_rendered_text() {
        let a = Parameter::new("String", "name");
        let b = Parameter::new("String", "name");
        let c = Parameter::new("String", "title");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn annotations_participate_in_equality() {
        let plain = Parameter::new("int", "count");
        let deprecated = Parameter::new("int", "count").with_annotation("@Deprecated");
        assert_ne!(plain, deprecated);
        assert_eq!(deprecated.rendered(), "@Deprecated int count");
    }

    #[test]
    fn unbound_marker_does_not_affect_equality() {
        let bound = Parameter::new("String", "name");
        let unbound = Parameter::new("String", "name").with_unbound(true);
        assert_eq!(bound, unbound);
    }

    #[test]
    fn equal_parameters_hash_alike() {
        use std::collections::HashSet;

        let mut seen = HashSet::new();
        seen.insert(Parameter::new("String", "name"));
        assert!(seen.contains(&Parameter::new("String", "name").with_unbound(true)));
    }

    #[test]
    fn methods_build_incrementally() {
        let method = Method::new("setName", "void")
            .with_modifier(Modifier::Public)
            .with_parameter(Parameter::new("String", "name"))
            .with_thrown_type("java.io.IOException");
        assert_eq!(method.modifiers, vec![Modifier::Public]);
        assert_eq!(method.parameters.len(), 1);
        assert_eq!(method.thrown_types[0].as_str(), "java.io.IOException");
    }

    #[test]
    fn members_round_trip_through_serde() {
        let ctor = Constructor::new()
            .with_parameter(Parameter::new("String", "name").with_unbound(true))
            .with_thrown_type("java.io.IOException");
        let json = serde_json::to_string(&ctor).unwrap();
        let back: Constructor = serde_json::from_str(&json).unwrap();
        assert_eq!(ctor, back);
        assert!(back.parameters[0].unbound);
    }
}
