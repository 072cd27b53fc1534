//! Structural descriptions of the Java types under generation.
//!
//! The host toolchain inspects annotated classes and describes each one as a
//! [`TypeModel`]: its constructors and methods with parameter types, names,
//! raw annotations, modifiers, and thrown types. Generators never see the
//! host compiler's own representation; this module is the entire input
//! surface.

mod member;
mod types;

pub use member::{Constructor, Method, Parameter};
pub use types::{Modifier, TypeRef};

use serde::{Deserialize, Serialize};

/// Structural description of one annotated type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeModel {
    /// Enclosing package; empty for the default package.
    pub package: String,

    /// Simple (unqualified) type name.
    pub name: String,

    /// Declared constructors in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<Constructor>,

    /// Declared methods in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<Method>,

    /// Overrides the generator's provenance string in
    /// `@javax.annotation.Generated` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
}

impl TypeModel {
    /// Describe a type by package and simple name.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            constructors: Vec::new(),
            methods: Vec::new(),
            provenance: None,
        }
    }

    /// Append one constructor.
    pub fn with_constructor(mut self, constructor: Constructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    /// Append one method.
    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.push(method);
        self
    }

    /// Record an explicit provenance string.
    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = Some(provenance.into());
        self
    }

    /// `package.Name`, or the bare name in the default package.
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.package, self.name)
        }
    }

    /// Look up a zero-parameter method by name.
    pub(crate) fn accessor(&self, name: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.parameters.is_empty())
    }
}
