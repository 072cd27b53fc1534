//! Java type references and declaration modifiers.
//!
//! Generated code never interprets Java types beyond their rendered text;
//! [`TypeRef`] is therefore a thin wrapper over the text the host supplies,
//! with just enough knowledge to handle provider indirection.

use std::fmt;

use serde::{Deserialize, Serialize};

const PROVIDER_TYPE: &str = "javax.inject.Provider";

/// Textual reference to a Java type, e.g. `java.util.List<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    /// Create a type reference from its source text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The type text as supplied by the host.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this type already denotes a `javax.inject.Provider`.
    pub fn is_provider(&self) -> bool {
        self.0 == PROVIDER_TYPE || self.0.starts_with("javax.inject.Provider<")
    }

    /// Wrap in `javax.inject.Provider<...>`.
    ///
    /// Wrapping a type that is already a provider is a no-op; bound values
    /// are never double-wrapped.
    pub fn provider_wrapped(&self) -> TypeRef {
        if self.is_provider() {
            self.clone()
        } else {
            TypeRef(format!("{}<{}>", PROVIDER_TYPE, self.0))
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        TypeRef::new(text)
    }
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        TypeRef::new(text)
    }
}

/// Java declaration modifiers in their canonical spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Synchronized,
}

impl Modifier {
    /// The modifier keyword as it appears in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Abstract => "abstract",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Synchronized => "synchronized",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
