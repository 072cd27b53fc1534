//! Turns host-supplied structural models into validated generator input.
//!
//! Two concerns live here. First, control-annotation handling: annotations
//! under the host's configuration namespace are consumed (the unbound
//! marker) and stripped, so they are never echoed into generated
//! signatures. Second, mutator matching for the observable path: prefix
//! matching, subject derivation, and validation of the
//! mutator-to-accessor pairing, which the generated code relies on.

use convert_case::{Case, Casing};

use crate::error::ExtractError;
use crate::model::{Constructor, Method, Parameter, TypeModel, TypeRef};

/// Simple name of the parameter annotation marking a value as unbound.
const UNBOUND_MARKER: &str = "Unbound";

/// A mutator resolved against its paired accessor.
///
/// Built at extraction time so generators work from a declared pairing
/// rather than re-deriving names by convention mid-emission.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchedProperty {
    /// The matched mutator, signature unchanged.
    pub mutator: Method,

    /// Mutator name with its matched prefix stripped, e.g. `Name`.
    pub subject: String,

    /// Name of the zero-parameter accessor paired with the mutator.
    pub accessor: String,

    /// Type of the watched value (the mutator's single parameter).
    pub value_type: TypeRef,
}

impl WatchedProperty {
    /// Listener-list field name, e.g. `nameListeners`.
    pub fn field_name(&self) -> String {
        format!("{}Listeners", self.subject.to_case(Case::Camel))
    }

    /// Nested listener interface name, e.g. `NameListener`.
    pub fn interface_name(&self) -> String {
        format!("{}Listener", self.subject)
    }

    /// Callback method name on the listener interface, e.g. `nameChanged`.
    pub fn callback_name(&self) -> String {
        format!("{}Changed", self.subject.to_case(Case::Camel))
    }

    /// Private notifier method name, e.g. `fireNameListener`.
    pub fn fire_method_name(&self) -> String {
        format!("fire{}Listener", self.subject)
    }

    /// Registration method name, e.g. `addNameListener`.
    pub fn add_method_name(&self) -> String {
        format!("add{}Listener", self.subject)
    }

    /// Deregistration method name, e.g. `removeNameListener`.
    pub fn remove_method_name(&self) -> String {
        format!("remove{}Listener", self.subject)
    }
}

/// Filters control annotations and resolves watched mutators.
#[derive(Debug, Clone)]
pub struct Extractor {
    namespace: String,
}

impl Extractor {
    /// Create an extractor for the given control-annotation namespace,
    /// e.g. `com.example.annotations`.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// The control-annotation namespace this extractor strips.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The type's constructors with control annotations consumed: unbound
    /// markers set the parameter flag, and no control annotation survives
    /// into the cleaned parameter list.
    pub fn constructors(&self, model: &TypeModel) -> Vec<Constructor> {
        model
            .constructors
            .iter()
            .map(|constructor| Constructor {
                parameters: constructor
                    .parameters
                    .iter()
                    .map(|parameter| self.clean_parameter(parameter))
                    .collect(),
                thrown_types: constructor.thrown_types.clone(),
            })
            .collect()
    }

    /// Prefix-matched mutators resolved into [`WatchedProperty`] records.
    ///
    /// The first matching prefix in configuration order wins, so a method
    /// is wrapped at most once. Each match is validated: exactly one
    /// parameter, a non-empty subject, and an existing zero-parameter
    /// accessor named `get<Subject>`.
    pub fn watched_properties(
        &self,
        model: &TypeModel,
        prefixes: &[String],
    ) -> Result<Vec<WatchedProperty>, ExtractError> {
        let mut properties = Vec::new();
        for method in &model.methods {
            let Some(prefix) = prefixes
                .iter()
                .find(|prefix| method.name.starts_with(prefix.as_str()))
            else {
                continue;
            };

            let subject = method.name[prefix.len()..].to_string();
            if subject.is_empty() {
                return Err(ExtractError::EmptySubject {
                    method: method.name.clone(),
                });
            }
            if method.parameters.len() != 1 {
                return Err(ExtractError::MutatorArity {
                    method: method.name.clone(),
                    found: method.parameters.len(),
                });
            }

            let accessor = format!("get{subject}");
            if model.accessor(&accessor).is_none() {
                return Err(ExtractError::MissingAccessor {
                    mutator: method.name.clone(),
                    expected: accessor,
                });
            }

            let value_type = method.parameters[0].ty.clone();
            properties.push(WatchedProperty {
                mutator: method.clone(),
                subject,
                accessor,
                value_type,
            });
        }
        Ok(properties)
    }

    fn clean_parameter(&self, parameter: &Parameter) -> Parameter {
        let mut unbound = parameter.unbound;
        let mut kept = Vec::new();
        for annotation in &parameter.annotations {
            let path = annotation_path(annotation);
            if self.is_control(path) {
                if simple_name(path) == UNBOUND_MARKER {
                    unbound = true;
                }
            } else {
                kept.push(annotation.clone());
            }
        }
        Parameter {
            ty: parameter.ty.clone(),
            name: parameter.name.clone(),
            annotations: kept,
            unbound,
        }
    }

    fn is_control(&self, path: &str) -> bool {
        path == self.namespace
            || (path.starts_with(&self.namespace)
                && path[self.namespace.len()..].starts_with('.'))
    }
}

/// Annotation type path without the leading `@` or any argument list.
fn annotation_path(annotation: &str) -> &str {
    let path = annotation.strip_prefix('@').unwrap_or(annotation);
    match path.find('(') {
        Some(open) => &path[..open],
        None => path,
    }
}

fn simple_name(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
