//! Observable-model generation: wraps a type's prefix-matched setters in a
//! subclass that captures before/after values and fires typed listeners.
//!
//! Every watched mutator gets an override that reads the current value
//! through its paired accessor, delegates to the superclass, re-reads, and
//! notifies a dedicated listener interface. The mutator-to-accessor pairing
//! is resolved and validated up front by the extractor, so emission never
//! derives names by convention mid-stream.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::GenerateResult;
use crate::extract::{Extractor, WatchedProperty};
use crate::generator::Generator;
use crate::model::{Modifier, TypeModel, TypeRef};
use crate::writer::{IndentStyle, LineEnding, SourceWriter};

/// Per-type observable configuration resolved by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservableOptions {
    /// Explicit subclass name; defaults to `Observable<TypeName>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Method-name prefixes identifying mutators, in match-priority order.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Pass the pre-mutation value to listeners as well as the new one.
    #[serde(default = "default_old_value")]
    pub old_value: bool,
}

fn default_prefixes() -> Vec<String> {
    vec!["set".to_string()]
}

fn default_old_value() -> bool {
    true
}

impl Default for ObservableOptions {
    fn default() -> Self {
        Self {
            name: None,
            prefixes: default_prefixes(),
            old_value: default_old_value(),
        }
    }
}

impl ObservableOptions {
    /// Use an explicit subclass name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replace the mutator prefixes.
    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Toggle old-value capture in listener callbacks.
    pub fn with_old_value(mut self, old_value: bool) -> Self {
        self.old_value = old_value;
        self
    }
}

/// Generates one observable subclass per annotated type.
#[derive(Debug, Clone)]
pub struct ObservableGenerator {
    extractor: Extractor,
    provenance: String,
    indent_style: IndentStyle,
    line_ending: LineEnding,
}

impl ObservableGenerator {
    /// Provenance recorded when neither the generator nor the model
    /// overrides it.
    pub const DEFAULT_PROVENANCE: &'static str = "javagen.ObservableModelGenerator";

    /// Create a generator stripping the given control-annotation
    /// namespace.
    pub fn new(control_namespace: impl Into<String>) -> Self {
        Self {
            extractor: Extractor::new(control_namespace),
            provenance: Self::DEFAULT_PROVENANCE.to_string(),
            indent_style: IndentStyle::default(),
            line_ending: LineEnding::default(),
        }
    }

    /// Override the default provenance string.
    pub fn with_provenance(mut self, provenance: impl Into<String>) -> Self {
        self.provenance = provenance.into();
        self
    }

    /// Set the indentation style of generated files.
    pub fn with_indent_style(mut self, style: IndentStyle) -> Self {
        self.indent_style = style;
        self
    }

    /// Set the line ending of generated files.
    pub fn with_line_ending(mut self, ending: LineEnding) -> Self {
        self.line_ending = ending;
        self
    }
}

fn class_name(model: &TypeModel, options: &ObservableOptions) -> String {
    options
        .name
        .clone()
        .unwrap_or_else(|| format!("Observable{}", model.name))
}

fn listener_list_type(property: &WatchedProperty) -> TypeRef {
    TypeRef::new(format!("java.util.List<{}>", property.interface_name()))
}

impl Generator for ObservableGenerator {
    type Options = ObservableOptions;

    fn id(&self) -> &'static str {
        "observable"
    }

    fn name(&self) -> &'static str {
        "observable model"
    }

    fn provenance(&self) -> &str {
        &self.provenance
    }

    fn output_name(&self, model: &TypeModel, options: &Self::Options) -> String {
        let class = class_name(model, options);
        if model.package.is_empty() {
            class
        } else {
            format!("{}.{}", model.package, class)
        }
    }

    fn generate(
        &self,
        model: &TypeModel,
        options: &Self::Options,
        out: &mut dyn Write,
    ) -> GenerateResult<()> {
        let mut writer = SourceWriter::new(out)
            .with_indent_style(self.indent_style)
            .with_line_ending(self.line_ending);

        let constructors = self.extractor.constructors(model);
        let properties = self
            .extractor
            .watched_properties(model, &options.prefixes)?;
        let class = class_name(model, options);
        let provenance = self.effective_provenance(model);

        tracing::debug!(
            type_name = %model.qualified_name(),
            observable = %class,
            constructors = constructors.len(),
            watched = properties.len(),
            "Generating observable model"
        );

        writer.package_declaration(&model.package)?;
        writer.begin_class(&class, provenance, &[])?;
        writer.extend_class(&model.qualified_name())?;
        writer.begin_class_body()?;

        for property in &properties {
            writer.field(
                &listener_list_type(property),
                &property.field_name(),
                &[Modifier::Private, Modifier::Final],
            )?;
        }

        // One override per source constructor: delegate, then seed every
        // listener list.
        for constructor in &constructors {
            writer.begin_constructor(&class, &[])?;
            for parameter in &constructor.parameters {
                writer.parameter("", &parameter.ty, &parameter.name, &[Modifier::Final])?;
            }
            writer.end_signature(&constructor.thrown_types)?;
            writer.begin_super_call()?;
            for parameter in &constructor.parameters {
                writer.argument(&parameter.name)?;
            }
            writer.end_call()?;
            for property in &properties {
                writer.field_assignment(&property.field_name(), "new java.util.ArrayList<>()")?;
            }
            writer.end_block()?;
        }

        for property in &properties {
            self.write_wrapped_mutator(&mut writer, property, options.old_value)?;
        }

        for property in &properties {
            self.write_registration(&mut writer, property, "add", &property.add_method_name())?;
            self.write_registration(
                &mut writer,
                property,
                "remove",
                &property.remove_method_name(),
            )?;
            self.write_fire_method(&mut writer, property, options.old_value)?;
        }

        for property in &properties {
            self.write_listener_interface(&mut writer, property, provenance, options.old_value)?;
        }

        writer.end_class()?;
        writer.finish()?;
        Ok(())
    }
}

impl ObservableGenerator {
    fn write_wrapped_mutator<W: Write>(
        &self,
        writer: &mut SourceWriter<W>,
        property: &WatchedProperty,
        old_value: bool,
    ) -> GenerateResult<()> {
        let mutator = &property.mutator;
        let accessor_call = format!("{}()", property.accessor);

        writer.begin_method(&mutator.return_type, &mutator.name, &mutator.modifiers)?;
        for parameter in &mutator.parameters {
            writer.parameter("", &parameter.ty, &parameter.name, &[Modifier::Final])?;
        }
        writer.end_signature(&mutator.thrown_types)?;

        if old_value {
            writer.local_declaration(
                &property.value_type,
                "oldValue",
                &accessor_call,
                &[Modifier::Final],
            )?;
        }
        writer.begin_super_method_call(&mutator.name)?;
        for parameter in &mutator.parameters {
            writer.argument(&parameter.name)?;
        }
        writer.end_call()?;
        writer.local_declaration(
            &property.value_type,
            "newValue",
            &accessor_call,
            &[Modifier::Final],
        )?;
        writer.begin_call(&property.fire_method_name())?;
        if old_value {
            writer.argument("oldValue")?;
        }
        writer.argument("newValue")?;
        writer.end_call()?;
        writer.end_block()?;
        Ok(())
    }

    fn write_registration<W: Write>(
        &self,
        writer: &mut SourceWriter<W>,
        property: &WatchedProperty,
        action: &str,
        method_name: &str,
    ) -> GenerateResult<()> {
        writer.begin_method(&TypeRef::new("void"), method_name, &[Modifier::Public])?;
        writer.parameter(
            "",
            &TypeRef::new(property.interface_name()),
            "listener",
            &[Modifier::Final],
        )?;
        writer.end_signature(&[])?;
        writer.begin_call(&format!("{}.{}", property.field_name(), action))?;
        writer.argument("listener")?;
        writer.end_call()?;
        writer.end_block()?;
        Ok(())
    }

    fn write_fire_method<W: Write>(
        &self,
        writer: &mut SourceWriter<W>,
        property: &WatchedProperty,
        old_value: bool,
    ) -> GenerateResult<()> {
        writer.begin_method(
            &TypeRef::new("void"),
            &property.fire_method_name(),
            &[Modifier::Private],
        )?;
        if old_value {
            writer.parameter("", &property.value_type, "oldValue", &[Modifier::Final])?;
        }
        writer.parameter("", &property.value_type, "newValue", &[Modifier::Final])?;
        writer.end_signature(&[])?;
        writer.begin_for_each(
            &property.interface_name(),
            "listener",
            &property.field_name(),
        )?;
        writer.begin_call(&format!("listener.{}", property.callback_name()))?;
        if old_value {
            writer.argument("oldValue")?;
        }
        writer.argument("newValue")?;
        writer.end_call()?;
        writer.end_for_each()?;
        writer.end_block()?;
        Ok(())
    }

    fn write_listener_interface<W: Write>(
        &self,
        writer: &mut SourceWriter<W>,
        property: &WatchedProperty,
        provenance: &str,
        old_value: bool,
    ) -> GenerateResult<()> {
        writer.begin_interface(&property.interface_name(), provenance, &[Modifier::Public])?;
        writer.begin_interface_body()?;
        writer.begin_method(&TypeRef::new("void"), &property.callback_name(), &[])?;
        if old_value {
            writer.parameter("", &property.value_type, "oldValue", &[])?;
        }
        writer.parameter("", &property.value_type, "newValue", &[])?;
        writer.end_signature_abstract(&[])?;
        writer.end_interface()?;
        Ok(())
    }
}
