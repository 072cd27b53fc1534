//! Factory generation: wraps a type's constructors in a companion class
//! that binds shared parameters once and accepts the rest per call.
//!
//! The partition is computed over all constructors at once: a parameter is
//! bound the first time it is seen, by rendered-text identity, unless it
//! carries the unbound marker. Every source constructor then gets one
//! creation method taking only its unbound parameters.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::GenerateResult;
use crate::extract::Extractor;
use crate::generator::Generator;
use crate::model::{Constructor, Modifier, Parameter, TypeModel, TypeRef};
use crate::writer::{IndentStyle, LineEnding, SourceWriter};

/// Per-type factory configuration resolved by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryOptions {
    /// Mark the bound constructor with `@javax.inject.Inject`.
    #[serde(default)]
    pub inject: bool,

    /// Mark the factory class with `@javax.inject.Singleton`.
    #[serde(default)]
    pub singleton: bool,

    /// Store bound values behind `javax.inject.Provider` indirection.
    #[serde(default)]
    pub providers: bool,

    /// Explicit factory class name; defaults to `<TypeName>Factory`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Modifiers on the factory class declaration.
    #[serde(default)]
    pub class_modifiers: Vec<Modifier>,

    /// Modifiers on each creation method.
    #[serde(default = "default_method_modifiers")]
    pub method_modifiers: Vec<Modifier>,
}

fn default_method_modifiers() -> Vec<Modifier> {
    vec![Modifier::Public]
}

impl Default for FactoryOptions {
    fn default() -> Self {
        Self {
            inject: false,
            singleton: false,
            providers: false,
            name: None,
            class_modifiers: Vec::new(),
            method_modifiers: default_method_modifiers(),
        }
    }
}

impl FactoryOptions {
    /// Request `@javax.inject.Inject` on the bound constructor.
    pub fn with_inject(mut self, inject: bool) -> Self {
        self.inject = inject;
        self
    }

    /// Request `@javax.inject.Singleton` on the factory class.
    pub fn with_singleton(mut self, singleton: bool) -> Self {
        self.singleton = singleton;
        self
    }

    /// Request provider indirection for bound values.
    pub fn with_providers(mut self, providers: bool) -> Self {
        self.providers = providers;
        self
    }

    /// Use an explicit factory class name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append one factory class modifier.
    pub fn with_class_modifier(mut self, modifier: Modifier) -> Self {
        self.class_modifiers.push(modifier);
        self
    }

    /// Replace the creation-method modifiers.
    pub fn with_method_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.method_modifiers = modifiers;
        self
    }
}

/// Bound parameters across all constructors: first-seen order,
/// de-duplicated by rendered-text identity, unbound-marked parameters
/// excluded.
pub fn bound_parameters(constructors: &[Constructor]) -> Vec<Parameter> {
    let mut bound: Vec<Parameter> = Vec::new();
    for constructor in constructors {
        for parameter in &constructor.parameters {
            if parameter.unbound {
                continue;
            }
            if !bound.contains(parameter) {
                bound.push(parameter.clone());
            }
        }
    }
    bound
}

/// One constructor's parameters minus the bound set, order preserved.
/// These become the matching creation method's signature.
pub fn unbound_parameters<'a>(
    constructor: &'a Constructor,
    bound: &[Parameter],
) -> Vec<&'a Parameter> {
    constructor
        .parameters
        .iter()
        .filter(|parameter| !bound.contains(parameter))
        .collect()
}

/// Generates one factory class per annotated type.
#[derive(Debug, Clone)]
pub struct FactoryGenerator {
    extractor: Extractor,
    provenance: String,
    indent_style: IndentStyle,
    line_ending: LineEnding,
}

impl FactoryGenerator {
    /// Provenance recorded when neither the generator nor the model
    /// overrides it.
    pub const DEFAULT_PROVENANCE: &'static str = "javagen.FactoryGenerator";

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

fn class_name(model: &TypeModel, options: &FactoryOptions) -> String {
    options
        .name
        .clone()
        .unwrap_or_else(|| format!("{}Factory", model.name))
}

fn bound_field_type(parameter: &Parameter, options: &FactoryOptions) -> TypeRef {
    if options.providers {
        parameter.ty.provider_wrapped()
    } else {
        parameter.ty.clone()
    }
}

/// Expression passed to the target constructor for one original parameter:
/// the bound field dereferenced through its provider when we wrapped it,
/// the plain name otherwise.
fn argument_expression(
    parameter: &Parameter,
    bound: &[Parameter],
    options: &FactoryOptions,
) -> String {
    if options.providers && !parameter.ty.is_provider() && bound.contains(parameter) {
        format!("{}.get()", parameter.name)
    } else {
        parameter.name.clone()
    }
}

impl Generator for FactoryGenerator {
    type Options = FactoryOptions;

    fn id(&self) -> &'static str {
        "factory"
    }

    fn name(&self) -> &'static str {
        "factory"
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
        let bound = bound_parameters(&constructors);
        let class = class_name(model, options);
        let provenance = self.effective_provenance(model);

        tracing::debug!(
            type_name = %model.qualified_name(),
            factory = %class,
            constructors = constructors.len(),
            bound = bound.len(),
            "Generating factory"
        );

        writer.package_declaration(&model.package)?;
        if options.singleton {
            writer.annotation("@javax.inject.Singleton")?;
        }
        writer.begin_class(&class, provenance, &options.class_modifiers)?;
        writer.begin_class_body()?;

        for parameter in &bound {
            let ty = bound_field_type(parameter, options);
            writer.field(&ty, &parameter.name, &[Modifier::Private, Modifier::Final])?;
        }

        if options.inject {
            writer.annotation("@javax.inject.Inject")?;
        }
        writer.begin_constructor(&class, &[Modifier::Public])?;
        for parameter in &bound {
            let ty = bound_field_type(parameter, options);
            writer.parameter(
                &parameter.annotation_text(),
                &ty,
                &parameter.name,
                &[Modifier::Final],
            )?;
        }
        writer.end_signature(&[])?;
        for parameter in &bound {
            writer.field_assignment(&parameter.name, &parameter.name)?;
        }
        writer.end_block()?;

        for constructor in &constructors {
            writer.begin_method(
                &TypeRef::new(model.name.clone()),
                &format!("get{}", model.name),
                &options.method_modifiers,
            )?;
            for parameter in unbound_parameters(constructor, &bound) {
                writer.parameter(
                    &parameter.annotation_text(),
                    &parameter.ty,
                    &parameter.name,
                    &[Modifier::Final],
                )?;
            }
            writer.end_signature(&constructor.thrown_types)?;

            writer.begin_return()?;
            let arguments: Vec<String> = constructor
                .parameters
                .iter()
                .map(|parameter| argument_expression(parameter, &bound, options))
                .collect();
            let argument_refs: Vec<&str> = arguments.iter().map(String::as_str).collect();
            writer.new_instance(&model.name, &argument_refs)?;
            writer.end_statement()?;
            writer.end_block()?;
        }

        writer.end_class()?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(model: &TypeModel, options: &FactoryOptions) -> String {
        let generator =
            FactoryGenerator::new("com.example.annotations").with_line_ending(LineEnding::Lf);
        let mut buffer = Vec::new();
        generator.generate(model, options, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn two_constructor_model() -> TypeModel {
        TypeModel::new("com.example", "T")
            .with_constructor(
                Constructor::new()
                    .with_parameter(Parameter::new("String", "a"))
                    .with_parameter(Parameter::new("String", "b"))
                    .with_parameter(Parameter::new("List<String>", "items").with_unbound(true))
                    .with_parameter(Parameter::new("int", "n").with_unbound(true)),
            )
            .with_constructor(
                Constructor::new()
                    .with_parameter(Parameter::new("String", "a"))
                    .with_parameter(Parameter::new("String", "b"))
                    .with_parameter(Parameter::new("String", "c").with_unbound(true)),
            )
    }

    #[test]
    fn bound_set_keeps_first_seen_order_and_dedups() {
        let model = two_constructor_model();
        let bound = bound_parameters(&model.constructors);
        let names: Vec<&str> = bound.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn unbound_marked_parameters_never_bind() {
        let model = two_constructor_model();
        let bound = bound_parameters(&model.constructors);
        assert!(!bound
            .iter()
            .any(|p| p.name == "items" || p.name == "n" || p.name == "c"));
    }

    #[test]
    fn creation_parameters_preserve_constructor_order() {
        let model = two_constructor_model();
        let bound = bound_parameters(&model.constructors);

        let first: Vec<&str> = unbound_parameters(&model.constructors[0], &bound)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(first, vec!["items", "n"]);

        let second: Vec<&str> = unbound_parameters(&model.constructors[1], &bound)
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(second, vec!["c"]);
    }

    #[test]
    fn duplicate_parameters_collapse_across_constructors() {
        let constructors = vec![
            Constructor::new().with_parameter(Parameter::new("String", "a")),
            Constructor::new().with_parameter(Parameter::new("String", "a")),
        ];
        assert_eq!(bound_parameters(&constructors).len(), 1);
    }

    #[test]
    fn generated_factory_has_fields_constructor_and_creation_methods() {
        let model = two_constructor_model();
        let out = render(&model, &FactoryOptions::default());

        assert!(out.contains("package com.example;"));
        assert!(out.contains("class TFactory {"));
        assert!(out.contains("    private final String a;"));
        assert!(out.contains("    private final String b;"));
        assert!(out.contains("    public TFactory("));
        assert!(out.contains("        this.a = a;"));
        assert!(out.contains("    public T getT("));
        assert!(out.contains("return new T("));
        // creation method 2 takes only the unbound parameter
        assert!(out.contains(
            "    public T getT(\n\
             \x20           final String c) {"
        ));
    }

    #[test]
    fn singleton_and_inject_markers_stack() {
        let model = two_constructor_model();
        let options = FactoryOptions::default()
            .with_singleton(true)
            .with_inject(true);
        let out = render(&model, &options);

        let singleton = out.find("@javax.inject.Singleton").unwrap();
        let class = out.find("class TFactory").unwrap();
        let inject = out.find("@javax.inject.Inject").unwrap();
        let constructor = out.find("public TFactory(").unwrap();
        assert!(singleton < class);
        assert!(class < inject);
        assert!(inject < constructor);
    }

    #[test]
    fn provider_wrapping_applies_to_bound_values_only() {
        let model = TypeModel::new("com.example", "Widget").with_constructor(
            Constructor::new()
                .with_parameter(Parameter::new("String", "name"))
                .with_parameter(Parameter::new("int", "count").with_unbound(true)),
        );
        let out = render(&model, &FactoryOptions::default().with_providers(true));

        assert!(out.contains("private final javax.inject.Provider<String> name;"));
        assert!(out.contains("name.get()"));
        // the unbound parameter stays untouched
        assert!(out.contains("final int count"));
        assert!(!out.contains("javax.inject.Provider<int>"));
        assert!(!out.contains("count.get()"));
    }

    #[test]
    fn provider_typed_parameters_are_not_double_wrapped() {
        let model = TypeModel::new("com.example", "Widget").with_constructor(
            Constructor::new()
                .with_parameter(Parameter::new("javax.inject.Provider<String>", "names")),
        );
        let out = render(&model, &FactoryOptions::default().with_providers(true));

        assert!(out.contains("private final javax.inject.Provider<String> names;"));
        assert!(!out.contains("Provider<javax.inject.Provider"));
        // already a provider, so it is passed through without deref
        assert!(!out.contains("names.get()"));
    }

    #[test]
    fn zero_constructor_types_get_an_empty_factory() {
        let model = TypeModel::new("com.example", "Widget");
        let out = render(&model, &FactoryOptions::default());

        assert!(out.contains("    public WidgetFactory() {\n    }\n"));
        assert!(!out.contains("getWidget"));
    }

    #[test]
    fn explicit_name_overrides_the_derived_one() {
        let model = TypeModel::new("com.example", "Widget");
        let options = FactoryOptions::default().with_name("Widgets");
        let generator = FactoryGenerator::new("com.example.annotations");

        assert_eq!(generator.output_name(&model, &options), "com.example.Widgets");
        let out = render(&model, &options);
        assert!(out.contains("class Widgets {"));
    }

    #[test]
    fn creation_methods_carry_constructor_throws() {
        let model = TypeModel::new("com.example", "Widget").with_constructor(
            Constructor::new()
                .with_parameter(Parameter::new("String", "path"))
                .with_thrown_type("java.io.IOException"),
        );
        let out = render(&model, &FactoryOptions::default());

        assert!(out.contains(") throws\n            java.io.IOException {"));
    }

    #[test]
    fn parameter_annotations_are_echoed_in_signatures() {
        let model = TypeModel::new("com.example", "Widget").with_constructor(
            Constructor::new().with_parameter(
                Parameter::new("java.util.List<String>", "items")
                    .with_annotation("@SuppressWarnings(\"unchecked\")"),
            ),
        );
        let out = render(&model, &FactoryOptions::default());

        assert!(out.contains("final @SuppressWarnings(\"unchecked\") java.util.List<String> items"));
    }

    #[test]
    fn control_annotations_drive_binding_without_being_echoed() {
        let model = TypeModel::new("com.example", "Widget").with_constructor(
            Constructor::new()
                .with_parameter(Parameter::new("String", "name"))
                .with_parameter(
                    Parameter::new("int", "count")
                        .with_annotation("@com.example.annotations.factory.Unbound"),
                ),
        );
        let out = render(&model, &FactoryOptions::default());

        assert!(!out.contains("Unbound"));
        assert!(out.contains(
            "    public Widget getWidget(\n\
             \x20           final int count) {"
        ));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    const POOL: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

    fn arbitrary_constructors() -> impl Strategy<Value = Vec<Constructor>> {
        proptest::collection::vec(
            proptest::collection::vec((0usize..POOL.len(), proptest::bool::ANY), 0..6),
            1..4,
        )
        .prop_map(|shape| {
            shape
                .into_iter()
                .map(|params| {
                    let mut constructor = Constructor::new();
                    for (index, unbound) in params {
                        constructor = constructor.with_parameter(
                            Parameter::new("String", POOL[index]).with_unbound(unbound),
                        );
                    }
                    constructor
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_partition_is_disjoint_and_complete(constructors in arbitrary_constructors()) {
            let bound = bound_parameters(&constructors);
            for constructor in &constructors {
                let creation = unbound_parameters(constructor, &bound);
                for parameter in &constructor.parameters {
                    let in_bound = bound.contains(parameter);
                    let in_creation = creation.iter().any(|p| *p == parameter);
                    prop_assert!(in_bound != in_creation);
                }
            }
        }

        #[test]
        fn prop_bound_set_has_no_duplicates(constructors in arbitrary_constructors()) {
            let bound = bound_parameters(&constructors);
            for (index, parameter) in bound.iter().enumerate() {
                prop_assert!(!bound[index + 1..].contains(parameter));
            }
        }

        #[test]
        fn prop_bound_order_follows_first_eligible_occurrence(
            constructors in arbitrary_constructors()
        ) {
            let flattened: Vec<&Parameter> = constructors
                .iter()
                .flat_map(|c| c.parameters.iter())
                .collect();
            let bound = bound_parameters(&constructors);
            let positions: Vec<usize> = bound
                .iter()
                .map(|b| {
                    flattened
                        .iter()
                        .position(|p| !p.unbound && **p == *b)
                        .expect("bound parameter must come from some constructor")
                })
                .collect();
            prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        }

        #[test]
        fn prop_always_unbound_names_never_bind(constructors in arbitrary_constructors()) {
            let mut always_unbound: HashMap<String, bool> = HashMap::new();
            for constructor in &constructors {
                for parameter in &constructor.parameters {
                    always_unbound
                        .entry(parameter.rendered())
                        .and_modify(|flag| *flag &= parameter.unbound)
                        .or_insert(parameter.unbound);
                }
            }
            let bound = bound_parameters(&constructors);
            for (rendered, flag) in always_unbound {
                if flag {
                    prop_assert!(!bound.iter().any(|p| p.rendered() == rendered));
                }
            }
        }
    }
}
