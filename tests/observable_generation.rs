//! End-to-end observable-model generation through the processor seam.
//!
//! Mirrors the factory integration tests: full rounds through `Processor`
//! with the in-memory adapters, `contains` assertions on the listener
//! plumbing, and LF-rendered snapshots of complete files.

use javagen::generator::{ObservableGenerator, ObservableOptions};
use javagen::model::{Constructor, Method, Modifier, Parameter, TypeModel};
use javagen::processor::{MemoryDiagnostics, MemoryFiler, Processor};
use javagen::writer::LineEnding;

fn lf_processor() -> Processor<ObservableGenerator> {
    Processor::new(
        ObservableGenerator::new("com.example.annotations").with_line_ending(LineEnding::Lf),
    )
}

/// `Model(String string)` with `setString(String)` / `getString()`.
fn string_model() -> TypeModel {
    TypeModel::new("com.example", "Model")
        .with_constructor(Constructor::new().with_parameter(Parameter::new("String", "string")))
        .with_method(
            Method::new("setString", "void")
                .with_modifier(Modifier::Public)
                .with_parameter(Parameter::new("String", "value")),
        )
        .with_method(Method::new("getString", "String"))
}

// =============================================================================
// Listener Wiring
// =============================================================================

#[test]
fn test_wrapped_mutator_fires_old_and_new_values() {
    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    let written = processor.process(
        &[(string_model(), ObservableOptions::default())],
        &mut filer,
        &mut diagnostics,
    );

    assert_eq!(written, 1);
    assert!(diagnostics.messages().is_empty());

    let source = filer.source("com.example.ObservableModel").unwrap();

    // Old value is read through the paired accessor before delegation, the
    // new one after, and both reach the fire method.
    assert!(source.contains(
        "    public void setString(\n\
         \x20           final String value) {\n\
         \x20       final String oldValue = getString();\n\
         \x20       super.setString(value);\n\
         \x20       final String newValue = getString();\n\
         \x20       fireStringListener(oldValue, newValue);\n\
         \x20   }\n"
    ));

    // Registration methods mutate the listener list.
    assert!(source.contains("stringListeners.add(listener);"));
    assert!(source.contains("stringListeners.remove(listener);"));

    // The callback interface carries both values.
    assert!(source.contains(
        "        void stringChanged(\n\
         \x20               String oldValue,\n\
         \x20               String newValue);"
    ));
}

#[test]
fn test_disabled_old_value_fires_only_the_new_one() {
    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    processor.process(
        &[(string_model(), ObservableOptions::default().with_old_value(false))],
        &mut filer,
        &mut diagnostics,
    );

    let source = filer.source("com.example.ObservableModel").unwrap();
    assert!(!source.contains("oldValue"));
    assert!(source.contains("        fireStringListener(newValue);"));
    assert!(source.contains("listener.stringChanged(newValue);"));
}

#[test]
fn snapshot_observable_model() {
    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    processor.process(
        &[(string_model(), ObservableOptions::default())],
        &mut filer,
        &mut diagnostics,
    );

    let source = filer.source("com.example.ObservableModel").unwrap();
    insta::assert_snapshot!("observable_model", source.trim_end());
}

// =============================================================================
// Multiple Watched Properties
// =============================================================================

#[test]
fn test_every_constructor_seeds_every_listener_list() {
    let model = TypeModel::new("com.example", "Account")
        .with_constructor(Constructor::new())
        .with_constructor(Constructor::new().with_parameter(Parameter::new("String", "owner")))
        .with_method(
            Method::new("setOwner", "void")
                .with_modifier(Modifier::Public)
                .with_parameter(Parameter::new("String", "owner")),
        )
        .with_method(Method::new("getOwner", "String"))
        .with_method(
            Method::new("setBalance", "void")
                .with_modifier(Modifier::Public)
                .with_parameter(Parameter::new("long", "balance")),
        )
        .with_method(Method::new("getBalance", "long"));

    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    processor.process(
        &[(model, ObservableOptions::default())],
        &mut filer,
        &mut diagnostics,
    );

    let source = filer.source("com.example.ObservableAccount").unwrap();

    assert_eq!(
        source
            .matches("this.ownerListeners = new java.util.ArrayList<>();")
            .count(),
        2
    );
    assert_eq!(
        source
            .matches("this.balanceListeners = new java.util.ArrayList<>();")
            .count(),
        2
    );
    assert!(source.contains("public interface OwnerListener {"));
    assert!(source.contains("public interface BalanceListener {"));
}

// =============================================================================
// Validation and Fault Isolation
// =============================================================================

#[test]
fn test_missing_accessor_fails_the_unit_with_a_diagnostic() {
    let broken = TypeModel::new("com.example", "Broken").with_method(
        Method::new("setName", "void").with_parameter(Parameter::new("String", "name")),
    );

    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    let written = processor.process(
        &[
            (broken, ObservableOptions::default()),
            (string_model(), ObservableOptions::default()),
        ],
        &mut filer,
        &mut diagnostics,
    );

    // The broken unit is reported; the healthy one still generates.
    assert_eq!(written, 1);
    assert!(filer.source("com.example.ObservableModel").is_some());

    let errors: Vec<_> = diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0]
        .message
        .starts_with("Unable to write observable model file:"));
    assert!(errors[0].message.contains("getName"));
    assert_eq!(errors[0].element.as_deref(), Some("com.example.Broken"));
}

#[test]
fn test_multi_parameter_mutators_are_rejected() {
    let model = TypeModel::new("com.example", "Shape").with_method(
        Method::new("setBounds", "void")
            .with_parameter(Parameter::new("int", "x"))
            .with_parameter(Parameter::new("int", "y")),
    );

    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    let written = processor.process(
        &[(model, ObservableOptions::default())],
        &mut filer,
        &mut diagnostics,
    );

    assert_eq!(written, 0);
    let errors: Vec<_> = diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("exactly one parameter"));
}

// =============================================================================
// Host-Facing Configuration
// =============================================================================

#[test]
fn test_options_deserialize_with_defaults() {
    let options: ObservableOptions = serde_json::from_str(r#"{"name": "WatchedModel"}"#).unwrap();
    assert_eq!(options.name.as_deref(), Some("WatchedModel"));
    assert_eq!(options.prefixes, vec!["set".to_string()]);
    assert!(options.old_value);
}

#[test]
fn test_custom_prefixes_drive_subject_names() {
    let model = TypeModel::new("com.example", "Counter")
        .with_method(
            Method::new("updateTotal", "void")
                .with_modifier(Modifier::Public)
                .with_parameter(Parameter::new("int", "total")),
        )
        .with_method(Method::new("getTotal", "int"));
    let options = ObservableOptions::default().with_prefixes(vec!["update".to_string()]);

    let processor = lf_processor();
    let mut filer = MemoryFiler::new();
    let mut diagnostics = MemoryDiagnostics::new();

    processor.process(&[(model, options)], &mut filer, &mut diagnostics);

    let source = filer.source("com.example.ObservableCounter").unwrap();
    assert!(source.contains("public void updateTotal("));
    assert!(source.contains("final int oldValue = getTotal();"));
    assert!(source.contains("public interface TotalListener {"));
    assert!(source.contains("listener.totalChanged(oldValue, newValue);"));
}
