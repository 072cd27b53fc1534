//! # javagen
//!
//! A compile-time companion-source generator core for Java. A host
//! annotation-processing toolchain inspects annotated classes and hands
//! this crate a structural description of each one ([`TypeModel`]); the
//! crate renders companion source files:
//!
//! - **factories** ([`FactoryGenerator`]) wrap a type's constructors,
//!   partitioning parameters into values bound once at factory construction
//!   and values supplied per creation call;
//! - **observable models** ([`ObservableGenerator`]) subclass a type,
//!   intercept its prefix-matched setters, capture before/after values, and
//!   fire typed listener interfaces.
//!
//! The crate has no CLI, no network surface, and no persisted state: its
//! entire external interface is the [`processor`] seam the host drives.
//!
//! ## Example
//!
//! ```
//! use javagen::generator::{FactoryGenerator, FactoryOptions};
//! use javagen::model::{Constructor, Parameter, TypeModel};
//! use javagen::processor::{MemoryDiagnostics, MemoryFiler, Processor};
//!
//! let model = TypeModel::new("com.example", "Widget").with_constructor(
//!     Constructor::new()
//!         .with_parameter(Parameter::new("String", "name"))
//!         .with_parameter(Parameter::new("int", "count").with_unbound(true)),
//! );
//!
//! let processor = Processor::new(FactoryGenerator::new("com.example.annotations"));
//! let mut filer = MemoryFiler::new();
//! let mut diagnostics = MemoryDiagnostics::new();
//!
//! let written = processor.process(
//!     &[(model, FactoryOptions::default())],
//!     &mut filer,
//!     &mut diagnostics,
//! );
//!
//! assert_eq!(written, 1);
//! let source = filer.source("com.example.WidgetFactory").unwrap();
//! assert!(source.contains("private final String name;"));
//! assert!(source.contains("public Widget getWidget("));
//! ```

pub mod error;
pub mod extract;
pub mod generator;
pub mod model;
pub mod processor;
pub mod writer;

pub use error::{EmitError, EmitResult, ExtractError, GenerateError, GenerateResult};
pub use extract::{Extractor, WatchedProperty};
pub use generator::{
    FactoryGenerator, FactoryOptions, Generator, ObservableGenerator, ObservableOptions,
};
pub use model::{Constructor, Method, Modifier, Parameter, TypeModel, TypeRef};
pub use processor::{
    Diagnostic, Diagnostics, DirectoryFiler, Filer, MemoryDiagnostics, MemoryFiler, Processor,
    Severity, TracingDiagnostics,
};
pub use writer::{IndentStyle, LineEnding, SourceWriter};
