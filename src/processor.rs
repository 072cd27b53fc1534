//! The host-facing seam: file creation, diagnostics, and the per-round
//! driver.
//!
//! The host annotation-processing toolchain owns discovery, configuration
//! resolution, and the real filesystem; this module defines the two
//! capabilities it must provide ([`Filer`] and [`Diagnostics`]) and a
//! [`Processor`] that drives one generator across a round of annotated
//! types. Units are independent: a failed type is reported and skipped, and
//! every other type in the round is still processed.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::GenerateResult;
use crate::generator::Generator;
use crate::model::TypeModel;

/// Diagnostic severity, mirroring the host compiler's kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        f.write_str(text)
    }
}

/// Reporting capability for compiler-level diagnostics.
pub trait Diagnostics {
    /// Report one message, optionally tied to the originating element
    /// (a qualified type name).
    fn report(&mut self, severity: Severity, message: &str, element: Option<&str>);
}

/// One collected diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub element: Option<String>,
}

/// Collects diagnostics in memory; the test and dry-run adapter.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
    messages: Vec<Diagnostic>,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every diagnostic reported so far, in order.
    pub fn messages(&self) -> &[Diagnostic] {
        &self.messages
    }

    /// The error-severity diagnostics reported so far.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

impl Diagnostics for MemoryDiagnostics {
    fn report(&mut self, severity: Severity, message: &str, element: Option<&str>) {
        self.messages.push(Diagnostic {
            severity,
            message: message.to_string(),
            element: element.map(str::to_string),
        });
    }
}

/// Forwards diagnostics to the `tracing` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&mut self, severity: Severity, message: &str, element: Option<&str>) {
        let element = element.unwrap_or("<unknown>");
        match severity {
            Severity::Error => tracing::error!(element, "{message}"),
            Severity::Warning => tracing::warn!(element, "{message}"),
            Severity::Note => tracing::info!(element, "{message}"),
        }
    }
}

/// File-creation capability keyed by fully qualified output name,
/// e.g. `com.example.WidgetFactory`.
pub trait Filer {
    /// Create the named source file and return its writable stream.
    ///
    /// Creating the same name twice in one round is a collision and fails
    /// with [`io::ErrorKind::AlreadyExists`].
    fn create(&mut self, qualified_name: &str) -> io::Result<Box<dyn Write + '_>>;
}

/// In-memory filer for tests and dry runs; detects name collisions.
#[derive(Debug, Default)]
pub struct MemoryFiler {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemoryFiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The generated source for `qualified_name`, if valid UTF-8.
    pub fn source(&self, qualified_name: &str) -> Option<&str> {
        self.files
            .get(qualified_name)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Qualified names of every created file, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of created files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filer for MemoryFiler {
    fn create(&mut self, qualified_name: &str) -> io::Result<Box<dyn Write + '_>> {
        match self.files.entry(qualified_name.to_string()) {
            Entry::Occupied(_) => Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{qualified_name}' already exists"),
            )),
            Entry::Vacant(slot) => Ok(Box::new(slot.insert(Vec::new()))),
        }
    }
}

/// Writes generated sources under a root directory as
/// `<package path>/<Name>.java`.
#[derive(Debug, Clone)]
pub struct DirectoryFiler {
    root: PathBuf,
}

impl DirectoryFiler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path for a qualified output name.
    pub fn path_for(&self, qualified_name: &str) -> PathBuf {
        output_path(&self.root, qualified_name)
    }
}

impl Filer for DirectoryFiler {
    fn create(&mut self, qualified_name: &str) -> io::Result<Box<dyn Write + '_>> {
        let path = self.path_for(qualified_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("'{}' already exists", path.display()),
            ));
        }
        Ok(Box::new(fs::File::create(path)?))
    }
}

/// `com.example.WidgetFactory` → `<root>/com/example/WidgetFactory.java`.
fn output_path(root: &Path, qualified_name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    match qualified_name.rsplit_once('.') {
        Some((package, name)) => {
            for segment in package.split('.') {
                path.push(segment);
            }
            path.push(format!("{name}.java"));
        }
        None => path.push(format!("{qualified_name}.java")),
    }
    path
}

/// Drives one generator across a round of annotated types.
#[derive(Debug, Clone)]
pub struct Processor<G> {
    generator: G,
}

impl<G: Generator> Processor<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// The wrapped generator.
    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Process one round of `(model, options)` units.
    ///
    /// Each unit is rendered to completion before the next begins. A failed
    /// unit is reported through `diagnostics` with the originating type
    /// named, and the remaining units still run. Returns the number of
    /// files written.
    pub fn process(
        &self,
        units: &[(TypeModel, G::Options)],
        filer: &mut dyn Filer,
        diagnostics: &mut dyn Diagnostics,
    ) -> usize {
        let mut written = 0;
        for (model, options) in units {
            let output = self.generator.output_name(model, options);
            tracing::debug!(
                generator = self.generator.id(),
                type_name = %model.qualified_name(),
                output = %output,
                "Processing generation unit"
            );
            match self.generate_unit(model, options, &output, filer) {
                Ok(()) => {
                    written += 1;
                    tracing::debug!(output = %output, "Wrote generated source");
                }
                Err(err) => {
                    diagnostics.report(
                        Severity::Error,
                        &format!("Unable to write {} file: {err}", self.generator.name()),
                        Some(&model.qualified_name()),
                    );
                }
            }
        }
        tracing::trace!(
            generator = self.generator.id(),
            units = units.len(),
            written,
            "Round complete"
        );
        written
    }

    fn generate_unit(
        &self,
        model: &TypeModel,
        options: &G::Options,
        output: &str,
        filer: &mut dyn Filer,
    ) -> GenerateResult<()> {
        let mut out = filer.create(output)?;
        self.generator.generate(model, options, &mut out)
    }
}
