//! Code generators and their shared contract.
//!
//! Each generator turns one [`TypeModel`] plus its per-type options into a
//! complete companion source file. Generators hold their rendering
//! configuration (indent style, line ending, provenance) and are reused
//! across every type in a round; per-type state never outlives a single
//! [`generate`](Generator::generate) call.

pub mod factory;
pub mod observable;

pub use factory::{FactoryGenerator, FactoryOptions};
pub use observable::{ObservableGenerator, ObservableOptions};

use std::io::Write;

use crate::error::GenerateResult;
use crate::model::TypeModel;

/// A source generator driven once per annotated type.
pub trait Generator {
    /// Per-type configuration record resolved by the host.
    type Options;

    /// Stable identifier used in logs.
    fn id(&self) -> &'static str;

    /// Human-readable name used in diagnostics, e.g. `factory`.
    fn name(&self) -> &'static str;

    /// Default provenance recorded in `@javax.annotation.Generated`.
    fn provenance(&self) -> &str;

    /// Fully qualified name of the generated source file.
    fn output_name(&self, model: &TypeModel, options: &Self::Options) -> String;

    /// Render the companion source for `model` into `out`.
    fn generate(
        &self,
        model: &TypeModel,
        options: &Self::Options,
        out: &mut dyn Write,
    ) -> GenerateResult<()>;

    /// The provenance to emit for `model`: the model's explicit override
    /// when present, this generator's default otherwise.
    fn effective_provenance<'a>(&'a self, model: &'a TypeModel) -> &'a str {
        model.provenance.as_deref().unwrap_or_else(|| self.provenance())
    }
}
