//! Error types for extraction, emission, and generation.
//!
//! Each layer of the crate has its own error enum; `GenerateError` is the
//! umbrella type a whole generation unit fails with. All of them are plain
//! data and render a human-readable message suitable for host diagnostics.

use thiserror::Error;

/// Errors raised while validating a structural model for generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// A prefix-matched mutator did not take exactly one parameter.
    #[error("mutator '{method}' must take exactly one parameter, found {found}")]
    MutatorArity { method: String, found: usize },

    /// The accessor derived from a mutator's subject does not exist.
    #[error("mutator '{mutator}' has no zero-parameter accessor '{expected}'")]
    MissingAccessor { mutator: String, expected: String },

    /// Stripping the matched prefix left nothing to derive names from.
    #[error("mutator '{method}' has no subject after its prefix is stripped")]
    EmptySubject { method: String },
}

/// Errors raised by [`SourceWriter`](crate::writer::SourceWriter).
///
/// Protocol violations are reported instead of ever emitting malformed
/// source text.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An operation was called while the wrong scope was open.
    #[error("'{operation}' requires {expected}, found {found}")]
    Protocol {
        operation: &'static str,
        expected: &'static str,
        found: String,
    },

    /// The writer was finished with start/end pairs still unbalanced.
    #[error("source finished with {depth} unclosed scope(s)")]
    UnclosedScopes { depth: usize },
}

/// Any failure while generating one companion source file.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

impl From<std::io::Error> for GenerateError {
    fn from(err: std::io::Error) -> Self {
        GenerateError::Emit(EmitError::Io(err))
    }
}

/// Result alias for writer operations.
pub type EmitResult<T> = Result<T, EmitError>;

/// Result alias for whole-unit generation.
pub type GenerateResult<T> = Result<T, GenerateError>;
