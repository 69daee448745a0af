//! Error type shared by every layer of the engine.

use thiserror::Error;

/// Failures reported by field construction and arithmetic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The characteristic is not a prime in `[2, 101]`.
    #[error("invalid prime modulus {0}: expected a prime between 2 and 101")]
    InvalidPrime(u64),

    /// The extension degree is outside `[1, 12]`.
    #[error("unsupported extension degree {0}: expected 1 through 12")]
    UnsupportedDegree(usize),

    /// A strict constructor received a coefficient that is not reduced.
    #[error("coefficient {coefficient} is outside [0, {modulus})")]
    InvalidCoefficient {
        /// Offending coefficient.
        coefficient: u64,
        /// Prime modulus it was checked against.
        modulus: u64,
    },

    /// Division by, or inversion of, the zero polynomial or element.
    #[error("division by zero")]
    DivisionByZero,

    /// Operands belong to different fields, or do not fit the field.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A caller-supplied field modulus is not irreducible.
    #[error("reducible modulus: {0}")]
    ReducibleModulus(String),

    /// The field modulus broke an algebraic guarantee during arithmetic.
    #[error("internal invariant violated: {0}")]
    InternalInvariantViolation(String),

    /// An operation name did not match any supported operation.
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    /// Field construction was cancelled by the caller.
    #[error("field construction cancelled")]
    Cancelled,

    /// A JSON configuration or descriptor could not be (de)serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FieldError {
    fn from(err: serde_json::Error) -> Self {
        FieldError::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FieldError>;
