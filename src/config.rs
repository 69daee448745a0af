//! Field construction requests.
//!
//! A [`FieldSpec`] is the serializable form of "construct GF(p^n)": the
//! characteristic, the extension degree and the way candidate moduli are
//! generated.  Front ends can keep one in a settings file and hand it to
//! [`GaloisField::from_spec`](crate::GaloisField::from_spec).

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::field::PrimeField;
use crate::irreducible::validate_degree;

/// Order in which the finder visits candidate moduli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Exhaustive enumeration of monic candidates in counting order.
    #[default]
    Sequential,
    /// Seeded random monic candidates, falling back to the exhaustive
    /// enumeration if the random draws run out.
    Randomized {
        /// Seed for the candidate stream.
        seed: u64,
    },
}

/// Parameters of a field construction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Characteristic `p`.
    pub prime: u64,
    /// Extension degree `n`.
    pub degree: usize,
    /// Candidate generation strategy.
    #[serde(default)]
    pub strategy: SearchStrategy,
}

impl FieldSpec {
    /// Creates a request for GF(p^n) with the sequential strategy.
    pub fn new(prime: u64, degree: usize) -> Self {
        Self {
            prime,
            degree,
            strategy: SearchStrategy::default(),
        }
    }

    /// Replaces the search strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Checks that `prime` and `degree` are within the supported range.
    pub fn validate(&self) -> Result<()> {
        PrimeField::new(self.prime)?;
        validate_degree(self.degree)
    }

    /// Parses a request from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the request as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
