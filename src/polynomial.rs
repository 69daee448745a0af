//! Polynomials with coefficients in Z/pZ.
//!
//! A [`ModPoly`] stores its coefficients in ascending order of degree: the
//! coefficient of `x^i` lives at index `i`.  Every constructor reduces the
//! coefficients into `[0, p)` and trims trailing zeros, so two polynomials
//! are equal exactly when their stored sequences are equal.  The zero
//! polynomial is stored as an empty sequence and has no degree.
//!
//! All arithmetic borrows its operands and returns a fresh value, which makes
//! expressions such as `a.mul(&a)` safe.

use std::fmt;

use crate::error::{FieldError, Result};
use crate::field::PrimeField;

/// A polynomial over the prime field Z/pZ.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModPoly {
    field: PrimeField,
    coeffs: Vec<u64>,
}

impl ModPoly {
    /// Builds a polynomial, reducing every coefficient modulo `p`.
    pub fn new(field: PrimeField, coeffs: &[u64]) -> Self {
        Self::from_vec(field, coeffs.iter().map(|&c| field.reduce(c)).collect())
    }

    /// Builds a polynomial from signed coefficients, e.g. `-1` becomes `p - 1`.
    pub fn from_signed(field: PrimeField, coeffs: &[i64]) -> Self {
        Self::from_vec(
            field,
            coeffs.iter().map(|&c| field.reduce_signed(c)).collect(),
        )
    }

    /// Builds a polynomial from coefficients that must already lie in `[0, p)`.
    ///
    /// Returns [`FieldError::InvalidCoefficient`] for the first coefficient
    /// that is not reduced.
    pub fn from_reduced(field: PrimeField, coeffs: &[u64]) -> Result<Self> {
        if let Some(&bad) = coeffs.iter().find(|&&c| c >= field.modulus()) {
            return Err(FieldError::InvalidCoefficient {
                coefficient: bad,
                modulus: field.modulus(),
            });
        }
        Ok(Self::from_vec(field, coeffs.to_vec()))
    }

    /// Wraps already-reduced coefficients and trims trailing zeros.
    fn from_vec(field: PrimeField, mut coeffs: Vec<u64>) -> Self {
        while coeffs.last() == Some(&0) {
            coeffs.pop();
        }
        ModPoly { field, coeffs }
    }

    /// The zero polynomial.
    pub fn zero(field: PrimeField) -> Self {
        ModPoly {
            field,
            coeffs: Vec::new(),
        }
    }

    /// The constant polynomial `1`.
    pub fn one(field: PrimeField) -> Self {
        Self::constant(field, 1)
    }

    /// The constant polynomial `c mod p`.
    pub fn constant(field: PrimeField, c: u64) -> Self {
        Self::from_vec(field, vec![field.reduce(c)])
    }

    /// The polynomial `x`.
    pub fn x(field: PrimeField) -> Self {
        Self::monomial(field, 1, 1)
    }

    /// The monomial `c·x^k`.
    pub fn monomial(field: PrimeField, c: u64, k: usize) -> Self {
        let mut coeffs = vec![0; k + 1];
        coeffs[k] = field.reduce(c);
        Self::from_vec(field, coeffs)
    }

    /// Returns the coefficient field.
    #[inline]
    pub fn field(&self) -> PrimeField {
        self.field
    }

    /// Returns the characteristic `p`.
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.field.modulus()
    }

    /// Returns the trimmed coefficients, lowest degree first.
    #[inline]
    pub fn coefficients(&self) -> &[u64] {
        &self.coeffs
    }

    /// Returns the coefficient of `x^i`, which is zero past the degree.
    #[inline]
    pub fn coefficient(&self, i: usize) -> u64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// Returns the degree, or `None` for the zero polynomial.
    #[inline]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns the leading coefficient; zero for the zero polynomial.
    #[inline]
    pub fn leading_coefficient(&self) -> u64 {
        self.coeffs.last().copied().unwrap_or(0)
    }

    /// Returns `true` for the zero polynomial.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Returns `true` for constants, including zero.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.coeffs.len() <= 1
    }

    /// Returns `true` for the constant polynomial `1`.
    #[inline]
    pub fn is_one(&self) -> bool {
        self.coeffs == [1]
    }

    fn check_same_field(&self, other: &Self) {
        assert_eq!(
            self.field, other.field,
            "polynomials over different prime fields cannot be combined"
        );
    }

    /// Adds two polynomials.
    ///
    /// # Panics
    ///
    /// Panics if the operands are defined over different primes.
    pub fn add(&self, other: &Self) -> Self {
        self.check_same_field(other);
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| self.field.add(self.coefficient(i), other.coefficient(i)))
            .collect();
        Self::from_vec(self.field, coeffs)
    }

    /// Subtracts `other` from `self`.
    ///
    /// # Panics
    ///
    /// Panics if the operands are defined over different primes.
    pub fn sub(&self, other: &Self) -> Self {
        self.check_same_field(other);
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| self.field.sub(self.coefficient(i), other.coefficient(i)))
            .collect();
        Self::from_vec(self.field, coeffs)
    }

    /// Returns the additive inverse.
    pub fn neg(&self) -> Self {
        let coeffs = self.coeffs.iter().map(|&c| self.field.neg(c)).collect();
        Self::from_vec(self.field, coeffs)
    }

    /// Multiplies every coefficient by the scalar `c`.
    pub fn scale(&self, c: u64) -> Self {
        let coeffs = self.coeffs.iter().map(|&a| self.field.mul(a, c)).collect();
        Self::from_vec(self.field, coeffs)
    }

    /// Multiplies two polynomials.
    ///
    /// # Panics
    ///
    /// Panics if the operands are defined over different primes.
    pub fn mul(&self, other: &Self) -> Self {
        self.check_same_field(other);
        if self.is_zero() || other.is_zero() {
            return Self::zero(self.field);
        }
        let p = self.field.modulus();
        let mut acc = vec![0u64; self.coeffs.len() + other.coeffs.len() - 1];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (j, &b) in other.coeffs.iter().enumerate() {
                // a, b < 101 so the running sum stays far below u64::MAX
                acc[i + j] = (acc[i + j] + a * b) % p;
            }
        }
        Self::from_vec(self.field, acc)
    }

    /// Divides `self` by `divisor`, returning `(quotient, remainder)`.
    ///
    /// The remainder is zero or has degree strictly below the divisor's.
    /// Returns [`FieldError::DivisionByZero`] if `divisor` is zero.
    ///
    /// # Panics
    ///
    /// Panics if the operands are defined over different primes.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self)> {
        self.check_same_field(divisor);
        let divisor_degree = divisor.degree().ok_or(FieldError::DivisionByZero)?;
        let lead_inv = self.field.inv(divisor.leading_coefficient())?;

        let mut remainder = self.coeffs.clone();
        if remainder.len() <= divisor_degree {
            return Ok((Self::zero(self.field), self.clone()));
        }
        let mut quotient = vec![0u64; remainder.len() - divisor_degree];
        for shift in (0..quotient.len()).rev() {
            let top = remainder[shift + divisor_degree];
            if top == 0 {
                continue;
            }
            let q = self.field.mul(top, lead_inv);
            quotient[shift] = q;
            for (k, &d) in divisor.coeffs.iter().enumerate() {
                let idx = shift + k;
                remainder[idx] = self.field.sub(remainder[idx], self.field.mul(q, d));
            }
        }
        remainder.truncate(divisor_degree);
        Ok((
            Self::from_vec(self.field, quotient),
            Self::from_vec(self.field, remainder),
        ))
    }

    /// Returns `self mod divisor`.
    pub fn rem(&self, divisor: &Self) -> Result<Self> {
        self.div_rem(divisor).map(|(_, r)| r)
    }

    /// Evaluates the polynomial at `x` using Horner's rule.
    pub fn evaluate(&self, x: u64) -> u64 {
        let x = self.field.reduce(x);
        self.coeffs
            .iter()
            .rev()
            .fold(0u64, |acc, &c| self.field.add(self.field.mul(acc, x), c))
    }

    /// Renders the non-zero terms from the highest power down, e.g. `x^2 + 2x + 1`.
    ///
    /// The zero polynomial renders as `0`.
    pub fn terms(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut parts = Vec::with_capacity(self.coeffs.len());
        for (power, &c) in self.coeffs.iter().enumerate().rev() {
            if c == 0 {
                continue;
            }
            let term = match (power, c) {
                (0, c) => c.to_string(),
                (1, 1) => "x".to_string(),
                (1, c) => format!("{c}x"),
                (k, 1) => format!("x^{k}"),
                (k, c) => format!("{c}x^{k}"),
            };
            parts.push(term);
        }
        parts.join(" + ")
    }
}

impl fmt::Display for ModPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mod {}", self.terms(), self.modulus())
    }
}
