//! Prime field arithmetic.
//!
//! The [`PrimeField`] type encapsulates a prime modulus `p` and exposes
//! addition, subtraction, multiplication, exponentiation and inversion over
//! the integers modulo `p`.  Every other layer of the crate works with
//! coefficients drawn from one of these fields.

use crate::error::{FieldError, Result};

/// Largest characteristic accepted by the engine.
pub const MAX_PRIME: u64 = 101;

/// Returns `true` when `n` is prime.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

/// The field Z/pZ for a prime `p` between 2 and [`MAX_PRIME`].
///
/// Primality is checked once, in [`PrimeField::new`].  Anything holding a
/// `PrimeField` may therefore rely on `p` being prime; in particular every
/// non-zero element has an inverse given by Fermat's little theorem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimeField {
    p: u64,
}

impl PrimeField {
    /// Creates the prime field of order `p`.
    ///
    /// Returns [`FieldError::InvalidPrime`] if `p` is not a prime in
    /// `[2, MAX_PRIME]`.
    pub fn new(p: u64) -> Result<Self> {
        if p > MAX_PRIME || !is_prime(p) {
            return Err(FieldError::InvalidPrime(p));
        }
        Ok(PrimeField { p })
    }

    /// Returns the modulus of the field.
    #[inline]
    pub fn modulus(&self) -> u64 {
        self.p
    }

    /// Reduces an arbitrary integer into `[0, p)`.
    #[inline]
    pub fn reduce(&self, a: u64) -> u64 {
        a % self.p
    }

    /// Reduces a signed integer into `[0, p)`, so `-1` maps to `p - 1`.
    #[inline]
    pub fn reduce_signed(&self, a: i64) -> u64 {
        a.rem_euclid(self.p as i64) as u64
    }

    /// Adds two field elements.
    #[inline]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        let mut s = (a % self.p) + (b % self.p);
        if s >= self.p {
            s -= self.p;
        }
        s
    }

    /// Subtracts `b` from `a`.
    #[inline]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        let a = a % self.p;
        let b = b % self.p;
        if a >= b {
            a - b
        } else {
            self.p - (b - a)
        }
    }

    /// Returns the additive inverse of `a`.
    #[inline]
    pub fn neg(&self, a: u64) -> u64 {
        self.sub(0, a)
    }

    /// Multiplies two field elements.
    #[inline]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        let a = a % self.p;
        let b = b % self.p;
        ((a as u128 * b as u128) % self.p as u128) as u64
    }

    /// Exponentiates `a` by `e` modulo `p`.
    #[inline]
    pub fn pow(&self, mut a: u64, mut e: u64) -> u64 {
        a %= self.p;
        let mut result = 1u64 % self.p;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, a);
            }
            a = self.mul(a, a);
            e >>= 1;
        }
        result
    }

    /// Computes the multiplicative inverse of `a`.
    ///
    /// Returns [`FieldError::DivisionByZero`] if `a` is zero modulo `p`.
    #[inline]
    pub fn inv(&self, a: u64) -> Result<u64> {
        let a = a % self.p;
        if a == 0 {
            return Err(FieldError::DivisionByZero);
        }
        // Fermat: a^(p-2) = a^-1 (mod p)
        Ok(self.pow(a, self.p - 2))
    }

    /// Divides `a` by `b`.
    #[inline]
    pub fn div(&self, a: u64, b: u64) -> Result<u64> {
        Ok(self.mul(a, self.inv(b)?))
    }

    /// Returns `true` if `a` generates the multiplicative group of the field.
    pub fn is_primitive_root(&self, a: u64) -> bool {
        let a = a % self.p;
        if a == 0 {
            return false;
        }
        let mut order = 1u64;
        let mut current = a;
        while current != 1 {
            current = self.mul(current, a);
            order += 1;
        }
        order == self.p - 1
    }
}
