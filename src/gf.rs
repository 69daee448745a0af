//! Arithmetic in GF(p^n).
//!
//! A [`GaloisField`] is a cheap, immutable handle to the triple
//! `(p, n, modulus)`.  A [`FieldElement`] carries a clone of the handle it
//! was created from, and every binary operation checks that both operands
//! share a field before touching their coefficients.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::FieldSpec;
use crate::error::{FieldError, Result};
use crate::field::PrimeField;
use crate::irreducible::{is_irreducible, validate_degree, IrreducibleFinder};
use crate::polynomial::ModPoly;
use crate::task::CancelToken;

#[derive(Debug, PartialEq, Eq)]
struct FieldParams {
    prime: PrimeField,
    degree: usize,
    modulus: ModPoly,
}

/// The finite field Z/pZ\[x\] / (f) for an irreducible `f` of degree `n`.
#[derive(Debug, Clone)]
pub struct GaloisField {
    inner: Arc<FieldParams>,
}

impl PartialEq for GaloisField {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for GaloisField {}

impl GaloisField {
    /// Constructs GF(p^n) with a modulus found by the sequential search.
    pub fn construct(p: u64, n: usize) -> Result<Self> {
        Self::from_spec(&FieldSpec::new(p, n))
    }

    /// Constructs the field described by `spec`.
    pub fn from_spec(spec: &FieldSpec) -> Result<Self> {
        Self::from_spec_cancellable(spec, &CancelToken::new())
    }

    /// Constructs GF(p^n), giving up with [`FieldError::Cancelled`] once
    /// `cancel` is set.
    pub fn construct_cancellable(p: u64, n: usize, cancel: &CancelToken) -> Result<Self> {
        Self::from_spec_cancellable(&FieldSpec::new(p, n), cancel)
    }

    /// Constructs the field described by `spec`, honouring `cancel`.
    pub fn from_spec_cancellable(spec: &FieldSpec, cancel: &CancelToken) -> Result<Self> {
        let modulus = IrreducibleFinder::new(spec.prime, spec.degree)?
            .with_strategy(spec.strategy)
            .find_cancellable(cancel)?;
        Ok(Self::from_parts(modulus.field(), spec.degree, modulus))
    }

    /// Constructs GF(p^n) over a caller-chosen modulus.
    ///
    /// The coefficients must already be reduced and describe an irreducible
    /// polynomial of degree 1 through 12.
    pub fn with_modulus(p: u64, coeffs: &[u64]) -> Result<Self> {
        let prime = PrimeField::new(p)?;
        let modulus = ModPoly::from_reduced(prime, coeffs)?;
        let degree = modulus.degree().unwrap_or(0);
        validate_degree(degree)?;
        if !is_irreducible(&modulus)? {
            return Err(FieldError::ReducibleModulus(modulus.to_string()));
        }
        Ok(Self::from_parts(prime, degree, modulus))
    }

    fn from_parts(prime: PrimeField, degree: usize, modulus: ModPoly) -> Self {
        info!(
            p = prime.modulus(),
            n = degree,
            modulus = %modulus,
            "constructed finite field"
        );
        Self {
            inner: Arc::new(FieldParams {
                prime,
                degree,
                modulus,
            }),
        }
    }

    /// Returns the characteristic `p`.
    pub fn prime(&self) -> u64 {
        self.inner.prime.modulus()
    }

    /// Returns the coefficient field Z/pZ.
    pub fn prime_field(&self) -> PrimeField {
        self.inner.prime
    }

    /// Returns the extension degree `n`.
    pub fn degree(&self) -> usize {
        self.inner.degree
    }

    /// Returns the defining irreducible polynomial.
    pub fn modulus(&self) -> &ModPoly {
        &self.inner.modulus
    }

    /// Returns the number of elements, `p^n`.
    pub fn order(&self) -> u128 {
        (self.prime() as u128).pow(self.degree() as u32)
    }

    /// Returns a display summary of the field.
    pub fn descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            prime: self.prime(),
            degree: self.degree(),
            order: self.order().to_string(),
            modulus: self.modulus().coefficients().to_vec(),
            modulus_text: self.modulus().to_string(),
        }
    }

    /// The additive identity.
    pub fn zero(&self) -> FieldElement {
        self.wrap(ModPoly::zero(self.prime_field()))
    }

    /// The multiplicative identity.
    pub fn one(&self) -> FieldElement {
        self.wrap(ModPoly::one(self.prime_field()))
    }

    /// Builds an element from its coefficients, lowest degree first.
    ///
    /// Every coefficient must lie in `[0, p)` and, once trailing zeros are
    /// dropped, at most `n` coefficients may remain.
    pub fn element(&self, coeffs: &[u64]) -> Result<FieldElement> {
        self.element_from_poly(ModPoly::from_reduced(self.prime_field(), coeffs)?)
    }

    /// Wraps a polynomial of degree below `n` over the same prime.
    pub fn element_from_poly(&self, poly: ModPoly) -> Result<FieldElement> {
        if poly.field() != self.prime_field() {
            return Err(FieldError::DimensionMismatch(format!(
                "polynomial over Z/{}Z used in a field of characteristic {}",
                poly.modulus(),
                self.prime()
            )));
        }
        if poly.coefficients().len() > self.degree() {
            return Err(FieldError::DimensionMismatch(format!(
                "{} coefficients supplied to a field of degree {}",
                poly.coefficients().len(),
                self.degree()
            )));
        }
        Ok(self.wrap(poly))
    }

    fn wrap(&self, poly: ModPoly) -> FieldElement {
        FieldElement {
            field: self.clone(),
            poly,
        }
    }

    /// Applies `op` to two coefficient lists and returns the result's
    /// trimmed coefficients.
    pub fn evaluate(&self, a: &[u64], b: &[u64], op: FieldOperation) -> Result<Vec<u64>> {
        let a = self.element(a)?;
        let b = self.element(b)?;
        Ok(op.apply(&a, &b)?.coefficients().to_vec())
    }
}

impl fmt::Display for GaloisField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GF({}^{}) = Z/{}Z[x] / ({})",
            self.prime(),
            self.degree(),
            self.prime(),
            self.modulus().terms()
        )
    }
}

/// Serializable summary of a constructed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Characteristic `p`.
    pub prime: u64,
    /// Extension degree `n`.
    pub degree: usize,
    /// Field order `p^n` in decimal.
    pub order: String,
    /// Modulus coefficients, lowest degree first.
    pub modulus: Vec<u64>,
    /// Human-readable modulus, e.g. `x^3 + x + 1 mod 2`.
    pub modulus_text: String,
}

impl FieldDescriptor {
    /// Serializes the descriptor as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// An element of a particular [`GaloisField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldElement {
    field: GaloisField,
    poly: ModPoly,
}

impl FieldElement {
    /// Returns the field this element belongs to.
    pub fn field(&self) -> &GaloisField {
        &self.field
    }

    /// Returns the representing polynomial (degree below `n`).
    pub fn poly(&self) -> &ModPoly {
        &self.poly
    }

    /// Returns the trimmed coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[u64] {
        self.poly.coefficients()
    }

    /// Returns the coefficients padded with zeros to exactly `n` entries.
    pub fn to_padded(&self) -> Vec<u64> {
        (0..self.field.degree())
            .map(|i| self.poly.coefficient(i))
            .collect()
    }

    /// Returns `true` for the additive identity.
    pub fn is_zero(&self) -> bool {
        self.poly.is_zero()
    }

    /// Returns `true` for the multiplicative identity.
    pub fn is_one(&self) -> bool {
        self.poly.is_one()
    }

    fn same_field(&self, other: &Self) -> Result<()> {
        if self.field == other.field {
            Ok(())
        } else {
            Err(FieldError::DimensionMismatch(format!(
                "cannot combine elements of {} and {}",
                self.field, other.field
            )))
        }
    }

    fn with_poly(&self, poly: ModPoly) -> Self {
        self.field.wrap(poly)
    }

    /// Adds two elements.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        Ok(self.with_poly(self.poly.add(&other.poly)))
    }

    /// Subtracts `other` from `self`.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        Ok(self.with_poly(self.poly.sub(&other.poly)))
    }

    /// Returns the additive inverse.
    pub fn neg(&self) -> Self {
        self.with_poly(self.poly.neg())
    }

    /// Multiplies two elements and reduces modulo the field polynomial.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        let product = self.poly.mul(&other.poly).rem(self.field.modulus())?;
        Ok(self.with_poly(product))
    }

    /// Divides `self` by `other`.
    ///
    /// Returns [`FieldError::DivisionByZero`] if `other` is zero.
    pub fn div(&self, other: &Self) -> Result<Self> {
        self.same_field(other)?;
        self.mul(&other.inverse()?)
    }

    /// Computes the multiplicative inverse with the extended Euclidean
    /// algorithm.
    ///
    /// Returns [`FieldError::DivisionByZero`] for zero, and
    /// [`FieldError::InternalInvariantViolation`] if the modulus turns out
    /// to share a factor with the element.
    pub fn inverse(&self) -> Result<Self> {
        if self.is_zero() {
            return Err(FieldError::DivisionByZero);
        }
        let modulus = self.field.modulus();
        let prime = self.field.prime_field();
        // Invariant: t_i * a ≡ r_i (mod f).
        let (mut r0, mut r1) = (modulus.clone(), self.poly.clone());
        let (mut t0, mut t1) = (ModPoly::zero(prime), ModPoly::one(prime));
        while r1.degree().map_or(false, |d| d > 0) {
            let (q, r) = r0.div_rem(&r1)?;
            let t = t0.sub(&q.mul(&t1));
            r0 = r1;
            r1 = r;
            t0 = t1;
            t1 = t;
        }
        if r1.is_zero() {
            return Err(FieldError::InternalInvariantViolation(format!(
                "gcd({}, {}) is {}, not a unit",
                self.poly.terms(),
                modulus.terms(),
                r0.terms()
            )));
        }
        let scale = prime.inv(r1.leading_coefficient())?;
        Ok(self.with_poly(t1.scale(scale).rem(modulus)?))
    }

    /// Raises the element to the power `k`; `0^0` is one.
    pub fn pow(&self, mut k: u128) -> Result<Self> {
        let mut result = self.field.one();
        let mut square = self.clone();
        while k > 0 {
            if k & 1 == 1 {
                result = result.mul(&square)?;
            }
            k >>= 1;
            if k > 0 {
                square = square.mul(&square)?;
            }
        }
        Ok(result)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.poly.terms())
    }
}

/// Binary operations offered to front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOperation {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a · b`
    Multiply,
    /// `a / b`
    Divide,
}

impl FieldOperation {
    /// Every operation, in menu order.
    pub const ALL: [FieldOperation; 4] = [
        FieldOperation::Add,
        FieldOperation::Subtract,
        FieldOperation::Multiply,
        FieldOperation::Divide,
    ];

    /// Applies the operation to two elements of the same field.
    pub fn apply(self, a: &FieldElement, b: &FieldElement) -> Result<FieldElement> {
        match self {
            FieldOperation::Add => a.add(b),
            FieldOperation::Subtract => a.sub(b),
            FieldOperation::Multiply => a.mul(b),
            FieldOperation::Divide => a.div(b),
        }
    }

    /// Lower-case name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            FieldOperation::Add => "add",
            FieldOperation::Subtract => "subtract",
            FieldOperation::Multiply => "multiply",
            FieldOperation::Divide => "divide",
        }
    }
}

impl fmt::Display for FieldOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldOperation {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self> {
        FieldOperation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| FieldError::UnknownOperation(s.to_string()))
    }
}

/// Constructs GF(p^n); see [`GaloisField::construct`].
pub fn construct_field(p: u64, n: usize) -> Result<GaloisField> {
    GaloisField::construct(p, n)
}

/// Applies `op` to two coefficient lists in `field`; see
/// [`GaloisField::evaluate`].
pub fn evaluate(field: &GaloisField, a: &[u64], b: &[u64], op: FieldOperation) -> Result<Vec<u64>> {
    field.evaluate(a, b, op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irreducible::{
        has_linear_factor, has_quadratic_factor, irreducible_quadratics, is_candidate_irreducible,
        needs_low_degree_sieve,
    };
    use crate::prng::SimplePrng;
    use proptest::prelude::*;

    const PRIMES: [u64; 26] = [
        2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83,
        89, 97, 101,
    ];

    fn random_element(field: &GaloisField, prng: &mut SimplePrng) -> FieldElement {
        let coeffs = prng.draw_residues(field.prime(), field.degree());
        field.element(&coeffs).unwrap()
    }

    #[test]
    fn test_gf8_multiplication_scenario() {
        let field = GaloisField::with_modulus(2, &[1, 1, 0, 1]).unwrap();
        let a = field.element(&[1, 0, 1]).unwrap();
        let b = field.element(&[0, 1]).unwrap();
        assert!(a.mul(&b).unwrap().is_one());
        assert_eq!(
            field.evaluate(&[1, 0, 1], &[0, 1], FieldOperation::Multiply),
            Ok(vec![1])
        );
    }

    #[test]
    fn test_gf5_inverse_and_division() {
        let field = construct_field(5, 1).unwrap();
        let a = field.element(&[3]).unwrap();
        let b = field.element(&[4]).unwrap();
        assert_eq!(b.inverse().unwrap().coefficients(), &[4]);
        assert_eq!(a.div(&b).unwrap().coefficients(), &[2]);
    }

    #[test]
    fn test_gf2_degree_one_modulus_is_x() {
        let field = construct_field(2, 1).unwrap();
        assert_eq!(field.modulus().coefficients(), &[0, 1]);
        assert_eq!(field.modulus().to_string(), "x mod 2");
        assert_eq!(field.order(), 2);
    }

    #[test]
    fn test_largest_field_terminates() {
        let field = construct_field(101, 12).unwrap();
        assert_eq!(field.modulus().degree(), Some(12));
        assert!(is_irreducible(field.modulus()).unwrap());
        let x = field.element(&[0, 1]).unwrap();
        // Frobenius: x^(p^n) = x in GF(p^n).
        assert_eq!(x.pow(field.order()).unwrap(), x);
    }

    #[test]
    fn test_every_supported_field_has_a_valid_modulus() {
        for &p in &PRIMES {
            let prime = PrimeField::new(p).unwrap();
            let quadratics = irreducible_quadratics(prime);
            for n in 1..=12 {
                let field = construct_field(p, n).unwrap();
                let f = field.modulus();
                assert_eq!(f.degree(), Some(n));
                assert!(is_candidate_irreducible(f).unwrap(), "GF({p}^{n})");
                if n > 1 {
                    assert!(!has_linear_factor(f), "GF({p}^{n}) modulus has a root");
                }
                if needs_low_degree_sieve(n) {
                    assert!(!has_quadratic_factor(f, &quadratics).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_division_by_zero() {
        let field = construct_field(7, 3).unwrap();
        let a = field.element(&[1, 2, 3]).unwrap();
        assert_eq!(a.div(&field.zero()), Err(FieldError::DivisionByZero));
        assert_eq!(field.zero().inverse(), Err(FieldError::DivisionByZero));
        assert_eq!(
            field.evaluate(&[1, 1], &[], FieldOperation::Divide),
            Err(FieldError::DivisionByZero)
        );
    }

    #[test]
    fn test_mixing_fields_is_rejected() {
        let f9 = construct_field(3, 2).unwrap();
        let f25 = construct_field(5, 2).unwrap();
        let a = f9.element(&[1, 1]).unwrap();
        let b = f25.element(&[1, 1]).unwrap();
        for op in FieldOperation::ALL {
            assert!(matches!(
                op.apply(&a, &b),
                Err(FieldError::DimensionMismatch(_))
            ));
        }
        let poly = ModPoly::new(PrimeField::new(5).unwrap(), &[1]);
        assert!(matches!(
            f9.element_from_poly(poly),
            Err(FieldError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_independent_handles_with_equal_parameters_interoperate() {
        let first = construct_field(3, 2).unwrap();
        let second = construct_field(3, 2).unwrap();
        let a = first.element(&[1, 2]).unwrap();
        let b = second.element(&[2, 2]).unwrap();
        assert_eq!(a.add(&b).unwrap().coefficients(), &[0, 1]);
    }

    #[test]
    fn test_element_validation() {
        let field = construct_field(5, 3).unwrap();
        assert!(matches!(
            field.element(&[1, 2, 3, 4]),
            Err(FieldError::DimensionMismatch(_))
        ));
        assert!(field.element(&[1, 2, 3, 0, 0]).is_ok());
        assert_eq!(
            field.element(&[7]),
            Err(FieldError::InvalidCoefficient {
                coefficient: 7,
                modulus: 5
            })
        );
        assert_eq!(field.element(&[1, 0, 4]).unwrap().to_padded(), vec![1, 0, 4]);
        assert_eq!(field.element(&[2]).unwrap().to_padded(), vec![2, 0, 0]);
    }

    #[test]
    fn test_with_modulus_validation() {
        assert!(matches!(
            GaloisField::with_modulus(2, &[1, 0, 1]),
            Err(FieldError::ReducibleModulus(_))
        ));
        assert_eq!(
            GaloisField::with_modulus(2, &[1]).unwrap_err(),
            FieldError::UnsupportedDegree(0)
        );
        assert_eq!(
            GaloisField::with_modulus(9, &[1, 1]).unwrap_err(),
            FieldError::InvalidPrime(9)
        );
    }

    #[test]
    fn test_small_field_operations() {
        let f9 = GaloisField::with_modulus(3, &[1, 0, 1]).unwrap();
        assert_eq!(
            f9.evaluate(&[1, 1], &[2, 1], FieldOperation::Add),
            Ok(vec![0, 2])
        );
        assert_eq!(
            f9.evaluate(&[1, 1], &[2, 1], FieldOperation::Subtract),
            Ok(vec![2])
        );
        let quotient = f9.evaluate(&[1, 1], &[2, 1], FieldOperation::Divide).unwrap();
        assert_eq!(
            f9.evaluate(&quotient, &[2, 1], FieldOperation::Multiply),
            Ok(vec![1, 1])
        );
        // x^2 = -1 in this presentation.
        let x = f9.element(&[0, 1]).unwrap();
        assert_eq!(x.mul(&x).unwrap(), f9.element(&[2]).unwrap());
        assert_eq!(x.neg().coefficients(), &[0, 2]);
    }

    #[test]
    fn test_inverse_of_one_and_exhaustive_small_field() {
        let f8 = construct_field(2, 3).unwrap();
        assert!(f8.one().inverse().unwrap().is_one());
        for bits in 1u64..8 {
            let a = f8.element(&[bits & 1, (bits >> 1) & 1, bits >> 2]).unwrap();
            assert!(a.mul(&a.inverse().unwrap()).unwrap().is_one());
        }
    }

    #[test]
    fn test_inverse_reports_broken_modulus() {
        // Bypass validation to build a field over the reducible x^2 + 1 mod 2.
        let prime = PrimeField::new(2).unwrap();
        let field = GaloisField::from_parts(prime, 2, ModPoly::new(prime, &[1, 0, 1]));
        let a = field.element(&[1, 1]).unwrap();
        assert!(matches!(
            a.inverse(),
            Err(FieldError::InternalInvariantViolation(_))
        ));
    }

    #[test]
    fn test_operation_names() {
        for op in FieldOperation::ALL {
            assert_eq!(op.to_string().parse::<FieldOperation>(), Ok(op));
        }
        assert_eq!(
            "modulo".parse::<FieldOperation>(),
            Err(FieldError::UnknownOperation("modulo".to_string()))
        );
    }

    #[test]
    fn test_descriptor_json() {
        let field = GaloisField::with_modulus(2, &[1, 1, 0, 1]).unwrap();
        let descriptor = field.descriptor();
        assert_eq!(descriptor.order, "8");
        assert_eq!(descriptor.modulus_text, "x^3 + x + 1 mod 2");
        let json = descriptor.to_json().unwrap();
        assert!(json.contains(r#""modulus":[1,1,0,1]"#));
        assert_eq!(field.to_string(), "GF(2^3) = Z/2Z[x] / (x^3 + x + 1)");
    }

    #[test]
    fn test_field_shared_across_threads() {
        let field = construct_field(13, 4).unwrap();
        let handles: Vec<_> = (0..4u64)
            .map(|seed| {
                let field = field.clone();
                std::thread::spawn(move || {
                    let mut prng = SimplePrng::new(seed);
                    let a = random_element(&field, &mut prng);
                    if a.is_zero() {
                        return true;
                    }
                    a.mul(&a.inverse().unwrap()).unwrap().is_one()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }

    fn arb_field() -> impl Strategy<Value = GaloisField> {
        (prop::sample::select(PRIMES.to_vec()), 1usize..=6)
            .prop_map(|(p, n)| construct_field(p, n).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_inverse_and_round_trip(field in arb_field(), seed in any::<u64>()) {
            let mut prng = SimplePrng::new(seed);
            let a = random_element(&field, &mut prng);
            let b = random_element(&field, &mut prng);
            if !a.is_zero() {
                prop_assert!(a.mul(&a.inverse().unwrap()).unwrap().is_one());
            }
            if !b.is_zero() {
                prop_assert_eq!(a.mul(&b).unwrap().div(&b).unwrap(), a.clone());
            }
            // Distributivity in the field.
            let c = random_element(&field, &mut prng);
            prop_assert_eq!(
                a.mul(&b.add(&c).unwrap()).unwrap(),
                a.mul(&b).unwrap().add(&a.mul(&c).unwrap()).unwrap()
            );
        }
    }
}
