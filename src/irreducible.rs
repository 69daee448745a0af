//! Synthesis of irreducible polynomials over Z/pZ.
//!
//! The finder walks a stream of monic degree-`n` candidates and accepts the
//! first one passing a relaxed Rabin test:
//!
//! ```text
//! x^(p^n)     ≡ x  (mod f)
//! x^(p^(n/r)) ≢ x  (mod f)   for every prime r | n
//! ```
//!
//! Rabin's second condition asks for `gcd(x^(p^(n/r)) - x, f) = 1`; the
//! relaxed form only rules out exact congruence and so admits reducible
//! polynomials whose factor degrees divide `n`, sum to `n` and have lcm `n`.
//! For `n ≤ 12` such a factorization always contains a linear or quadratic
//! factor and only exists for `n ∈ {6, 10, 12}`, so for those degrees the
//! finder additionally sieves out candidates with a root or an irreducible
//! quadratic divisor.  The sieve is not valid beyond degree 12 and
//! [`is_irreducible`] refuses larger inputs.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::SearchStrategy;
use crate::error::{FieldError, Result};
use crate::field::PrimeField;
use crate::polynomial::ModPoly;
use crate::prng::SimplePrng;
use crate::task::CancelToken;

/// Largest extension degree accepted by the engine.
pub const MAX_DEGREE: usize = 12;

/// Random draws per unit of degree before a randomized search falls back to
/// exhaustive enumeration.
pub const RANDOM_ATTEMPTS_PER_DEGREE: usize = 64;

/// Returns [`FieldError::UnsupportedDegree`] unless `1 <= n <= MAX_DEGREE`.
pub fn validate_degree(n: usize) -> Result<()> {
    if (1..=MAX_DEGREE).contains(&n) {
        Ok(())
    } else {
        Err(FieldError::UnsupportedDegree(n))
    }
}

/// Distinct prime factors of `n` in increasing order.
pub fn prime_factors(mut n: usize) -> Vec<usize> {
    let mut factors = Vec::new();
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            factors.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

/// Returns `true` for the degrees where the relaxed test needs the
/// low-degree sieve.
#[inline]
pub fn needs_low_degree_sieve(n: usize) -> bool {
    matches!(n, 6 | 10 | 12)
}

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// Returns [`FieldError::DivisionByZero`] if `modulus` is zero.
pub fn pow_mod(base: &ModPoly, mut exponent: u128, modulus: &ModPoly) -> Result<ModPoly> {
    let mut result = ModPoly::one(base.field()).rem(modulus)?;
    let mut square = base.rem(modulus)?;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.mul(&square).rem(modulus)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            square = square.mul(&square).rem(modulus)?;
        }
    }
    Ok(result)
}

/// Computes `x^k mod modulus`.
pub fn x_pow_mod(k: u128, modulus: &ModPoly) -> Result<ModPoly> {
    pow_mod(&ModPoly::x(modulus.field()), k, modulus)
}

/// Returns `[x^p, x^(p^2), …, x^(p^m)]`, each reduced modulo `f`.
///
/// Each entry is the previous one raised to the `p`-th power, so the whole
/// chain costs `m` small exponentiations instead of one per entry.
pub fn frobenius_chain(f: &ModPoly, m: usize) -> Result<Vec<ModPoly>> {
    let p = f.modulus() as u128;
    let mut chain = Vec::with_capacity(m);
    let mut current = ModPoly::x(f.field()).rem(f)?;
    for _ in 0..m {
        current = pow_mod(&current, p, f)?;
        chain.push(current.clone());
    }
    Ok(chain)
}

/// The relaxed irreducibility predicate.
///
/// Zero and constant polynomials are never accepted.  A `true` result is
/// exact for prime-power degrees; for `n ∈ {6, 10, 12}` it may be a false
/// positive, which [`is_irreducible`] resolves.
pub fn is_candidate_irreducible(f: &ModPoly) -> Result<bool> {
    let n = match f.degree() {
        Some(n) if n >= 1 => n,
        _ => return Ok(false),
    };
    // x mod f is x itself except in degree 1, where it is the root of f.
    let x = ModPoly::x(f.field()).rem(f)?;
    let chain = frobenius_chain(f, n)?;
    if chain[n - 1] != x {
        return Ok(false);
    }
    for r in prime_factors(n) {
        if chain[n / r - 1].sub(&x).is_zero() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Returns `true` if `f` has a root in Z/pZ, i.e. a linear factor.
pub fn has_linear_factor(f: &ModPoly) -> bool {
    (0..f.modulus()).any(|a| f.evaluate(a) == 0)
}

/// Lists every monic irreducible quadratic `x^2 + bx + c` over the field.
///
/// A quadratic is irreducible exactly when it has no root, so there are
/// `(p^2 - p) / 2` of them.
pub fn irreducible_quadratics(field: PrimeField) -> Vec<ModPoly> {
    let p = field.modulus();
    let mut out = Vec::with_capacity(((p * p - p) / 2) as usize);
    for b in 0..p {
        for c in 0..p {
            let q = ModPoly::new(field, &[c, b, 1]);
            if !has_linear_factor(&q) {
                out.push(q);
            }
        }
    }
    out
}

/// Returns `true` if any polynomial in `quadratics` divides `f`.
pub fn has_quadratic_factor(f: &ModPoly, quadratics: &[ModPoly]) -> Result<bool> {
    let divides = |q: &ModPoly| f.rem(q).map(|r| r.is_zero());
    let use_parallel = {
        #[cfg(not(target_arch = "wasm32"))]
        {
            const PARALLEL_THRESHOLD: usize = 256;
            quadratics.len() >= PARALLEL_THRESHOLD && rayon::current_num_threads() > 1
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    };
    // Any hit or any error ends the scan.
    let found = if use_parallel {
        #[cfg(not(target_arch = "wasm32"))]
        {
            quadratics
                .par_iter()
                .map(divides)
                .find_any(|r| !matches!(r, Ok(false)))
        }
        #[cfg(target_arch = "wasm32")]
        {
            None
        }
    } else {
        quadratics
            .iter()
            .map(divides)
            .find(|r| !matches!(r, Ok(false)))
    };
    found.unwrap_or(Ok(false))
}

/// Exact irreducibility test for polynomials of degree 1 through 12.
///
/// Zero and constant polynomials are reported as not irreducible.  Degrees
/// above [`MAX_DEGREE`] return [`FieldError::UnsupportedDegree`].
pub fn is_irreducible(f: &ModPoly) -> Result<bool> {
    IrreducibleTest::new(f.field()).check(f)
}

/// Predicate plus sieve, with the quadratic list built at most once.
struct IrreducibleTest {
    field: PrimeField,
    quadratics: Option<Vec<ModPoly>>,
}

impl IrreducibleTest {
    fn new(field: PrimeField) -> Self {
        Self {
            field,
            quadratics: None,
        }
    }

    fn check(&mut self, f: &ModPoly) -> Result<bool> {
        let n = match f.degree() {
            Some(n) if n >= 1 => n,
            _ => return Ok(false),
        };
        validate_degree(n)?;
        if !is_candidate_irreducible(f)? {
            return Ok(false);
        }
        if !needs_low_degree_sieve(n) {
            return Ok(true);
        }
        if has_linear_factor(f) {
            trace!(candidate = %f, "relaxed test passed a polynomial with a root");
            return Ok(false);
        }
        let field = self.field;
        let quadratics = self
            .quadratics
            .get_or_insert_with(|| irreducible_quadratics(field));
        if has_quadratic_factor(f, quadratics)? {
            trace!(candidate = %f, "relaxed test passed a polynomial with a quadratic factor");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Exhaustive stream of the `p^n` monic polynomials of degree `n`.
///
/// Candidates are produced in counting order: the base-`p` digits of an
/// index give the coefficients `c_0, …, c_{n-1}` with `c_0` least
/// significant, so the first candidate is `x^n`.
#[derive(Debug, Clone)]
pub struct CandidateStream {
    field: PrimeField,
    degree: usize,
    next: u128,
    total: u128,
}

impl CandidateStream {
    /// Creates the stream of monic degree-`degree` polynomials.
    pub fn new(field: PrimeField, degree: usize) -> Self {
        Self {
            field,
            degree,
            next: 0,
            total: (field.modulus() as u128).pow(degree as u32),
        }
    }

    /// Number of candidates in the full stream.
    pub fn total(&self) -> u128 {
        self.total
    }
}

impl Iterator for CandidateStream {
    type Item = ModPoly;

    fn next(&mut self) -> Option<ModPoly> {
        if self.next >= self.total {
            return None;
        }
        let p = self.field.modulus() as u128;
        let mut index = self.next;
        self.next += 1;
        let mut coeffs = Vec::with_capacity(self.degree + 1);
        for _ in 0..self.degree {
            coeffs.push((index % p) as u64);
            index /= p;
        }
        coeffs.push(1);
        Some(ModPoly::new(self.field, &coeffs))
    }
}

/// Monic candidates with pseudorandom lower coefficients.
#[derive(Debug, Clone)]
struct RandomCandidates {
    field: PrimeField,
    degree: usize,
    prng: SimplePrng,
}

impl Iterator for RandomCandidates {
    type Item = ModPoly;

    fn next(&mut self) -> Option<ModPoly> {
        let mut coeffs = self
            .prng
            .draw_residues(self.field.modulus(), self.degree);
        coeffs.push(1);
        Some(ModPoly::new(self.field, &coeffs))
    }
}

/// Searches for a degree-`n` irreducible polynomial over Z/pZ.
#[derive(Debug, Clone)]
pub struct IrreducibleFinder {
    field: PrimeField,
    degree: usize,
    strategy: SearchStrategy,
}

impl IrreducibleFinder {
    /// Creates a finder for degree `n` over Z/pZ.
    ///
    /// Returns [`FieldError::InvalidPrime`] or [`FieldError::UnsupportedDegree`]
    /// for parameters outside the supported range.
    pub fn new(p: u64, n: usize) -> Result<Self> {
        Self::for_field(PrimeField::new(p)?, n)
    }

    /// Creates a finder over an already validated prime field.
    pub fn for_field(field: PrimeField, n: usize) -> Result<Self> {
        validate_degree(n)?;
        Ok(Self {
            field,
            degree: n,
            strategy: SearchStrategy::Sequential,
        })
    }

    /// Replaces the candidate generation strategy.
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Returns the coefficient field.
    pub fn field(&self) -> PrimeField {
        self.field
    }

    /// Returns the target degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    fn candidates(&self) -> Box<dyn Iterator<Item = ModPoly> + Send> {
        let exhaustive = CandidateStream::new(self.field, self.degree);
        match self.strategy {
            SearchStrategy::Sequential => Box::new(exhaustive),
            SearchStrategy::Randomized { seed } => {
                let random = RandomCandidates {
                    field: self.field,
                    degree: self.degree,
                    prng: SimplePrng::new(seed),
                };
                Box::new(
                    random
                        .take(RANDOM_ATTEMPTS_PER_DEGREE * self.degree)
                        .chain(exhaustive),
                )
            }
        }
    }

    /// Runs the search to completion.
    pub fn find(&self) -> Result<ModPoly> {
        self.find_cancellable(&CancelToken::new())
    }

    /// Runs the search, checking `cancel` before every candidate.
    ///
    /// Returns [`FieldError::Cancelled`] once the token is set.
    pub fn find_cancellable(&self, cancel: &CancelToken) -> Result<ModPoly> {
        let mut test = IrreducibleTest::new(self.field);
        for (examined, candidate) in self.candidates().enumerate() {
            if cancel.is_cancelled() {
                return Err(FieldError::Cancelled);
            }
            if test.check(&candidate)? {
                debug!(
                    p = self.field.modulus(),
                    n = self.degree,
                    examined = examined + 1,
                    strategy = ?self.strategy,
                    modulus = %candidate,
                    "accepted irreducible modulus"
                );
                return Ok(candidate);
            }
        }
        Err(FieldError::InternalInvariantViolation(format!(
            "no irreducible polynomial of degree {} over Z/{}Z among monic candidates",
            self.degree,
            self.field.modulus()
        )))
    }
}
