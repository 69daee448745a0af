#![deny(missing_docs)]

//! # gf_calc
//!
//! **gf_calc** is the arithmetic engine behind a finite-field calculator.  It
//! builds GF(p^n) for any prime `p ≤ 101` and degree `n ≤ 12` and evaluates
//! the four field operations on elements written as coefficient lists.
//!
//! ## Features
//!
//! * **Prime field arithmetic** via the [`PrimeField`] type, with inverses
//!   from Fermat's little theorem.
//! * **Polynomials over Z/pZ**: [`ModPoly`] offers addition, subtraction,
//!   multiplication, long division, Horner evaluation and the familiar
//!   `x^2 + 2x + 1 mod 11` rendering.
//! * **Irreducible polynomial synthesis**: the [`irreducible`] module
//!   implements a relaxed Rabin test driven by fast modular exponentiation,
//!   plus the low-degree sieve that makes it exact for every degree up to 12.
//! * **Field arithmetic**: [`GaloisField`] and [`FieldElement`] reduce every
//!   product modulo the field polynomial and invert with the extended
//!   Euclidean algorithm.  Elements remember their field, so mixing fields is
//!   an error rather than a silent coercion.
//! * **Background construction**: the [`task`] module runs the modulus search
//!   on a worker thread with cancellation (and on tokio with the `async`
//!   feature).
//!
//! ## Usage
//!
//! ```rust
//! use gf_calc::{construct_field, FieldOperation};
//!
//! // GF(2^3): the search settles on x^3 + x + 1.
//! let field = construct_field(2, 3).unwrap();
//! assert_eq!(field.modulus().to_string(), "x^3 + x + 1 mod 2");
//!
//! // (x^2 + 1) · x = x^3 + x ≡ 1.
//! let product = field
//!     .evaluate(&[1, 0, 1], &[0, 1], FieldOperation::Multiply)
//!     .unwrap();
//! assert_eq!(product, vec![1]);
//! ```
//!
//! Field handles are immutable and cheap to clone, so one constructed field
//! can serve any number of threads.

mod config;
mod error;
mod field;
pub mod gf;
pub mod irreducible;
mod polynomial;
mod prng;
pub mod task;

pub use config::{FieldSpec, SearchStrategy};
pub use error::{FieldError, Result};
pub use field::{is_prime, PrimeField, MAX_PRIME};
pub use gf::{construct_field, evaluate, FieldDescriptor, FieldElement, FieldOperation, GaloisField};
pub use irreducible::{is_candidate_irreducible, is_irreducible, IrreducibleFinder, MAX_DEGREE};
pub use polynomial::ModPoly;
pub use prng::SimplePrng;
pub use task::{spawn_construct, CancelToken, ConstructionTask};

#[cfg(feature = "async")]
pub use task::construct_field_async;
