//! An implementation of the [`BCTV14`] preprocessing zkSNARK for rank-1
//! constraint systems.
//!
//! The scheme preprocesses an R1CS instance into a proving key and a
//! verification key by evaluating the induced Quadratic Arithmetic Program at
//! a secret point and encoding the blinded evaluations in two pairing groups.
//! Proving is a handful of multi-exponentiations against the proving key;
//! verification is five pairing-product checks against the verification key
//! and the public input.
//!
//! [`BCTV14`]: https://eprint.iacr.org/2013/879.pdf
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(
    unused,
    future_incompatible,
    nonstandard_style,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::many_single_char_names, clippy::op_ref)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate ark_std;

/// Errors raised by key generation and proving.
pub mod errors;

/// Rank-1 constraint systems consumed by the generator and prover.
pub mod r1cs;

/// Reduce an R1CS instance to a *Quadratic Arithmetic Program* instance.
pub mod r1cs_to_qap;

/// Data structures used by the prover, verifier, and generator.
pub mod data_structures;

/// Block-partitioned 1-D index spaces and vectors.
pub mod block;

/// Sparse vectors keyed by query index.
pub mod sparse;

/// Fixed-base window-exponentiation tables.
pub mod window;

/// Multi-exponentiation with shortcuts for 0 and ±1 scalars.
pub mod msm;

/// Step-begin progress notifications and cancellation.
pub mod progress;

/// Generate public parameters for the BCTV14 zkSNARK construction.
pub mod generator;

/// Create proofs for the BCTV14 zkSNARK construction.
pub mod prover;

/// Verify proofs for the BCTV14 zkSNARK construction.
pub mod verifier;

#[cfg(test)]
mod test;

pub use self::data_structures::*;
pub use self::errors::Error;
pub use self::progress::{NoProgress, ProgressObserver};
pub use self::{generator::*, prover::*, verifier::*};
