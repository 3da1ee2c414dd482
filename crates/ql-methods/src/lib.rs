//! # ql-methods
//!
//! Finite-difference solvers for option pricing PDEs.
//!
//! Translates the core of `ql/methods/finitedifferences/`: meshers,
//! triple-band operators, boundary and step conditions, the θ and Douglas
//! schemes and the backward solvers built on them.
//!
//! # Modules
//!
//! * [`finite_differences`]: the whole framework, re-exported at the root

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite difference methods.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::*;
