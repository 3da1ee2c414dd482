//! # quantlib-fd
//!
//! Finite-difference PDE pricing after the design of
//! [QuantLib](https://www.quantlib.org/)'s `finitedifferences` framework.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! quantlib-fd = "0.1"
//! ```
//!
//! ```rust
//! use std::sync::Arc;
//! use quantlib_fd::instruments::{Exercise, OptionType, PlainVanillaPayoff};
//! use quantlib_fd::methods::{FdmBlackScholesSolver, FdmBlackScholesSolverDesc};
//! use quantlib_fd::processes::BlackScholesMertonProcess;
//!
//! let process = BlackScholesMertonProcess::new(100.0, 0.05, 0.0, 0.2)?;
//! let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
//! let exercise = Exercise::american(1.0)?;
//! let desc = FdmBlackScholesSolverDesc::default().with_grid(51, 25);
//! let put = FdmBlackScholesSolver::new(process, payoff, &exercise, &desc)?.results();
//! assert!(put.value > 5.5 && put.delta < 0.0);
//! # Ok::<(), quantlib_fd::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Arrays, comparison, the normal distribution and interpolation.
pub use ql_math as math;

/// Stochastic process definitions.
pub use ql_processes as processes;

/// Meshers, operators, conditions, schemes and solvers.
pub use ql_methods as methods;

/// Payoffs and exercise styles.
pub use ql_instruments as instruments;
