//! # ql-instruments
//!
//! Payoff and exercise descriptions consumed by the finite-difference
//! framework when it builds terminal conditions and exercise constraints.
//!
//! Translates `ql/instruments/payoffs.hpp` and `ql/exercise.hpp`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Exercise rights (European, American, Bermudan).
pub mod exercise;

/// Payoff capability objects.
pub mod payoff;

pub use exercise::{Exercise, ExerciseType};
pub use payoff::{
    CashOrNothingPayoff, FunctionPayoff, OptionType, Payoff, PlainVanillaPayoff, StrikedPayoff,
};
