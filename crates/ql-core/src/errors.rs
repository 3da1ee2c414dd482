//! Error types for the finite-difference workspace.
//!
//! A single `thiserror`-derived enum carries every failure the PDE core can
//! report: configuration mistakes detected while wiring meshes, operators and
//! conditions together, numerical breakdowns during the tridiagonal solves, and
//! out-of-range grid access.  The `ensure!`, `ensure_config!`, `ensure_post!`
//! and `fail!` macros keep the early-return checks short.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error.
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated by the caller.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated by a computation.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Inconsistent set-up: non-monotone mesh, mismatched operator and mesh,
    /// colliding boundary conditions, mandatory times outside the horizon.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Singular or ill-conditioned linear system, non-finite result.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// A grid quantity that is undefined at the requested node, such as the
    /// left spacing of the first node.
    #[error("out of range: {0}")]
    Range(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Return `true` for errors raised by a breakdown of the numerics.
    pub fn is_numerical(&self) -> bool {
        matches!(self, Error::Numerical(_))
    }

    /// Return `true` for errors raised by an inconsistent set-up.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Configuration(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_config, errors::Error};
/// fn grid(size: usize) -> ql_core::errors::Result<usize> {
///     ensure_config!(size >= 2, "a mesh needs at least 2 points, got {size}");
///     Ok(size)
/// }
/// assert!(grid(3).is_ok());
/// assert!(matches!(grid(1), Err(Error::Configuration(_))));
/// ```
#[macro_export]
macro_rules! ensure_config {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Configuration(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}
