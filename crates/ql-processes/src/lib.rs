//! # ql-processes
//!
//! One-dimensional stochastic processes supplying the drift and diffusion
//! coefficients of the finite-difference operators.
//!
//! Translates the parts of `ql/processes/` the PDE framework consumes:
//! Black-Scholes-Merton (log-spot), geometric Brownian motion,
//! Ornstein-Uhlenbeck and the square-root (CIR) process.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Black-Scholes-Merton process over flat market data.
pub mod black_scholes_process;
/// Geometric Brownian motion.
pub mod geometric_brownian_motion;
/// Ornstein-Uhlenbeck process.
pub mod ornstein_uhlenbeck_process;
/// Square-root (CIR) process.
pub mod square_root_process;
/// The 1D process trait.
pub mod stochastic_process;

pub use black_scholes_process::BlackScholesMertonProcess;
pub use geometric_brownian_motion::GeometricBrownianMotionProcess;
pub use ornstein_uhlenbeck_process::OrnsteinUhlenbeckProcess;
pub use square_root_process::SquareRootProcess;
pub use stochastic_process::StochasticProcess1D;
