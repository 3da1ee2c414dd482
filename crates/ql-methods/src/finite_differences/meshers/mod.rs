//! Spatial grids.

mod fdm_1d_mesher;
mod fdm_black_scholes_mesher;
mod fdm_mesher;

pub use fdm_1d_mesher::Fdm1dMesher;
pub use fdm_black_scholes_mesher::FdmBlackScholesMesher;
pub use fdm_mesher::FdmMesher;
