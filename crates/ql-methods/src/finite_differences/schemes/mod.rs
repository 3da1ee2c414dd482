//! Time-stepping schemes (translates `ql/methods/finitedifferences/schemes/`).

use ql_core::{errors::Result, Time};
use ql_math::Array;

mod douglas_scheme;
mod fdm_scheme_desc;
mod mixed_scheme;

pub use douglas_scheme::DouglasScheme;
pub use fdm_scheme_desc::{FdmSchemeDesc, FdmSchemeType};
pub use mixed_scheme::MixedScheme;

/// One backward step of the solution array.
///
/// Corresponds to the `step`/`setStep` interface shared by the QuantLib
/// schemes.
pub trait Evolver: Send {
    /// Evolve `a` from time `t` back to `t − dt`.
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()>;

    /// Set the step size used by the following calls to [`step`](Self::step).
    fn set_step(&mut self, dt: Time);
}

impl<E: Evolver + ?Sized> Evolver for Box<E> {
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        (**self).step(a, t)
    }

    fn set_step(&mut self, dt: Time) {
        (**self).set_step(dt)
    }
}

impl<E: Evolver + ?Sized> Evolver for &mut E {
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        (**self).step(a, t)
    }

    fn set_step(&mut self, dt: Time) {
        (**self).set_step(dt)
    }
}
