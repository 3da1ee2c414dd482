//! Vanilla option solver on a log-spot grid
//! (translates `ql/methods/finitedifferences/solvers/fdmblackscholessolver.hpp`).
//!
//! Greeks in spot follow from the log-spot derivatives:
//!
//! ```text
//! Δ = V_x / S        Γ = (V_xx − V_x) / S²
//! ```

use std::sync::Arc;

use ql_core::{ensure_config, errors::Result, Real, Size, Time};
use ql_instruments::{Exercise, StrikedPayoff};
use ql_processes::BlackScholesMertonProcess;
use tracing::debug;

use super::{Fdm1DimSolver, FdmSolverDesc};
use crate::finite_differences::meshers::{FdmBlackScholesMesher, FdmMesher};
use crate::finite_differences::operators::FdmBlackScholesOp;
use crate::finite_differences::schemes::FdmSchemeDesc;
use crate::finite_differences::step_conditions::FdmStepConditionComposite;
use crate::finite_differences::utilities::FdmLogInnerValue;

/// Grid and scheme settings of a [`FdmBlackScholesSolver`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdmBlackScholesSolverDesc {
    /// Number of log-spot nodes.
    pub x_grid: Size,
    /// Number of time steps.
    pub t_grid: Size,
    /// Number of implicit Euler damping steps.
    pub damping_steps: Size,
    /// Time stepping scheme.
    pub scheme: FdmSchemeDesc,
    /// Tail probability left outside the grid.
    pub eps: Real,
    /// Widening factor of the grid.
    pub scale_factor: Real,
    /// Density of extra nodes around the strike, if any.
    pub strike_density: Option<Real>,
    /// Discrete cash dividends `(time, amount)`.
    pub dividends: Vec<(Time, Real)>,
}

impl Default for FdmBlackScholesSolverDesc {
    fn default() -> Self {
        Self {
            x_grid: 101,
            t_grid: 100,
            damping_steps: 0,
            scheme: FdmSchemeDesc::douglas(),
            eps: 1e-4,
            scale_factor: 1.5,
            strike_density: None,
            dividends: Vec::new(),
        }
    }
}

impl FdmBlackScholesSolverDesc {
    /// Grid sizes in space and time.
    pub fn with_grid(mut self, x_grid: Size, t_grid: Size) -> Self {
        self.x_grid = x_grid;
        self.t_grid = t_grid;
        self
    }

    /// Damping steps.
    pub fn with_damping_steps(mut self, damping_steps: Size) -> Self {
        self.damping_steps = damping_steps;
        self
    }

    /// Scheme.
    pub fn with_scheme(mut self, scheme: FdmSchemeDesc) -> Self {
        self.scheme = scheme;
        self
    }

    /// Tail probability and widening factor of the grid.
    pub fn with_range(mut self, eps: Real, scale_factor: Real) -> Self {
        self.eps = eps;
        self.scale_factor = scale_factor;
        self
    }

    /// Concentrate nodes around the strike.
    pub fn with_strike_density(mut self, density: Real) -> Self {
        self.strike_density = Some(density);
        self
    }

    /// Discrete cash dividends.
    pub fn with_dividends(mut self, dividends: Vec<(Time, Real)>) -> Self {
        self.dividends = dividends;
        self
    }
}

/// Value and greeks at the spot.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdmResults {
    /// Present value.
    pub value: Real,
    /// `∂V/∂S`.
    pub delta: Real,
    /// `∂²V/∂S²`.
    pub gamma: Real,
    /// `∂V/∂t`.
    pub theta: Real,
}

/// Prices a vanilla option under Black-Scholes dynamics.
///
/// Corresponds to `QuantLib::FdmBlackScholesSolver`.
#[derive(Debug)]
pub struct FdmBlackScholesSolver {
    spot: Real,
    solver: Fdm1DimSolver,
}

impl FdmBlackScholesSolver {
    /// Solve for `payoff` with `exercise` under `process`.
    ///
    /// # Errors
    /// `Error::Configuration` for an exercise date that is not in the
    /// future or an invalid grid; any error of the rollback.
    pub fn new<P: StrikedPayoff + 'static>(
        process: BlackScholesMertonProcess,
        payoff: Arc<P>,
        exercise: &Exercise,
        desc: &FdmBlackScholesSolverDesc,
    ) -> Result<Self> {
        let maturity = exercise.last_time();
        ensure_config!(maturity > 0.0, "option expired at t={maturity}");
        let strike = payoff.strike();

        let mut builder = FdmBlackScholesMesher::new(desc.x_grid, &process, maturity, strike)
            .with_eps(desc.eps)
            .with_scale_factor(desc.scale_factor)
            .with_dividends(desc.dividends.clone());
        if let Some(density) = desc.strike_density {
            builder = builder.with_concentration(strike, density);
        }
        let mesher = Arc::new(FdmMesher::from_1d(builder.build()?)?);

        let calculator = Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0)?);
        let condition = FdmStepConditionComposite::vanilla_composite(
            desc.dividends.clone(),
            exercise,
            mesher.clone(),
            calculator.clone(),
            0,
        )?;
        debug!(
            strike,
            maturity,
            exercise = ?exercise.exercise_type(),
            conditions = condition.len(),
            "black-scholes solver"
        );

        let spot = process.spot();
        let op = Box::new(FdmBlackScholesOp::new(mesher.clone(), process, 0)?);
        let solver_desc = FdmSolverDesc {
            mesher,
            bcs: Vec::new(),
            condition,
            calculator,
            maturity,
            time_steps: desc.t_grid,
            damping_steps: desc.damping_steps,
        };
        let solver = Fdm1DimSolver::new(solver_desc, desc.scheme, op)?;
        Ok(Self { spot, solver })
    }

    /// The underlying log-spot solver.
    pub fn solver(&self) -> &Fdm1DimSolver {
        &self.solver
    }

    /// Value for spot level `s`.
    pub fn value_at(&self, s: Real) -> Real {
        self.solver.value_at(s.ln())
    }

    /// Delta for spot level `s`.
    pub fn delta_at(&self, s: Real) -> Real {
        self.solver.derivative_x(s.ln()) / s
    }

    /// Gamma for spot level `s`.
    pub fn gamma_at(&self, s: Real) -> Real {
        let x = s.ln();
        (self.solver.derivative_xx(x) - self.solver.derivative_x(x)) / (s * s)
    }

    /// Theta for spot level `s`.
    pub fn theta_at(&self, s: Real) -> Real {
        self.solver.theta_at(s.ln())
    }

    /// Value and greeks at the spot of the process.
    pub fn results(&self) -> FdmResults {
        let s = self.spot;
        FdmResults {
            value: self.value_at(s),
            delta: self.delta_at(s),
            gamma: self.gamma_at(s),
            theta: self.theta_at(s),
        }
    }
}
