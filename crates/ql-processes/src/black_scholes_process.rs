//! Black-Scholes-Merton process with flat market data
//! (translates `ql/processes/blackscholesprocess.hpp`).
//!
//! `dS/S = (r − q) dt + σ dW`
//!
//! As in the generalized process the state variable reported through
//! [`StochasticProcess1D`] is `ln S`: the drift is `r − q − σ²/2` and the
//! diffusion is `σ`.  Rates and volatility are continuously compounded
//! constants, so forward rates over any interval coincide with the spot
//! values.

use crate::stochastic_process::StochasticProcess1D;
use ql_core::{ensure, errors::Result, DiscountFactor, Rate, Real, Time, Volatility};

/// Black-Scholes-Merton process with constant rate, dividend yield and
/// volatility.
///
/// Corresponds to `QuantLib::BlackScholesMertonProcess` over flat term
/// structures.
#[derive(Debug, Clone, PartialEq)]
pub struct BlackScholesMertonProcess {
    spot: Real,
    risk_free_rate: Rate,
    dividend_yield: Rate,
    volatility: Volatility,
}

impl BlackScholesMertonProcess {
    /// Create a process from spot, continuously compounded risk-free rate,
    /// dividend yield and Black volatility.
    ///
    /// # Errors
    /// `Error::Precondition` unless `spot > 0`, `volatility >= 0` and all
    /// inputs are finite.
    pub fn new(
        spot: Real,
        risk_free_rate: Rate,
        dividend_yield: Rate,
        volatility: Volatility,
    ) -> Result<Self> {
        ensure!(spot > 0.0 && spot.is_finite(), "spot must be positive, got {spot}");
        ensure!(
            volatility >= 0.0 && volatility.is_finite(),
            "volatility must be non-negative, got {volatility}"
        );
        ensure!(
            risk_free_rate.is_finite() && dividend_yield.is_finite(),
            "rates must be finite"
        );
        Ok(Self {
            spot,
            risk_free_rate,
            dividend_yield,
            volatility,
        })
    }

    /// Black-Scholes process without dividends.
    pub fn without_dividends(spot: Real, risk_free_rate: Rate, volatility: Volatility) -> Result<Self> {
        Self::new(spot, risk_free_rate, 0.0, volatility)
    }

    /// Current spot price.
    pub fn spot(&self) -> Real {
        self.spot
    }

    /// Risk-free rate.
    pub fn risk_free_rate(&self) -> Rate {
        self.risk_free_rate
    }

    /// Dividend yield.
    pub fn dividend_yield(&self) -> Rate {
        self.dividend_yield
    }

    /// Black volatility.
    pub fn volatility(&self) -> Volatility {
        self.volatility
    }

    /// Continuously compounded forward rate over `[t1, t2]`.
    pub fn forward_rate(&self, _t1: Time, _t2: Time) -> Rate {
        self.risk_free_rate
    }

    /// Continuously compounded forward dividend yield over `[t1, t2]`.
    pub fn dividend_forward_rate(&self, _t1: Time, _t2: Time) -> Rate {
        self.dividend_yield
    }

    /// Forward Black variance over `[t1, t2]`.
    pub fn black_forward_variance(&self, t1: Time, t2: Time) -> Real {
        self.volatility * self.volatility * (t2 - t1)
    }

    /// Black variance to `t`.
    pub fn black_variance(&self, t: Time) -> Real {
        self.black_forward_variance(0.0, t)
    }

    /// Risk-free discount factor to `t`.
    pub fn discount(&self, t: Time) -> DiscountFactor {
        (-self.risk_free_rate * t).exp()
    }

    /// Dividend discount factor to `t`.
    pub fn dividend_discount(&self, t: Time) -> DiscountFactor {
        (-self.dividend_yield * t).exp()
    }

    /// Forward price of the underlying at `t`.
    pub fn forward(&self, t: Time) -> Real {
        self.spot * self.dividend_discount(t) / self.discount(t)
    }

    /// Copy with the spot replaced, for bump-and-revalue sensitivities.
    pub fn with_spot(&self, spot: Real) -> Result<Self> {
        Self::new(spot, self.risk_free_rate, self.dividend_yield, self.volatility)
    }

    /// Copy with the volatility replaced.
    pub fn with_volatility(&self, volatility: Volatility) -> Result<Self> {
        Self::new(self.spot, self.risk_free_rate, self.dividend_yield, volatility)
    }
}

impl StochasticProcess1D for BlackScholesMertonProcess {
    /// Log of the spot.
    fn x0(&self) -> Real {
        self.spot.ln()
    }

    fn drift(&self, _t: Time, _x: Real) -> Real {
        self.risk_free_rate - self.dividend_yield - 0.5 * self.volatility * self.volatility
    }

    fn diffusion(&self, _t: Time, _x: Real) -> Real {
        self.volatility
    }
}
