//! Payoff capability objects.
//!
//! Translates `ql/instruments/payoffs.hpp` and `ql/option.hpp` (Option::Type).
//!
//! The finite-difference framework evaluates payoffs at grid coordinates
//! when it builds the terminal condition and the early-exercise floor; it
//! only relies on [`Payoff::value`].

use ql_core::Real;
use std::fmt;
use std::sync::Arc;

/// Option type (call or put).
///
/// Corresponds to `QuantLib::Option::Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    /// A call option (right to buy).
    Call,
    /// A put option (right to sell).
    Put,
}

impl OptionType {
    /// +1 for Call, −1 for Put.
    pub fn sign(self) -> Real {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "Call"),
            OptionType::Put => write!(f, "Put"),
        }
    }
}

/// A payoff evaluated on the underlying state.
///
/// Corresponds to `QuantLib::Payoff`.
pub trait Payoff: fmt::Debug + Send + Sync {
    /// Payoff for the underlying value `price`.
    fn value(&self, price: Real) -> Real;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> String {
        self.name().to_string()
    }
}

/// A payoff depending on a strike price.
///
/// Corresponds to `QuantLib::StrikedTypePayoff`.
pub trait StrikedPayoff: Payoff {
    /// The strike price.
    fn strike(&self) -> Real;

    /// The option type (call / put).
    fn option_type(&self) -> OptionType;
}

/// `max(φ(S − K), 0)` with `φ = +1` for calls and `−1` for puts.
///
/// Corresponds to `QuantLib::PlainVanillaPayoff`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainVanillaPayoff {
    option_type: OptionType,
    strike: Real,
}

impl PlainVanillaPayoff {
    /// Create a new plain vanilla payoff.
    pub fn new(option_type: OptionType, strike: Real) -> Self {
        Self {
            option_type,
            strike,
        }
    }
}

impl Payoff for PlainVanillaPayoff {
    fn value(&self, price: Real) -> Real {
        (self.option_type.sign() * (price - self.strike)).max(0.0)
    }

    fn name(&self) -> &str {
        "Vanilla"
    }

    fn description(&self) -> String {
        format!("{} {} @ {}", self.name(), self.option_type, self.strike)
    }
}

impl StrikedPayoff for PlainVanillaPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }
}

/// Pays `cash` if `φ(S − K) > 0`, nothing otherwise.
///
/// Corresponds to `QuantLib::CashOrNothingPayoff`.
#[derive(Debug, Clone, PartialEq)]
pub struct CashOrNothingPayoff {
    option_type: OptionType,
    strike: Real,
    cash: Real,
}

impl CashOrNothingPayoff {
    /// Create a new cash-or-nothing payoff.
    pub fn new(option_type: OptionType, strike: Real, cash: Real) -> Self {
        Self {
            option_type,
            strike,
            cash,
        }
    }
}

impl Payoff for CashOrNothingPayoff {
    fn value(&self, price: Real) -> Real {
        if self.option_type.sign() * (price - self.strike) > 0.0 {
            self.cash
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "CashOrNothing"
    }
}

impl StrikedPayoff for CashOrNothingPayoff {
    fn strike(&self) -> Real {
        self.strike
    }

    fn option_type(&self) -> OptionType {
        self.option_type
    }
}

/// Arbitrary payoff given by a closure, e.g. a smooth terminal profile for
/// a diffusion problem.
#[derive(Clone)]
pub struct FunctionPayoff {
    name: String,
    f: Arc<dyn Fn(Real) -> Real + Send + Sync>,
}

impl FunctionPayoff {
    /// Wrap `f` under the given name.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            f: Arc::new(f),
        }
    }
}

impl fmt::Debug for FunctionPayoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionPayoff").field("name", &self.name).finish()
    }
}

impl Payoff for FunctionPayoff {
    fn value(&self, price: Real) -> Real {
        (self.f)(price)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
