//! Boundary conditions on the edges of a mesh direction
//! (translates `ql/methods/finitedifferences/boundarycondition.hpp` and
//! `ql/methods/finitedifferences/bcset.hpp`).
//!
//! A condition acts on every grid line along its direction, at either the
//! lower or the upper edge.  Schemes call four hooks around the explicit
//! and implicit parts of a step:
//!
//! | hook | Dirichlet | Neumann |
//! |---|---|---|
//! | [`before_applying`](BoundaryCondition::before_applying) | edge row `(0, 1, 0)` | `(0, −1, 1)` lower, `(−1, 1, 0)` upper |
//! | [`after_applying`](BoundaryCondition::after_applying) | `a[edge] = v` | `a[edge] = a[inner] ∓ v` |
//! | [`before_solving`](BoundaryCondition::before_solving) | row as above, `rhs[edge] = v` | row as above, `rhs[edge] = v` |
//! | [`after_solving`](BoundaryCondition::after_solving) | `a[edge] = v` | nothing |
//!
//! The Neumann value is the difference `a[inner] − a[edge]` at the lower
//! edge and `a[edge] − a[inner]` at the upper edge, i.e. the derivative
//! already multiplied by the edge spacing.

use std::fmt;
use std::sync::Arc;

use ql_core::{
    ensure_config,
    errors::{Error, Result},
    Real, Size, Time,
};
use ql_math::Array;

use super::meshers::FdmMesher;
use super::operators::TripleBandLinearOp;

/// Kind of boundary condition.
///
/// Corresponds to `QuantLib::BoundaryCondition::Type` (without the
/// periodic variant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundaryConditionType {
    /// Leave the edge to the operator.
    None,
    /// Prescribed edge difference.
    Neumann,
    /// Prescribed edge value.
    Dirichlet,
}

/// Which edge of a direction a condition sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BoundarySide {
    /// First node of every line.
    Lower,
    /// Last node of every line.
    Upper,
}

type ValueFn = Arc<dyn Fn(Time) -> Real + Send + Sync>;

/// A boundary condition on one edge of one mesh direction.
#[derive(Clone)]
pub struct BoundaryCondition {
    kind: BoundaryConditionType,
    side: BoundarySide,
    direction: Size,
    rows: Vec<(Size, Size)>,
    value: Real,
    value_fn: Option<ValueFn>,
}

/// The boundary conditions handed to a scheme.
pub type BoundaryConditionSet = Vec<BoundaryCondition>;

impl BoundaryCondition {
    /// Condition of the given kind on `side` of `direction`.
    ///
    /// # Errors
    /// `Error::InvalidArgument` if a Neumann or Dirichlet condition is given
    /// no finite value; `Error::IndexOutOfRange` for an unknown direction.
    pub fn new(
        kind: BoundaryConditionType,
        side: BoundarySide,
        value: Option<Real>,
        direction: Size,
        mesher: &Arc<FdmMesher>,
    ) -> Result<Self> {
        let value = match (kind, value) {
            (BoundaryConditionType::None, v) => v.unwrap_or(0.0),
            (_, Some(v)) if v.is_finite() => v,
            (_, v) => {
                return Err(Error::InvalidArgument(format!(
                    "{kind:?} condition needs a finite value, got {v:?}"
                )))
            }
        };
        let rows = mesher
            .layout()
            .lines(direction)?
            .into_iter()
            .map(|line| {
                let n = line.len();
                match side {
                    BoundarySide::Lower => (line[0], line[1]),
                    BoundarySide::Upper => (line[n - 1], line[n - 2]),
                }
            })
            .collect();
        Ok(Self {
            kind,
            side,
            direction,
            rows,
            value,
            value_fn: None,
        })
    }

    /// Dirichlet condition `a[edge] = value`.
    pub fn dirichlet(side: BoundarySide, value: Real, direction: Size, mesher: &Arc<FdmMesher>) -> Result<Self> {
        Self::new(BoundaryConditionType::Dirichlet, side, Some(value), direction, mesher)
    }

    /// Neumann condition on the edge difference.
    pub fn neumann(side: BoundarySide, value: Real, direction: Size, mesher: &Arc<FdmMesher>) -> Result<Self> {
        Self::new(BoundaryConditionType::Neumann, side, Some(value), direction, mesher)
    }

    /// A condition that does nothing.
    pub fn none(side: BoundarySide, direction: Size, mesher: &Arc<FdmMesher>) -> Result<Self> {
        Self::new(BoundaryConditionType::None, side, None, direction, mesher)
    }

    /// Replace the constant value by `f(t)`, evaluated at every
    /// [`set_time`](Self::set_time).
    pub fn with_time_dependent_value<F>(mut self, f: F) -> Self
    where
        F: Fn(Time) -> Real + Send + Sync + 'static,
    {
        self.value_fn = Some(Arc::new(f));
        self
    }

    /// Kind of condition.
    pub fn kind(&self) -> BoundaryConditionType {
        self.kind
    }

    /// Edge the condition sits on.
    pub fn side(&self) -> BoundarySide {
        self.side
    }

    /// Mesh direction of the condition.
    pub fn direction(&self) -> Size {
        self.direction
    }

    /// Current value.
    pub fn value(&self) -> Real {
        self.value
    }

    /// Evaluate a time-dependent value at `t`.
    ///
    /// # Errors
    /// `Error::Numerical` if the value function returns a non-finite number.
    pub fn set_time(&mut self, t: Time) -> Result<()> {
        if let Some(f) = &self.value_fn {
            let v = f(t);
            if !v.is_finite() {
                return Err(Error::Numerical(format!(
                    "non-finite boundary value {v} at t={t}"
                )));
            }
            self.value = v;
        }
        Ok(())
    }

    fn edge_row(&self) -> (Real, Real, Real) {
        match (self.kind, self.side) {
            (BoundaryConditionType::Neumann, BoundarySide::Lower) => (0.0, -1.0, 1.0),
            (BoundaryConditionType::Neumann, BoundarySide::Upper) => (-1.0, 1.0, 0.0),
            _ => (0.0, 1.0, 0.0),
        }
    }

    fn acts_on(&self, op: &TripleBandLinearOp) -> bool {
        self.kind != BoundaryConditionType::None && op.direction() == self.direction
    }

    /// Adjust the edge rows of an operator about to be applied.
    pub fn before_applying(&self, op: &mut TripleBandLinearOp) -> Result<()> {
        if !self.acts_on(op) {
            return Ok(());
        }
        let (l, d, u) = self.edge_row();
        for &(edge, _) in &self.rows {
            op.set_row(edge, l, d, u)?;
        }
        Ok(())
    }

    /// Fix the edge values of an array the operator was just applied to.
    pub fn after_applying(&self, a: &mut Array) {
        match self.kind {
            BoundaryConditionType::None => {}
            BoundaryConditionType::Dirichlet => self.set_edges(a),
            BoundaryConditionType::Neumann => {
                let v = match self.side {
                    BoundarySide::Lower => -self.value,
                    BoundarySide::Upper => self.value,
                };
                for &(edge, inner) in &self.rows {
                    a[edge] = a[inner] + v;
                }
            }
        }
    }

    /// Adjust the edge rows and right-hand side of a system about to be
    /// solved.
    pub fn before_solving(&self, op: &mut TripleBandLinearOp, rhs: &mut Array) -> Result<()> {
        if !self.acts_on(op) {
            return Ok(());
        }
        let (l, d, u) = self.edge_row();
        for &(edge, _) in &self.rows {
            op.set_row(edge, l, d, u)?;
            rhs[edge] = self.value;
        }
        Ok(())
    }

    /// Fix the edge values of a freshly solved array.
    pub fn after_solving(&self, a: &mut Array) {
        if self.kind == BoundaryConditionType::Dirichlet {
            self.set_edges(a);
        }
    }

    fn set_edges(&self, a: &mut Array) {
        for &(edge, _) in &self.rows {
            a[edge] = self.value;
        }
    }
}

impl fmt::Debug for BoundaryCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundaryCondition")
            .field("kind", &self.kind)
            .field("side", &self.side)
            .field("direction", &self.direction)
            .field("value", &self.value)
            .field("time_dependent", &self.value_fn.is_some())
            .finish()
    }
}

/// Reject sets with two active conditions on the same edge.
pub fn validate(conditions: &[BoundaryCondition]) -> Result<()> {
    for (i, a) in conditions.iter().enumerate() {
        for b in &conditions[i + 1..] {
            ensure_config!(
                a.kind == BoundaryConditionType::None
                    || b.kind == BoundaryConditionType::None
                    || a.direction != b.direction
                    || a.side != b.side,
                "two boundary conditions on the {:?} edge of direction {}",
                a.side,
                a.direction
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Fdm1dMesher;

    fn mesher() -> Arc<FdmMesher> {
        Arc::new(FdmMesher::from_1d(Fdm1dMesher::uniform(0.0, 1.0, 6).unwrap()).unwrap())
    }

    #[test]
    fn dirichlet_is_idempotent() {
        let m = mesher();
        let bc = BoundaryCondition::dirichlet(BoundarySide::Upper, 2.5, 0, &m).unwrap();
        let mut a = Array::from_fn(6, |i| i as Real);
        bc.after_solving(&mut a);
        let once = a.clone();
        bc.after_solving(&mut a);
        bc.after_applying(&mut a);
        assert_eq!(a, once);
        assert_eq!(a[5], 2.5);
        assert_eq!(a[0], 0.0);
    }

    #[test]
    fn neumann_sets_edge_difference() {
        let m = mesher();
        let lower = BoundaryCondition::neumann(BoundarySide::Lower, 0.1, 0, &m).unwrap();
        let upper = BoundaryCondition::neumann(BoundarySide::Upper, 0.2, 0, &m).unwrap();
        let mut a = Array::from_element(6, 1.0);
        lower.after_applying(&mut a);
        upper.after_applying(&mut a);
        assert!((a[1] - a[0] - 0.1).abs() < 1e-15);
        assert!((a[5] - a[4] - 0.2).abs() < 1e-15);
        let before = a.clone();
        lower.after_solving(&mut a);
        assert_eq!(a, before);
    }

    #[test]
    fn solving_honours_the_edge_rows() {
        let m = mesher();
        let mut op = TripleBandLinearOp::second_derivative(0, m.clone())
            .unwrap()
            .scaled_plus_identity(-0.01);
        let mut rhs = Array::from_element(6, 1.0);
        let bcs = [
            BoundaryCondition::dirichlet(BoundarySide::Lower, 3.0, 0, &m).unwrap(),
            BoundaryCondition::neumann(BoundarySide::Upper, 0.5, 0, &m).unwrap(),
        ];
        for bc in &bcs {
            bc.before_solving(&mut op, &mut rhs).unwrap();
        }
        let x = op.solve_for(&rhs).unwrap();
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[5] - x[4] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn values_must_be_finite() {
        let m = mesher();
        let err = BoundaryCondition::new(BoundaryConditionType::Dirichlet, BoundarySide::Lower, None, 0, &m);
        assert!(matches!(err, Err(Error::InvalidArgument(_))));
        assert!(BoundaryCondition::neumann(BoundarySide::Lower, Real::NAN, 0, &m).is_err());
        assert!(BoundaryCondition::none(BoundarySide::Lower, 0, &m).is_ok());
        assert!(BoundaryCondition::none(BoundarySide::Lower, 1, &m).is_err());
    }

    #[test]
    fn time_dependent_value() {
        let m = mesher();
        let mut bc = BoundaryCondition::dirichlet(BoundarySide::Lower, 0.0, 0, &m)
            .unwrap()
            .with_time_dependent_value(|t| 2.0 * t);
        bc.set_time(0.75).unwrap();
        assert_eq!(bc.value(), 1.5);
        let mut bad = bc.with_time_dependent_value(|_| Real::INFINITY);
        assert!(bad.set_time(0.0).unwrap_err().is_numerical());
    }

    #[test]
    fn colliding_conditions_are_rejected() {
        let m = mesher();
        let a = BoundaryCondition::dirichlet(BoundarySide::Lower, 0.0, 0, &m).unwrap();
        let b = BoundaryCondition::neumann(BoundarySide::Lower, 0.0, 0, &m).unwrap();
        let c = BoundaryCondition::neumann(BoundarySide::Upper, 0.0, 0, &m).unwrap();
        assert!(validate(&[a.clone(), c]).is_ok());
        assert!(validate(&[a, b]).unwrap_err().is_configuration());
    }
}
