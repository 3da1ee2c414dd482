//! Direct sum of fixed per-direction operators.

use std::sync::Arc;

use ql_core::{ensure_config, errors::Result, Real, Size, Time};
use ql_math::Array;

use super::{FdmLinearOpComposite, TripleBandLinearOp};
use crate::finite_differences::meshers::FdmMesher;

/// Time-independent composite `L = L₀ + L₁ + …` with `L_i` acting along
/// direction `i`.
#[derive(Debug, Clone)]
pub struct FdmSplitOp {
    mesher: Arc<FdmMesher>,
    ops: Vec<TripleBandLinearOp>,
}

impl FdmSplitOp {
    /// Combine one operator per mesh direction, given in direction order.
    ///
    /// # Errors
    /// `Error::Configuration` unless `ops[i]` acts along direction `i` of a
    /// common mesh with exactly `ops.len()` dimensions.
    pub fn new(ops: Vec<TripleBandLinearOp>) -> Result<Self> {
        ensure_config!(!ops.is_empty(), "a split operator needs at least one direction");
        let mesher = ops[0].mesher().clone();
        ensure_config!(
            mesher.dimensions() == ops.len(),
            "expected {} directional operators, got {}",
            mesher.dimensions(),
            ops.len()
        );
        for (i, op) in ops.iter().enumerate() {
            ensure_config!(op.direction() == i, "operator {i} acts along direction {}", op.direction());
            ensure_config!(
                Arc::ptr_eq(op.mesher(), &mesher) || **op.mesher() == *mesher,
                "operator {i} lives on a different mesh"
            );
        }
        Ok(Self { mesher, ops })
    }

    fn op(&self, direction: Size) -> Result<&TripleBandLinearOp> {
        self.mesher.layout().check_direction(direction)?;
        Ok(&self.ops[direction])
    }
}

impl FdmLinearOpComposite for FdmSplitOp {
    fn directions(&self) -> Size {
        self.ops.len()
    }

    fn mesher(&self) -> &Arc<FdmMesher> {
        &self.mesher
    }

    fn set_time(&mut self, _t1: Time, _t2: Time) -> Result<()> {
        Ok(())
    }

    fn apply(&self, r: &Array) -> Result<Array> {
        let mut out = Array::zeros(r.size());
        for op in &self.ops {
            out += &op.apply(r)?;
        }
        Ok(out)
    }

    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array> {
        self.op(direction)?.apply(r)
    }

    fn solve_splitting(&self, direction: Size, r: &Array, a: Real) -> Result<Array> {
        self.op(direction)?.solve_splitting(r, a, 1.0)
    }

    fn band(&self, direction: Size) -> Result<TripleBandLinearOp> {
        Ok(self.op(direction)?.clone())
    }

    fn clone_box(&self) -> Box<dyn FdmLinearOpComposite> {
        Box::new(self.clone())
    }
}
