//! Multi-dimensional mesher as a tensor product of 1D meshers
//! (translates `ql/methods/finitedifferences/meshers/fdmmeshercomposite.hpp`).

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size};
use ql_math::Array;

use super::Fdm1dMesher;
use crate::finite_differences::operators::FdmLinearOpLayout;

/// Product grid of one [`Fdm1dMesher`] per dimension.
///
/// Corresponds to `QuantLib::FdmMesherComposite`.
#[derive(Debug, Clone, PartialEq)]
pub struct FdmMesher {
    layout: FdmLinearOpLayout,
    meshers: Vec<Arc<Fdm1dMesher>>,
}

impl FdmMesher {
    /// Combine per-dimension meshers; the first one runs fastest in storage.
    pub fn new(meshers: Vec<Arc<Fdm1dMesher>>) -> Result<Self> {
        let layout = FdmLinearOpLayout::new(meshers.iter().map(|m| m.size()).collect())?;
        Ok(Self { layout, meshers })
    }

    /// Single-dimension mesher.
    pub fn from_1d(mesher: Fdm1dMesher) -> Result<Self> {
        Self::new(vec![Arc::new(mesher)])
    }

    /// Storage layout.
    pub fn layout(&self) -> &FdmLinearOpLayout {
        &self.layout
    }

    /// Total number of grid points.
    pub fn size(&self) -> Size {
        self.layout.size()
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> Size {
        self.meshers.len()
    }

    /// The 1D mesher along `direction`.
    pub fn mesher(&self, direction: Size) -> Result<&Fdm1dMesher> {
        self.layout.check_direction(direction)?;
        Ok(&self.meshers[direction])
    }

    /// State coordinate of grid point `index` along `direction`.
    pub fn location(&self, index: Size, direction: Size) -> Result<Real> {
        self.layout.check_index(index)?;
        self.mesher(direction)?
            .location(self.layout.coordinate(index, direction))
    }

    /// Coordinates along `direction` for every grid point, in storage order.
    pub fn locations(&self, direction: Size) -> Result<Array> {
        let m = self.mesher(direction)?;
        Ok(Array::from_fn(self.size(), |i| {
            m.locations()[self.layout.coordinate(i, direction)]
        }))
    }

    /// Right spacing of grid point `index` along `direction`.
    pub fn dplus(&self, index: Size, direction: Size) -> Result<Real> {
        self.layout.check_index(index)?;
        self.mesher(direction)?
            .dplus(self.layout.coordinate(index, direction))
    }

    /// Left spacing of grid point `index` along `direction`.
    pub fn dminus(&self, index: Size, direction: Size) -> Result<Real> {
        self.layout.check_index(index)?;
        self.mesher(direction)?
            .dminus(self.layout.coordinate(index, direction))
    }

    /// `(left, right)` spacings of `index` along `direction`; `None` on the
    /// side where the point sits on the grid edge.
    pub fn spacings(&self, index: Size, direction: Size) -> Result<(Option<Real>, Option<Real>)> {
        self.layout.check_index(index)?;
        let m = self.mesher(direction)?;
        let c = self.layout.coordinate(index, direction);
        Ok((m.spacing_minus(c)?, m.spacing_plus(c)?))
    }
}
