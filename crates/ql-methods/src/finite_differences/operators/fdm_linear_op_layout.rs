//! Flat storage layout of a multi-dimensional grid
//! (translates `ql/methods/finitedifferences/operators/fdmlinearoplayout.hpp`).
//!
//! A grid with dimensions `(n0, n1, …)` is stored in a single array with the
//! first dimension running fastest:
//!
//! ```text
//! index = c0 + c1·n0 + c2·n0·n1 + …
//! ```

use ql_core::{ensure_config, errors::Error, errors::Result, Size};

/// Bijection between coordinate tuples and flat array offsets.
///
/// Corresponds to `QuantLib::FdmLinearOpLayout`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdmLinearOpLayout {
    dim: Vec<Size>,
    spacing: Vec<Size>,
    size: Size,
}

impl FdmLinearOpLayout {
    /// Create the layout for a grid with the given per-dimension sizes.
    ///
    /// # Errors
    /// `Error::Configuration` if `dim` is empty or contains a zero.
    pub fn new(dim: Vec<Size>) -> Result<Self> {
        ensure_config!(!dim.is_empty(), "a layout needs at least one dimension");
        ensure_config!(
            dim.iter().all(|&d| d > 0),
            "layout dimensions must be positive, got {dim:?}"
        );
        let mut spacing = Vec::with_capacity(dim.len());
        let mut size = 1;
        for &d in &dim {
            spacing.push(size);
            size *= d;
        }
        Ok(Self { dim, spacing, size })
    }

    /// Total number of grid points.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Per-dimension sizes.
    pub fn dim(&self) -> &[Size] {
        &self.dim
    }

    /// Stride of each dimension in the flat array.
    pub fn spacing(&self) -> &[Size] {
        &self.spacing
    }

    /// Number of dimensions.
    pub fn dimensions(&self) -> Size {
        self.dim.len()
    }

    /// Flat index of a coordinate tuple.
    pub fn index(&self, coordinates: &[Size]) -> Result<Size> {
        ensure_config!(
            coordinates.len() == self.dim.len(),
            "expected {} coordinates, got {}",
            self.dim.len(),
            coordinates.len()
        );
        let mut index = 0;
        for ((&c, &d), &s) in coordinates.iter().zip(&self.dim).zip(&self.spacing) {
            if c >= d {
                return Err(Error::IndexOutOfRange { index: c, size: d });
            }
            index += c * s;
        }
        Ok(index)
    }

    /// Coordinate tuple of a flat index.
    pub fn coordinates(&self, index: Size) -> Result<Vec<Size>> {
        self.check_index(index)?;
        Ok((0..self.dim.len())
            .map(|d| self.coordinate(index, d))
            .collect())
    }

    /// Coordinate of `index` along `direction`.
    ///
    /// The index and direction are assumed valid; out-of-range input gives a
    /// meaningless result rather than an error.
    #[inline]
    pub fn coordinate(&self, index: Size, direction: Size) -> Size {
        (index / self.spacing[direction]) % self.dim[direction]
    }

    /// Flat index of the point `offset` steps away from `index` along
    /// `direction`.  Steps past the grid edge are reflected back into the
    /// grid, so the lower neighbour of an edge point is its inner neighbour.
    pub fn neighbourhood(&self, index: Size, direction: Size, offset: isize) -> Result<Size> {
        self.check_index(index)?;
        self.check_direction(direction)?;
        let n = self.dim[direction] as isize;
        let c = self.coordinate(index, direction) as isize;
        let base = index - (c as Size) * self.spacing[direction];
        let mut shifted = c + offset;
        if shifted < 0 {
            shifted = -shifted;
        } else if shifted >= n {
            shifted = 2 * (n - 1) - shifted;
        }
        if shifted < 0 || shifted >= n {
            return Err(Error::Range(format!(
                "offset {offset} from coordinate {c} leaves a dimension of size {n}"
            )));
        }
        Ok(base + shifted as Size * self.spacing[direction])
    }

    /// Iterate over `(index, coordinates)` in storage order.
    pub fn iter(&self) -> FdmLinearOpIterator<'_> {
        FdmLinearOpIterator {
            layout: self,
            index: 0,
            coordinates: vec![0; self.dim.len()],
        }
    }

    /// Flat indices of every grid line along `direction`, each line ordered
    /// by increasing coordinate.
    pub fn lines(&self, direction: Size) -> Result<Vec<Vec<Size>>> {
        self.check_direction(direction)?;
        let n = self.dim[direction];
        let stride = self.spacing[direction];
        Ok((0..self.size)
            .filter(|&i| self.coordinate(i, direction) == 0)
            .map(|start| (0..n).map(|k| start + k * stride).collect())
            .collect())
    }

    pub(crate) fn check_index(&self, index: Size) -> Result<()> {
        if index >= self.size {
            return Err(Error::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok(())
    }

    pub(crate) fn check_direction(&self, direction: Size) -> Result<()> {
        if direction >= self.dim.len() {
            return Err(Error::IndexOutOfRange {
                index: direction,
                size: self.dim.len(),
            });
        }
        Ok(())
    }
}

/// Iterator over the points of a layout in storage order.
///
/// Corresponds to `QuantLib::FdmLinearOpIterator`.
#[derive(Debug, Clone)]
pub struct FdmLinearOpIterator<'a> {
    layout: &'a FdmLinearOpLayout,
    index: Size,
    coordinates: Vec<Size>,
}

impl Iterator for FdmLinearOpIterator<'_> {
    type Item = (Size, Vec<Size>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.layout.size {
            return None;
        }
        let item = (self.index, self.coordinates.clone());
        self.index += 1;
        for (c, &d) in self.coordinates.iter_mut().zip(&self.layout.dim) {
            *c += 1;
            if *c < d {
                break;
            }
            *c = 0;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.layout.size - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for FdmLinearOpIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_coordinates_are_inverse() {
        let layout = FdmLinearOpLayout::new(vec![3, 4, 2]).unwrap();
        assert_eq!(layout.size(), 24);
        assert_eq!(layout.spacing(), &[1, 3, 12]);
        for (i, coords) in layout.iter() {
            assert_eq!(layout.index(&coords).unwrap(), i);
            assert_eq!(layout.coordinates(i).unwrap(), coords);
        }
        assert_eq!(layout.iter().len(), 24);
    }

    #[test]
    fn neighbourhood_reflects_at_edges() {
        let layout = FdmLinearOpLayout::new(vec![5, 3]).unwrap();
        let i = layout.index(&[0, 1]).unwrap();
        assert_eq!(layout.neighbourhood(i, 0, 1).unwrap(), layout.index(&[1, 1]).unwrap());
        assert_eq!(layout.neighbourhood(i, 0, -1).unwrap(), layout.index(&[1, 1]).unwrap());
        let j = layout.index(&[4, 2]).unwrap();
        assert_eq!(layout.neighbourhood(j, 1, 1).unwrap(), layout.index(&[4, 1]).unwrap());
        assert_eq!(layout.neighbourhood(j, 1, -1).unwrap(), layout.index(&[4, 1]).unwrap());
    }

    #[test]
    fn lines_follow_direction() {
        let layout = FdmLinearOpLayout::new(vec![3, 2]).unwrap();
        assert_eq!(layout.lines(0).unwrap(), vec![vec![0, 1, 2], vec![3, 4, 5]]);
        assert_eq!(layout.lines(1).unwrap(), vec![vec![0, 3], vec![1, 4], vec![2, 5]]);
    }

    #[test]
    fn out_of_range_access() {
        let layout = FdmLinearOpLayout::new(vec![3, 2]).unwrap();
        assert_eq!(
            layout.coordinates(6),
            Err(Error::IndexOutOfRange { index: 6, size: 6 })
        );
        assert!(layout.index(&[3, 0]).is_err());
        assert!(layout.index(&[0]).is_err());
        assert!(layout.neighbourhood(0, 2, 1).is_err());
        assert!(FdmLinearOpLayout::new(vec![]).is_err());
        assert!(FdmLinearOpLayout::new(vec![3, 0]).is_err());
    }
}
