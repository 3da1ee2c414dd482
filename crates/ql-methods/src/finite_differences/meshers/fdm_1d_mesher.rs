//! One-dimensional meshers (translates `ql/methods/finitedifferences/meshers/`
//! `fdm1dmesher.hpp`, `uniform1dmesher.hpp`, `predefined1dmesher.hpp`,
//! `concentrating1dmesher.hpp` and `glued1dmesher.hpp`).

use ql_core::{ensure_config, errors::Error, errors::Result, Real, Size};
use ql_math::is_strictly_increasing;
use tracing::debug;

/// Strictly increasing grid along one state dimension together with the
/// spacings to the neighbouring nodes.
///
/// Corresponds to `QuantLib::Fdm1dMesher`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fdm1dMesher {
    locations: Vec<Real>,
    dplus: Vec<Option<Real>>,
    dminus: Vec<Option<Real>>,
}

impl Fdm1dMesher {
    /// Mesher over caller supplied locations.
    ///
    /// # Errors
    /// `Error::Configuration` for fewer than two points or locations that are
    /// not finite and strictly increasing.
    pub fn predefined(locations: Vec<Real>) -> Result<Self> {
        ensure_config!(
            locations.len() >= 2,
            "a mesh needs at least 2 points, got {}",
            locations.len()
        );
        ensure_config!(
            is_strictly_increasing(&locations),
            "mesh locations must be finite and strictly increasing"
        );
        let n = locations.len();
        let dplus = (0..n)
            .map(|i| (i + 1 < n).then(|| locations[i + 1] - locations[i]))
            .collect();
        let dminus = (0..n)
            .map(|i| (i > 0).then(|| locations[i] - locations[i - 1]))
            .collect();
        Ok(Self {
            locations,
            dplus,
            dminus,
        })
    }

    /// `size` equally spaced points from `start` to `end`.
    ///
    /// Corresponds to `QuantLib::Uniform1dMesher`.
    pub fn uniform(start: Real, end: Real, size: Size) -> Result<Self> {
        ensure_config!(size >= 2, "a mesh needs at least 2 points, got {size}");
        ensure_config!(
            start.is_finite() && end.is_finite() && start < end,
            "mesh bounds must satisfy start < end, got [{start}, {end}]"
        );
        let dx = (end - start) / (size - 1) as Real;
        let mut locations: Vec<Real> = (0..size).map(|i| start + i as Real * dx).collect();
        locations[size - 1] = end;
        Self::predefined(locations)
    }

    /// Grid on `[start, end]` concentrated around a critical point.
    ///
    /// The nodes follow `c + d·sinh(c1·(1−z) + c2·z)` for equally spaced
    /// `z ∈ [0, 1]`, with `d = density·(end − start)`; small densities put
    /// more nodes near `c`.  Without a critical point the grid is uniform.
    /// When `require_c_point` is set, the interior node nearest to `c` is
    /// moved onto it.
    ///
    /// Corresponds to `QuantLib::Concentrating1dMesher`.
    pub fn concentrating(
        start: Real,
        end: Real,
        size: Size,
        c_point: Option<(Real, Real)>,
        require_c_point: bool,
    ) -> Result<Self> {
        let Some((c, density)) = c_point else {
            return Self::uniform(start, end, size);
        };
        ensure_config!(size >= 2, "a mesh needs at least 2 points, got {size}");
        ensure_config!(
            start.is_finite() && end.is_finite() && start < end,
            "mesh bounds must satisfy start < end, got [{start}, {end}]"
        );
        ensure_config!(
            density > 0.0 && density.is_finite(),
            "concentration density must be positive, got {density}"
        );
        ensure_config!(
            c.is_finite() && (start..=end).contains(&c),
            "critical point {c} lies outside [{start}, {end}]"
        );

        let d = density * (end - start);
        let c1 = ((start - c) / d).asinh();
        let c2 = ((end - c) / d).asinh();
        let dz = 1.0 / (size - 1) as Real;
        let mut locations: Vec<Real> = (0..size)
            .map(|i| {
                let z = i as Real * dz;
                c + d * (c1 * (1.0 - z) + c2 * z).sinh()
            })
            .collect();
        locations[0] = start;
        locations[size - 1] = end;

        if require_c_point && size > 2 && c > start && c < end {
            let nearest = (1..size - 1)
                .min_by(|&a, &b| {
                    (locations[a] - c)
                        .abs()
                        .total_cmp(&(locations[b] - c).abs())
                })
                .unwrap_or(1);
            locations[nearest] = c;
        }
        debug!(size, start, end, c, density, "concentrating mesher");
        Self::predefined(locations)
    }

    /// Concatenation of two meshers.  If the last point of `left` equals the
    /// first point of `right` it appears once in the result.
    ///
    /// Corresponds to `QuantLib::Glued1dMesher`.
    pub fn glued(left: &Fdm1dMesher, right: &Fdm1dMesher) -> Result<Self> {
        let shared = left.locations[left.size() - 1] == right.locations[0];
        let skip = usize::from(shared);
        let locations: Vec<Real> = left
            .locations
            .iter()
            .chain(right.locations.iter().skip(skip))
            .copied()
            .collect();
        ensure_config!(
            is_strictly_increasing(&locations),
            "glued meshes overlap: left ends at {} but right starts at {}",
            left.locations[left.size() - 1],
            right.locations[0]
        );
        Self::predefined(locations)
    }

    /// Number of nodes.
    pub fn size(&self) -> Size {
        self.locations.len()
    }

    /// Node coordinates.
    pub fn locations(&self) -> &[Real] {
        &self.locations
    }

    /// Coordinate of node `i`.
    pub fn location(&self, i: Size) -> Result<Real> {
        self.locations.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.size(),
        })
    }

    /// Spacing to the right neighbour, `x[i+1] − x[i]`.
    ///
    /// # Errors
    /// `Error::Range` for the last node, `Error::IndexOutOfRange` past the end.
    pub fn dplus(&self, i: Size) -> Result<Real> {
        self.spacing_plus(i)?
            .ok_or_else(|| Error::Range(format!("node {i} is the last node and has no right neighbour")))
    }

    /// Spacing to the left neighbour, `x[i] − x[i−1]`.
    ///
    /// # Errors
    /// `Error::Range` for node 0, `Error::IndexOutOfRange` past the end.
    pub fn dminus(&self, i: Size) -> Result<Real> {
        self.spacing_minus(i)?
            .ok_or_else(|| Error::Range(format!("node {i} is the first node and has no left neighbour")))
    }

    /// Right spacing, `None` at the upper edge.
    pub fn spacing_plus(&self, i: Size) -> Result<Option<Real>> {
        self.dplus.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.size(),
        })
    }

    /// Left spacing, `None` at the lower edge.
    pub fn spacing_minus(&self, i: Size) -> Result<Option<Real>> {
        self.dminus.get(i).copied().ok_or(Error::IndexOutOfRange {
            index: i,
            size: self.size(),
        })
    }

    /// Index of the node closest to `x`.
    pub fn nearest_index(&self, x: Real) -> Size {
        let i = self.locations.partition_point(|&v| v < x);
        if i == 0 {
            0
        } else if i >= self.size() {
            self.size() - 1
        } else if (x - self.locations[i - 1]) <= (self.locations[i] - x) {
            i - 1
        } else {
            i
        }
    }
}
