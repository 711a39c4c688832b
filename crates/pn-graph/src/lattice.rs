//! Cubic lattice networks.
//!
//! Pores sit on a regular `nx × ny × nz` grid and each pore is joined to its
//! axis-aligned neighbours (6-connectivity; 4 in 2D when `nz == 1`). Pore
//! `(x, y, z)` has index `x + nx * (y + ny * z)`.

use std::fmt;

use pn_core::{PoreId, ThroatId};

use crate::builder::NetworkBuilder;
use crate::error::{GraphError, GraphResult};
use crate::graph::PoreNetwork;

/// A boundary face of a cubic lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// x = 0
    Front,
    /// x = nx - 1
    Back,
    /// y = 0
    Left,
    /// y = ny - 1
    Right,
    /// z = 0
    Bottom,
    /// z = nz - 1
    Top,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Bottom,
        Face::Top,
    ];

    /// The face on the other side of the lattice.
    pub fn opposite(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Bottom => Face::Top,
            Face::Top => Face::Bottom,
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Left => "left",
            Face::Right => "right",
            Face::Bottom => "bottom",
            Face::Top => "top",
        };
        write!(f, "{name}")
    }
}

/// A cubic lattice network together with its shape.
#[derive(Debug, Clone)]
pub struct CubicLattice {
    shape: [usize; 3],
    network: PoreNetwork,
}

impl CubicLattice {
    /// Generate a lattice of the given `[nx, ny, nz]` shape.
    pub fn new(shape: [usize; 3]) -> GraphResult<Self> {
        if shape.contains(&0) {
            return Err(GraphError::InvalidShape {
                shape,
                what: "every dimension must be at least 1",
            });
        }
        let [nx, ny, nz] = shape;
        let pore_count = nx
            .checked_mul(ny)
            .and_then(|v| v.checked_mul(nz))
            .filter(|&n| PoreId::try_from_index(n).is_some())
            .ok_or(GraphError::TooManyEntities { what: "pores" })?;
        let throat_count = Self::throat_count(shape)
            .filter(|&n| ThroatId::try_from_index(n).is_some())
            .ok_or(GraphError::TooManyEntities { what: "throats" })?;

        // Counts fit u32 ids from here on, so index casts cannot truncate
        let mut builder = NetworkBuilder::with_capacity(throat_count);
        builder.add_pores(pore_count);

        let index = |x: usize, y: usize, z: usize| PoreId::from_index((x + nx * (y + ny * z)) as u32);

        // x-direction throats, then y, then z
        for z in 0..nz {
            for y in 0..ny {
                for x in 0..nx.saturating_sub(1) {
                    builder.add_throat(index(x, y, z), index(x + 1, y, z));
                }
            }
        }
        for z in 0..nz {
            for y in 0..ny.saturating_sub(1) {
                for x in 0..nx {
                    builder.add_throat(index(x, y, z), index(x, y + 1, z));
                }
            }
        }
        for z in 0..nz.saturating_sub(1) {
            for y in 0..ny {
                for x in 0..nx {
                    builder.add_throat(index(x, y, z), index(x, y, z + 1));
                }
            }
        }

        Ok(Self {
            shape,
            network: builder.build()?,
        })
    }

    /// Throats of a 6-connected lattice, or `None` on overflow.
    fn throat_count([nx, ny, nz]: [usize; 3]) -> Option<usize> {
        let along_x = nx.saturating_sub(1).checked_mul(ny)?.checked_mul(nz)?;
        let along_y = nx.checked_mul(ny.saturating_sub(1))?.checked_mul(nz)?;
        let along_z = nx.checked_mul(ny)?.checked_mul(nz.saturating_sub(1))?;
        along_x.checked_add(along_y)?.checked_add(along_z)
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn network(&self) -> &PoreNetwork {
        &self.network
    }

    pub fn into_network(self) -> PoreNetwork {
        self.network
    }

    /// Pore at grid coordinates, or `None` outside the lattice.
    pub fn pore_at(&self, x: usize, y: usize, z: usize) -> Option<PoreId> {
        let [nx, ny, nz] = self.shape;
        if x >= nx || y >= ny || z >= nz {
            return None;
        }
        Some(PoreId::from_index((x + nx * (y + ny * z)) as u32))
    }

    /// Grid coordinates of a pore.
    pub fn coords(&self, pore: PoreId) -> Option<[usize; 3]> {
        let [nx, ny, _] = self.shape;
        let i = pore.idx();
        if i >= self.network.pore_count() {
            return None;
        }
        Some([i % nx, (i / nx) % ny, i / (nx * ny)])
    }

    /// Pores lying on a boundary face, in index order.
    pub fn face_pores(&self, face: Face) -> Vec<PoreId> {
        let [nx, ny, nz] = self.shape;
        let on_face = |[x, y, z]: [usize; 3]| match face {
            Face::Front => x == 0,
            Face::Back => x == nx - 1,
            Face::Left => y == 0,
            Face::Right => y == ny - 1,
            Face::Bottom => z == 0,
            Face::Top => z == nz - 1,
        };
        self.network
            .pore_ids()
            .filter(|&p| self.coords(p).is_some_and(on_face))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_2d_counts() {
        let lattice = CubicLattice::new([5, 5, 1]).unwrap();
        let net = lattice.network();
        assert_eq!(net.pore_count(), 25);
        // 5 rows of 4 throats in each direction
        assert_eq!(net.throat_count(), 40);
    }

    #[test]
    fn lattice_3d_counts() {
        let lattice = CubicLattice::new([3, 4, 5]).unwrap();
        let net = lattice.network();
        assert_eq!(net.pore_count(), 60);
        assert_eq!(net.throat_count(), 2 * 4 * 5 + 3 * 3 * 5 + 3 * 4 * 4);
    }

    #[test]
    fn coordination_interior_and_corner() {
        let lattice = CubicLattice::new([3, 3, 3]).unwrap();
        let net = lattice.network();
        let centre = lattice.pore_at(1, 1, 1).unwrap();
        let corner = lattice.pore_at(0, 0, 0).unwrap();
        assert_eq!(net.coordination(centre), 6);
        assert_eq!(net.coordination(corner), 3);
    }

    #[test]
    fn faces_have_expected_sizes() {
        let lattice = CubicLattice::new([3, 4, 5]).unwrap();
        assert_eq!(lattice.face_pores(Face::Front).len(), 20);
        assert_eq!(lattice.face_pores(Face::Back).len(), 20);
        assert_eq!(lattice.face_pores(Face::Left).len(), 15);
        assert_eq!(lattice.face_pores(Face::Right).len(), 15);
        assert_eq!(lattice.face_pores(Face::Bottom).len(), 12);
        assert_eq!(lattice.face_pores(Face::Top).len(), 12);
    }

    #[test]
    fn coords_round_trip() {
        let lattice = CubicLattice::new([4, 3, 2]).unwrap();
        for pore in lattice.network().pore_ids() {
            let [x, y, z] = lattice.coords(pore).unwrap();
            assert_eq!(lattice.pore_at(x, y, z), Some(pore));
        }
    }

    #[test]
    fn zero_dimension_rejected() {
        assert!(matches!(
            CubicLattice::new([4, 0, 1]),
            Err(GraphError::InvalidShape { .. })
        ));
    }

    #[test]
    fn oversized_shape_rejected_before_allocation() {
        assert!(matches!(
            CubicLattice::new([1 << 31, 4, 1]),
            Err(GraphError::TooManyEntities { what: "pores" })
        ));
        assert!(matches!(
            CubicLattice::new([usize::MAX, 2, 1]),
            Err(GraphError::TooManyEntities { what: "pores" })
        ));
        // ~3.2e9 pores fit a u32 id, ~5.4e9 throats do not
        assert!(matches!(
            CubicLattice::new([1 << 30, 3, 1]),
            Err(GraphError::TooManyEntities { what: "throats" })
        ));
    }

    #[test]
    fn throat_count_matches_generated() {
        for shape in [[1, 1, 1], [5, 1, 1], [3, 4, 5]] {
            let lattice = CubicLattice::new(shape).unwrap();
            assert_eq!(
                CubicLattice::throat_count(shape),
                Some(lattice.network().throat_count())
            );
        }
    }

    #[test]
    fn opposite_faces() {
        for face in Face::ALL {
            assert_eq!(face.opposite().opposite(), face);
            assert_ne!(face.opposite(), face);
        }
    }
}
