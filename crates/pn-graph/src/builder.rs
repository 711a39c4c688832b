//! Incremental network builder.

use pn_core::{PoreId, ThroatId};

use crate::error::{GraphError, GraphResult};
use crate::graph::{PoreNetwork, Throat};
use crate::validate;

/// Builder for constructing a pore network incrementally.
///
/// Use `add_pore` and `add_throat` to build up the network,
/// then call `build()` to validate and freeze it into an immutable `PoreNetwork`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    pore_count: usize,
    throats: Vec<Throat>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder pre-sized for `throat_capacity` throats.
    pub fn with_capacity(throat_capacity: usize) -> Self {
        Self {
            pore_count: 0,
            throats: Vec::with_capacity(throat_capacity),
        }
    }

    /// Add a pore and return its ID.
    pub fn add_pore(&mut self) -> PoreId {
        let id = PoreId::from_index(self.pore_count as u32);
        self.pore_count += 1;
        id
    }

    /// Add `count` pores and return their IDs in order.
    pub fn add_pores(&mut self, count: usize) -> Vec<PoreId> {
        (0..count).map(|_| self.add_pore()).collect()
    }

    /// Add a throat between two pores and return its ID.
    ///
    /// Endpoints are checked in `build()`; self-loops and dangling pores are rejected there.
    pub fn add_throat(&mut self, a: PoreId, b: PoreId) -> ThroatId {
        let id = ThroatId::from_index(self.throats.len() as u32);
        self.throats.push(Throat { id, pores: [a, b] });
        id
    }

    /// Number of pores added so far.
    pub fn pore_count(&self) -> usize {
        self.pore_count
    }

    /// Build and validate the network, returning an immutable `PoreNetwork`.
    ///
    /// This performs validation and constructs compact adjacency lists.
    pub fn build(self) -> GraphResult<PoreNetwork> {
        if PoreId::try_from_index(self.pore_count).is_none() {
            return Err(GraphError::TooManyEntities { what: "pores" });
        }
        if ThroatId::try_from_index(self.throats.len()).is_none() {
            return Err(GraphError::TooManyEntities { what: "throats" });
        }

        validate::validate_throats(self.pore_count, &self.throats)?;

        let (pore_throat_offsets, pore_throats) =
            Self::build_adjacency(self.pore_count, &self.throats);

        validate::validate_adjacency(
            self.pore_count,
            &self.throats,
            &pore_throat_offsets,
            &pore_throats,
        )?;

        Ok(PoreNetwork {
            pore_count: self.pore_count,
            throats: self.throats,
            pore_throat_offsets,
            pore_throats,
        })
    }

    /// Build compact adjacency lists: for each pore, collect its incident throats.
    ///
    /// Counting sort over endpoints; throats are visited in ID order so each
    /// pore's list comes out sorted.
    fn build_adjacency(pore_count: usize, throats: &[Throat]) -> (Vec<usize>, Vec<ThroatId>) {
        let mut offsets = vec![0usize; pore_count + 1];
        for throat in throats {
            for pore in throat.pores {
                offsets[pore.idx() + 1] += 1;
            }
        }
        for i in 0..pore_count {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets.clone();
        let mut flat = vec![ThroatId::from_index(0); offsets[pore_count]];
        for throat in throats {
            for pore in throat.pores {
                let slot = &mut cursor[pore.idx()];
                flat[*slot] = throat.id;
                *slot += 1;
            }
        }

        (offsets, flat)
    }
}

impl PoreNetwork {
    /// Build a network from a pore count and `(a, b)` index pairs.
    pub fn from_edges(pore_count: usize, edges: &[(u32, u32)]) -> GraphResult<Self> {
        if PoreId::try_from_index(pore_count).is_none() {
            return Err(GraphError::TooManyEntities { what: "pores" });
        }
        let mut builder = NetworkBuilder::with_capacity(edges.len());
        builder.add_pores(pore_count);
        for &(a, b) in edges {
            builder.add_throat(PoreId::from_index(a), PoreId::from_index(b));
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_basic() {
        let mut builder = NetworkBuilder::new();
        let p0 = builder.add_pore();
        let p1 = builder.add_pore();
        let t0 = builder.add_throat(p0, p1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(t0.index(), 0);
        assert_eq!(builder.pore_count(), 2);
        assert_eq!(builder.throats.len(), 1);
    }

    #[test]
    fn builder_build_simple() {
        let mut builder = NetworkBuilder::new();
        let p = builder.add_pores(3);
        builder.add_throat(p[0], p[1]);
        builder.add_throat(p[1], p[2]);

        let network = builder.build().unwrap();
        assert_eq!(network.pore_count(), 3);
        assert_eq!(network.throat_count(), 2);

        assert_eq!(network.pore_throats(p[0]).len(), 1);
        assert_eq!(network.pore_throats(p[1]).len(), 2);
        assert_eq!(network.pore_throats(p[2]).len(), 1);
    }

    #[test]
    fn builder_rejects_self_loop() {
        let mut builder = NetworkBuilder::new();
        let p0 = builder.add_pore();
        builder.add_throat(p0, p0);
        assert!(matches!(builder.build(), Err(GraphError::SelfLoop { .. })));
    }

    #[test]
    fn builder_rejects_dangling_pore() {
        let mut builder = NetworkBuilder::new();
        let p0 = builder.add_pore();
        builder.add_throat(p0, PoreId::from_index(5));
        assert!(matches!(
            builder.build(),
            Err(GraphError::InvalidPoreRef { pore_count: 1, .. })
        ));
    }

    #[test]
    fn from_edges_rejects_oversized_pore_count() {
        assert!(matches!(
            PoreNetwork::from_edges(usize::MAX, &[(0, 1)]),
            Err(GraphError::TooManyEntities { what: "pores" })
        ));
    }

    #[test]
    fn from_edges_matches_builder() {
        let network = PoreNetwork::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]).unwrap();
        assert_eq!(network.throat_count(), 4);
        for pore in network.pore_ids() {
            assert_eq!(network.coordination(pore), 2);
        }
    }
}
