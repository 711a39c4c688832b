//! Core graph data structures.

use pn_core::{PoreId, ThroatId};

/// A throat connects exactly two distinct pores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throat {
    pub id: ThroatId,
    pub pores: [PoreId; 2],
}

impl Throat {
    /// First endpoint.
    pub fn head(&self) -> PoreId {
        self.pores[0]
    }

    /// Second endpoint.
    pub fn tail(&self) -> PoreId {
        self.pores[1]
    }

    /// The endpoint opposite `pore`, or `None` if `pore` is not an endpoint.
    pub fn other(&self, pore: PoreId) -> Option<PoreId> {
        if self.pores[0] == pore {
            Some(self.pores[1])
        } else if self.pores[1] == pore {
            Some(self.pores[0])
        } else {
            None
        }
    }
}

/// The pore network: a validated, immutable set of pores and throats.
///
/// Pores are the contiguous range `0..pore_count`; they carry no data here.
/// Per-pore and per-throat properties (entry pressures, volumes) live in
/// parallel arrays owned by the caller and indexed by `PoreId::idx()` /
/// `ThroatId::idx()`.
#[derive(Debug, Clone)]
pub struct PoreNetwork {
    pub(crate) pore_count: usize,
    pub(crate) throats: Vec<Throat>,

    /// Offsets for pore->throat adjacency: pore i's throats are in pore_throats[offsets[i]..offsets[i+1]].
    pub(crate) pore_throat_offsets: Vec<usize>,

    /// Flat list of throat IDs incident to pores (sorted by pore then throat for determinism).
    pub(crate) pore_throats: Vec<ThroatId>,
}

impl PoreNetwork {
    /// Number of pores.
    pub fn pore_count(&self) -> usize {
        self.pore_count
    }

    /// Number of throats.
    pub fn throat_count(&self) -> usize {
        self.throats.len()
    }

    /// Return all throats.
    pub fn throats(&self) -> &[Throat] {
        &self.throats
    }

    /// Get a throat by ID (returns None if ID out of bounds).
    pub fn throat(&self, id: ThroatId) -> Option<&Throat> {
        self.throats.get(id.idx())
    }

    /// Endpoints of a throat.
    pub fn throat_pores(&self, id: ThroatId) -> Option<[PoreId; 2]> {
        self.throat(id).map(|t| t.pores)
    }

    /// Whether `pore` addresses a pore of this network.
    pub fn contains_pore(&self, pore: PoreId) -> bool {
        pore.idx() < self.pore_count
    }

    /// All pore IDs in index order.
    pub fn pore_ids(&self) -> impl Iterator<Item = PoreId> + '_ {
        (0..self.pore_count as u32).map(PoreId::from_index)
    }

    /// Throats incident to a given pore.
    pub fn pore_throats(&self, pore: PoreId) -> &[ThroatId] {
        let idx = pore.idx();
        if idx >= self.pore_count {
            return &[];
        }
        let start = self.pore_throat_offsets[idx];
        let end = self.pore_throat_offsets[idx + 1];
        &self.pore_throats[start..end]
    }

    /// Neighbouring pores of `pore`, paired with the throat that connects them.
    pub fn neighbors(&self, pore: PoreId) -> impl Iterator<Item = (ThroatId, PoreId)> + '_ {
        self.pore_throats(pore).iter().filter_map(move |&t| {
            self.throats
                .get(t.idx())
                .and_then(|throat| throat.other(pore))
                .map(|other| (t, other))
        })
    }

    /// Number of throats incident to `pore`.
    pub fn coordination(&self, pore: PoreId) -> usize {
        self.pore_throats(pore).len()
    }
}
