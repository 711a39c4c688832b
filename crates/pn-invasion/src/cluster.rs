//! Incremental cluster tracking over a pore network.
//!
//! A disjoint-set forest over pore indices (parent + size, path compression)
//! with a per-root flag recording whether the set contains an inlet pore.
//! Throats never own a set; an open throat merges the sets of its two pores.

use pn_core::{PoreId, ThroatId};
use pn_graph::PoreNetwork;

use crate::entry::Entity;
use crate::error::{InvasionError, InvasionResult};

/// Union-find over pores with inlet reachability per root.
#[derive(Debug, Clone)]
pub struct ClusterTracker<'a> {
    network: &'a PoreNetwork,
    parent: Vec<u32>,
    size: Vec<u32>,
    touches_inlet: Vec<bool>,
    pore_qualified: Vec<bool>,
    throat_qualified: Vec<bool>,
    throat_open: Vec<bool>,
    sets: usize,
}

impl<'a> ClusterTracker<'a> {
    /// Fully disconnected tracker; inlet pores start with their flag set.
    ///
    /// Inlet IDs must belong to `network`; out-of-range IDs are ignored.
    pub fn new(network: &'a PoreNetwork, inlets: &[PoreId]) -> Self {
        let n = network.pore_count();
        let mut touches_inlet = vec![false; n];
        for p in inlets {
            if let Some(flag) = touches_inlet.get_mut(p.idx()) {
                *flag = true;
            }
        }
        Self {
            network,
            parent: (0..n as u32).collect(),
            size: vec![1; n],
            touches_inlet,
            pore_qualified: vec![false; n],
            throat_qualified: vec![false; network.throat_count()],
            throat_open: vec![false; network.throat_count()],
            sets: n,
        }
    }

    pub fn network(&self) -> &'a PoreNetwork {
        self.network
    }

    /// Mark an entity as qualified and merge whatever it now connects.
    ///
    /// Returns `Ok(true)` if the entity was newly qualified; re-activating is a no-op.
    pub fn activate(&mut self, entity: Entity) -> InvasionResult<bool> {
        match entity {
            Entity::Pore(pore) => {
                let flag = self
                    .pore_qualified
                    .get_mut(pore.idx())
                    .ok_or(InvasionError::UnknownEntity { entity })?;
                if *flag {
                    return Ok(false);
                }
                *flag = true;
                let network = self.network;
                for &throat in network.pore_throats(pore) {
                    self.try_open(throat);
                }
                Ok(true)
            }
            Entity::Throat(throat) => {
                let flag = self
                    .throat_qualified
                    .get_mut(throat.idx())
                    .ok_or(InvasionError::UnknownEntity { entity })?;
                if *flag {
                    return Ok(false);
                }
                *flag = true;
                self.try_open(throat);
                Ok(true)
            }
        }
    }

    /// Open a throat once it and both of its pores are qualified.
    fn try_open(&mut self, throat: ThroatId) {
        let t = throat.idx();
        if self.throat_open[t] || !self.throat_qualified[t] {
            return;
        }
        let Some([a, b]) = self.network.throat_pores(throat) else {
            return;
        };
        if self.pore_qualified[a.idx()] && self.pore_qualified[b.idx()] {
            self.throat_open[t] = true;
            self.union(a.idx(), b.idx());
        }
    }

    /// Root of `pore`'s set, compressing the path on the way.
    pub fn find(&mut self, pore: PoreId) -> usize {
        self.find_idx(pore.idx())
    }

    fn find_idx(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }

        while self.parent[node] as usize != root {
            let next = self.parent[node] as usize;
            self.parent[node] = root as u32;
            node = next;
        }

        root
    }

    /// Root of `pore`'s set without mutating the forest.
    ///
    /// Union by size keeps paths logarithmic, so this is safe to call from
    /// parallel readers between merge phases.
    pub fn root(&self, pore: PoreId) -> usize {
        let mut root = pore.idx();
        while self.parent[root] as usize != root {
            root = self.parent[root] as usize;
        }
        root
    }

    fn union(&mut self, a: usize, b: usize) -> usize {
        let mut big = self.find_idx(a);
        let mut small = self.find_idx(b);
        if big == small {
            return big;
        }
        if self.size[big] < self.size[small] {
            std::mem::swap(&mut big, &mut small);
        }
        self.parent[small] = big as u32;
        self.size[big] += self.size[small];
        self.touches_inlet[big] |= self.touches_inlet[small];
        self.sets -= 1;
        big
    }

    /// Whether `pore` shares a set with any inlet pore.
    pub fn connected_to_inlet(&mut self, pore: PoreId) -> bool {
        let root = self.find(pore);
        self.touches_inlet[root]
    }

    /// Read-only variant of [`connected_to_inlet`](Self::connected_to_inlet).
    pub fn reaches_inlet(&self, pore: PoreId) -> bool {
        self.touches_inlet[self.root(pore)]
    }

    pub fn is_qualified(&self, entity: Entity) -> bool {
        match entity {
            Entity::Pore(p) => self.pore_qualified.get(p.idx()).copied().unwrap_or(false),
            Entity::Throat(t) => self.throat_qualified.get(t.idx()).copied().unwrap_or(false),
        }
    }

    pub fn is_pore_qualified(&self, pore: PoreId) -> bool {
        self.pore_qualified[pore.idx()]
    }

    /// A throat is open when it and both of its pores are qualified.
    pub fn is_throat_open(&self, throat: ThroatId) -> bool {
        self.throat_open[throat.idx()]
    }

    pub fn same_cluster(&mut self, a: PoreId, b: PoreId) -> bool {
        self.find(a) == self.find(b)
    }

    pub fn cluster_size(&mut self, pore: PoreId) -> usize {
        let root = self.find(pore);
        self.size[root] as usize
    }

    /// Number of disjoint sets, counting isolated pores as singletons.
    pub fn cluster_count(&self) -> usize {
        self.sets
    }

    /// Dense cluster label per pore, numbered in order of each cluster's smallest pore.
    pub fn cluster_labels(&mut self) -> Vec<u32> {
        let n = self.parent.len();
        let mut label_of_root = vec![u32::MAX; n];
        let mut next = 0u32;
        let mut labels = Vec::with_capacity(n);
        for i in 0..n {
            let root = self.find_idx(i);
            if label_of_root[root] == u32::MAX {
                label_of_root[root] = next;
                next += 1;
            }
            labels.push(label_of_root[root]);
        }
        labels
    }
}
