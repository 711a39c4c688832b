//! Network validation logic.

use std::collections::HashSet;

use pn_core::{PoreId, ThroatId};

use crate::error::{GraphError, GraphResult};
use crate::graph::Throat;

/// Validate throat endpoints: IDs contiguous, pores exist, no self-loops.
pub(crate) fn validate_throats(pore_count: usize, throats: &[Throat]) -> GraphResult<()> {
    for (i, throat) in throats.iter().enumerate() {
        // IDs must match their position
        if throat.id.idx() != i {
            return Err(GraphError::InconsistentAdjacency {
                throat: throat.id,
                pore: throat.head(),
            });
        }

        for pore in throat.pores {
            if pore.idx() >= pore_count {
                return Err(GraphError::InvalidPoreRef {
                    throat: throat.id,
                    pore,
                    pore_count,
                });
            }
        }

        if throat.head() == throat.tail() {
            return Err(GraphError::SelfLoop {
                throat: throat.id,
                pore: throat.head(),
            });
        }
    }

    Ok(())
}

/// Validate adjacency lists for consistency.
pub(crate) fn validate_adjacency(
    pore_count: usize,
    throats: &[Throat],
    offsets: &[usize],
    pore_throats: &[ThroatId],
) -> GraphResult<()> {
    if offsets.len() != pore_count + 1 {
        return Err(GraphError::InconsistentAdjacency {
            throat: ThroatId::from_index(0),
            pore: PoreId::from_index(0),
        });
    }

    for idx in 0..pore_count {
        let pore = PoreId::from_index(idx as u32);
        for &throat_id in &pore_throats[offsets[idx]..offsets[idx + 1]] {
            let touches = throats
                .get(throat_id.idx())
                .is_some_and(|t| t.pores.contains(&pore));
            if !touches {
                return Err(GraphError::InconsistentAdjacency {
                    throat: throat_id,
                    pore,
                });
            }
        }
    }

    // Every throat appears exactly twice: once per endpoint
    if pore_throats.len() != 2 * throats.len() {
        return Err(GraphError::InconsistentAdjacency {
            throat: ThroatId::from_index(0),
            pore: PoreId::from_index(0),
        });
    }
    let seen: HashSet<ThroatId> = pore_throats.iter().copied().collect();
    if let Some(missing) = throats.iter().find(|t| !seen.contains(&t.id)) {
        return Err(GraphError::InconsistentAdjacency {
            throat: missing.id,
            pore: missing.head(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_core::Id;

    #[test]
    fn validate_empty_network() {
        assert!(validate_throats(0, &[]).is_ok());
        assert!(validate_adjacency(0, &[], &[0], &[]).is_ok());
    }

    #[test]
    fn validate_invalid_pore_ref() {
        let throats = vec![Throat {
            id: Id::from_index(0),
            pores: [Id::from_index(0), Id::from_index(99)],
        }];

        let result = validate_throats(1, &throats);
        assert!(matches!(
            result,
            Err(GraphError::InvalidPoreRef { pore_count: 1, .. })
        ));
    }

    #[test]
    fn validate_misnumbered_throat() {
        let throats = vec![Throat {
            id: Id::from_index(3),
            pores: [Id::from_index(0), Id::from_index(1)],
        }];
        assert!(validate_throats(2, &throats).is_err());
    }

    #[test]
    fn validate_adjacency_detects_foreign_throat() {
        let throats = vec![Throat {
            id: Id::from_index(0),
            pores: [Id::from_index(0), Id::from_index(1)],
        }];
        // pore 2 claims throat 0 which does not touch it
        let offsets = vec![0, 1, 1, 2];
        let list = vec![Id::from_index(0), Id::from_index(0)];
        assert!(validate_adjacency(3, &throats, &offsets, &list).is_err());
    }
}
