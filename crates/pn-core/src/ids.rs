use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier for pore network entities.
///
/// - `u32` keeps memory small on networks with millions of pores
/// - `NonZero` enables `Option<Id>` to be pointer-optimized
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Largest 0-based index representable by an `Id`.
    pub const MAX_INDEX: u32 = u32::MAX - 1;

    /// Create an Id from a 0-based index by storing index+1.
    ///
    /// Indices above [`Id::MAX_INDEX`] saturate to it; use [`Id::try_from_index`]
    /// when the index comes from untrusted input.
    pub fn from_index(index: u32) -> Self {
        // index+1 is nonzero after saturation
        Self(NonZeroU32::new(index.saturating_add(1)).unwrap_or(NonZeroU32::MIN))
    }

    /// Create an Id from a `usize` index, returning `None` if it does not fit.
    pub fn try_from_index(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok()?;
        if index > Self::MAX_INDEX {
            return None;
        }
        Some(Self::from_index(index))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// The 0-based index as `usize`, for slice addressing.
    #[inline]
    pub fn idx(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type PoreId = Id;
pub type ThroatId = Id;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip_index() {
        for i in [0_u32, 1, 2, 42, 10_000, 1_000_000] {
            let id = Id::from_index(i);
            assert_eq!(id.index(), i);
            assert_eq!(id.idx(), i as usize);
        }
    }

    #[test]
    fn try_from_index_rejects_overflow() {
        assert!(Id::try_from_index(7).is_some());
        assert!(Id::try_from_index(u32::MAX as usize).is_none());
    }

    #[test]
    fn option_id_is_small() {
        assert_eq!(
            core::mem::size_of::<Id>(),
            core::mem::size_of::<Option<Id>>()
        );
    }
}
