//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub`;
//! `ZoneId` additionally offers `.index()` for direct indexing into
//! zone-ordered `Vec`s and dense matrices.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer with a named
/// sentinel constant.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) = $sentinel_name:ident($sentinel:expr);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            pub const $sentinel_name: $name = $name($sentinel);
        }

        impl Default for $name {
            /// Returns the sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::$sentinel_name
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// A social-media user.  Source ids are 64-bit.
    pub struct UserId(u64) = INVALID(u64::MAX);
}

typed_id! {
    /// A spatial cluster of one user's observations.
    ///
    /// Region ids are user-local: region 5 of user A is unrelated to region 5
    /// of user B.  `UNCLUSTERED` (`-1`) marks observations or exploration
    /// points that belong to no region.
    pub struct RegionId(i64) = UNCLUSTERED(-1);
}

typed_id! {
    /// Position of a zone in its `ZoneSet` (not the external zone label).
    pub struct ZoneId(u32) = INVALID(u32::MAX);
}

impl RegionId {
    /// `true` unless this is the `UNCLUSTERED` sentinel.
    #[inline]
    pub fn is_clustered(self) -> bool {
        self != Self::UNCLUSTERED
    }

    /// The id immediately after `self`.
    #[inline]
    pub fn next(self) -> RegionId {
        RegionId(self.0 + 1)
    }
}

impl ZoneId {
    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<ZoneId> for usize {
    #[inline(always)]
    fn from(id: ZoneId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for ZoneId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<ZoneId, Self::Error> {
        u32::try_from(n).map(ZoneId)
    }
}
