use super::{Select0Support, Select1Support};
use crate::internal::search::binary_search_function;
use crate::rank::{BitRankSupport, RankSupport};
use crate::space_usage::SpaceUsage;

/// Performs a select query by binary searching rank queries.
///
/// Adds no storage of its own, so it is the right tool when selects are
/// rare or the rank structure is shared; for query-heavy workloads build
/// a [`SelectIndex`](struct.SelectIndex.html) instead.
pub struct BinSearchSelect<'a, Rank: 'a> {
    rank_support: &'a Rank,
}

impl<'a, Rank: RankSupport + 'a> BinSearchSelect<'a, Rank> {
    /// Creates a new binary search selection support given a rank
    /// support.
    pub fn new(rank_support: &'a Rank) -> Self {
        BinSearchSelect { rank_support }
    }

    /// Borrows a reference to the underlying rank support.
    pub fn inner(&self) -> &'a Rank {
        self.rank_support
    }
}

// If we had access to the representation of the rank structure, we could
// search level by level rather than at arbitrary bit addresses. But then
// this algorithm would be tied to that representation.

macro_rules! impl_select_support_b {
    ($select_support:ident, $select:ident, $rank:ident) => {
        impl<'a, Rank: BitRankSupport + 'a> $select_support for BinSearchSelect<'a, Rank> {
            fn $select(&self, index: u64) -> Option<u64> {
                if index == 0 {
                    return None;
                }
                binary_search_function(0, self.rank_support.limit(), index, |position| {
                    self.rank_support.$rank(position + 1)
                })
            }
        }
    };
}

impl_select_support_b!(Select1Support, select1, rank1);
impl_select_support_b!(Select0Support, select0, rank0);

impl<'a, Rank: BitRankSupport + 'a> SpaceUsage for BinSearchSelect<'a, Rank> {
    #[inline]
    fn is_stack_only() -> bool {
        true
    }

    #[inline]
    fn heap_bytes(&self) -> usize {
        0
    }
}
