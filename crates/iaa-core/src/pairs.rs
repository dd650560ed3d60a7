//! Unordered annotator pairs for one item.

use std::collections::BTreeSet;

/// A pair of annotator slots, always stored with the lower slot first.
pub type SlotPair = (usize, usize);

/// Every unordered pair of distinct slots in `0..k`.
///
/// Each pair `{i, j}` appears exactly once, as `(min, max)`, so the set never
/// holds both a pair and its reverse. The result has `k·(k-1)/2` elements and
/// is empty for `k <= 1`.
pub fn enumerate_pairs(k: usize) -> BTreeSet<SlotPair> {
    (0..k)
        .flat_map(|i| (i + 1..k).map(move |j| (i, j)))
        .collect()
}

/// Number of unordered pairs among `k` annotators, without materializing them.
pub fn pair_count(k: usize) -> usize {
    k * k.saturating_sub(1) / 2
}
