//! The shift (insertion) move.
//!
//! A shift relocates the job at position `first` so that it ends up at
//! position `second` of the resulting sequence; the jobs in between slide by
//! one. Positions are indices of the sequence AFTER the move, which is the
//! same as an index into the sequence with the moved job removed.
//!
//! ```text
//! [1 2 3 4 5 6]  shift(0, 3)  ->  [2 3 4 1 5 6]
//! [1 2 3 4 5 6]  shift(5, 1)  ->  [1 6 2 3 4 5]
//! ```
//!
//! # Key encoding
//!
//! Shifting `i` to `i - 1` yields the same sequence as shifting `i - 1` to
//! `i`, so the distinct non-trivial shifts of a sequence of length `n` are
//! the pairs with `first != second` and `second != first - 1`. There are
//! `(n - 1)²` of them, and they map bijectively onto dense keys:
//!
//! - keys `[0, n(n-1)/2)`: forward shifts (`first < second`), grouped by
//!   `first`, then ordered by `second`;
//! - keys `[n(n-1)/2, (n-1)²)`: backward shifts (`second + 1 < first`),
//!   grouped by `second`, then ordered by `first`.
//!
//! All forward shifts of one source are therefore a contiguous key range,
//! and all backward shifts into one destination are too.

use crate::models::Permutation;

/// Relocation of one job inside a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Position of the job to move.
    pub first: usize,
    /// Position of that job after the move.
    pub second: usize,
}

/// Number of distinct non-trivial shifts of a sequence of length `size`.
#[inline]
pub fn neighborhood_size(size: usize) -> usize {
    let k = size.saturating_sub(1);
    k * k
}

/// First key of the forward block with source `first`.
#[inline]
fn forward_offset(first: usize, size: usize) -> usize {
    first * (2 * size - 1 - first) / 2
}

/// First key of the backward block with destination `second`, relative to
/// the start of the backward keys. Valid for `second + 2 < size + 1`.
#[inline]
fn backward_offset(second: usize, size: usize) -> usize {
    second * (2 * size - 3 - second) / 2
}

#[inline]
fn forward_count(size: usize) -> usize {
    size * size.saturating_sub(1) / 2
}

impl Move {
    /// Creates a shift of the job at `first` to `second`.
    #[inline]
    pub fn new(first: usize, second: usize) -> Self {
        Self { first, second }
    }

    /// Whether the move leaves the sequence unchanged.
    #[inline]
    pub fn is_noop(&self) -> bool {
        self.first == self.second
    }

    /// Encodes this move as a dense key for a sequence of length `size`.
    ///
    /// Returns `None` for moves outside the bijection: out-of-range
    /// positions, the no-op `first == second`, and the duplicate
    /// `second == first - 1`.
    pub fn key(&self, size: usize) -> Option<usize> {
        let (first, second) = (self.first, self.second);
        if first >= size || second >= size || first == second || second + 1 == first {
            return None;
        }
        if first < second {
            Some(forward_offset(first, size) + (second - first - 1))
        } else {
            Some(forward_count(size) + backward_offset(second, size) + (first - second - 2))
        }
    }

    /// Decodes a dense key for a sequence of length `size`.
    ///
    /// Returns `None` if `key >= (size - 1)²`.
    pub fn from_key(key: usize, size: usize) -> Option<Self> {
        if key >= neighborhood_size(size) {
            return None;
        }
        let base = forward_count(size);
        if key < base {
            let mut rem = key;
            let mut step = size - 1;
            let mut first = 0;
            while rem >= step {
                rem -= step;
                step -= 1;
                first += 1;
            }
            Some(Self::new(first, first + 1 + rem))
        } else {
            let mut rem = key - base;
            let mut step = size - 2;
            let mut second = 0;
            while rem >= step {
                rem -= step;
                step -= 1;
                second += 1;
            }
            Some(Self::new(second + 2 + rem, second))
        }
    }

    /// Index in the original sequence of the job found at `position` after
    /// the move. Lets evaluators walk the moved order without building it.
    #[inline]
    pub fn source_index(&self, position: usize) -> usize {
        let (first, second) = (self.first, self.second);
        if first < second {
            if position < first || position > second {
                position
            } else if position == second {
                first
            } else {
                position + 1
            }
        } else if position < second || position > first {
            position
        } else if position == second {
            first
        } else {
            position - 1
        }
    }

    /// Applies the move to a slice in place.
    ///
    /// # Panics
    /// Panics if either position is outside the slice.
    pub fn apply_slice<T>(&self, seq: &mut [T]) {
        if self.first < self.second {
            seq[self.first..=self.second].rotate_left(1);
        } else if self.first > self.second {
            seq[self.second..=self.first].rotate_right(1);
        }
    }

    /// Applies the move to a permutation, invalidating its fitness.
    pub fn apply(&self, perm: &mut Permutation) {
        if !self.is_noop() {
            self.apply_slice(perm.jobs_mut());
        }
    }
}

/// Keys of every shift whose source is `first`, forward block first.
///
/// The forward part is one contiguous range; the backward part is strided.
pub fn keys_from(first: usize, size: usize) -> impl Iterator<Item = usize> {
    let forward_len = size.saturating_sub(first + 1);
    let forward_start = if forward_len > 0 {
        forward_offset(first, size)
    } else {
        0
    };
    let base = forward_count(size);
    (forward_start..forward_start + forward_len).chain(
        (0..first.saturating_sub(1))
            .map(move |second| base + backward_offset(second, size) + (first - second - 2)),
    )
}

/// Keys of every shift whose destination is `second`, forward block first.
///
/// The forward part is strided; the backward part is one contiguous range.
pub fn keys_to(second: usize, size: usize) -> impl Iterator<Item = usize> {
    let backward_len = size.saturating_sub(second + 2);
    let backward_start = if backward_len > 0 {
        forward_count(size) + backward_offset(second, size)
    } else {
        0
    };
    (0..second.min(size))
        .map(move |first| forward_offset(first, size) + (second - first - 1))
        .chain(backward_start..backward_start + backward_len)
}

/// Iterator over every distinct shift of a sequence.
///
/// [`ShiftNeighborhood::new`] yields moves in key order;
/// [`ShiftNeighborhood::by_source`] groups them by source position, which is
/// the order in which the neighbor evaluators reuse their per-source tables.
#[derive(Debug, Clone)]
pub struct ShiftNeighborhood {
    size: usize,
    order: Vec<usize>,
    cursor: usize,
}

impl ShiftNeighborhood {
    /// All shifts of a sequence of length `size`, in key order.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            order: (0..neighborhood_size(size)).collect(),
            cursor: 0,
        }
    }

    /// All shifts of a sequence of length `size`, grouped by source.
    pub fn by_source(size: usize) -> Self {
        Self {
            size,
            order: (0..size).flat_map(|first| keys_from(first, size)).collect(),
            cursor: 0,
        }
    }

    /// Sequence length this neighborhood was built for.
    pub fn sequence_len(&self) -> usize {
        self.size
    }
}

impl Iterator for ShiftNeighborhood {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let key = *self.order.get(self.cursor)?;
        self.cursor += 1;
        Move::from_key(key, self.size)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.order.len() - self.cursor;
        (rest, Some(rest))
    }
}

impl ExactSizeIterator for ShiftNeighborhood {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn moved(init: &[usize], first: usize, second: usize) -> Vec<usize> {
        let mut v = init.to_vec();
        Move::new(first, second).apply_slice(&mut v);
        v
    }

    #[test]
    fn test_apply_forward() {
        let s = [1, 2, 3, 4, 5, 6];
        assert_eq!(moved(&s, 0, 0), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(moved(&s, 0, 1), vec![2, 1, 3, 4, 5, 6]);
        assert_eq!(moved(&s, 0, 2), vec![2, 3, 1, 4, 5, 6]);
        assert_eq!(moved(&s, 0, 3), vec![2, 3, 4, 1, 5, 6]);
        assert_eq!(moved(&s, 0, 4), vec![2, 3, 4, 5, 1, 6]);
        assert_eq!(moved(&s, 0, 5), vec![2, 3, 4, 5, 6, 1]);
    }

    #[test]
    fn test_apply_backward() {
        let s = [1, 2, 3, 4, 5, 6];
        assert_eq!(moved(&s, 5, 0), vec![6, 1, 2, 3, 4, 5]);
        assert_eq!(moved(&s, 5, 1), vec![1, 6, 2, 3, 4, 5]);
        assert_eq!(moved(&s, 5, 2), vec![1, 2, 6, 3, 4, 5]);
        assert_eq!(moved(&s, 5, 3), vec![1, 2, 3, 6, 4, 5]);
        assert_eq!(moved(&s, 5, 4), vec![1, 2, 3, 4, 6, 5]);
        assert_eq!(moved(&s, 5, 5), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_apply_to_permutation_invalidates() {
        let mut p = Permutation::identity(4);
        p.set_fitness(3);
        Move::new(1, 3).apply(&mut p);
        assert_eq!(p.jobs(), &[0, 2, 3, 1]);
        assert!(p.is_invalid());

        p.set_fitness(5);
        Move::new(2, 2).apply(&mut p);
        assert_eq!(p.fitness(), Some(5));
    }

    #[test]
    fn test_source_index_matches_apply() {
        let n = 7;
        let base: Vec<usize> = (0..n).collect();
        for first in 0..n {
            for second in 0..n {
                let mv = Move::new(first, second);
                let after = moved(&base, first, second);
                for (pos, &job) in after.iter().enumerate() {
                    assert_eq!(base[mv.source_index(pos)], job, "{mv:?} pos {pos}");
                }
            }
        }
    }

    #[test]
    fn test_key_roundtrip_small_sizes() {
        for size in 2..50 {
            for key in 0..neighborhood_size(size) {
                let mv = Move::from_key(key, size).unwrap();
                assert_eq!(mv.key(size), Some(key), "size {size} key {key}");
            }
            for first in 0..size {
                for second in 0..size {
                    let mv = Move::new(first, second);
                    if let Some(key) = mv.key(size) {
                        assert_eq!(Move::from_key(key, size), Some(mv));
                    } else {
                        assert!(first == second || second + 1 == first);
                    }
                }
            }
        }
    }

    #[test]
    fn test_keys_cover_distinct_neighbors() {
        let size = 6;
        let base: Vec<usize> = (0..size).collect();
        let mut seen = HashSet::new();
        for key in 0..neighborhood_size(size) {
            let mv = Move::from_key(key, size).unwrap();
            let after = moved(&base, mv.first, mv.second);
            assert_ne!(after, base);
            assert!(seen.insert(after), "duplicate neighbor for key {key}");
        }
        assert_eq!(seen.len(), 25);
    }

    #[test]
    fn test_out_of_domain_keys() {
        assert_eq!(Move::from_key(0, 0), None);
        assert_eq!(Move::from_key(0, 1), None);
        assert_eq!(Move::from_key(1, 2), None);
        assert_eq!(Move::from_key(0, 2), Some(Move::new(0, 1)));
        assert_eq!(Move::new(1, 0).key(2), None);
        assert_eq!(Move::new(0, 2).key(2), None);
    }

    #[test]
    fn test_key_layout() {
        // n = 4: forward keys 0..6 grouped by first, backward keys 6..9 by second.
        assert_eq!(Move::new(0, 1).key(4), Some(0));
        assert_eq!(Move::new(0, 3).key(4), Some(2));
        assert_eq!(Move::new(1, 2).key(4), Some(3));
        assert_eq!(Move::new(2, 3).key(4), Some(5));
        assert_eq!(Move::new(2, 0).key(4), Some(6));
        assert_eq!(Move::new(3, 0).key(4), Some(7));
        assert_eq!(Move::new(3, 1).key(4), Some(8));
    }

    #[test]
    fn test_keys_from_and_to_partition() {
        for size in 2..20 {
            let total = neighborhood_size(size);

            let mut by_first = Vec::new();
            for first in 0..size {
                for key in keys_from(first, size) {
                    assert_eq!(Move::from_key(key, size).unwrap().first, first);
                    by_first.push(key);
                }
            }
            by_first.sort_unstable();
            assert_eq!(by_first, (0..total).collect::<Vec<_>>());

            let mut by_second = Vec::new();
            for second in 0..size {
                for key in keys_to(second, size) {
                    assert_eq!(Move::from_key(key, size).unwrap().second, second);
                    by_second.push(key);
                }
            }
            by_second.sort_unstable();
            assert_eq!(by_second, (0..total).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_forward_keys_from_are_contiguous() {
        let size = 9;
        let keys: Vec<usize> = keys_from(3, size).take(size - 4).collect();
        for w in keys.windows(2) {
            assert_eq!(w[1], w[0] + 1);
        }
    }

    #[test]
    fn test_shift_neighborhood_orders() {
        let size = 5;
        let in_key_order: Vec<Move> = ShiftNeighborhood::new(size).collect();
        assert_eq!(in_key_order.len(), 16);
        assert_eq!(ShiftNeighborhood::new(size).len(), 16);

        let by_source: Vec<Move> = ShiftNeighborhood::by_source(size).collect();
        assert_eq!(by_source.len(), 16);
        for w in by_source.windows(2) {
            assert!(w[0].first <= w[1].first);
        }
        let a: HashSet<Move> = in_key_order.into_iter().collect();
        let b: HashSet<Move> = by_source.into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_neighborhoods() {
        assert_eq!(ShiftNeighborhood::new(0).count(), 0);
        assert_eq!(ShiftNeighborhood::new(1).count(), 0);
        assert_eq!(
            ShiftNeighborhood::new(2).collect::<Vec<_>>(),
            vec![Move::new(0, 1)]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Decoding an encoded move returns the same move.
            #[test]
            fn prop_encode_decode(size in 2_usize..400, a in any::<usize>(), b in any::<usize>()) {
                let mv = Move::new(a % size, b % size);
                if let Some(key) = mv.key(size) {
                    prop_assert!(key < neighborhood_size(size));
                    prop_assert_eq!(Move::from_key(key, size), Some(mv));
                }
            }

            /// Encoding a decoded key returns the same key.
            #[test]
            fn prop_decode_encode(size in 2_usize..400, k in any::<usize>()) {
                let key = k % neighborhood_size(size);
                let mv = Move::from_key(key, size).unwrap();
                prop_assert_eq!(mv.key(size), Some(key));
            }
        }
    }
}
