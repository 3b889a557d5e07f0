use std::fmt::{Debug, Display};

use crate::num::PrimInt;
use derive_getters::Dissolve;
use eyre::{eyre, Result};

/// Interval is a half-open region [start, end) of a sequence in 0-based coordinates.
/// It's not represented as a Rust-native Range for a couple of reasons:
/// - Prohibit 'empty' intervals (start == end) or intervals with negative length (start > end)
/// - Implement custom traits (e.g. Dissolve) and set operations (complement, clamp).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Dissolve)]
pub struct Interval<Idx: PrimInt> {
    start: Idx,
    end: Idx,
}

/// Trait for types that can be generally viewed as half-open intervals [start, end).
#[allow(clippy::len_without_is_empty)]
pub trait IntervalOp {
    type Idx: PrimInt;

    /// Start position of the interval-like object.
    fn start(&self) -> Self::Idx;

    /// End position of the interval-like object.
    fn end(&self) -> Self::Idx;

    /// Length of the interval-like object.
    fn len(&self) -> Self::Idx {
        self.end() - self.start()
    }
}

impl<T: PrimInt> IntervalOp for Interval<T> {
    type Idx = T;

    #[inline(always)]
    fn start(&self) -> Self::Idx {
        self.start
    }
    #[inline(always)]
    fn end(&self) -> Self::Idx {
        self.end
    }
}

impl<Idx: PrimInt> Interval<Idx> {
    pub fn new(start: Idx, end: Idx) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(eyre!("Invalid interval: start >= end ({start:?} >= {end:?})"))
        }
    }

    /// Widen the interval by `left` and `right` positions. Saturates at the numeric bounds
    /// of the index type; use [Interval::clamped] to restrict the result to a sequence.
    pub fn extended(&self, left: Idx, right: Idx) -> Self {
        Self {
            start: self.start.saturating_sub(left),
            end: self.end.saturating_add(right),
        }
    }

    /// Move the interval right by `shift` positions, `None` if the end overflows.
    pub fn shifted(&self, shift: Idx) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add(&shift)?,
            end: self.end.checked_add(&shift)?,
        })
    }

    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn intersection_length(&self, other: &Self) -> Idx {
        self.intersection(other)
            .map(|x| x.len())
            .unwrap_or_else(Idx::zero)
    }

    pub fn clamped(self, inside: &Self) -> Option<Self> {
        self.intersection(inside)
    }

    /// Gaps between sorted, non-overlapping `intervals` inside the `within` bounds.
    /// Empty gaps are never reported, neither are parts of the intervals outside `within`.
    pub fn complement(intervals: &[Self], within: &Self) -> Vec<Self> {
        let mut gaps = Vec::with_capacity(intervals.len() + 1);
        let mut cursor = within.start;
        for interval in intervals {
            if cursor >= within.end {
                break;
            }
            let gap_end = interval.start.min(within.end);
            if cursor < gap_end {
                gaps.push(Self {
                    start: cursor,
                    end: gap_end,
                });
            }
            cursor = cursor.max(interval.end);
        }
        if cursor < within.end {
            gaps.push(Self {
                start: cursor,
                end: within.end,
            });
        }
        gaps
    }
}

impl<Idx: PrimInt> Default for Interval<Idx> {
    fn default() -> Self {
        Self {
            start: Idx::zero(),
            end: Idx::one(),
        }
    }
}

impl<Idx: PrimInt + Display> Display for Interval<Idx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

impl<Idx: PrimInt> PartialEq<(Idx, Idx)> for Interval<Idx> {
    fn eq(&self, other: &(Idx, Idx)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intervals(raw: &[(u64, u64)]) -> Vec<Interval<u64>> {
        raw.iter()
            .map(|&(start, end)| Interval::new(start, end).unwrap())
            .collect()
    }

    #[test]
    fn test_construct() {
        assert_eq!(
            Interval::new(0, 10).unwrap(),
            Interval { start: 0, end: 10 }
        );
        assert!(Interval::new(1, 0).is_err());
        assert!(Interval::new(0, 0).is_err());
        assert_eq!(Interval::new(3u64, 7).unwrap().len(), 4);
        assert_eq!(Interval::new(3u64, 8).unwrap().to_string(), "[3, 8)");
    }

    #[test]
    fn test_intersection_length() {
        let window = Interval::new(10u64, 20).unwrap();
        for (other, expected) in [((0, 5), 0), ((0, 10), 0), ((5, 15), 5), ((12, 14), 2), ((15, 40), 5)] {
            let other = Interval::new(other.0, other.1).unwrap();
            assert_eq!(window.intersection_length(&other), expected);
            assert_eq!(other.intersection_length(&window), expected);
        }
    }

    #[test]
    fn test_extended_and_clamped() {
        let bounds = Interval::new(0u64, 100).unwrap();
        let interval = Interval::new(5u64, 90).unwrap();

        assert_eq!(interval.extended(2, 2), (3, 92));
        assert_eq!(interval.extended(10, 20), (0, 110));
        assert_eq!(interval.extended(10, 20).clamped(&bounds), Some(Interval::new(0, 100).unwrap()));
        assert_eq!(Interval::new(120u64, 130).unwrap().clamped(&bounds), None);
        assert_eq!(interval.extended(u64::MAX, u64::MAX), (0, u64::MAX));
    }

    #[test]
    fn test_shifted() {
        let interval = Interval::new(5u64, 90).unwrap();
        assert_eq!(interval.shifted(10), Some(Interval::new(15, 100).unwrap()));
        assert_eq!(interval.shifted(u64::MAX - 89), None);
        assert_eq!(interval.shifted(u64::MAX - 90), Some(Interval::new(u64::MAX - 85, u64::MAX).unwrap()));
    }

    #[test]
    fn test_complement() {
        let within = Interval::new(0u64, 100).unwrap();
        for (blocks, expected) in [
            (vec![(10, 20)], vec![(0, 10), (20, 100)]),
            (vec![(0, 20)], vec![(20, 100)]),
            (vec![(10, 100)], vec![(0, 10)]),
            (vec![(0, 100)], vec![]),
            (vec![(10, 20), (30, 40)], vec![(0, 10), (20, 30), (40, 100)]),
            (vec![(90, 120)], vec![(0, 90)]),
            (vec![], vec![(0, 100)]),
        ] {
            assert_eq!(
                Interval::complement(&intervals(&blocks), &within),
                intervals(&expected),
                "Blocks: {blocks:?}"
            );
        }
    }

    #[test]
    fn test_complement_round_trip() {
        let within = Interval::new(0u64, 1000).unwrap();
        let blocks = intervals(&[(5, 10), (50, 75), (500, 999)]);
        let gaps = Interval::complement(&blocks, &within);
        assert_eq!(Interval::complement(&gaps, &within), blocks);
    }
}
