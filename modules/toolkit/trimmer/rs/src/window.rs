use eyre::Result;
use log::{debug, info};
use seqtrim_core_rs::loc::{Interval, IntervalOp};

use crate::error::Error;
use crate::intervals::{IntervalSet, LengthTable, Scored};

/// Number of intervals covering consecutive positions of a sequence. Positions must be queried
/// in non-decreasing order.
struct Sweeper<'a> {
    starts: &'a [u64],
    ends: &'a [u64],
    opened: usize,
    closed: usize,
}

impl<'a> Sweeper<'a> {
    fn new(starts: &'a [u64], ends: &'a [u64]) -> Self {
        Self {
            starts,
            ends,
            opened: 0,
            closed: 0,
        }
    }

    fn coverage(&mut self, pos: u64) -> u64 {
        while self.opened < self.starts.len() && self.starts[self.opened] <= pos {
            self.opened += 1;
        }
        while self.closed < self.ends.len() && self.ends[self.closed] <= pos {
            self.closed += 1;
        }
        (self.opened - self.closed) as u64
    }
}

/// Spans of a single sequence where the windowed coverage reaches the threshold.
///
/// The window score at position `i` is the total overlap of all intervals with a positive score
/// with `[i, i + window)`, divided by `window`. Overlapping intervals are counted separately, so
/// the score may exceed 1. A span opens at the first position whose score reaches the threshold
/// and closes at the first position `i` where it drops below, yielding `[start, i + window - 1)`.
/// A span that is still open at the end of the sequence is not reported.
pub fn scan(window: u64, threshold: f64, intervals: &[Scored], length: u64) -> Vec<Interval<u64>> {
    let positive: Vec<Interval<u64>> = intervals
        .iter()
        .filter(|x| x.score >= 1)
        .map(|x| x.interval)
        .collect();
    let frame = match Interval::new(0, window) {
        Ok(frame) if !positive.is_empty() => frame,
        _ => return Vec::new(),
    };

    let mut starts: Vec<u64> = positive.iter().map(|x| x.start()).collect();
    let mut ends: Vec<u64> = positive.iter().map(|x| x.end()).collect();
    starts.sort_unstable();
    ends.sort_unstable();

    // Coverage entering and leaving the window as it slides
    let mut head = Sweeper::new(&starts, &ends);
    let mut tail = Sweeper::new(&starts, &ends);
    let mut covered: u64 = positive
        .iter()
        .map(|x| x.intersection_length(&frame))
        .sum();

    let window_f = window as f64;
    let mut spans = Vec::new();
    let mut opened: Option<u64> = None;
    for i in 0..length {
        let passes = covered as f64 / window_f >= threshold;
        match (opened, passes) {
            (None, true) => opened = Some(i),
            (Some(start), false) => {
                // i + window - 1 > start, so the span is never empty
                let end = i.saturating_add(window) - 1;
                spans.push(Interval::new(start, end).unwrap_or_default());
                opened = None;
            }
            _ => {}
        }

        covered = covered + head.coverage(i.saturating_add(window)) - tail.coverage(i);
    }
    spans
}

/// Turn raw scored intervals into the spans that pass the windowed coverage threshold.
///
/// With `window == 1` and `threshold == 1` the intervals themselves are returned in their
/// original order. Otherwise every sequence is scanned independently on the current rayon pool.
/// All sequences of `intervals` must be present in `lengths`.
pub fn filter(
    window: u64,
    threshold: f64,
    intervals: IntervalSet<Scored>,
    lengths: &LengthTable,
) -> Result<IntervalSet> {
    if window == 1 && threshold == 1.0 {
        debug!("Window filter is an identity for window=1 and threshold=1");
        return Ok(intervals.map(|_, list| list.into_iter().map(|x| x.interval).collect()));
    }

    let total = intervals.total();
    let spans = intervals.try_map(|seqid, list| {
        let length = lengths.get(seqid).ok_or_else(|| {
            Error::MalformedInput(format!("sequence {seqid} is missing from the FASTA input"))
        })?;
        let spans = scan(window, threshold, &list, length);
        debug!(
            "{seqid}: {} intervals -> {} windowed spans",
            list.len(),
            spans.len()
        );
        Ok(spans)
    })?;

    info!(
        "Window filter (window={window}, threshold={threshold}): {total} intervals -> {} spans",
        spans.total()
    );
    Ok(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn scored(intervals: &[(u64, u64, i64)]) -> Vec<Scored> {
        intervals
            .iter()
            .map(|&(start, end, score)| Scored::new(Interval::new(start, end).unwrap(), score))
            .collect()
    }

    // Direct per-position evaluation of the window score
    fn naive(window: u64, threshold: f64, intervals: &[Scored], length: u64) -> Vec<Interval<u64>> {
        let mut spans = Vec::new();
        let mut opened = None;
        for i in 0..length {
            let frame = Interval::new(i, i + window).unwrap();
            let covered: u64 = intervals
                .iter()
                .filter(|x| x.score >= 1)
                .map(|x| x.interval.intersection_length(&frame))
                .sum();
            let score = covered as f64 / window as f64;
            match opened {
                None if score >= threshold => opened = Some(i),
                Some(start) if score < threshold => {
                    spans.push(Interval::new(start, i + window - 1).unwrap());
                    opened = None;
                }
                _ => {}
            }
        }
        spans
    }

    #[test]
    fn test_single_block() -> Result<()> {
        let intervals = scored(&[(10, 20, 1)]);
        assert_eq!(scan(5, 0.8, &intervals, 40), vec![Interval::new(9, 21)?]);
        Ok(())
    }

    #[test]
    fn test_span_open_at_sequence_end_is_dropped() -> Result<()> {
        // Coverage holds up to the very last position, the span never closes
        assert!(scan(1, 0.5, &scored(&[(10, 20, 1)]), 20).is_empty());

        // The span closes at i=17, two positions before the end
        assert_eq!(scan(5, 0.8, &scored(&[(0, 20, 1)]), 20), vec![Interval::new(0, 21)?]);
        Ok(())
    }

    #[test]
    fn test_overlaps_are_counted_twice() -> Result<()> {
        // Each interval alone covers half of the window, together they pass a 0.9 threshold
        let intervals = scored(&[(0, 3, 1), (0, 3, 1), (30, 31, 1)]);
        assert_eq!(scan(6, 0.9, &intervals, 40), vec![Interval::new(0, 6)?]);
        assert!(scan(6, 0.9, &intervals[1..], 40).is_empty());
        Ok(())
    }

    #[test]
    fn test_non_positive_scores_are_ignored() {
        let intervals = scored(&[(0, 50, 0), (0, 50, -3)]);
        assert!(scan(2, 0.1, &intervals, 100).is_empty());
    }

    #[test]
    fn test_matches_naive_scan() {
        let layouts = [
            scored(&[(10, 20, 1)]),
            scored(&[(5, 15, 2), (0, 100, 1), (40, 42, 1)]),
            scored(&[(0, 3, 1), (4, 7, 1), (8, 11, 1), (12, 15, 1), (90, 99, 1)]),
            scored(&[(20, 60, 1), (30, 35, 0), (25, 26, 1), (58, 80, 1), (70, 72, 1)]),
            scored(&[(95, 130, 1)]),
        ];
        for (intervals, window, threshold) in
            iproduct!(layouts.iter(), [1, 2, 5, 16, 150], [0.1, 0.5, 0.8, 1.0])
        {
            assert_eq!(
                scan(window, threshold, intervals, 100),
                naive(window, threshold, intervals, 100),
                "window={window}, threshold={threshold}, intervals={intervals:?}"
            );
        }
    }

    #[test]
    fn test_identity_for_unit_window() -> Result<()> {
        let mut intervals = IntervalSet::new();
        intervals
            .upsert("chr1")
            .extend(scored(&[(30, 40, 1), (10, 20, 5), (15, 18, -1)]));
        intervals.upsert("chr2").extend(scored(&[(0, 1, 0)]));

        // Lengths are not consulted on the identity path
        let filtered = filter(1, 1.0, intervals, &LengthTable::new())?;
        assert_eq!(filtered.get("chr1"), &[(30, 40), (10, 20), (15, 18)]);
        assert_eq!(filtered.get("chr2"), &[(0, 1)]);
        Ok(())
    }

    #[test]
    fn test_filter_per_sequence() -> Result<()> {
        let lengths: LengthTable = [("a".to_string(), 40), ("b".to_string(), 17)]
            .into_iter()
            .collect();
        let mut intervals = IntervalSet::new();
        intervals.upsert("a").extend(scored(&[(10, 20, 1)]));
        intervals.upsert("b").extend(scored(&[(10, 20, 1)]));

        let filtered = filter(5, 0.8, intervals, &lengths)?;
        assert_eq!(filtered.get("a"), &[(9, 21)]);
        assert!(filtered.contains("b") && filtered.get("b").is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_length_is_malformed_input() {
        let mut intervals = IntervalSet::new();
        intervals.upsert("ghost").extend(scored(&[(0, 5, 1)]));

        let err = filter(2, 0.5, intervals, &LengthTable::new()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MalformedInput(_))));
    }
}
