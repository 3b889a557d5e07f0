use eyre::Result;
use log::info;
use seqtrim_core_rs::loc::{Interval, IntervalOp};

use crate::config::Config;
use crate::error::Error;
use crate::intervals::{IntervalSet, LengthTable};

fn length_of(lengths: &LengthTable, seqid: &str) -> Result<u64> {
    lengths.get(seqid).ok_or_else(|| {
        Error::MalformedInput(format!("sequence {seqid} is missing from the FASTA input")).into()
    })
}

/// Sort every list by start and fuse intervals separated by at most `distance` positions.
///
/// A fused interval takes the end of the later interval, so an interval nested inside the
/// running one cuts it short.
pub fn merge(intervals: IntervalSet, distance: u64) -> IntervalSet {
    intervals.map(|_, list| merge_sorted(list, distance))
}

fn merge_sorted(mut list: Vec<Interval<u64>>, distance: u64) -> Vec<Interval<u64>> {
    list.sort_by_key(|x| x.start());

    let mut merged = Vec::with_capacity(list.len());
    let mut iter = list.into_iter();
    let Some(first) = iter.next() else {
        return merged;
    };
    let (mut start, mut end) = (first.start(), first.end());
    for next in iter {
        if next.start() > end.saturating_add(distance) {
            merged.extend(Interval::new(start, end).ok());
            start = next.start();
        }
        end = next.end();
    }
    merged.extend(Interval::new(start, end).ok());
    merged
}

/// Replace sorted, non-overlapping intervals with the gaps between them.
///
/// Every sequence of the length table is covered: sequences without intervals become a single
/// interval spanning the whole sequence. Empty gaps, including those at either end of the
/// sequence, are never produced.
pub fn complement(intervals: IntervalSet, lengths: &LengthTable) -> Result<IntervalSet> {
    if let Some(seqid) = intervals.seqids().find(|x| !lengths.contains(x)) {
        length_of(lengths, seqid)?;
    }

    let mut gaps = IntervalSet::new();
    for (seqid, _) in lengths.iter() {
        let list = gaps.upsert(seqid);
        if let Some(bounds) = lengths.bounds(seqid) {
            *list = Interval::complement(intervals.get(seqid), &bounds);
        }
    }
    Ok(gaps)
}

/// Drop intervals shorter than `min_size`.
pub fn filter_size(intervals: IntervalSet, min_size: u64) -> IntervalSet {
    intervals.map(|_, mut list| {
        list.retain(|x| x.len() >= min_size);
        list
    })
}

/// Widen every interval by `flanking` positions on both sides, clipped to the sequence bounds.
/// Intervals that lie entirely past the end of their sequence are dropped.
pub fn flank(intervals: IntervalSet, flanking: u64, lengths: &LengthTable) -> Result<IntervalSet> {
    intervals.try_map(|seqid, list| {
        length_of(lengths, seqid)?;
        let Some(bounds) = lengths.bounds(seqid) else {
            return Ok(Vec::new());
        };
        Ok(list
            .into_iter()
            .filter_map(|x| x.extended(flanking, flanking).clamped(&bounds))
            .collect())
    })
}

/// Shape window-filtered spans into the final intervals: merge, then complement if requested,
/// then the size filter and finally flank extension.
pub fn run(intervals: IntervalSet, config: &Config, lengths: &LengthTable) -> Result<IntervalSet> {
    let total = intervals.total();

    let mut intervals = merge(intervals, config.merge_distance());
    if *config.complement() {
        intervals = complement(intervals, lengths)?;
    }
    let intervals = filter_size(intervals, *config.min_size());
    let intervals = flank(intervals, *config.flanking(), lengths)?;

    info!(
        "Normalized {total} spans into {} intervals on {} sequences",
        intervals.total(),
        intervals.len()
    );
    Ok(intervals)
}
