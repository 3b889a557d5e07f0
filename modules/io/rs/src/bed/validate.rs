use eyre::{ensure, OptionExt, Result};
use seqtrim_core_rs::loc::{Interval, IntervalOp};

pub fn seqid(s: &str) -> Result<()> {
    ensure!(!s.is_empty(), "BED seqid can't be empty");
    ensure!(
        !s.chars().any(|c| c.is_whitespace()),
        "BED seqid can't contain whitespace characters, got: {s:?}"
    );
    Ok(())
}

pub fn field_count(count: usize) -> Result<()> {
    ensure!(
        (5..=9).contains(&count) || count == 12,
        "BED record must have 5 to 9 or exactly 12 fields, got {count}"
    );
    Ok(())
}

/// Relative blocks must stay addressable once shifted by the record start.
pub fn blocks(interval: &Interval<u64>, blocks: &[Interval<u64>]) -> Result<()> {
    for block in blocks {
        interval
            .start()
            .checked_add(block.end())
            .ok_or_eyre(format!(
                "BED block {block} overflows the coordinate range when shifted by {}",
                interval.start()
            ))?;
    }
    Ok(())
}
