use eyre::Result;
use log::info;
use seqtrim_io_rs::bed;
use seqtrim_io_rs::ReadRecord;

use crate::error::classify;
use crate::intervals::{IntervalSet, Scored};

/// Collect scored coverage intervals from BED records whose score is at least `depth`.
///
/// Every block of a BED12 record becomes an independent interval carrying the score of the
/// whole record. Lists keep the order of the input and are not deduplicated.
pub fn from_reader(
    reader: &mut (impl ReadRecord<Record = bed::Record> + ?Sized),
    depth: i64,
) -> Result<IntervalSet<Scored>> {
    let mut intervals = IntervalSet::new();
    let mut record = bed::Record::default();
    let (mut records, mut kept) = (0usize, 0usize);
    while reader.read_record(&mut record).map_err(classify)? {
        records += 1;
        if *record.score() < depth {
            continue;
        }
        kept += 1;

        let score = *record.score();
        intervals
            .upsert(record.seqid())
            .extend(record.segments().into_iter().map(|x| Scored::new(x, score)));
    }

    info!(
        "Kept {kept} of {records} BED records with score >= {depth}: {} intervals on {} sequences",
        intervals.total(),
        intervals.len()
    );
    Ok(intervals)
}
