use eyre::Result;
use log::{debug, info};
use seqtrim_core_rs::loc::IntervalOp;
use seqtrim_io_rs::{fasta, ReadRecord, WriteRecord};

use crate::error::{classify, Error};
use crate::intervals::IntervalSet;

/// Counters of a trimming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// FASTA records read during emission.
    pub sequences: usize,
    /// Sequences that contributed at least one output record.
    pub trimmed_sequences: usize,
    pub records_written: usize,
    pub bases_in: u64,
    pub bases_written: u64,
}

/// Re-read the FASTA stream and write every selected region as a record of its own.
///
/// Output records follow the input order of sequences, then the order of their intervals.
/// Each header is `{seqid}|{start}` and the body holds the residues of `[start, end)`.
/// Sequences without intervals produce nothing.
pub fn write(
    reader: &mut (impl ReadRecord<Record = fasta::Record> + ?Sized),
    intervals: &IntervalSet,
    writer: &mut (impl WriteRecord<Record = fasta::Record> + ?Sized),
) -> Result<Summary> {
    let mut summary = Summary::default();
    let mut record = fasta::Record::default();
    while reader.read_record(&mut record).map_err(classify)? {
        summary.sequences += 1;
        summary.bases_in += record.seq().len() as u64;

        let seqid = record.seqid();
        let regions = intervals.get(seqid);
        if regions.is_empty() {
            continue;
        }
        summary.trimmed_sequences += 1;

        for region in regions {
            let (start, end) = (region.start(), region.end());
            let residues = usize::try_from(start)
                .ok()
                .zip(usize::try_from(end).ok())
                .and_then(|(start, end)| record.seq().get(start..end))
                .ok_or_else(|| {
                    Error::MalformedInput(format!(
                        "region {region} is out of bounds for sequence {seqid} of length {}",
                        record.seq().len()
                    ))
                })?;

            let trimmed = fasta::Record::new(format!("{seqid}|{start}"), residues.to_vec())?;
            writer.write_record(&trimmed)?;
            summary.records_written += 1;
            summary.bases_written += region.len();
        }
        debug!("{seqid}: wrote {} regions", regions.len());
    }
    writer.flush()?;

    info!(
        "Wrote {} records ({} bp) from {} of {} sequences ({} bp)",
        summary.records_written,
        summary.bases_written,
        summary.trimmed_sequences,
        summary.sequences,
        summary.bases_in
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqtrim_core_rs::loc::Interval;
    use std::io::Cursor;

    fn emit(content: &str, intervals: &IntervalSet) -> Result<(String, Summary)> {
        let mut produced = Vec::new();
        let mut writer = fasta::Writer::new(Cursor::new(&mut produced));
        let summary = write(&mut fasta::Reader::new(Cursor::new(content)), intervals, &mut writer)?;
        Ok((String::from_utf8(produced)?, summary))
    }

    #[test]
    fn test_single_region() -> Result<()> {
        let mut intervals = IntervalSet::new();
        intervals.upsert("seq1").push(Interval::new(2, 5)?);

        let (text, summary) = emit(">seq1\nACGTACGTAC\n", &intervals)?;
        assert_eq!(text, ">seq1|2\nCGT\n");
        assert_eq!(
            summary,
            Summary {
                sequences: 1,
                trimmed_sequences: 1,
                records_written: 1,
                bases_in: 10,
                bases_written: 3,
            }
        );
        Ok(())
    }

    #[test]
    fn test_input_order_is_kept() -> Result<()> {
        let mut intervals = IntervalSet::new();
        intervals
            .upsert("b")
            .extend([Interval::new(0, 2)?, Interval::new(4, 8)?]);
        intervals.upsert("a").push(Interval::new(1, 3)?);
        intervals.upsert("missing").push(Interval::new(0, 1)?);
        intervals.upsert("c");

        let content = ">b chromosome b\nAACC\nGGTT\n>c\nAAAA\n>a\nTTTT\n";
        let (text, summary) = emit(content, &intervals)?;
        assert_eq!(text, ">b|0\nAA\n>b|4\nGGTT\n>a|1\nTT\n");
        assert_eq!(summary.sequences, 3);
        assert_eq!(summary.trimmed_sequences, 2);
        assert_eq!(summary.records_written, 3);
        Ok(())
    }

    #[test]
    fn test_out_of_bounds_region() -> Result<()> {
        let mut intervals = IntervalSet::new();
        intervals.upsert("seq1").push(Interval::new(5, 20)?);

        let err = emit(">seq1\nACGTACGTAC\n", &intervals).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::MalformedInput(_))));
        Ok(())
    }
}
