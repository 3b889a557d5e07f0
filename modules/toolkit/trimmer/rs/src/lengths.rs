use eyre::Result;
use log::info;
use seqtrim_io_rs::fasta;
use seqtrim_io_rs::ReadRecord;

use crate::error::{classify, Error};
use crate::intervals::LengthTable;

/// Scan a FASTA stream and record the number of residues of every sequence.
///
/// Sequences are keyed by the first token of their header. Records without residues have
/// length 0. A sequence ID that occurs twice is reported as malformed input.
pub fn from_reader(
    reader: &mut (impl ReadRecord<Record = fasta::Record> + ?Sized),
) -> Result<LengthTable> {
    let mut lengths = LengthTable::new();
    let mut record = fasta::Record::default();
    while reader.read_record(&mut record).map_err(classify)? {
        let seqid = record.seqid();
        if lengths.contains(seqid) {
            return Err(Error::MalformedInput(format!(
                "sequence {seqid} occurs more than once in the FASTA input"
            ))
            .into());
        }
        *lengths.upsert(seqid) = record.seq().len() as u64;
    }

    info!(
        "Indexed {} sequences with {} residues in total",
        lengths.len(),
        lengths.total()
    );
    Ok(lengths)
}
