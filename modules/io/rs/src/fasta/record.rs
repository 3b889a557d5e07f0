use super::validate;
use derive_getters::{Dissolve, Getters};
use derive_more::Into;
use eyre::Result;
use std::error::Error;

/// A single FASTA record with the following guarantees:
/// - The ID is a non-empty UTF-8 string without newline characters. It holds the whole header
///   line except the leading '>', so any description after the first token is preserved.
/// - The sequence is any byte string without line breaks and may be empty.
///
/// There are no guarantees on the biological meaningfulness of the stored sequence.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters, Into)]
pub struct Record {
    id: String,
    seq: Vec<u8>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: "Default ID".to_string(),
            seq: b"ACGT".to_vec(),
        }
    }
}

impl<ID, SEQ> TryFrom<(ID, SEQ)> for Record
where
    ID: TryInto<String, Error: Error + Send + Sync + 'static>,
    SEQ: TryInto<Vec<u8>, Error: Error + Send + Sync + 'static>,
{
    type Error = eyre::Report;

    fn try_from(value: (ID, SEQ)) -> Result<Self> {
        Self::new(value.0.try_into()?, value.1.try_into()?)
    }
}

impl Record {
    /// Creates a new FASTA record with the given ID and sequence.
    pub fn new(id: String, seq: Vec<u8>) -> Result<Self> {
        validate::id(&id)?;
        validate::seq(&seq)?;
        Ok(Self { id, seq })
    }

    /// Sequence identifier: the first whitespace-delimited token of the ID.
    pub fn seqid(&self) -> &str {
        self.id.split_whitespace().next().unwrap_or_default()
    }

    /// # Safety
    /// The caller must ensure that all fields remain valid after modification.
    pub(crate) unsafe fn fields(&mut self) -> (&mut String, &mut Vec<u8>) {
        (&mut self.id, &mut self.seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_record() -> Result<()> {
        for (id, seq, seqid) in [
            ("seq1", "ACGTACGT", "seq1"),
            ("chr1 assembled molecule", "a", "chr1"),
            ("scaffold_7\tlen=10", "NNNN-ACGT*", "scaffold_7"),
            ("empty", "", "empty"),
            ("spaced", "AC GT>", "spaced"),
            ("unicode", "ACGTé", "unicode"),
        ] {
            let record: Record = (id, seq).try_into()?;
            assert_eq!(record.id(), id);
            assert_eq!(record.seqid(), seqid);
            assert_eq!(record.seq(), seq.as_bytes());
        }
        Ok(())
    }

    #[test]
    fn test_invalid_records() {
        for (id, seq) in [
            ("", "ACGT"),
            ("   ", "ACGT"),
            ("id\n", "ACGT"),
            ("id\r", "ACGT"),
            ("id", "ACGT\n"),
            ("id", "AC\rGT"),
        ] {
            let record: Result<Record> = (id, seq).try_into();
            assert!(record.is_err(), "Record: {:?}", record);
        }
    }
}
