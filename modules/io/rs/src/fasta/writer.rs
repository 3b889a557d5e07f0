use super::record::Record;
use crate::traits::WriteRecord;
use derive_getters::Dissolve;
use eyre::Result;
use std::io::Write;
use std::num::NonZeroUsize;

/// FASTA writer. Sequences are written on a single line unless a line width is given.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Dissolve)]
pub struct Writer<W> {
    writer: W,
    line_width: Option<NonZeroUsize>,
}

impl<W> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_width: None,
        }
    }

    pub fn with_line_width(mut self, line_width: NonZeroUsize) -> Self {
        self.line_width = Some(line_width);
        self
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Record;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        self.writer.write_all(b">")?;
        self.writer.write_all(record.id().as_bytes())?;
        self.writer.write_all(b"\n")?;

        match self.line_width {
            None => {
                self.writer.write_all(record.seq())?;
                self.writer.write_all(b"\n")?;
            }
            Some(width) => {
                for chunk in record.seq().chunks(width.get()) {
                    self.writer.write_all(chunk)?;
                    self.writer.write_all(b"\n")?;
                }
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fasta::Reader;
    use crate::ReadRecord;
    use std::io::Cursor;

    fn records() -> Result<Vec<Record>> {
        [("seq1|2", "CGT"), ("chr2 desc", "ACGTACGTAC")]
            .into_iter()
            .map(|x| x.try_into())
            .collect()
    }

    #[test]
    fn test_single_line_output() -> Result<()> {
        let mut produced = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut produced));
        for record in records()? {
            writer.write_record(&record)?;
        }
        writer.flush()?;

        assert_eq!(
            String::from_utf8(produced)?,
            ">seq1|2\nCGT\n>chr2 desc\nACGTACGTAC\n"
        );
        Ok(())
    }

    #[test]
    fn test_wrapped_output_round_trip() -> Result<()> {
        let mut produced = Vec::new();
        let mut writer =
            Writer::new(Cursor::new(&mut produced)).with_line_width(NonZeroUsize::new(4).unwrap());
        for record in records()? {
            writer.write_record(&record)?;
        }
        writer.flush()?;

        let text = String::from_utf8(produced)?;
        assert_eq!(text, ">seq1|2\nCGT\n>chr2 desc\nACGT\nACGT\nAC\n");

        let mut parsed = Vec::new();
        Reader::new(Cursor::new(text)).read_to_end(&mut parsed)?;
        assert_eq!(parsed, records()?);
        Ok(())
    }
}
