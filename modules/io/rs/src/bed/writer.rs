use super::record::Region;
use crate::traits::WriteRecord;
use eyre::Result;
use seqtrim_core_rs::loc::IntervalOp;
use std::io::Write;

/// BED3 writer for [Region] records.
pub struct Writer<W> {
    writer: W,
}

impl<W: Write> Writer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> WriteRecord for Writer<W> {
    type Record = Region;

    fn write_record(&mut self, record: &Self::Record) -> Result<()> {
        writeln!(
            self.writer,
            "{}\t{}\t{}",
            record.seqid(),
            record.interval().start(),
            record.interval().end()
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
