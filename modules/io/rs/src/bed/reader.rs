use super::record::Record;
use super::validate;
use crate::compression;
use crate::error::FormatError;
use crate::traits::ReadRecord;
use eyre::{bail, ensure, OptionExt, Result, WrapErr};
use log::debug;
use seqtrim_core_rs::loc::Interval;
use std::io::BufRead;
use std::path::Path;

pub mod parse {
    use super::*;

    pub fn seqid<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<String> {
        let seqid = parts.next().ok_or_eyre("Missing BED seqid")?;
        validate::seqid(seqid)?;
        Ok(seqid.to_owned())
    }

    /// Parse chromStart and chromEnd. Zero-length features (start == end) are valid BED but
    /// cover nothing, they are reported as `None`.
    pub fn interval<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Option<Interval<u64>>> {
        let start = parts.next().ok_or_eyre("Missing BED start")?;
        let end = parts.next().ok_or_eyre("Missing BED end")?;

        let (start, end) = match (start.parse::<u64>(), end.parse::<u64>()) {
            (Ok(start), Ok(end)) => (start, end),
            _ => bail!("Invalid BED interval: {start}-{end}"),
        };
        ensure!(start <= end, "Invalid BED interval: start > end ({start} > {end})");
        if start == end {
            return Ok(None);
        }
        Ok(Some(Interval::new(start, end)?))
    }

    pub fn name<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<String> {
        let name = parts.next().ok_or_eyre("Missing BED name")?;
        Ok(name.to_owned())
    }

    pub fn score<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<i64> {
        let score = parts.next().ok_or_eyre("Missing BED score")?;
        score
            .parse::<i64>()
            .wrap_err_with(|| format!("Invalid BED score: {score}"))
    }

    /// Parse blockCount, blockSizes, and blockStarts into intervals relative to the record start.
    /// Zero-size blocks are counted but not returned.
    pub fn blocks<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<Vec<Interval<u64>>> {
        let count = parts.next().ok_or_eyre("Missing BED blockCount")?;
        let count = count.parse::<usize>().wrap_err("Invalid BED blockCount")?;
        ensure!(count > 0, "BED blockCount must be greater than 0");

        let sizes = parts.next().ok_or_eyre("Missing BED blockSizes")?;
        let starts = parts.next().ok_or_eyre("Missing BED blockStarts")?;

        // Trim the trailing comma if it exists in sizes/starts (allowed by the BED specification)
        let mut sizes = sizes.strip_suffix(',').unwrap_or(sizes).split(',');
        let mut starts = starts.strip_suffix(',').unwrap_or(starts).split(',');

        let mut results = Vec::with_capacity(count);
        for _ in 0..count {
            let (size, start) = match (sizes.next(), starts.next()) {
                (Some(size), Some(start)) => (size, start),
                _ => bail!("BED blockCount does not match the number of blocks in the record"),
            };

            let size = size.trim().parse::<u64>().wrap_err("Invalid BED blockSizes")?;
            let start = start.trim().parse::<u64>().wrap_err("Invalid BED blockStarts")?;

            let end = start
                .checked_add(size)
                .ok_or_eyre(format!("BED block {start}+{size} overflows the coordinate range"))?;
            if size > 0 {
                results.push(Interval::new(start, end)?);
            }
        }

        ensure!(
            sizes.next().is_none() && starts.next().is_none(),
            "BED blockCount does not match the number of blocks in the record"
        );

        Ok(results)
    }

    /// Parse a complete data line into the record buffer. Returns `false`, leaving the buffer
    /// untouched, for well-formed records that cover nothing: zero-length features and BED12
    /// records whose blocks are all empty.
    pub fn record(line: &str, into: &mut Record) -> Result<bool> {
        let count = line.split('\t').count();
        validate::field_count(count)?;

        let mut parts = line.split('\t');
        let seqid = seqid(&mut parts)?;
        let interval = interval(&mut parts)?;
        let name = name(&mut parts)?;
        let score = score(&mut parts)?;

        let mut blocks_ = Vec::new();
        if count == 12 {
            // Skip strand, thickStart, thickEnd, and itemRgb
            let mut parts = parts.skip(4);
            blocks_ = blocks(&mut parts)?;
            if blocks_.is_empty() {
                return Ok(false);
            }
        }
        let Some(interval) = interval else {
            return Ok(false);
        };
        validate::blocks(&interval, &blocks_)?;

        // SAFETY: every field is parsed and validated before being stored
        let (seqid_, interval_, name_, score_, target) = unsafe { into.fields() };
        *seqid_ = seqid;
        *interval_ = interval;
        *name_ = name;
        *score_ = score;
        *target = blocks_;
        Ok(true)
    }
}

/// BED reader yielding scored records. Blank lines and lines starting with '#' are skipped.
pub struct Reader<R> {
    reader: R,
    buffer: String,
    lineno: usize,
}

impl<R> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
            lineno: 0,
        }
    }
}

impl Reader<()> {
    /// Create a new BED reader from the given file path. Gzip compression is detected
    /// automatically from the file signature.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn ReadRecord<Record = Record> + Send + Sync + 'static>> {
        let stream = compression::read_file(path)?.box_bufread();
        Ok(Box::new(Reader::new(stream)))
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    fn read_record(&mut self, into: &mut Record) -> Result<bool> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(false);
            }
            self.lineno += 1;

            let line = self.buffer.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match parse::record(line, into) {
                Ok(true) => return Ok(true),
                Ok(false) => debug!("Skipping empty BED feature at line {}: {line}", self.lineno),
                Err(err) => {
                    return Err(FormatError::bed(self.lineno, format!("{err:#}: {line}")).into())
                }
            }
        }
    }
}
