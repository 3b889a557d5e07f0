use super::{record::Record, validate};
use crate::compression;
use crate::error::FormatError;
use crate::traits::ReadRecord;
use derive_getters::Dissolve;
use eyre::Result;
use std::io::BufRead;
use std::path::Path;

/// A line-oriented FASTA reader that yields a single record at a time. Ignores:
/// - Blank lines anywhere in the file
/// - Leading and trailing whitespace of every line (including Windows line endings)
///
/// Returns an error if there are:
/// - Errors while reading from the underlying reader
/// - Residue lines before the first header
/// - Headers without an identifier
///
/// Records with a header but no residue lines are valid and have an empty sequence. Residue
/// lines are kept byte for byte apart from the trimmed edges.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Dissolve)]
pub struct Reader<R> {
    reader: R,
    line: Vec<u8>,
    lineno: usize,
    pending: Option<String>,
}

impl Reader<()> {
    /// Create a new FASTA reader from the given file path. Gzip compression is detected
    /// automatically from the file signature.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Box<dyn ReadRecord<Record = Record> + Send + Sync + 'static>> {
        let stream = compression::read_file(path)?.box_bufread();
        Ok(Box::new(Reader::new(stream)))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            lineno: 0,
            pending: None,
        }
    }

    /// Read the next non-blank line into the internal buffer. Returns false at EOF.
    fn next_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line)? == 0 {
                return Ok(false);
            }
            self.lineno += 1;
            if !self.line.trim_ascii().is_empty() {
                return Ok(true);
            }
        }
    }

    fn parse_header(&self) -> Result<String> {
        let line = self.line.trim_ascii();
        debug_assert_eq!(line.first(), Some(&b'>'));

        let header = std::str::from_utf8(&line[1..])
            .map_err(|_| FormatError::fasta(self.lineno, "FASTA header is not valid UTF-8"))?;
        validate::id(header).map_err(|err| FormatError::fasta(self.lineno, err.to_string()))?;
        Ok(header.to_owned())
    }

    fn read_parts(&mut self, record: &mut Record) -> Result<bool> {
        // Locate the header of the next record
        let header = match self.pending.take() {
            Some(header) => header,
            None => {
                if !self.next_line()? {
                    return Ok(false);
                }
                if self.line.trim_ascii().first() != Some(&b'>') {
                    return Err(FormatError::fasta(
                        self.lineno,
                        "Sequence residues found before the first FASTA header",
                    )
                    .into());
                }
                self.parse_header()?
            }
        };

        // SAFETY: The ID is validated above and the sequence is validated line by line below
        let (id, seq) = unsafe { record.fields() };
        *id = header;
        seq.clear();

        while self.next_line()? {
            let line = self.line.trim_ascii();
            if line.first() == Some(&b'>') {
                self.pending = Some(self.parse_header()?);
                break;
            }
            validate::seq(line).map_err(|err| FormatError::fasta(self.lineno, err.to_string()))?;
            seq.extend_from_slice(line);
        }

        Ok(true)
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    /// Parse the next FASTA record into the given [Record] buffer.
    /// Returns `false` if there are no more records to read.
    ///
    /// On error the buffer is left in an unspecified state, but can be reused for the next read.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        self.read_parts(into)
    }
}
