use thiserror::Error;

/// A violation of the textual format of an input file. I/O failures are reported separately.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{format} line {line}: {message}")]
pub struct FormatError {
    pub format: &'static str,
    pub line: usize,
    pub message: String,
}

impl FormatError {
    pub fn fasta(line: usize, message: impl Into<String>) -> Self {
        Self {
            format: "FASTA",
            line,
            message: message.into(),
        }
    }

    pub fn bed(line: usize, message: impl Into<String>) -> Self {
        Self {
            format: "BED",
            line,
            message: message.into(),
        }
    }
}
