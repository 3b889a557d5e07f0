use eyre::Report;
use seqtrim_io_rs::FormatError;
use thiserror::Error;

/// Failures of a trimming run that callers may want to tell apart. Retrieve them from an
/// [eyre::Report] with `downcast_ref::<Error>()`; everything else is an I/O failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl From<FormatError> for Error {
    fn from(err: FormatError) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

/// Turn format violations reported by the readers into [Error::MalformedInput].
pub(crate) fn classify(report: Report) -> Report {
    match report.downcast::<FormatError>() {
        Ok(err) => Error::from(err).into(),
        Err(report) => report,
    }
}
