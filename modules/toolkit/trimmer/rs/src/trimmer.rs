use std::fmt::{self, Debug, Formatter};
use std::io::{Read, Write};
use std::path::PathBuf;

use eyre::{Result, WrapErr};
use log::{info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use seqtrim_core_rs::parallelism;
use seqtrim_io_rs::bed::{self, Region};
use seqtrim_io_rs::{compression, fasta, ReadRecord, WriteRecord};

use crate::config::Config;
use crate::emit::{self, Summary};
use crate::intervals::{IntervalSet, LengthTable, Scored};
use crate::{extract, lengths, normalize, window};

type BoxedReader<'a, T> = Box<dyn ReadRecord<Record = T> + Send + Sync + 'a>;

/// Where an input stream comes from. Files are re-opened for every pass over the data, other
/// streams are read into memory once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Path(PathBuf),
    Buffered(Vec<u8>),
}

impl InputSource {
    /// Drain a non-seekable stream into memory.
    pub fn buffer(mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .wrap_err("Failed to buffer the input stream")?;
        Ok(InputSource::Buffered(bytes))
    }

    fn fasta(&self) -> Result<BoxedReader<'_, fasta::Record>> {
        match self {
            InputSource::Path(path) => fasta::Reader::from_path(path)
                .wrap_err_with(|| format!("Failed to open FASTA {}", path.display())),
            InputSource::Buffered(bytes) => {
                Ok(Box::new(fasta::Reader::new(compression::read_buffer(bytes))))
            }
        }
    }

    fn bed(&self) -> Result<BoxedReader<'_, bed::Record>> {
        match self {
            InputSource::Path(path) => bed::Reader::from_path(path)
                .wrap_err_with(|| format!("Failed to open BED {}", path.display())),
            InputSource::Buffered(bytes) => {
                Ok(Box::new(bed::Reader::new(compression::read_buffer(bytes))))
            }
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(path: PathBuf) -> Self {
        InputSource::Path(path)
    }
}

/// Destination of an output stream, resolved once by [OutputTarget::open].
pub enum OutputTarget {
    /// A file to create. Paths ending with `.gz` are gzip-compressed.
    Path(PathBuf),
    /// An already open sink, e.g. stdout.
    Sink(Box<dyn Write + Send>),
}

impl OutputTarget {
    pub fn open(self) -> Result<Box<dyn Write + Send>> {
        match self {
            OutputTarget::Path(path) => compression::write_file(&path)
                .wrap_err_with(|| format!("Failed to open output {}", path.display())),
            OutputTarget::Sink(sink) => Ok(sink),
        }
    }
}

impl From<PathBuf> for OutputTarget {
    fn from(path: PathBuf) -> Self {
        OutputTarget::Path(path)
    }
}

impl Debug for OutputTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Path(path) => f.debug_tuple("Path").field(path).finish(),
            OutputTarget::Sink(_) => f.write_str("Sink"),
        }
    }
}

/// Trims FASTA sequences down to the regions supported by a coverage annotation.
pub struct Trimmer {
    config: Config,
    pool: ThreadPool,
}

impl Trimmer {
    /// Validate the configuration and set up the worker pool.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism::available(*config.threads())?)
            .build()?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compute the final intervals of every sequence without writing any output. The FASTA
    /// source is read once to collect sequence lengths.
    pub fn plan(&self, fasta: &InputSource, bed: &InputSource) -> Result<(LengthTable, IntervalSet)> {
        let lengths = lengths::from_reader(fasta.fasta()?.as_mut())?;
        let coverage = extract::from_reader(bed.bed()?.as_mut(), *self.config.depth())?;
        let coverage = Self::drop_unknown(coverage, &lengths);

        let intervals = self.pool.install(|| -> Result<IntervalSet> {
            let spans = window::filter(
                *self.config.window_size(),
                *self.config.threshold(),
                coverage,
                &lengths,
            )?;
            normalize::run(spans, &self.config, &lengths)
        })?;
        Ok((lengths, intervals))
    }

    /// Run the whole pipeline: plan the intervals, then re-read the FASTA source and write the
    /// selected regions to `output`. The final intervals are written as BED3 to `regions` if given.
    pub fn run(
        &self,
        fasta: &InputSource,
        bed: &InputSource,
        output: OutputTarget,
        regions: Option<OutputTarget>,
    ) -> Result<Summary> {
        // Resolve all outputs before doing any work
        let mut writer = fasta::Writer::new(output.open()?);
        let regions = regions.map(OutputTarget::open).transpose()?;

        let (_, intervals) = self.plan(fasta, bed)?;
        if let Some(sink) = regions {
            Self::export(&intervals, bed::Writer::new(sink))?;
        }

        let summary = emit::write(fasta.fasta()?.as_mut(), &intervals, &mut writer)?;
        info!("Trimming finished: {summary:?}");
        Ok(summary)
    }

    // Coverage on sequences that are not in the FASTA input can never be emitted
    fn drop_unknown(mut coverage: IntervalSet<Scored>, lengths: &LengthTable) -> IntervalSet<Scored> {
        let unknown: Vec<String> = coverage
            .seqids()
            .filter(|x| !lengths.contains(x))
            .map(str::to_owned)
            .collect();
        for seqid in unknown {
            if let Some(dropped) = coverage.remove(&seqid) {
                warn!(
                    "Sequence {seqid} is missing from the FASTA input, dropping {} coverage intervals",
                    dropped.len()
                );
            }
        }
        coverage
    }

    fn export<W: Write>(intervals: &IntervalSet, mut writer: bed::Writer<W>) -> Result<()> {
        for (seqid, list) in intervals.iter() {
            for interval in list {
                writer.write_record(&Region::new(seqid.to_owned(), *interval)?)?;
            }
        }
        writer.flush()
    }
}
