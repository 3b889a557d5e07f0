use eyre::{ensure, Result, WrapErr};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub enum DecompressedStream {
    PlainText(File),
    Gzip(MultiGzDecoder<File>),
}

impl DecompressedStream {
    pub fn box_bufread(self) -> Box<dyn BufRead + Send + Sync + 'static> {
        match self {
            DecompressedStream::PlainText(file) => Box::new(BufReader::new(file)),
            DecompressedStream::Gzip(decoder) => Box::new(BufReader::new(decoder)),
        }
    }
}

/// Open a file for reading. Gzip content is detected from the file signature, not the extension.
pub fn read_file(path: impl AsRef<Path>) -> Result<DecompressedStream> {
    let path = path.as_ref();
    ensure!(path.exists(), "File {} does not exist", path.display());

    let kind = infer::get_from_path(path)
        .wrap_err_with(|| format!("Failed to inspect {}", path.display()))?;
    let file = File::open(path)?;

    let stream = match kind.map(|x| (x.extension(), x.mime_type())) {
        Some(("gz", "application/gzip")) => {
            log::debug!("Reading {} as gzip", path.display());
            DecompressedStream::Gzip(MultiGzDecoder::new(file))
        }
        // Always assume plain text if there is no clear match
        _ => DecompressedStream::PlainText(file),
    };
    Ok(stream)
}

/// Wrap an in-memory buffer for reading, decompressing it if it carries a gzip signature.
pub fn read_buffer(bytes: &[u8]) -> Box<dyn BufRead + Send + Sync + '_> {
    match infer::get(bytes).map(|x| x.mime_type()) {
        Some("application/gzip") => Box::new(BufReader::new(MultiGzDecoder::new(bytes))),
        _ => Box::new(bytes),
    }
}

/// Create a file for writing. Paths ending with `.gz` are gzip-compressed.
pub fn write_file(path: impl AsRef<Path>) -> Result<Box<dyn Write + Send + 'static>> {
    let path = path.as_ref();
    let file = File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;

    let gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext, "gz" | "gzip"))
        .unwrap_or(false);

    let boxed: Box<dyn Write + Send + 'static> = if gzipped {
        Box::new(GzEncoder::new(BufWriter::new(file), Compression::default()))
    } else {
        Box::new(BufWriter::new(file))
    };
    Ok(boxed)
}
