// Format specification: https://samtools.github.io/hts-specs/BEDv1.pdf
//
// Coverage annotations are read leniently compared to the specification:
// - score is any signed integer (coverage depths are not capped at 1000)
// - name, strand, thick and itemRgb fields are carried as text and not validated
// - records have 5 to 9 fields (simple) or exactly 12 fields (blocked)
//
// For blocked records blockSizes and blockStarts are comma-separated lists (a trailing comma
// is allowed) with exactly blockCount items, and blockStarts are relative to chromStart.

mod reader;
mod record;
pub mod validate;
mod writer;

pub use reader::Reader;
pub use record::{Record, Region};
pub use writer::Writer;
