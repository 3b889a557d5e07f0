pub mod bed;
pub mod compression;
mod error;
pub mod fasta;
mod traits;

pub use error::FormatError;
pub use traits::{ReadRecord, WriteRecord};
