pub use config::Config;
pub use error::Error;
pub use intervals::{IntervalSet, LengthTable, Scored};
pub use emit::Summary;
pub use trimmer::{InputSource, OutputTarget, Trimmer};

mod config;
pub mod emit;
mod error;
pub mod extract;
mod intervals;
pub mod lengths;
pub mod normalize;
mod trimmer;
pub mod window;
