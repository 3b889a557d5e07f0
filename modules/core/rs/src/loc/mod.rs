pub use interval::{Interval, IntervalOp};

mod interval;
