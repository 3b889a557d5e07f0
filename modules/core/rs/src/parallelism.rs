use std::cmp::Ordering;
use std::thread::available_parallelism;

use eyre::Result;

// Negative requests count back from the number of cores: -1 = all cores, -2 = all but one, ...
fn normalize(requested: isize, max: isize) -> usize {
    match requested.cmp(&0) {
        Ordering::Less => (max + requested + 1).max(1) as usize,
        Ordering::Equal => 1,
        Ordering::Greater => requested.min(max) as usize,
    }
}

/// Number of worker threads to use for the requested parallelism level.
pub fn available(requested: isize) -> Result<usize> {
    let max = available_parallelism()?.get() as isize;
    Ok(normalize(requested, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_count_normalization() {
        for (threads, max, expected) in [
            (0, 8, 1),
            (1, 8, 1),
            (6, 8, 6),
            (8, 8, 8),
            (64, 8, 8),
            (-1, 8, 8),
            (-3, 8, 6),
            (-8, 8, 1),
            (-20, 8, 1),
        ] {
            assert_eq!(normalize(threads, max), expected);
        }
    }

    #[test]
    fn test_available_is_positive() -> Result<()> {
        assert!(available(-1)? >= 1);
        assert_eq!(available(1)?, 1);
        Ok(())
    }
}
