use derive_getters::{Dissolve, Getters};
use eyre::Result;

use crate::error::Error;

/// Parameters of a trimming run.
#[derive(Clone, PartialEq, Debug, Dissolve, Getters)]
pub struct Config {
    // Final interval shaping
    flanking: u64,
    min_size: u64,
    complement: bool,
    // Coverage thresholding
    window_size: u64,
    threshold: f64,
    depth: i64,
    // Worker threads, negative values count back from the number of available cores
    threads: isize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            flanking: 0,
            min_size: 0,
            complement: false,
            window_size: 10,
            threshold: 0.8,
            depth: 1,
            threads: 1,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_flanking(&mut self, flanking: u64) -> &mut Self {
        self.flanking = flanking;
        self
    }

    pub fn set_min_size(&mut self, min_size: u64) -> &mut Self {
        self.min_size = min_size;
        self
    }

    pub fn set_complement(&mut self, complement: bool) -> &mut Self {
        self.complement = complement;
        self
    }

    pub fn set_window_size(&mut self, window_size: u64) -> &mut Self {
        self.window_size = window_size;
        self
    }

    pub fn set_threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = threshold;
        self
    }

    pub fn set_depth(&mut self, depth: i64) -> &mut Self {
        self.depth = depth;
        self
    }

    pub fn set_threads(&mut self, threads: isize) -> &mut Self {
        self.threads = threads;
        self
    }

    /// Intervals closer than this are fused before flanking, so flanks of neighbours never overlap.
    pub fn merge_distance(&self) -> u64 {
        self.flanking.saturating_mul(2)
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidConfiguration("window size must be positive".into()).into());
        }
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(Error::InvalidConfiguration(format!(
                "threshold must be in (0, 1], got {}",
                self.threshold
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(*config.flanking(), 0);
        assert_eq!(*config.min_size(), 0);
        assert_eq!(*config.window_size(), 10);
        assert_eq!(*config.threshold(), 0.8);
        assert_eq!(*config.depth(), 1);
        assert!(!*config.complement());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_distance() {
        assert_eq!(Config::new().set_flanking(2).merge_distance(), 4);
        assert_eq!(Config::new().set_flanking(u64::MAX).merge_distance(), u64::MAX);
    }

    #[test]
    fn test_invalid_configuration() {
        for (window, threshold) in [(0, 0.8), (10, 0.0), (10, -0.5), (10, 1.01), (10, f64::NAN)] {
            let mut config = Config::new();
            config.set_window_size(window).set_threshold(threshold);

            let err = config.validate().unwrap_err();
            assert!(
                matches!(err.downcast_ref::<Error>(), Some(Error::InvalidConfiguration(_))),
                "window={window}, threshold={threshold}"
            );
        }

        let mut config = Config::new();
        config.set_window_size(1).set_threshold(1.0);
        assert!(config.validate().is_ok());
    }
}
