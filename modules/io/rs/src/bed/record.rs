use super::validate;
use derive_getters::{Dissolve, Getters};
use eyre::Result;
use seqtrim_core_rs::loc::{Interval, IntervalOp};

/// A scored BED record. Simple records (5 to 9 fields) have no blocks; BED12 records carry their
/// blocks in coordinates relative to the record start.
#[derive(Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters)]
pub struct Record {
    seqid: String,
    interval: Interval<u64>,
    name: String,
    score: i64,
    blocks: Vec<Interval<u64>>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            seqid: "_".to_string(),
            interval: Interval::default(),
            name: ".".to_string(),
            score: 0,
            blocks: Vec::new(),
        }
    }
}

impl Record {
    pub fn new(
        seqid: String,
        interval: Interval<u64>,
        name: String,
        score: i64,
        blocks: Vec<Interval<u64>>,
    ) -> Result<Self> {
        validate::seqid(&seqid)?;
        validate::blocks(&interval, &blocks)?;
        Ok(Self {
            seqid,
            interval,
            name,
            score,
            blocks,
        })
    }

    /// Covered segments in absolute coordinates: the blocks shifted by the record start for
    /// BED12 records, or the record interval itself otherwise.
    pub fn segments(&self) -> Vec<Interval<u64>> {
        if self.blocks.is_empty() {
            vec![self.interval]
        } else {
            let offset = self.interval.start();
            // Shifting can't overflow, blocks are validated against the record start
            self.blocks.iter().filter_map(|x| x.shifted(offset)).collect()
        }
    }

    /// # Safety
    /// The caller must ensure that all fields remain valid after modification.
    pub(crate) unsafe fn fields(
        &mut self,
    ) -> (
        &mut String,
        &mut Interval<u64>,
        &mut String,
        &mut i64,
        &mut Vec<Interval<u64>>,
    ) {
        (
            &mut self.seqid,
            &mut self.interval,
            &mut self.name,
            &mut self.score,
            &mut self.blocks,
        )
    }
}

/// A BED3 region: sequence ID and a half-open interval.
#[derive(Debug, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Dissolve, Getters)]
pub struct Region {
    seqid: String,
    interval: Interval<u64>,
}

impl Region {
    pub fn new(seqid: String, interval: Interval<u64>) -> Result<Self> {
        validate::seqid(&seqid)?;
        Ok(Self { seqid, interval })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments() -> Result<()> {
        let simple = Record::new("chr1".into(), Interval::new(10, 20)?, "a".into(), 5, vec![])?;
        assert_eq!(simple.segments(), vec![Interval::new(10, 20)?]);

        let blocked = Record::new(
            "chr1".into(),
            Interval::new(100, 200)?,
            "b".into(),
            3,
            vec![Interval::new(0, 10)?, Interval::new(40, 100)?],
        )?;
        assert_eq!(
            blocked.segments(),
            vec![Interval::new(100, 110)?, Interval::new(140, 200)?]
        );
        Ok(())
    }

    #[test]
    fn test_blocks_must_fit_after_shift() -> Result<()> {
        let start = u64::MAX - 15;
        let interval = Interval::new(start, u64::MAX)?;
        let fits = vec![Interval::new(0, 15)?];
        let record = Record::new("chr1".into(), interval, "a".into(), 1, fits)?;
        assert_eq!(record.segments(), vec![Interval::new(start, u64::MAX)?]);

        let overflows = vec![Interval::new(100, 101)?];
        assert!(Record::new("chr1".into(), interval, "a".into(), 1, overflows).is_err());
        Ok(())
    }

    #[test]
    fn test_invalid_seqid() -> Result<()> {
        for seqid in ["", "chr 1", "chr1\t"] {
            assert!(Record::new(seqid.into(), Interval::new(0, 1)?, ".".into(), 0, vec![]).is_err());
            assert!(Region::new(seqid.into(), Interval::new(0, 1)?).is_err());
        }
        Ok(())
    }
}
