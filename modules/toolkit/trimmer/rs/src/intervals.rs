use std::collections::BTreeMap;

use derive_more::Constructor;
use eyre::Result;
use rayon::prelude::*;
use seqtrim_core_rs::loc::Interval;

/// Coverage interval with the score of the annotation record it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Constructor)]
pub struct Scored {
    pub interval: Interval<u64>,
    pub score: i64,
}

/// Per-sequence interval lists keyed by sequence ID. Iteration order is the sorted order of IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalSet<T = Interval<u64>> {
    inner: BTreeMap<String, Vec<T>>,
}

impl<T> Default for IntervalSet<T> {
    fn default() -> Self {
        Self {
            inner: BTreeMap::new(),
        }
    }
}

impl<T> IntervalSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interval list of the sequence, created empty on first access.
    pub fn upsert(&mut self, seqid: &str) -> &mut Vec<T> {
        self.inner.entry(seqid.to_owned()).or_default()
    }

    /// Interval list of the sequence, empty for unknown sequences.
    pub fn get(&self, seqid: &str) -> &[T] {
        self.inner.get(seqid).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, seqid: &str) -> bool {
        self.inner.contains_key(seqid)
    }

    pub fn remove(&mut self, seqid: &str) -> Option<Vec<T>> {
        self.inner.remove(seqid)
    }

    /// Number of sequences.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of intervals across all sequences.
    pub fn total(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }

    pub fn seqids(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Transform every interval list independently, sharding sequences across the current
    /// rayon thread pool. The first error aborts the transformation.
    pub fn try_map<U, F>(self, func: F) -> Result<IntervalSet<U>>
    where
        T: Send,
        U: Send,
        F: Fn(&str, Vec<T>) -> Result<Vec<U>> + Sync + Send,
    {
        let inner = self
            .inner
            .into_par_iter()
            .map(|(seqid, list)| {
                let list = func(&seqid, list)?;
                Ok((seqid, list))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        Ok(IntervalSet { inner })
    }

    /// Infallible version of [IntervalSet::try_map].
    pub fn map<U, F>(self, func: F) -> IntervalSet<U>
    where
        T: Send,
        U: Send,
        F: Fn(&str, Vec<T>) -> Vec<U> + Sync + Send,
    {
        let inner = self
            .inner
            .into_par_iter()
            .map(|(seqid, list)| {
                let list = func(&seqid, list);
                (seqid, list)
            })
            .collect();
        IntervalSet { inner }
    }
}

impl<T> FromIterator<(String, Vec<T>)> for IntervalSet<T> {
    fn from_iter<I: IntoIterator<Item = (String, Vec<T>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (seqid, list) in iter {
            set.upsert(&seqid).extend(list);
        }
        set
    }
}

/// Sequence lengths keyed by sequence ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthTable {
    inner: BTreeMap<String, u64>,
}

impl LengthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Length slot of the sequence, created as 0 on first access.
    pub fn upsert(&mut self, seqid: &str) -> &mut u64 {
        self.inner.entry(seqid.to_owned()).or_default()
    }

    pub fn get(&self, seqid: &str) -> Option<u64> {
        self.inner.get(seqid).copied()
    }

    pub fn contains(&self, seqid: &str) -> bool {
        self.inner.contains_key(seqid)
    }

    /// The whole sequence as an interval, `None` for unknown or empty sequences.
    pub fn bounds(&self, seqid: &str) -> Option<Interval<u64>> {
        self.get(seqid).and_then(|len| Interval::new(0, len).ok())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Sum of all sequence lengths.
    pub fn total(&self) -> u64 {
        self.inner.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, u64)> for LengthTable {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
