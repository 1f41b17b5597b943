//! Raw n-gram count tables.
//!
//! `CountTable` accumulates unigram character frequencies and
//! context-conditional counts from segmented text. Counting is purely
//! additive and commutative: any chunking or reordering of the corpus,
//! followed by `merge`, produces the same totals as a single pass. The
//! training side relies on this to stream corpora in bounded batches and to
//! merge shard results before the loss model is built.

use std::collections::{HashMap, HashSet};

use crate::corpus::segments;
use crate::model::{begin_context, shift_context};

#[derive(Debug, thiserror::Error)]
pub enum CountError {
    #[error("gram_count mismatch: expected {expected}, found {found}")]
    GramCountMismatch { expected: usize, found: usize },
}

/// Unigram and context-conditional counts for one corpus (or one shard).
#[derive(Debug, Clone)]
pub struct CountTable {
    gram_count: usize,
    /// Character → number of occurrences anywhere in the corpus.
    freq: HashMap<char, u64>,
    /// (N−1)-char context → character → occurrences of that character
    /// immediately after the context within one segment.
    contexts: HashMap<String, HashMap<char, u64>>,
}

impl CountTable {
    pub fn new(gram_count: usize) -> Self {
        Self {
            gram_count,
            freq: HashMap::new(),
            contexts: HashMap::new(),
        }
    }

    pub fn gram_count(&self) -> usize {
        self.gram_count
    }

    pub fn freq(&self) -> &HashMap<char, u64> {
        &self.freq
    }

    pub fn contexts(&self) -> &HashMap<String, HashMap<char, u64>> {
        &self.contexts
    }

    /// Segment `line` against the accepted set and record every segment.
    pub fn record_line(&mut self, line: &str, accepted: &HashSet<char>) {
        for seg in segments(line, accepted) {
            self.record_segment(&seg);
        }
    }

    /// Record one contiguous segment.
    ///
    /// Every character increments its unigram frequency. Each character is
    /// also counted under the N−1 characters preceding it, with the segment
    /// virtually prefixed by N−1 BEGIN markers so leading characters land
    /// under BEGIN-containing contexts.
    pub fn record_segment(&mut self, seg: &str) {
        let width = self.gram_count.saturating_sub(1);
        let mut ctx = begin_context(width);
        for c in seg.chars() {
            *self.freq.entry(c).or_insert(0) += 1;
            *self
                .contexts
                .entry(ctx.clone())
                .or_default()
                .entry(c)
                .or_insert(0) += 1;
            ctx = shift_context(&ctx, c);
        }
    }

    /// Point-wise addition of another table into this one.
    pub fn merge(&mut self, other: CountTable) -> Result<(), CountError> {
        if other.gram_count != self.gram_count {
            return Err(CountError::GramCountMismatch {
                expected: self.gram_count,
                found: other.gram_count,
            });
        }
        for (c, n) in other.freq {
            *self.freq.entry(c).or_insert(0) += n;
        }
        for (ctx, table) in other.contexts {
            let dest = self.contexts.entry(ctx).or_default();
            for (c, n) in table {
                *dest.entry(c).or_insert(0) += n;
            }
        }
        Ok(())
    }
}
