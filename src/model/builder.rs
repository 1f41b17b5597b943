//! Loss model construction from raw counts.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{begin_context, default_context, LossModel, ModelError};
use crate::ngram::CountTable;

/// Convert raw count tables into a [`LossModel`].
///
/// For every observed context `k` and character `c` observed under it:
/// `loss(k,c) = -ln(μ·count(k,c)/total_k + (1−μ)·p_uni(c))`. The BEGIN
/// context is populated over the whole accepted universe, the DEFAULT
/// context stores `-ln(p_uni(c))`, and contexts with a zero total count are
/// treated as unobserved.
pub fn build_model(
    counts: &CountTable,
    accepted: &HashSet<char>,
    smoothing: f64,
) -> Result<LossModel, ModelError> {
    let gram_count = counts.gram_count();
    if gram_count < 2 {
        return Err(ModelError::InvalidGramCount(gram_count));
    }
    if !(smoothing > 0.0 && smoothing < 1.0) {
        return Err(ModelError::InvalidSmoothing(smoothing));
    }
    let width = gram_count - 1;

    // Unigram distribution over the accepted universe. Never-seen characters
    // get a pseudo-count of 1, and the divisor includes the pseudo-counts so
    // every probability stays in (0, 1].
    let freq = counts.freq();
    let total: u64 = accepted
        .iter()
        .map(|c| freq.get(c).copied().unwrap_or(0).max(1))
        .sum();
    let unigram: HashMap<char, f64> = accepted
        .iter()
        .map(|&c| {
            let n = freq.get(&c).copied().unwrap_or(0).max(1);
            (c, n as f64 / total as f64)
        })
        .collect();
    let p_uni = |c: char| unigram.get(&c).copied().unwrap_or(1.0 / total.max(1) as f64);

    let interpolate = |count: u64, total_k: u64, c: char| -> f64 {
        -(smoothing * count as f64 / total_k as f64 + (1.0 - smoothing) * p_uni(c)).ln()
    };

    let begin = begin_context(width);
    let mut losses: HashMap<String, HashMap<char, f64>> =
        HashMap::with_capacity(counts.contexts().len() + 2);

    for (ctx, table) in counts.contexts() {
        if *ctx == begin {
            // Handled below over the full universe.
            continue;
        }
        let total_k: u64 = table.values().sum();
        if total_k == 0 {
            continue;
        }
        let row: HashMap<char, f64> = table
            .iter()
            .map(|(&c, &n)| (c, interpolate(n, total_k, c)))
            .collect();
        losses.insert(ctx.clone(), row);
    }

    // BEGIN covers every accepted character (count 0 when unseen there);
    // with no observed segments at all it degrades to the pure unigram row.
    let begin_counts = counts.contexts().get(&begin);
    let begin_total: u64 = begin_counts.map(|t| t.values().sum()).unwrap_or(0);
    let begin_row: HashMap<char, f64> = if begin_total == 0 {
        accepted.iter().map(|&c| (c, -p_uni(c).ln())).collect()
    } else {
        accepted
            .iter()
            .map(|&c| {
                let n = begin_counts.and_then(|t| t.get(&c)).copied().unwrap_or(0);
                (c, interpolate(n, begin_total, c))
            })
            .collect()
    };
    losses.insert(begin, begin_row);

    let default_row: HashMap<char, f64> =
        accepted.iter().map(|&c| (c, -p_uni(c).ln())).collect();
    losses.insert(default_context(width), default_row);

    debug!(
        contexts = losses.len(),
        characters = accepted.len(),
        "loss model built"
    );
    Ok(LossModel::new(gram_count, smoothing, losses))
}
