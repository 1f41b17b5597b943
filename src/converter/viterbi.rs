//! Forward dynamic program over per-syllable candidate layers.

use super::cost::CostFunction;
use crate::dict::PinyinDict;
use crate::model::{begin_context, shift_context};
use crate::settings::settings;

/// Outcome of expanding one input syllable against the dictionary.
///
/// `Unmatched` is a recovery policy, not an error: the search emits a
/// placeholder and restarts the n-gram context after it.
pub(crate) enum SyllableStep<'a> {
    Matched(&'a [char]),
    Unmatched,
}

fn expand<'a>(dict: &'a PinyinDict, syllable: &str) -> SyllableStep<'a> {
    match dict.lookup(syllable) {
        Some(candidates) if !candidates.is_empty() => SyllableStep::Matched(candidates),
        _ => SyllableStep::Unmatched,
    }
}

/// One surviving path per live candidate character at the current position.
///
/// Layers are local to a single search call and replaced wholesale at every
/// position; nothing persists across queries.
struct LayerEntry {
    /// Cumulative loss of the best path ending in this entry's character.
    loss: f64,
    /// Decoded characters so far, placeholders included.
    path: String,
    /// Sliding N−1-char context window. BEGIN-padded at the start of the
    /// input and reset to BEGIN padding after an unmatched syllable, so it
    /// always equals the last N−1 characters of the effective history.
    ctx: String,
}

/// Minimum-loss entry; ties keep the earliest, which follows dictionary
/// candidate order and keeps results reproducible.
fn best_entry(layer: &[LayerEntry]) -> &LayerEntry {
    let mut best = &layer[0];
    for entry in &layer[1..] {
        if entry.loss < best.loss {
            best = entry;
        }
    }
    best
}

/// Run the layer-by-layer search and return the decoded string.
///
/// Every layer is non-empty by construction (the initial layer has one
/// BEGIN entry, matched layers one entry per candidate, unmatched steps
/// collapse to one entry), so the per-layer minimum always exists.
/// Complexity per syllable is `O(|prev| · |candidates|)`.
pub(crate) fn search<S: AsRef<str>>(
    syllables: &[S],
    cost: &dyn CostFunction,
    dict: &PinyinDict,
    width: usize,
) -> String {
    let begin = begin_context(width);
    let mut layer = vec![LayerEntry {
        loss: 0.0,
        path: String::new(),
        ctx: begin.clone(),
    }];

    for syllable in syllables {
        layer = match expand(dict, syllable.as_ref()) {
            SyllableStep::Unmatched => {
                // Keep the best cumulative loss, append the placeholder, and
                // restart as if a new sentence began after it.
                let best = best_entry(&layer);
                let mut path = best.path.clone();
                path.push_str(&settings().decode.placeholder);
                vec![LayerEntry {
                    loss: best.loss,
                    path,
                    ctx: begin.clone(),
                }]
            }
            SyllableStep::Matched(candidates) => {
                let mut next = Vec::with_capacity(candidates.len());
                for &c in candidates {
                    // Strict `<` keeps the first previous entry on ties.
                    let mut best = &layer[0];
                    let mut best_loss = f64::INFINITY;
                    for entry in &layer {
                        let loss = entry.loss + cost.transition(&entry.ctx, c);
                        if loss < best_loss {
                            best_loss = loss;
                            best = entry;
                        }
                    }
                    let mut path = best.path.clone();
                    path.push(c);
                    next.push(LayerEntry {
                        loss: best_loss,
                        path,
                        ctx: shift_context(&best.ctx, c),
                    });
                }
                next
            }
        };
    }

    best_entry(&layer).path.clone()
}
