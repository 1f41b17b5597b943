//! Pinyin-to-hanzi conversion via per-syllable Viterbi layers.
//!
//! Each input syllable expands to its dictionary candidates; a forward
//! dynamic program keeps, for every live candidate character, the minimum
//! cumulative loss and the path that achieved it. Unknown syllables emit a
//! placeholder and restart the n-gram context instead of failing the
//! decode.

pub(crate) mod cost;
#[cfg(test)]
pub(crate) mod testutil;
mod viterbi;

#[cfg(test)]
mod tests;

use tracing::{debug, debug_span};

use crate::dict::PinyinDict;
use crate::model::LossModel;
use cost::ModelCost;

/// Decode a syllable sequence into the minimum-loss character sequence.
///
/// A pure function of its inputs: the model and dictionary are read-only
/// and may be shared across any number of concurrent calls. Empty input
/// yields an empty string. The model is expected to have passed
/// [`LossModel::validate`]; the loaders in `model::io` guarantee this.
pub fn decode<S: AsRef<str>>(syllables: &[S], model: &LossModel, dict: &PinyinDict) -> String {
    let _span = debug_span!("decode", syllables = syllables.len()).entered();
    let cost = ModelCost::new(model);
    let out = viterbi::search(syllables, &cost, dict, model.context_width());
    debug!(chars = out.chars().count());
    out
}

/// Decode one whitespace-separated line of syllables.
pub fn decode_line(line: &str, model: &LossModel, dict: &PinyinDict) -> String {
    let syllables: Vec<&str> = line.split_whitespace().collect();
    decode(&syllables, model, dict)
}
