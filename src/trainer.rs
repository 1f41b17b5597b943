//! One-shot training pipeline: segment, count, build.

use tracing::{info, info_span};

use crate::dict::PinyinDict;
use crate::model::{build_model, LossModel, ModelError};
use crate::ngram::CountTable;
use crate::settings::settings;

/// Train a loss model from corpus lines.
///
/// Counting streams line by line, so memory is bounded by the count tables
/// rather than the corpus. A progress checkpoint (records processed) is
/// logged every `train.progress_interval` lines.
///
/// For shard-parallel training, run one [`CountTable`] per shard instead and
/// [`CountTable::merge`] the results before calling [`build_model`]:
/// counting is commutative, so the model comes out identical.
pub fn train<I, S>(
    lines: I,
    dict: &PinyinDict,
    smoothing: f64,
    gram_count: usize,
) -> Result<LossModel, ModelError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if gram_count < 2 {
        return Err(ModelError::InvalidGramCount(gram_count));
    }
    if !(smoothing > 0.0 && smoothing < 1.0) {
        return Err(ModelError::InvalidSmoothing(smoothing));
    }
    let _span = info_span!("train", gram_count).entered();

    let accepted = dict.accepted_chars();
    let interval = settings().train.progress_interval;
    let mut counts = CountTable::new(gram_count);
    let mut records: u64 = 0;
    for line in lines {
        counts.record_line(line.as_ref(), &accepted);
        records += 1;
        if interval > 0 && records % interval == 0 {
            info!(records, "training progress");
        }
    }
    info!(
        records,
        contexts = counts.contexts().len(),
        "counting complete"
    );

    build_model(&counts, &accepted, smoothing)
}
