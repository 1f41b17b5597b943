//! Statistical pinyin-to-hanzi conversion.
//!
//! Two halves: an offline training pipeline (corpus segmentation, n-gram
//! counting, loss-model building) and a per-query Viterbi decoder over
//! syllable candidate layers. The loss model and the syllable dictionary
//! are immutable once built and safe to share across concurrent decode
//! calls; decoding itself is a pure, CPU-bound function of its inputs.

pub mod converter;
pub mod corpus;
pub mod dict;
pub mod model;
pub mod ngram;
pub mod settings;
pub mod trace_init;
pub mod trainer;

pub use converter::{decode, decode_line};
pub use dict::PinyinDict;
pub use model::LossModel;
pub use trainer::train;
