//! Shared fixtures for converter tests.

use crate::dict::PinyinDict;
use crate::model::LossModel;
use crate::trainer::train;

/// Toy dictionary: "x" → [a, b], "y" → [b, c].
pub(crate) fn toy_dict() -> PinyinDict {
    let mut dict = PinyinDict::new();
    dict.insert("x", vec!['a', 'b']);
    dict.insert("y", vec!['b', 'c']);
    dict
}

/// Bigram model trained on ["abac", "abab"] with μ = 0.9.
pub(crate) fn toy_model() -> LossModel {
    train(["abac", "abab"], &toy_dict(), 0.9, 2).unwrap()
}
