//! Transition loss lookup with sentinel fallback.
//!
//! The DEFAULT context is the single source of truth for unseen
//! (context, character) pairs: fallback happens here at lookup time and is
//! never pre-baked into the stored model.

use std::collections::HashMap;

use crate::model::LossModel;

/// Finite stand-in when a character is missing even from the DEFAULT
/// context, which only happens when model and dictionary were built from
/// different universes. Large enough to lose against any smoothed loss,
/// finite so path sums stay comparable.
const MISMATCH_LOSS: f64 = 1.0e4;

/// Scores one lattice transition during Viterbi search.
pub(crate) trait CostFunction {
    fn transition(&self, ctx: &str, c: char) -> f64;
}

/// Cost function backed by a [`LossModel`], with the DEFAULT row cached.
pub(crate) struct ModelCost<'a> {
    losses: &'a HashMap<String, HashMap<char, f64>>,
    fallback: Option<&'a HashMap<char, f64>>,
}

impl<'a> ModelCost<'a> {
    pub fn new(model: &'a LossModel) -> Self {
        let losses = model.losses();
        Self {
            losses,
            fallback: losses.get(&model.default_context()),
        }
    }
}

impl CostFunction for ModelCost<'_> {
    fn transition(&self, ctx: &str, c: char) -> f64 {
        if let Some(row) = self.losses.get(ctx) {
            if let Some(&loss) = row.get(&c) {
                return loss;
            }
        }
        self.fallback
            .and_then(|row| row.get(&c))
            .copied()
            .unwrap_or(MISMATCH_LOSS)
    }
}
