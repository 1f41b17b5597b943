//! Loss model: per-context negative-log smoothed probabilities.
//!
//! `LossModel` is the single data product of training and the read-only
//! scoring table of decoding. Observed contexts hold only observed
//! characters; the BEGIN and DEFAULT sentinel contexts are fully populated
//! over the accepted-character universe. Fallback for unseen pairs happens
//! at lookup time in `converter::cost`, never by pre-expanding DEFAULT into
//! other contexts.

mod builder;
mod io;

pub use builder::build_model;

use std::collections::HashMap;
use std::io::Error as IoError;

use serde::{Deserialize, Serialize};

/// Marker character for the sentence-start sentinel context.
pub const BEGIN_CHAR: char = '^';
/// Marker character for the unseen-context fallback sentinel.
pub const DEFAULT_CHAR: char = '#';

/// The BEGIN sentinel context for a context width of `width` characters.
pub(crate) fn begin_context(width: usize) -> String {
    BEGIN_CHAR.to_string().repeat(width)
}

/// The DEFAULT sentinel context for a context width of `width` characters.
pub(crate) fn default_context(width: usize) -> String {
    DEFAULT_CHAR.to_string().repeat(width)
}

/// Drop the oldest character of a fixed-width context and append `c`.
pub(crate) fn shift_context(ctx: &str, c: char) -> String {
    let mut next: String = ctx.chars().skip(1).collect();
    next.push(c);
    next
}

/// Errors for model construction, validation, and persistence.
///
/// Structural problems are fatal at load time: both loaders run
/// [`LossModel::validate`] so a malformed model never reaches a decode call.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header (too short)")]
    InvalidHeader,

    #[error("invalid magic bytes (expected PHLM)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("gram_count must be at least 2, got {0}")]
    InvalidGramCount(usize),

    #[error("smoothing must lie in (0, 1), got {0}")]
    InvalidSmoothing(f64),

    #[error("missing sentinel context {0:?}")]
    MissingSentinelContext(String),
}

/// Interpolated n-gram loss table plus model parameters.
///
/// `losses[ctx][c]` is `-ln(μ·p(c|ctx) + (1−μ)·p_uni(c))` for every
/// observed (context, character) pair, all finite and non-negative. The
/// model is immutable once built and safe to share across unbounded
/// concurrent decode calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossModel {
    gram_count: usize,
    smoothing: f64,
    losses: HashMap<String, HashMap<char, f64>>,
}

impl LossModel {
    pub fn new(
        gram_count: usize,
        smoothing: f64,
        losses: HashMap<String, HashMap<char, f64>>,
    ) -> Self {
        Self {
            gram_count,
            smoothing,
            losses,
        }
    }

    pub fn gram_count(&self) -> usize {
        self.gram_count
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }

    pub fn losses(&self) -> &HashMap<String, HashMap<char, f64>> {
        &self.losses
    }

    /// Context length in characters (N−1).
    pub fn context_width(&self) -> usize {
        self.gram_count.saturating_sub(1)
    }

    pub fn begin_context(&self) -> String {
        begin_context(self.context_width())
    }

    pub fn default_context(&self) -> String {
        default_context(self.context_width())
    }

    /// Reject structurally invalid models.
    ///
    /// Checks the gram count, the smoothing range, and the presence of both
    /// sentinel contexts.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.gram_count < 2 {
            return Err(ModelError::InvalidGramCount(self.gram_count));
        }
        if !(self.smoothing > 0.0 && self.smoothing < 1.0) {
            return Err(ModelError::InvalidSmoothing(self.smoothing));
        }
        for sentinel in [self.begin_context(), self.default_context()] {
            if !self.losses.contains_key(&sentinel) {
                return Err(ModelError::MissingSentinelContext(sentinel));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentinel_only_model(gram_count: usize, smoothing: f64) -> LossModel {
        let width = gram_count.saturating_sub(1);
        let mut losses = HashMap::new();
        losses.insert(begin_context(width), HashMap::new());
        losses.insert(default_context(width), HashMap::new());
        LossModel::new(gram_count, smoothing, losses)
    }

    #[test]
    fn test_sentinel_context_strings() {
        let model = sentinel_only_model(3, 0.9);
        assert_eq!(model.begin_context(), "^^");
        assert_eq!(model.default_context(), "##");
        assert_eq!(model.context_width(), 2);
    }

    #[test]
    fn test_shift_context_keeps_width() {
        assert_eq!(shift_context("^^", 'a'), "^a");
        assert_eq!(shift_context("^a", 'b'), "ab");
        assert_eq!(shift_context("ab", 'c'), "bc");
    }

    #[test]
    fn test_validate_accepts_well_formed_model() {
        assert!(sentinel_only_model(2, 0.5).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_small_gram_count() {
        let model = sentinel_only_model(1, 0.5);
        assert!(matches!(
            model.validate(),
            Err(ModelError::InvalidGramCount(1))
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range_smoothing() {
        assert!(matches!(
            sentinel_only_model(2, 0.0).validate(),
            Err(ModelError::InvalidSmoothing(_))
        ));
        assert!(matches!(
            sentinel_only_model(2, 1.0).validate(),
            Err(ModelError::InvalidSmoothing(_))
        ));
    }

    #[test]
    fn test_validate_rejects_missing_sentinels() {
        let mut losses = HashMap::new();
        losses.insert(begin_context(1), HashMap::new());
        let model = LossModel::new(2, 0.5, losses);
        assert!(matches!(
            model.validate(),
            Err(ModelError::MissingSentinelContext(s)) if s == "#"
        ));

        let model = LossModel::new(2, 0.5, HashMap::new());
        assert!(matches!(
            model.validate(),
            Err(ModelError::MissingSentinelContext(s)) if s == "^"
        ));
    }
}
