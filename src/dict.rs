//! Syllable → candidate-character dictionary.
//!
//! Loaded once from a JSON object mapping each syllable to an ordered array
//! of single-character strings, then treated as immutable. Candidate order
//! follows the source document and doubles as the deterministic tie-break
//! order during decode.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinyinDict {
    map: HashMap<String, Vec<char>>,
}

impl PinyinDict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the candidate characters for one syllable, replacing any
    /// previous entry.
    pub fn insert(&mut self, syllable: impl Into<String>, candidates: Vec<char>) {
        self.map.insert(syllable.into(), candidates);
    }

    pub fn lookup(&self, syllable: &str) -> Option<&[char]> {
        self.map.get(syllable).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Union of all candidate characters: the accepted-character universe
    /// for training and decoding.
    pub fn accepted_chars(&self) -> HashSet<char> {
        self.map.values().flatten().copied().collect()
    }

    pub fn from_json_str(s: &str) -> Result<Self, DictError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, DictError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load(path: &Path) -> Result<Self, DictError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }
}
