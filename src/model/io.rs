//! Model persistence.
//!
//! Two interchangeable on-disk forms: the JSON keyed document (`gram_count`,
//! `smoothing`, `losses`) for interoperability, and a compact binary format
//! (PHLM magic, version byte, bincode payload) for fast loading of large
//! models. Both loaders validate before returning, so a malformed model is
//! rejected at load time and never reaches a decode call.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use super::{LossModel, ModelError};

pub(crate) const MAGIC: &[u8; 4] = b"PHLM";
pub(crate) const VERSION: u8 = 1;
/// Magic, version, three reserved bytes.
const HEADER_SIZE: usize = 8;

impl LossModel {
    /// Parse and validate a model from its JSON document form.
    pub fn from_json_str(s: &str) -> Result<Self, ModelError> {
        let model: LossModel = serde_json::from_str(s)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, ModelError> {
        let model: LossModel = serde_json::from_reader(reader)?;
        model.validate()?;
        Ok(model)
    }

    pub fn to_json_writer<W: Write>(&self, writer: W) -> Result<(), ModelError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Serialize to the binary format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ModelError> {
        let payload = bincode::serialize(self).map_err(ModelError::Serialize)?;
        let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0u8; 3]); // reserved
        buf.extend_from_slice(&payload);
        Ok(buf)
    }

    /// Parse and validate a model from the binary format.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ModelError> {
        if data.len() < HEADER_SIZE {
            return Err(ModelError::InvalidHeader);
        }
        if &data[..4] != MAGIC {
            return Err(ModelError::InvalidMagic);
        }
        if data[4] != VERSION {
            return Err(ModelError::UnsupportedVersion(data[4]));
        }
        let model: LossModel =
            bincode::deserialize(&data[HEADER_SIZE..]).map_err(ModelError::Deserialize)?;
        model.validate()?;
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        Self::from_bytes(&fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_model;
    use crate::ngram::CountTable;
    use std::collections::HashSet;

    fn sample_model() -> LossModel {
        let accepted: HashSet<char> = ['a', 'b', 'c'].into_iter().collect();
        let mut counts = CountTable::new(2);
        counts.record_line("abac", &accepted);
        counts.record_line("abab", &accepted);
        build_model(&counts, &accepted, 0.9).unwrap()
    }

    fn assert_same_model(a: &LossModel, b: &LossModel) {
        assert_eq!(a.gram_count(), b.gram_count());
        assert_eq!(a.smoothing(), b.smoothing());
        assert_eq!(a.losses().len(), b.losses().len());
        for (ctx, row) in a.losses() {
            let other = &b.losses()[ctx];
            assert_eq!(row.len(), other.len());
            for (c, loss) in row {
                assert!((loss - other[c]).abs() < 1e-12, "{ctx:?}/{c}");
            }
        }
    }

    #[test]
    fn test_json_round_trip() {
        let model = sample_model();
        let mut buf = Vec::new();
        model.to_json_writer(&mut buf).unwrap();
        let loaded = LossModel::from_json_str(std::str::from_utf8(&buf).unwrap()).unwrap();
        assert_same_model(&model, &loaded);
    }

    #[test]
    fn test_json_load_rejects_malformed_model() {
        // Structurally valid JSON, but gram_count below 2. Double-hash raw
        // string: the DEFAULT sentinel key contains `"#`.
        let doc = r##"{"gram_count":1,"smoothing":0.9,"losses":{"^":{},"#":{}}}"##;
        assert!(matches!(
            LossModel::from_json_str(doc),
            Err(ModelError::InvalidGramCount(1))
        ));

        // Missing the DEFAULT sentinel.
        let doc = r#"{"gram_count":2,"smoothing":0.9,"losses":{"^":{"a":1.0}}}"#;
        assert!(matches!(
            LossModel::from_json_str(doc),
            Err(ModelError::MissingSentinelContext(s)) if s == "#"
        ));
    }

    #[test]
    fn test_binary_round_trip_via_file() {
        let model = sample_model();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.phlm");

        model.save(&path).unwrap();
        let loaded = LossModel::load(&path).unwrap();
        assert_same_model(&model, &loaded);
    }

    #[test]
    fn test_binary_rejects_bad_magic() {
        let mut bytes = sample_model().to_bytes().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            LossModel::from_bytes(&bytes),
            Err(ModelError::InvalidMagic)
        ));
    }

    #[test]
    fn test_binary_rejects_unknown_version() {
        let mut bytes = sample_model().to_bytes().unwrap();
        bytes[4] = 9;
        assert!(matches!(
            LossModel::from_bytes(&bytes),
            Err(ModelError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_binary_rejects_truncated_header() {
        assert!(matches!(
            LossModel::from_bytes(b"PHL"),
            Err(ModelError::InvalidHeader)
        ));
    }
}
