use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::LoadError;

/// A retrievable passage. Its position in the collection is its identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub text: String,
    /// Any other fields the indexing process attached to the record
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl Document {
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Convert a loosely typed record, failing if `text` is absent or not a string
    pub fn from_record(position: usize, record: Value) -> Result<Self, LoadError> {
        if !record.is_object() {
            return Err(LoadError::InvalidDocument {
                position,
                reason: "record is not an object".to_string(),
            });
        }
        match record.get("text") {
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(LoadError::InvalidDocument {
                    position,
                    reason: "`text` field is not a string".to_string(),
                })
            }
            None => {
                return Err(LoadError::InvalidDocument {
                    position,
                    reason: "missing `text` field".to_string(),
                })
            }
        }
        serde_json::from_value(record).map_err(|e| LoadError::InvalidDocument {
            position,
            reason: e.to_string(),
        })
    }
}

/// Convert every record of a document collection, keeping order
pub fn parse_documents(records: Vec<Value>) -> Result<Vec<Document>, LoadError> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| Document::from_record(position, record))
        .collect()
}
