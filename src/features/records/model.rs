use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::persistence::Row;

/// An uploaded binary awaiting storage
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl MediaFile {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }
}

/// What the caller supplied under an entity's media field
#[derive(Debug, Clone)]
pub enum MediaInput {
    /// A new binary to upload
    Upload(MediaFile),
    /// An already-stored URL, kept as is
    Existing(String),
}

/// Caller payload for create and update, keyed by logical field name
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    pub values: Row,
    pub media: Option<MediaInput>,
}

impl RecordInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: Row) -> Self {
        Self {
            values,
            media: None,
        }
    }

    pub fn set(mut self, logical: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(logical.into(), value.into());
        self
    }

    pub fn with_upload(mut self, file: MediaFile) -> Self {
        self.media = Some(MediaInput::Upload(file));
        self
    }

    pub fn with_existing_media(mut self, url: impl Into<String>) -> Self {
        self.media = Some(MediaInput::Existing(url.into()));
        self
    }
}

/// A stored record as seen by callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: Uuid,
    /// Entity fields keyed by logical name
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub fields: Row,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn get(&self, logical: &str) -> Option<&Value> {
        self.fields.get(logical)
    }

    pub fn get_str(&self, logical: &str) -> Option<&str> {
        self.get(logical).and_then(Value::as_str)
    }

    pub fn get_bool(&self, logical: &str) -> Option<bool> {
        self.get(logical).and_then(Value::as_bool)
    }
}

/// Options for [`CrudEngine::list`](super::services::CrudEngine::list)
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Also return rows whose visibility flag is false
    pub include_hidden: bool,
    /// Equality predicates keyed by logical field name
    pub equals: Row,
    pub limit: Option<usize>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_hidden(mut self) -> Self {
        self.include_hidden = true;
        self
    }

    pub fn eq(mut self, logical: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.insert(logical.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_serializes_flat_camel_case() {
        let mut fields = Row::new();
        fields.insert("personName".into(), json!("Asha"));
        let record = Record {
            id: Uuid::nil(),
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["personName"], "Asha");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn test_input_builder() {
        let input = RecordInput::new()
            .set("title", "Diwali")
            .with_existing_media("https://storage.test/a.png");
        assert_eq!(input.values.get("title"), Some(&json!("Diwali")));
        assert!(matches!(input.media, Some(MediaInput::Existing(_))));
    }
}
