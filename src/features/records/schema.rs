//! Declarative field-mapping tables, one per entity kind.
//!
//! Callers speak logical (camelCase) field names; the provider speaks stored
//! (snake_case) column names. Each [`EntitySchema`] is the single source of
//! truth for that translation, for value typing, for the optional media
//! attachment and for the visibility flag.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::features::records::error::{DalError, Result};
use crate::features::records::model::Record;
use crate::modules::persistence::{parse_timestamp, Filter, Row};
use crate::shared::constants::{CREATED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};
use crate::shared::validation::{is_valid_phone, IDENTIFIER_REGEX};

/// The record categories managed by the DAL.
///
/// Serialized as the URL slug (`celebrations`, `members`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum EntityKind {
    #[serde(rename = "celebrations")]
    Celebration,
    #[serde(rename = "condolences")]
    Condolence,
    #[serde(rename = "news")]
    News,
    #[serde(rename = "birthdays")]
    Birthday,
    #[serde(rename = "members")]
    Member,
    #[serde(rename = "messages")]
    Message,
    #[serde(rename = "directory")]
    DirectoryNode,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Celebration,
        EntityKind::Condolence,
        EntityKind::News,
        EntityKind::Birthday,
        EntityKind::Member,
        EntityKind::Message,
        EntityKind::DirectoryNode,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            EntityKind::Celebration => "celebrations",
            EntityKind::Condolence => "condolences",
            EntityKind::News => "news",
            EntityKind::Birthday => "birthdays",
            EntityKind::Member => "members",
            EntityKind::Message => "messages",
            EntityKind::DirectoryNode => "directory",
        }
    }

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            EntityKind::Celebration => &CELEBRATION,
            EntityKind::Condolence => &CONDOLENCE,
            EntityKind::News => &NEWS,
            EntityKind::Birthday => &BIRTHDAY,
            EntityKind::Member => &MEMBER,
            EntityKind::Message => &MESSAGE,
            EntityKind::DirectoryNode => &DIRECTORY_NODE,
        }
    }

    /// Distinct buckets referenced by media fields across all kinds
    pub fn media_buckets() -> Vec<&'static str> {
        let mut buckets: Vec<&'static str> = Self::ALL
            .iter()
            .filter_map(|kind| kind.schema().media.as_ref().map(|m| m.bucket))
            .collect();
        buckets.sort_unstable();
        buckets.dedup();
        buckets
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for EntityKind {
    type Err = DalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| DalError::validation(format!("Unknown entity kind '{}'", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Boolean,
    /// `YYYY-MM-DD`
    Date,
    Uuid,
    Email,
    Phone,
    /// Text restricted to a fixed set of values
    Choice(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub logical: &'static str,
    pub column: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

const fn optional(logical: &'static str, column: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        logical,
        column,
        field_type,
        required: false,
    }
}

const fn required(logical: &'static str, column: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec {
        logical,
        column,
        field_type,
        required: true,
    }
}

impl FieldSpec {
    /// Check a non-null value against the field type
    pub fn check(&self, value: &Value) -> Result<()> {
        let ok = match (self.field_type, value) {
            (FieldType::Text, Value::String(_)) => true,
            (FieldType::Integer, Value::Number(n)) => n.as_i64().is_some(),
            (FieldType::Boolean, Value::Bool(_)) => true,
            (FieldType::Date, Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok(),
            (FieldType::Uuid, Value::String(s)) => Uuid::parse_str(s).is_ok(),
            (FieldType::Email, Value::String(s)) => s.validate_email(),
            (FieldType::Phone, Value::String(s)) => is_valid_phone(s),
            (FieldType::Choice(options), Value::String(s)) => options.contains(&s.as_str()),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(DalError::validation(format!(
                "Field '{}' expects {:?}, got {}",
                self.logical, self.field_type, value
            )))
        }
    }

    /// Coerce a raw text value (form part, query parameter) into this
    /// field's JSON type. Empty input is `null`.
    pub fn parse(&self, raw: &str) -> Result<Value> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Value::Null);
        }

        let value = match self.field_type {
            FieldType::Integer => raw.parse::<i64>().map(Value::from).map_err(|_| {
                DalError::validation(format!("Field '{}' expects an integer", self.logical))
            })?,
            FieldType::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Value::Bool(true),
                "false" | "0" | "no" | "off" => Value::Bool(false),
                _ => {
                    return Err(DalError::validation(format!(
                        "Field '{}' expects a boolean",
                        self.logical
                    )))
                }
            },
            _ => Value::String(raw.to_string()),
        };

        self.check(&value)?;
        Ok(value)
    }
}

/// A logical name paired with its stored column
#[derive(Debug, Clone, Copy)]
pub struct ColumnRef {
    pub logical: &'static str,
    pub column: &'static str,
}

/// The single binary-attachment field of an entity kind
#[derive(Debug, Clone, Copy)]
pub struct MediaSpec {
    /// Logical name the caller uses for the binary (or an existing URL)
    pub logical: &'static str,
    pub url: ColumnRef,
    pub filename: ColumnRef,
    pub bucket: &'static str,
    pub folder: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Remove the row
    Hard,
    /// Clear the visibility flag; cleared rows count as deleted
    Soft,
}

/// How [`EntitySchema::to_row`] treats fields the caller left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Omitted fields are left to column defaults
    Create,
    /// Omitted fields are written as `null` (full-row replace)
    Replace,
}

#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    pub media: Option<MediaSpec>,
    /// Logical name of the Boolean field gating default visibility
    pub visibility: Option<&'static str>,
    pub delete_policy: DeletePolicy,
}

impl EntitySchema {
    pub fn field(&self, logical: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.logical == logical)
    }

    fn require_field(&self, logical: &str) -> Result<&FieldSpec> {
        self.field(logical).ok_or_else(|| {
            DalError::validation(format!("Unknown field '{}' for {}", logical, self.kind))
        })
    }

    pub fn visibility_column(&self) -> Option<&'static str> {
        self.visibility
            .and_then(|logical| self.field(logical))
            .map(|f| f.column)
    }

    fn media_refs(&self) -> impl Iterator<Item = ColumnRef> + '_ {
        self.media.iter().flat_map(|m| [m.url, m.filename])
    }

    /// Logical → column, covering media URL/filename columns
    pub fn column_for(&self, logical: &str) -> Option<&'static str> {
        self.field(logical).map(|f| f.column).or_else(|| {
            self.media_refs()
                .find(|r| r.logical == logical)
                .map(|r| r.column)
        })
    }

    /// Column → logical, covering media URL/filename columns
    pub fn logical_for(&self, column: &str) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.column == column)
            .map(|f| f.logical)
            .or_else(|| {
                self.media_refs()
                    .find(|r| r.column == column)
                    .map(|r| r.logical)
            })
    }

    fn is_media_managed(&self, logical: &str) -> bool {
        self.media.as_ref().is_some_and(|m| m.logical == logical)
            || self.media_refs().any(|r| r.logical == logical)
    }

    /// Translate caller values into a stored row, checking names and types
    pub fn to_row(&self, values: &Row, mode: WriteMode) -> Result<Row> {
        let mut row = Row::new();

        for (logical, value) in values {
            if self.is_media_managed(logical) {
                return Err(DalError::validation(format!(
                    "Field '{}' is managed by media upload and cannot be written directly",
                    logical
                )));
            }
            let spec = self.require_field(logical)?;
            if !value.is_null() {
                spec.check(value)?;
            }
            row.insert(spec.column.to_string(), value.clone());
        }

        for spec in self.fields {
            let is_flag = self.visibility == Some(spec.logical);
            let current = row.get(spec.column).filter(|v| !v.is_null());

            if current.is_some() {
                continue;
            }
            if is_flag {
                row.insert(spec.column.to_string(), Value::Bool(true));
            } else if spec.required {
                return Err(DalError::validation(format!(
                    "Field '{}' is required for {}",
                    spec.logical, self.kind
                )));
            } else if mode == WriteMode::Replace {
                row.insert(spec.column.to_string(), Value::Null);
            }
        }

        Ok(row)
    }

    /// Translate a stored row into a record keyed by logical names.
    ///
    /// Every mapped field is present in the result (`null` when the column
    /// is absent); unmapped columns are dropped.
    pub fn from_row(&self, mut row: Row) -> Result<Record> {
        let id = row
            .remove(ID_COLUMN)
            .and_then(|v| v.as_str().and_then(|s| Uuid::parse_str(s).ok()))
            .ok_or_else(|| malformed(self.kind, ID_COLUMN))?;
        let created_at = row
            .remove(CREATED_AT_COLUMN)
            .and_then(|v| v.as_str().and_then(parse_timestamp))
            .ok_or_else(|| malformed(self.kind, CREATED_AT_COLUMN))?;
        let updated_at = row
            .remove(UPDATED_AT_COLUMN)
            .and_then(|v| v.as_str().and_then(parse_timestamp))
            .ok_or_else(|| malformed(self.kind, UPDATED_AT_COLUMN))?;

        let mut fields = Row::new();
        for spec in self.fields {
            let value = row.remove(spec.column).unwrap_or(Value::Null);
            fields.insert(spec.logical.to_string(), value);
        }
        for media_ref in self.media_refs() {
            let value = row.remove(media_ref.column).unwrap_or(Value::Null);
            fields.insert(media_ref.logical.to_string(), value);
        }

        Ok(Record {
            id,
            fields,
            created_at,
            updated_at,
        })
    }

    /// Equality predicates on logical fields → provider filter
    pub fn filter_for(&self, equals: &Row) -> Result<Filter> {
        let mut filter = Filter::new();
        for (logical, value) in equals {
            let spec = self.require_field(logical)?;
            if !value.is_null() {
                spec.check(value)?;
            }
            filter = filter.eq(spec.column, value.clone());
        }
        Ok(filter)
    }

    /// Check the mapping is total and well-formed
    pub fn check_mapping(&self) -> std::result::Result<(), String> {
        let reserved = [ID_COLUMN, CREATED_AT_COLUMN, UPDATED_AT_COLUMN];
        let mut logicals = HashSet::new();
        let mut columns = HashSet::new();

        let refs = self
            .fields
            .iter()
            .map(|f| (f.logical, f.column))
            .chain(self.media_refs().map(|r| (r.logical, r.column)));

        for (logical, column) in refs {
            if !logicals.insert(logical) {
                return Err(format!("{}: duplicate logical name '{}'", self.kind, logical));
            }
            if !columns.insert(column) {
                return Err(format!("{}: duplicate column '{}'", self.kind, column));
            }
            if !IDENTIFIER_REGEX.is_match(column) || reserved.contains(&column) {
                return Err(format!("{}: invalid column '{}'", self.kind, column));
            }
        }

        if let Some(media) = &self.media {
            if logicals.contains(media.logical) {
                return Err(format!(
                    "{}: media field '{}' shadows a regular field",
                    self.kind, media.logical
                ));
            }
        }

        if let Some(flag) = self.visibility {
            match self.field(flag) {
                Some(spec) if spec.field_type == FieldType::Boolean => {}
                _ => return Err(format!("{}: visibility flag '{}' is not a boolean field", self.kind, flag)),
            }
        } else if self.delete_policy == DeletePolicy::Soft {
            return Err(format!("{}: soft delete needs a visibility flag", self.kind));
        }

        if !IDENTIFIER_REGEX.is_match(self.table) {
            return Err(format!("{}: invalid table '{}'", self.kind, self.table));
        }

        Ok(())
    }
}

fn malformed(kind: EntityKind, column: &str) -> DalError {
    DalError::Provider(crate::modules::persistence::ProviderError::MalformedRow(format!(
        "{} row is missing a valid '{}'",
        kind, column
    )))
}

// =============================================================================
// ENTITY TABLES
// =============================================================================

const fn image_media(folder: &'static str) -> MediaSpec {
    MediaSpec {
        logical: "imageFile",
        url: ColumnRef {
            logical: "imageUrl",
            column: "image_url",
        },
        filename: ColumnRef {
            logical: "imageFilename",
            column: "image_filename",
        },
        bucket: "announcements",
        folder,
    }
}

const fn photo_media(bucket: &'static str, folder: &'static str) -> MediaSpec {
    MediaSpec {
        logical: "photoFile",
        url: ColumnRef {
            logical: "photoUrl",
            column: "photo_url",
        },
        filename: ColumnRef {
            logical: "photoFilename",
            column: "photo_filename",
        },
        bucket,
        folder,
    }
}

static CELEBRATION: EntitySchema = EntitySchema {
    kind: EntityKind::Celebration,
    table: "celebration_announcements",
    fields: &[
        required("title", "title", FieldType::Text),
        optional("description", "description", FieldType::Text),
        optional("celebrationPersonName", "celebration_person_name", FieldType::Text),
        optional("occasionType", "occasion_type", FieldType::Text),
        optional("eventDate", "event_date", FieldType::Date),
        optional("venue", "venue", FieldType::Text),
        optional("contactInfo", "contact_info", FieldType::Text),
        optional("isPublished", "is_published", FieldType::Boolean),
    ],
    media: Some(image_media("celebrations")),
    visibility: Some("isPublished"),
    delete_policy: DeletePolicy::Hard,
};

static CONDOLENCE: EntitySchema = EntitySchema {
    kind: EntityKind::Condolence,
    table: "condolence_notices",
    fields: &[
        required("title", "title", FieldType::Text),
        optional("deceasedName", "deceased_name", FieldType::Text),
        optional("age", "age", FieldType::Integer),
        optional("dateOfDeath", "date_of_death", FieldType::Date),
        optional("prayerMeetingDetails", "prayer_meeting_details", FieldType::Text),
        optional("familyDetails", "family_details", FieldType::Text),
        optional("message", "message", FieldType::Text),
        optional("contactInfo", "contact_info", FieldType::Text),
        optional("isPublished", "is_published", FieldType::Boolean),
    ],
    media: Some(image_media("condolences")),
    visibility: Some("isPublished"),
    delete_policy: DeletePolicy::Hard,
};

static NEWS: EntitySchema = EntitySchema {
    kind: EntityKind::News,
    table: "news_items",
    fields: &[
        required("title", "title", FieldType::Text),
        optional("content", "content", FieldType::Text),
        optional("summary", "summary", FieldType::Text),
        optional("category", "category", FieldType::Text),
        optional("author", "author", FieldType::Text),
        optional("isPublished", "is_published", FieldType::Boolean),
    ],
    media: Some(image_media("news")),
    visibility: Some("isPublished"),
    delete_policy: DeletePolicy::Hard,
};

static BIRTHDAY: EntitySchema = EntitySchema {
    kind: EntityKind::Birthday,
    table: "birthday_records",
    fields: &[
        required("personName", "person_name", FieldType::Text),
        optional("dateOfBirth", "date_of_birth", FieldType::Date),
        optional("message", "message", FieldType::Text),
        optional("wishesFrom", "wishes_from", FieldType::Text),
        optional("isPublished", "is_published", FieldType::Boolean),
    ],
    media: Some(photo_media("announcements", "birthdays")),
    visibility: Some("isPublished"),
    delete_policy: DeletePolicy::Hard,
};

static MEMBER: EntitySchema = EntitySchema {
    kind: EntityKind::Member,
    table: "community_members",
    fields: &[
        required("fullName", "full_name", FieldType::Text),
        optional("fatherName", "father_name", FieldType::Text),
        optional("gender", "gender", FieldType::Text),
        optional("dateOfBirth", "date_of_birth", FieldType::Date),
        optional("mobileNumber", "mobile_number", FieldType::Phone),
        optional("email", "email", FieldType::Email),
        optional("address", "address", FieldType::Text),
        optional("city", "city", FieldType::Text),
        optional("district", "district", FieldType::Text),
        optional("occupation", "occupation", FieldType::Text),
        optional("isActive", "is_active", FieldType::Boolean),
    ],
    media: Some(photo_media("members", "photos")),
    visibility: Some("isActive"),
    delete_policy: DeletePolicy::Soft,
};

static MESSAGE: EntitySchema = EntitySchema {
    kind: EntityKind::Message,
    table: "contact_messages",
    fields: &[
        required("name", "name", FieldType::Text),
        optional("email", "email", FieldType::Email),
        optional("phone", "phone", FieldType::Phone),
        optional("subject", "subject", FieldType::Text),
        required("message", "message", FieldType::Text),
        optional("isRead", "is_read", FieldType::Boolean),
    ],
    media: None,
    visibility: None,
    delete_policy: DeletePolicy::Hard,
};

static DIRECTORY_NODE: EntitySchema = EntitySchema {
    kind: EntityKind::DirectoryNode,
    table: "directory_nodes",
    fields: &[
        required("nodeType", "node_type", FieldType::Choice(&["district", "city", "member"])),
        required("name", "name", FieldType::Text),
        optional("parentId", "parent_id", FieldType::Uuid),
        optional("contactPerson", "contact_person", FieldType::Text),
        optional("phone", "phone", FieldType::Phone),
        optional("address", "address", FieldType::Text),
        optional("displayOrder", "display_order", FieldType::Integer),
        optional("isActive", "is_active", FieldType::Boolean),
    ],
    media: None,
    visibility: Some("isActive"),
    delete_policy: DeletePolicy::Soft,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: serde_json::Value) -> Row {
        pairs.as_object().cloned().unwrap()
    }

    #[test]
    fn test_every_mapping_is_well_formed() {
        for kind in EntityKind::ALL {
            kind.schema().check_mapping().unwrap();
            assert_eq!(kind.schema().kind, kind);
        }
    }

    #[test]
    fn test_slug_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.slug().parse::<EntityKind>().unwrap(), kind);
            let json = serde_json::to_value(kind).unwrap();
            assert_eq!(json, json!(kind.slug()));
        }
        assert!("weddings".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_mapping_is_bidirectional() {
        let schema = EntityKind::Celebration.schema();
        assert_eq!(
            schema.column_for("celebrationPersonName"),
            Some("celebration_person_name")
        );
        assert_eq!(
            schema.logical_for("celebration_person_name"),
            Some("celebrationPersonName")
        );
        assert_eq!(schema.column_for("imageUrl"), Some("image_url"));
        assert_eq!(schema.logical_for("image_filename"), Some("imageFilename"));
        assert_eq!(schema.column_for("nope"), None);
    }

    #[test]
    fn test_media_buckets() {
        assert_eq!(EntityKind::media_buckets(), vec!["announcements", "members"]);
    }

    #[test]
    fn test_to_row_create_defaults_visibility() {
        let row = EntityKind::News
            .schema()
            .to_row(&values(json!({"title": "Fair"})), WriteMode::Create)
            .unwrap();
        assert_eq!(row.get("title"), Some(&json!("Fair")));
        assert_eq!(row.get("is_published"), Some(&json!(true)));
        assert!(!row.contains_key("content"));
    }

    #[test]
    fn test_to_row_replace_nulls_omitted_fields() {
        let row = EntityKind::News
            .schema()
            .to_row(&values(json!({"title": "Fair"})), WriteMode::Replace)
            .unwrap();
        assert_eq!(row.get("content"), Some(&Value::Null));
        assert_eq!(row.get("author"), Some(&Value::Null));
        assert!(!row.contains_key("image_url"));
    }

    #[test]
    fn test_to_row_rejects_unknown_and_media_fields() {
        let schema = EntityKind::Celebration.schema();
        let err = schema
            .to_row(&values(json!({"title": "x", "colour": "red"})), WriteMode::Create)
            .unwrap_err();
        assert!(err.to_string().contains("Unknown field 'colour'"));

        let err = schema
            .to_row(
                &values(json!({"title": "x", "imageUrl": "https://x/y.png"})),
                WriteMode::Create,
            )
            .unwrap_err();
        assert!(err.to_string().contains("managed by media upload"));
    }

    #[test]
    fn test_to_row_requires_required_fields() {
        let err = EntityKind::Message
            .schema()
            .to_row(&values(json!({"name": "Ravi"})), WriteMode::Create)
            .unwrap_err();
        assert!(err.to_string().contains("'message' is required"));
    }

    #[test]
    fn test_type_checks() {
        let schema = EntityKind::Member.schema();
        assert!(schema
            .to_row(
                &values(json!({"fullName": "A", "email": "not-an-email"})),
                WriteMode::Create
            )
            .is_err());
        assert!(schema
            .to_row(
                &values(json!({"fullName": "A", "dateOfBirth": "01/02/1990"})),
                WriteMode::Create
            )
            .is_err());
        assert!(schema
            .to_row(
                &values(json!({
                    "fullName": "A",
                    "email": "a@example.org",
                    "dateOfBirth": "1990-02-01",
                    "mobileNumber": "+91 98765 43210"
                })),
                WriteMode::Create
            )
            .is_ok());
    }

    #[test]
    fn test_choice_field() {
        let spec = EntityKind::DirectoryNode.schema().field("nodeType").unwrap();
        assert!(spec.check(&json!("city")).is_ok());
        assert!(spec.check(&json!("village")).is_err());
    }

    #[test]
    fn test_parse_coerces_text_input() {
        let schema = EntityKind::Condolence.schema();
        assert_eq!(schema.field("age").unwrap().parse("82").unwrap(), json!(82));
        assert_eq!(
            schema.field("isPublished").unwrap().parse("false").unwrap(),
            json!(false)
        );
        assert_eq!(schema.field("message").unwrap().parse("  ").unwrap(), Value::Null);
        assert!(schema.field("age").unwrap().parse("old").is_err());
    }

    #[test]
    fn test_from_row_fills_every_mapped_field() {
        let id = Uuid::new_v4();
        let row = values(json!({
            "id": id.to_string(),
            "created_at": "2024-05-01T10:00:00.000000+00:00",
            "updated_at": "2024-05-01T10:00:00.000000+00:00",
            "title": "Wedding",
            "image_url": "https://storage.test/a.png",
            "image_filename": "a.png",
            "legacy_column": 1
        }));

        let record = EntityKind::Celebration.schema().from_row(row).unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.get_str("title"), Some("Wedding"));
        assert_eq!(record.get("venue"), Some(&Value::Null));
        assert_eq!(record.get_str("imageFilename"), Some("a.png"));
        assert!(record.get("legacy_column").is_none());
    }

    #[test]
    fn test_from_row_requires_generated_columns() {
        let err = EntityKind::News
            .schema()
            .from_row(values(json!({"title": "x"})))
            .unwrap_err();
        assert_eq!(err.kind(), crate::features::records::error::ErrorKind::Provider);
    }

    #[test]
    fn test_filter_for_maps_to_columns() {
        let filter = EntityKind::DirectoryNode
            .schema()
            .filter_for(&values(json!({"nodeType": "city"})))
            .unwrap();
        assert_eq!(filter.conditions().get("node_type"), Some(&json!("city")));

        assert!(EntityKind::DirectoryNode
            .schema()
            .filter_for(&values(json!({"colour": "red"})))
            .is_err());
    }
}
