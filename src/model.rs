//! Entry record, creation payload, and partial-update patch.

use crate::error::AppError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Fields that must be present (and non-null) when an entry is created.
pub const REQUIRED_FIELDS: [&str; 3] = ["date", "category", "status"];

/// One tracked day/status item. `ship_name` is `shipName` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub id: String,
    /// `YYYY-MM-DD`, stored as given.
    pub date: String,
    pub category: String,
    pub status: String,
    #[serde(rename = "shipName")]
    pub ship_name: Option<String>,
    pub country: Option<String>,
    pub notes: Option<String>,
}

/// Create payload. Unknown keys (including a client-supplied `id`) are ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewEntry {
    pub date: String,
    pub category: String,
    pub status: String,
    #[serde(rename = "shipName", default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewEntry {
    /// Decode a create body. Checks required fields first so the client gets
    /// `Missing field: <name>` rather than a serde message.
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let obj = non_empty_object(&body)?;
        for field in REQUIRED_FIELDS {
            match obj.get(field) {
                None | Some(Value::Null) => {
                    return Err(AppError::BadRequest(format!("Missing field: {}", field)))
                }
                Some(_) => {}
            }
        }
        serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))
    }
}

/// Partial update. Outer `None` = key absent (keep), `Some(None)` = explicit null,
/// `Some(Some(v))` = replace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct EntryPatch {
    #[serde(default, deserialize_with = "present")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(rename = "shipName", default, deserialize_with = "present")]
    pub ship_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub country: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a key as present even when its value is null.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl EntryPatch {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        non_empty_object(&body)?;
        let patch: EntryPatch =
            serde_json::from_value(body).map_err(|e| AppError::BadRequest(format!("Invalid input: {}", e)))?;
        for (field, value) in [
            ("date", &patch.date),
            ("category", &patch.category),
            ("status", &patch.status),
        ] {
            if let Some(None) = value {
                return Err(AppError::BadRequest(format!("Field cannot be null: {}", field)));
            }
        }
        Ok(patch)
    }

    /// Column assignments for the fields present in the patch, in column order.
    /// `None` binds as NULL; a null on a required column is skipped (keeps the stored value).
    pub fn assignments(&self) -> Vec<(&'static str, Option<&str>)> {
        let required = [("date", &self.date), ("category", &self.category), ("status", &self.status)];
        let optional = [
            ("ship_name", &self.ship_name),
            ("country", &self.country),
            ("notes", &self.notes),
        ];
        let mut out = Vec::new();
        for (column, value) in required {
            if let Some(Some(v)) = value {
                out.push((column, Some(v.as_str())));
            }
        }
        for (column, value) in optional {
            if let Some(v) = value {
                out.push((column, v.as_deref()));
            }
        }
        out
    }
}

fn non_empty_object(body: &Value) -> Result<&serde_json::Map<String, Value>, AppError> {
    match body {
        Value::Object(m) if !m.is_empty() => Ok(m),
        _ => Err(AppError::BadRequest("Invalid input, no data provided".into())),
    }
}
