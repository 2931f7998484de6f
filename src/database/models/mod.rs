pub mod book;
pub mod media;
pub mod media_tbyt;
pub mod party_literasi;
pub mod ui_media;
pub mod user;
pub mod visitor;

pub use book::Book;
pub use media::{Media, MediaType};
pub use media_tbyt::MediaTbyt;
pub use party_literasi::{EventStatus, PartyLiterasi};
pub use ui_media::UiMedia;
pub use user::{Role, User};
pub use visitor::Visitor;

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::database::store::{Collection, Document, ID_FIELD};

/// Schema-level rejection of a document
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid document: {0}")]
    Malformed(String),

    #[error("Invalid fields: {0:?}")]
    Fields(HashMap<String, String>),
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}

/// A typed document shape stored in one collection.
///
/// Deserializing applies defaults and coerces field types; `validate`
/// enforces required values, enum membership and numeric minimums.
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Human-readable name used in response messages
    const LABEL: &'static str;

    /// Id-array fields expanded into the documents they reference
    const REFERENCES: &'static [(&'static str, Collection)] = &[];

    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }

    fn to_document(&self) -> Result<Document, ValidationError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Err(ValidationError::Malformed(format!("{} must be an object", Self::LABEL))),
        }
    }
}

/// Collects per-field messages and turns them into one `ValidationError`
#[derive(Debug, Default)]
pub struct Validator {
    errors: HashMap<String, String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "This field is required");
        }
        self
    }

    pub fn min_i64(&mut self, field: &str, value: i64, min: i64) -> &mut Self {
        if value < min {
            self.fail(field, &format!("Must be at least {}", min));
        }
        self
    }

    pub fn min_f64(&mut self, field: &str, value: f64, min: f64) -> &mut Self {
        if !value.is_finite() || value < min {
            self.fail(field, &format!("Must be at least {}", min));
        }
        self
    }

    pub fn fail(&mut self, field: &str, message: &str) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| message.to_string());
        self
    }

    pub fn finish(&mut self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(std::mem::take(&mut self.errors)))
        }
    }
}

/// Accepts reference arrays either as plain ids or as previously expanded
/// documents carrying an `_id`, so expanded payloads can be sent back as-is.
pub fn reference_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|item| match item {
            Value::String(id) => Ok(id),
            Value::Object(map) => map
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| de::Error::custom("referenced document has no _id")),
            other => Err(de::Error::custom(format!("invalid reference: {}", other))),
        })
        .collect()
}

/// Accepts booleans sent as strings ("true"/"false"), as form posts do.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Ok(flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "1" | "yes" => Ok(true),
            "false" | "off" | "0" | "no" | "" => Ok(false),
            other => Err(de::Error::custom(format!("invalid boolean: {}", other))),
        },
        other => Err(de::Error::custom(format!("invalid boolean: {}", other))),
    }
}

/// Integers sent as numbers or numeric strings; `null` reads as absent.
pub fn optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected an integer, found {}", n))),
        Value::String(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, found {:?}", text))),
        other => Err(de::Error::custom(format!("expected an integer, found {}", other))),
    }
}

/// Numbers sent as numbers or numeric strings; `null` reads as absent.
pub fn optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a number, found {}", n))),
        Value::String(text) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, found {:?}", text))),
        other => Err(de::Error::custom(format!("expected a number, found {}", other))),
    }
}

/// Like `optional_i64`, with `null` falling back to zero.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_i64(deserializer)?.unwrap_or_default())
}

/// Like `optional_f64`, with `null` falling back to zero.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_f64(deserializer)?.unwrap_or_default())
}
