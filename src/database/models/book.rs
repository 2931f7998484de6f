use chrono::{Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{lenient_bool, lenient_f64, optional_i64, reference_ids, Model, ValidationError, Validator};
use crate::database::store::Collection;

fn current_year() -> i64 {
    i64::from(Utc::now().year())
}

fn year_or_current<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(optional_i64(deserializer)?.unwrap_or_else(current_year))
}

fn available() -> bool {
    true
}

/// BeEm catalogue entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default = "current_year", deserialize_with = "year_or_current")]
    pub year: i64,
    #[serde(default = "available", deserialize_with = "lenient_bool")]
    pub is_available: bool,
    #[serde(default, deserialize_with = "reference_ids")]
    pub media: Vec<String>,
    #[serde(default, deserialize_with = "reference_ids")]
    pub related_programs: Vec<String>,
}

impl Model for Book {
    const COLLECTION: Collection = Collection::Books;
    const LABEL: &'static str = "Book";
    const REFERENCES: &'static [(&'static str, Collection)] = &[
        ("media", Collection::Media),
        ("relatedPrograms", Collection::PartyLiterasi),
    ];

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .required("title", &self.title)
            .min_f64("price", self.price, 0.0)
            .min_i64("year", self.year, 0)
            .finish()
    }
}
