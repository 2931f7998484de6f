use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{lenient_bool, reference_ids, Model, ValidationError, Validator};
use crate::database::store::Collection;

/// Admin-managed lifecycle; no transition rules beyond membership.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Draft,
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::Scheduled => "scheduled",
            EventStatus::Ongoing => "ongoing",
            EventStatus::Completed => "completed",
            EventStatus::Cancelled => "cancelled",
        }
    }
}

/// Literacy-party event with attached TBYT media.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyLiterasi {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "reference_ids")]
    pub media: Vec<String>,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_public: bool,
}

impl Model for PartyLiterasi {
    const COLLECTION: Collection = Collection::PartyLiterasi;
    const LABEL: &'static str = "Party literasi event";
    const REFERENCES: &'static [(&'static str, Collection)] = &[("media", Collection::MediaTbyt)];

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new().required("title", &self.title).finish()
    }
}
