use serde::{Deserialize, Serialize};

use super::{lenient_bool, lenient_i64, Model, ValidationError, Validator};
use crate::database::store::Collection;

fn default_public() -> bool {
    true
}

/// Site imagery placed at numbered slots of one or more page locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiMedia {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub location_ids: Vec<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub index: i64,
    #[serde(default = "default_public", deserialize_with = "lenient_bool")]
    pub is_public: bool,
}

impl Model for UiMedia {
    const COLLECTION: Collection = Collection::UiMedia;
    const LABEL: &'static str = "UI media";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator
            .required("title", &self.title)
            .required("url", &self.url)
            .min_i64("index", self.index, 0);
        if self.location_ids.iter().any(|id| id.trim().is_empty()) {
            validator.fail("locationIds", "Location ids must not be blank");
        }
        validator.finish()
    }
}
