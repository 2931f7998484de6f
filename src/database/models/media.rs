use serde::{Deserialize, Serialize};

use super::{lenient_bool, Model, ValidationError, Validator};
use crate::database::store::Collection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Document,
}

/// Uploaded collection media, referenced by books.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: MediaType,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_public: bool,
}

impl Model for Media {
    const COLLECTION: Collection = Collection::Media;
    const LABEL: &'static str = "Media";

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .required("title", &self.title)
            .required("url", &self.url)
            .finish()
    }
}
