use serde::{Deserialize, Serialize};

use super::{Model, ValidationError};
use crate::database::store::{strip_system_fields, Collection, Document};

/// Free-form media records attached to PartyLiterasi events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaTbyt(pub Document);

impl Model for MediaTbyt {
    const COLLECTION: Collection = Collection::MediaTbyt;
    const LABEL: &'static str = "TBYT media";

    fn validate(&self) -> Result<(), ValidationError> {
        if strip_system_fields(self.0.clone()).is_empty() {
            return Err(ValidationError::Malformed("TBYT media needs at least one field".to_string()));
        }
        Ok(())
    }
}
