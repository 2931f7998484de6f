use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{optional_i64, Model, ValidationError, Validator};
use crate::database::store::Collection;

fn default_quantity() -> i64 {
    1
}

fn quantity_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(optional_i64(deserializer)?.unwrap_or_else(default_quantity))
}

/// Visit registration submitted through the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    pub name: String,
    pub city: String,
    pub category: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "quantity_or_default")]
    pub quantity: i64,
    #[serde(default = "Utc::now")]
    pub visit_date: DateTime<Utc>,
}

impl Model for Visitor {
    const COLLECTION: Collection = Collection::Visitors;
    const LABEL: &'static str = "Visitor";

    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new();
        validator
            .required("name", &self.name)
            .required("city", &self.city)
            .required("category", &self.category)
            .required("phoneNumber", &self.phone_number)
            .min_i64("quantity", self.quantity, 1);
        if let Some(email) = &self.email {
            if !email.is_empty() && !email.contains('@') {
                validator.fail("email", "Invalid email format");
            }
        }
        validator.finish()
    }
}
