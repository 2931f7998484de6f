use serde::{Deserialize, Serialize};

use super::{Model, ValidationError, Validator};
use crate::database::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admin-surface account. `password` always holds a bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl Model for User {
    const COLLECTION: Collection = Collection::Users;
    const LABEL: &'static str = "User";

    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .required("username", &self.username)
            .required("password", &self.password)
            .finish()
    }
}
