/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

/// Deployable units. All three are served by the same binary and share the
/// document-model layer; they differ only in the routes they mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Canonical models plus the credential login endpoint
    Backend,
    /// Session-gated CRUD for editors and administrators
    Admin,
    /// Read-only site API, partly proxied to the backend
    Public,
}

impl ServiceRole {
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceRole::Backend => 5000,
            ServiceRole::Admin => 3001,
            ServiceRole::Public => 3000,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceRole::Backend => "backend",
            ServiceRole::Admin => "admin",
            ServiceRole::Public => "public",
        }
    }
}

impl std::fmt::Display for ServiceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
