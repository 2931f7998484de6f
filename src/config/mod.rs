use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub media: MediaConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Overrides the per-role default port when set.
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://...` for the JSONB document table, `memory://` for an in-process store.
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Signs backend access tokens.
    pub jwt_secret: String,
    /// Signs admin session tokens.
    pub session_secret: String,
    pub jwt_expiry_hours: u64,
    pub session_max_age_hours: u64,
    pub session_cookie: String,
    pub require_https: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub api_base: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub transformation: String,
    pub thumbnail_transformation: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl MediaConfig {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("BIND_ADDR") {
            self.server.bind_addr = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().ok().or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_SESSION_MAX_AGE_HOURS") {
            self.security.session_max_age_hours = v.parse().unwrap_or(self.security.session_max_age_hours);
        }
        if let Ok(v) = env::var("SECURITY_SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Media host overrides
        if let Ok(v) = env::var("CLOUDINARY_API_BASE") {
            self.media.api_base = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            self.media.cloud_name = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_KEY") {
            self.media.api_key = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_SECRET") {
            self.media.api_secret = v;
        }
        if let Ok(v) = env::var("MEDIA_FOLDER") {
            self.media.folder = v;
        }
        if let Ok(v) = env::var("MEDIA_TRANSFORMATION") {
            self.media.transformation = v;
        }
        if let Ok(v) = env::var("MEDIA_THUMBNAIL_TRANSFORMATION") {
            self.media.thumbnail_transformation = v;
        }
        if let Ok(v) = env::var("MEDIA_MAX_UPLOAD_BYTES") {
            self.media.max_upload_bytes = v.parse().unwrap_or(self.media.max_upload_bytes);
        }

        // Backend overrides
        if let Ok(v) = env::var("BACKEND_URL") {
            self.backend.url = v;
        }
        if let Ok(v) = env::var("BACKEND_TIMEOUT_MS") {
            self.backend.timeout_ms = v.parse().unwrap_or(self.backend.timeout_ms);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                bind_addr: "127.0.0.1".to_string(),
                port: None,
            },
            database: DatabaseConfig {
                url: "memory://".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev-access-token-secret".to_string(),
                session_secret: "dev-session-secret".to_string(),
                jwt_expiry_hours: 24,
                session_max_age_hours: 24 * 7, // 1 week
                session_cookie: "museum.session-token".to_string(),
                require_https: false,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:3001".to_string()],
            },
            media: MediaConfig {
                api_base: "https://api.cloudinary.com".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                folder: "museum-dev".to_string(),
                transformation: "q_auto,f_auto".to_string(),
                thumbnail_transformation: "c_fill,w_300,h_300".to_string(),
                max_upload_bytes: 20 * 1024 * 1024, // 20MB
            },
            backend: BackendConfig {
                url: "http://127.0.0.1:5000".to_string(),
                timeout_ms: 10_000,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: None,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_secret: String::new(),
                jwt_expiry_hours: 12,
                session_max_age_hours: 24,
                session_cookie: "__Secure-museum.session-token".to_string(),
                require_https: true,
                cors_origins: Vec::new(),
            },
            media: MediaConfig {
                api_base: "https://api.cloudinary.com".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                folder: "museum-staging".to_string(),
                transformation: "q_auto,f_auto".to_string(),
                thumbnail_transformation: "c_fill,w_300,h_300".to_string(),
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
            },
            backend: BackendConfig {
                url: "http://127.0.0.1:5000".to_string(),
                timeout_ms: 10_000,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: None,
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_secret: String::new(),
                jwt_expiry_hours: 4,
                session_max_age_hours: 12,
                session_cookie: "__Secure-museum.session-token".to_string(),
                require_https: true,
                cors_origins: Vec::new(),
            },
            media: MediaConfig {
                api_base: "https://api.cloudinary.com".to_string(),
                cloud_name: String::new(),
                api_key: String::new(),
                api_secret: String::new(),
                folder: "museum".to_string(),
                transformation: "q_auto,f_auto".to_string(),
                thumbnail_transformation: "c_fill,w_300,h_300".to_string(),
                max_upload_bytes: 10 * 1024 * 1024, // 10MB
            },
            backend: BackendConfig {
                url: "http://127.0.0.1:5000".to_string(),
                timeout_ms: 10_000,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.database.url, "memory://");
        assert!(!config.security.jwt_secret.is_empty());
        assert!(!config.security.require_https);
        assert!(!config.media.is_configured());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(config.security.session_secret.is_empty());
        assert!(config.security.require_https);
        assert_eq!(config.backend.timeout(), Duration::from_secs(10));
    }
}
