use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::database::ListEncoding;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("AUTH_ENABLED=false is not allowed in production")]
    AuthDisabledInProduction,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_ms: u64,
    pub max_request_size_bytes: usize,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Pool acquire timeout, in seconds
    pub connection_timeout: u64,
    pub list_encoding: ListEncoding,
}

impl DatabaseConfig {
    /// Connection string with the password masked, for logs
    pub fn redacted_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("****"));
                }
                url.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct SecurityConfig {
    pub auth_enabled: bool,
    pub jwt_secret: Option<String>,
    pub jwt_audience: Option<String>,
    pub jwt_leeway_secs: u64,
}

impl std::fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("auth_enabled", &self.auth_enabled)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "****"))
            .field("jwt_audience", &self.jwt_audience)
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Environment presets
    /// are applied first, then individual overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("APP_ENV").as_deref() {
            None | Some("development") | Some("dev") => Environment::Development,
            Some("staging") | Some("stage") => Environment::Staging,
            Some("production") | Some("prod") => Environment::Production,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "APP_ENV",
                    value: other.to_string(),
                })
            }
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        if url::Url::parse(&database_url).is_err() {
            return Err(ConfigError::Invalid {
                key: "DATABASE_URL",
                value: "<unparseable connection string>".to_string(),
            });
        }

        let mut config = Self::preset(environment, database_url);
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("API_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup("ONBOARDING_API_PORT").or_else(|| lookup("PORT")) {
            self.server.port = parse("PORT", &v)?;
        }
        if let Some(v) = lookup("API_REQUEST_TIMEOUT_MS") {
            self.server.request_timeout_ms = parse("API_REQUEST_TIMEOUT_MS", &v)?;
        }
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", &v)?;
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }
        if let Some(v) = lookup("PROFILE_LIST_ENCODING") {
            self.database.list_encoding = v.parse().map_err(|_| ConfigError::Invalid {
                key: "PROFILE_LIST_ENCODING",
                value: v.clone(),
            })?;
        }

        // Security overrides
        if let Some(v) = lookup("AUTH_ENABLED") {
            self.security.auth_enabled = parse_bool("AUTH_ENABLED", &v)?;
        }
        self.security.jwt_secret = lookup("JWT_SECRET")
            .or_else(|| lookup("SUPABASE_JWT_SECRET"))
            .filter(|v| !v.is_empty());
        self.security.jwt_audience = lookup("JWT_AUDIENCE").filter(|v| !v.is_empty());
        if let Some(v) = lookup("JWT_LEEWAY_SECS") {
            self.security.jwt_leeway_secs = parse("JWT_LEEWAY_SECS", &v)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.auth_enabled && self.security.jwt_secret.is_none() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if !self.security.auth_enabled && self.environment == Environment::Production {
            return Err(ConfigError::AuthDisabledInProduction);
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "API_REQUEST_TIMEOUT_MS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    fn preset(environment: Environment, database_url: String) -> Self {
        let (max_connections, connection_timeout, request_timeout_ms, max_request_size_bytes) =
            match environment {
                Environment::Development => (5, 30, 10_000, 1024 * 1024),
                Environment::Staging => (5, 10, 5_000, 256 * 1024),
                Environment::Production => (10, 5, 5_000, 64 * 1024),
            };

        Self {
            environment,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                request_timeout_ms,
                max_request_size_bytes,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                connection_timeout,
                list_encoding: ListEncoding::TextArray,
            },
            security: SecurityConfig {
                auth_enabled: true,
                jwt_secret: None,
                jwt_audience: None,
                jwt_leeway_secs: 60,
            },
        }
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
