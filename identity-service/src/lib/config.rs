use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Signing secret used when nothing else is configured. Local development only.
pub const DEVELOPMENT_SECRET: &str = "dev-only-secret-change-me-in-production-0123456789";

/// Upper bound for either token lifetime (ten years).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres URL; the in-memory store is used when absent.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_ttl_hours: i64,
    pub refresh_token_ttl_hours: i64,
}

impl JwtConfig {
    pub fn access_ttl(&self) -> Duration {
        Duration::hours(self.access_token_ttl_hours)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::hours(self.refresh_token_ttl_hours)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    /// Argon2 time cost for new hashes. Existing hashes keep their own.
    pub cost: u32,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, PASSWORD__COST, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in development defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("server.http_port", 8080_i64)?
            .set_default("database.max_connections", 5_i64)?
            .set_default("jwt.secret", DEVELOPMENT_SECRET)?
            .set_default("jwt.access_token_ttl_hours", 24_i64)?
            .set_default("jwt.refresh_token_ttl_hours", 168_i64)?
            .set_default("password.cost", i64::from(auth::password::DEFAULT_COST))?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject values that would make issued tokens or hashes unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        for (key, hours) in [
            ("jwt.access_token_ttl_hours", self.jwt.access_token_ttl_hours),
            ("jwt.refresh_token_ttl_hours", self.jwt.refresh_token_ttl_hours),
        ] {
            if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
                return Err(ConfigError::Message(format!(
                    "{} must be between 1 and {}",
                    key, MAX_TOKEN_TTL_HOURS
                )));
            }
        }
        if self.password.cost == 0 {
            return Err(ConfigError::Message("password.cost must be at least 1".into()));
        }
        Ok(())
    }

    pub fn uses_development_secret(&self) -> bool {
        self.jwt.secret == DEVELOPMENT_SECRET
    }
}
