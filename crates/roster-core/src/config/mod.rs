//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default so that an empty configuration
//! yields a runnable development setup.

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod mail;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, RateLimitConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseBackend, DatabaseConfig};
pub use self::logging::LoggingConfig;
pub use self::mail::{MailConfig, MailTransportKind};

use crate::error::AppError;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Automated test runs.
    Test,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Returns `true` for production deployments.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outgoing mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ROSTER__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config", env)
    }

    /// Load configuration from an explicit directory.
    pub fn load_from(dir: &str, env: &str) -> Result<Self, AppError> {
        Self::load_layered(dir, env, None)
    }

    /// `vars` replaces the process environment as the `ROSTER__*` source when given.
    fn load_layered(
        dir: &str,
        env: &str,
        vars: Option<config::Map<String, String>>,
    ) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        // The overlay name doubles as the environment unless a file says otherwise.
        if matches!(env, "development" | "test" | "production") {
            builder = builder.set_default("environment", env)?;
        }

        let config = builder
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ROSTER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.access_token_ttl()?;

        if self.environment.is_production() && self.auth.jwt_secret == auth::DEFAULT_JWT_SECRET {
            return Err(AppError::configuration(
                "auth.jwt_secret must be changed in production",
            ));
        }

        if self.server.rate_limit.enabled && self.server.rate_limit.window_seconds == 0 {
            return Err(AppError::configuration(
                "server.rate_limit.window_seconds must be greater than zero",
            ));
        }

        Ok(())
    }
}
