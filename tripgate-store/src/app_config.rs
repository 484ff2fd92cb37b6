use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub submission: SubmissionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Shared secret for verifying the identity provider's ID tokens.
    pub jwt_secret: String,
}

/// Target and credentials for the remote flight-info endpoint. Deployment
/// configuration, not source: the token and sender id identify this
/// installation to the receiving service.
#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    pub url: String,
    pub token: String,
    pub sender: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, kept out of version control
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `TRIPGATE_SERVER__PORT=8081`
            .add_source(config::Environment::with_prefix("TRIPGATE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
