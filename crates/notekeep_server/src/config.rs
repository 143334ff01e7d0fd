//! Process configuration: defaults, optional file, environment override.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Server {
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Symmetric signing secret for session tokens. Override in any real
    /// deployment (`AUTH_SECRET`).
    pub secret: String,
    pub token_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub level: String,
    pub dir: String,
}

/// Account created at startup so a fresh process is immediately usable.
#[derive(Debug, Deserialize)]
pub struct Seed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: Server,
    pub auth: Auth,
    pub log: Log,
    pub seed: Seed,
}

impl Settings {
    /// Loads settings from defaults, then `config.toml` if present, then
    /// environment variables (`SERVER_PORT`, `AUTH_SECRET`, `LOG_LEVEL`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.port", 8080_i64)?
            .set_default("auth.secret", "notekeep-dev-secret")?
            .set_default("auth.token_ttl_secs", 300_i64)?
            .set_default("log.level", "info")?
            .set_default("log.dir", "logs")?
            .set_default("seed.name", "Admin")?
            .set_default("seed.email", "admin@example.com")?
            .set_default("seed.password", "admin")?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
