use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub secret: String,
    pub session_ttl_hours: i64,
    pub allow_origin: String,
    pub bcrypt_cost: u32,
    pub pool_max_size: u32,
}

impl Settings {
    /// Reads settings from the process environment on top of the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 8080_i64)?
            .set_default("session_ttl_hours", 24_i64)?
            .set_default("allow_origin", "http://localhost:3000")?
            .set_default("bcrypt_cost", i64::from(bcrypt::DEFAULT_COST))?
            .set_default("pool_max_size", 10_i64)
    }
}
