// --- File: crates/buslink_config/src/lib.rs ---

pub mod models;

pub use models::*;

use config::{Config, ConfigError, Environment, File};
use std::sync::Once;

static DOTENV: Once = Once::new();

/// Loads `.env` once per process so repeated config loads stay cheap.
pub fn ensure_dotenv_loaded() {
    DOTENV.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// Layering, lowest to highest precedence:
/// 1. built-in defaults,
/// 2. an optional config file (`BUSLINK_CONFIG_PATH`, default `config/default`),
/// 3. environment variables prefixed `BUSLINK` with `__` as separator,
///    e.g. `BUSLINK_SERVER__PORT=8086`.
///
/// Secrets (the Stripe secret key) are read from plain env vars by the crates
/// that need them, never from the config file.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_path =
        std::env::var("BUSLINK_CONFIG_PATH").unwrap_or_else(|_| "config/default".to_string());

    Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086)?
        .add_source(File::with_name(&config_path).required(false))
        .add_source(Environment::with_prefix("BUSLINK").separator("__"))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_config_file() {
        let config = load_config().expect("default config should load");
        assert_eq!(config.trips.horizon_days, 30);
        assert_eq!(config.trips.batch_size, 200);
        assert_eq!(config.trips.default_duration_mins, 120);
    }
}
