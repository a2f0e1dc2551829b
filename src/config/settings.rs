use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub path: PathBuf,
}

#[derive(Deserialize, Clone, Default)]
pub struct AuthSettings {
    #[serde(default = "default_admin_user")]
    pub admin_user: String,
    #[serde(default)]
    pub admin_password: String,
}

fn default_admin_user() -> String {
    "admin".to_string()
}

// Keep the password out of `info!("Loaded settings: {:?}")`.
impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("admin_user", &self.admin_user)
            .field(
                "admin_password",
                &if self.admin_password.is_empty() { "" } else { "REDACTED" },
            )
            .finish()
    }
}

impl Settings {
    /// Loads `<config_name>.{yaml,...}` if present, then `APPLICATION__PORT`-style
    /// environment overrides.
    pub fn new(config_name: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(config::File::with_name(config_name).required(false))
            .add_source(Environment::default().separator("__"))
            .set_default("application.host", "0.0.0.0")?
            .set_default("application.port", 8080)?
            .set_default("store.path", "modules.json")?
            .set_default("auth.admin_user", "admin")?
            .set_default("auth.admin_password", "")?
            .build()?;

        config.try_deserialize()
    }
}
