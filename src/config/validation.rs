use anyhow::{anyhow, Result};

use super::Settings;

pub fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.application.port == 0 {
        return Err(anyhow!("application.port must be non-zero"));
    }

    if settings.application.host.parse::<std::net::IpAddr>().is_err() {
        return Err(anyhow!(
            "application.host ({}) is not a valid IP address",
            settings.application.host
        ));
    }

    if settings.store.path.as_os_str().is_empty() {
        return Err(anyhow!("store.path must not be empty"));
    }

    if let Some(parent) = settings.store.path.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(anyhow!(
                "store directory {} does not exist",
                parent.display()
            ));
        }
    }

    Ok(())
}
