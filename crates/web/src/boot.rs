//! Start-up wiring: configuration and logging.

use stockgate_infra::{AppConfig, ConfigError};

use crate::navigation::Navigator;

/// Install logging for `config` and build the navigator the views share.
pub fn start(config: &AppConfig) -> Navigator {
    stockgate_observability::init_with_default(&config.log_filter);
    tracing::info!(
        denial_redirect_ms = u64::try_from(config.denial_redirect_delay.as_millis()).unwrap_or(u64::MAX),
        log_filter = %config.log_filter,
        "stockgate configured"
    );
    Navigator::from_config(config)
}

/// [`start`] with configuration read from the process environment.
pub fn start_from_env() -> Result<Navigator, ConfigError> {
    let config = AppConfig::from_env()?;
    Ok(start(&config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use stockgate_infra::config::DENIAL_REDIRECT_ENV;

    #[test]
    fn navigator_follows_the_configured_delay() {
        let config = AppConfig::from_lookup(|key| {
            (key == DENIAL_REDIRECT_ENV).then(|| "750".to_string())
        })
        .unwrap();

        let navigator = start(&config);
        assert_eq!(navigator.denial_redirect_delay(), Duration::from_millis(750));
    }
}
