use axum_helpers::RouterOptions;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use domain_relay::RelayConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Process configuration, composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub router: RouterOptions,
    pub relay: RelayConfig,
}

impl Config {
    /// Load everything from the environment; `default_port` applies when PORT is unset.
    pub fn from_env(default_port: u16) -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env_with_port(default_port)?,
            router: RouterOptions::from_env()?,
            relay: RelayConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_uses_service_port_by_default() {
        temp_env::with_vars(
            [
                ("PORT", None::<&str>),
                ("SMTP_HOST", Some("relay.internal")),
                ("MAX_BODY_SIZE", Some("2048")),
            ],
            || {
                let config = Config::from_env(3002).unwrap();
                assert_eq!(config.server.port, 3002);
                assert_eq!(config.relay.smtp_host, "relay.internal");
                assert_eq!(config.router.max_body_size, 2048);
                assert_eq!(config.app.name, "relay_api");
            },
        );
    }

    #[test]
    fn test_config_reports_invalid_values() {
        temp_env::with_var("SMTP_TIMEOUT_SECS", Some("soon"), || {
            let err = Config::from_env(3002).unwrap_err();
            assert!(err.to_string().contains("SMTP_TIMEOUT_SECS"));
        });
    }
}
