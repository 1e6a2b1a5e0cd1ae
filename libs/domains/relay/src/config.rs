use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SMTP_HOST: &str = "mail-server";
pub const DEFAULT_SMTP_PORT: u16 = 25;
pub const DEFAULT_FROM: &str = "noreply@example.com";
pub const DEFAULT_TO: &str = "contact@example.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HELO_NAME: &str = "localhost";

/// Upstream relay settings, loaded once at startup and shared read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Envelope and header sender when a message has none
    pub default_from: String,
    /// Recipient for contact forms of sites without their own entry
    pub default_to: String,
    pub site_recipients: HashMap<String, String>,
    /// Upper bound for one whole relay attempt, dial included
    pub timeout: Duration,
    pub hello_name: String,
}

impl RelayConfig {
    /// The `host:port` the dialer connects to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.smtp_host, self.smtp_port)
    }

    pub fn recipient_for(&self, site: &str) -> &str {
        self.site_recipients
            .get(site)
            .map(String::as_str)
            .unwrap_or(&self.default_to)
    }

    pub fn with_site_recipient(mut self, site: impl Into<String>, to: impl Into<String>) -> Self {
        self.site_recipients.insert(site.into(), to.into());
        self
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            default_from: DEFAULT_FROM.to_string(),
            default_to: DEFAULT_TO.to_string(),
            site_recipients: HashMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            hello_name: DEFAULT_HELO_NAME.to_string(),
        }
    }
}

impl FromEnv for RelayConfig {
    /// Reads SMTP_HOST, SMTP_PORT, DEFAULT_FROM, DEFAULT_TO, SITE_RECIPIENTS,
    /// SMTP_TIMEOUT_SECS and SMTP_HELO_NAME, each with a fallback.
    fn from_env() -> Result<Self, ConfigError> {
        let site_recipients = parse_site_recipients(&env_or_default("SITE_RECIPIENTS", ""))?;
        let timeout_secs: u64 = env_parse_or("SMTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            smtp_host: env_or_default("SMTP_HOST", DEFAULT_SMTP_HOST),
            smtp_port: env_parse_or("SMTP_PORT", DEFAULT_SMTP_PORT)?,
            default_from: env_or_default("DEFAULT_FROM", DEFAULT_FROM),
            default_to: env_or_default("DEFAULT_TO", DEFAULT_TO),
            site_recipients,
            timeout: Duration::from_secs(timeout_secs),
            hello_name: env_or_default("SMTP_HELO_NAME", DEFAULT_HELO_NAME),
        })
    }
}

/// Parse `site=address` pairs separated by commas.
fn parse_site_recipients(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((site, to)) if !site.trim().is_empty() && !to.trim().is_empty() => {
                Ok((site.trim().to_string(), to.trim().to_string()))
            }
            _ => Err(ConfigError::ParseError {
                key: "SITE_RECIPIENTS".to_string(),
                details: format!("expected site=address, got '{}'", entry),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "SMTP_HOST",
        "SMTP_PORT",
        "DEFAULT_FROM",
        "DEFAULT_TO",
        "SITE_RECIPIENTS",
        "SMTP_TIMEOUT_SECS",
        "SMTP_HELO_NAME",
    ];

    #[test]
    fn test_from_env_defaults() {
        temp_env::with_vars(VARS.map(|k| (k, None::<&str>)), || {
            let config = RelayConfig::from_env().unwrap();
            assert_eq!(config, RelayConfig::default());
            assert_eq!(config.address(), "mail-server:25");
        });
    }

    #[test]
    fn test_from_env_overrides() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("relay.internal")),
                ("SMTP_PORT", Some("2525")),
                ("DEFAULT_FROM", Some("web@site.test")),
                ("DEFAULT_TO", Some("owner@site.test")),
                ("SITE_RECIPIENTS", Some("blog=editor@blog.test, shop = sales@shop.test")),
                ("SMTP_TIMEOUT_SECS", Some("5")),
                ("SMTP_HELO_NAME", Some("api.site.test")),
            ],
            || {
                let config = RelayConfig::from_env().unwrap();
                assert_eq!(config.address(), "relay.internal:2525");
                assert_eq!(config.default_from, "web@site.test");
                assert_eq!(config.recipient_for("blog"), "editor@blog.test");
                assert_eq!(config.recipient_for("shop"), "sales@shop.test");
                assert_eq!(config.recipient_for("unknown"), "owner@site.test");
                assert_eq!(config.timeout, Duration::from_secs(5));
                assert_eq!(config.hello_name, "api.site.test");
            },
        );
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        temp_env::with_var("SMTP_PORT", Some("smtp"), || {
            let err = RelayConfig::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::ParseError { ref key, .. } if key == "SMTP_PORT"));
        });
    }

    #[test]
    fn test_parse_site_recipients_rejects_missing_address() {
        assert!(parse_site_recipients("blog=").is_err());
        assert!(parse_site_recipients("blog").is_err());
        assert!(parse_site_recipients(" , ").unwrap().is_empty());
    }
}
