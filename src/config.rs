use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::forms::SlugRule;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,

    // Web Server
    pub web_host: String,
    pub forum_port: u16,
    pub snippets_port: u16,
    pub page_cache_ttl: Duration,

    // Sessions
    pub session_ttl: Duration,
    pub auth_proxy_enabled: bool,
    pub cookie_secure: bool,

    // Forum policy
    pub topic_slug_rule: SlugRule,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let strict_slugs = parse_env_bool("STRICT_TOPIC_SLUGS", false)?;

        Ok(Self {
            // Database
            database_path: PathBuf::from(env_or_default(
                "DATABASE_PATH",
                "./data/discuss.sqlite",
            )),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            forum_port: parse_env_u16("FORUM_PORT", 3000)?,
            snippets_port: parse_env_u16("SNIPPETS_PORT", 3001)?,
            page_cache_ttl: Duration::from_secs(parse_env_u64("PAGE_CACHE_TTL_SECS", 60)?),

            // Sessions
            session_ttl: Duration::from_secs(
                parse_env_u64("SESSION_TTL_HOURS", 720)?.saturating_mul(3600),
            ),
            auth_proxy_enabled: parse_env_bool("AUTH_PROXY_ENABLED", false)?,
            cookie_secure: parse_env_bool("COOKIE_SECURE", true)?,

            // Forum policy
            topic_slug_rule: if strict_slugs {
                SlugRule::Strict
            } else {
                SlugRule::Loose
            },
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.forum_port == self.snippets_port {
            return Err(ConfigError::InvalidValue {
                name: "SNIPPETS_PORT".to_string(),
                message: format!("must differ from FORUM_PORT ({})", self.forum_port),
            });
        }
        if self.session_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_TTL_HOURS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.web_host.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "WEB_HOST".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./data/discuss.sqlite"),
            web_host: "0.0.0.0".to_string(),
            forum_port: 3000,
            snippets_port: 3001,
            page_cache_ttl: Duration::from_secs(60),
            session_ttl: Duration::from_secs(720 * 3600),
            auth_proxy_enabled: false,
            cookie_secure: true,
            topic_slug_rule: SlugRule::Loose,
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_default() {
        assert!(parse_env_bool("DISCUSS_NONEXISTENT_VAR", true).unwrap());
        assert!(!parse_env_bool("DISCUSS_NONEXISTENT_VAR", false).unwrap());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_equal_ports_rejected() {
        let config = Config {
            snippets_port: 3000,
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("SNIPPETS_PORT"));
    }

    #[test]
    fn test_zero_session_ttl_rejected() {
        let config = Config {
            session_ttl: Duration::ZERO,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
