//! Gateway configuration.

use std::env;

use account_service_lib::config::AccountServiceConfig;
use common::AppResult;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Whether `DELETE /db` may wipe all accounts and sessions (off unless opted in)
    pub enable_reset: bool,
    /// Store selection and policy for the account service
    pub account: AccountServiceConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            enable_reset: env::var("ENABLE_RESET")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            account: AccountServiceConfig::from_env()?,
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_reset: false,
            account: AccountServiceConfig::default(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_reset_is_off_by_default() {
        assert!(!GatewayConfig::default().enable_reset);
    }
}
