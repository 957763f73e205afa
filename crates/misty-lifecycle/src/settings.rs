//! Settings that must be present before the bot may start.

use misty_core::Secret;
use serde::{Deserialize, Serialize};

/// Credentials and targets the trading engine needs.
///
/// Every field is optional at load time; presence is checked by
/// [`RequiredSettings::missing_fields`] when the bot starts, so the
/// dashboard can run with an incomplete configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequiredSettings {
    /// Signing key for the trading wallet. Never serialized.
    #[serde(default, skip_serializing)]
    pub private_key: Option<Secret>,
    /// Network RPC endpoint URL.
    #[serde(default)]
    pub rpc_endpoint: Option<String>,
    /// Address of the traded token.
    #[serde(default)]
    pub token_address: Option<String>,
}

impl RequiredSettings {
    pub const PRIVATE_KEY: &'static str = "private_key";
    pub const RPC_ENDPOINT: &'static str = "rpc_endpoint";
    pub const TOKEN_ADDRESS: &'static str = "token_address";

    /// Names of absent or blank fields, in declaration order.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.private_key.as_ref().map_or(true, Secret::is_blank) {
            missing.push(Self::PRIVATE_KEY.to_string());
        }
        if is_blank(&self.rpc_endpoint) {
            missing.push(Self::RPC_ENDPOINT.to_string());
        }
        if is_blank(&self.token_address) {
            missing.push(Self::TOKEN_ADDRESS.to_string());
        }
        missing
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> RequiredSettings {
        RequiredSettings {
            private_key: Some(Secret::new("key")),
            rpc_endpoint: Some("https://api.mainnet-beta.solana.com".to_string()),
            token_address: Some("So11111111111111111111111111111111111111112".to_string()),
        }
    }

    #[test]
    fn test_complete_settings() {
        assert!(complete().missing_fields().is_empty());
    }

    #[test]
    fn test_all_missing_in_order() {
        assert_eq!(
            RequiredSettings::default().missing_fields(),
            vec!["private_key", "rpc_endpoint", "token_address"]
        );
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let mut settings = complete();
        settings.rpc_endpoint = Some("   ".to_string());
        settings.private_key = Some(Secret::new(""));
        assert_eq!(settings.missing_fields(), vec!["private_key", "rpc_endpoint"]);
    }

    #[test]
    fn test_private_key_not_serialized() {
        let toml_str = toml::to_string(&complete()).unwrap();
        assert!(toml_str.contains("rpc_endpoint"));
        assert!(!toml_str.contains("private_key"));
        assert!(!toml_str.contains("\"key\""));
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: RequiredSettings = toml::from_str(r#"token_address = "abc""#).unwrap();
        assert_eq!(settings.missing_fields(), vec!["private_key", "rpc_endpoint"]);
    }
}
