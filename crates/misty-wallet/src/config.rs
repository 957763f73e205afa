//! Wallet configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Currency label for balances (display only).
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}
