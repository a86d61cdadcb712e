//! Wallet configuration for the Privy provider

use crate::constants::DEFAULT_NETWORK_ID;
use crate::error::WalletError;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of Privy wallet the provider drives
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    /// User-linked embedded wallet with delegated signing
    #[default]
    Embedded,
    /// App-owned server wallet
    Server,
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletType::Embedded => f.write_str("embedded"),
            WalletType::Server => f.write_str("server"),
        }
    }
}

impl std::str::FromStr for WalletType {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embedded" => Ok(WalletType::Embedded),
            "server" => Ok(WalletType::Server),
            other => Err(WalletError::InvalidWalletType(other.to_string())),
        }
    }
}

/// Configuration for a delegated embedded wallet
///
/// Field names deserialize from camelCase (`appId`, `walletId`, ...). Missing
/// fields deserialize as empty strings and are rejected by [`validate`].
///
/// [`validate`]: WalletConfig::validate
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletConfig {
    /// Privy app ID
    pub app_id: String,
    /// Privy app secret
    pub app_secret: String,
    /// Authorization private key, `wallet-auth:` prefixed
    pub authorization_private_key: String,
    /// Privy wallet ID
    pub wallet_id: String,
    /// Network ID (e.g. `base-sepolia`); empty means the default network
    pub network_id: String,
    /// Wallet type
    pub wallet_type: WalletType,
}

impl WalletConfig {
    /// Create a configuration for an embedded wallet on the default network
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        authorization_private_key: impl Into<String>,
        wallet_id: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: app_secret.into(),
            authorization_private_key: authorization_private_key.into(),
            wallet_id: wallet_id.into(),
            network_id: DEFAULT_NETWORK_ID.to_string(),
            wallet_type: WalletType::Embedded,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Reads `PRIVY_APP_ID`, `PRIVY_APP_SECRET`, `PRIVY_AUTHORIZATION_PRIVATE_KEY`,
    /// `PRIVY_WALLET_ID`, `NETWORK_ID` and `PRIVY_WALLET_TYPE`. Unset variables
    /// are left empty so that [`validate`](Self::validate) reports them.
    pub fn from_env() -> Result<Self, WalletError> {
        let var = |name: &str| std::env::var(name).unwrap_or_default();

        let wallet_type = match std::env::var("PRIVY_WALLET_TYPE") {
            Ok(s) if !s.is_empty() => s.parse()?,
            _ => WalletType::Embedded,
        };

        Ok(Self {
            app_id: var("PRIVY_APP_ID"),
            app_secret: var("PRIVY_APP_SECRET"),
            authorization_private_key: var("PRIVY_AUTHORIZATION_PRIVATE_KEY"),
            wallet_id: var("PRIVY_WALLET_ID"),
            network_id: var("NETWORK_ID"),
            wallet_type,
        })
    }

    /// Set the network ID
    pub fn with_network_id(mut self, network_id: impl Into<String>) -> Self {
        self.network_id = network_id.into();
        self
    }

    /// Set the wallet type
    pub fn with_wallet_type(mut self, wallet_type: WalletType) -> Self {
        self.wallet_type = wallet_type;
        self
    }

    /// Check required fields, one distinct error per missing field
    pub fn validate(&self) -> Result<(), WalletError> {
        if is_blank(&self.wallet_id) {
            return Err(WalletError::MissingWalletId);
        }
        if is_blank(&self.app_id) || is_blank(&self.app_secret) {
            return Err(WalletError::MissingAppCredentials);
        }
        if is_blank(&self.authorization_private_key) {
            return Err(WalletError::MissingAuthorizationKey);
        }
        // appId is sent verbatim as the privy-app-id header
        if HeaderValue::from_str(&self.app_id).is_err() {
            return Err(WalletError::InvalidHeaderValue("appId"));
        }
        Ok(())
    }

    /// Network ID with the default applied
    pub fn effective_network_id(&self) -> &str {
        if is_blank(&self.network_id) {
            DEFAULT_NETWORK_ID
        } else {
            &self.network_id
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// Secrets stay out of logs
impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("app_id", &self.app_id)
            .field("app_secret", &"<redacted>")
            .field("authorization_private_key", &"<redacted>")
            .field("wallet_id", &self.wallet_id)
            .field("network_id", &self.network_id)
            .field("wallet_type", &self.wallet_type)
            .finish()
    }
}
