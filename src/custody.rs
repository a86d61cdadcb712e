//! Custody account lookup
//!
//! The provider learns its wallet address by asking Privy for the accounts
//! linked to the configured wallet and picking the embedded EVM wallet.

use crate::config::{WalletConfig, WalletType};
use crate::constants::{
    user_url, CHAIN_TYPE_ETHEREUM, EMBEDDED_WALLET_CLIENT_TYPE, LINKED_ACCOUNT_WALLET,
    PRIVY_API_BASE,
};
use crate::error::WalletError;
use crate::signer::app_headers;
use alloy::primitives::Address;
use eyre::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;

/// Account linked to a Privy user
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkedAccount {
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default, alias = "walletClientType")]
    pub wallet_client_type: Option<String>,
    #[serde(default, alias = "chainType")]
    pub chain_type: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// Privy wallet ID, when the API includes it
    #[serde(default)]
    pub id: Option<String>,
}

impl LinkedAccount {
    /// Privy-managed embedded wallet on an EVM chain
    pub fn is_embedded_evm_wallet(&self) -> bool {
        self.account_type == LINKED_ACCOUNT_WALLET
            && self.wallet_client_type.as_deref() == Some(EMBEDDED_WALLET_CLIENT_TYPE)
            && self
                .chain_type
                .as_deref()
                .map_or(true, |chain| chain == CHAIN_TYPE_ETHEREUM)
    }
}

/// Privy user record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrivyUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "linkedAccounts")]
    pub linked_accounts: Vec<LinkedAccount>,
}

/// Trait for looking up the accounts behind a wallet
pub trait CustodyClient: Send + Sync {
    fn get_user(&self, wallet_id: &str) -> impl Future<Output = Result<PrivyUser>> + Send;
}

/// Pick the embedded EVM wallet address from a user's linked accounts
///
/// An entry whose `id` equals `wallet_id` wins; otherwise the first embedded
/// EVM wallet is used.
pub fn select_embedded_wallet(
    user: &PrivyUser,
    wallet_id: &str,
    wallet_type: WalletType,
) -> Result<Address, WalletError> {
    let embedded: Vec<&LinkedAccount> = user
        .linked_accounts
        .iter()
        .filter(|account| account.is_embedded_evm_wallet())
        .collect();

    let account = embedded
        .iter()
        .find(|account| account.id.as_deref() == Some(wallet_id))
        .or_else(|| embedded.first())
        .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))?;

    if wallet_type != WalletType::Embedded {
        return Err(WalletError::WalletTypeMismatch {
            configured: wallet_type.to_string(),
            found: WalletType::Embedded.to_string(),
        });
    }

    let address = account
        .address
        .as_deref()
        .ok_or_else(|| WalletError::WalletNotFound(wallet_id.to_string()))?;

    address
        .parse::<Address>()
        .with_context(|| format!("Invalid wallet address {}", address))
        .map_err(WalletError::from)
}

/// User lookup against the Privy REST API
pub struct PrivyUsersClient {
    client: Client,
    config: WalletConfig,
    api_base: String,
}

impl PrivyUsersClient {
    pub fn new(client: Client, config: WalletConfig) -> Self {
        Self {
            client,
            config,
            api_base: PRIVY_API_BASE.to_string(),
        }
    }

    /// Point at a different API host
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Lookup endpoint for `wallet_id`
    pub fn user_url(&self, wallet_id: &str) -> String {
        user_url(&self.api_base, wallet_id)
    }
}

impl CustodyClient for PrivyUsersClient {
    async fn get_user(&self, wallet_id: &str) -> Result<PrivyUser> {
        let headers = app_headers(&self.config)?;

        let resp = self
            .client
            .get(self.user_url(wallet_id))
            .headers(headers)
            .send()
            .await
            .context("Failed to fetch Privy user")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            eyre::bail!("Failed to fetch Privy user: {} - {}", status, body);
        }

        resp.json().await.context("Failed to parse Privy user response")
    }
}
