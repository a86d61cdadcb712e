//! Error types for the Privy wallet SDK
//!
//! Collaborators (chain client, custody lookup, transport) use `eyre` for
//! ergonomic error handling with context. Public provider operations return
//! [`WalletError`] so callers can match on what went wrong.

pub use eyre::{eyre, Context, Report, Result};

use thiserror::Error;

/// Errors surfaced by the wallet provider
#[derive(Debug, Error)]
pub enum WalletError {
    // ========== Configuration ==========
    #[error("walletId is required")]
    MissingWalletId,

    #[error("appId and appSecret are required")]
    MissingAppCredentials,

    #[error("authorizationPrivateKey is required")]
    MissingAuthorizationKey,

    #[error("{0} contains characters not allowed in an HTTP header")]
    InvalidHeaderValue(&'static str),

    #[error("Invalid wallet type: {0}")]
    InvalidWalletType(String),

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Could not find wallet address for wallet ID {0}")]
    WalletNotFound(String),

    #[error("Wallet type mismatch: configured {configured}, found {found}")]
    WalletTypeMismatch { configured: String, found: String },

    // ========== Request signing ==========
    /// Deliberately carries no cause: the cause may reference key material.
    #[error("Error generating Privy authorization signature")]
    SignatureGeneration,

    // ========== Transport ==========
    #[error("Privy request failed: HTTP error! status: {0}")]
    Http(u16),

    #[error("Privy request failed: {0:#}")]
    Transport(Report),

    // ========== Response envelopes ==========
    #[error("Failed to parse Privy response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Unexpected {method} response: expected {path}")]
    UnexpectedEnvelope {
        method: &'static str,
        path: &'static str,
    },

    // ========== Inputs ==========
    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    // ========== Collaborators ==========
    #[error("{0:#}")]
    Collaborator(Report),
}

impl From<Report> for WalletError {
    fn from(report: Report) -> Self {
        WalletError::Collaborator(report)
    }
}

impl WalletError {
    /// True for errors raised while validating [`crate::WalletConfig`]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            WalletError::MissingWalletId
                | WalletError::MissingAppCredentials
                | WalletError::MissingAuthorizationKey
                | WalletError::InvalidHeaderValue(_)
                | WalletError::InvalidWalletType(_)
                | WalletError::UnsupportedNetwork(_)
                | WalletError::WalletNotFound(_)
                | WalletError::WalletTypeMismatch { .. }
        )
    }
}
