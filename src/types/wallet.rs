//! Wallet identity, typed data and export types

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Address and Privy wallet ID resolved at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletIdentity {
    pub address: Address,
    pub wallet_id: String,
}

/// Single field of an EIP-712 struct type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedDataField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

/// EIP-712 typed data as accepted from callers (camelCase `primaryType`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypedData {
    pub domain: Value,
    pub types: BTreeMap<String, Vec<TypedDataField>>,
    pub primary_type: String,
    pub message: Value,
}

/// Snapshot sufficient to rebuild an equivalent provider
///
/// Contains the raw authorization key. `Debug` redacts it; serialize it only
/// into storage the caller trusts.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedWalletData {
    pub wallet_id: String,
    pub authorization_private_key: String,
    pub network_id: String,
    #[serde(with = "crate::serde_util::u64_string")]
    pub chain_id: u64,
}

impl fmt::Debug for ExportedWalletData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedWalletData")
            .field("wallet_id", &self.wallet_id)
            .field("authorization_private_key", &"<redacted>")
            .field("network_id", &self.network_id)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}
