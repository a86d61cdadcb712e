//! Wallet RPC dispatch
//!
//! Each wallet intent maps to exactly one Privy RPC method, and each method
//! answers with its own envelope:
//!
//! | Method                 | Result path               |
//! |------------------------|---------------------------|
//! | `personal_sign`        | `data.signature`          |
//! | `eth_signTypedData_v4` | `signature`               |
//! | `eth_signTransaction`  | `data.signed_transaction` |
//! | `eth_sendTransaction`  | `data.hash`               |
//!
//! The asymmetry is part of the service contract. Every method has its own
//! envelope type so a shape change fails loudly instead of being coerced.

use crate::chain::ChainClient;
use crate::constants::CHAIN_TYPE_ETHEREUM;
use crate::error::WalletError;
use crate::types::{EvmTransaction, TypedData, TypedDataField};
use alloy::primitives::{Address, Bytes};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Privy wallet RPC methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    PersonalSign,
    SignTypedDataV4,
    SignTransaction,
    SendTransaction,
}

impl RpcMethod {
    /// Method name on the wire
    pub fn name(self) -> &'static str {
        match self {
            RpcMethod::PersonalSign => "personal_sign",
            RpcMethod::SignTypedDataV4 => "eth_signTypedData_v4",
            RpcMethod::SignTransaction => "eth_signTransaction",
            RpcMethod::SendTransaction => "eth_sendTransaction",
        }
    }

    /// Where the result lives in the response
    pub fn result_path(self) -> &'static str {
        match self {
            RpcMethod::PersonalSign => "data.signature",
            RpcMethod::SignTypedDataV4 => "signature",
            RpcMethod::SignTransaction => "data.signed_transaction",
            RpcMethod::SendTransaction => "data.hash",
        }
    }

    /// Pull the hex result out of this method's envelope
    pub fn extract(self, response: Value) -> Result<Bytes, WalletError> {
        let hex = match self {
            RpcMethod::PersonalSign => {
                self.envelope::<DataEnvelope<SignatureResult>>(response)?
                    .data
                    .signature
            }
            RpcMethod::SignTypedDataV4 => self.envelope::<SignatureResult>(response)?.signature,
            RpcMethod::SignTransaction => {
                self.envelope::<DataEnvelope<SignedTransactionResult>>(response)?
                    .data
                    .signed_transaction
            }
            RpcMethod::SendTransaction => {
                self.envelope::<DataEnvelope<HashResult>>(response)?
                    .data
                    .hash
            }
        };

        hex.parse::<Bytes>()
            .map_err(|_| self.unexpected_envelope())
    }

    fn envelope<E: DeserializeOwned>(self, response: Value) -> Result<E, WalletError> {
        serde_json::from_value(response).map_err(|_| self.unexpected_envelope())
    }

    fn unexpected_envelope(self) -> WalletError {
        WalletError::UnexpectedEnvelope {
            method: self.name(),
            path: self.result_path(),
        }
    }
}

// ========== Response envelopes ==========

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SignatureResult {
    signature: String,
}

#[derive(Debug, Deserialize)]
struct SignedTransactionResult {
    signed_transaction: String,
}

#[derive(Debug, Deserialize)]
struct HashResult {
    hash: String,
}

// ========== Request bodies ==========

/// How `personal_sign` should interpret the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageEncoding {
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "hex")]
    Hex,
}

/// Typed data in the shape Privy expects (`primary_type`)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrivyTypedData {
    pub domain: Value,
    pub types: BTreeMap<String, Vec<TypedDataField>>,
    pub message: Value,
    pub primary_type: String,
}

impl From<TypedData> for PrivyTypedData {
    fn from(data: TypedData) -> Self {
        Self {
            domain: data.domain,
            types: data.types,
            message: data.message,
            primary_type: data.primary_type,
        }
    }
}

/// Method-specific request, serialized as `method` + `params`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "method", content = "params")]
pub enum RpcRequest {
    #[serde(rename = "personal_sign")]
    PersonalSign {
        message: String,
        encoding: MessageEncoding,
    },
    #[serde(rename = "eth_signTypedData_v4")]
    SignTypedData { typed_data: PrivyTypedData },
    #[serde(rename = "eth_signTransaction")]
    SignTransaction { transaction: EvmTransaction },
    #[serde(rename = "eth_sendTransaction")]
    SendTransaction { transaction: EvmTransaction },
}

impl RpcRequest {
    /// `personal_sign` of a UTF-8 message
    pub fn personal_sign(message: impl Into<String>) -> Self {
        RpcRequest::PersonalSign {
            message: message.into(),
            encoding: MessageEncoding::Utf8,
        }
    }

    /// `personal_sign` of raw bytes, sent hex encoded
    pub fn personal_sign_bytes(message: &[u8]) -> Self {
        RpcRequest::PersonalSign {
            message: Bytes::copy_from_slice(message).to_string(),
            encoding: MessageEncoding::Hex,
        }
    }

    pub fn method(&self) -> RpcMethod {
        match self {
            RpcRequest::PersonalSign { .. } => RpcMethod::PersonalSign,
            RpcRequest::SignTypedData { .. } => RpcMethod::SignTypedDataV4,
            RpcRequest::SignTransaction { .. } => RpcMethod::SignTransaction,
            RpcRequest::SendTransaction { .. } => RpcMethod::SendTransaction,
        }
    }
}

/// Body POSTed to the wallet RPC endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcBody {
    pub address: Address,
    pub chain_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caip2: Option<String>,
    #[serde(flatten)]
    pub request: RpcRequest,
}

impl RpcBody {
    pub fn new(address: Address, request: RpcRequest) -> Self {
        Self {
            address,
            chain_type: CHAIN_TYPE_ETHEREUM,
            caip2: None,
            request,
        }
    }

    /// Set the CAIP-2 chain the request targets
    pub fn with_caip2(mut self, caip2: impl Into<String>) -> Self {
        self.caip2 = Some(caip2.into());
        self
    }

    pub fn method(&self) -> RpcMethod {
        self.request.method()
    }
}

/// Resolve the sender and any missing nonce, gas, fee and chain ID fields
///
/// Must complete before the request is signed so that the authorization
/// signature covers the final transaction.
pub async fn prepare_transaction<C: ChainClient>(
    chain: &C,
    tx: EvmTransaction,
    from: Address,
) -> Result<EvmTransaction, WalletError> {
    let tx = EvmTransaction {
        from: Some(from),
        ..tx
    };
    if tx.is_complete() {
        return Ok(tx);
    }

    let filled = chain.fill_transaction(tx, from).await?;
    tracing::debug!(
        nonce = ?filled.nonce,
        gas_limit = ?filled.gas_limit,
        chain_id = ?filled.chain_id,
        "Resolved transaction fields"
    );
    Ok(filled)
}
