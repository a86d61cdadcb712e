//! Chain access for read-only queries and transaction preparation
//!
//! None of these calls touch the custody service, so none of them need an
//! authorization signature.

use crate::types::EvmTransaction;
use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder, RootProvider};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::transports::http::reqwest::Url;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

/// Outcome of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// Receipt fields the provider exposes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptSummary {
    pub transaction_hash: TxHash,
    pub status: ReceiptStatus,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for ReceiptSummary {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            transaction_hash: receipt.transaction_hash,
            status: if receipt.status() {
                ReceiptStatus::Success
            } else {
                ReceiptStatus::Reverted
            },
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// `eth_call` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Contract address
    pub address: Address,
    /// ABI-encoded calldata
    pub data: Bytes,
}

impl ContractCall {
    pub fn new(address: Address, data: impl Into<Bytes>) -> Self {
        Self {
            address,
            data: data.into(),
        }
    }
}

/// Trait for the chain queries the wallet provider delegates
pub trait ChainClient: Send + Sync {
    /// Native balance of `address` in wei
    fn get_balance(&self, address: Address) -> impl Future<Output = Result<U256>> + Send;

    /// Wait until `hash` is mined and return its receipt
    fn wait_for_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<ReceiptSummary>> + Send;

    /// Execute an `eth_call` and return the raw return data
    fn read_contract(&self, call: ContractCall) -> impl Future<Output = Result<Bytes>> + Send;

    /// Complete nonce, gas limit, fees and chain ID where they are missing
    fn fill_transaction(
        &self,
        tx: EvmTransaction,
        from: Address,
    ) -> impl Future<Output = Result<EvmTransaction>> + Send;

    /// Convert a decimal ether amount (`"1.5"`) to wei
    fn parse_ether(&self, amount: &str) -> Result<U256> {
        parse_ether(amount).with_context(|| format!("Invalid ether amount: {}", amount))
    }
}

/// Chain client over an alloy HTTP provider
pub struct AlloyChainClient {
    provider: RootProvider<Ethereum>,
    chain_id: u64,
    poll_interval: Duration,
    max_attempts: u32,
}

impl AlloyChainClient {
    /// Connect to `rpc_url` for chain `chain_id`
    pub fn new(rpc_url: impl AsRef<str>, chain_id: u64) -> Result<Self> {
        let url: Url = rpc_url.as_ref().parse().context("Invalid RPC URL")?;
        // Read-only provider without fillers; filling is done explicitly
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .network::<Ethereum>()
            .connect_http(url);

        Ok(Self {
            provider,
            chain_id,
            poll_interval: Duration::from_secs(2),
            max_attempts: 60,
        })
    }

    /// Override receipt polling (default: every 2s, 60 attempts)
    pub fn with_receipt_polling(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts;
        self
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl ChainClient for AlloyChainClient {
    async fn get_balance(&self, address: Address) -> Result<U256> {
        let balance: U256 = self
            .provider
            .get_balance(address)
            .await
            .context("Failed to get balance")?;

        Ok(balance)
    }

    async fn wait_for_transaction_receipt(&self, hash: TxHash) -> Result<ReceiptSummary> {
        for attempt in 0..self.max_attempts {
            let receipt: Option<TransactionReceipt> = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .context("Failed to get transaction receipt")?;

            if let Some(receipt) = receipt {
                return Ok(ReceiptSummary::from(&receipt));
            }

            tracing::debug!(%hash, attempt = attempt + 1, "Receipt not available yet");
            tokio::time::sleep(self.poll_interval).await;
        }

        eyre::bail!("Transaction receipt not found after timeout: {}", hash)
    }

    async fn read_contract(&self, call: ContractCall) -> Result<Bytes> {
        let result: Bytes = self
            .provider
            .call(
                TransactionRequest::default()
                    .with_to(call.address)
                    .with_input(call.data),
            )
            .await
            .with_context(|| format!("Failed to call contract {}", call.address))?;

        Ok(result)
    }

    async fn fill_transaction(&self, tx: EvmTransaction, from: Address) -> Result<EvmTransaction> {
        let mut tx = tx;
        tx.from = Some(tx.from.unwrap_or(from));
        tx.chain_id = Some(tx.chain_id.unwrap_or(self.chain_id));

        if tx.nonce.is_none() {
            let nonce = self
                .provider
                .get_transaction_count(from)
                .pending()
                .await
                .context("Failed to get nonce")?;
            tx.nonce = Some(nonce);
        }

        if tx.gas_limit.is_none() {
            let mut request = TransactionRequest::default()
                .with_from(from)
                .with_value(tx.value)
                .with_input(tx.data.clone());
            if let Some(to) = tx.to {
                request = request.with_to(to);
            }
            let gas = self
                .provider
                .estimate_gas(request)
                .await
                .context("Failed to estimate gas")?;
            tx.gas_limit = Some(gas);
        }

        if tx.max_fee_per_gas.is_none() || tx.max_priority_fee_per_gas.is_none() {
            let fees = self
                .provider
                .estimate_eip1559_fees()
                .await
                .context("Failed to estimate fees")?;
            tx.max_fee_per_gas.get_or_insert(fees.max_fee_per_gas);
            tx.max_priority_fee_per_gas
                .get_or_insert(fees.max_priority_fee_per_gas);
        }

        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopChain;

    impl ChainClient for NoopChain {
        async fn get_balance(&self, _address: Address) -> Result<U256> {
            Ok(U256::ZERO)
        }

        async fn wait_for_transaction_receipt(&self, hash: TxHash) -> Result<ReceiptSummary> {
            Ok(ReceiptSummary {
                transaction_hash: hash,
                status: ReceiptStatus::Success,
                block_number: None,
                gas_used: 0,
            })
        }

        async fn read_contract(&self, _call: ContractCall) -> Result<Bytes> {
            Ok(Bytes::new())
        }

        async fn fill_transaction(&self, tx: EvmTransaction, _from: Address) -> Result<EvmTransaction> {
            Ok(tx)
        }
    }

    #[test]
    fn test_default_parse_ether() {
        assert_eq!(
            NoopChain.parse_ether("1.0").unwrap(),
            U256::from(1_000_000_000_000_000_000u64)
        );
        assert_eq!(
            NoopChain.parse_ether("0.000000000000000001").unwrap(),
            U256::from(1u64)
        );
        assert!(NoopChain.parse_ether("one").is_err());
    }

    #[test]
    fn test_invalid_rpc_url() {
        assert!(AlloyChainClient::new("not a url", 1).is_err());
    }

    #[test]
    fn test_receipt_summary_serializes_status() {
        let summary = ReceiptSummary {
            transaction_hash: TxHash::ZERO,
            status: ReceiptStatus::Success,
            block_number: Some(1),
            gas_used: 21_000,
        };
        let v = serde_json::to_value(&summary).unwrap();
        assert_eq!(v["status"], "success");
        assert_eq!(v["blockNumber"], 1);
    }
}
