//! EVM transaction request sent to the wallet RPC

use crate::serde_util::{decimal, decimal_opt};
use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Transaction request parameters
///
/// Serializes to the `params.transaction` object of `eth_signTransaction` /
/// `eth_sendTransaction`. Wei quantities travel as decimal strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvmTransaction {
    /// Sender, filled with the wallet address before dispatch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Target address (`None` for contract creation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    /// Transaction value in wei
    #[serde(with = "decimal", default)]
    pub value: U256,
    /// Encoded calldata
    #[serde(default, skip_serializing_if = "is_empty")]
    pub data: Bytes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    #[serde(
        with = "decimal_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_fee_per_gas: Option<u128>,
    #[serde(
        with = "decimal_opt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub max_priority_fee_per_gas: Option<u128>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
}

fn is_empty(data: &Bytes) -> bool {
    data.is_empty()
}

impl EvmTransaction {
    /// Create a new transaction request to `to`
    pub fn new(to: Address) -> Self {
        Self {
            to: Some(to),
            ..Default::default()
        }
    }

    /// Native value transfer
    pub fn transfer(to: Address, value: U256) -> Self {
        Self::new(to).with_value(value)
    }

    /// Set transaction value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Set calldata
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = data.into();
        self
    }

    /// Set nonce
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Set gas limit
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set EIP-1559 fee caps
    pub fn with_fees(mut self, max_fee_per_gas: u128, max_priority_fee_per_gas: u128) -> Self {
        self.max_fee_per_gas = Some(max_fee_per_gas);
        self.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
        self
    }

    /// Set chain ID
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// True once nonce, gas, fees and chain ID are all resolved
    pub fn is_complete(&self) -> bool {
        self.nonce.is_some()
            && self.gas_limit.is_some()
            && self.max_fee_per_gas.is_some()
            && self.max_priority_fee_per_gas.is_some()
            && self.chain_id.is_some()
    }
}
