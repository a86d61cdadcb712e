//! Test doubles shared by the integration tests

#![allow(dead_code)]

use alloy::primitives::{address, Address, Bytes, TxHash, U256};
use privy_evm_wallet::{
    Canonicalizer, ChainClient, ContractCall, CustodyClient, EvmTransaction, HttpResponse,
    HttpTransport, PrivyEvmWalletProvider, PrivyUser, ReceiptStatus, ReceiptSummary, WalletConfig,
    WalletError,
};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const WALLET_ADDRESS: Address = address!("742d35Cc6634C0532925a3b844Bc454e4438f44e");
pub const RECIPIENT: Address = address!("1234567890123456789012345678901234567890");
pub const ONE_ETHER: u64 = 1_000_000_000_000_000_000;

pub fn test_config() -> WalletConfig {
    WalletConfig::new(
        "test-app-id",
        "test-app-secret",
        "wallet-auth:test-auth-key",
        "test-wallet-id",
    )
    .with_network_id("base-sepolia")
}

// ========== Transport ==========

/// A request as it left the provider
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }

    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .map(|v| v.to_str().unwrap())
            .unwrap_or_default()
    }
}

/// Answers each RPC method with its Privy envelope and records every call
#[derive(Default)]
pub struct MockTransport {
    status: Option<u16>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer every request with `status` and an error body
    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status: Some(status),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    fn envelope(method: &str) -> Value {
        match method {
            "personal_sign" => json!({ "data": { "signature": "0x1234" } }),
            "eth_signTypedData_v4" => json!({ "signature": "0x1234" }),
            "eth_signTransaction" => json!({ "data": { "signed_transaction": "0x1234" } }),
            "eth_sendTransaction" => json!({ "data": { "hash": "0xef01" } }),
            _ => json!({}),
        }
    }
}

impl HttpTransport for MockTransport {
    async fn post(&self, url: &str, headers: HeaderMap, body: String) -> eyre::Result<HttpResponse> {
        let method = serde_json::from_str::<Value>(&body)?["method"]
            .as_str()
            .unwrap_or_default()
            .to_string();

        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            headers,
            body,
        });

        Ok(match self.status {
            Some(status) => HttpResponse {
                status,
                body: r#"{"error":"invalid request"}"#.to_string(),
            },
            None => HttpResponse {
                status: 200,
                body: Self::envelope(&method).to_string(),
            },
        })
    }
}

// ========== Chain ==========

/// Chain with a fixed balance that fills transactions deterministically
#[derive(Default)]
pub struct MockChain {
    fills: AtomicUsize,
}

impl MockChain {
    pub fn fill_count(&self) -> usize {
        self.fills.load(Ordering::SeqCst)
    }
}

impl ChainClient for MockChain {
    async fn get_balance(&self, _address: Address) -> eyre::Result<U256> {
        Ok(U256::from(ONE_ETHER))
    }

    async fn wait_for_transaction_receipt(&self, hash: TxHash) -> eyre::Result<ReceiptSummary> {
        Ok(ReceiptSummary {
            transaction_hash: hash,
            status: ReceiptStatus::Success,
            block_number: Some(1),
            gas_used: 21_000,
        })
    }

    async fn read_contract(&self, _call: ContractCall) -> eyre::Result<Bytes> {
        Ok(Bytes::from(U256::from(42u64).to_be_bytes::<32>().to_vec()))
    }

    async fn fill_transaction(&self, tx: EvmTransaction, _from: Address) -> eyre::Result<EvmTransaction> {
        self.fills.fetch_add(1, Ordering::SeqCst);
        Ok(EvmTransaction {
            nonce: tx.nonce.or(Some(0)),
            gas_limit: tx.gas_limit.or(Some(21_000)),
            max_fee_per_gas: tx.max_fee_per_gas.or(Some(2_000_000_000)),
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas.or(Some(1_000_000)),
            chain_id: tx.chain_id.or(Some(84532)),
            ..tx
        })
    }
}

// ========== Custody ==========

/// Custody service linking one embedded wallet next to unrelated accounts
#[derive(Default)]
pub struct MockCustody {
    lookups: AtomicUsize,
}

impl MockCustody {
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CustodyClient for MockCustody {
    async fn get_user(&self, _wallet_id: &str) -> eyre::Result<PrivyUser> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::from_value(json!({
            "id": "did:privy:test-user",
            "linkedAccounts": [
                { "type": "email", "address": "user@example.com" },
                {
                    "type": "wallet",
                    "walletClientType": "metamask",
                    "chainType": "ethereum",
                    "address": "0x0000000000000000000000000000000000000001",
                },
                {
                    "type": "wallet",
                    "walletClientType": "privy",
                    "chainType": "ethereum",
                    "address": WALLET_ADDRESS.to_string(),
                },
            ],
        }))?)
    }
}

// ========== Signing ==========

/// Signer returning a fixed signature
pub struct StaticSigner;

impl privy_evm_wallet::AuthorizationSigner for StaticSigner {
    fn sign(&self, _payload: &[u8], _authorization_key: &str) -> eyre::Result<String> {
        Ok("bW9jay1zaWduYXR1cmU=".to_string())
    }
}

/// Canonicalizer that can never produce output
pub struct RejectingCanonicalizer;

impl Canonicalizer for RejectingCanonicalizer {
    fn canonicalize(&self, _value: &Value) -> Option<String> {
        None
    }
}

// ========== Provider ==========

pub type TestProvider = PrivyEvmWalletProvider<MockChain, Arc<MockTransport>>;

/// Provider over the mocks with the static signer
pub async fn provider(transport: Arc<MockTransport>) -> Result<TestProvider, WalletError> {
    PrivyEvmWalletProvider::builder(test_config(), MockChain::default(), transport)
        .authorization_signer(StaticSigner)
        .configure_with_wallet(&MockCustody::default())
        .await
}
