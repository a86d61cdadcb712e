//! Privy delegated EVM wallet provider
//!
//! Drive a Privy-custodied embedded wallet as if it were a local signer. The
//! private key never leaves Privy: every signing request carries an
//! authorization signature computed locally with the app's P-256
//! authorization key over a canonical descriptor of the exact request.
//!
//! # Features
//!
//! - Sign messages and EIP-712 typed data
//! - Sign and send transactions (nonce, gas and fees resolved on-chain)
//! - Native transfers from decimal ether amounts
//! - Balance, contract reads and receipt polling via alloy
//!
//! # Example
//!
//! ```rust,ignore
//! use privy_evm_wallet::{EvmWalletProvider, PrivyEvmWalletProvider, WalletConfig};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let config = WalletConfig::new(
//!         "app-id",
//!         "app-secret",
//!         "wallet-auth:MIGHAgEAMBMGByqGSM49...",
//!         "wallet-id",
//!     )
//!     .with_network_id("base-sepolia");
//!
//!     let wallet = PrivyEvmWalletProvider::configure_with_wallet(config).await?;
//!     let signature = wallet.sign_message("Hello, world!").await?;
//!     let hash = wallet.native_transfer("0x...".parse()?, "0.01").await?;
//!
//!     Ok(())
//! }
//! ```

pub mod canonical;
pub mod chain;
pub mod config;
pub mod constants;
pub mod contracts;
pub mod custody;
pub mod dispatch;
pub mod error;
pub mod network;
pub mod provider;
pub mod rpc;
pub mod serde_util;
pub mod signer;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use canonical::{Canonicalizer, JsonCanonicalizer};
pub use chain::{AlloyChainClient, ChainClient, ContractCall, ReceiptStatus, ReceiptSummary};
pub use config::{WalletConfig, WalletType};
pub use custody::{CustodyClient, LinkedAccount, PrivyUser, PrivyUsersClient};
pub use dispatch::{RpcBody, RpcMethod, RpcRequest};
pub use error::{eyre, Context, Report, Result, WalletError};
pub use network::{NetworkDescriptor, NetworkResolver, StaticNetworks};
pub use provider::{EvmWalletProvider, PrivyEvmWalletProvider, PrivyWalletBuilder};
pub use rpc::PrivyRpcClient;
pub use signer::{AuthorizationSigner, P256AuthorizationSigner};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{EvmTransaction, ExportedWalletData, TypedData, TypedDataField, WalletIdentity};
