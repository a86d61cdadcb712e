//! Wallet provider backed by a Privy delegated embedded wallet
//!
//! [`PrivyEvmWalletProvider`] is built once by [`configure_with_wallet`],
//! which validates the configuration, resolves the network and looks up the
//! wallet address. After that the identity and network never change.
//!
//! Chain reads go straight to the [`ChainClient`]. Signing and sending go
//! through the authorized wallet RPC.
//!
//! [`configure_with_wallet`]: PrivyEvmWalletProvider::configure_with_wallet

use crate::canonical::{Canonicalizer, JsonCanonicalizer};
use crate::chain::{AlloyChainClient, ChainClient, ContractCall, ReceiptSummary};
use crate::config::WalletConfig;
use crate::constants::{caip2, PRIVY_API_BASE, PROVIDER_NAME};
use crate::custody::{select_embedded_wallet, CustodyClient, PrivyUsersClient};
use crate::dispatch::{prepare_transaction, RpcBody, RpcRequest};
use crate::error::WalletError;
use crate::network::{NetworkDescriptor, NetworkResolver, StaticNetworks};
use crate::rpc::PrivyRpcClient;
use crate::signer::{AuthorizationSigner, P256AuthorizationSigner};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{EvmTransaction, ExportedWalletData, TypedData, WalletIdentity};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use eyre::Context;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;

/// Trait for EVM wallets driven by a remote signer
///
/// Signing operations return the raw bytes the custodian produced: a
/// signature, an RLP-encoded signed transaction, or a transaction hash.
pub trait EvmWalletProvider: Send + Sync {
    /// Returns the wallet's EVM address
    fn address(&self) -> Address;

    /// Returns the network the wallet is bound to
    fn network(&self) -> &NetworkDescriptor;

    /// Returns the provider name
    fn name(&self) -> &'static str;

    /// Gets the native token balance in wei
    fn get_balance(&self) -> impl Future<Output = Result<U256, WalletError>> + Send;

    /// Signs a UTF-8 message with `personal_sign`
    fn sign_message(&self, message: &str)
        -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Signs EIP-712 typed data
    fn sign_typed_data(
        &self,
        data: TypedData,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Signs a transaction without broadcasting it
    fn sign_transaction(
        &self,
        tx: EvmTransaction,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Signs and broadcasts a transaction, returning its hash
    fn send_transaction(
        &self,
        tx: EvmTransaction,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Waits for a transaction to be mined and returns the receipt
    fn wait_for_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<ReceiptSummary, WalletError>> + Send;

    /// Executes a read-only contract call
    fn read_contract(
        &self,
        call: ContractCall,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;

    /// Sends `amount` (decimal ether, e.g. `"1.5"`) to `to`
    fn native_transfer(
        &self,
        to: Address,
        amount: &str,
    ) -> impl Future<Output = Result<Bytes, WalletError>> + Send;
}

/// Delegated Privy embedded wallet on an EVM network
pub struct PrivyEvmWalletProvider<C: ChainClient, T: HttpTransport = ReqwestTransport> {
    config: WalletConfig,
    network: NetworkDescriptor,
    identity: WalletIdentity,
    chain: C,
    rpc: PrivyRpcClient<T>,
}

impl PrivyEvmWalletProvider<AlloyChainClient, ReqwestTransport> {
    /// Configure a provider against the live Privy API and the network's
    /// default RPC endpoint
    pub async fn configure_with_wallet(config: WalletConfig) -> Result<Self, WalletError> {
        config.validate()?;

        let network_id = config.effective_network_id().to_string();
        let metadata = StaticNetworks
            .chain(&network_id)
            .ok_or_else(|| WalletError::UnsupportedNetwork(network_id.clone()))?;

        let chain = AlloyChainClient::new(metadata.rpc_url, metadata.chain_id)?;
        let transport = ReqwestTransport::new()?;
        let client = transport.client().clone();

        let builder = Self::builder(config, chain, transport);
        let custody = builder.users_client(client);
        builder.configure_with_wallet(&custody).await
    }
}

impl<C: ChainClient, T: HttpTransport> PrivyEvmWalletProvider<C, T> {
    /// Start building a provider with explicit collaborators
    pub fn builder(config: WalletConfig, chain: C, transport: T) -> PrivyWalletBuilder<C, T> {
        PrivyWalletBuilder {
            config,
            chain,
            transport,
            networks: Arc::new(StaticNetworks),
            canonicalizer: Arc::new(JsonCanonicalizer),
            signer: Arc::new(P256AuthorizationSigner),
            api_base: PRIVY_API_BASE.to_string(),
        }
    }

    /// Privy wallet ID
    pub fn wallet_id(&self) -> &str {
        &self.identity.wallet_id
    }

    /// Chain client the provider reads through
    pub fn chain(&self) -> &C {
        &self.chain
    }

    /// Snapshot sufficient to reconstruct an equivalent provider
    ///
    /// Contains the raw authorization key.
    pub fn export_wallet(&self) -> ExportedWalletData {
        ExportedWalletData {
            wallet_id: self.identity.wallet_id.clone(),
            authorization_private_key: self.config.authorization_private_key.clone(),
            network_id: self.network.network_id.clone(),
            chain_id: self.network.chain_id,
        }
    }

    /// Sign raw bytes with `personal_sign` (sent hex encoded)
    pub async fn sign_message_bytes(&self, message: &[u8]) -> Result<Bytes, WalletError> {
        let body = RpcBody::new(self.address(), RpcRequest::personal_sign_bytes(message));
        self.rpc.call(&body).await
    }

    /// Typed contract read using `sol!` bindings
    pub async fn read_contract_call<Call>(
        &self,
        address: Address,
        call: &Call,
    ) -> Result<Call::Return, WalletError>
    where
        Call: SolCall,
    {
        let result = self
            .read_contract(ContractCall::new(address, call.abi_encode()))
            .await?;

        let decoded = Call::abi_decode_returns(&result)
            .with_context(|| format!("Failed to decode {} return data", Call::SIGNATURE))?;

        Ok(decoded)
    }
}

impl<C: ChainClient, T: HttpTransport> EvmWalletProvider for PrivyEvmWalletProvider<C, T> {
    fn address(&self) -> Address {
        self.identity.address
    }

    fn network(&self) -> &NetworkDescriptor {
        &self.network
    }

    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn get_balance(&self) -> Result<U256, WalletError> {
        Ok(self.chain.get_balance(self.address()).await?)
    }

    async fn sign_message(&self, message: &str) -> Result<Bytes, WalletError> {
        let body = RpcBody::new(self.address(), RpcRequest::personal_sign(message));
        self.rpc.call(&body).await
    }

    async fn sign_typed_data(&self, data: TypedData) -> Result<Bytes, WalletError> {
        let body = RpcBody::new(
            self.address(),
            RpcRequest::SignTypedData {
                typed_data: data.into(),
            },
        );
        self.rpc.call(&body).await
    }

    async fn sign_transaction(&self, tx: EvmTransaction) -> Result<Bytes, WalletError> {
        let transaction = prepare_transaction(&self.chain, tx, self.address()).await?;
        let body = RpcBody::new(self.address(), RpcRequest::SignTransaction { transaction });
        self.rpc.call(&body).await
    }

    async fn send_transaction(&self, tx: EvmTransaction) -> Result<Bytes, WalletError> {
        let transaction = prepare_transaction(&self.chain, tx, self.address()).await?;
        let body = RpcBody::new(self.address(), RpcRequest::SendTransaction { transaction })
            .with_caip2(caip2(self.network.chain_id));

        let hash = self.rpc.call(&body).await?;
        tracing::info!(%hash, wallet_id = %self.identity.wallet_id, "Transaction submitted");
        Ok(hash)
    }

    async fn wait_for_transaction_receipt(
        &self,
        hash: TxHash,
    ) -> Result<ReceiptSummary, WalletError> {
        Ok(self.chain.wait_for_transaction_receipt(hash).await?)
    }

    async fn read_contract(&self, call: ContractCall) -> Result<Bytes, WalletError> {
        Ok(self.chain.read_contract(call).await?)
    }

    async fn native_transfer(&self, to: Address, amount: &str) -> Result<Bytes, WalletError> {
        let value = self
            .chain
            .parse_ether(amount)
            .map_err(|e| WalletError::InvalidAmount {
                amount: amount.to_string(),
                reason: format!("{:#}", e),
            })?;

        tracing::debug!(%to, %value, "Native transfer");
        self.send_transaction(EvmTransaction::transfer(to, value))
            .await
    }
}

/// Builder for [`PrivyEvmWalletProvider`]
///
/// Defaults: built-in network table, JSON canonicalizer, P-256 authorization
/// signer, `https://api.privy.io`.
pub struct PrivyWalletBuilder<C, T> {
    config: WalletConfig,
    chain: C,
    transport: T,
    networks: Arc<dyn NetworkResolver>,
    canonicalizer: Arc<dyn Canonicalizer>,
    signer: Arc<dyn AuthorizationSigner>,
    api_base: String,
}

impl<C: ChainClient, T: HttpTransport> PrivyWalletBuilder<C, T> {
    pub fn network_resolver(mut self, networks: impl NetworkResolver + 'static) -> Self {
        self.networks = Arc::new(networks);
        self
    }

    pub fn canonicalizer(mut self, canonicalizer: impl Canonicalizer + 'static) -> Self {
        self.canonicalizer = Arc::new(canonicalizer);
        self
    }

    pub fn authorization_signer(mut self, signer: impl AuthorizationSigner + 'static) -> Self {
        self.signer = Arc::new(signer);
        self
    }

    /// Point at a different Privy API host
    ///
    /// Applies to wallet RPCs and to custody clients made by
    /// [`users_client`](Self::users_client).
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Privy user lookup against the same API host and credentials
    pub fn users_client(&self, client: Client) -> PrivyUsersClient {
        PrivyUsersClient::new(client, self.config.clone()).with_api_base(self.api_base.as_str())
    }

    /// Validate, resolve network and wallet identity, and build the provider
    ///
    /// Fails without side effects on the first unmet requirement; a provider
    /// is only returned once everything has resolved.
    pub async fn configure_with_wallet<U: CustodyClient>(
        self,
        custody: &U,
    ) -> Result<PrivyEvmWalletProvider<C, T>, WalletError> {
        let config = self.config;
        config.validate()?;

        let network_id = config.effective_network_id();
        let network = self
            .networks
            .network(network_id)
            .ok_or_else(|| WalletError::UnsupportedNetwork(network_id.to_string()))?;

        let user = custody
            .get_user(&config.wallet_id)
            .await
            .with_context(|| format!("Failed to look up wallet {}", config.wallet_id))?;
        let address = select_embedded_wallet(&user, &config.wallet_id, config.wallet_type)?;

        tracing::info!(
            wallet_id = %config.wallet_id,
            %address,
            network_id = %network.network_id,
            chain_id = network.chain_id,
            "Privy wallet provider configured"
        );

        let identity = WalletIdentity {
            address,
            wallet_id: config.wallet_id.clone(),
        };
        let rpc = PrivyRpcClient::new(
            config.clone(),
            self.transport,
            self.canonicalizer,
            self.signer,
            self.api_base,
        );

        Ok(PrivyEvmWalletProvider {
            config,
            network,
            identity,
            chain: self.chain,
            rpc,
        })
    }
}
