//! Authorized calls to the Privy wallet API
//!
//! Every request is signed and sent exactly once. Remote signing calls are
//! not idempotent (a retried `eth_sendTransaction` could submit twice), so
//! failures are returned to the caller as-is.

use crate::canonical::{to_canonical_value, Canonicalizer};
use crate::config::WalletConfig;
use crate::constants::wallet_rpc_url;
use crate::dispatch::RpcBody;
use crate::error::WalletError;
use crate::signer::{authorization_signature, signed_headers, AuthorizationSigner, RequestDescriptor};
use crate::transport::HttpTransport;
use alloy::primitives::Bytes;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Remote invoker for the Privy wallet API
pub struct PrivyRpcClient<T> {
    config: WalletConfig,
    transport: T,
    canonicalizer: Arc<dyn Canonicalizer>,
    signer: Arc<dyn AuthorizationSigner>,
    api_base: String,
}

impl<T: HttpTransport> PrivyRpcClient<T> {
    pub fn new(
        config: WalletConfig,
        transport: T,
        canonicalizer: Arc<dyn Canonicalizer>,
        signer: Arc<dyn AuthorizationSigner>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            config,
            transport,
            canonicalizer,
            signer,
            api_base: api_base.into(),
        }
    }

    /// Wallet RPC endpoint for the configured wallet
    pub fn rpc_url(&self) -> String {
        wallet_rpc_url(&self.api_base, &self.config.wallet_id)
    }

    /// Dispatch a wallet RPC and return its normalized result
    pub async fn call(&self, body: &RpcBody) -> Result<Bytes, WalletError> {
        let method = body.method();
        tracing::debug!(
            method = method.name(),
            wallet_id = %self.config.wallet_id,
            "Dispatching Privy wallet RPC"
        );

        let response = self.invoke(&self.rpc_url(), body).await?;
        method.extract(response)
    }

    /// Sign and POST `body` to `url`, returning the parsed JSON response
    ///
    /// The signature is computed before anything touches the network; a
    /// canonicalization or signing failure means no request is sent.
    pub async fn invoke<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Value, WalletError> {
        let body = to_canonical_value(body).ok_or(WalletError::SignatureGeneration)?;
        let descriptor = RequestDescriptor::post(url, body, self.config.app_id.as_str());

        let signature = authorization_signature(
            self.canonicalizer.as_ref(),
            self.signer.as_ref(),
            &descriptor,
            &self.config.authorization_private_key,
        )?;

        // Send the same canonical bytes the signature covers
        let wire_body = self
            .canonicalizer
            .canonicalize(&descriptor.body)
            .ok_or(WalletError::SignatureGeneration)?;
        let headers = signed_headers(&self.config, &signature)?;

        let resp = self
            .transport
            .post(&descriptor.url, headers, wire_body)
            .await
            .map_err(WalletError::Transport)?;

        if !resp.is_success() {
            tracing::warn!(status = resp.status, url = %descriptor.url, "Privy request failed");
            return Err(WalletError::Http(resp.status));
        }

        tracing::debug!(status = resp.status, "Privy request succeeded");
        Ok(serde_json::from_str(&resp.body)?)
    }
}
