//! Request authorization for the Privy wallet API
//!
//! Every wallet RPC request carries a `privy-authorization-signature` header:
//! a signature, made with the app's authorization key, over a canonical
//! descriptor of the exact request (method, URL, body and app ID header).
//! Privy verifies it against the authorization public key registered for the
//! wallet, so the signed bytes must match what Privy recomputes bit-for-bit.

mod authorization_key;

pub use authorization_key::{parse_authorization_key, P256AuthorizationSigner};

use crate::canonical::Canonicalizer;
use crate::config::WalletConfig;
use crate::constants::{AUTHORIZATION_PAYLOAD_VERSION, HEADER_APP_ID, HEADER_AUTHORIZATION_SIGNATURE};
use crate::error::WalletError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use eyre::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Trait for producing detached authorization signatures
///
/// Implementations receive the canonical payload bytes and the configured key
/// material (scheme prefix included) and return the header-ready signature.
pub trait AuthorizationSigner: Send + Sync {
    fn sign(&self, payload: &[u8], authorization_key: &str) -> Result<String>;
}

/// The parts of an HTTP request covered by the authorization signature
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    /// HTTP method, upper case
    pub method: String,
    /// Full request URL
    pub url: String,
    /// JSON request body
    pub body: Value,
    /// Privy headers included in the signature
    pub headers: BTreeMap<String, String>,
}

impl RequestDescriptor {
    /// Descriptor for a POST carrying `body`, signed for `app_id`
    pub fn post(url: impl Into<String>, body: Value, app_id: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(HEADER_APP_ID.to_string(), app_id.into());
        Self {
            method: "POST".to_string(),
            url: url.into(),
            body,
            headers,
        }
    }

    /// Payload whose canonical form is signed
    pub fn signature_payload(&self) -> Value {
        json!({
            "version": AUTHORIZATION_PAYLOAD_VERSION,
            "method": self.method,
            "url": self.url,
            "body": self.body,
            "headers": self.headers,
        })
    }
}

/// Compute the `privy-authorization-signature` value for a request
///
/// Canonicalization and signing failures collapse into
/// [`WalletError::SignatureGeneration`]; the underlying cause is dropped so
/// that nothing derived from the key leaks through error messages.
pub fn authorization_signature(
    canonicalizer: &dyn Canonicalizer,
    signer: &dyn AuthorizationSigner,
    descriptor: &RequestDescriptor,
    authorization_key: &str,
) -> Result<String, WalletError> {
    let Some(payload) = canonicalizer.canonicalize(&descriptor.signature_payload()) else {
        tracing::warn!(url = %descriptor.url, "Authorization payload could not be canonicalized");
        return Err(WalletError::SignatureGeneration);
    };

    match signer.sign(payload.as_bytes(), authorization_key) {
        Ok(signature) if !signature.is_empty() => Ok(signature),
        Ok(_) | Err(_) => {
            tracing::warn!(url = %descriptor.url, "Authorization signing failed");
            Err(WalletError::SignatureGeneration)
        }
    }
}

/// App credential sent in the `Authorization` header
pub fn app_credential(config: &WalletConfig) -> String {
    BASE64.encode(format!("{}:{}", config.app_id, config.app_secret))
}

/// Build the headers for an authorized Privy request
pub fn signed_headers(config: &WalletConfig, signature: &str) -> Result<HeaderMap, WalletError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HEADER_APP_ID, header_value("appId", &config.app_id, false)?);
    headers.insert(
        AUTHORIZATION,
        header_value("appSecret", &format!("Bearer {}", app_credential(config)), true)?,
    );
    headers.insert(
        HeaderName::from_static(HEADER_AUTHORIZATION_SIGNATURE),
        signature_header_value(signature)?,
    );
    Ok(headers)
}

/// Headers for unsigned Privy calls (user lookup)
pub fn app_headers(config: &WalletConfig) -> Result<HeaderMap, WalletError> {
    let mut headers = HeaderMap::new();
    headers.insert(HEADER_APP_ID, header_value("appId", &config.app_id, false)?);
    headers.insert(
        AUTHORIZATION,
        header_value("appSecret", &format!("Bearer {}", app_credential(config)), true)?,
    );
    Ok(headers)
}

// A signer that yields a non-header-safe string failed to sign
fn signature_header_value(signature: &str) -> Result<HeaderValue, WalletError> {
    let mut value =
        HeaderValue::from_str(signature).map_err(|_| WalletError::SignatureGeneration)?;
    value.set_sensitive(true);
    Ok(value)
}

/// `field` names the config field the value came from; secrets never appear
/// in the error
fn header_value(
    field: &'static str,
    value: &str,
    sensitive: bool,
) -> Result<HeaderValue, WalletError> {
    let mut value =
        HeaderValue::from_str(value).map_err(|_| WalletError::InvalidHeaderValue(field))?;
    value.set_sensitive(sensitive);
    Ok(value)
}
