//! HTTP transport used by the remote invoker

use eyre::{Context, Result};
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;

/// Raw HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for issuing the authorized POST requests
///
/// Errors are reserved for failures to complete the exchange (DNS,
/// connection, body read). Non-2xx statuses are returned as responses.
pub trait HttpTransport: Send + Sync {
    fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> impl Future<Output = Result<HttpResponse>> + Send;
}

impl<T: HttpTransport> HttpTransport for Arc<T> {
    fn post(
        &self,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> impl Future<Output = Result<HttpResponse>> + Send {
        T::post(self.as_ref(), url, headers, body)
    }
}

/// reqwest-backed transport
///
/// Built without a request timeout; supply a configured client through
/// [`ReqwestTransport::with_client`] to impose one.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl HttpTransport for ReqwestTransport {
    async fn post(&self, url: &str, headers: HeaderMap, body: String) -> Result<HttpResponse> {
        let resp = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .context("Failed to send request")?;

        let status = resp.status().as_u16();
        let body = resp.text().await.context("Failed to read response body")?;

        Ok(HttpResponse { status, body })
    }
}
