use crate::errors::ClientError;
use crate::models::{Credito, ErrorBody};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Lookups offered by the credit API.
///
/// Implemented over HTTP by [`CreditoClient`]; tests substitute their own.
#[async_trait]
pub trait CreditoApi: Send + Sync {
    /// `GET {base}/{numero_nfse}`: every credit attached to an NFS-e.
    async fn fetch_by_nfse(&self, numero_nfse: &str) -> Result<Vec<Credito>, ClientError>;

    /// `GET {base}/credito/{numero_credito}`: a single credit.
    async fn fetch_by_credit_number(&self, numero_credito: &str) -> Result<Credito, ClientError>;
}

/// HTTP client for the credit API resource (e.g. `http://localhost:8080/api/creditos`).
#[derive(Clone)]
pub struct CreditoClient {
    client: Client,
    base_url: Url,
}

impl CreditoClient {
    /// Creates a new `CreditoClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The credit resource URL; a trailing slash is ignored.
    /// * `timeout` - Per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base path, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        tracing::info!("GET {}", url);

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::error!("Credito API request to {} failed: {}", url, e);
            ClientError::Transport(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let body = ErrorBody::parse(&error_text);
            tracing::warn!("Credito API returned {} for {}: {}", status, url, error_text);
            return Err(ClientError::Http { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!("Failed to parse Credito API response from {}: {}", url, e);
            ClientError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl CreditoApi for CreditoClient {
    async fn fetch_by_nfse(&self, numero_nfse: &str) -> Result<Vec<Credito>, ClientError> {
        let url = self.endpoint(&[numero_nfse])?;
        let creditos: Vec<Credito> = self.get_json(url).await?;
        tracing::info!(
            "Found {} credit(s) for NFS-e {}",
            creditos.len(),
            numero_nfse
        );
        Ok(creditos)
    }

    async fn fetch_by_credit_number(&self, numero_credito: &str) -> Result<Credito, ClientError> {
        let url = self.endpoint(&["credito", numero_credito])?;
        let credito: Credito = self.get_json(url).await?;
        tracing::info!("Found credit {}", credito.numero_credito);
        Ok(credito)
    }
}
