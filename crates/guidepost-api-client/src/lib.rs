//! Shared HTTP client for the Guidepost services.
//!
//! One `reqwest::Client` (and therefore one connection pool) serves two
//! independently addressed endpoint groups: the Upload Service and the
//! Analysis Service. Requests return a fully-read [`RawResponse`]; turning
//! that into domain values is the job of [`mapper`], and the
//! [`repository`] is the only layer callers are expected to use.

pub mod api;
pub mod mapper;
pub mod repository;
pub mod source;

use anyhow::{Context, Result};
use bytes::Bytes;
use guidepost_core::{ClientConfig, ClientError};
use reqwest::Client;
use std::time::Duration;

pub use api::{AnalysisApi, UploadApi};
pub use repository::{HttpImageRepository, ImageRepository, ServiceHealth};
pub use source::{FileImageSource, ImageSource, MemoryImageSource};

/// A response whose body has been read to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP client for the upload and analysis services.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// Create client from environment, see [`ClientConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().context("Invalid client configuration")?;
        Self::new(config)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoints of the Upload Service.
    pub fn upload(&self) -> UploadApi<'_> {
        UploadApi::new(self)
    }

    /// Endpoints of the Analysis Service.
    pub fn analysis(&self) -> AnalysisApi<'_> {
        AnalysisApi::new(self)
    }

    pub(crate) fn upload_timeout(&self) -> Duration {
        self.config.upload_timeout
    }

    pub(crate) fn build_upload_url(&self, path: &str) -> String {
        format!("{}{}", self.config.upload_base_url, path)
    }

    pub(crate) fn build_analysis_url(&self, path: &str) -> String {
        format!("{}{}", self.config.analysis_base_url, path)
    }

    pub(crate) async fn get(&self, url: &str) -> Result<RawResponse, ClientError> {
        self.execute("GET", url, self.client.get(url)).await
    }

    pub(crate) async fn post_multipart(
        &self,
        url: &str,
        form: reqwest::multipart::Form,
        timeout: Duration,
    ) -> Result<RawResponse, ClientError> {
        let request = self.client.post(url).multipart(form).timeout(timeout);
        self.execute("POST", url, request).await
    }

    /// Send a request and read the whole body. Only transport faults are
    /// errors here; any HTTP status comes back as a `RawResponse`.
    async fn execute(
        &self,
        method: &str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<RawResponse, ClientError> {
        tracing::debug!(method, url, "Sending request");

        let response = request.send().await.map_err(|e| {
            let err = mapper::transport_error(e);
            tracing::warn!(method, url, error = %err, "Request failed");
            err
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            let err = mapper::transport_error(e);
            tracing::warn!(method, url, status, error = %err, "Failed to read response body");
            err
        })?;

        if !(200..300).contains(&status) {
            tracing::warn!(method, url, status, "Request returned non-success status");
        }

        Ok(RawResponse { status, body })
    }
}

// Re-export domain response types for convenience.
pub use guidepost_core::models::{
    AnalysisListResponse, AnalysisResponse, AnalysisResult, AnalysisStatus, HealthResponse,
    UploadResponse, UploadedImage,
};
