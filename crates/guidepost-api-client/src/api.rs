//! Endpoint groups of the two services.
//!
//! Each method performs exactly one request and hands back the raw
//! response. Input validation happens before any I/O.

use crate::mapper::map_json;
use crate::{ApiClient, RawResponse};
use guidepost_core::{ClientError, HealthResponse};

const UPLOAD_PATH: &str = "/api/upload";
const IMAGES_PATH: &str = "/api/images";
const ANALYSIS_PATH: &str = "/api/analysis";
const HEALTH_PATH: &str = "/health";

/// Multipart form field carrying the image.
pub const IMAGE_FIELD: &str = "image";

fn require_id(image_id: &str) -> Result<(), ClientError> {
    if image_id.trim().is_empty() {
        return Err(ClientError::invalid_input("image id must not be empty"));
    }
    Ok(())
}

/// Upload Service: image ingestion, image retrieval, health.
#[derive(Clone, Copy, Debug)]
pub struct UploadApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UploadApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `POST /api/upload` with the bytes in the `image` multipart field.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        mime_type: &str,
    ) -> Result<RawResponse, ClientError> {
        if bytes.is_empty() {
            return Err(ClientError::invalid_input("image is empty"));
        }
        if filename.trim().is_empty() {
            return Err(ClientError::invalid_input("filename must not be empty"));
        }

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime_type)
            .map_err(|_| ClientError::invalid_input(format!("invalid media type '{}'", mime_type)))?;
        let form = reqwest::multipart::Form::new().part(IMAGE_FIELD, part);

        let url = self.client.build_upload_url(UPLOAD_PATH);
        self.client
            .post_multipart(&url, form, self.client.upload_timeout())
            .await
    }

    /// `GET /api/images/{id}`: the stored image bytes.
    pub async fn fetch_image_bytes(&self, image_id: &str) -> Result<RawResponse, ClientError> {
        require_id(image_id)?;
        self.client.get(&self.image_url(image_id)).await
    }

    /// Direct URL of a stored image, for callers that load it themselves.
    pub fn image_url(&self, image_id: &str) -> String {
        self.client.build_upload_url(&format!(
            "{}/{}",
            IMAGES_PATH,
            urlencoding::encode(image_id)
        ))
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        let raw = self
            .client
            .get(&self.client.build_upload_url(HEALTH_PATH))
            .await?;
        map_json(&raw, "Health check failed")
    }
}

/// Analysis Service: per-image results, listing, health.
#[derive(Clone, Copy, Debug)]
pub struct AnalysisApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AnalysisApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /api/analysis`
    pub async fn list_analyses(&self) -> Result<RawResponse, ClientError> {
        self.client
            .get(&self.client.build_analysis_url(ANALYSIS_PATH))
            .await
    }

    /// `GET /api/analysis/{imageId}`
    pub async fn get_analysis(&self, image_id: &str) -> Result<RawResponse, ClientError> {
        require_id(image_id)?;
        let url = self.client.build_analysis_url(&format!(
            "{}/{}",
            ANALYSIS_PATH,
            urlencoding::encode(image_id)
        ));
        self.client.get(&url).await
    }

    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        let raw = self
            .client
            .get(&self.client.build_analysis_url(HEALTH_PATH))
            .await?;
        map_json(&raw, "Health check failed")
    }
}
