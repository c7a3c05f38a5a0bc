//! Repository over the two services.
//!
//! Every operation returns an [`ApiResult`]: transport faults, HTTP failures,
//! malformed bodies and local I/O problems all collapse into the same
//! `ApiError { message, code }` here, so nothing above this layer has to
//! distinguish them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guidepost_core::{
    AnalysisListResponse, AnalysisResponse, AnalysisResult, ApiError, ApiResult, ClientError,
    HealthResponse, LogLevel, UploadResponse, UploadedImage,
};

use crate::mapper::{map_bytes, map_json};
use crate::source::ImageSource;
use crate::ApiClient;

/// Media type sent when the source cannot tell.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

const UPLOAD_FAILED: &str = "Upload failed";
const ANALYSIS_FAILED: &str = "Failed to fetch analysis";
const IMAGE_FAILED: &str = "Failed to fetch image";

/// Data access used by the view-state controllers.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    /// Read `source` and upload it to the Upload Service.
    async fn upload_image(&self, source: &dyn ImageSource) -> ApiResult<UploadedImage>;

    /// All analysis results, in server order.
    async fn fetch_all_analysis(&self) -> ApiResult<Vec<AnalysisResult>>;

    async fn fetch_analysis(&self, image_id: &str) -> ApiResult<AnalysisResult>;

    /// Raw bytes of a stored image.
    async fn fetch_image_data(&self, image_id: &str) -> ApiResult<Vec<u8>>;
}

/// Liveness of both services. Each side is checked independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub upload: ApiResult<HealthResponse>,
    pub analysis: ApiResult<HealthResponse>,
}

impl ServiceHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(&self.upload, Ok(h) if h.success) && matches!(&self.analysis, Ok(h) if h.success)
    }
}

/// Filename the Upload Service receives: `image_<unix millis>.jpg`.
pub fn upload_filename(now: DateTime<Utc>) -> String {
    format!("image_{}.jpg", now.timestamp_millis())
}

fn report(operation: &'static str, err: ClientError) -> ApiError {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(operation, error = %err, "Request unsuccessful"),
        LogLevel::Warn => tracing::warn!(operation, error = %err, "Request unsuccessful"),
        LogLevel::Error => tracing::error!(operation, error = %err, "Request unsuccessful"),
    }
    err.into()
}

/// [`ImageRepository`] backed by [`ApiClient`].
#[derive(Clone, Debug)]
pub struct HttpImageRepository {
    client: ApiClient,
}

impl HttpImageRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Check both services' `/health` endpoints.
    pub async fn check_health(&self) -> ServiceHealth {
        let upload = self.client.upload().health_check().await;
        let analysis = self.client.analysis().health_check().await;
        ServiceHealth {
            upload: upload.map_err(|e| report("upload_health", e)),
            analysis: analysis.map_err(|e| report("analysis_health", e)),
        }
    }

    async fn try_upload(&self, source: &dyn ImageSource) -> Result<UploadedImage, ClientError> {
        let bytes = source.read_bytes().await.map_err(|e| {
            ClientError::Generic(format!("Cannot read image file {}: {}", source.describe(), e))
        })?;
        let mime_type = source
            .mime_type()
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        let filename = upload_filename(Utc::now());

        tracing::debug!(
            source = %source.describe(),
            size = bytes.len(),
            mime_type = %mime_type,
            filename = %filename,
            "Uploading image"
        );

        let raw = self
            .client
            .upload()
            .upload_image(bytes, &filename, &mime_type)
            .await?;
        let response: UploadResponse = map_json(&raw, UPLOAD_FAILED)?;
        Ok(response.data)
    }
}

#[async_trait]
impl ImageRepository for HttpImageRepository {
    async fn upload_image(&self, source: &dyn ImageSource) -> ApiResult<UploadedImage> {
        let image = self
            .try_upload(source)
            .await
            .map_err(|e| report("upload_image", e))?;
        tracing::info!(image_id = %image.id, size = image.size, "Image uploaded");
        Ok(image)
    }

    async fn fetch_all_analysis(&self) -> ApiResult<Vec<AnalysisResult>> {
        let raw = self
            .client
            .analysis()
            .list_analyses()
            .await
            .map_err(|e| report("fetch_all_analysis", e))?;
        let response: AnalysisListResponse =
            map_json(&raw, ANALYSIS_FAILED).map_err(|e| report("fetch_all_analysis", e))?;
        Ok(response.data)
    }

    async fn fetch_analysis(&self, image_id: &str) -> ApiResult<AnalysisResult> {
        let raw = self
            .client
            .analysis()
            .get_analysis(image_id)
            .await
            .map_err(|e| report("fetch_analysis", e))?;
        let response: AnalysisResponse =
            map_json(&raw, ANALYSIS_FAILED).map_err(|e| report("fetch_analysis", e))?;
        Ok(response.data)
    }

    async fn fetch_image_data(&self, image_id: &str) -> ApiResult<Vec<u8>> {
        let raw = self
            .client
            .upload()
            .fetch_image_bytes(image_id)
            .await
            .map_err(|e| report("fetch_image_data", e))?;
        map_bytes(&raw, IMAGE_FAILED).map_err(|e| report("fetch_image_data", e))
    }
}
