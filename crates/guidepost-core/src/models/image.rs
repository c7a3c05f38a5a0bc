use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An image as stored by the Upload Service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub id: String,
    /// Name the service stored the file under.
    pub filename: String,
    pub original_name: String,
    pub mimetype: String,
    pub size: u64,
    pub uploaded_at: String,
    pub path: String,
}

impl UploadedImage {
    /// Parsed `uploaded_at`, `None` when the server sent something other than RFC 3339.
    pub fn upload_date(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.uploaded_at)
    }

    /// Human-readable size ("512 B", "3 KB", "12 MB").
    pub fn formatted_size(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = 1024 * 1024;
        match self.size {
            s if s < KB => format!("{} B", s),
            s if s < MB => format!("{} KB", s / KB),
            s => format!("{} MB", s / MB),
        }
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// `POST /api/upload` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: UploadedImage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn image(size: u64, uploaded_at: &str) -> UploadedImage {
        UploadedImage {
            id: "img-1".to_string(),
            filename: "1700000000000-image.jpg".to_string(),
            original_name: "image_1700000000000.jpg".to_string(),
            mimetype: "image/jpeg".to_string(),
            size,
            uploaded_at: uploaded_at.to_string(),
            path: "uploads/1700000000000-image.jpg".to_string(),
        }
    }

    #[test]
    fn test_deserialize_upload_response() {
        let body = r#"{
            "success": true,
            "message": "Image uploaded successfully",
            "data": {
                "id": "abc123",
                "filename": "stored.jpg",
                "originalName": "image_1.jpg",
                "mimetype": "image/jpeg",
                "size": 512,
                "uploadedAt": "2024-05-01T12:30:45.123Z",
                "path": "uploads/stored.jpg"
            }
        }"#;
        let response: UploadResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.data.id, "abc123");
        assert_eq!(response.data.original_name, "image_1.jpg");
        assert_eq!(response.data.size, 512);
    }

    #[test]
    fn test_negative_size_is_rejected() {
        let body = r#"{"id":"a","filename":"f","originalName":"o","mimetype":"image/png",
            "size":-1,"uploadedAt":"x","path":"p"}"#;
        assert!(serde_json::from_str::<UploadedImage>(body).is_err());
    }

    #[test]
    fn test_upload_date() {
        let date = image(1, "2024-05-01T12:30:45.123Z").upload_date().unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.hour(), 12);
        assert_eq!(image(1, "yesterday").upload_date(), None);
    }

    #[test]
    fn test_formatted_size() {
        assert_eq!(image(512, "").formatted_size(), "512 B");
        assert_eq!(image(1024, "").formatted_size(), "1 KB");
        assert_eq!(image(5 * 1024 * 1024 + 10, "").formatted_size(), "5 MB");
    }
}
