use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::image::parse_timestamp;

/// Server-side analysis lifecycle: Pending -> Processing -> Completed | Failed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, AnalysisStatus::Completed | AnalysisStatus::Failed)
    }

    /// Upper-case name used in navigation routes.
    pub fn as_route_name(self) -> &'static str {
        match self {
            AnalysisStatus::Pending => "PENDING",
            AnalysisStatus::Processing => "PROCESSING",
            AnalysisStatus::Completed => "COMPLETED",
            AnalysisStatus::Failed => "FAILED",
        }
    }

    /// Inverse of [`as_route_name`](Self::as_route_name); unknown names map to `Pending`.
    pub fn from_route_name(name: &str) -> Self {
        name.to_ascii_lowercase().parse().unwrap_or_default()
    }
}

impl Display for AnalysisStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            AnalysisStatus::Pending => write!(f, "pending"),
            AnalysisStatus::Processing => write!(f, "processing"),
            AnalysisStatus::Completed => write!(f, "completed"),
            AnalysisStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for AnalysisStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AnalysisStatus::Pending),
            "processing" => Ok(AnalysisStatus::Processing),
            "completed" => Ok(AnalysisStatus::Completed),
            "failed" => Ok(AnalysisStatus::Failed),
            _ => Err(anyhow::anyhow!("Invalid analysis status: {}", s)),
        }
    }
}

/// Snapshot of the analysis of one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub image_id: String,
    pub filename: String,
    /// Absent until the analysis has finished.
    #[serde(default)]
    pub analyzed_at: Option<String>,
    #[serde(default)]
    pub keywords: Option<Vec<String>>,
    #[serde(default)]
    pub detected_text: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: AnalysisStatus,
    #[serde(default)]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// A fresh, not-yet-analyzed result for an image.
    pub fn pending(image_id: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            filename: filename.into(),
            analyzed_at: None,
            keywords: None,
            detected_text: None,
            description: None,
            status: AnalysisStatus::Pending,
            error: None,
        }
    }

    pub fn analyzed_date(&self) -> Option<DateTime<Utc>> {
        self.analyzed_at.as_deref().and_then(parse_timestamp)
    }

    /// Keywords, description, detected text and filename, space-joined and lower-cased.
    pub fn searchable_text(&self) -> String {
        let mut components: Vec<&str> = Vec::new();
        if let Some(keywords) = &self.keywords {
            components.extend(keywords.iter().map(String::as_str));
        }
        if let Some(description) = &self.description {
            components.push(description);
        }
        if let Some(detected) = &self.detected_text {
            components.extend(detected.iter().map(String::as_str));
        }
        components.push(&self.filename);
        components.join(" ").to_lowercase()
    }

    /// Case-insensitive substring match against [`searchable_text`](Self::searchable_text).
    pub fn matches_search(&self, text: &str) -> bool {
        text.is_empty() || self.searchable_text().contains(&text.to_lowercase())
    }

    /// The server's error message, but only for a failed analysis.
    ///
    /// The services do not guarantee that `error` is empty for other
    /// statuses; callers that display a failure reason should use this.
    pub fn failure_reason(&self) -> Option<&str> {
        match self.status {
            AnalysisStatus::Failed => self.error.as_deref().filter(|e| !e.is_empty()),
            _ => None,
        }
    }
}

/// `GET /api/analysis` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisListResponse {
    pub success: bool,
    pub data: Vec<AnalysisResult>,
}

/// `GET /api/analysis/{imageId}` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: AnalysisResult,
}
