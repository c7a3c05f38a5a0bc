//! Guidepost Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the API client, the view-state controllers and the CLI.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ClientError, ErrorKind, LogLevel};
pub use models::{
    AnalysisListResponse, AnalysisResponse, AnalysisResult, AnalysisStatus, HealthResponse,
    UploadResponse, UploadedImage,
};
