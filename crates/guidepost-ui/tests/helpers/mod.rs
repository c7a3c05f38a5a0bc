//! In-memory repository for controller tests.
//!
//! Responses are scripted per operation and handed out in order. A scripted
//! response may carry a gate: the call then waits until the gate is notified,
//! which keeps a request "in flight" while the test pokes the controller.

#![allow(dead_code)]

use async_trait::async_trait;
use guidepost_api_client::{ImageRepository, ImageSource};
use guidepost_core::{AnalysisResult, AnalysisStatus, ApiError, ApiResult, UploadedImage};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

struct Scripted<T> {
    gate: Option<Arc<Notify>>,
    response: ApiResult<T>,
}

type Script<T> = Arc<Mutex<VecDeque<Scripted<T>>>>;

#[derive(Clone, Default)]
pub struct MockImageRepository {
    uploads: Script<UploadedImage>,
    lists: Script<Vec<AnalysisResult>>,
    singles: Script<AnalysisResult>,
    upload_calls: Arc<Mutex<Vec<String>>>,
    list_calls: Arc<Mutex<usize>>,
    fetch_calls: Arc<Mutex<Vec<String>>>,
}

fn push<T>(script: &Script<T>, gate: Option<Arc<Notify>>, response: ApiResult<T>) {
    script
        .lock()
        .unwrap()
        .push_back(Scripted { gate, response });
}

async fn next<T>(script: &Script<T>, operation: &str) -> ApiResult<T> {
    let scripted = script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("unscripted call to {}", operation));
    if let Some(gate) = scripted.gate {
        gate.notified().await;
    }
    scripted.response
}

impl MockImageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_upload(&self, response: ApiResult<UploadedImage>) {
        push(&self.uploads, None, response);
    }

    pub fn respond_list(&self, response: ApiResult<Vec<AnalysisResult>>) {
        push(&self.lists, None, response);
    }

    pub fn respond_list_after(&self, gate: Arc<Notify>, response: ApiResult<Vec<AnalysisResult>>) {
        push(&self.lists, Some(gate), response);
    }

    pub fn respond_fetch(&self, response: ApiResult<AnalysisResult>) {
        push(&self.singles, None, response);
    }

    pub fn respond_fetch_after(&self, gate: Arc<Notify>, response: ApiResult<AnalysisResult>) {
        push(&self.singles, Some(gate), response);
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.upload_calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageRepository for MockImageRepository {
    async fn upload_image(&self, source: &dyn ImageSource) -> ApiResult<UploadedImage> {
        self.upload_calls.lock().unwrap().push(source.describe());
        next(&self.uploads, "upload_image").await
    }

    async fn fetch_all_analysis(&self) -> ApiResult<Vec<AnalysisResult>> {
        *self.list_calls.lock().unwrap() += 1;
        next(&self.lists, "fetch_all_analysis").await
    }

    async fn fetch_analysis(&self, image_id: &str) -> ApiResult<AnalysisResult> {
        self.fetch_calls.lock().unwrap().push(image_id.to_string());
        next(&self.singles, "fetch_analysis").await
    }

    async fn fetch_image_data(&self, _image_id: &str) -> ApiResult<Vec<u8>> {
        Err(ApiError::new("Failed to fetch image", Some(404)))
    }
}

pub fn analysis(id: &str, keywords: &[&str], status: AnalysisStatus) -> AnalysisResult {
    AnalysisResult {
        keywords: Some(keywords.iter().map(|k| k.to_string()).collect()),
        status,
        ..AnalysisResult::pending(id, format!("image_{}.jpg", id))
    }
}

pub fn uploaded(id: &str) -> UploadedImage {
    UploadedImage {
        id: id.to_string(),
        filename: format!("1714566645123-{}.jpg", id),
        original_name: "image_1714566645123.jpg".to_string(),
        mimetype: "image/jpeg".to_string(),
        size: 512,
        uploaded_at: "2024-05-01T12:30:45.123Z".to_string(),
        path: format!("uploads/{}.jpg", id),
    }
}
